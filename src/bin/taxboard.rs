use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use taxboard::{
    render, write_table_csv, AlternativePolicy, DashboardConfig, DatasetStore, DisplayMode,
    RateFamily, Selection,
};

#[derive(Parser)]
#[command(name = "taxboard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "OECD corporate tax rate charts, current law and proposals")]
#[command(long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render one selection to chart JSON
    Render(RenderArgs),
    /// Load and validate a dataset
    Check(CheckArgs),
}

#[derive(Args)]
struct RenderArgs {
    /// Combined primary and overlay CSV
    #[arg(short, long, env = "TAXBOARD_DATA")]
    data: PathBuf,
    /// Dashboard configuration (TOML)
    #[arg(short, long, env = "TAXBOARD_CONFIG")]
    config: Option<PathBuf>,
    /// statutory, metr or aetr
    #[arg(short, long, default_value = "metr")]
    rate: RateFamily,
    /// bar, asset, financing, country-compare or alternative
    #[arg(short, long, default_value = "bar")]
    mode: DisplayMode,
    /// Country code; repeat for asset and comparison views
    #[arg(long = "country")]
    countries: Vec<String>,
    /// CL, BONUS, RND, EBITDA or FDII (or 0-4)
    #[arg(short, long, default_value = "CL")]
    policy: AlternativePolicy,
    /// Write the plotted rows as CSV
    #[arg(long)]
    table: Option<PathBuf>,
    /// Write the chart JSON here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct CheckArgs {
    #[arg(short, long, env = "TAXBOARD_DATA")]
    data: PathBuf,
    #[arg(short, long, env = "TAXBOARD_CONFIG")]
    config: Option<PathBuf>,
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<DashboardConfig> {
    match path {
        Some(path) => DashboardConfig::load(path)
            .with_context(|| format!("loading configuration {}", path.display())),
        None => Ok(DashboardConfig::default()),
    }
}

fn run_render(args: RenderArgs) -> anyhow::Result<()> {
    let store = DatasetStore::load(&args.data)
        .with_context(|| format!("loading dataset {}", args.data.display()))?;
    let config = load_config(args.config.as_ref())?;
    let selection = Selection::new(args.rate, args.mode)
        .with_countries(args.countries)
        .with_policy(args.policy);

    let rendered = render(&store, &config, &selection)?;
    let json = rendered.chart.to_json()?;
    match &args.output {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("writing chart to {}", path.display()))?,
        None => println!("{}", json),
    }

    if let Some(path) = &args.table {
        let file = std::fs::File::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        write_table_csv(&rendered.table, file)?;
        log::info!("Wrote {} rows to {}", rendered.table.len(), path.display());
    }
    Ok(())
}

fn run_check(args: CheckArgs) -> anyhow::Result<()> {
    let store = DatasetStore::load(&args.data)
        .with_context(|| format!("loading dataset {}", args.data.display()))?;
    let config = load_config(args.config.as_ref())?;
    store.check_distinguished(&config)?;

    println!(
        "{}: {} primary rows, {} overlay rows",
        args.data.display(),
        store.primary().len(),
        store.overlay().len()
    );
    for entity in &config.distinguished {
        let present = AlternativePolicy::ALL
            .iter()
            .filter_map(|policy| policy.step())
            .filter(|step| store.overlay_row(&entity.overlay_code(*step)).is_some())
            .count();
        println!("  {:<32} {}/4 overlay rows", entity.display_name, present);
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let result = match cli.command {
        Commands::Render(args) => run_render(args),
        Commands::Check(args) => run_check(args),
    };
    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        if let Some(dash) = e.downcast_ref::<taxboard::DashError>() {
            for suggestion in dash.suggestions() {
                eprintln!("  help: {}", suggestion);
            }
        }
        process::exit(1);
    }
}
