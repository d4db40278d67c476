use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::collections::BTreeMap;
use taxboard::{
    render, AlternativePolicy, CountryRecord, DashboardConfig, DatasetStore, DisplayMode,
    RateFamily, RateField, Rates, Selection,
};
fn rates(base: f64) -> Rates {
    RateField::all()
        .fold(Rates::default(), |r, field| r.with(field, base + field.index() as f64 / 1000.0))
}
fn generate_store(countries: usize) -> DatasetStore {
    let config = DashboardConfig::default();
    let mut primary: Vec<CountryRecord> = (0..countries)
        .map(|i| {
            CountryRecord::new(format!("C{:03}X", i), format!("Country {}", i), 1.0 + i as f64)
                .with_rates(rates(0.01 + (i % 37) as f64 * 0.005))
        })
        .collect();
    let mut overlay = BTreeMap::new();
    for (n, entity) in config.distinguished.iter().enumerate() {
        let base = 0.10 + n as f64 * 0.03;
        primary.push(
            CountryRecord::new(entity.code.clone(), entity.display_name.clone(), 40.0)
                .with_rates(rates(base)),
        );
        for step in 1..=4u8 {
            overlay.insert(entity.overlay_code(step), rates(base - 0.01 * f64::from(step)));
        }
    }
    DatasetStore::new(primary, overlay).expect("benchmark panel is valid")
}
fn benchmark_modes(c: &mut Criterion) {
    let store = generate_store(36);
    let config = DashboardConfig::default();
    let mut group = c.benchmark_group("render");
    let selections = [
        ("bar", Selection::new(RateFamily::Metr, DisplayMode::Bar)),
        ("financing", Selection::new(RateFamily::Aetr, DisplayMode::Financing)),
        (
            "asset",
            Selection::new(RateFamily::Metr, DisplayMode::Asset).with_countries(["C001X", "C017X"]),
        ),
        (
            "country_compare",
            Selection::new(RateFamily::Metr, DisplayMode::CountryCompare)
                .with_countries(["USA", "C010X"]),
        ),
        (
            "alternative",
            Selection::new(RateFamily::Metr, DisplayMode::Alternative)
                .with_policy(AlternativePolicy::Fdii),
        ),
    ];
    for (name, selection) in &selections {
        group
            .bench_function(
                *name,
                |b| {
                    b.iter(|| {
                        let _ = render(black_box(&store), &config, black_box(selection));
                    });
                },
            );
    }
    group.finish();
}
fn benchmark_panel_size(c: &mut Criterion) {
    let config = DashboardConfig::default();
    let selection = Selection::new(RateFamily::Metr, DisplayMode::Bar);
    let mut group = c.benchmark_group("panel_size");
    for size in [36usize, 360, 3600] {
        let store = generate_store(size);
        group
            .bench_function(
                format!("bar_{}", size),
                |b| {
                    b.iter(|| {
                        let _ = render(black_box(&store), &config, &selection);
                    });
                },
            );
    }
    group.finish();
}
fn benchmark_serialisation(c: &mut Criterion) {
    let store = generate_store(36);
    let config = DashboardConfig::default();
    let selection = Selection::new(RateFamily::Metr, DisplayMode::Bar);
    let rendered = render(&store, &config, &selection).expect("bar render succeeds");
    c.bench_function("chart_to_json", |b| b.iter(|| black_box(&rendered.chart).to_json()));
}
criterion_group!(benches, benchmark_modes, benchmark_panel_size, benchmark_serialisation);
criterion_main!(benches);
