use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DashError {
    #[error("{entity} not found in {table}")]
    NotFound {
        entity: String,
        table: String,
        suggestion: String,
    },

    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        suggestion: String,
    },

    #[error("Data contract violated: {message}")]
    DataContract {
        message: String,
        suggestion: String,
    },

    #[error("Failed to load {}: {}", .path.display(), .message)]
    Load {
        path: PathBuf,
        message: String,
    },

    #[error("Required column '{column}' is missing from the dataset")]
    MissingColumn {
        column: String,
    },

    #[error("Configuration value rejected: {field} - {message}")]
    Config {
        field: String,
        message: String,
    },
}

impl DashError {
    /// A named row (country, variant, display label) is absent from its table
    pub fn not_found(entity: impl Into<String>, table: impl Into<String>) -> Self {
        let entity = entity.into();
        let table = table.into();
        let suggestion = format!(
            "Check that '{}' is spelled exactly as it appears in the {} table",
            entity, table
        );
        Self::NotFound { entity, table, suggestion }
    }

    pub fn invalid_input(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// The primary and overlay tables (or a single table) disagree with the documented layout
    pub fn data_contract(message: impl Into<String>) -> Self {
        let message = message.into();
        let suggestion =
            "Regenerate the primary and overlay tables from the same model run".to_string();
        Self::DataContract { message, suggestion }
    }

    pub fn load(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Load {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn missing_column(column: impl Into<String>) -> Self {
        Self::MissingColumn { column: column.into() }
    }

    pub fn config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Config {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Get recovery suggestions for this error
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::NotFound { suggestion, .. } => vec![suggestion.clone()],
            Self::InvalidInput { suggestion, .. } => vec![suggestion.clone()],
            Self::DataContract { suggestion, .. } => vec![suggestion.clone()],
            Self::Load { path, .. } => {
                vec![format!("Ensure {} exists and is a readable file", path.display())]
            }
            Self::MissingColumn { column } => {
                vec![format!("Add a '{}' column to the header row", column)]
            }
            Self::Config { field, .. } => {
                vec![format!("Fix or remove '{}' to fall back to the default", field)]
            }
        }
    }

    /// Short machine-readable kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::InvalidInput { .. } => "invalid_input",
            Self::DataContract { .. } => "data_contract",
            Self::Load { .. } => "load",
            Self::MissingColumn { .. } => "missing_column",
            Self::Config { .. } => "config",
        }
    }
}

/// Result type for dashboard operations
pub type DashResult<T> = std::result::Result<T, DashError>;
