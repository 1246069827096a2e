//! Error types for the CFO copilot

use thiserror::Error;

/// Result type alias for copilot operations
pub type Result<T> = std::result::Result<T, CopilotError>;

#[derive(Error, Debug)]
pub enum CopilotError {

    // =============================
    // Metric Errors (recovered per call)
    // =============================

    #[error("Invalid date format received: '{0}'")]
    InvalidMonthFormat(String),

    #[error("No data found for {0}")]
    EmptyResult(String),

    #[error("Degenerate metric: {0}")]
    DegenerateMetric(String),

    // =============================
    // Dataset Errors
    // =============================

    #[error("No FX rate for {currency} in {month}")]
    MissingFxRate { month: String, currency: String },

    #[error("Duplicate FX rate for {currency} in {month}")]
    DuplicateFxRate { month: String, currency: String },

    #[error("Invalid month in source data: '{0}'")]
    InvalidSourceMonth(String),

    #[error("Cannot read {path}: {source}")]
    SourceFile {
        path: String,
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Chart rendering error: {0}")]
    Chart(String),

    // =============================
    // External Library Conversions
    // =============================

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
