use rust_decimal::Decimal;

/// Errors raised while reading input tables or running a pipeline.
///
/// Only the variants that concern a baseline (base year, reference country,
/// display currency) abort a whole computation; per-row lookups that fail are
/// turned into [`Warning`](super::Warning)s by the pipelines.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("base year {0} is not in the price index table")]
    MissingBaseYear(i32),
    #[error("reference country '{0}' is not in the PPP table")]
    MissingReferenceCountry(String),
    #[error("no exchange rate for currency '{0}'")]
    UnknownCurrency(String),
    #[error("invalid {field} in {table} for {key}: {value}")]
    InvalidValue {
        table: &'static str,
        key: String,
        field: &'static str,
        value: Decimal,
    },
    #[error("duplicate year {year} in {table}")]
    DuplicateYear { table: &'static str, year: i32 },
    #[error("duplicate entry in {table}: {key}")]
    DuplicateEntry { table: &'static str, key: String },
    #[error("unreadable amount '{0}'")]
    UnreadableAmount(String),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    /// Builds an [`PipelineError::InvalidValue`] for a negative or zero input.
    pub fn invalid(
        table: &'static str,
        key: impl ToString,
        field: &'static str,
        value: Decimal,
    ) -> Self {
        PipelineError::InvalidValue {
            table,
            key: key.to_string(),
            field,
            value,
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
