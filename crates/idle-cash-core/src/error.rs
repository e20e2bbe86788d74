use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IdleCashError {
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Ratio group '{group}' must sum to 1.0 (got {sum})")]
    RatioSum { group: String, sum: Decimal },

    #[error("Invalid rule: {0}")]
    InvalidRule(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for IdleCashError {
    fn from(e: serde_json::Error) -> Self {
        IdleCashError::SerializationError(e.to_string())
    }
}
