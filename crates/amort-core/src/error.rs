use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AmortError {
    #[error("Invalid principal: {0} — principal must be positive")]
    InvalidPrincipal(Decimal),

    #[error("Invalid rate: {0} — annual rate must be non-negative")]
    InvalidRate(Decimal),

    #[error("Invalid term: {0}")]
    InvalidTerm(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for AmortError {
    fn from(e: serde_json::Error) -> Self {
        AmortError::SerializationError(e.to_string())
    }
}
