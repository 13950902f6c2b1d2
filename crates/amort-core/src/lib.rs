pub mod amortization;
pub mod dating;
pub mod error;
pub mod time_value;
pub mod types;

pub use error::AmortError;
pub use types::*;

/// Standard result type for all engine operations
pub type AmortResult<T> = Result<T, AmortError>;
