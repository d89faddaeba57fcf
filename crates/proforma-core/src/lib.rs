pub mod error;
pub mod types;

#[cfg(feature = "proforma")]
pub mod proforma;

#[cfg(feature = "profile")]
pub mod profile;

#[cfg(feature = "fees")]
pub mod fees;

pub use error::ProFormaError;
pub use types::*;

/// Standard result type for all pro forma operations
pub type ProFormaResult<T> = Result<T, ProFormaError>;
