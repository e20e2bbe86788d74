pub mod categories;
pub mod config;
pub mod error;
pub mod types;

#[cfg(feature = "planning")]
pub mod planning;

#[cfg(feature = "analysis")]
pub mod analysis;

pub use config::{AllocationConfig, ConfigStore, ConfigUpdate};
pub use error::IdleCashError;
pub use types::*;

/// Standard result type for all idle-cash operations
pub type IdleCashResult<T> = Result<T, IdleCashError>;
