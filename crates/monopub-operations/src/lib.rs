mod error;
pub mod operations;
pub mod providers;
pub mod traits;
pub mod types;

#[cfg(test)]
pub mod mocks;

pub use error::{OperationError, RegistryAction, Result, ValidationError};
