use thiserror::Error;

use crate::types::BumpKeyword;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error(
        "invalid increment keyword '{value}', must be one of: {}",
        BumpKeyword::expected_list()
    )]
    InvalidBumpKeyword { value: String },

    #[error("unknown dependency section '{0}'")]
    UnknownDependencySection(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
