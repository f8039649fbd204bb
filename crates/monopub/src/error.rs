use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Operation(#[from] monopub_operations::OperationError),

    #[error("failed to determine current directory")]
    CurrentDir(#[source] std::io::Error),

    #[error("no changed packages found")]
    NothingChanged,
}

pub type Result<T> = std::result::Result<T, CliError>;
