use alias_core::{AliasError, ErrorInfo};
use thiserror::Error;

/// Failures raised by the Romberg demo.
#[derive(Debug, Error)]
pub enum RombergError {
    /// Alias operations on the parameter slots or the working table.
    #[error(transparent)]
    Alias(#[from] AliasError),
    /// Reading prompts or configuration files.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Invalid or unreadable run configuration.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Interactive input ended or produced an unusable value.
    #[error("input error: {0}")]
    Input(ErrorInfo),
    /// The working table held something other than a number.
    #[error("table error: {0}")]
    Table(ErrorInfo),
}

pub(crate) fn config_error(code: &str, message: impl Into<String>) -> RombergError {
    RombergError::Config(ErrorInfo::new(code, message))
}
