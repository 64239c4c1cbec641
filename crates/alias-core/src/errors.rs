//! Structured error types shared across alias crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`AliasError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (names, indices, lengths, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.context.insert(key.into(), value.to_string());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for alias operations.
///
/// Every failure is raised synchronously by the call that caused it; nothing
/// in this crate catches or retries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum AliasError {
    /// An explicit binding name is missing from the resolved scope.
    #[error("name not found: {0}")]
    NameNotFound(ErrorInfo),
    /// A non-integral index was supplied where an integer was required.
    #[error("invalid index: {0}")]
    InvalidIndex(ErrorInfo),
    /// A resolved index fell outside the referenced sequence.
    #[error("index out of range: {0}")]
    IndexOutOfRange(ErrorInfo),
    /// An indexing key was neither an integer nor a slice.
    #[error("invalid index type: {0}")]
    InvalidIndexType(ErrorInfo),
    /// Pointer arithmetic or a slice write received an unusable operand.
    #[error("invalid operand: {0}")]
    InvalidOperand(ErrorInfo),
    /// Serialization and deserialization errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl AliasError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            AliasError::NameNotFound(info)
            | AliasError::InvalidIndex(info)
            | AliasError::IndexOutOfRange(info)
            | AliasError::InvalidIndexType(info)
            | AliasError::InvalidOperand(info)
            | AliasError::Serde(info) => info,
        }
    }

    /// Returns the stable error code of the payload.
    pub fn code(&self) -> &str {
        &self.info().code
    }

    pub(crate) fn name_not_found(name: &str) -> Self {
        AliasError::NameNotFound(
            ErrorInfo::new("name-not-found", format!("`{name}` is not bound in the scope"))
                .with_context("name", name),
        )
    }

    pub(crate) fn out_of_range(index: i64, len: usize) -> Self {
        AliasError::IndexOutOfRange(
            ErrorInfo::new("index-out-of-range", format!("index ({index}) is out of range"))
                .with_context("index", index)
                .with_context("len", len),
        )
    }
}
