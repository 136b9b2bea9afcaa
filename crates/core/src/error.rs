//! Domain error model.

use serde::Serialize;
use thiserror::Error;

/// Result type used across the forecasting core.
pub type DomainResult<T> = Result<T, DomainError>;

/// Structured failure surfaced to callers (kind + message).
///
/// Per-product data shortages are recovered inside the aggregator and never
/// reach this type; everything here propagates verbatim to the caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A parameter was outside its domain (e.g. alpha not in (0,1)).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// No usable series for the requested product(s).
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    /// Unknown product or project.
    #[error("not found: {0}")]
    NotFound(String),

    /// A project name collision on create/rename.
    #[error("duplicate name: {0}")]
    DuplicateName(String),

    /// The role gate rejected the principal.
    #[error("unauthorized: {0}")]
    Unauthorized(String),
}

/// Discriminant of [`DomainError`], stable across the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidParameter,
    InsufficientData,
    NotFound,
    DuplicateName,
    Unauthorized,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidParameter => "invalid_parameter",
            ErrorKind::InsufficientData => "insufficient_data",
            ErrorKind::NotFound => "not_found",
            ErrorKind::DuplicateName => "duplicate_name",
            ErrorKind::Unauthorized => "unauthorized",
        }
    }
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DomainError {
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    pub fn insufficient_data(msg: impl Into<String>) -> Self {
        Self::InsufficientData(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn duplicate_name(msg: impl Into<String>) -> Self {
        Self::DuplicateName(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::InvalidParameter(_) => ErrorKind::InvalidParameter,
            DomainError::InsufficientData(_) => ErrorKind::InsufficientData,
            DomainError::NotFound(_) => ErrorKind::NotFound,
            DomainError::DuplicateName(_) => ErrorKind::DuplicateName,
            DomainError::Unauthorized(_) => ErrorKind::Unauthorized,
        }
    }

    /// The caller-facing message without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            DomainError::InvalidParameter(m)
            | DomainError::InsufficientData(m)
            | DomainError::NotFound(m)
            | DomainError::DuplicateName(m)
            | DomainError::Unauthorized(m) => m,
        }
    }
}
