//! Shared error type across reqmon crates.

use thiserror::Error;

/// Stable error codes (safe to match on or log).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Configuration rejected by validation or parsing.
    InvalidConfig,
    /// Metric or label name is malformed.
    InvalidMetric,
    /// A collector with the same family name is already registered.
    AlreadyRegistered,
    /// A descriptor could not be registered while building a monitor.
    Registration,
    /// Label values do not match the declared label names.
    LabelCardinality,
    /// Internal error.
    Internal,
}

impl ErrorCode {
    /// String representation used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidConfig => "INVALID_CONFIG",
            ErrorCode::InvalidMetric => "INVALID_METRIC",
            ErrorCode::AlreadyRegistered => "ALREADY_REGISTERED",
            ErrorCode::Registration => "REGISTRATION",
            ErrorCode::LabelCardinality => "LABEL_CARDINALITY",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, MonitorError>;

/// Unified error type used by core and http.
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("invalid metric '{name}': {reason}")]
    InvalidMetric { name: String, reason: String },
    #[error("duplicate metrics collector registration attempted: {name}")]
    AlreadyRegistered { name: String },
    #[error("register '{name}' metric: {source}")]
    Registration {
        name: String,
        #[source]
        source: Box<MonitorError>,
    },
    #[error("inconsistent label cardinality for '{name}': expected {expected} values, got {actual}")]
    LabelCardinality {
        name: String,
        expected: usize,
        actual: usize,
    },
    #[error("internal: {0}")]
    Internal(String),
}

impl MonitorError {
    /// Map the error to a stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            MonitorError::InvalidConfig(_) => ErrorCode::InvalidConfig,
            MonitorError::InvalidMetric { .. } => ErrorCode::InvalidMetric,
            MonitorError::AlreadyRegistered { .. } => ErrorCode::AlreadyRegistered,
            MonitorError::Registration { .. } => ErrorCode::Registration,
            MonitorError::LabelCardinality { .. } => ErrorCode::LabelCardinality,
            MonitorError::Internal(_) => ErrorCode::Internal,
        }
    }

    /// True when this error (or the registration error it wraps) is a plain
    /// "already registered" conflict.
    pub fn is_already_registered(&self) -> bool {
        match self {
            MonitorError::AlreadyRegistered { .. } => true,
            MonitorError::Registration { source, .. } => source.is_already_registered(),
            _ => false,
        }
    }

    pub(crate) fn invalid_metric(name: &str, reason: impl Into<String>) -> Self {
        MonitorError::InvalidMetric {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}
