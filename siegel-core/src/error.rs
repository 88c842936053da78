//! Error types for signal evaluation.
//!
//! Every failure that reaches the state tracker is a "data error": the run
//! cannot produce a trustworthy signal and the notification layer must alert
//! instead of staying silent.

use crate::config::ConfigError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SignalError {
    #[error("insufficient history: {required} weekly bars required, {available} available")]
    InsufficientHistory { required: usize, available: usize },

    #[error("malformed input at bar {index}: {reason}")]
    MalformedInput { index: usize, reason: String },

    #[error("no price data available")]
    DataUnavailable,

    #[error("stop-loss {stop:.4} is above close {close:.4} while a long position is held")]
    InvalidStop { stop: f64, close: f64 },

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

impl SignalError {
    pub fn kind(&self) -> DataErrorKind {
        match self {
            SignalError::InsufficientHistory { .. } => DataErrorKind::InsufficientHistory,
            SignalError::MalformedInput { .. } => DataErrorKind::MalformedInput,
            SignalError::DataUnavailable => DataErrorKind::DataUnavailable,
            SignalError::InvalidStop { .. } => DataErrorKind::InvalidStop,
            SignalError::Config(_) => DataErrorKind::Configuration,
        }
    }

    pub fn malformed(index: usize, reason: impl Into<String>) -> Self {
        SignalError::MalformedInput {
            index,
            reason: reason.into(),
        }
    }
}

/// Serializable classification of a data error, for downstream escalation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataErrorKind {
    InsufficientHistory,
    MalformedInput,
    DataUnavailable,
    InvalidStop,
    Configuration,
}

/// A data error as it appears in a run outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataErrorReport {
    pub kind: DataErrorKind,
    pub message: String,
}

impl From<&SignalError> for DataErrorReport {
    fn from(err: &SignalError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}
