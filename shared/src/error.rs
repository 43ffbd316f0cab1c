//! Error taxonomy shared by the dispatch and triage services

use serde::Serialize;
use std::fmt;
use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Debug, Error)]
pub enum CoreError {
    /// Malformed caller input. Surfaces as a client error.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The upstream snapshot could not be obtained. Not retried here.
    #[error("dependency failure while loading {context}")]
    Dependency {
        context: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl CoreError {
    pub fn invalid(message: impl Into<String>) -> Self {
        CoreError::InvalidArgument(message.into())
    }

    pub fn dependency(context: &'static str, source: anyhow::Error) -> Self {
        CoreError::Dependency {
            context,
            source: source.into(),
        }
    }

    pub fn is_client_error(&self) -> bool {
        matches!(self, CoreError::InvalidArgument(_))
    }
}

/// A single malformed record inside an otherwise usable snapshot.
///
/// The record stays in the result; this annotation travels with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataIntegrityWarning {
    pub record_id: String,
    pub field: &'static str,
    pub reason: String,
}

impl DataIntegrityWarning {
    pub fn new(record_id: impl Into<String>, field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            record_id: record_id.into(),
            field,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for DataIntegrityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "record {} has bad {}: {}", self.record_id, self.field, self.reason)
    }
}
