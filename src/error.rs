//! Structural errors of the engine.
//!
//! Only shape problems are errors. Bad cells never are: each one degrades to
//! its documented fallback (zero, absent, falsy) in `normalize::coerce`.

use serde::Serialize;
use thiserror::Error;

/// Which input batch an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchKind {
    /// Sponsorships + Public Investment, checked as one merged shape.
    Prospects,
    Contacts,
}

impl std::fmt::Display for BatchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BatchKind::Prospects => f.write_str("prospects sheets"),
            BatchKind::Contacts => f.write_str("Contact Detail"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// A required column is missing from the batch shape; nothing was processed.
    #[error("expected column `{column}` not found in {batch}")]
    MissingColumn { batch: BatchKind, column: String },
}

impl PipelineError {
    pub fn missing_column(batch: BatchKind, column: impl Into<String>) -> Self {
        Self::MissingColumn {
            batch,
            column: column.into(),
        }
    }

    pub fn batch(&self) -> BatchKind {
        match self {
            PipelineError::MissingColumn { batch, .. } => *batch,
        }
    }
}
