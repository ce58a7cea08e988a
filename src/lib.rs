// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod aggregate;
pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod filter;
pub mod ingest;
pub mod metrics;
pub mod normalize;
pub mod prospect;
pub mod select;
pub mod stage;

// ---- Re-exports for stable public API ----
pub use crate::api::router;
pub use crate::config::PipelineConfig;
pub use crate::engine::{build_report, PipelineReport};
pub use crate::error::{BatchKind, PipelineError};
pub use crate::prospect::{ContactEvent, PartnerType, Prospect, StageBucket, STAGE_ORDER};
