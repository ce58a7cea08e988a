// src/config/mod.rs
pub mod pipeline;

pub use pipeline::{PipelineConfig, DEFAULT_PIPELINE_CONFIG_PATH, ENV_PIPELINE_CONFIG_PATH};
