// src/ingest/mod.rs
pub mod columns;
pub mod types;

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub use types::{RawBatch, RawRow, Workbook};

/// Load a workbook that was exported to JSON (one key per sheet).
pub fn load_workbook_from(path: &Path) -> Result<Workbook> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading workbook from {}", path.display()))?;
    parse_workbook(&content).with_context(|| format!("parsing workbook {}", path.display()))
}

pub fn parse_workbook(s: &str) -> Result<Workbook> {
    let wb: Workbook = serde_json::from_str(s)?;
    tracing::debug!(
        target: "pipeline",
        sponsorships = wb.sponsorships.len(),
        public_investment = wb.public_investment.len(),
        contacts = wb.contacts.len(),
        has_dictionary = wb.data_dictionary.is_some(),
        "workbook parsed"
    );
    Ok(wb)
}
