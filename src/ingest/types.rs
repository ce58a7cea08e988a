// src/ingest/types.rs
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// One sheet row: field name → raw cell. Cells stay untyped until normalization.
pub type RawRow = BTreeMap<String, Value>;

/// One sheet worth of rows, plus the header when the exporter knows it.
///
/// Accepts either a bare JSON array of row objects or
/// `{ "columns": [...], "rows": [...] }` (keeps headers of empty sheets).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawBatchRepr")]
pub struct RawBatch {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<String>,
    pub rows: Vec<RawRow>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawBatchRepr {
    Rows(Vec<RawRow>),
    Sheet {
        #[serde(default)]
        columns: Vec<String>,
        #[serde(default)]
        rows: Vec<RawRow>,
    },
}

impl From<RawBatchRepr> for RawBatch {
    fn from(r: RawBatchRepr) -> Self {
        match r {
            RawBatchRepr::Rows(rows) => Self {
                columns: Vec::new(),
                rows,
            },
            RawBatchRepr::Sheet { columns, rows } => Self { columns, rows },
        }
    }
}

impl RawBatch {
    pub fn from_rows(rows: Vec<RawRow>) -> Self {
        Self {
            columns: Vec::new(),
            rows,
        }
    }

    /// Shape of the sheet: declared header plus every key seen in any row.
    pub fn column_set(&self) -> BTreeSet<&str> {
        let mut set: BTreeSet<&str> = self.columns.iter().map(String::as_str).collect();
        for row in &self.rows {
            set.extend(row.keys().map(String::as_str));
        }
        set
    }

    /// No rows and no declared header: nothing to check, nothing to process.
    pub fn is_shapeless(&self) -> bool {
        self.columns.is_empty() && self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Everything one workbook upload carries into the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workbook {
    #[serde(default)]
    pub sponsorships: RawBatch,
    #[serde(default)]
    pub public_investment: RawBatch,
    #[serde(default)]
    pub contacts: RawBatch,
    /// Opaque metadata sheet, forwarded untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dictionary: Option<RawBatch>,
}
