//! Batch-wide probability scale decision.
//!
//! Some workbooks store probability as a fraction (0.0–1.0), others as a
//! percentage (0–100). The decision is made once per batch from the raw values
//! and then passed explicitly into record construction; it is never re-derived
//! from already-scaled values.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbabilityScale {
    /// Max raw value ≤ 1.0: every value is multiplied by 100.
    Fraction,
    /// Values are already 0–100.
    Percent,
    /// No record has a probability; nothing to scale.
    Absent,
}

impl ProbabilityScale {
    /// Decide from raw values. Absent (and NaN) values are ignored; input order does not matter.
    pub fn detect<I>(raw: I) -> Self
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        let max = raw
            .into_iter()
            .flatten()
            .filter(|p| !p.is_nan())
            .fold(None, |acc: Option<f64>, p| Some(acc.map_or(p, |m| m.max(p))));
        match max {
            None => ProbabilityScale::Absent,
            Some(m) if m <= 1.0 => ProbabilityScale::Fraction,
            Some(_) => ProbabilityScale::Percent,
        }
    }

    pub fn factor(self) -> f64 {
        match self {
            ProbabilityScale::Fraction => 100.0,
            ProbabilityScale::Percent | ProbabilityScale::Absent => 1.0,
        }
    }

    pub fn apply(self, raw: Option<f64>) -> Option<f64> {
        raw.map(|p| p * self.factor())
    }
}
