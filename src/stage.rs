//! # Stage Classifier
//! Pure, total mapping `StageSignals` → `StageBucket`.
//!
//! The cascade is a single ordered table of `(predicate, bucket)` rules,
//! evaluated top to bottom; the first match wins. Probability rules only fire
//! when a probability is present, flag rules only when it is absent. If nothing
//! matches, the record is a `Lead`.

use serde::{Deserialize, Serialize};

use crate::prospect::{Prospect, StageBucket, StageFlags};

/// The fields of a record the cascade looks at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StageSignals {
    #[serde(default, flatten)]
    pub flags: StageFlags,
    #[serde(default)]
    pub contracted_annual_revenue: f64,
    /// 0–100 scale (after the batch scale decision).
    #[serde(default)]
    pub probability_percent: Option<f64>,
}

impl StageSignals {
    fn probability(&self) -> Option<f64> {
        self.probability_percent.filter(|p| !p.is_nan())
    }
}

impl From<&Prospect> for StageSignals {
    fn from(p: &Prospect) -> Self {
        Self {
            flags: p.flags,
            contracted_annual_revenue: p.contracted_annual_revenue,
            probability_percent: p.probability_percent,
        }
    }
}

/// One row of the cascade.
#[derive(Clone, Copy)]
pub struct StageRule {
    pub name: &'static str,
    pub bucket: StageBucket,
    applies: fn(&StageSignals) -> bool,
}

impl StageRule {
    pub fn applies(&self, s: &StageSignals) -> bool {
        (self.applies)(s)
    }
}

impl std::fmt::Debug for StageRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StageRule")
            .field("name", &self.name)
            .field("bucket", &self.bucket)
            .finish()
    }
}

/// Result of classifying one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub bucket: StageBucket,
    pub rule: &'static str,
}

pub const DEFAULT_RULE: &str = "default_lead";

pub static CASCADE: &[StageRule] = &[
    StageRule {
        name: "dead_flag",
        bucket: StageBucket::Dead,
        applies: dead_flag,
    },
    StageRule {
        name: "contracted_flag_or_revenue",
        bucket: StageBucket::Contracted,
        applies: contracted_flag_or_revenue,
    },
    StageRule {
        name: "probability_zero",
        bucket: StageBucket::Lead,
        applies: probability_zero,
    },
    StageRule {
        name: "probability_under_50",
        bucket: StageBucket::Under50,
        applies: probability_under_50,
    },
    StageRule {
        name: "probability_50_75",
        bucket: StageBucket::Between50And75,
        applies: probability_under_75,
    },
    StageRule {
        name: "probability_over_75",
        bucket: StageBucket::Over75,
        applies: probability_under_100,
    },
    StageRule {
        name: "probability_full",
        bucket: StageBucket::Contracted,
        applies: probability_present,
    },
    StageRule {
        name: "lead_flag",
        bucket: StageBucket::Lead,
        applies: lead_flag,
    },
    // Prospect rolls up into Lead.
    StageRule {
        name: "prospect_flag",
        bucket: StageBucket::Lead,
        applies: prospect_flag,
    },
    StageRule {
        name: "under_50_flag",
        bucket: StageBucket::Under50,
        applies: under50_flag,
    },
    StageRule {
        name: "50_75_flag",
        bucket: StageBucket::Between50And75,
        applies: between50and75_flag,
    },
    StageRule {
        name: "over_75_flag",
        bucket: StageBucket::Over75,
        applies: over75_flag,
    },
];

/// Run the cascade. Never fails.
pub fn classify(s: &StageSignals) -> Classification {
    CASCADE
        .iter()
        .find(|r| r.applies(s))
        .map(|r| Classification {
            bucket: r.bucket,
            rule: r.name,
        })
        .unwrap_or(Classification {
            bucket: StageBucket::Lead,
            rule: DEFAULT_RULE,
        })
}

pub fn stage_of(s: &StageSignals) -> StageBucket {
    classify(s).bucket
}

// --- predicates ---
// Probability rules are ordered, so each one only needs its upper bound.

fn dead_flag(s: &StageSignals) -> bool {
    s.flags.dead
}

fn contracted_flag_or_revenue(s: &StageSignals) -> bool {
    s.flags.contracted || s.contracted_annual_revenue > 0.0
}

fn probability_zero(s: &StageSignals) -> bool {
    s.probability() == Some(0.0)
}

fn probability_under_50(s: &StageSignals) -> bool {
    s.probability().is_some_and(|p| p < 50.0)
}

fn probability_under_75(s: &StageSignals) -> bool {
    s.probability().is_some_and(|p| p < 75.0)
}

fn probability_under_100(s: &StageSignals) -> bool {
    s.probability().is_some_and(|p| p < 100.0)
}

fn probability_present(s: &StageSignals) -> bool {
    s.probability().is_some()
}

fn lead_flag(s: &StageSignals) -> bool {
    s.probability().is_none() && s.flags.lead
}

fn prospect_flag(s: &StageSignals) -> bool {
    s.probability().is_none() && s.flags.prospect
}

fn under50_flag(s: &StageSignals) -> bool {
    s.probability().is_none() && s.flags.under50
}

fn between50and75_flag(s: &StageSignals) -> bool {
    s.probability().is_none() && s.flags.between50and75
}

fn over75_flag(s: &StageSignals) -> bool {
    s.probability().is_none() && s.flags.over75
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_prob(p: f64) -> StageSignals {
        StageSignals {
            probability_percent: Some(p),
            ..Default::default()
        }
    }

    #[test]
    fn probability_boundaries() {
        let cases = [
            (0.0, StageBucket::Lead),
            (0.001, StageBucket::Under50),
            (49.999, StageBucket::Under50),
            (50.0, StageBucket::Between50And75),
            (74.999, StageBucket::Between50And75),
            (75.0, StageBucket::Over75),
            (99.999, StageBucket::Over75),
            (100.0, StageBucket::Contracted),
            (250.0, StageBucket::Contracted),
        ];
        for (p, want) in cases {
            assert_eq!(stage_of(&with_prob(p)), want, "p = {p}");
        }
    }

    #[test]
    fn dead_beats_everything() {
        let s = StageSignals {
            flags: StageFlags {
                dead: true,
                contracted: true,
                ..Default::default()
            },
            contracted_annual_revenue: 10_000.0,
            probability_percent: Some(100.0),
        };
        let c = classify(&s);
        assert_eq!(c.bucket, StageBucket::Dead);
        assert_eq!(c.rule, "dead_flag");
    }

    #[test]
    fn contracted_revenue_beats_probability() {
        let s = StageSignals {
            contracted_annual_revenue: 1.0,
            probability_percent: Some(10.0),
            ..Default::default()
        };
        assert_eq!(stage_of(&s), StageBucket::Contracted);

        let s = StageSignals {
            contracted_annual_revenue: 0.0,
            probability_percent: Some(60.0),
            ..Default::default()
        };
        assert_eq!(stage_of(&s), StageBucket::Between50And75);
    }

    #[test]
    fn flags_only_used_without_probability() {
        let flags = StageFlags {
            over75: true,
            ..Default::default()
        };
        let with_p = StageSignals {
            flags,
            probability_percent: Some(20.0),
            ..Default::default()
        };
        assert_eq!(stage_of(&with_p), StageBucket::Under50);

        let without_p = StageSignals {
            flags,
            ..Default::default()
        };
        assert_eq!(stage_of(&without_p), StageBucket::Over75);
    }

    #[test]
    fn flag_order_and_prospect_collapses_to_lead() {
        let s = StageSignals {
            flags: StageFlags {
                prospect: true,
                under50: true,
                over75: true,
                ..Default::default()
            },
            ..Default::default()
        };
        let c = classify(&s);
        assert_eq!(c.bucket, StageBucket::Lead);
        assert_eq!(c.rule, "prospect_flag");
    }

    #[test]
    fn nan_probability_counts_as_absent() {
        let s = StageSignals {
            flags: StageFlags {
                between50and75: true,
                ..Default::default()
            },
            probability_percent: Some(f64::NAN),
            ..Default::default()
        };
        assert_eq!(stage_of(&s), StageBucket::Between50And75);
    }

    #[test]
    fn nothing_set_defaults_to_lead() {
        let c = classify(&StageSignals::default());
        assert_eq!(c.bucket, StageBucket::Lead);
        assert_eq!(c.rule, DEFAULT_RULE);
    }

    #[test]
    fn total_over_every_flag_combination() {
        let probs = [None, Some(0.0), Some(30.0), Some(60.0), Some(80.0), Some(100.0)];
        for bits in 0u8..128 {
            let flags = StageFlags {
                dead: bits & 1 != 0,
                contracted: bits & 2 != 0,
                lead: bits & 4 != 0,
                prospect: bits & 8 != 0,
                under50: bits & 16 != 0,
                between50and75: bits & 32 != 0,
                over75: bits & 64 != 0,
            };
            for p in probs {
                for rev in [0.0, 5.0] {
                    let s = StageSignals {
                        flags,
                        contracted_annual_revenue: rev,
                        probability_percent: p,
                    };
                    let c = classify(&s);
                    if flags.dead {
                        assert_eq!(c.bucket, StageBucket::Dead);
                    } else if flags.contracted || rev > 0.0 {
                        assert_eq!(c.bucket, StageBucket::Contracted);
                    }
                    // deterministic
                    assert_eq!(classify(&s), c);
                }
            }
        }
    }
}
