//! prospect.rs — Typované záznamy pipeline: prospekty, kontakty a stage buckety.
//!
//! Records are built once per batch by `normalize` and never mutated afterwards;
//! every later step (aggregation, selection) produces new derived structures.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Provenance of a prospect row (which sheet it came from).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PartnerType {
    #[serde(rename = "Sponsorship")]
    Sponsorship,
    #[serde(rename = "Public Investment")]
    PublicInvestment,
}

impl PartnerType {
    pub const ALL: [PartnerType; 2] = [PartnerType::Sponsorship, PartnerType::PublicInvestment];

    pub fn label(self) -> &'static str {
        match self {
            PartnerType::Sponsorship => "Sponsorship",
            PartnerType::PublicInvestment => "Public Investment",
        }
    }

    /// Free-text partner type from the contact log ("sponsor...", "Public ...").
    pub fn from_free_text(raw: &str) -> Option<Self> {
        let s = raw.trim().to_lowercase();
        if s.starts_with("sponsor") {
            Some(PartnerType::Sponsorship)
        } else if s.starts_with("public") {
            Some(PartnerType::PublicInvestment)
        } else {
            None
        }
    }
}

/// Odvozený stav obchodu v pipeline. Pořadí variant = kanonické pořadí.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StageBucket {
    #[serde(rename = "Lead")]
    Lead,
    #[serde(rename = "Under 50%")]
    Under50,
    #[serde(rename = "50–75%")]
    Between50And75,
    #[serde(rename = "Over 75%")]
    Over75,
    #[serde(rename = "Contracted")]
    Contracted,
    #[serde(rename = "Dead")]
    Dead,
}

/// Presentation order of every roll-up. Dead is never part of it.
pub const STAGE_ORDER: [StageBucket; 5] = [
    StageBucket::Lead,
    StageBucket::Under50,
    StageBucket::Between50And75,
    StageBucket::Over75,
    StageBucket::Contracted,
];

impl StageBucket {
    pub fn label(self) -> &'static str {
        match self {
            StageBucket::Lead => "Lead",
            StageBucket::Under50 => "Under 50%",
            StageBucket::Between50And75 => "50–75%",
            StageBucket::Over75 => "Over 75%",
            StageBucket::Contracted => "Contracted",
            StageBucket::Dead => "Dead",
        }
    }

    /// Dead deals are excluded from summaries, boards and top-N lists.
    pub fn is_dead(self) -> bool {
        matches!(self, StageBucket::Dead)
    }
}

/// Stage flag columns, already parsed from their free-text cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageFlags {
    #[serde(default)]
    pub dead: bool,
    #[serde(default)]
    pub contracted: bool,
    #[serde(default)]
    pub lead: bool,
    #[serde(default)]
    pub prospect: bool,
    #[serde(default)]
    pub under50: bool,
    #[serde(default)]
    pub between50and75: bool,
    #[serde(default)]
    pub over75: bool,
}

/// Jeden řádek z listů Sponsorships / Public Investment po normalizaci.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prospect {
    /// Count key for distinct deal counts; not guaranteed unique.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_name: Option<String>,
    pub partner_type: PartnerType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    pub projected_annual_revenue: f64,
    pub contracted_annual_revenue: f64,
    pub expected_value: f64,
    /// Always on the 0–100 scale; `None` means the cell was empty or unparseable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probability_percent: Option<f64>,
    pub term_years: f64,
    pub flags: StageFlags,
    pub stage_bucket: StageBucket,
    /// Name of the cascade rule that produced `stage_bucket`.
    pub stage_rule: &'static str,
}

/// Jeden záznam z listu Contact Detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactEvent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner_type: Option<PartnerType>,
    /// `None` when the cell was empty or not a recognisable date.
    #[serde(default)]
    pub contact_date: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up_date: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_step: Option<String>,
}

impl ContactEvent {
    /// Skeletální kontakt jen se jménem účtu a datem (testy, demo).
    pub fn new(account_name: impl Into<String>, contact_date: Option<NaiveDateTime>) -> Self {
        Self {
            account_name: Some(account_name.into()),
            partner_type: None,
            contact_date,
            follow_up_date: None,
            contact_type: None,
            owner: None,
            contact_name: None,
            outcome: None,
            next_step: None,
        }
    }
}
