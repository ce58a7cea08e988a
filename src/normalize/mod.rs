// src/normalize/mod.rs
//! Record Normalizer: raw sheet rows → typed `Prospect` / `ContactEvent`.
//!
//! Two phases for prospects:
//! 1) every row becomes a `ProspectDraft` holding its raw probability,
//!    and the batch scale decision is computed from those drafts;
//! 2) drafts are finished with that decision and classified.

pub mod coerce;
pub mod scale;

use metrics::counter;
use std::collections::BTreeSet;
use tracing::{debug, info};

use crate::error::{BatchKind, PipelineError};
use crate::ingest::columns as col;
use crate::ingest::{RawBatch, RawRow, Workbook};
use crate::prospect::{ContactEvent, PartnerType, Prospect, StageFlags};
use crate::stage::{classify, StageSignals};

pub use coerce::{default_tokens, DEFAULT_TRUTHY_TOKENS};
pub use scale::ProbabilityScale;

/// Everything the normalizer produced for one batch.
#[derive(Debug, Clone)]
pub struct NormalizedBatch {
    pub prospects: Vec<Prospect>,
    pub contacts: Vec<ContactEvent>,
    pub scale: ProbabilityScale,
    pub dropped_prospects: usize,
    pub dropped_contacts: usize,
}

/// Check the shape of every batch, then normalize. Nothing is classified
/// unless both the prospect and the contact shapes are valid.
pub fn normalize_workbook(
    wb: &Workbook,
    truthy_tokens: &[String],
) -> Result<NormalizedBatch, PipelineError> {
    validate_prospect_shape(&wb.sponsorships, &wb.public_investment)?;
    validate_contact_shape(&wb.contacts)?;

    let prospects = normalize_prospects(&wb.sponsorships, &wb.public_investment, truthy_tokens)?;
    let contacts = normalize_contacts(&wb.contacts)?;

    Ok(NormalizedBatch {
        prospects: prospects.prospects,
        contacts: contacts.contacts,
        scale: prospects.scale,
        dropped_prospects: prospects.dropped,
        dropped_contacts: contacts.dropped,
    })
}

#[derive(Debug, Clone)]
pub struct ProspectBatch {
    pub prospects: Vec<Prospect>,
    pub scale: ProbabilityScale,
    pub dropped: usize,
}

#[derive(Debug, Clone)]
pub struct ContactBatch {
    pub contacts: Vec<ContactEvent>,
    pub dropped: usize,
}

/// Merge both provenance sheets, tag partner type, coerce and classify.
pub fn normalize_prospects(
    sponsorships: &RawBatch,
    public_investment: &RawBatch,
    truthy_tokens: &[String],
) -> Result<ProspectBatch, PipelineError> {
    validate_prospect_shape(sponsorships, public_investment)?;

    let tagged = sponsorships
        .rows
        .iter()
        .map(|r| (PartnerType::Sponsorship, r))
        .chain(
            public_investment
                .rows
                .iter()
                .map(|r| (PartnerType::PublicInvestment, r)),
        );

    let total = sponsorships.len() + public_investment.len();
    let mut drafts = Vec::with_capacity(total);
    for (partner_type, row) in tagged {
        if !coerce::is_present(row.get(col::PROSPECT_ID))
            && !coerce::is_present(row.get(col::ACCOUNT_NAME))
        {
            continue;
        }
        drafts.push(ProspectDraft::from_row(partner_type, row, truthy_tokens));
    }
    let dropped = total - drafts.len();

    // Phase 1 → decision, phase 2 ← decision.
    let scale = ProbabilityScale::detect(drafts.iter().map(|d| d.raw_probability));
    let prospects: Vec<Prospect> = drafts.into_iter().map(|d| d.finish(scale)).collect();

    counter!("pipeline_rows_total", "batch" => "prospects").increment(total as u64);
    counter!("pipeline_rows_dropped_total", "batch" => "prospects").increment(dropped as u64);
    info!(
        target: "pipeline",
        kept = prospects.len(),
        dropped,
        scale = ?scale,
        "prospects normalized"
    );

    Ok(ProspectBatch {
        prospects,
        scale,
        dropped,
    })
}

pub fn normalize_contacts(contacts: &RawBatch) -> Result<ContactBatch, PipelineError> {
    validate_contact_shape(contacts)?;

    let total = contacts.len();
    let kept: Vec<ContactEvent> = contacts
        .rows
        .iter()
        .filter(|r| {
            coerce::is_present(r.get(col::ACCOUNT_NAME)) || coerce::is_present(r.get(col::CONTACT_DATE))
        })
        .map(contact_from_row)
        .collect();
    let dropped = total - kept.len();

    let undated = kept.iter().filter(|c| c.contact_date.is_none()).count();
    counter!("pipeline_rows_total", "batch" => "contacts").increment(total as u64);
    counter!("pipeline_rows_dropped_total", "batch" => "contacts").increment(dropped as u64);
    debug!(
        target: "pipeline",
        kept = kept.len(),
        dropped,
        undated,
        "contacts normalized"
    );

    Ok(ContactBatch {
        contacts: kept,
        dropped,
    })
}

fn validate_prospect_shape(
    sponsorships: &RawBatch,
    public_investment: &RawBatch,
) -> Result<(), PipelineError> {
    if sponsorships.is_shapeless() && public_investment.is_shapeless() {
        return Ok(());
    }
    let mut merged = sponsorships.column_set();
    merged.extend(public_investment.column_set());
    require_columns(BatchKind::Prospects, merged, &col::REQUIRED_PROSPECT_COLUMNS)
}

/// An empty contact log (`[]` or left out) is valid and yields no contacts.
fn validate_contact_shape(contacts: &RawBatch) -> Result<(), PipelineError> {
    if contacts.is_shapeless() {
        return Ok(());
    }
    require_columns(BatchKind::Contacts, contacts.column_set(), &col::REQUIRED_CONTACT_COLUMNS)
}

fn require_columns(
    batch: BatchKind,
    present: BTreeSet<&str>,
    required: &[&str],
) -> Result<(), PipelineError> {
    match required.iter().find(|c| !present.contains(*c)) {
        Some(missing) => {
            counter!("pipeline_structural_errors_total").increment(1);
            tracing::warn!(target: "pipeline", %batch, column = *missing, "required column missing");
            Err(PipelineError::missing_column(batch, *missing))
        }
        None => Ok(()),
    }
}

/// A prospect row before the batch scale decision exists.
#[derive(Debug, Clone)]
struct ProspectDraft {
    partner_type: PartnerType,
    id: Option<String>,
    account_name: Option<String>,
    owner: Option<String>,
    projected_annual_revenue: f64,
    contracted_annual_revenue: f64,
    expected_value: f64,
    raw_probability: Option<f64>,
    term_years: f64,
    flags: StageFlags,
}

impl ProspectDraft {
    fn from_row(partner_type: PartnerType, row: &RawRow, tokens: &[String]) -> Self {
        let cell = |name: &str| row.get(name);
        let flag = |name: &str| coerce::is_truthy(cell(name), tokens);
        Self {
            partner_type,
            id: coerce::cell_text(cell(col::PROSPECT_ID)),
            account_name: coerce::cell_text(cell(col::ACCOUNT_NAME)),
            owner: coerce::cell_text(cell(col::OWNER)),
            projected_annual_revenue: coerce::amount(cell(col::PROJECTED_REVENUE)),
            contracted_annual_revenue: coerce::amount(cell(col::CONTRACTED_REVENUE)),
            expected_value: coerce::amount(cell(col::EXPECTED_VALUE)),
            raw_probability: coerce::cell_number(cell(col::PROBABILITY)),
            term_years: coerce::amount(cell(col::TERM_YEARS)),
            flags: StageFlags {
                dead: flag(col::FLAG_DEAD),
                contracted: flag(col::FLAG_CONTRACTED),
                lead: flag(col::FLAG_LEAD),
                prospect: flag(col::FLAG_PROSPECT),
                under50: flag(col::FLAG_UNDER_50),
                between50and75: flag(col::FLAG_50_75),
                over75: flag(col::FLAG_OVER_75),
            },
        }
    }

    fn finish(self, scale: ProbabilityScale) -> Prospect {
        let probability_percent = scale.apply(self.raw_probability);
        let c = classify(&StageSignals {
            flags: self.flags,
            contracted_annual_revenue: self.contracted_annual_revenue,
            probability_percent,
        });
        Prospect {
            id: self.id,
            account_name: self.account_name,
            partner_type: self.partner_type,
            owner: self.owner,
            projected_annual_revenue: self.projected_annual_revenue,
            contracted_annual_revenue: self.contracted_annual_revenue,
            expected_value: self.expected_value,
            probability_percent,
            term_years: self.term_years,
            flags: self.flags,
            stage_bucket: c.bucket,
            stage_rule: c.rule,
        }
    }
}

fn contact_from_row(row: &RawRow) -> ContactEvent {
    let text = |name: &str| coerce::cell_text(row.get(name));
    ContactEvent {
        account_name: text(col::ACCOUNT_NAME),
        partner_type: text(col::CONTACT_PARTNER_TYPE)
            .as_deref()
            .and_then(PartnerType::from_free_text),
        contact_date: coerce::cell_datetime(row.get(col::CONTACT_DATE)),
        follow_up_date: coerce::cell_datetime(row.get(col::FOLLOW_UP_DATE)),
        contact_type: text(col::CONTACT_TYPE),
        owner: text(col::CONTACT_OWNER),
        contact_name: text(col::CONTACT_NAME),
        outcome: text(col::OUTCOME),
        next_step: text(col::NEXT_STEP),
    }
}
