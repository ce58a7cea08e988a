//! # Report Engine
//! Pure pipeline `Workbook` → `PipelineReport`:
//! normalize (with the batch scale decision) → classify → filter →
//! {aggregate, rank, recency}. No I/O; the only side effects are metrics.

use metrics::{counter, gauge};
use serde::Serialize;
use tracing::info;

use crate::aggregate::{self, BoardTab, GroupSummary, Snapshot, StageTotal};
use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::filter::ProspectFilter;
use crate::ingest::{RawBatch, Workbook};
use crate::normalize::{normalize_workbook, NormalizedBatch, ProbabilityScale};
use crate::prospect::{ContactEvent, PartnerType, Prospect};
use crate::select;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopDeals {
    pub partner_type: PartnerType,
    pub deals: Vec<Prospect>,
}

/// Everything the presentation layer consumes for one batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineReport {
    pub scale: ProbabilityScale,
    pub dropped_prospects: usize,
    pub dropped_contacts: usize,
    pub snapshot: Snapshot,
    pub grouped_summary: Vec<GroupSummary>,
    pub overall_summary: Vec<StageTotal>,
    /// One entry per partner type, Sponsorship first.
    pub top_deals: Vec<TopDeals>,
    pub board: Vec<BoardTab>,
    pub recent_activity: Vec<ContactEvent>,
    /// Full classified set (unfiltered) for ad-hoc filtering by the caller.
    pub prospects: Vec<Prospect>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dictionary: Option<RawBatch>,
}

/// Same pipeline as `POST /report`, usable without the HTTP layer.
pub fn build_report(
    wb: &Workbook,
    filter: &ProspectFilter,
    cfg: &PipelineConfig,
) -> Result<PipelineReport, PipelineError> {
    crate::metrics::ensure_described();
    let batch = normalize_workbook(wb, &cfg.truthy_tokens)?;
    Ok(report_from_batch(batch, filter, cfg, wb.data_dictionary.clone()))
}

pub fn report_from_batch(
    batch: NormalizedBatch,
    filter: &ProspectFilter,
    cfg: &PipelineConfig,
    data_dictionary: Option<RawBatch>,
) -> PipelineReport {
    for p in &batch.prospects {
        counter!("pipeline_stage_total", "stage" => p.stage_bucket.label()).increment(1);
    }

    let view = if filter.is_empty() {
        batch.prospects.clone()
    } else {
        filter.apply(&batch.prospects)
    };

    let top_deals = PartnerType::ALL
        .iter()
        .map(|&pt| TopDeals {
            partner_type: pt,
            deals: select::top_deals(&view, pt, cfg.top_deals_per_partner),
        })
        .collect();

    let report = PipelineReport {
        scale: batch.scale,
        dropped_prospects: batch.dropped_prospects,
        dropped_contacts: batch.dropped_contacts,
        snapshot: aggregate::snapshot(&view),
        grouped_summary: aggregate::grouped_summary(&view),
        overall_summary: aggregate::overall_summary(&view),
        top_deals,
        board: aggregate::pipeline_board(&view),
        recent_activity: select::recent_activity(&batch.contacts, cfg.recent_activity_limit),
        prospects: batch.prospects,
        data_dictionary,
    };

    gauge!("pipeline_last_run_ts").set(chrono::Utc::now().timestamp() as f64);
    info!(
        target: "pipeline",
        prospects = report.prospects.len(),
        in_view = view.len(),
        groups = report.grouped_summary.len(),
        recent = report.recent_activity.len(),
        "report built"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prospect::{StageBucket, STAGE_ORDER};
    use serde_json::json;

    fn wb(v: serde_json::Value) -> Workbook {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn report_has_every_view() {
        let w = wb(json!({
            "sponsorships": [
                {"Prospect ID": "S1", "Prospect (Account Name)": "Acme", "Owner": "Dana",
                 "Expected Value ($)": 500, "Probability (%)": 0.8},
                {"Prospect ID": "S2", "Prospect (Account Name)": "Beta", "Owner": "Lee",
                 "Expected Value ($)": 900, "Dead": "x"}
            ],
            "public_investment": [
                {"Prospect ID": "P1", "Prospect (Account Name)": "City", "Owner": "Dana",
                 "Expected Value ($)": 300, "Probability (%)": 0.2}
            ],
            "contacts": [
                {"Prospect (Account Name)": "Acme", "Contact Date": "2025-05-01"}
            ],
            "data_dictionary": [{"Field": "Owner", "Meaning": "AE"}]
        }));
        let r = build_report(&w, &ProspectFilter::default(), &PipelineConfig::default()).unwrap();

        assert_eq!(r.scale, ProbabilityScale::Fraction);
        assert_eq!(r.prospects.len(), 3);
        assert_eq!(r.prospects[0].stage_bucket, StageBucket::Over75);
        assert_eq!(r.prospects[2].stage_bucket, StageBucket::Under50);

        let stages: Vec<StageBucket> = r.overall_summary.iter().map(|s| s.stage).collect();
        assert_eq!(stages, STAGE_ORDER.to_vec());
        assert_eq!(r.snapshot.total_expected, 1700.0);
        assert_eq!(r.top_deals[0].partner_type, PartnerType::Sponsorship);
        assert_eq!(r.top_deals[0].deals.len(), 1);
        assert_eq!(r.recent_activity.len(), 1);
        assert!(r.data_dictionary.is_some());
    }

    #[test]
    fn filter_narrows_views_but_not_the_full_set() {
        let w = wb(json!({
            "sponsorships": [
                {"Prospect ID": "S1", "Prospect (Account Name)": "Acme", "Owner": "Dana", "Expected Value ($)": 500},
                {"Prospect ID": "S2", "Prospect (Account Name)": "Beta", "Owner": "Lee", "Expected Value ($)": 100}
            ],
            "contacts": {"columns": ["Prospect (Account Name)"], "rows": []}
        }));
        let f = ProspectFilter::default().owners(["Lee"]);
        let r = build_report(&w, &f, &PipelineConfig::default()).unwrap();
        assert_eq!(r.prospects.len(), 2);
        assert_eq!(r.snapshot.total_expected, 100.0);
        assert_eq!(r.overall_summary[0].deal_count, 1);
        assert!(r.recent_activity.is_empty());
    }
}
