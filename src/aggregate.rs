//! # Aggregator
//! Roll-ups over classified prospects. Dead deals never enter a summary.
//!
//! All functions are pure and independent of input order: sums are plain
//! additions and deal counts are distinct-id sets (rows without an id are not
//! counted, as they have no key).

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::prospect::{PartnerType, Prospect, StageBucket, STAGE_ORDER};
use crate::select::sort_by_expected_value;

/// One `(stage, partner type)` row of the grouped summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    pub stage: StageBucket,
    pub partner_type: PartnerType,
    pub expected_total: f64,
    pub projected_total: f64,
    pub contracted_total: f64,
    pub deal_count: usize,
}

/// One row of the overall (all partner types) summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageTotal {
    pub stage: StageBucket,
    pub expected_total: f64,
    pub deal_count: usize,
}

/// Headline KPIs. Unlike the summaries this counts every record it is given,
/// Dead ones included.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Snapshot {
    pub total_expected: f64,
    pub total_projected: f64,
    pub total_contracted: f64,
    pub active_prospects: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardColumn {
    pub stage: StageBucket,
    pub deal_count: usize,
    /// Sorted by expected value, highest first.
    pub deals: Vec<Prospect>,
}

/// One tab of the stage board: "All" or a single partner type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardTab {
    pub scope: String,
    pub columns: Vec<BoardColumn>,
}

#[derive(Default)]
struct Acc<'a> {
    expected: f64,
    projected: f64,
    contracted: f64,
    ids: BTreeSet<&'a str>,
}

impl<'a> Acc<'a> {
    fn add(&mut self, p: &'a Prospect) {
        self.expected += p.expected_value;
        self.projected += p.projected_annual_revenue;
        self.contracted += p.contracted_annual_revenue;
        if let Some(id) = p.id.as_deref() {
            self.ids.insert(id);
        }
    }
}

fn live(prospects: &[Prospect]) -> impl Iterator<Item = &Prospect> {
    prospects.iter().filter(|p| !p.stage_bucket.is_dead())
}

/// Group by `(stage, partner type)`. Rows come out in canonical stage order,
/// Sponsorship before Public Investment; empty groups are omitted.
pub fn grouped_summary(prospects: &[Prospect]) -> Vec<GroupSummary> {
    let mut groups: BTreeMap<(StageBucket, PartnerType), Acc> = BTreeMap::new();
    for p in live(prospects) {
        groups.entry((p.stage_bucket, p.partner_type)).or_default().add(p);
    }
    groups
        .into_iter()
        .map(|((stage, partner_type), acc)| GroupSummary {
            stage,
            partner_type,
            expected_total: acc.expected,
            projected_total: acc.projected,
            contracted_total: acc.contracted,
            deal_count: acc.ids.len(),
        })
        .collect()
}

/// Per-stage totals reindexed to `STAGE_ORDER`: always exactly five rows,
/// stages without deals read as zero.
pub fn overall_summary(prospects: &[Prospect]) -> Vec<StageTotal> {
    let mut by_stage: BTreeMap<StageBucket, Acc> = BTreeMap::new();
    for p in live(prospects) {
        by_stage.entry(p.stage_bucket).or_default().add(p);
    }
    STAGE_ORDER
        .iter()
        .map(|&stage| match by_stage.get(&stage) {
            Some(acc) => StageTotal {
                stage,
                expected_total: acc.expected,
                deal_count: acc.ids.len(),
            },
            None => StageTotal {
                stage,
                expected_total: 0.0,
                deal_count: 0,
            },
        })
        .collect()
}

pub fn snapshot(prospects: &[Prospect]) -> Snapshot {
    let mut acc = Acc::default();
    for p in prospects {
        acc.add(p);
    }
    Snapshot {
        total_expected: acc.expected,
        total_projected: acc.projected,
        total_contracted: acc.contracted,
        active_prospects: acc.ids.len(),
    }
}

/// Stage board: an "All" tab plus one tab per partner type that has live deals,
/// ordered by label. Empty when there are no live deals at all.
pub fn pipeline_board(prospects: &[Prospect]) -> Vec<BoardTab> {
    let active: Vec<&Prospect> = live(prospects).collect();
    if active.is_empty() {
        return Vec::new();
    }

    let mut present: Vec<PartnerType> = active.iter().map(|p| p.partner_type).collect();
    present.sort_by_key(|pt| pt.label());
    present.dedup();
    let mut tabs = vec![board_tab("All".to_string(), &active)];
    for pt in present {
        let subset: Vec<&Prospect> = active
            .iter()
            .copied()
            .filter(|p| p.partner_type == pt)
            .collect();
        tabs.push(board_tab(pt.label().to_string(), &subset));
    }
    tabs
}

fn board_tab(scope: String, deals: &[&Prospect]) -> BoardTab {
    let columns = STAGE_ORDER
        .iter()
        .map(|&stage| {
            let mut in_stage: Vec<Prospect> = deals
                .iter()
                .filter(|p| p.stage_bucket == stage)
                .map(|p| (*p).clone())
                .collect();
            sort_by_expected_value(&mut in_stage);
            BoardColumn {
                stage,
                deal_count: in_stage.len(),
                deals: in_stage,
            }
        })
        .collect();
    BoardTab { scope, columns }
}
