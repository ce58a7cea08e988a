//! Ranked and recency selections for the presentation layer.

use crate::prospect::{ContactEvent, PartnerType, Prospect};

pub const TOP_DEALS_PER_PARTNER: usize = 3;
pub const RECENT_ACTIVITY_LIMIT: usize = 10;

/// Highest expected value first. Stable: equal values keep input order.
pub fn sort_by_expected_value(deals: &mut [Prospect]) {
    deals.sort_by(|a, b| b.expected_value.total_cmp(&a.expected_value));
}

/// Top `n` live (non-Dead) deals of one partner type by expected value.
/// Ties keep input order. Empty when the partner type has no deals.
pub fn top_deals(prospects: &[Prospect], partner_type: PartnerType, n: usize) -> Vec<Prospect> {
    let mut picked: Vec<Prospect> = prospects
        .iter()
        .filter(|p| p.partner_type == partner_type && !p.stage_bucket.is_dead())
        .cloned()
        .collect();
    sort_by_expected_value(&mut picked);
    picked.truncate(n);
    picked
}

/// The `limit` most recent contacts. Undated contacts sort last, in input order.
pub fn recent_activity(contacts: &[ContactEvent], limit: usize) -> Vec<ContactEvent> {
    let mut sorted: Vec<&ContactEvent> = contacts.iter().collect();
    // `None < Some(_)`, so comparing b to a puts undated rows at the end.
    sorted.sort_by(|a, b| b.contact_date.cmp(&a.contact_date));
    sorted.into_iter().take(limit).cloned().collect()
}
