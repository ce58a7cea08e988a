//! Dashboard-style prospect filter (partner type, owner).
//! `None` means "no restriction"; an empty list matches nothing.

use serde::{Deserialize, Serialize};

use crate::prospect::{PartnerType, Prospect};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProspectFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner_types: Option<Vec<PartnerType>>,
    /// Owners compared trimmed and case-insensitive. Rows without an owner
    /// never match an owner restriction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owners: Option<Vec<String>>,
}

impl ProspectFilter {
    pub fn is_empty(&self) -> bool {
        self.partner_types.is_none() && self.owners.is_none()
    }

    pub fn partner_types(mut self, pts: impl IntoIterator<Item = PartnerType>) -> Self {
        self.partner_types = Some(pts.into_iter().collect());
        self
    }

    pub fn owners<S: Into<String>>(mut self, owners: impl IntoIterator<Item = S>) -> Self {
        self.owners = Some(owners.into_iter().map(Into::into).collect());
        self
    }

    pub fn matches(&self, p: &Prospect) -> bool {
        if let Some(pts) = &self.partner_types {
            if !pts.contains(&p.partner_type) {
                return false;
            }
        }
        if let Some(owners) = &self.owners {
            let Some(owner) = p.owner.as_deref() else {
                return false;
            };
            if !owners.iter().any(|o| o.trim().eq_ignore_ascii_case(owner)) {
                return false;
            }
        }
        true
    }

    pub fn apply(&self, prospects: &[Prospect]) -> Vec<Prospect> {
        prospects.iter().filter(|p| self.matches(p)).cloned().collect()
    }
}
