// src/ingest/columns.rs
//! Field names exactly as they appear in the workbook sheets.

// Prospect sheets (Sponsorships, Public Investment)
pub const PROSPECT_ID: &str = "Prospect ID";
pub const ACCOUNT_NAME: &str = "Prospect (Account Name)";
pub const OWNER: &str = "Owner";
pub const PROJECTED_REVENUE: &str = "Projected Annual Revenue ($)";
pub const CONTRACTED_REVENUE: &str = "Contracted Annual Revenue ($)";
pub const PROBABILITY: &str = "Probability (%)";
pub const EXPECTED_VALUE: &str = "Expected Value ($)";
pub const TERM_YEARS: &str = "Term (years)";

// Stage flag columns
pub const FLAG_DEAD: &str = "Dead";
pub const FLAG_CONTRACTED: &str = "Contracted";
pub const FLAG_LEAD: &str = "Lead";
pub const FLAG_PROSPECT: &str = "Prospect";
pub const FLAG_UNDER_50: &str = "Under 50%";
pub const FLAG_50_75: &str = "50-75%";
pub const FLAG_OVER_75: &str = "Over 75%";

// Contact Detail sheet
pub const CONTACT_PARTNER_TYPE: &str = "Prospect (Sponsorship/Public)";
pub const CONTACT_DATE: &str = "Contact Date";
pub const FOLLOW_UP_DATE: &str = "Follow-up Date";
pub const CONTACT_TYPE: &str = "Contact Type (email/phone/zoom/in-person)";
pub const CONTACT_OWNER: &str = "Contact Owner";
pub const CONTACT_NAME: &str = "Contact Name";
pub const OUTCOME: &str = "Outcome (left VM/spoke/meeting set/sent deck/etc.)";
pub const NEXT_STEP: &str = "Next Step";

/// Columns whose absence from the merged prospect shape is fatal.
pub const REQUIRED_PROSPECT_COLUMNS: [&str; 2] = [PROSPECT_ID, ACCOUNT_NAME];

/// Columns whose absence from the contact shape is fatal.
pub const REQUIRED_CONTACT_COLUMNS: [&str; 1] = [ACCOUNT_NAME];
