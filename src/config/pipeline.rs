// src/config/pipeline.rs
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::normalize::coerce::default_tokens;
use crate::select::{RECENT_ACTIVITY_LIMIT, TOP_DEALS_PER_PARTNER};

pub const ENV_PIPELINE_CONFIG_PATH: &str = "PIPELINE_CONFIG_PATH";
pub const DEFAULT_PIPELINE_CONFIG_PATH: &str = "config/pipeline.toml";
const FALLBACK_JSON_PATH: &str = "config/pipeline.json";

fn default_top_deals() -> usize {
    TOP_DEALS_PER_PARTNER
}
fn default_recent_limit() -> usize {
    RECENT_ACTIVITY_LIMIT
}

/// Tunables of the report. Every field has a default, so an empty file is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Deals listed per partner type in the "top deals" view.
    #[serde(default = "default_top_deals")]
    pub top_deals_per_partner: usize,
    /// Contacts listed in the recent activity feed.
    #[serde(default = "default_recent_limit")]
    pub recent_activity_limit: usize,
    /// Flag cell values that count as "set".
    #[serde(default = "default_tokens")]
    pub truthy_tokens: Vec<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            top_deals_per_partner: default_top_deals(),
            recent_activity_limit: default_recent_limit(),
            truthy_tokens: default_tokens(),
        }
    }
}

impl PipelineConfig {
    /// Load from an explicit path. Supports TOML or JSON (by extension).
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading pipeline config from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let cfg: PipelineConfig = match ext.as_str() {
            "json" => serde_json::from_str(&content)
                .with_context(|| format!("parsing {}", path.display()))?,
            _ => toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?,
        };
        Ok(cfg.sanitized())
    }

    /// Load using env var + fallbacks:
    /// 1) $PIPELINE_CONFIG_PATH
    /// 2) config/pipeline.toml
    /// 3) config/pipeline.json
    /// 4) built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_PIPELINE_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from(&pb);
            }
            return Err(anyhow!(
                "{ENV_PIPELINE_CONFIG_PATH} points to non-existent path {}",
                pb.display()
            ));
        }
        for candidate in [DEFAULT_PIPELINE_CONFIG_PATH, FALLBACK_JSON_PATH] {
            let p = PathBuf::from(candidate);
            if p.exists() {
                return Self::load_from(&p);
            }
        }
        Ok(Self::default())
    }

    fn sanitized(mut self) -> Self {
        self.top_deals_per_partner = self.top_deals_per_partner.max(1);
        self.recent_activity_limit = self.recent_activity_limit.max(1);

        // dedup in first-seen order, so the default list round-trips unchanged
        let mut seen = HashSet::new();
        let tokens: Vec<String> = self
            .truthy_tokens
            .iter()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty() && seen.insert(t.clone()))
            .collect();
        self.truthy_tokens = if tokens.is_empty() {
            default_tokens()
        } else {
            tokens
        };
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let cfg: PipelineConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.sanitized(), PipelineConfig::default());
    }

    #[test]
    fn sanitize_limits_and_tokens() {
        let cfg = PipelineConfig {
            top_deals_per_partner: 0,
            recent_activity_limit: 25,
            truthy_tokens: vec![" X ".into(), "x".into(), "".into(), "Done".into()],
        }
        .sanitized();
        assert_eq!(cfg.top_deals_per_partner, 1);
        assert_eq!(cfg.recent_activity_limit, 25);
        assert_eq!(cfg.truthy_tokens, vec!["x".to_string(), "done".to_string()]);

        let blank = PipelineConfig {
            truthy_tokens: vec!["  ".into()],
            ..Default::default()
        }
        .sanitized();
        assert_eq!(blank.truthy_tokens, default_tokens());
    }
}
