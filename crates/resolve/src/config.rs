use std::collections::{BTreeMap, HashSet};

use serde::Deserialize;

use crate::error::DedupError;
use crate::model::Strategy;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct DedupConfig {
    pub name: String,
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub detection: DetectionConfig,
    #[serde(default)]
    pub audit: AuditConfig,
}

// ---------------------------------------------------------------------------
// Input + Output
// ---------------------------------------------------------------------------

/// Paths are resolved relative to the config file's directory.
#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    pub records: String,
    pub gold: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Deduplicated catalog (TSV).
    #[serde(default)]
    pub records: Option<String>,
    /// Full run result (JSON).
    #[serde(default)]
    pub json: Option<String>,
}

// ---------------------------------------------------------------------------
// Detection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct DetectionConfig {
    #[serde(default = "default_strategies")]
    pub strategies: Vec<Strategy>,
    /// Strategy whose pairs feed the merger.
    #[serde(default = "default_merge")]
    pub merge: Strategy,
    /// Soundex blocks confirm a pair below this name edit distance.
    #[serde(default = "default_max_name_distance")]
    pub max_name_distance: usize,
    /// The residual scan confirms a pair above this name similarity.
    #[serde(default = "default_min_name_similarity")]
    pub min_name_similarity: f64,
}

fn default_strategies() -> Vec<Strategy> {
    Strategy::ALL.to_vec()
}

fn default_merge() -> Strategy {
    Strategy::FieldMatching
}

fn default_max_name_distance() -> usize {
    9
}

fn default_min_name_similarity() -> f64 {
    0.92
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            strategies: default_strategies(),
            merge: default_merge(),
            max_name_distance: default_max_name_distance(),
            min_name_similarity: default_min_name_similarity(),
        }
    }
}

// ---------------------------------------------------------------------------
// Audit
// ---------------------------------------------------------------------------

/// Entries here extend (and override) the built-in normalization tables.
#[derive(Debug, Clone, Deserialize)]
pub struct AuditConfig {
    #[serde(default = "default_audit_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub street: BTreeMap<String, String>,
    #[serde(default)]
    pub city: BTreeMap<String, String>,
    #[serde(default)]
    pub restaurant_type: BTreeMap<String, String>,
}

fn default_audit_enabled() -> bool {
    true
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            street: BTreeMap::new(),
            city: BTreeMap::new(),
            restaurant_type: BTreeMap::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl DedupConfig {
    pub fn from_toml(input: &str) -> Result<Self, DedupError> {
        let config: DedupConfig =
            toml::from_str(input).map_err(|e| DedupError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), DedupError> {
        if self.input.records.trim().is_empty() {
            return Err(DedupError::ConfigValidation("input.records is empty".into()));
        }
        if self.input.gold.trim().is_empty() {
            return Err(DedupError::ConfigValidation("input.gold is empty".into()));
        }
        self.detection.validate()
    }
}

impl DetectionConfig {
    pub fn validate(&self) -> Result<(), DedupError> {
        if self.strategies.is_empty() {
            return Err(DedupError::ConfigValidation(
                "at least 1 strategy is required".into(),
            ));
        }

        let mut seen = HashSet::new();
        for strategy in &self.strategies {
            if !seen.insert(strategy) {
                return Err(DedupError::ConfigValidation(format!(
                    "strategy '{strategy}' listed more than once"
                )));
            }
        }

        if !self.strategies.contains(&self.merge) {
            return Err(DedupError::ConfigValidation(format!(
                "merge strategy '{}' is not among the configured strategies",
                self.merge
            )));
        }

        if self.max_name_distance == 0 {
            return Err(DedupError::ConfigValidation(
                "max_name_distance must be at least 1".into(),
            ));
        }

        if !(0.0..=1.0).contains(&self.min_name_similarity) {
            return Err(DedupError::ConfigValidation(format!(
                "min_name_similarity must be within [0, 1], got {}",
                self.min_name_similarity
            )));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
