//! Engine configuration
//!
//! Every section has compiled defaults; a config file only needs to name what it
//! overrides. Files are YAML (`.yaml`/`.yml`) or JSON (`.json`), chosen by extension.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Unsupported config format for {0} (expected .yaml, .yml or .json)")]
    UnsupportedFormat(String),

    #[error("Invalid config value {field}: {message}")]
    Invalid { field: String, message: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Weights and limits of the gap score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GapConfig {
    /// Points per unintended or emergent outcome
    pub divergent_outcome_weight: f64,
    /// Multiplier for the average relative metric gap
    pub metric_gap_weight: f64,
    /// Added when the initiative has no intended outcome
    pub missing_intent_penalty: f64,
    /// How many `causes` hops to follow when collecting divergent outcomes
    pub divergent_outcome_depth: usize,
}

impl Default for GapConfig {
    fn default() -> Self {
        Self {
            divergent_outcome_weight: 10.0,
            metric_gap_weight: 50.0,
            missing_intent_penalty: 25.0,
            divergent_outcome_depth: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Relative gap a metric must exceed to be reported as gameable
    pub gameable_threshold: f64,
    /// Undirected hop limit when looking for an initiative behind a metric
    pub theater_depth: usize,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            gameable_threshold: 0.5,
            theater_depth: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraversalConfig {
    pub default_max_depth: usize,
    /// Cap on enumerated paths per query; `None` for no cap
    pub max_paths: Option<usize>,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            default_max_depth: 3,
            max_paths: Some(10_000),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MirrorConfig {
    /// Prefix for every IRI the semantic mirror mints
    pub base_iri: String,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            base_iri: "http://orgcausal.dev/".to_string(),
        }
    }
}

/// Top-level configuration aggregating all sections
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub gap: GapConfig,
    pub audit: AuditConfig,
    pub traversal: TraversalConfig,
    pub mirror: MirrorConfig,
}

impl EngineConfig {
    /// Load and validate a config file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let shown = path.display().to_string();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: shown.clone(),
            source,
        })?;

        let config = match extension.as_deref() {
            Some("yaml") | Some("yml") => Self::parse_yaml(&content, &shown)?,
            Some("json") => Self::parse_json(&content, &shown)?,
            _ => return Err(ConfigError::UnsupportedFormat(shown)),
        };
        config.validate()?;

        debug!("Loaded engine config from {}", path.display());
        Ok(config)
    }

    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        let config = Self::parse_yaml(yaml, "<string>")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config = Self::parse_json(json, "<string>")?;
        config.validate()?;
        Ok(config)
    }

    fn parse_yaml(content: &str, path: &str) -> ConfigResult<Self> {
        serde_yaml::from_str(content).map_err(|e| ConfigError::Parse {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    fn parse_json(content: &str, path: &str) -> ConfigResult<Self> {
        serde_json::from_str(content).map_err(|e| ConfigError::Parse {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values
    pub fn validate(&self) -> ConfigResult<()> {
        let weights = [
            ("gap.divergent_outcome_weight", self.gap.divergent_outcome_weight),
            ("gap.metric_gap_weight", self.gap.metric_gap_weight),
            ("gap.missing_intent_penalty", self.gap.missing_intent_penalty),
            ("audit.gameable_threshold", self.audit.gameable_threshold),
        ];
        for (field, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(field, "must be a finite, non-negative number"));
            }
        }

        if self.gap.divergent_outcome_depth == 0 {
            return Err(invalid("gap.divergent_outcome_depth", "must be at least 1"));
        }
        if self.audit.theater_depth == 0 {
            return Err(invalid("audit.theater_depth", "must be at least 1"));
        }
        if self.traversal.default_max_depth == 0 {
            return Err(invalid("traversal.default_max_depth", "must be at least 1"));
        }
        if self.traversal.max_paths == Some(0) {
            return Err(invalid("traversal.max_paths", "must be greater than 0"));
        }
        if oxrdf::NamedNode::new(format!("{}vertex/0", self.mirror.base_iri)).is_err() {
            return Err(invalid("mirror.base_iri", "must be an absolute IRI prefix"));
        }
        Ok(())
    }
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::Invalid {
        field: field.to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_scoring_constants() {
        let config = EngineConfig::default();
        assert_eq!(config.gap.divergent_outcome_weight, 10.0);
        assert_eq!(config.gap.metric_gap_weight, 50.0);
        assert_eq!(config.gap.missing_intent_penalty, 25.0);
        assert_eq!(config.gap.divergent_outcome_depth, 2);
        assert_eq!(config.audit.gameable_threshold, 0.5);
        assert_eq!(config.audit.theater_depth, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = EngineConfig::from_yaml_str("audit:\n  gameable_threshold: 0.1\n").unwrap();
        assert_eq!(config.audit.gameable_threshold, 0.1);
        assert_eq!(config.audit.theater_depth, 2);
        assert_eq!(config.gap, GapConfig::default());
    }

    #[test]
    fn test_load_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let yaml_path = dir.path().join("engine.yml");
        let mut file = std::fs::File::create(&yaml_path).unwrap();
        writeln!(file, "traversal:\n  default_max_depth: 5").unwrap();
        assert_eq!(EngineConfig::load(&yaml_path).unwrap().traversal.default_max_depth, 5);

        let json_path = dir.path().join("engine.json");
        std::fs::write(&json_path, r#"{"gap": {"metric_gap_weight": 40.0}}"#).unwrap();
        assert_eq!(EngineConfig::load(&json_path).unwrap().gap.metric_gap_weight, 40.0);

        let toml_path = dir.path().join("engine.toml");
        std::fs::write(&toml_path, "").unwrap();
        assert!(matches!(
            EngineConfig::load(&toml_path),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = EngineConfig::load(dir.path().join("absent.yaml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let result = EngineConfig::from_json_str(r#"{"audit": {"gameable_threshold": -0.5}}"#);
        assert!(matches!(result, Err(ConfigError::Invalid { ref field, .. }) if field == "audit.gameable_threshold"));

        let result = EngineConfig::from_yaml_str("audit:\n  theater_depth: 0\n");
        assert!(matches!(result, Err(ConfigError::Invalid { ref field, .. }) if field == "audit.theater_depth"));

        let result = EngineConfig::from_yaml_str("mirror:\n  base_iri: \"not an iri\"\n");
        assert!(matches!(result, Err(ConfigError::Invalid { ref field, .. }) if field == "mirror.base_iri"));
    }

    #[test]
    fn test_parse_error_names_source() {
        let result = EngineConfig::from_json_str("{ not json");
        assert!(matches!(result, Err(ConfigError::Parse { ref path, .. }) if path == "<string>"));
    }
}
