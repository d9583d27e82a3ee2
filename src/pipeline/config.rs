//! Extraction parameters, loadable from YAML.

use crate::error::{ExtractError, Result};
use crate::interval::{IntervalWidth, SePolicy};
use crate::select::{SelectionStrategy, DEFAULT_TOP_N};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Parameters for one extraction run.
///
/// Every field has a default, so a YAML file only needs the values it changes:
///
/// ```yaml
/// top_n: 50
/// width: !level 0.9
/// se_policy: skip
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Features kept per selection.
    pub top_n: usize,
    /// Confidence interval width.
    pub width: IntervalWidth,
    /// Treatment of negative or missing standard errors.
    pub se_policy: SePolicy,
    /// Selection algorithm.
    pub strategy: SelectionStrategy,
    /// Identifier column name; resolved from the header when unset.
    pub id_column: Option<String>,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            width: IntervalWidth::default(),
            se_policy: SePolicy::default(),
            strategy: SelectionStrategy::default(),
            id_column: None,
        }
    }
}

impl ExtractConfig {
    /// Create a config with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(ExtractError::from)
    }

    /// Load from a YAML file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml(&text)
    }

    /// Save to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(ExtractError::from)
    }

    /// Set the number of features per selection.
    pub fn top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// Use a fixed multiplier of standard errors.
    pub fn z(mut self, z: f64) -> Self {
        self.width = IntervalWidth::Multiplier(z);
        self
    }

    /// Use a two-sided confidence level.
    pub fn level(mut self, level: f64) -> Self {
        self.width = IntervalWidth::Level(level);
        self
    }

    /// Set the standard-error policy.
    pub fn se_policy(mut self, policy: SePolicy) -> Self {
        self.se_policy = policy;
        self
    }

    /// Set the selection algorithm.
    pub fn strategy(mut self, strategy: SelectionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Name the identifier column explicitly.
    pub fn id_column(mut self, name: impl Into<String>) -> Self {
        self.id_column = Some(name.into());
        self
    }

    /// Check parameters before any file is touched.
    pub fn validate(&self) -> Result<()> {
        self.width.z()?;
        if let Some(name) = &self.id_column {
            if name.is_empty() {
                return Err(ExtractError::InvalidParameter(
                    "Identifier column name must not be empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_reproduce_fixed_behaviour() {
        let config = ExtractConfig::default();
        assert_eq!(config.top_n, 100);
        assert_eq!(config.width.z().unwrap(), 1.96);
        assert_eq!(config.se_policy, SePolicy::PassThrough);
        assert_eq!(config.strategy, SelectionStrategy::Sort);
        assert!(config.id_column.is_none());
    }

    #[test]
    fn test_partial_yaml() {
        let config = ExtractConfig::from_yaml("top_n: 25\nse_policy: reject\n").unwrap();
        assert_eq!(config.top_n, 25);
        assert_eq!(config.se_policy, SePolicy::Reject);
        assert_eq!(config.width, IntervalWidth::Multiplier(1.96));
    }

    #[test]
    fn test_yaml_roundtrip() {
        let config = ExtractConfig::new()
            .top_n(10)
            .level(0.9)
            .strategy(SelectionStrategy::Heap)
            .id_column("taxon");
        let yaml = config.to_yaml().unwrap();
        assert_eq!(ExtractConfig::from_yaml(&yaml).unwrap(), config);
    }

    #[test]
    fn test_bad_yaml() {
        let err = ExtractConfig::from_yaml("top_n: many\n").unwrap_err();
        assert!(matches!(err, ExtractError::Config(_)));
    }

    #[test]
    fn test_validate() {
        assert!(ExtractConfig::new().validate().is_ok());
        assert!(ExtractConfig::new().level(1.5).validate().is_err());
        assert!(ExtractConfig::new().id_column("").validate().is_err());
    }
}
