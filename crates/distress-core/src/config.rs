//! Configuration System
//!
//! Loads tuning parameters from a TOML file so runs can be adjusted without
//! recompiling. Every section falls back to the documented defaults.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::systems::probability;

/// Default tuning file path
pub const DEFAULT_TUNING_PATH: &str = "tuning.toml";

/// Top-level configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub rates: RateConfig,
    #[serde(default)]
    pub perturbation: PerturbationConfig,
}

/// Which ids receive a state record during construction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum AllocationPolicy {
    /// Only ids listed as a neighbor get state; anchor-only ids stay bare.
    #[default]
    NeighborsOnly,
    /// Every endpoint of a non-self edge gets state.
    AllEndpoints,
}

/// Run length, seed and construction policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of diffusion steps
    pub iterations: usize,
    /// Seed for the run's random source
    pub seed: u64,
    /// Which ids get a state record during construction
    pub allocation: AllocationPolicy,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            iterations: 250,
            seed: 42,
            allocation: AllocationPolicy::NeighborsOnly,
        }
    }
}

/// Resource: rate constants of the diffusion model
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateConfig {
    /// Spontaneous recovery per step
    pub base_recovery_rate: f64,
    /// Recovery per step for distressed app users
    pub app_distress_recovery_rate: f64,
    /// Chance a calm node becomes distressed; also the initial distress rate
    pub base_distress_rate: f64,
    /// Per-neighbor chance of talking
    pub base_talking_rate: f64,
    /// Per-app-user chance of talking through the app
    pub app_talking_rate: f64,
    /// Per-contact chance of promoting a talking entry to trust
    pub trust_rate: f64,
    /// Chance a recovering node also drops the app
    pub app_recovery_stop_rate: f64,
    /// Enables app-mediated recovery and app-mediated talking
    pub app_communication: bool,
    /// Base of the willingness decay
    pub willingness_rate: f64,
    /// Asymptote of local (trust-driven) adoption
    pub local_max_app_adoption_rate: f64,
    /// Slope of global (social proof) adoption
    pub global_max_app_adoption_rate: f64,
}

impl Default for RateConfig {
    fn default() -> Self {
        Self {
            base_recovery_rate: 0.001,
            app_distress_recovery_rate: 0.05,
            base_distress_rate: 0.02,
            base_talking_rate: 0.01,
            app_talking_rate: 0.1,
            trust_rate: 0.01,
            app_recovery_stop_rate: 0.5,
            app_communication: true,
            willingness_rate: 0.8,
            local_max_app_adoption_rate: 0.05,
            global_max_app_adoption_rate: 0.02,
        }
    }
}

impl RateConfig {
    /// A configuration in which nothing ever changes.
    pub fn frozen() -> Self {
        Self {
            base_recovery_rate: 0.0,
            app_distress_recovery_rate: 0.0,
            base_distress_rate: 0.0,
            base_talking_rate: 0.0,
            app_talking_rate: 0.0,
            trust_rate: 0.0,
            app_recovery_stop_rate: 0.0,
            local_max_app_adoption_rate: 0.0,
            global_max_app_adoption_rate: 0.0,
            ..Self::default()
        }
    }

    pub fn willingness(&self, cycle: u32) -> f64 {
        probability::willingness(self.willingness_rate, cycle)
    }

    pub fn local_liking(&self, trust_size: usize) -> f64 {
        probability::local_liking(self.local_max_app_adoption_rate, trust_size)
    }

    pub fn global_proof(&self, app_fraction: f64) -> f64 {
        probability::global_proof(self.global_max_app_adoption_rate, app_fraction)
    }

    fn probabilities(&self) -> [(&'static str, f64); 8] {
        [
            ("base_recovery_rate", self.base_recovery_rate),
            ("app_distress_recovery_rate", self.app_distress_recovery_rate),
            ("base_distress_rate", self.base_distress_rate),
            ("base_talking_rate", self.base_talking_rate),
            ("app_talking_rate", self.app_talking_rate),
            ("trust_rate", self.trust_rate),
            ("app_recovery_stop_rate", self.app_recovery_stop_rate),
            ("local_max_app_adoption_rate", self.local_max_app_adoption_rate),
        ]
    }
}

/// One-off edge churn applied after construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerturbationConfig {
    /// Share of edges deleted
    pub edge_removal_fraction: f64,
    /// Random edges attempted, as a share of the node count
    pub edge_addition_fraction: f64,
}

impl Default for PerturbationConfig {
    fn default() -> Self {
        Self {
            edge_removal_fraction: 0.1,
            edge_addition_fraction: 0.01,
        }
    }
}

impl SimConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_str(&content)
    }

    /// Parses and validates configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the default tuning file if it exists, otherwise uses defaults.
    pub fn load_or_default() -> Self {
        if !Path::new(DEFAULT_TUNING_PATH).exists() {
            return Self::default();
        }
        Self::from_file(DEFAULT_TUNING_PATH).unwrap_or_else(|e| {
            tracing::warn!("Could not load {}: {}. Using defaults.", DEFAULT_TUNING_PATH, e);
            Self::default()
        })
    }

    /// Returns the configuration as a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Rejects rates that cannot be used as probabilities.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in self.rates.probabilities() {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("{value} is not a probability in [0, 1]"),
                });
            }
        }
        // Scaled by a fraction in [0, 1]; only needs to be non-negative.
        let global = self.rates.global_max_app_adoption_rate;
        if global.is_nan() || global < 0.0 {
            return Err(ConfigError::Invalid {
                field: "global_max_app_adoption_rate",
                reason: "must be non-negative".to_string(),
            });
        }
        let willingness = self.rates.willingness_rate;
        if !(willingness > 0.0 && willingness <= 1.0) {
            return Err(ConfigError::Invalid {
                field: "willingness_rate",
                reason: format!("{willingness} is outside (0, 1]"),
            });
        }
        for (field, value) in [
            ("edge_removal_fraction", self.perturbation.edge_removal_fraction),
            ("edge_addition_fraction", self.perturbation.edge_addition_fraction),
        ] {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("{value} must be a finite non-negative fraction"),
                });
            }
        }
        Ok(())
    }
}

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    TomlError(#[from] toml::de::Error),
    #[error("Serialize error: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),
    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SimConfig::default();
        assert_eq!(config.simulation.iterations, 250);
        assert_eq!(config.simulation.allocation, AllocationPolicy::NeighborsOnly);
        assert_eq!(config.rates.base_distress_rate, 0.02);
        assert_eq!(config.rates.willingness_rate, 0.8);
        assert!(config.rates.app_communication);
        assert_eq!(config.perturbation.edge_removal_fraction, 0.1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = SimConfig::from_str(
            r#"
            [simulation]
            seed = 7
            allocation = "all-endpoints"

            [rates]
            app_communication = false
            "#,
        )
        .unwrap();

        assert_eq!(config.simulation.seed, 7);
        assert_eq!(config.simulation.iterations, 250);
        assert_eq!(config.simulation.allocation, AllocationPolicy::AllEndpoints);
        assert!(!config.rates.app_communication);
        assert_eq!(config.rates.trust_rate, 0.01);
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(SimConfig::from_str("").unwrap(), SimConfig::default());
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut config = SimConfig::default();
        config.simulation.seed = 99;
        let text = config.to_toml().unwrap();
        assert_eq!(SimConfig::from_str(&text).unwrap(), config);
    }

    #[test]
    fn test_rejects_bad_probability() {
        let err = SimConfig::from_str("[rates]\ntrust_rate = 1.5\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "trust_rate", .. }));
    }

    #[test]
    fn test_rejects_bad_willingness() {
        let err = SimConfig::from_str("[rates]\nwillingness_rate = 0.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "willingness_rate", .. }));
    }

    #[test]
    fn test_rejects_unparseable_toml() {
        let err = SimConfig::from_str("[simulation\nseed = 1").unwrap_err();
        assert!(matches!(err, ConfigError::TomlError(_)));
    }

    #[test]
    fn test_frozen_rates() {
        let rates = RateConfig::frozen();
        assert_eq!(rates.base_distress_rate, 0.0);
        assert_eq!(rates.local_liking(10), 0.0);
        assert_eq!(rates.global_proof(1.0), 0.0);
        assert!(SimConfig { rates, ..SimConfig::default() }.validate().is_ok());
    }
}
