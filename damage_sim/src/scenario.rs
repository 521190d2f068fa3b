//! Scenario files: simulation settings plus material declarations

use damage_core::config::{self, ConfigError, MaterialConfig, MaterialsConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Scenario setup error
#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Reported material '{0}' is not declared")]
    UnknownReport(String),
    #[error("Reported material '{0}' does not provide a damage index")]
    NotDamageModel(String),
}

/// Stepping parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSettings {
    /// Number of evaluation points per material
    pub points: usize,
    /// Number of steps to run
    #[serde(default = "default_steps")]
    pub steps: usize,
    /// Time increment per step
    #[serde(default = "default_dt")]
    pub dt: f64,
    /// Damage models to record; every damage model when empty
    #[serde(default)]
    pub report: Vec<String>,
}

fn default_steps() -> usize {
    10
}

fn default_dt() -> f64 {
    1.0
}

/// A complete scenario document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub simulation: SimulationSettings,
    #[serde(default)]
    pub materials: Vec<MaterialConfig>,
}

impl Scenario {
    /// Load a scenario from a TOML file
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        Ok(config::load_toml(path)?)
    }

    /// Load a scenario from a TOML string
    pub fn parse(content: &str) -> Result<Self, ScenarioError> {
        Ok(config::parse_toml(content)?)
    }

    /// Material declarations in the form the registry builder expects
    pub fn materials_config(&self) -> MaterialsConfig {
        MaterialsConfig {
            materials: self.materials.clone(),
        }
    }
}
