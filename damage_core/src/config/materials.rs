//! Material configuration loading

use super::ConfigError;
use crate::combiner::{CombinerConfig, DamageCombiner};
use crate::material::{ElasticMaterial, Material, MaterialRegistry};
use crate::source::{
    ConstantScalarDamage, PrescribedScalarDamage, ScalarDamageBase,
    DEFAULT_MAXIMUM_DAMAGE_INCREMENT,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Container for material configurations, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialsConfig {
    #[serde(default)]
    pub materials: Vec<MaterialConfig>,
}

/// One material declaration, tagged by `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MaterialConfig {
    Constant(ConstantConfig),
    Prescribed(PrescribedConfig),
    Elastic(ElasticConfig),
    LimitedCombined(CombinerConfig),
}

/// Uniform fixed damage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConstantConfig {
    pub name: String,
    pub damage: f64,
    #[serde(default)]
    pub use_old_damage: bool,
    #[serde(default = "default_maximum_damage_increment")]
    pub maximum_damage_increment: f64,
}

/// Damage following a per-step schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrescribedConfig {
    pub name: String,
    pub schedule: Vec<f64>,
    /// Relative spread of the per-point scale factors
    #[serde(default)]
    pub variability: f64,
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub use_old_damage: bool,
    #[serde(default = "default_maximum_damage_increment")]
    pub maximum_damage_increment: f64,
}

/// Isotropic elastic constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ElasticConfig {
    pub name: String,
    pub youngs_modulus: f64,
    pub poissons_ratio: f64,
}

fn default_maximum_damage_increment() -> f64 {
    DEFAULT_MAXIMUM_DAMAGE_INCREMENT
}

fn check_damage(name: &str, what: &str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(format!(
            "{name}: {what} {value} is outside [0, 1]"
        )))
    }
}

impl MaterialConfig {
    pub fn name(&self) -> &str {
        match self {
            MaterialConfig::Constant(c) => &c.name,
            MaterialConfig::Prescribed(c) => &c.name,
            MaterialConfig::Elastic(c) => &c.name,
            MaterialConfig::LimitedCombined(c) => &c.name,
        }
    }

    /// Check values that can be judged without the other materials
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            MaterialConfig::Constant(c) => check_damage(&c.name, "damage", c.damage),
            MaterialConfig::Prescribed(c) => {
                if c.schedule.is_empty() {
                    return Err(ConfigError::ValidationError(format!(
                        "{}: schedule must not be empty",
                        c.name
                    )));
                }
                for value in &c.schedule {
                    check_damage(&c.name, "scheduled damage", *value)?;
                }
                if !(0.0..1.0).contains(&c.variability) {
                    return Err(ConfigError::ValidationError(format!(
                        "{}: variability {} is outside [0, 1)",
                        c.name, c.variability
                    )));
                }
                Ok(())
            }
            MaterialConfig::Elastic(_) => Ok(()),
            MaterialConfig::LimitedCombined(c) => {
                if !c.max_damage.is_finite() {
                    return Err(ConfigError::ValidationError(format!(
                        "{}: max_damage must be finite",
                        c.name
                    )));
                }
                if c.max_damage < 0.0 {
                    return Err(ConfigError::ValidationError(format!(
                        "{}: max_damage {} is negative",
                        c.name, c.max_damage
                    )));
                }
                Ok(())
            }
        }
    }

    /// Construct the material, resolving names against `registry`
    pub fn build(
        self,
        registry: &MaterialRegistry,
        num_points: usize,
    ) -> Result<Arc<dyn Material>, ConfigError> {
        let material: Arc<dyn Material> = match self {
            MaterialConfig::Constant(c) => {
                let base = ScalarDamageBase::new(c.name, num_points)
                    .with_use_old_damage(c.use_old_damage)
                    .with_maximum_damage_increment(c.maximum_damage_increment);
                Arc::new(ConstantScalarDamage::from_base(base, c.damage))
            }
            MaterialConfig::Prescribed(c) => {
                let base = ScalarDamageBase::new(c.name, num_points)
                    .with_use_old_damage(c.use_old_damage)
                    .with_maximum_damage_increment(c.maximum_damage_increment);
                Arc::new(
                    PrescribedScalarDamage::from_base(base, c.schedule)
                        .with_variability(c.variability, c.seed),
                )
            }
            MaterialConfig::Elastic(c) => Arc::new(ElasticMaterial::new(
                c.name,
                c.youngs_modulus,
                c.poissons_ratio,
            )),
            MaterialConfig::LimitedCombined(c) => {
                Arc::new(DamageCombiner::resolve(c, registry, num_points)?)
            }
        };
        Ok(material)
    }
}

impl MaterialsConfig {
    /// Validate, construct and register every material in declaration order
    ///
    /// Combiners are resolved as they are registered, so they may only name
    /// materials declared before them.
    pub fn build_registry(self, num_points: usize) -> Result<MaterialRegistry, ConfigError> {
        if num_points == 0 {
            return Err(ConfigError::ValidationError(
                "at least one evaluation point is required".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for material in &self.materials {
            if !seen.insert(material.name()) {
                return Err(ConfigError::ValidationError(format!(
                    "duplicate material name '{}'",
                    material.name()
                )));
            }
            material.validate()?;
        }

        let mut registry = MaterialRegistry::new();
        for config in self.materials {
            let material = config.build(&registry, num_points)?;
            registry.register(material)?;
        }

        info!(
            materials = registry.len(),
            points = num_points,
            "built material registry"
        );
        Ok(registry)
    }
}

/// Load material configurations from a TOML file
pub fn load_material_configs(path: &Path) -> Result<MaterialsConfig, ConfigError> {
    super::load_toml(path)
}

/// Load material configurations from a TOML string
pub fn parse_material_configs(content: &str) -> Result<MaterialsConfig, ConfigError> {
    super::parse_toml(content)
}
