//! damage_core - Limited combined scalar damage for continuum material models
//!
//! This library provides:
//! - DamageSource: Capability reporting a scalar damage index per evaluation point
//! - DamageCombiner: Maximum/Product combination of several sources, floored by
//!   the previous step and capped by a maximum damage
//! - MaterialRegistry: Ordered name lookup used to bind combiner inputs at setup
//! - Config: TOML material declarations built into a ready registry

pub mod combiner;
pub mod config;
pub mod material;
pub mod prelude;
pub mod source;
pub mod types;

// Re-export core types for convenience
pub use combiner::{combine, CombinerConfig, CombinerError, DamageCombiner};
pub use config::{ConfigError, MaterialConfig, MaterialsConfig};
pub use material::{ElasticMaterial, Material, MaterialRegistry, RegistryError};
pub use source::{
    ConstantScalarDamage, DamageField, DamageSource, PrescribedScalarDamage, ScalarDamageBase,
};
pub use types::{CombinationRule, DamageIndex, StepContext};
