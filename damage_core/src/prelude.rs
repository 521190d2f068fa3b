//! Prelude module for convenient imports
//!
//! ```rust
//! use damage_core::prelude::*;
//! ```

// Core types
pub use crate::types::{CombinationRule, DamageIndex, StepContext};

// Damage models
pub use crate::combiner::{CombinerConfig, DamageCombiner};
pub use crate::source::{ConstantScalarDamage, DamageSource, PrescribedScalarDamage};

// Host
pub use crate::material::{Material, MaterialRegistry};

// Config
pub use crate::config::{load_material_configs, parse_material_configs, MaterialsConfig};
