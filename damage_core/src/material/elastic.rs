//! ElasticMaterial - Isotropic elastic constants with no damage capability

use crate::material::Material;
use crate::types::StepContext;
use serde::{Deserialize, Serialize};

/// Linear isotropic elasticity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElasticMaterial {
    pub name: String,
    pub youngs_modulus: f64,
    pub poissons_ratio: f64,
}

impl ElasticMaterial {
    pub fn new(name: impl Into<String>, youngs_modulus: f64, poissons_ratio: f64) -> Self {
        ElasticMaterial {
            name: name.into(),
            youngs_modulus,
            poissons_ratio,
        }
    }
}

impl Material for ElasticMaterial {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &'static str {
        "elastic"
    }

    // Constants do not evolve
    fn compute_properties(&self, _ctx: &StepContext) {}
}
