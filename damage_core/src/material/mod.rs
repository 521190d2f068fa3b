//! Material - Registrable host objects and the name lookup registry

mod elastic;

pub use elastic::ElasticMaterial;

use crate::source::DamageSource;
use crate::types::StepContext;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Registry lookup error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    #[error("Unknown material '{0}'")]
    UnknownMaterial(String),
    #[error("A material named '{0}' is already registered")]
    DuplicateMaterial(String),
}

/// Anything the host can register by name and update once per step
pub trait Material: Send + Sync + fmt::Debug {
    /// Unique name used to reference this material
    fn name(&self) -> &str;

    /// Short type label for reporting
    fn kind(&self) -> &'static str;

    /// Update every evaluation point for the step described by `ctx`
    fn compute_properties(&self, ctx: &StepContext);

    /// Carry the current step's state over into the previous step
    fn advance_step(&self) {}

    /// Largest time step this material allows for the next step
    fn time_step_limit(&self, _dt: f64) -> f64 {
        f64::MAX
    }

    /// The damage capability, if this material provides one
    fn as_damage_source(self: Arc<Self>) -> Option<Arc<dyn DamageSource>> {
        None
    }
}

/// Ordered name -> material map
///
/// Iteration follows registration order, which is also the order the host
/// updates materials in.
#[derive(Debug, Clone, Default)]
pub struct MaterialRegistry {
    materials: Vec<Arc<dyn Material>>,
    index: HashMap<String, usize>,
}

impl MaterialRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        MaterialRegistry {
            materials: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Register a material under its own name
    pub fn register(&mut self, material: Arc<dyn Material>) -> Result<(), RegistryError> {
        let name = material.name().to_string();
        if self.index.contains_key(&name) {
            return Err(RegistryError::DuplicateMaterial(name));
        }

        debug!(material = %name, kind = material.kind(), "registered material");
        self.index.insert(name, self.materials.len());
        self.materials.push(material);
        Ok(())
    }

    /// Look up a material by name
    pub fn get(&self, name: &str) -> Result<Arc<dyn Material>, RegistryError> {
        self.index
            .get(name)
            .map(|&i| Arc::clone(&self.materials[i]))
            .ok_or_else(|| RegistryError::UnknownMaterial(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Materials in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Material>> {
        self.materials.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.materials.iter().map(|m| m.name())
    }

    /// Update every material for one step, in registration order
    pub fn compute_properties(&self, ctx: &StepContext) {
        for material in &self.materials {
            material.compute_properties(ctx);
        }
    }

    /// Advance every material to the next step
    pub fn advance_step(&self) {
        for material in &self.materials {
            material.advance_step();
        }
    }

    /// Smallest time step limit over all materials
    pub fn time_step_limit(&self, dt: f64) -> f64 {
        self.materials
            .iter()
            .map(|m| m.time_step_limit(dt))
            .fold(f64::MAX, f64::min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ConstantScalarDamage;

    #[test]
    fn test_register_and_get() {
        let mut registry = MaterialRegistry::new();
        registry
            .register(Arc::new(ElasticMaterial::new("concrete", 30e9, 0.2)))
            .unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("concrete").unwrap().kind(), "elastic");
    }

    #[test]
    fn test_unknown_material() {
        let registry = MaterialRegistry::new();
        let err = registry.get("missing").unwrap_err();
        assert_eq!(err, RegistryError::UnknownMaterial("missing".to_string()));
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_duplicate_material() {
        let mut registry = MaterialRegistry::new();
        registry
            .register(Arc::new(ConstantScalarDamage::new("d", 2, 0.1)))
            .unwrap();
        let err = registry
            .register(Arc::new(ConstantScalarDamage::new("d", 2, 0.2)))
            .unwrap_err();
        assert_eq!(err, RegistryError::DuplicateMaterial("d".to_string()));
    }

    #[test]
    fn test_registration_order() {
        let mut registry = MaterialRegistry::new();
        for name in ["c", "a", "b"] {
            registry
                .register(Arc::new(ConstantScalarDamage::new(name, 1, 0.0)))
                .unwrap();
        }
        let names: Vec<&str> = registry.names().collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_capability_lookup() {
        let mut registry = MaterialRegistry::new();
        registry
            .register(Arc::new(ConstantScalarDamage::new("d", 1, 0.3)))
            .unwrap();
        registry
            .register(Arc::new(ElasticMaterial::new("e", 1.0, 0.0)))
            .unwrap();

        assert!(registry.get("d").unwrap().as_damage_source().is_some());
        assert!(registry.get("e").unwrap().as_damage_source().is_none());
    }
}
