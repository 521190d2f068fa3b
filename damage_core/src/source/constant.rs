//! ConstantScalarDamage - Uniform fixed damage

use crate::material::Material;
use crate::source::{DamageSource, ScalarDamageBase};
use crate::types::StepContext;
use std::sync::Arc;

/// Reports the same damage at every point on every step
#[derive(Debug)]
pub struct ConstantScalarDamage {
    base: ScalarDamageBase,
    damage: f64,
}

impl ConstantScalarDamage {
    pub fn new(name: impl Into<String>, num_points: usize, damage: f64) -> Self {
        Self::from_base(ScalarDamageBase::new(name, num_points), damage)
    }

    /// Build on a preconfigured base
    pub fn from_base(base: ScalarDamageBase, damage: f64) -> Self {
        ConstantScalarDamage { base, damage }
    }

    pub fn damage(&self) -> f64 {
        self.damage
    }

    pub fn base(&self) -> &ScalarDamageBase {
        &self.base
    }
}

impl Material for ConstantScalarDamage {
    fn name(&self) -> &str {
        self.base.name()
    }

    fn kind(&self) -> &'static str {
        "constant"
    }

    fn compute_properties(&self, _ctx: &StepContext) {
        let values = vec![self.damage; self.base.num_points()];
        self.base.set_currents(&values);
    }

    fn advance_step(&self) {
        self.base.advance();
    }

    fn time_step_limit(&self, dt: f64) -> f64 {
        self.base.time_step_limit(dt)
    }

    fn as_damage_source(self: Arc<Self>) -> Option<Arc<dyn DamageSource>> {
        Some(self)
    }
}

impl DamageSource for ConstantScalarDamage {
    fn qp_damage_index(&self, qp: usize) -> f64 {
        self.base.damage_index(qp)
    }

    fn qp_damage_index_old(&self, qp: usize) -> f64 {
        self.base.damage_index_old(qp)
    }

    fn num_points(&self) -> usize {
        self.base.num_points()
    }
}
