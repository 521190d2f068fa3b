//! PrescribedScalarDamage - Damage following a per-step schedule

use crate::material::Material;
use crate::source::{DamageSource, ScalarDamageBase};
use crate::types::StepContext;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;

/// Reports a scheduled damage value per step
///
/// Once the schedule runs out the last value is held. Each point may scale
/// the scheduled value by a fixed factor in `[1 - variability, 1 + variability]`
/// to mimic material heterogeneity; the result is clamped to [0, 1].
#[derive(Debug)]
pub struct PrescribedScalarDamage {
    base: ScalarDamageBase,
    schedule: Vec<f64>,
    point_factors: Vec<f64>,
}

impl PrescribedScalarDamage {
    /// Uniform schedule across all points
    pub fn new(name: impl Into<String>, num_points: usize, schedule: Vec<f64>) -> Self {
        Self::from_base(ScalarDamageBase::new(name, num_points), schedule)
    }

    /// Build on a preconfigured base
    pub fn from_base(base: ScalarDamageBase, schedule: Vec<f64>) -> Self {
        let point_factors = vec![1.0; base.num_points()];
        PrescribedScalarDamage {
            base,
            schedule,
            point_factors,
        }
    }

    /// Draw per-point scale factors from a seeded generator
    pub fn with_variability(mut self, variability: f64, seed: u64) -> Self {
        if variability > 0.0 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            for factor in &mut self.point_factors {
                *factor = rng.gen_range((1.0 - variability)..=(1.0 + variability));
            }
        }
        self
    }

    pub fn schedule(&self) -> &[f64] {
        &self.schedule
    }

    pub fn point_factors(&self) -> &[f64] {
        &self.point_factors
    }

    pub fn base(&self) -> &ScalarDamageBase {
        &self.base
    }

    /// Scheduled value for `step`, holding the last entry past the end
    pub fn scheduled(&self, step: usize) -> f64 {
        match self.schedule.get(step).or_else(|| self.schedule.last()) {
            Some(value) => *value,
            None => 0.0,
        }
    }
}

impl Material for PrescribedScalarDamage {
    fn name(&self) -> &str {
        self.base.name()
    }

    fn kind(&self) -> &'static str {
        "prescribed"
    }

    fn compute_properties(&self, ctx: &StepContext) {
        let scheduled = self.scheduled(ctx.step);
        let values: Vec<f64> = self
            .point_factors
            .iter()
            .map(|factor| (scheduled * factor).clamp(0.0, 1.0))
            .collect();
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

impl DamageSource for PrescribedScalarDamage {
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
