//! DamageSource - Capability trait and shared per-point damage storage

mod constant;
mod prescribed;

pub use constant::ConstantScalarDamage;
pub use prescribed::PrescribedScalarDamage;

use crate::types::DamageIndex;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default cap on the damage growth per step used for time step limiting
pub const DEFAULT_MAXIMUM_DAMAGE_INCREMENT: f64 = 0.1;

/// Increments at or below this value do not limit the time step
const INCREMENT_TOLERANCE: f64 = 1e-12;

/// Anything that reports a scalar damage index in [0, 1] per evaluation point
///
/// Point indices are assigned by the host. Asking for a point outside the
/// range the source was built for is a host bug and panics.
pub trait DamageSource: Send + Sync + fmt::Debug {
    /// Damage at `qp` for the current step
    fn qp_damage_index(&self, qp: usize) -> f64;

    /// Damage at `qp` carried over from the previous step
    fn qp_damage_index_old(&self, qp: usize) -> f64;

    /// Number of evaluation points this source holds values for
    fn num_points(&self) -> usize;
}

/// Dense per-point storage of current and previous-step damage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DamageField {
    current: Vec<f64>,
    old: Vec<f64>,
}

impl DamageField {
    /// Undamaged field with `num_points` evaluation points
    pub fn new(num_points: usize) -> Self {
        DamageField {
            current: vec![0.0; num_points],
            old: vec![0.0; num_points],
        }
    }

    pub fn len(&self) -> usize {
        self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    pub fn get(&self, qp: usize) -> DamageIndex {
        DamageIndex::new(self.current[qp], self.old[qp])
    }

    pub fn current(&self, qp: usize) -> f64 {
        self.current[qp]
    }

    pub fn old(&self, qp: usize) -> f64 {
        self.old[qp]
    }

    pub fn set(&mut self, qp: usize, value: f64) {
        self.current[qp] = value;
    }

    /// All current-step values, indexed by point
    pub fn currents(&self) -> &[f64] {
        &self.current
    }

    /// All previous-step values, indexed by point
    pub fn olds(&self) -> &[f64] {
        &self.old
    }

    /// Overwrite every current-step value at once
    pub fn set_currents(&mut self, values: &[f64]) {
        self.current.copy_from_slice(values);
    }

    /// Rotate the current step into the previous step
    pub fn advance(&mut self) {
        self.old.copy_from_slice(&self.current);
    }

    /// Largest time step keeping every point's damage growth below
    /// `maximum_increment`, scaled from the step just taken
    ///
    /// Only growing points limit the step; returns `f64::MAX` when no point
    /// is accumulating damage.
    pub fn time_step_limit(&self, dt: f64, maximum_increment: f64) -> f64 {
        self.current
            .iter()
            .zip(&self.old)
            .map(|(current, old)| current - old)
            .filter(|increment| *increment > INCREMENT_TOLERANCE)
            .map(|increment| dt * maximum_increment / increment)
            .fold(f64::MAX, f64::min)
    }
}

/// State shared by every scalar damage model
///
/// Holds the model's name, its reporting options and its per-point field.
/// The field sits behind a lock so a model can be shared between the
/// registry and any combiners that read it.
#[derive(Debug)]
pub struct ScalarDamageBase {
    name: String,
    use_old_damage: bool,
    maximum_damage_increment: f64,
    field: RwLock<DamageField>,
}

impl ScalarDamageBase {
    pub fn new(name: impl Into<String>, num_points: usize) -> Self {
        ScalarDamageBase {
            name: name.into(),
            use_old_damage: false,
            maximum_damage_increment: DEFAULT_MAXIMUM_DAMAGE_INCREMENT,
            field: RwLock::new(DamageField::new(num_points)),
        }
    }

    /// Report the previous-step value from `qp_damage_index`
    pub fn with_use_old_damage(mut self, use_old_damage: bool) -> Self {
        self.use_old_damage = use_old_damage;
        self
    }

    pub fn with_maximum_damage_increment(mut self, increment: f64) -> Self {
        self.maximum_damage_increment = increment;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn use_old_damage(&self) -> bool {
        self.use_old_damage
    }

    pub fn maximum_damage_increment(&self) -> f64 {
        self.maximum_damage_increment
    }

    pub fn num_points(&self) -> usize {
        self.field.read().len()
    }

    /// Value reported to consumers, honoring `use_old_damage`
    pub fn damage_index(&self, qp: usize) -> f64 {
        let field = self.field.read();
        if self.use_old_damage {
            field.old(qp)
        } else {
            field.current(qp)
        }
    }

    pub fn damage_index_old(&self, qp: usize) -> f64 {
        self.field.read().old(qp)
    }

    /// Current and previous value at one point, ignoring `use_old_damage`
    pub fn point(&self, qp: usize) -> DamageIndex {
        self.field.read().get(qp)
    }

    pub fn set_current(&self, qp: usize, value: f64) {
        self.field.write().set(qp, value);
    }

    pub fn set_currents(&self, values: &[f64]) {
        self.field.write().set_currents(values);
    }

    /// Copy of the whole field
    pub fn snapshot(&self) -> DamageField {
        self.field.read().clone()
    }

    pub fn advance(&self) {
        self.field.write().advance();
    }

    pub fn time_step_limit(&self, dt: f64) -> f64 {
        self.field
            .read()
            .time_step_limit(dt, self.maximum_damage_increment)
    }
}
