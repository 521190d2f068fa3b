//! DamageCombiner - Limited combination of several scalar damage models
//!
//! A combiner is configured with an ordered list of damage model names, a
//! [`CombinationRule`] and a maximum damage. [`DamageCombiner::resolve`] binds
//! the names to live [`DamageSource`] handles once; afterwards each point is
//! updated from the sources' current values, floored by the point's previous
//! composite value and capped by the maximum damage.

pub mod rule;

pub use rule::{combine, limit, raw_combination};

use crate::material::{Material, MaterialRegistry, RegistryError};
use crate::source::{DamageSource, ScalarDamageBase, DEFAULT_MAXIMUM_DAMAGE_INCREMENT};
use crate::types::{CombinationRule, StepContext};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, trace, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Setup error raised while binding damage model names
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CombinerError {
    #[error("Damage model '{name}' is not compatible with limited combined damage '{combiner}'")]
    IncompatibleModel { name: String, combiner: String },
    #[error(
        "Damage model '{name}' has {found} points but limited combined damage '{combiner}' has {expected}"
    )]
    PointCountMismatch {
        name: String,
        combiner: String,
        expected: usize,
        found: usize,
    },
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Unresolved combiner configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CombinerConfig {
    /// Name this combiner registers under
    pub name: String,
    /// Names of the damage models to combine, in evaluation order
    pub damage_models: Vec<String>,
    /// How the damage models are combined
    #[serde(default, alias = "combination_rule")]
    pub combination_type: CombinationRule,
    /// Maximum allowed damage
    #[serde(default = "default_max_damage")]
    pub max_damage: f64,
    /// Report the previous-step value to consumers
    #[serde(default)]
    pub use_old_damage: bool,
    /// Damage growth per step used for time step limiting
    #[serde(default = "default_maximum_damage_increment")]
    pub maximum_damage_increment: f64,
}

fn default_max_damage() -> f64 {
    1.0
}

fn default_maximum_damage_increment() -> f64 {
    DEFAULT_MAXIMUM_DAMAGE_INCREMENT
}

impl CombinerConfig {
    pub fn new(name: impl Into<String>, damage_models: Vec<String>) -> Self {
        CombinerConfig {
            name: name.into(),
            damage_models,
            combination_type: CombinationRule::default(),
            max_damage: default_max_damage(),
            use_old_damage: false,
            maximum_damage_increment: default_maximum_damage_increment(),
        }
    }

    pub fn with_rule(mut self, rule: CombinationRule) -> Self {
        self.combination_type = rule;
        self
    }

    pub fn with_max_damage(mut self, max_damage: f64) -> Self {
        self.max_damage = max_damage;
        self
    }
}

/// A combiner with every damage model bound to a handle
#[derive(Debug)]
pub struct DamageCombiner {
    base: ScalarDamageBase,
    rule: CombinationRule,
    max_damage: f64,
    model_names: Vec<String>,
    models: Vec<Arc<dyn DamageSource>>,
}

impl DamageCombiner {
    /// Bind every configured name to a damage source from `registry`
    ///
    /// Unknown names fail with the registry's own error. Names that resolve
    /// to a material without the damage capability fail with
    /// [`CombinerError::IncompatibleModel`], and sources holding a different
    /// number of points than `num_points` with
    /// [`CombinerError::PointCountMismatch`].
    pub fn resolve(
        config: CombinerConfig,
        registry: &MaterialRegistry,
        num_points: usize,
    ) -> Result<Self, CombinerError> {
        if !(0.0..=1.0).contains(&config.max_damage) {
            warn!(
                combiner = %config.name,
                max_damage = config.max_damage,
                "max_damage is outside [0, 1]"
            );
        }

        let models = config
            .damage_models
            .iter()
            .map(|name| {
                let source = registry.get(name)?.as_damage_source().ok_or_else(|| {
                    CombinerError::IncompatibleModel {
                        name: name.clone(),
                        combiner: config.name.clone(),
                    }
                })?;
                if source.num_points() != num_points {
                    return Err(CombinerError::PointCountMismatch {
                        name: name.clone(),
                        combiner: config.name.clone(),
                        expected: num_points,
                        found: source.num_points(),
                    });
                }
                Ok(source)
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            combiner = %config.name,
            rule = %config.combination_type,
            max_damage = config.max_damage,
            models = ?config.damage_models,
            "resolved damage models"
        );

        let base = ScalarDamageBase::new(config.name, num_points)
            .with_use_old_damage(config.use_old_damage)
            .with_maximum_damage_increment(config.maximum_damage_increment);

        Ok(DamageCombiner {
            base,
            rule: config.combination_type,
            max_damage: config.max_damage,
            model_names: config.damage_models,
            models,
        })
    }

    pub fn rule(&self) -> CombinationRule {
        self.rule
    }

    pub fn max_damage(&self) -> f64 {
        self.max_damage
    }

    /// Names of the bound damage models, in resolution order
    pub fn model_names(&self) -> &[String] {
        &self.model_names
    }

    pub fn num_models(&self) -> usize {
        self.models.len()
    }

    pub fn base(&self) -> &ScalarDamageBase {
        &self.base
    }

    /// New composite damage at `qp` given the previous composite value
    ///
    /// Reads the sources but writes nothing.
    pub fn compute_qp_damage_index(&self, qp: usize, previous: f64) -> f64 {
        combine(
            self.rule,
            previous,
            self.models.iter().map(|model| model.qp_damage_index(qp)),
            self.max_damage,
        )
    }

    /// Update the stored damage at one point
    pub fn update_qp_damage_index(&self, qp: usize) {
        let previous = self.base.damage_index_old(qp);
        let current = self.compute_qp_damage_index(qp, previous);
        trace!(combiner = %self.base.name(), qp, previous, current, "updated damage index");
        self.base.set_current(qp, current);
    }

    /// Updated values for every point, without storing them
    fn compute_all(&self) -> Vec<f64> {
        let field = self.base.snapshot();
        let olds = field.olds();

        #[cfg(feature = "parallel")]
        {
            olds.par_iter()
                .enumerate()
                .map(|(qp, &previous)| self.compute_qp_damage_index(qp, previous))
                .collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            olds.iter()
                .enumerate()
                .map(|(qp, &previous)| self.compute_qp_damage_index(qp, previous))
                .collect()
        }
    }
}

impl Material for DamageCombiner {
    fn name(&self) -> &str {
        self.base.name()
    }

    fn kind(&self) -> &'static str {
        "limited_combined"
    }

    fn compute_properties(&self, _ctx: &StepContext) {
        let values = self.compute_all();
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

impl DamageSource for DamageCombiner {
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
