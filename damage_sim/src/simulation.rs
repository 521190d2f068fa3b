//! Step-by-step driver over a material registry

use crate::scenario::{Scenario, ScenarioError, SimulationSettings};
use damage_core::{DamageSource, MaterialRegistry, StepContext};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Damage recorded for one step
#[derive(Debug, Clone, Serialize)]
pub struct StepRecord {
    pub step: usize,
    pub time: f64,
    /// Per-point damage for each reported model
    pub damage: BTreeMap<String, Vec<f64>>,
    /// Smallest time step any material allows next; `None` when unlimited
    pub time_step_limit: Option<f64>,
}

impl StepRecord {
    /// (min, mean, max) over the points of one model
    pub fn summary(&self, name: &str) -> Option<(f64, f64, f64)> {
        let values = self.damage.get(name)?;
        if values.is_empty() {
            return None;
        }
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        Some((min, mean, max))
    }
}

type ReportedModel = (String, Arc<dyn DamageSource>);

/// A built scenario ready to step
pub struct Simulation {
    settings: SimulationSettings,
    registry: MaterialRegistry,
    reported: Vec<ReportedModel>,
    step: usize,
    time: f64,
}

impl Simulation {
    /// Build the registry and bind the reported models
    pub fn new(scenario: Scenario) -> Result<Self, ScenarioError> {
        let registry = scenario
            .materials_config()
            .build_registry(scenario.simulation.points)?;

        let reported: Vec<ReportedModel> = if scenario.simulation.report.is_empty() {
            registry
                .iter()
                .filter_map(|m| {
                    let name = m.name().to_string();
                    Arc::clone(m).as_damage_source().map(|s| (name, s))
                })
                .collect()
        } else {
            scenario
                .simulation
                .report
                .iter()
                .map(|name| {
                    let material = registry
                        .get(name)
                        .map_err(|_| ScenarioError::UnknownReport(name.clone()))?;
                    let source = material
                        .as_damage_source()
                        .ok_or_else(|| ScenarioError::NotDamageModel(name.clone()))?;
                    Ok((name.clone(), source))
                })
                .collect::<Result<Vec<_>, ScenarioError>>()?
        };

        info!(
            materials = registry.len(),
            reported = reported.len(),
            points = scenario.simulation.points,
            "simulation ready"
        );

        Ok(Simulation {
            settings: scenario.simulation,
            registry,
            reported,
            step: 0,
            time: 0.0,
        })
    }

    /// Names of the recorded models, in registration order
    pub fn reported_names(&self) -> impl Iterator<Item = &str> {
        self.reported.iter().map(|(name, _)| name.as_str())
    }

    /// Update every material in registration order, record, then advance
    pub fn step(&mut self) -> StepRecord {
        let dt = self.settings.dt;
        self.time += dt;
        let ctx = StepContext::new(self.step, self.time, dt);

        self.registry.compute_properties(&ctx);

        let damage = self
            .reported
            .iter()
            .map(|(name, source)| {
                let values = (0..self.settings.points)
                    .map(|qp| source.qp_damage_index(qp))
                    .collect();
                (name.clone(), values)
            })
            .collect();

        let limit = self.registry.time_step_limit(dt);
        let record = StepRecord {
            step: self.step,
            time: self.time,
            damage,
            time_step_limit: (limit < f64::MAX).then_some(limit),
        };

        self.registry.advance_step();
        debug!(step = self.step, time = self.time, "step complete");
        self.step += 1;
        record
    }

    /// Run `steps` steps and collect their records
    pub fn run(&mut self, steps: usize) -> Vec<StepRecord> {
        (0..steps).map(|_| self.step()).collect()
    }
}
