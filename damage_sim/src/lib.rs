//! damage_sim - Drive combined scalar damage scenarios step by step
//!
//! A scenario declares its materials in the same TOML form `damage_core`
//! reads, plus a `[simulation]` table with the number of points and steps.

pub mod report;
pub mod scenario;
pub mod simulation;

pub use scenario::{Scenario, ScenarioError, SimulationSettings};
pub use simulation::{Simulation, StepRecord};
