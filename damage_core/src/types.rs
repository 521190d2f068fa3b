//! Shared types used across damage models

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a combiner merges the damage reported by its sources
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombinationRule {
    /// Largest of the previous composite value and every source value
    #[default]
    #[serde(alias = "maximum")]
    Maximum,
    /// Union of independent damage mechanisms: `1 - Π(1 - dᵢ)`
    #[serde(alias = "product")]
    Product,
}

impl fmt::Display for CombinationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CombinationRule::Maximum => write!(f, "Maximum"),
            CombinationRule::Product => write!(f, "Product"),
        }
    }
}

/// Damage at one evaluation point: this step's value and the value carried
/// over from the previous step
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DamageIndex {
    pub current: f64,
    pub previous: f64,
}

impl DamageIndex {
    /// Create a point state with both values set
    pub fn new(current: f64, previous: f64) -> Self {
        DamageIndex { current, previous }
    }

    /// Damage accumulated during the current step
    pub fn increment(&self) -> f64 {
        self.current - self.previous
    }
}

/// Where the host is in the simulation when it asks a material to update
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepContext {
    /// Zero-based step number
    pub step: usize,
    /// Time at the end of the step
    pub time: f64,
    /// Time increment of the step
    pub dt: f64,
}

impl StepContext {
    pub fn new(step: usize, time: f64, dt: f64) -> Self {
        StepContext { step, time, dt }
    }
}

impl Default for StepContext {
    fn default() -> Self {
        StepContext {
            step: 0,
            time: 0.0,
            dt: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_defaults_to_maximum() {
        assert_eq!(CombinationRule::default(), CombinationRule::Maximum);
    }

    #[test]
    fn test_rule_deserialization() {
        let rule: CombinationRule = serde_json::from_str("\"Product\"").unwrap();
        assert_eq!(rule, CombinationRule::Product);

        let rule: CombinationRule = serde_json::from_str("\"maximum\"").unwrap();
        assert_eq!(rule, CombinationRule::Maximum);

        assert!(serde_json::from_str::<CombinationRule>("\"Sum\"").is_err());
    }

    #[test]
    fn test_damage_index_increment() {
        let index = DamageIndex::new(0.45, 0.2);
        assert!((index.increment() - 0.25).abs() < 1e-12);
    }
}
