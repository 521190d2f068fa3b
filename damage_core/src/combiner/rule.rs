//! Combination rules and the limiting pipeline
//!
//! These functions are pure: given the previous composite value and the
//! values reported by the sources at one point, they produce the new
//! composite value.

use crate::types::CombinationRule;

/// Merge source values without any limiting
///
/// `Maximum` folds left starting from `previous`. `Product` starts from 1.0,
/// multiplies in `1 - dᵢ` for each source and returns `1 - product`; it does
/// not look at `previous`.
pub fn raw_combination<I>(rule: CombinationRule, previous: f64, values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    match rule {
        CombinationRule::Maximum => values.into_iter().fold(previous, f64::max),
        CombinationRule::Product => {
            let survival = values.into_iter().fold(1.0, |acc, d| acc * (1.0 - d));
            1.0 - survival
        }
    }
}

/// Clamp to [0, 1], floor by `previous`, then cap by `max_damage`
///
/// The order matters: when `max_damage < previous` the cap wins and the
/// result drops below `previous`. A NaN raw value bounds to 1.0.
pub fn limit(raw: f64, previous: f64, max_damage: f64) -> f64 {
    let bounded = raw.min(1.0).max(0.0);
    bounded.max(previous).min(max_damage)
}

/// Full per-point update: raw combination followed by [`limit`]
pub fn combine<I>(rule: CombinationRule, previous: f64, values: I, max_damage: f64) -> f64
where
    I: IntoIterator<Item = f64>,
{
    limit(raw_combination(rule, previous, values), previous, max_damage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_maximum_example() {
        let d = combine(CombinationRule::Maximum, 0.2, [0.3, 0.7, 0.1], 1.0);
        assert!((d - 0.7).abs() < EPS);
    }

    #[test]
    fn test_product_example() {
        let d = combine(CombinationRule::Product, 0.0, [0.5, 0.5], 0.9);
        assert!((d - 0.75).abs() < EPS);
    }

    #[test]
    fn test_product_capped_example() {
        let raw = raw_combination(CombinationRule::Product, 0.0, [0.9, 0.9]);
        assert!((raw - 0.99).abs() < EPS);

        let d = combine(CombinationRule::Product, 0.0, [0.9, 0.9], 0.5);
        assert_eq!(d, 0.5);
    }

    #[test]
    fn test_maximum_keeps_previous_when_sources_are_lower() {
        let d = combine(CombinationRule::Maximum, 0.6, [0.3, 0.1], 1.0);
        assert_eq!(d, 0.6);
    }

    #[test]
    fn test_product_ignores_previous_until_floor() {
        let raw = raw_combination(CombinationRule::Product, 0.8, [0.1]);
        assert!((raw - 0.1).abs() < EPS);

        let d = combine(CombinationRule::Product, 0.8, [0.1], 1.0);
        assert_eq!(d, 0.8);
    }

    #[test]
    fn test_no_sources_is_inert() {
        for rule in [CombinationRule::Maximum, CombinationRule::Product] {
            assert_eq!(combine(rule, 0.35, std::iter::empty::<f64>(), 1.0), 0.35);
            assert_eq!(combine(rule, 0.0, std::iter::empty::<f64>(), 1.0), 0.0);
        }
        assert_eq!(raw_combination(CombinationRule::Product, 0.4, std::iter::empty::<f64>()), 0.0);
    }

    #[test]
    fn test_overshoot_is_clamped() {
        // Upstream rounding can push a source just outside [0, 1]
        let d = combine(CombinationRule::Maximum, 0.0, [1.0 + 1e-9], 1.0);
        assert_eq!(d, 1.0);

        let d = combine(CombinationRule::Product, 0.0, [-1e-9], 1.0);
        assert_eq!(d, 0.0);
    }

    #[test]
    fn test_nan_bounds_to_full_damage() {
        assert_eq!(limit(f64::NAN, 0.2, 1.0), 1.0);
        assert_eq!(limit(f64::NAN, 0.2, 0.6), 0.6);
        assert_eq!(combine(CombinationRule::Maximum, 0.1, [f64::NAN], 1.0), 0.1);
        assert_eq!(combine(CombinationRule::Product, 0.1, [f64::NAN], 1.0), 1.0);
    }

    #[test]
    fn test_cap_wins_over_floor() {
        // previous above the cap: the cap is applied last
        let d = combine(CombinationRule::Maximum, 0.8, [0.9], 0.5);
        assert_eq!(d, 0.5);
    }

    #[test]
    fn test_full_damage_source_saturates_product() {
        let d = combine(CombinationRule::Product, 0.0, [0.2, 1.0, 0.4], 1.0);
        assert_eq!(d, 1.0);
    }

    fn damage() -> impl Strategy<Value = f64> {
        0.0..=1.0f64
    }

    fn rules() -> impl Strategy<Value = CombinationRule> {
        prop_oneof![Just(CombinationRule::Maximum), Just(CombinationRule::Product)]
    }

    proptest! {
        #[test]
        fn prop_result_is_bounded_and_monotone(
            rule in rules(),
            previous in damage(),
            values in prop::collection::vec(damage(), 0..8),
        ) {
            let d = combine(rule, previous, values, 1.0);
            prop_assert!((0.0..=1.0).contains(&d));
            prop_assert!(d >= previous);
        }

        #[test]
        fn prop_result_respects_cap(
            rule in rules(),
            previous in damage(),
            values in prop::collection::vec(damage(), 0..8),
            max_damage in damage(),
        ) {
            let d = combine(rule, previous, values, max_damage);
            prop_assert!(d <= max_damage);
            prop_assert!(d <= 1.0);
            if previous <= max_damage {
                prop_assert!(d >= previous);
            }
        }

        #[test]
        fn prop_maximum_matches_largest_value(
            previous in damage(),
            values in prop::collection::vec(damage(), 0..8),
            max_damage in damage(),
        ) {
            let largest = values.iter().copied().fold(previous, f64::max);
            let d = combine(CombinationRule::Maximum, previous, values, max_damage);
            prop_assert_eq!(d, largest.min(max_damage));
        }

        #[test]
        fn prop_product_matches_union_probability(
            previous in damage(),
            values in prop::collection::vec(damage(), 0..8),
            max_damage in damage(),
        ) {
            let survival: f64 = values.iter().map(|d| 1.0 - d).product();
            let expected = (1.0 - survival).clamp(0.0, 1.0).max(previous).min(max_damage);
            let d = combine(CombinationRule::Product, previous, values, max_damage);
            prop_assert!((d - expected).abs() < 1e-12);
        }

        #[test]
        fn prop_repeated_evaluation_is_idempotent(
            rule in rules(),
            previous in damage(),
            values in prop::collection::vec(damage(), 0..8),
            max_damage in damage(),
        ) {
            let first = combine(rule, previous, values.iter().copied(), max_damage);
            let second = combine(rule, previous, values.iter().copied(), max_damage);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_order_does_not_change_result(
            rule in rules(),
            previous in damage(),
            values in prop::collection::vec(damage(), 0..8),
        ) {
            let forward = combine(rule, previous, values.iter().copied(), 1.0);
            let backward = combine(rule, previous, values.iter().rev().copied(), 1.0);
            prop_assert!((forward - backward).abs() < 1e-12);
        }

        #[test]
        fn prop_sequence_over_steps_never_decreases(
            rule in rules(),
            steps in prop::collection::vec(prop::collection::vec(damage(), 0..5), 1..10),
        ) {
            let mut previous = 0.0;
            for values in steps {
                let current = combine(rule, previous, values, 1.0);
                prop_assert!(current >= previous);
                previous = current;
            }
        }
    }
}
