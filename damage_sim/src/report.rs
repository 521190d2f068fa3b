//! Rendering of recorded step histories

use crate::simulation::StepRecord;
use std::fmt::Write;

/// Plain-text table: one row per step and reported model
pub fn render_table(records: &[StepRecord]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>5} {:>9} {:<20} {:>8} {:>8} {:>8} {:>12}",
        "step", "time", "model", "min", "mean", "max", "dt limit"
    );

    for record in records {
        let limit = match record.time_step_limit {
            Some(limit) => format!("{:.4}", limit),
            None => "-".to_string(),
        };
        for name in record.damage.keys() {
            if let Some((min, mean, max)) = record.summary(name) {
                let _ = writeln!(
                    out,
                    "{:>5} {:>9.3} {:<20} {:>8.4} {:>8.4} {:>8.4} {:>12}",
                    record.step, record.time, name, min, mean, max, limit
                );
            }
        }
    }
    out
}

/// Pretty-printed JSON of the full per-point history
pub fn render_json(records: &[StepRecord]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn record() -> StepRecord {
        let mut damage = BTreeMap::new();
        damage.insert("combined".to_string(), vec![0.25, 0.75]);
        StepRecord {
            step: 0,
            time: 1.0,
            damage,
            time_step_limit: None,
        }
    }

    #[test]
    fn test_table_row() {
        let table = render_table(&[record()]);
        let row = table.lines().nth(1).unwrap();
        assert!(row.contains("combined"));
        assert!(row.contains("0.2500"));
        assert!(row.contains("0.5000"));
        assert!(row.contains("0.7500"));
        assert!(row.trim_end().ends_with('-'));
    }

    #[test]
    fn test_json_history() {
        let json = render_json(&[record()]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["damage"]["combined"][1], 0.75);
        assert!(value[0]["time_step_limit"].is_null());
    }
}
