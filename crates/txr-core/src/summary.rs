//! Mean and standard deviation of every metric in a set.

use serde::{Deserialize, Serialize};

use crate::metrics::{MetricName, MetricSet};

/// Summary statistics of one metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    pub metric: MetricName,
    pub mean: f64,
    /// Population standard deviation.
    pub std: f64,
}

/// Mean and population standard deviation. NaN inputs propagate.
pub fn mean_std(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, var.sqrt())
}

/// Summaries for all twelve metrics, in canonical order.
pub fn summarize(set: &MetricSet) -> Vec<MetricSummary> {
    set.iter()
        .map(|(metric, values)| {
            let (mean, std) = mean_std(values);
            MetricSummary { metric, mean, std }
        })
        .collect()
}

/// Fixed-width text table.
pub fn render_summary(summaries: &[MetricSummary]) -> String {
    let mut out = String::from("=== STATISTICS SUMMARY ===\n");
    for s in summaries {
        out.push_str(&format!(
            "{:25} | Mean: {:.6} | Std: {:.6}\n",
            s.metric.label(),
            s.mean,
            s.std
        ));
    }
    out.push_str(&"=".repeat(60));
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use txr_common::ConfusionCounts;

    #[test]
    fn mean_std_population() {
        let (m, s) = mean_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_eq!(m, 5.0);
        assert_eq!(s, 2.0);
    }

    #[test]
    fn nan_propagates() {
        let (m, s) = mean_std(&[1.0, f64::NAN]);
        assert!(m.is_nan());
        assert!(s.is_nan());
    }

    #[test]
    fn constant_batch_has_zero_spread() {
        let counts = vec![ConfusionCounts::new(8, 7, 3, 2); 4];
        let set = MetricSet::from_counts(counts);
        let rows = summarize(&set);
        assert_eq!(rows.len(), 12);
        let tpr = rows.iter().find(|r| r.metric == MetricName::Tpr).unwrap();
        assert!((tpr.mean - 0.8).abs() < 1e-12);
        assert!(tpr.std.abs() < 1e-12);
    }

    #[test]
    fn table_layout() {
        let rows = vec![MetricSummary {
            metric: MetricName::F1Score,
            mean: 0.5,
            std: 0.25,
        }];
        let text = render_summary(&rows);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "=== STATISTICS SUMMARY ===");
        assert_eq!(&lines[1][..25], format!("{:25}", "F1 score"));
        assert_eq!(&lines[1][25..], " | Mean: 0.500000 | Std: 0.250000");
        assert_eq!(lines[2], "=".repeat(60));
    }
}
