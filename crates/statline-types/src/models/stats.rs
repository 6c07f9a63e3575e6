use serde::{Deserialize, Serialize};

/// Summary statistics of one numeric field within one league.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldStatistics {
    pub mean: f64,
    pub std_dev: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    #[serde(default)]
    pub sample_count: usize,
}

impl FieldStatistics {
    /// Compute statistics from samples, ignoring non-finite values.
    ///
    /// Uses the sample standard deviation (n - 1); a single sample has a
    /// standard deviation of zero.
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        let mut values: Vec<f64> = samples.iter().copied().filter(|v| v.is_finite()).collect();
        if values.is_empty() {
            return None;
        }
        values.sort_by(f64::total_cmp);

        let n = values.len();
        let mean = values.iter().sum::<f64>() / n as f64;
        let std_dev = if n > 1 {
            let variance =
                values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
            variance.sqrt()
        } else {
            0.0
        };
        let median = if n % 2 == 0 {
            (values[n / 2 - 1] + values[n / 2]) / 2.0
        } else {
            values[n / 2]
        };

        Some(Self { mean, std_dev, median, min: values[0], max: values[n - 1], sample_count: n })
    }

    /// Z-score of `value`, or `None` when the spread is degenerate.
    pub fn z_score(&self, value: f64) -> Option<f64> {
        if !self.std_dev.is_finite() || self.std_dev <= 0.0 {
            return None;
        }
        Some((value - self.mean) / self.std_dev)
    }

    /// Replacement value for an outlier: the median clamped to the observed range.
    pub fn substitute(&self) -> f64 {
        self.median.max(self.min).min(self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_samples() {
        let stats = FieldStatistics::from_samples(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0])
            .unwrap_or_else(|| panic!("samples are non-empty"));
        assert_eq!(stats.mean, 5.0);
        assert_eq!(stats.median, 4.5);
        assert_eq!(stats.min, 2.0);
        assert_eq!(stats.max, 9.0);
        assert_eq!(stats.sample_count, 8);
        assert!((stats.std_dev - 2.138).abs() < 0.001);
    }

    #[test]
    fn test_from_samples_skips_non_finite() {
        assert!(FieldStatistics::from_samples(&[]).is_none());
        assert!(FieldStatistics::from_samples(&[f64::NAN, f64::INFINITY]).is_none());

        let stats = FieldStatistics::from_samples(&[3.0, f64::NAN])
            .unwrap_or_else(|| panic!("one finite sample"));
        assert_eq!(stats.sample_count, 1);
        assert_eq!(stats.std_dev, 0.0);
        assert!(stats.z_score(10.0).is_none());
    }

    #[test]
    fn test_z_score_and_substitute() {
        let stats =
            FieldStatistics { mean: 100.0, std_dev: 10.0, median: 98.0, min: 0.0, max: 200.0, sample_count: 50 };
        assert_eq!(stats.z_score(500.0), Some(40.0));
        assert_eq!(stats.z_score(90.0), Some(-1.0));
        assert_eq!(stats.substitute(), 98.0);
    }
}
