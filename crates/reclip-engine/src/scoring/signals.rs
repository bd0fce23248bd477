//! Externally supplied time series (audio energy, novelty).

use serde::{Deserialize, Serialize};

/// One sample of a signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalSample {
    pub time: f64,
    pub value: f64,
}

/// Time-ordered samples of a feature signal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SampledSignal {
    #[serde(default)]
    pub samples: Vec<SignalSample>,
}

impl SampledSignal {
    pub fn new(mut samples: Vec<SignalSample>) -> Self {
        samples.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { samples }
    }

    /// Mean of the samples in `[start, end]`, clamped to `[0, 1]`.
    ///
    /// `None` when no sample falls inside the span.
    pub fn mean_over(&self, start: f64, end: f64) -> Option<f64> {
        let lo = self.samples.partition_point(|s| s.time < start);
        let hi = self.samples.partition_point(|s| s.time <= end);
        if hi <= lo {
            return None;
        }
        let inside = &self.samples[lo..hi];
        let mean = inside.iter().map(|s| s.value).sum::<f64>() / inside.len() as f64;
        Some(mean.clamp(0.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_over_span() {
        let signal = SampledSignal::new(vec![
            SignalSample { time: 2.0, value: 0.8 },
            SignalSample { time: 0.0, value: 0.2 },
            SignalSample { time: 1.0, value: 0.4 },
        ]);
        assert!((signal.mean_over(0.0, 1.0).unwrap() - 0.3).abs() < 1e-12);
        assert_eq!(signal.mean_over(5.0, 6.0), None);
    }

    #[test]
    fn test_mean_is_clamped() {
        let signal = SampledSignal::new(vec![SignalSample { time: 0.0, value: 3.0 }]);
        assert_eq!(signal.mean_over(0.0, 1.0), Some(1.0));
    }
}
