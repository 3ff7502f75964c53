use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::error::AnalysisError;

/// Uniformly sampled scope capture: time in seconds, value in amps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Waveform {
    pub time: Vec<f64>,
    pub value: Vec<f64>,
}

impl Waveform {
    pub fn len(&self) -> usize {
        self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Interval between the first two samples. The rest of the axis is
    /// assumed to keep the same spacing unless [`check_uniform`] is called.
    ///
    /// [`check_uniform`]: Waveform::check_uniform
    pub fn sample_interval(&self) -> Option<f64> {
        if self.time.len() > 1 {
            Some(self.time[1] - self.time[0])
        } else {
            None
        }
    }

    pub fn sample_rate(&self) -> Option<f64> {
        self.sample_interval().map(|ts| 1.0 / ts)
    }

    /// Shift the time axis in place so the first sample sits at t = 0.
    pub fn shift_time_origin(&mut self) {
        let Some(&t0) = self.time.first() else {
            return;
        };
        for t in &mut self.time {
            *t -= t0;
        }
    }

    /// Opt-in strictness: every consecutive interval must be positive and
    /// stay within `rel_tol` of the leading one.
    pub fn check_uniform(&self, rel_tol: f64) -> Result<(), AnalysisError> {
        let Some(ts) = self.sample_interval() else {
            return Ok(());
        };
        if ts <= 0.0 {
            return Err(AnalysisError::NonIncreasingTime { index: 1 });
        }
        let tol = ts * rel_tol;
        for (i, pair) in self.time.windows(2).enumerate() {
            let dt = pair[1] - pair[0];
            if dt <= 0.0 {
                return Err(AnalysisError::NonIncreasingTime { index: i + 1 });
            }
            if (dt - ts).abs() > tol {
                return Err(AnalysisError::NonUniformSampling {
                    index: i + 1,
                    expected: ts,
                    actual: dt,
                });
            }
        }
        Ok(())
    }
}

/// Endpoint-inclusive sine over `[0, duration_s]`, `samples` points.
pub fn sine(freq_hz: f64, amplitude: f64, duration_s: f64, samples: usize) -> Waveform {
    let step = if samples > 1 {
        duration_s / (samples - 1) as f64
    } else {
        0.0
    };
    let time: Vec<f64> = (0..samples).map(|i| i as f64 * step).collect();
    let value = time
        .iter()
        .map(|&t| amplitude * (2.0 * PI * freq_hz * t).sin())
        .collect();
    Waveform { time, value }
}

/// Fixed 20 kHz unit-amplitude reference, 1001 samples over 4 ms. Run
/// through the estimator before any real capture is trusted.
pub fn self_test_sine() -> Waveform {
    sine(20_000.0, 1.0, 0.004, 1001)
}
