use realfft::num_complex::Complex;
use realfft::RealFftPlanner;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::error::AnalysisError;
use crate::signal::Waveform;

/// Window functions offered on the command line.
///
/// Weights follow NumPy's symmetric definitions (denominator `len - 1`) so
/// magnitudes line up with captures inspected in numpy/scipy tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindowKind {
    Hann,
    Hamm,
    Black,
}

impl WindowKind {
    pub fn from_name(name: &str) -> Result<Self, AnalysisError> {
        match name {
            "hann" => Ok(Self::Hann),
            "hamm" => Ok(Self::Hamm),
            "black" => Ok(Self::Black),
            _ => Err(AnalysisError::UnknownWindow {
                name: name.to_string(),
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Hann => "hann",
            Self::Hamm => "hamm",
            Self::Black => "black",
        }
    }

    /// Full text used in plot titles and logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Hann => "Hanning",
            Self::Hamm => "Hamming",
            Self::Black => "Blackman",
        }
    }

    /// Window weights for a record of `len` samples.
    pub fn weights(&self, len: usize) -> Vec<f64> {
        if len < 2 {
            return vec![1.0; len];
        }
        let m = (len - 1) as f64;
        (0..len)
            .map(|n| {
                let x = 2.0 * PI * n as f64 / m;
                match self {
                    Self::Hann => 0.5 - 0.5 * x.cos(),
                    Self::Hamm => 0.54 - 0.46 * x.cos(),
                    Self::Black => 0.42 - 0.5 * x.cos() + 0.08 * (2.0 * x).cos(),
                }
            })
            .collect()
    }
}

/// One-sided magnitude spectrum, frequency in Hz, magnitude in milliamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spectrum {
    pub freq: Vec<f64>,
    pub magnitude: Vec<f64>,
}

impl Spectrum {
    pub fn len(&self) -> usize {
        self.freq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.freq.is_empty()
    }

    pub fn points(&self) -> Vec<[f64; 2]> {
        self.freq
            .iter()
            .zip(&self.magnitude)
            .map(|(f, m)| [*f, *m])
            .collect()
    }

    /// Highest-magnitude bin as (frequency, magnitude).
    pub fn peak(&self) -> Option<(f64, f64)> {
        self.freq
            .iter()
            .zip(&self.magnitude)
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .map(|(f, m)| (*f, *m))
    }
}

/// Windowed single-sided magnitude spectrum of a uniformly sampled capture.
///
/// The one-sided length is `N = M/2 + 1`; the axis is `N` evenly spaced
/// points over `[0, fs/2]` inclusive and magnitudes are scaled by
/// `2 * 1000 / N`, reading as milliamps when the capture is in amps.
/// Complex bins 0 and 1 are forced to zero before magnitudes are taken;
/// zeroing bin 1 discards legitimate sub-2-bin content, but the scope
/// tooling this replaces did the same and captures are compared against it
/// bin for bin.
pub fn magnitude_spectrum(
    waveform: &Waveform,
    window: WindowKind,
) -> Result<Spectrum, AnalysisError> {
    let m = waveform.value.len();
    if waveform.time.len() != m {
        return Err(AnalysisError::LengthMismatch {
            times: waveform.time.len(),
            values: m,
        });
    }
    if m < 2 {
        return Err(AnalysisError::TooFewSamples { rows: m });
    }
    let ts = waveform.time[1] - waveform.time[0];
    if ts <= 0.0 {
        return Err(AnalysisError::NonIncreasingTime { index: 1 });
    }
    let fs = 1.0 / ts;
    let n = m / 2 + 1;
    log::debug!(
        "dt={ts:.5e}s fs={fs:.2}Hz n={n} window={}",
        window.label()
    );

    let weights = window.weights(m);
    let mut frame: Vec<f64> = waveform
        .value
        .iter()
        .zip(&weights)
        .map(|(y, w)| y * w)
        .collect();
    let mut planner = RealFftPlanner::<f64>::new();
    let r2c = planner.plan_fft_forward(m);
    let mut bins = r2c.make_output_vec();
    r2c.process(&mut frame, &mut bins).unwrap();

    bins[0] = Complex::new(0.0, 0.0);
    bins[1] = Complex::new(0.0, 0.0);

    let scale = 2.0 * 1000.0 / n as f64;
    let freq = (0..n)
        .map(|i| (fs / 2.0) * i as f64 / (n - 1) as f64)
        .collect();
    let magnitude = bins.iter().map(|c| c.norm() * scale).collect();
    Ok(Spectrum { freq, magnitude })
}

/// One-line machine-readable summary of a single estimate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpectrumReport {
    pub window: String,
    pub sample_interval_s: f64,
    pub sample_rate_hz: f64,
    pub bins: usize,
    pub peak_hz: f64,
    pub peak_ma: f64,
    pub points: Vec<[f64; 2]>,
}

impl SpectrumReport {
    pub fn new(waveform: &Waveform, spectrum: &Spectrum, window: WindowKind) -> Self {
        let ts = waveform.sample_interval().unwrap_or(0.0);
        let (peak_hz, peak_ma) = spectrum.peak().unwrap_or((0.0, 0.0));
        Self {
            window: window.label().to_string(),
            sample_interval_s: ts,
            sample_rate_hz: if ts > 0.0 { 1.0 / ts } else { 0.0 },
            bins: spectrum.len(),
            peak_hz,
            peak_ma,
            points: spectrum.points(),
        }
    }
}
