use serde::{Deserialize, Serialize};

use crate::signal::Waveform;
use crate::spectrum::{Spectrum, WindowKind};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Axis {
    pub label: Option<String>,
    #[serde(default)]
    pub log_scale: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Style {
    pub width: f32,
    pub color: Color,
}

#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
pub struct Color(pub u32);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineSeries {
    pub name: String,
    pub points: Vec<[f64; 2]>,
    pub style: Style,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Series {
    Line(LineSeries),
}

/// Backend-neutral figure description; the CLI renders these via plotters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Figure {
    pub title: Option<String>,
    pub x: Axis,
    pub y: Axis,
    pub series: Vec<Series>,
}

impl Figure {
    pub fn new(title: impl Into<Option<String>>) -> Self {
        Self {
            title: title.into(),
            x: Axis::default(),
            y: Axis::default(),
            series: Vec::new(),
        }
    }

    pub fn add_series(&mut self, series: Series) {
        self.series.push(series);
    }
}

pub fn decimate_points(points: &[[f64; 2]], max_points: usize) -> Vec<[f64; 2]> {
    if points.len() <= max_points {
        return points.to_vec();
    }
    let stride = points.len() as f64 / max_points as f64;
    (0..max_points)
        .map(|i| (i as f64 * stride).floor() as usize)
        .take_while(|&idx| idx < points.len())
        .map(|idx| points[idx])
        .collect()
}

/// Time-domain panel: x in milliseconds, y in amps.
pub fn figure_from_waveform(
    title: &str,
    waveform: &Waveform,
    max_points: usize,
    color: u32,
) -> Figure {
    let points: Vec<[f64; 2]> = waveform
        .time
        .iter()
        .zip(&waveform.value)
        .map(|(t, v)| [t * 1000.0, *v])
        .collect();
    let decimated = decimate_points(&points, max_points);
    let mut fig = Figure::new(Some(format!("time domain raw data - {title}")));
    fig.x.label = Some("time (ms)".into());
    fig.y.label = Some("Current (A)".into());
    fig.add_series(Series::Line(LineSeries {
        name: title.into(),
        points: decimated,
        style: Style {
            width: 1.4,
            color: Color(color),
        },
    }));
    fig
}

/// Frequency-domain panel: log x in Hz, y in milliamps.
pub fn figure_from_spectrum(window: WindowKind, spectrum: &Spectrum, color: u32) -> Figure {
    let mut fig = Figure::new(Some(format!("FFT with Window function: {}", window.label())));
    fig.x.label = Some("frequency (Hz)".into());
    fig.x.log_scale = true;
    fig.y.label = Some("Current (mA)".into());
    fig.add_series(Series::Line(LineSeries {
        name: window.label().into(),
        points: spectrum.points(),
        style: Style {
            width: 1.4,
            color: Color(color),
        },
    }));
    fig
}
