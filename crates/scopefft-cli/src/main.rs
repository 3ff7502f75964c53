use anyhow::{Context, Result};
use clap::Parser;
use plotters::coord::Shift;
use plotters::prelude::*;
use scopefft_lib::{
    io::scope::read_scope_csv,
    plot::{figure_from_spectrum, figure_from_waveform, Color, Figure, Series},
    signal::{self, Waveform},
    spectrum::{magnitude_spectrum, SpectrumReport, WindowKind},
};
use std::path::{Path, PathBuf};

const TIME_TRACE_COLOR: u32 = 0xCC0000;
const SPECTRUM_TRACE_COLOR: u32 = 0x0044CC;
const PANEL_POINT_BUDGET: usize = 4096;
const UNIFORMITY_REL_TOL: f64 = 1e-3;

#[derive(Parser)]
#[command(
    name = "scopefft",
    version,
    about = "Windowed FFT of scope CSV captures"
)]
struct Cli {
    /// Capture CSV exported by the scope
    #[arg(short, long, default_value = "tek0001CH4.csv")]
    file: PathBuf,
    /// Window function applied before the FFT
    #[arg(short, long, default_value = "hamm", value_parser = WindowKind::from_name)]
    window: WindowKind,
    /// Two-panel PNG rendered for the capture
    #[arg(short, long, default_value = "spectrum.png")]
    out: PathBuf,
    /// Two-panel PNG rendered for the reference-sine self test
    #[arg(long, default_value = "self_test.png")]
    self_test_out: PathBuf,
    /// Optional raw time-domain diagnostic PNG of the loaded capture
    #[arg(long)]
    raw_out: Option<PathBuf>,
    /// Verify the sampling interval is uniform before transforming
    #[arg(long)]
    strict: bool,
    /// Print a machine-readable spectrum summary for the capture
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    // The estimator runs against a known sine before any real capture is
    // trusted.
    let reference = signal::self_test_sine();
    analyze(&reference, "sine test signal", cli.window, &cli.self_test_out)?;

    let capture = read_scope_csv(&cli.file)?;
    if cli.strict {
        capture.check_uniform(UNIFORMITY_REL_TOL)?;
    }
    if let Some(raw_out) = &cli.raw_out {
        let fig = figure_from_waveform("raw capture", &capture, PANEL_POINT_BUDGET, TIME_TRACE_COLOR);
        render_single(raw_out, &fig)?;
    }

    let title = cli.file.display().to_string();
    let report = analyze(&capture, &title, cli.window, &cli.out)?;
    if cli.json {
        println!("{}", serde_json::to_string(&report)?);
    }
    Ok(())
}

fn analyze(
    waveform: &Waveform,
    title: &str,
    window: WindowKind,
    out: &Path,
) -> Result<SpectrumReport> {
    let spectrum = magnitude_spectrum(waveform, window)?;
    let report = SpectrumReport::new(waveform, &spectrum, window);
    log::info!(
        "{title}: peak {:.1} mA at {:.1} Hz across {} bins ({} window)",
        report.peak_ma,
        report.peak_hz,
        report.bins,
        report.window
    );
    let top = figure_from_waveform(title, waveform, PANEL_POINT_BUDGET, TIME_TRACE_COLOR);
    let bottom = figure_from_spectrum(window, &spectrum, SPECTRUM_TRACE_COLOR);
    render_panels(out, &top, &bottom).with_context(|| format!("rendering {}", out.display()))?;
    Ok(report)
}

fn render_panels(path: &Path, top: &Figure, bottom: &Figure) -> Result<()> {
    let root = BitMapBackend::new(path, (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;
    let (upper, lower) = root.split_vertically(300);
    draw_figure(&upper, top)?;
    draw_figure(&lower, bottom)?;
    root.present()?;
    Ok(())
}

fn render_single(path: &Path, fig: &Figure) -> Result<()> {
    let root = BitMapBackend::new(path, (800, 480)).into_drawing_area();
    root.fill(&WHITE)?;
    draw_figure(&root, fig)?;
    root.present()?;
    Ok(())
}

fn draw_figure(area: &DrawingArea<BitMapBackend, Shift>, fig: &Figure) -> Result<()> {
    // Log axes cannot carry the 0 Hz bin; drop non-positive x up front.
    let points: Vec<[f64; 2]> = fig
        .series
        .iter()
        .flat_map(|series| match series {
            Series::Line(line) => line.points.iter().copied().collect::<Vec<_>>(),
        })
        .filter(|p| !fig.x.log_scale || p[0] > 0.0)
        .collect();
    let x_min = points
        .iter()
        .map(|p| p[0])
        .min_by(|a, b| a.partial_cmp(b).unwrap())
        .unwrap_or(if fig.x.log_scale { 1.0 } else { 0.0 });
    let x_max = points
        .iter()
        .map(|p| p[0])
        .max_by(|a, b| a.partial_cmp(b).unwrap())
        .unwrap_or(x_min + 1.0);
    let y_min = points
        .iter()
        .map(|p| p[1])
        .min_by(|a, b| a.partial_cmp(b).unwrap())
        .unwrap_or(0.0);
    let mut y_max = points
        .iter()
        .map(|p| p[1])
        .max_by(|a, b| a.partial_cmp(b).unwrap())
        .unwrap_or(1.0);
    if y_max <= y_min {
        y_max = y_min + 1.0;
    }

    let caption = fig.title.clone().unwrap_or_else(|| "Plot".into());
    if fig.x.log_scale {
        let mut chart = ChartBuilder::on(area)
            .margin(10)
            .caption(caption, ("sans-serif", 20))
            .x_label_area_size(30)
            .y_label_area_size(50)
            .build_cartesian_2d((x_min..x_max).log_scale(), y_min..y_max)?;
        chart
            .configure_mesh()
            .x_desc(fig.x.label.clone().unwrap_or_default())
            .y_desc(fig.y.label.clone().unwrap_or_default())
            .draw()?;
        for series in &fig.series {
            match series {
                Series::Line(line) => {
                    chart.draw_series(LineSeries::new(
                        line.points
                            .iter()
                            .filter(|p| p[0] > 0.0)
                            .map(|p| (p[0], p[1])),
                        &rgb(line.style.color),
                    ))?;
                }
            }
        }
    } else {
        let mut chart = ChartBuilder::on(area)
            .margin(10)
            .caption(caption, ("sans-serif", 20))
            .x_label_area_size(30)
            .y_label_area_size(50)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)?;
        chart
            .configure_mesh()
            .x_desc(fig.x.label.clone().unwrap_or_default())
            .y_desc(fig.y.label.clone().unwrap_or_default())
            .draw()?;
        for series in &fig.series {
            match series {
                Series::Line(line) => {
                    chart.draw_series(LineSeries::new(
                        line.points.iter().map(|p| (p[0], p[1])),
                        &rgb(line.style.color),
                    ))?;
                }
            }
        }
    }
    Ok(())
}

fn rgb(color: Color) -> RGBColor {
    RGBColor(
        ((color.0 >> 16) & 0xFF) as u8,
        ((color.0 >> 8) & 0xFF) as u8,
        (color.0 & 0xFF) as u8,
    )
}
