use csv::ReaderBuilder;
use std::fs::File;
use std::path::Path;

use crate::error::AnalysisError;
use crate::signal::Waveform;

/// Rows of instrument preamble (model, record length, trigger setup, ...)
/// before the numeric data in a scope CSV export.
const PREAMBLE_ROWS: usize = 19;

/// Load a scope capture CSV: skip the instrument preamble, read the two
/// unnamed numeric columns as (time, value) and shift the time axis so the
/// record starts at t = 0.
pub fn read_scope_csv(path: &Path) -> Result<Waveform, AnalysisError> {
    let file = File::open(path).map_err(|source| AnalysisError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let mut time = Vec::new();
    let mut value = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let record = result.map_err(|e| AnalysisError::MalformedRow {
            path: path.to_path_buf(),
            row: row + 1,
            reason: e.to_string(),
        })?;
        if row < PREAMBLE_ROWS {
            continue;
        }
        let (t, v) = parse_row(&record).map_err(|reason| AnalysisError::MalformedRow {
            path: path.to_path_buf(),
            row: row + 1,
            reason,
        })?;
        time.push(t);
        value.push(v);
    }
    if value.len() < 2 {
        return Err(AnalysisError::TooFewSamples { rows: value.len() });
    }

    let mut waveform = Waveform { time, value };
    waveform.shift_time_origin();
    for (t, v) in waveform.time.iter().zip(&waveform.value).take(5) {
        log::debug!("{t:>13.6e}  {v:>13.6e}");
    }
    if let Some(ts) = waveform.sample_interval() {
        log::info!(
            "{}: {} samples, sampling interval {ts:.5e}s",
            path.display(),
            waveform.len()
        );
    }
    Ok(waveform)
}

fn parse_row(record: &csv::StringRecord) -> Result<(f64, f64), String> {
    Ok((field(record, 0)?, field(record, 1)?))
}

fn field(record: &csv::StringRecord, idx: usize) -> Result<f64, String> {
    let raw = record
        .get(idx)
        .ok_or_else(|| format!("missing column {}", idx + 1))?;
    raw.trim()
        .parse::<f64>()
        .map_err(|_| format!("column {} is not numeric: {raw:?}", idx + 1))
}
