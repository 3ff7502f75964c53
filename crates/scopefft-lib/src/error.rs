use std::path::PathBuf;
use thiserror::Error;

/// Fatal analysis errors. The window variant is a configuration mistake and
/// names the valid choices; every other variant means the capture is
/// malformed or unusable.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("{name} is no valid window function (valid: hann, hamm, black)")]
    UnknownWindow { name: String },
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path}: row {row}: {reason}")]
    MalformedRow {
        path: PathBuf,
        row: usize,
        reason: String,
    },
    #[error("capture holds {rows} data rows past the preamble; need at least 2")]
    TooFewSamples { rows: usize },
    #[error("time and value sequences differ in length ({times} vs {values})")]
    LengthMismatch { times: usize, values: usize },
    #[error("time axis is not strictly increasing at sample {index}")]
    NonIncreasingTime { index: usize },
    #[error("sampling interval drifts at sample {index}: expected {expected}s, got {actual}s")]
    NonUniformSampling {
        index: usize,
        expected: f64,
        actual: f64,
    },
}
