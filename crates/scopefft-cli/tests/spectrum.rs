use assert_cmd::cargo::cargo_bin_cmd;
use scopefft_lib::spectrum::SpectrumReport;
use std::{error::Error, path::PathBuf};

#[test]
fn capture_report_matches_fixture() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let out = dir.path().join("spectrum.png");
    let self_test_out = dir.path().join("self_test.png");
    let fixture = workspace_root().join("test_data/tek_sample.csv");

    let mut cmd = cargo_bin_cmd!("scopefft");
    cmd.args([
        "--file",
        fixture.to_str().expect("utf8 path"),
        "--out",
        out.to_str().expect("utf8 path"),
        "--self-test-out",
        self_test_out.to_str().expect("utf8 path"),
        "--strict",
        "--json",
    ]);
    let output = cmd.assert().success().get_output().stdout.clone();
    let report: SpectrumReport = serde_json::from_slice(&output)?;

    // 64 samples at 100 kHz: 33 one-sided bins, 12.5 kHz test tone.
    assert_eq!(report.window, "Hamming");
    assert_eq!(report.bins, 33);
    assert_close(report.sample_rate_hz, 100_000.0, 1e-6);
    assert_close(report.peak_hz, 12_500.0, 1e-6);
    assert!(
        report.peak_ma > 40.0 && report.peak_ma < 60.0,
        "peak magnitude {} mA outside the expected band",
        report.peak_ma
    );
    assert_eq!(report.points.len(), 33);
    assert_eq!(report.points[0][1], 0.0);
    assert_eq!(report.points[1][1], 0.0);
    assert!(out.exists(), "capture panel not rendered");
    assert!(self_test_out.exists(), "self-test panel not rendered");
    Ok(())
}

#[test]
fn hann_window_is_accepted() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let fixture = workspace_root().join("test_data/tek_sample.csv");

    let mut cmd = cargo_bin_cmd!("scopefft");
    cmd.args([
        "--file",
        fixture.to_str().expect("utf8 path"),
        "--window",
        "hann",
        "--out",
        dir.path().join("spectrum.png").to_str().expect("utf8 path"),
        "--self-test-out",
        dir.path().join("self_test.png").to_str().expect("utf8 path"),
        "--json",
    ]);
    let output = cmd.assert().success().get_output().stdout.clone();
    let report: SpectrumReport = serde_json::from_slice(&output)?;
    assert_eq!(report.window, "Hanning");
    assert_close(report.peak_hz, 12_500.0, 1e-6);
    Ok(())
}

#[test]
fn unknown_window_is_rejected_before_any_work() -> Result<(), Box<dyn Error>> {
    let mut cmd = cargo_bin_cmd!("scopefft");
    cmd.args(["--window", "boxcar"]);
    let output = cmd.assert().failure().get_output().stderr.clone();
    let stderr = String::from_utf8(output)?;
    assert!(
        stderr.contains("no valid window function"),
        "stderr: {stderr}"
    );
    assert!(stderr.contains("hann"), "stderr: {stderr}");
    Ok(())
}

#[test]
fn missing_capture_fails_with_diagnostic() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;

    let mut cmd = cargo_bin_cmd!("scopefft");
    cmd.args([
        "--file",
        "no_such_capture.csv",
        "--out",
        dir.path().join("spectrum.png").to_str().expect("utf8 path"),
        "--self-test-out",
        dir.path().join("self_test.png").to_str().expect("utf8 path"),
    ]);
    let output = cmd.assert().failure().get_output().stderr.clone();
    let stderr = String::from_utf8(output)?;
    assert!(stderr.contains("no_such_capture.csv"), "stderr: {stderr}");
    Ok(())
}

#[test]
fn raw_diagnostic_panel_is_optional() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let raw_out = dir.path().join("raw.png");
    let fixture = workspace_root().join("test_data/tek_sample.csv");

    let mut cmd = cargo_bin_cmd!("scopefft");
    cmd.args([
        "--file",
        fixture.to_str().expect("utf8 path"),
        "--out",
        dir.path().join("spectrum.png").to_str().expect("utf8 path"),
        "--self-test-out",
        dir.path().join("self_test.png").to_str().expect("utf8 path"),
        "--raw-out",
        raw_out.to_str().expect("utf8 path"),
    ]);
    cmd.assert().success();
    assert!(raw_out.exists(), "raw diagnostic not rendered");
    Ok(())
}

fn assert_close(a: f64, b: f64, rel_tol: f64) {
    let tol = b.abs().max(1.0) * rel_tol;
    let diff = (a - b).abs();
    assert!(
        diff <= tol,
        "diff {} exceeded tol {} ({} vs {})",
        diff,
        tol,
        a,
        b
    );
}

fn workspace_root() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .expect("crates dir")
        .parent()
        .expect("workspace root")
        .to_path_buf()
}
