//! Integration tests for calibration run extraction

use demvironment::extract::{
    extract, extract_with_options, ExtractError, ExtractOptions, ParamValue, PsdOrder, RunFiles,
};
use std::fs;
use tempfile::tempdir;

const LOG: &str = "\
This is Aspherix(R)calibration version 6.2.1
git commit 88ab01e (release)
INFO: attempting to restart calibration
INFO: run mode single
calibration_case c1 template angleOfRepose target_param fric_coef_pp measfile aor.txt
variable normal_contact_model string hooke
variable char_vel string 0.8
variable density_p string 1800
variable rp1 string 0.001
variable mf1 string 0.2
variable rp2 string 0.002
variable mf2 string 0.3
variable rp3 string 0.003
variable mf3 string 0.5
variable density_p string 1850
param_calibration fric_coef_pp type scalar init 0.5 min 0.1 max 1.0
INFO: optimizer finished
";

fn write_run(log: &str, params: &str) -> (tempfile::TempDir, RunFiles) {
    let dir = tempdir().unwrap();
    let files = RunFiles::in_directory(dir.path());
    fs::write(&files.log_path, log).unwrap();
    fs::write(&files.params_path, params).unwrap();
    (dir, files)
}

#[test]
fn test_extract_run_directory() {
    let (_dir, files) = write_run(LOG, "param value\nfric_coef_pp 0.38\n");
    assert!(files.is_complete());

    let (record, calibrated) = extract(&files.log_path, &files.params_path).unwrap();

    assert_eq!(record.software.version, "6.2.1");
    assert_eq!(record.software.attempting_to, "restart");
    assert_eq!(record.software.run_mode, "single");
    assert_eq!(record.templates["angleOfRepose"], vec!["fric_coef_pp".to_string()]);

    // The last assignment of a variable wins
    assert_eq!(record.input_parameters["density_p"], ParamValue::Int(1850));
    // char_vel is kept for the hooke model
    assert_eq!(record.input_parameters["char_vel"], ParamValue::Float(0.8));

    assert_eq!(record.psd.dispersity, 3);
    assert!(!record.converged);
    assert_eq!(record.convergence_label(), "No");
    assert_eq!(calibrated["fric_coef_pp"], 0.38);
}

#[test]
fn test_psd_orders() {
    let (_dir, files) = write_run(LOG, "");

    let options = ExtractOptions::default().with_psd_order(PsdOrder::FileOrder);
    let (record, _) = extract_with_options(&files.log_path, &files.params_path, &options).unwrap();
    assert_eq!(
        record.psd.radii_list,
        vec![ParamValue::Float(0.001), ParamValue::Float(0.002), ParamValue::Float(0.003)]
    );
    assert_eq!(
        record.psd.mass_fractions_list,
        vec![ParamValue::Float(0.2), ParamValue::Float(0.3), ParamValue::Float(0.5)]
    );

    let options = ExtractOptions::default().with_psd_order(PsdOrder::ReverseScan);
    let (record, _) = extract_with_options(&files.log_path, &files.params_path, &options).unwrap();
    assert_eq!(
        record.psd.radii_list,
        vec![ParamValue::Float(0.003), ParamValue::Float(0.002), ParamValue::Float(0.001)]
    );
    assert_eq!(record.psd.mass_fractions_list[0], ParamValue::Float(0.5));
}

#[test]
fn test_missing_inputs() {
    let dir = tempdir().unwrap();
    let files = RunFiles::in_directory(dir.path());
    fs::write(&files.log_path, LOG).unwrap();

    assert_eq!(files.missing(), vec![files.params_path.as_path()]);
    match extract(&files.log_path, &files.params_path).unwrap_err() {
        ExtractError::NotFound(path) => assert_eq!(path, files.params_path),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_non_utf8_log_is_read() {
    let dir = tempdir().unwrap();
    let files = RunFiles::in_directory(dir.path());
    let mut bytes = b"variable density_p string 2500\nwarning: caf\xe9 \xff\n".to_vec();
    bytes.extend_from_slice(b"INFO: calibration ended successfully\n");
    fs::write(&files.log_path, bytes).unwrap();
    fs::write(&files.params_path, "h\n").unwrap();

    let (record, calibrated) = extract(&files.log_path, &files.params_path).unwrap();
    assert!(record.converged);
    assert_eq!(record.input_parameters["density_p"], ParamValue::Int(2500));
    assert!(calibrated.is_empty());
}

#[test]
fn test_invalid_calibrated_value() {
    let (_dir, files) = write_run(LOG, "param value\nfric_coef_pp n/a\n");
    assert!(matches!(
        extract(&files.log_path, &files.params_path).unwrap_err(),
        ExtractError::InvalidValue { .. }
    ));
}
