use super::*;
use crate::extract::{parse_log, ExtractOptions};
use crate::registry::{Doi, EntityKind, MetadataRecord, OverwritePolicy, Warehouse};
use serde_json::json;
use std::collections::BTreeMap;
use std::fs;
use tempfile::tempdir;

const LOG: &str = "\
This is Aspherix(R)calibration version 6.1.0
run mode single
calibration_case c1 template shearCell target_param fric_coef_pp measfile m.txt
variable normal_contact_model string hooke
variable char_vel string 0.5
variable rp1 string 0.001
variable mf1 string 1.0
param_calibration fric_coef_pp type scalar init 0.5 min 0.1 max 1.0
calibration ended successfully
";

fn user() -> UserInfo {
    UserInfo::new("Ada", "Lovelace", "ada@example.org", "Analytical Engines Ltd")
}

fn case() -> CalibrationCase {
    let mut case = CalibrationCase::new("glass beads", "/runs/glass");
    case.cohesivity = Cohesivity::Cohesive;
    case.target_flow_state = FlowState::Intermediate;
    case.consolidation_level = ConsolidationLevel::High;
    case.consolidation_pressure = 1500.0;
    case
}

fn calibrated() -> BTreeMap<String, f64> {
    BTreeMap::from([("fric_coef_pp".to_string(), 0.42)])
}

#[test]
fn test_user_validation() {
    assert!(user().validate().is_ok());

    let mut missing = user();
    missing.last_name.clear();
    missing.affiliation = "  ".to_string();
    match missing.validate().unwrap_err() {
        MetadataError::Validation(problems) => {
            assert_eq!(problems.len(), 1);
            assert!(problems[0].contains("Last Name, Affiliation"));
        }
        other => panic!("unexpected error: {other}"),
    }

    let mut bad_email = user();
    bad_email.email = "ada.example.org".to_string();
    assert!(bad_email.validate().is_err());
}

#[test]
fn test_email_shape() {
    assert!(is_valid_email("a@b.c").unwrap());
    assert!(is_valid_email("first.last@lab.uni.edu").unwrap());
    assert!(!is_valid_email("a@b").unwrap());
    assert!(!is_valid_email("@b.c").unwrap());
    assert!(!is_valid_email("nobody").unwrap());
}

#[test]
fn test_email_pattern_compiled_once() {
    let first = super::user::email_regex().unwrap();
    let second = super::user::email_regex().unwrap();
    assert!(std::ptr::eq(first, second));
}

#[test]
fn test_user_json_keys() {
    let json = serde_json::to_value(user()).unwrap();
    assert_eq!(json["First Name"], "Ada");
    assert_eq!(json["Email"], "ada@example.org");
}

#[test]
fn test_case_validation_and_labels() {
    assert!(case().validate().is_ok());

    let mut unnamed = case();
    unnamed.case_name = " ".to_string();
    unnamed.consolidation_pressure = -1.0;
    match unnamed.validate().unwrap_err() {
        MetadataError::Validation(problems) => assert_eq!(problems.len(), 2),
        other => panic!("unexpected error: {other}"),
    }

    let json = serde_json::to_value(case()).unwrap();
    assert_eq!(json["Cohesivity"], "cohesive");
    assert_eq!(json["Target Flow State"], "Intermediate");
    assert_eq!(json["Consolidation level"], "high");
    assert_eq!(json["Consolidation Pressure"], 1500.0);
    assert_eq!(json["Local Directory"], "/runs/glass");

    assert_eq!("quasi-static".parse::<FlowState>(), Ok(FlowState::QuasiStatic));
    assert_eq!("cohesionless".parse::<Cohesivity>(), Ok(Cohesivity::Cohesionless));
    assert!("medium".parse::<ConsolidationLevel>().is_err());
}

#[test]
fn test_assemble_document() {
    let dir = tempdir().unwrap();
    let warehouse = Warehouse::open(dir.path()).unwrap();
    let exp = MetadataRecord::new(
        Doi::generate(EntityKind::Exp),
        json!({"Data Info": {"File location/Links": "/data/shear.csv"}})
            .as_object()
            .unwrap()
            .clone(),
    );
    let exp_path = warehouse
        .register(&exp, OverwritePolicy::Refuse)
        .unwrap()
        .path()
        .to_path_buf();

    let log = parse_log(LOG, &ExtractOptions::default()).unwrap();
    let references = TemplateReferences::new().with("shearCell", &exp_path);
    let document =
        CalibrationDocument::assemble(user(), case(), log, calibrated(), &references).unwrap();

    assert_eq!(document.convergence.is_converged, "Yes");
    assert_eq!(document.template_meta_info["shearCell"], exp.meta_info);

    let body = document.to_body().unwrap();
    let keys: Vec<&str> = body.keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        vec![
            "User Data",
            "Calibration Case",
            "Aspherix Info",
            "Templates Info",
            "Models Info",
            "Input Parameters",
            "PSD",
            "Calibrated Parameter Properties",
            "Convergence",
            "Calibrated Parameters",
            "Template Meta Info",
        ]
    );
    assert_eq!(body["Convergence"], json!({"isconverged": "Yes"}));
    assert_eq!(body["Input Parameters"]["char_vel"], 0.5);
    assert_eq!(body["Calibrated Parameters"]["fric_coef_pp"], 0.42);
    assert_eq!(body["Template Meta Info"]["shearCell"]["doi"], exp.doi().to_string());

    let restored = CalibrationDocument::from_body(&body).unwrap();
    assert_eq!(restored, document);

    let record = restored.into_record(Doi::generate(EntityKind::Calib)).unwrap();
    assert_eq!(record.version(), 0);
    assert!(warehouse.register(&record, OverwritePolicy::Refuse).is_ok());
}

#[test]
fn test_assemble_collects_all_problems() {
    let dir = tempdir().unwrap();
    let not_a_record = dir.path().join("plain.json");
    fs::write(&not_a_record, r#"{"Data Info": {}}"#).unwrap();

    let log = parse_log(
        "calibration_case a template drum target_param x measfile m\n\
         calibration_case b template shear target_param y measfile m\n\
         calibration_case c template press target_param z measfile m\n\
         end\n",
        &ExtractOptions::default(),
    )
    .unwrap();
    let references = TemplateReferences::new()
        .with("drum", &not_a_record)
        .with("shear", dir.path().join("missing.json"));

    let mut bad_user = user();
    bad_user.first_name.clear();

    match CalibrationDocument::assemble(bad_user, case(), log, calibrated(), &references).unwrap_err() {
        MetadataError::Validation(problems) => {
            assert_eq!(problems.len(), 4, "{problems:?}");
            assert!(problems.iter().any(|p| p.contains("First Name")));
            assert!(problems.iter().any(|p| p.contains("'drum'")));
            assert!(problems.iter().any(|p| p.contains("'shear'")));
            assert!(problems.iter().any(|p| p.contains("'press'")));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_unconverged_run_label() {
    let log = parse_log("ERROR: calibration ended successfully\n", &ExtractOptions::default()).unwrap();
    let document = CalibrationDocument::assemble(
        user(),
        case(),
        log,
        BTreeMap::new(),
        &TemplateReferences::new(),
    )
    .unwrap();
    assert_eq!(document.convergence.is_converged, "No");
    assert!(document.template_meta_info.is_empty());
}
