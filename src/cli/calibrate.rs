use anyhow::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;

use demvironment::extract::extract_with_options;
use demvironment::metadata::{
    CalibrationCase, CalibrationDocument, Cohesivity, ConsolidationLevel, FlowState,
    TemplateReferences, UserInfo,
};
use demvironment::registry::{EntityKind, OverwritePolicy};

use super::{RunArgs, Settings};

/// Inputs of the calibrate command
pub struct CalibrateArgs {
    pub run: RunArgs,
    pub user: PathBuf,
    pub case_name: String,
    pub cohesivity: Cohesivity,
    pub flow_state: FlowState,
    pub consolidation: ConsolidationLevel,
    pub pressure: f64,
    pub templates: Vec<(String, PathBuf)>,
}

/// Extract a run, assemble its calibration document and register it
pub fn run(ctx: &Settings, args: CalibrateArgs) -> Result<()> {
    let warehouse = ctx.warehouse()?;

    let files = ctx.config().run_files(
        &args.run.run_dir,
        args.run.log_file.as_deref(),
        args.run.params_file.as_deref(),
    );
    let options = ctx.config().extract_options(args.run.psd_order.map(Into::into));
    let (log, calibrated) = extract_with_options(&files.log_path, &files.params_path, &options)
        .with_context(|| format!("Failed to extract {}", files.directory.display()))?;

    let user_text = fs::read_to_string(&args.user)
        .with_context(|| format!("Failed to read {}", args.user.display()))?;
    let user: UserInfo = serde_json::from_str(&user_text)
        .with_context(|| format!("{} is not a user information file", args.user.display()))?;

    let mut case = CalibrationCase::new(args.case_name, files.directory.clone());
    case.cohesivity = args.cohesivity;
    case.target_flow_state = args.flow_state;
    case.consolidation_level = args.consolidation;
    case.consolidation_pressure = args.pressure;

    let mut references = TemplateReferences::new();
    for (template, path) in args.templates {
        references.bind(template, path);
    }
    info!("{} template binding(s)", references.len());

    let document = CalibrationDocument::assemble(user, case, log, calibrated, &references)
        .context("Calibration metadata is incomplete")?;

    let doi = warehouse.generate_identifier(EntityKind::Calib)?;
    let record = document.into_record(doi)?;
    let result = warehouse
        .register(&record, OverwritePolicy::Refuse)
        .with_context(|| format!("Failed to register {}", record.doi()))?;

    println!("DOI:      {}", record.doi());
    println!("Record:   {}", result.path().display());
    Ok(())
}
