use anyhow::{bail, Context, Result};
use log::info;
use serde_json::json;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use demvironment::extract::extract_with_options;

use super::{RunArgs, Settings};

/// Extract a calibration run and print the sections as JSON
pub fn run(ctx: &Settings, run: RunArgs, output: Option<PathBuf>) -> Result<()> {
    let files = ctx.config().run_files(
        &run.run_dir,
        run.log_file.as_deref(),
        run.params_file.as_deref(),
    );
    let missing = files.missing();
    if !missing.is_empty() {
        let listed: Vec<String> = missing.iter().map(|p| p.display().to_string()).collect();
        bail!("Run directory is incomplete, missing: {}", listed.join(", "));
    }

    let options = ctx.config().extract_options(run.psd_order.map(Into::into));
    info!("Run directory: {}", files.directory.display());
    info!("PSD order: {:?}", options.psd_order);

    let (record, calibrated) = extract_with_options(&files.log_path, &files.params_path, &options)
        .with_context(|| format!("Failed to extract {}", files.directory.display()))?;

    info!(
        "Found {} template(s), {} calibrated parameter(s), converged: {}",
        record.templates.len(),
        calibrated.len(),
        record.convergence_label()
    );

    let document = json!({
        "Aspherix Info": record.software,
        "Templates Info": record.templates,
        "Models Info": record.models,
        "Input Parameters": record.input_parameters,
        "PSD": record.psd,
        "Calibrated Parameter Properties": record.calibrated_parameter_properties,
        "Convergence": { "isconverged": record.convergence_label() },
        "Calibrated Parameters": calibrated,
    });

    match output {
        Some(path) => {
            let file = File::create(&path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, &document)?;
            writeln!(writer)?;
            writer.flush()?;
            info!("Wrote {}", path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&document)?),
    }
    Ok(())
}
