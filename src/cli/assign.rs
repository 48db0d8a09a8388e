use anyhow::{bail, Context, Result};
use log::{info, warn};
use serde_json::Value;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use demvironment::registry::{
    EntityKind, MetadataRecord, OverwritePolicy, META_INFO_KEY,
};

use super::Settings;

/// Give a payload a fresh DOI and store it as version 0
pub fn run(
    ctx: &Settings,
    payload: PathBuf,
    kind: Option<EntityKind>,
    copy_to_source: bool,
) -> Result<()> {
    let text = fs::read_to_string(&payload)
        .with_context(|| format!("Failed to read {}", payload.display()))?;
    let value: Value = serde_json::from_str(&text)
        .with_context(|| format!("{} is not valid JSON", payload.display()))?;
    let Value::Object(body) = value else {
        bail!("{} does not hold a JSON object", payload.display());
    };
    if body.contains_key(META_INFO_KEY) {
        bail!(
            "{} already carries {}; use `register` or `new-version` instead",
            payload.display(),
            META_INFO_KEY
        );
    }

    let kind = match kind {
        Some(kind) => kind,
        None => EntityKind::detect(&body).with_context(|| {
            format!(
                "Cannot tell the kind of {}: no '{}', '{}' or '{}' section, pass --kind",
                payload.display(),
                EntityKind::Exp.section(),
                EntityKind::Rel.section(),
                EntityKind::Calib.section()
            )
        })?,
    };

    let warehouse = ctx.warehouse()?;
    let doi = warehouse.generate_identifier(kind)?;
    let record = MetadataRecord::new(doi, body);
    let result = warehouse
        .register(&record, OverwritePolicy::Refuse)
        .with_context(|| format!("Failed to register {}", record.doi()))?;
    info!("Registered {} as {}", payload.display(), record.doi());

    if copy_to_source {
        match kind.source_directory(&record.body) {
            Some(dir) => {
                let target = dir.join(record.doi().file_name());
                let file = File::create(&target)
                    .with_context(|| format!("Failed to create {}", target.display()))?;
                let mut writer = BufWriter::new(file);
                record.write_pretty(&mut writer)?;
                writer.flush()?;
                println!("Copy:     {}", target.display());
            }
            None => warn!(
                "{} names no source location; skipping the copy",
                payload.display()
            ),
        }
    }

    println!("DOI:      {}", record.doi());
    println!("Record:   {}", result.path().display());
    Ok(())
}
