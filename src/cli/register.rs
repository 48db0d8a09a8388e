use anyhow::{bail, Context, Result};
use log::info;
use std::path::PathBuf;

use demvironment::registry::{
    load_record_file, OverwritePolicy, RegistrationResult, RegistryError,
};

use super::Settings;

/// Register a complete record, refusing to replace a newer one unless forced
pub fn register(ctx: &Settings, path: PathBuf, force: bool) -> Result<()> {
    let warehouse = ctx.warehouse()?;
    let record = load_record_file(&path)
        .with_context(|| format!("Failed to load record {}", path.display()))?;
    let policy = if force {
        OverwritePolicy::Force
    } else {
        OverwritePolicy::Refuse
    };

    let result = match warehouse.register(&record, policy) {
        Ok(result) => result,
        Err(RegistryError::VersionConflict {
            doi,
            existing,
            proposed,
        }) => bail!(
            "The warehouse holds version {} of {}; version {} was not written. \
             Re-run with --force to replace it (the stored version is kept as a backup)",
            existing,
            doi,
            proposed
        ),
        Err(e) => return Err(e.into()),
    };

    match &result {
        RegistrationResult::Created { path } => println!("Created   {}", path.display()),
        RegistrationResult::Upgraded {
            path,
            backup,
            previous_version,
        } => {
            println!("Upgraded  {} (v{} -> v{})", path.display(), previous_version, record.version());
            println!("Backup    {}", backup.display());
        }
        RegistrationResult::Overwritten {
            path,
            backup,
            previous_version,
        } => {
            println!("Replaced  {} (v{} -> v{})", path.display(), previous_version, record.version());
            println!("Backup    {}", backup.display());
        }
    }
    Ok(())
}

/// Store an edited record as the next version of its DOI
pub fn new_version(ctx: &Settings, path: PathBuf) -> Result<()> {
    let warehouse = ctx.warehouse()?;
    let edited = load_record_file(&path)
        .with_context(|| format!("Failed to load record {}", path.display()))?;

    let written = warehouse
        .new_version(&edited)
        .with_context(|| format!("Failed to store a new version of {}", edited.doi()))?;
    info!("Stored {} version {}", written.doi(), written.version());

    println!("{} is now at version {}", written.doi(), written.version());
    println!("Record:   {}", warehouse.path_for(written.doi()).display());
    Ok(())
}
