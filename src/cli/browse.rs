use anyhow::{Context, Result};
use log::info;

use demvironment::registry::{Doi, EntityKind};

use super::Settings;

/// Print the active files of one kind
pub fn list(ctx: &Settings, kind: EntityKind) -> Result<()> {
    let warehouse = ctx.warehouse()?;
    let entries = warehouse.list_entries(kind)?;
    info!("{} {} record(s) in {}", entries.len(), kind, warehouse.root().display());
    for name in entries {
        println!("{}", name);
    }
    Ok(())
}

/// Print the files of one kind holding `key` = `value`
pub fn find(ctx: &Settings, kind: EntityKind, key: &str, value: &str) -> Result<()> {
    let warehouse = ctx.warehouse()?;
    let matches = warehouse.find(kind, key, value)?;
    if matches.is_empty() {
        eprintln!("No {} record has {} = {}", kind, key, value);
    }
    for name in matches {
        println!("{}", name);
    }
    Ok(())
}

/// Print every key used by the records of one kind
pub fn keys(ctx: &Settings, kind: EntityKind) -> Result<()> {
    let warehouse = ctx.warehouse()?;
    for key in warehouse.collect_keys(kind)? {
        println!("{}", key);
    }
    Ok(())
}

pub fn stats(ctx: &Settings) -> Result<()> {
    let warehouse = ctx.warehouse()?;
    println!("Warehouse: {}", warehouse.root().display());
    println!("{}", warehouse.stats()?);
    Ok(())
}

/// Print the active record of a DOI, optionally with its backups
pub fn show(ctx: &Settings, doi: &str, backups: bool) -> Result<()> {
    let doi: Doi = doi.parse()?;
    let warehouse = ctx.warehouse()?;
    let record = warehouse
        .load(&doi)
        .with_context(|| format!("No active record for {}", doi))?;
    println!("{}", record.to_pretty_string()?);

    if backups {
        let found = warehouse.backups(&doi)?;
        eprintln!();
        eprintln!("{} backup(s)", found.len());
        for backup in found {
            match backup.version {
                Some(version) => eprintln!("  v{:<4} {}", version, backup.path.display()),
                None => eprintln!("  {:<5} {}", "?", backup.path.display()),
            }
        }
    }
    Ok(())
}
