use anyhow::Result;
use log::info;

use demvironment::validator::validate_warehouse;

use super::Settings;

/// Validate warehouse integrity
pub fn run(ctx: &Settings) -> Result<()> {
    let warehouse = ctx.warehouse()?;

    info!("Warehouse Validator");
    info!("===================");
    info!("Directory: {}", warehouse.root().display());

    let report = match validate_warehouse(warehouse.root()) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Validation error: {:#}", e);
            std::process::exit(1);
        }
    };

    #[cfg(feature = "colorized_output")]
    {
        println!("{}", report.format_colored());
    }

    #[cfg(not(feature = "colorized_output"))]
    {
        println!("{}", report);
    }

    // Exit with error code if validation failed
    if report.has_failures() {
        std::process::exit(1);
    }

    Ok(())
}
