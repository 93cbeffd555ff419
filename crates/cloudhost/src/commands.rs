//! Handlers for each output mode

use std::io::Write;
use std::path::Path;

use cloudhost_inventory::{EnvExport, InventoryBuilder};
use eyre::{Result, WrapErr};
use serde::Serialize;
use tracing::{info, warn};

/// Print the full inventory as JSON
pub async fn list(
    builder: &InventoryBuilder,
    regions: &[String],
    out: &mut impl Write,
) -> Result<()> {
    let inventory = builder.build_inventory(regions).await?;
    write_json(out, &inventory)
}

/// Print one host's variables, or `{}` for an unknown host
pub async fn host(
    builder: &InventoryBuilder,
    regions: &[String],
    name: &str,
    out: &mut impl Write,
) -> Result<()> {
    let record = builder.lookup_host(regions, name).await?;
    write_json(out, &record.unwrap_or_default())
}

/// Write the primary endpoints as shell exports
pub async fn set_env(builder: &InventoryBuilder, regions: &[String], path: &Path) -> Result<()> {
    let inventory = builder.build_inventory(regions).await?;
    let export = EnvExport::from_endpoints(&inventory.primary_endpoints());

    for name in export.missing() {
        warn!(variable = name, "no value found in inventory");
    }

    std::fs::write(path, export.render())
        .wrap_err_with(|| format!("failed to write {}", path.display()))?;

    info!(path = %path.display(), "environment exports written");
    Ok(())
}

fn write_json(out: &mut impl Write, value: &impl Serialize) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}
