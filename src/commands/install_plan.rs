// src/commands/install_plan.rs
//! Install step rendering and execution

use super::{print_json, Session};
use anyhow::{Context, Result};
use recipebook::recipe::FsInstaller;
use recipebook::BuildRequest;
use std::path::Path;
use tracing::info;

/// Print the install plan for a request, or run it with `--execute`
pub fn cmd_install_plan(
    session: &Session,
    spec: &str,
    prefix: &Path,
    source: Option<&Path>,
    execute: bool,
) -> Result<()> {
    let request =
        BuildRequest::parse(spec).with_context(|| format!("Invalid request '{}'", spec))?;
    let resolved = session
        .registry
        .resolve(&request, &session.config.installed)?;
    let plan = resolved.install_plan(prefix);

    if !execute {
        if session.json {
            return print_json(&plan);
        }
        if plan.is_empty() {
            println!("{} has no install steps", resolved.name);
        }
        for step in &plan.steps {
            println!("{}", step);
        }
        return Ok(());
    }

    let source = source.context("--execute needs --source")?;
    info!("Installing {} into {}", resolved.spec_string(), prefix.display());
    let mut installer = FsInstaller::new();
    plan.execute(source, &mut installer)
        .with_context(|| format!("Install of {} failed", resolved.name))?;
    println!(
        "[COMPLETE] Installed {} file(s) into {}",
        installer.copied(),
        prefix.display()
    );
    Ok(())
}
