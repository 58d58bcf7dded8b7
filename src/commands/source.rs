// src/commands/source.rs
//! Source locations and archive verification

use super::{print_json, Session};
use anyhow::{bail, Context, Result};
use recipebook::{BuildRequest, Integrity};
use std::path::Path;

/// Print where a version's source comes from
pub fn cmd_fetch(session: &Session, spec: &str) -> Result<()> {
    let request =
        BuildRequest::parse(spec).with_context(|| format!("Invalid request '{}'", spec))?;
    let recipe = session.registry.get(&request.name)?;
    let version = request.version_for(&recipe)?;
    let target = session.registry.fetch_target(&request.name, &version)?;

    if session.json {
        return print_json(&target);
    }
    println!("{}", target.url);
    println!("{}", target.integrity);
    Ok(())
}

/// Check a downloaded archive against the declared digest
pub fn cmd_verify(session: &Session, spec: &str, file: &Path) -> Result<()> {
    let request =
        BuildRequest::parse(spec).with_context(|| format!("Invalid request '{}'", spec))?;
    let recipe = session.registry.get(&request.name)?;
    let version = request.version_for(&recipe)?;
    let target = session.registry.fetch_target(&request.name, &version)?;

    match &target.integrity {
        Integrity::Archive { digest } => {
            digest
                .verify_file(file)
                .with_context(|| format!("Verification of {} failed", file.display()))?;
            println!(
                "[OK] {} matches {}@{} ({})",
                file.display(),
                target.name,
                target.version,
                digest.algorithm
            );
            Ok(())
        }
        Integrity::Git { commit } => bail!(
            "{}@{} is pinned to git commit {}; there is no archive to verify",
            target.name,
            target.version,
            commit
        ),
    }
}
