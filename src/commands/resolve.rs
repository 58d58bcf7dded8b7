// src/commands/resolve.rs
//! Build request resolution

use super::{print_json, request_text, Session};
use anyhow::{Context, Result};
use recipebook::BuildRequest;
use std::path::Path;
use tracing::info;

fn parse_request(words: &[String]) -> Result<BuildRequest> {
    let text = request_text(words);
    BuildRequest::parse(&text).with_context(|| format!("Invalid request '{}'", text))
}

/// Resolve a request and print the resulting spec
pub fn cmd_resolve(session: &Session, spec: &[String]) -> Result<()> {
    let request = parse_request(spec)?;
    info!("Resolving {}", request);
    let resolved = session
        .registry
        .resolve(&request, &session.config.installed)?;

    if session.json {
        return print_json(&resolved);
    }

    println!("{}", resolved.spec_string());
    println!("  Source: {}", resolved.source);

    println!("\nDependencies:");
    if resolved.dependencies.is_empty() {
        println!("  (none)");
    }
    for edge in &resolved.dependencies {
        println!("  {} [{}]", edge.target_spec(), edge.types);
    }

    if !resolved.arguments.is_empty() {
        println!("\nCMake arguments:");
        for arg in &resolved.arguments {
            println!("  {}", arg);
        }
    }
    Ok(())
}

/// Print the build arguments for a request
pub fn cmd_args(session: &Session, spec: &[String], prefix: Option<&Path>) -> Result<()> {
    let request = parse_request(spec)?;
    let resolved = session
        .registry
        .resolve(&request, &session.config.installed)?;

    let mut args = Vec::new();
    if let Some(prefix) = prefix {
        args.extend(resolved.std_cmake_args(prefix));
    }
    args.extend(resolved.arguments.iter().cloned());

    if session.json {
        return print_json(&args);
    }
    for arg in &args {
        println!("{}", arg);
    }
    Ok(())
}
