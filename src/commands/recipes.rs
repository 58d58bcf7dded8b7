// src/commands/recipes.rs
//! Recipe listing and inspection

use super::{print_json, Session};
use anyhow::Result;
use serde::Serialize;

#[derive(Serialize)]
struct RecipeSummary<'a> {
    name: &'a str,
    preferred_version: Option<String>,
    versions: usize,
    summary: Option<&'a str>,
}

/// List registered recipes
pub fn cmd_list(session: &Session) -> Result<()> {
    let summaries: Vec<RecipeSummary> = session
        .registry
        .iter()
        .map(|r| RecipeSummary {
            name: r.name(),
            preferred_version: r.preferred_version().map(|v| v.to_string()),
            versions: r.versions().len(),
            summary: r.package().summary.as_deref(),
        })
        .collect();

    if session.json {
        return print_json(&summaries);
    }

    if summaries.is_empty() {
        println!("No recipes registered");
        return Ok(());
    }

    let width = summaries.iter().map(|s| s.name.len()).max().unwrap_or(0);
    for s in &summaries {
        println!(
            "{:<width$}  {:<8}  {}",
            s.name,
            s.preferred_version.as_deref().unwrap_or("-"),
            s.summary.unwrap_or(""),
            width = width
        );
    }
    println!("\n{} recipe(s)", summaries.len());
    Ok(())
}

/// Show everything a recipe declares
pub fn cmd_info(session: &Session, name: &str) -> Result<()> {
    let recipe = session.registry.get(name)?;
    if session.json {
        return print_json(&*recipe);
    }

    let package = recipe.package();
    println!("{}", package.name);
    if let Some(summary) = &package.summary {
        println!("  {}", summary);
    }
    if let Some(homepage) = &package.homepage {
        println!("  Homepage: {}", homepage);
    }
    println!("  Build system: {}", package.build_system);
    if let Some(extends) = &package.extends {
        println!("  Extends: {}", extends);
    }

    println!("\nVersions:");
    for entry in recipe.versions() {
        let url = entry
            .source_url(package)
            .unwrap_or_else(|_| "-".to_string());
        println!("  {:<8} {}", entry.version, entry.integrity);
        println!("           {}", url);
    }

    if !recipe.variants().is_empty() {
        println!("\nVariants:");
        for variant in recipe.variants() {
            let spec = variant.default_spec();
            if variant.values.is_empty() {
                println!("  {:<28} {}", spec, variant.description);
            } else {
                println!(
                    "  {:<28} {} [{}]",
                    spec,
                    variant.description,
                    variant.values.join(", ")
                );
            }
        }
    }

    if !recipe.dependencies().is_empty() {
        println!("\nDependencies:");
        for edge in recipe.dependencies() {
            println!("  {}", edge);
        }
    }

    if !recipe.conflicts().is_empty() {
        println!("\nConflicts:");
        for rule in recipe.conflicts() {
            println!("  {}: {}", rule.predicate(), rule.message);
        }
    }

    if !recipe.cmake_args().is_empty() {
        println!("\nCMake arguments:");
        for arg in recipe.cmake_args() {
            println!("  {}", arg);
        }
    }

    if !recipe.install_steps().is_empty() {
        println!("\nInstall steps:");
        for step in recipe.install_steps() {
            println!("  {}", step);
        }
    }
    Ok(())
}
