// src/commands/validate.rs
//! Recipe validation

use super::{print_json, Session};
use anyhow::{bail, Result};
use recipebook::recipe::{parse_recipe_file, validate_recipe};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Serialize)]
struct Report {
    recipe: String,
    error: Option<String>,
    warnings: Vec<String>,
}

/// Validate recipe files, or every registered recipe when none are given
pub fn cmd_validate(session: &Session, files: &[PathBuf]) -> Result<()> {
    let mut reports = Vec::new();

    if files.is_empty() {
        for recipe in session.registry.iter() {
            reports.push(Report {
                recipe: recipe.name().to_string(),
                error: None,
                warnings: validate_recipe(recipe),
            });
        }
    } else {
        for path in files {
            let report = match parse_recipe_file(path) {
                Ok(recipe) => Report {
                    recipe: recipe.name().to_string(),
                    error: None,
                    warnings: validate_recipe(&recipe),
                },
                Err(e) => Report {
                    recipe: path.display().to_string(),
                    error: Some(e.to_string()),
                    warnings: Vec::new(),
                },
            };
            reports.push(report);
        }
    }

    let failed = reports.iter().filter(|r| r.error.is_some()).count();

    if session.json {
        print_json(&reports)?;
    } else {
        for report in &reports {
            match &report.error {
                Some(error) => println!("[FAIL] {}: {}", report.recipe, error),
                None if report.warnings.is_empty() => println!("[OK] {}", report.recipe),
                None => {
                    println!("[OK] {} ({} warning(s))", report.recipe, report.warnings.len());
                    for warning in &report.warnings {
                        println!("  Warning: {}", warning);
                    }
                }
            }
        }
    }

    if failed > 0 {
        bail!("{} recipe(s) failed validation", failed);
    }
    Ok(())
}
