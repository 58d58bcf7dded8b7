// src/commands/mod.rs
//! Command handlers for the recipebook CLI

mod completions;
mod install_plan;
mod recipes;
mod resolve;
mod source;
mod validate;

pub use completions::cmd_completions;
pub use install_plan::cmd_install_plan;
pub use recipes::{cmd_info, cmd_list};
pub use resolve::{cmd_args, cmd_resolve};
pub use source::{cmd_fetch, cmd_verify};
pub use validate::cmd_validate;

use anyhow::{Context, Result};
use recipebook::{RecipeRegistry, RecipebookConfig};
use serde::Serialize;
use std::path::Path;

/// Loaded config and the registry it describes
pub struct Session {
    pub config: RecipebookConfig,
    pub registry: RecipeRegistry,
    pub json: bool,
}

impl Session {
    pub fn load(config_path: Option<&Path>, json: bool) -> Result<Self> {
        let config = RecipebookConfig::load(config_path).context("Failed to load config")?;
        let registry = config
            .build_registry()
            .context("Failed to load recipes")?;
        Ok(Self {
            config,
            registry,
            json,
        })
    }
}

/// Pretty-print a value as JSON on stdout
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Join CLI words back into one request string
pub fn request_text(words: &[String]) -> String {
    words.join(" ")
}
