// src/config.rs

//! User configuration
//!
//! ```toml
//! builtin_recipes = true
//! recipe_dirs = ["/srv/recipes"]
//!
//! [installed.mpi]
//! prefix = "/opt/openmpi-4.1"
//! mpicxx = "/opt/openmpi-4.1/bin/mpic++"
//! ```

use crate::error::{Error, Result};
use crate::recipe::installed::InstallTree;
use crate::recipe::registry::{RecipeRegistry, RegistryBuilder};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable naming the config file
pub const CONFIG_ENV: &str = "RECIPEBOOK_CONFIG";

fn default_true() -> bool {
    true
}

/// Contents of `config.toml`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RecipebookConfig {
    /// Register the recipes embedded in the binary
    #[serde(default = "default_true")]
    pub builtin_recipes: bool,

    /// Extra directories scanned for `*.toml` recipes
    #[serde(default)]
    pub recipe_dirs: Vec<PathBuf>,

    /// Already-installed dependencies, for arguments that need their paths
    #[serde(default)]
    pub installed: InstallTree,
}

impl Default for RecipebookConfig {
    fn default() -> Self {
        Self {
            builtin_recipes: true,
            recipe_dirs: Vec::new(),
            installed: InstallTree::default(),
        }
    }
}

impl RecipebookConfig {
    /// `<config dir>/recipebook/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("recipebook").join("config.toml"))
    }

    /// Parse a config file's contents
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::ParseError(format!("Invalid config: {}", e)))
    }

    /// Load from an explicit path, `RECIPEBOOK_CONFIG`, or the default path
    ///
    /// An explicit path must exist; a missing default file means defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_file(path);
        }
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Self::load_file(Path::new(&path));
        }
        match Self::default_path() {
            Some(path) if path.is_file() => Self::load_file(&path),
            _ => {
                debug!("no config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    fn load_file(path: &Path) -> Result<Self> {
        debug!("loading config from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Build the registry this config describes
    pub fn build_registry(&self) -> Result<RecipeRegistry> {
        let mut builder = RegistryBuilder::new();
        if self.builtin_recipes {
            builder = builder.with_builtin()?;
        }
        for dir in &self.recipe_dirs {
            builder.load_dir(dir)?;
        }
        Ok(builder.build())
    }
}
