// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use recipebook::recipe::{InstallTree, RecipeDescriptor, RecipeRegistry, VariantState};
use recipebook::Version;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

/// Registry with only the builtin recipes
pub fn builtin_registry() -> RecipeRegistry {
    RecipeRegistry::builtin().unwrap()
}

/// The builtin dakota recipe
pub fn dakota() -> Arc<RecipeDescriptor> {
    builtin_registry().get("dakota").unwrap()
}

pub fn version(label: &str) -> Version {
    Version::parse(label).unwrap()
}

pub fn variants(spec: &str) -> VariantState {
    VariantState::parse(spec).unwrap()
}

/// Installed tree with an Open MPI under /opt/openmpi
pub fn installed_mpi() -> InstallTree {
    InstallTree::new().with_package("mpi", "/opt/openmpi")
}

/// Write a recipe file into `dir` and return its path
pub fn write_recipe(dir: &Path, file: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(file);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
}

/// Unpacked STAR-Fusion-like source tree.
///
/// Returns the TempDir; keep it alive to prevent cleanup.
pub fn star_fusion_source() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    std::fs::create_dir_all(root.join("PerlLib")).unwrap();
    std::fs::create_dir_all(root.join("util/misc")).unwrap();
    std::fs::write(root.join("PerlLib/STAR_Fusion_utils.pm"), "package STAR_Fusion_utils;\n1;\n").unwrap();
    std::fs::write(root.join("PerlLib/Pipeliner.pm"), "package Pipeliner;\n1;\n").unwrap();
    std::fs::write(root.join("util/STAR-Fusion.filter"), "#!/usr/bin/env perl\n").unwrap();
    std::fs::write(root.join("util/misc/append_breakpoint_junction_info.pl"), "#!/usr/bin/env perl\n").unwrap();
    std::fs::write(root.join("STAR-Fusion"), "#!/usr/bin/env perl\n").unwrap();
    dir
}
