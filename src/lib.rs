// src/lib.rs

//! Recipebook: build recipes for source packages
//!
//! Recipes describe third-party software the way a source-based package
//! manager sees it: versions pinned by integrity digests, user-selectable
//! variants, dependencies that apply only under some variants or versions,
//! conflicts, and the CMake arguments or install steps for a build.
//!
//! # Architecture
//!
//! - Recipes are TOML files compiled once into immutable descriptors
//! - Guards (`+mpi`, `@:6.3`) are typed predicates, not strings
//! - Resolution is a pure function of a version and variant choices
//! - Fetching, graph walking and running builds are left to the caller,
//!   which plugs in through [`recipe::InstalledDependencies`] and
//!   [`recipe::InstallPrimitives`]

pub mod config;
pub mod digest;
mod error;
pub mod recipe;
pub mod version;

pub use config::RecipebookConfig;
pub use digest::{Digest, DigestAlgorithm, Integrity};
pub use error::{ConflictError, DeclarationError, Error, Result};
pub use recipe::{
    BuildRequest, DependencyEdge, InstallTree, InstalledDependencies, RecipeDescriptor,
    RecipeRegistry, ResolvedSpec, VariantState,
};
pub use version::{Version, VersionConstraint};
