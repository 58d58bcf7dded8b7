// src/recipe/mod.rs

//! Build recipes for source packages
//!
//! A recipe declares how to fetch, configure and install one third-party
//! package:
//! - Versions with their source integrity (archive digest or git commit)
//! - Variants: user-selectable build options with defaults
//! - Dependencies, optionally guarded by variant or version conditions
//! - Conflicts that refuse a version/variant combination outright
//! - CMake arguments or plain install steps
//!
//! Given a version and a [`VariantState`], a [`RecipeDescriptor`] yields the
//! active dependencies, the conflict verdict and the ordered build arguments.
//! Walking the dependency graph and running builds belong to the caller.
//!
//! # Example Recipe
//!
//! ```toml
//! [package]
//! name = "dakota"
//! url = "https://dakota.sandia.gov/.../dakota-6.12-release-public.src.tar.gz"
//! build_system = "cmake"
//!
//! [[versions]]
//! version = "6.13"
//! sha256 = "bca9448e..."
//!
//! [[variants]]
//! name = "mpi"
//! default = true
//!
//! [[depends_on]]
//! spec = "mpi"
//! when = "+mpi"
//!
//! [[conflicts]]
//! spec = "+mpi"
//! when = "@:6.3"
//! msg = "Dakota <= 6.3 cannot be built with MPI"
//!
//! [[cmake_args]]
//! define = "MPI_CXX_COMPILER"
//! dependency = "mpi"
//! attribute = "mpicxx"
//! when = "+mpi"
//! ```

pub mod cmake;
pub mod conflict;
pub mod dependency;
pub mod descriptor;
pub mod format;
pub mod guard;
pub mod install;
pub mod installed;
pub mod parser;
pub mod registry;
pub mod request;
mod syntax;
pub mod variant;

pub use cmake::{ArgValue, CmakeArg, CmakeType, OffPolicy};
pub use conflict::ConflictRule;
pub use dependency::{DepType, DepTypes, DependencyEdge};
pub use descriptor::{
    BuildSystem, FetchTarget, PackageSpec, RecipeDescriptor, ResolvedSpec, VersionEntry,
};
pub use guard::{Condition, Guard};
pub use install::{FsInstaller, InstallPlan, InstallPrimitives, InstallStep};
pub use installed::{InstallTree, InstalledDependencies, InstalledPackage};
pub use parser::{parse_recipe, parse_recipe_file, validate_recipe};
pub use registry::{RecipeRegistry, RegistryBuilder};
pub use request::BuildRequest;
pub use variant::{ResolvedVariants, Variant, VariantState, VariantValue};
