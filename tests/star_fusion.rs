// tests/star_fusion.rs

//! The builtin perl-star-fusion recipe: commit-pinned source, run-time
//! dependencies and the install plan.

mod common;

use common::{builtin_registry, star_fusion_source};
use recipebook::recipe::{
    BuildRequest, BuildSystem, DepType, FsInstaller, InstallPrimitives, InstallTree,
};
use recipebook::{Integrity, Result};
use std::path::{Path, PathBuf};

#[test]
fn test_recipe_metadata() {
    let recipe = builtin_registry().get("perl-star-fusion").unwrap();
    let package = recipe.package();
    assert_eq!(package.extends.as_deref(), Some("perl"));
    assert_eq!(package.build_system, BuildSystem::Generic);
    assert!(recipe.variants().is_empty());
    assert!(recipe.cmake_args().is_empty());
}

#[test]
fn test_source_is_git_commit() {
    let registry = builtin_registry();
    let request = BuildRequest::parse("perl-star-fusion").unwrap();
    let spec = registry.resolve(&request, &InstallTree::new()).unwrap();

    assert_eq!(spec.version.as_str(), "master");
    assert_eq!(spec.source.url, "https://github.com/STAR-Fusion/STAR-Fusion.git");
    assert_eq!(
        spec.source.integrity,
        Integrity::Git {
            commit: "8c5a541".to_string()
        }
    );
    assert!(spec.arguments.is_empty());
    assert!(spec.std_cmake_args(Path::new("/opt/sf")).is_empty());
}

#[test]
fn test_dependencies_are_build_and_run() {
    let registry = builtin_registry();
    let spec = registry
        .resolve(&BuildRequest::parse("perl-star-fusion@master").unwrap(), &InstallTree::new())
        .unwrap();

    let names: Vec<&str> = spec.dependencies.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "star",
            "perl",
            "perl-set-intervaltree",
            "perl-dbi",
            "perl-db-file",
            "perl-uri"
        ]
    );
    for dep in &spec.dependencies {
        assert!(dep.types.contains(DepType::Build));
        assert!(dep.types.contains(DepType::Run));
        assert!(!dep.types.contains(DepType::Link));
    }
}

/// Records calls instead of touching the filesystem
#[derive(Default)]
struct Recorder {
    calls: Vec<String>,
}

impl InstallPrimitives for Recorder {
    fn mkdirp(&mut self, dir: &Path) -> Result<()> {
        self.calls.push(format!("mkdirp {}", dir.display()));
        Ok(())
    }

    fn install(&mut self, src: &Path, dest: &Path) -> Result<()> {
        let name = src.file_name().map(PathBuf::from).unwrap_or_default();
        self.calls
            .push(format!("install {} {}", name.display(), dest.display()));
        Ok(())
    }

    fn install_tree(&mut self, src: &Path, dest: &Path) -> Result<()> {
        let name = src.file_name().map(PathBuf::from).unwrap_or_default();
        self.calls
            .push(format!("install_tree {} {}", name.display(), dest.display()));
        Ok(())
    }
}

#[test]
fn test_install_plan_through_primitives() {
    let source = star_fusion_source();
    let spec = builtin_registry()
        .resolve(&BuildRequest::parse("perl-star-fusion").unwrap(), &InstallTree::new())
        .unwrap();
    let plan = spec.install_plan(Path::new("/opt/sf"));

    let mut recorder = Recorder::default();
    plan.execute(source.path(), &mut recorder).unwrap();
    assert_eq!(
        recorder.calls,
        vec![
            "mkdirp /opt/sf/lib/perl5",
            "mkdirp /opt/sf/lib/perl5",
            "install Pipeliner.pm /opt/sf/lib/perl5",
            "install STAR_Fusion_utils.pm /opt/sf/lib/perl5",
            "install_tree util /opt/sf/bin",
            "install STAR-Fusion /opt/sf/bin",
        ]
    );
}

#[test]
fn test_install_onto_filesystem() {
    let source = star_fusion_source();
    let prefix = tempfile::tempdir().unwrap();
    let spec = builtin_registry()
        .resolve(&BuildRequest::parse("perl-star-fusion").unwrap(), &InstallTree::new())
        .unwrap();

    let mut installer = FsInstaller::new();
    spec.install_plan(prefix.path())
        .execute(source.path(), &mut installer)
        .unwrap();

    let root = prefix.path();
    assert!(root.join("lib/perl5/STAR_Fusion_utils.pm").is_file());
    assert!(root.join("lib/perl5/Pipeliner.pm").is_file());
    assert!(root.join("bin/STAR-Fusion.filter").is_file());
    assert!(root.join("bin/misc/append_breakpoint_junction_info.pl").is_file());
    assert!(root.join("bin/STAR-Fusion").is_file());
    assert_eq!(installer.copied(), 5);
}

#[test]
fn test_missing_sources_fail_the_plan() {
    let empty = tempfile::tempdir().unwrap();
    let prefix = tempfile::tempdir().unwrap();
    let spec = builtin_registry()
        .resolve(&BuildRequest::parse("perl-star-fusion").unwrap(), &InstallTree::new())
        .unwrap();
    assert!(spec
        .install_plan(prefix.path())
        .execute(empty.path(), &mut FsInstaller::new())
        .is_err());
}
