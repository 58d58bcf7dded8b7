// tests/registry.rs

//! Registry and config tests: builtin recipes, recipe directories,
//! validation and archive verification.

mod common;

use common::{builtin_registry, version, write_recipe};
use recipebook::recipe::{validate_recipe, BuildRequest, InstallTree, RegistryBuilder};
use recipebook::{Digest, DigestAlgorithm, Error, Integrity, RecipebookConfig};

const HELLO_RECIPE: &str = r#"
[package]
name = "hello"
homepage = "https://example.org/hello"
url = "https://example.org/releases/hello-%(version)s.tar.gz"
summary = "Greets"

[[versions]]
version = "2.12"
sha256 = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"

[[versions]]
version = "2.10"
sha256 = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
"#;

#[test]
fn test_builtin_recipes_validate() {
    let registry = builtin_registry();
    assert_eq!(registry.len(), 2);

    let dakota = registry.get("dakota").unwrap();
    let warnings = validate_recipe(&dakota);
    // the HDF5 and MPI flags are only passed when enabled
    assert!(warnings.iter().any(|w| w.contains("DAKOTA_HAVE_HDF5")));
    assert!(warnings.iter().any(|w| w.contains("DAKOTA_HAVE_MPI")));
    // python@3: and python@:2 both apply to 6.8
    assert!(warnings.iter().any(|w| w.contains("python@3:")));

    let star = registry.get("perl-star-fusion").unwrap();
    assert!(validate_recipe(&star).is_empty());
}

#[test]
fn test_config_with_recipe_dir() {
    let dir = tempfile::tempdir().unwrap();
    write_recipe(&dir.path().join("recipes"), "hello.toml", HELLO_RECIPE);
    let config_path = write_recipe(
        dir.path(),
        "config.toml",
        &format!(
            "recipe_dirs = [{:?}]\n\n[installed.mpi]\nprefix = \"/opt/mpich\"\n",
            dir.path().join("recipes").display().to_string()
        ),
    );

    let config = RecipebookConfig::load(Some(&config_path)).unwrap();
    let registry = config.build_registry().unwrap();
    let names: Vec<&str> = registry.names().collect();
    assert_eq!(names, vec!["dakota", "hello", "perl-star-fusion"]);

    let target = registry.fetch_target("hello", &version("2.10")).unwrap();
    assert_eq!(target.url, "https://example.org/releases/hello-2.10.tar.gz");

    // the configured MPI prefix feeds the compiler argument
    let spec = registry
        .resolve(
            &BuildRequest::parse("dakota@6.13+mpi").unwrap(),
            &config.installed,
        )
        .unwrap();
    assert!(spec
        .arguments
        .contains(&"-DMPI_CXX_COMPILER:STRING=/opt/mpich/bin/mpicxx".to_string()));
}

#[test]
fn test_recipe_dir_cannot_shadow_builtin() {
    let dir = tempfile::tempdir().unwrap();
    let dakota = recipebook::recipe::registry::BUILTIN_RECIPES[0].1;
    write_recipe(dir.path(), "dakota.toml", dakota);

    let mut builder = RegistryBuilder::new().with_builtin().unwrap();
    match builder.load_dir(dir.path()) {
        Err(Error::Declaration(e)) => assert!(e.message.contains("registered twice")),
        other => panic!("expected a declaration error, got {:?}", other),
    }
}

#[test]
fn test_preferred_version_is_highest() {
    let dir = tempfile::tempdir().unwrap();
    write_recipe(dir.path(), "hello.toml", HELLO_RECIPE);
    let mut builder = RegistryBuilder::new();
    builder.load_dir(dir.path()).unwrap();
    let registry = builder.build();

    let spec = registry
        .resolve(&BuildRequest::parse("hello").unwrap(), &InstallTree::new())
        .unwrap();
    assert_eq!(spec.version.as_str(), "2.12");
}

#[test]
fn test_verify_downloaded_archive() {
    let dir = tempfile::tempdir().unwrap();
    write_recipe(dir.path(), "hello.toml", HELLO_RECIPE);
    let mut builder = RegistryBuilder::new();
    builder.load_dir(dir.path()).unwrap();
    let registry = builder.build();

    let target = registry.fetch_target("hello", &version("2.12")).unwrap();
    let Integrity::Archive { digest } = &target.integrity else {
        panic!("expected an archive digest");
    };

    let good = dir.path().join("hello-2.12.tar.gz");
    std::fs::write(&good, b"hello world").unwrap();
    digest.verify_file(&good).unwrap();

    let bad = dir.path().join("corrupt.tar.gz");
    std::fs::write(&bad, b"hello w0rld").unwrap();
    assert!(matches!(
        digest.verify_file(&bad),
        Err(Error::IntegrityMismatch { .. })
    ));

    assert_eq!(
        digest,
        &Digest::of_bytes(DigestAlgorithm::Sha256, b"hello world")
    );
}
