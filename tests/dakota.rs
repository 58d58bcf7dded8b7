// tests/dakota.rs

//! Resolution tests against the builtin dakota recipe: variants, guarded
//! dependencies, conflicts and CMake arguments.

mod common;

use common::{dakota, installed_mpi, variants, version};
use recipebook::recipe::{DepType, InstallTree, VariantValue};
use recipebook::Error;
use std::path::Path;

#[test]
fn test_unset_variants_resolve_to_defaults() {
    let recipe = dakota();
    let resolved = recipe.resolve_variants(&variants("")).unwrap();

    for variant in recipe.variants() {
        assert_eq!(resolved.get(&variant.name), Some(&variant.default));
    }
    assert!(resolved.is_enabled("shared"));
    assert!(resolved.is_enabled("mpi"));
    assert!(resolved.is_disabled("hdf5"));
    assert_eq!(
        resolved.get("build_type"),
        Some(&VariantValue::Choice("RelWithDebInfo".to_string()))
    );
}

#[test]
fn test_shared_without_mpi_or_hdf5() {
    let recipe = dakota();
    let args = recipe
        .build_arguments(
            &version("6.13"),
            &variants("+shared ~mpi ~hdf5"),
            &InstallTree::new(),
        )
        .unwrap();

    assert!(args.contains(&"-DBUILD_SHARED_LIBS:BOOL=ON".to_string()));
    assert!(args.iter().all(|a| !a.contains("MPI")));
    assert!(args.iter().all(|a| !a.contains("HDF5")));
}

#[test]
fn test_mpi_conflicts_with_old_versions() {
    let recipe = dakota();
    let err = recipe
        .check_conflicts(&version("6.3"), &variants("+mpi"))
        .unwrap_err();
    match err {
        Error::Conflict(conflict) => {
            assert!(conflict
                .message
                .contains("Dakota <= 6.3 cannot be built with MPI"));
            assert_eq!(conflict.predicate, "'+mpi' when '@:6.3'");
            assert_eq!(conflict.package, "dakota");
        }
        other => panic!("expected a conflict, got {:?}", other),
    }

    // mpi is on by default, so the bare request conflicts too
    assert!(recipe
        .check_conflicts(&version("6.3"), &variants(""))
        .is_err());
    assert!(recipe
        .check_conflicts(&version("6.3"), &variants("~mpi"))
        .is_ok());
}

#[test]
fn test_conflict_stops_argument_synthesis() {
    let recipe = dakota();
    // No MPI installed: reaching the compiler lookup would be a different error
    let err = recipe
        .build_arguments(&version("6.3"), &variants("+mpi"), &InstallTree::new())
        .unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));

    let err = recipe
        .resolve(&version("6.3"), &variants("+mpi"), &InstallTree::new())
        .unwrap_err();
    assert!(err
        .to_string()
        .contains("Dakota <= 6.3 cannot be built with MPI"));
}

#[test]
fn test_mpi_build() {
    let recipe = dakota();
    let v = version("6.13");
    let state = variants("+mpi");

    let deps = recipe.resolve_dependencies(&v, &state).unwrap();
    let mpi = deps.iter().find(|d| d.name == "mpi").unwrap();
    assert!(mpi.types.contains(DepType::Build));

    let args = recipe.build_arguments(&v, &state, &installed_mpi()).unwrap();
    assert!(args.contains(&"-DDAKOTA_HAVE_MPI:BOOL=ON".to_string()));
    assert!(args.contains(&"-DMPI_CXX_COMPILER:STRING=/opt/openmpi/bin/mpicxx".to_string()));
}

#[test]
fn test_mpi_compiler_comes_from_installed_tree() {
    let recipe = dakota();
    let installed = installed_mpi().with_attribute("mpi", "mpicxx", "/opt/openmpi/bin/mpic++");
    let args = recipe
        .build_arguments(&version("6.13"), &variants("+mpi"), &installed)
        .unwrap();
    assert!(args.contains(&"-DMPI_CXX_COMPILER:STRING=/opt/openmpi/bin/mpic++".to_string()));

    let err = recipe
        .build_arguments(&version("6.13"), &variants("+mpi"), &InstallTree::new())
        .unwrap_err();
    assert!(matches!(err, Error::MissingDependency { .. }));
}

#[test]
fn test_argument_order_follows_declarations() {
    let recipe = dakota();
    let args = recipe
        .build_arguments(&version("6.13"), &variants("+mpi +hdf5"), &installed_mpi())
        .unwrap();
    assert_eq!(
        args,
        vec![
            "-DBUILD_SHARED_LIBS:BOOL=ON",
            "-DDAKOTA_HAVE_HDF5:BOOL=ON",
            "-DDAKOTA_HAVE_MPI:BOOL=ON",
            "-DMPI_CXX_COMPILER:STRING=/opt/openmpi/bin/mpicxx",
        ]
    );
}

#[test]
fn test_shared_off_is_explicit() {
    let recipe = dakota();
    let args = recipe
        .build_arguments(&version("6.13"), &variants("~shared ~mpi"), &InstallTree::new())
        .unwrap();
    assert_eq!(args, vec!["-DBUILD_SHARED_LIBS:BOOL=OFF"]);
}

#[test]
fn test_build_arguments_are_deterministic() {
    let recipe = dakota();
    let v = version("6.13");
    let state = variants("+mpi +hdf5");
    let installed = installed_mpi();

    let first = recipe.build_arguments(&v, &state, &installed).unwrap();
    for _ in 0..5 {
        assert_eq!(recipe.build_arguments(&v, &state, &installed).unwrap(), first);
    }
}

#[test]
fn test_resolve_dependencies_is_idempotent() {
    let recipe = dakota();
    let v = version("6.10");
    let state = variants("+hdf5");

    let first = recipe.resolve_dependencies(&v, &state).unwrap();
    // interleave another request; nothing carries over
    recipe
        .resolve_dependencies(&version("6.3"), &variants("~mpi"))
        .unwrap();
    let second = recipe.resolve_dependencies(&v, &state).unwrap();
    assert_eq!(first, second);

    let names: Vec<&str> = first.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["netlib-lapack", "blas", "mpi", "python", "boost", "cmake", "hdf5"]
    );
}

#[test]
fn test_python_guard_by_version() {
    let recipe = dakota();

    let python = |label: &str| -> Vec<String> {
        recipe
            .resolve_dependencies(&version(label), &variants("~mpi"))
            .unwrap()
            .into_iter()
            .filter(|d| d.name == "python")
            .map(|d| d.target_spec())
            .collect()
    };

    assert_eq!(python("6.13"), vec!["python@3:"]);
    assert_eq!(python("6.3"), vec!["python@:2"]);
    // both guards include 6.8
    assert_eq!(python("6.8"), vec!["python@3:", "python@:2"]);
}

#[test]
fn test_cmake_is_build_only() {
    let recipe = dakota();
    let deps = recipe
        .resolve_dependencies(&version("6.13"), &variants(""))
        .unwrap();
    let cmake = deps.iter().find(|d| d.name == "cmake").unwrap();
    assert!(cmake.types.contains(DepType::Build));
    assert!(!cmake.types.contains(DepType::Link));
    assert_eq!(cmake.target_spec(), "cmake@2.8.9:");
}

#[test]
fn test_unknown_version_and_variant() {
    let recipe = dakota();
    assert!(matches!(
        recipe.resolve_dependencies(&version("7.0"), &variants("")),
        Err(Error::UnknownVersion { .. })
    ));
    assert!(matches!(
        recipe.resolve_dependencies(&version("6.13"), &variants("+cuda")),
        Err(Error::UnknownVariant { .. })
    ));
}

#[test]
fn test_resolved_spec() {
    let recipe = dakota();
    let spec = recipe
        .resolve(
            &version("6.12"),
            &variants("~mpi build_type=Release"),
            &InstallTree::new(),
        )
        .unwrap();

    assert_eq!(spec.spec_string(), "dakota@6.12~hdf5~mpi+shared build_type=Release");
    assert_eq!(
        spec.source.url,
        "https://dakota.sandia.gov/sites/default/files/distributions/public/dakota-6.12-release-public.src.tar.gz"
    );
    assert_eq!(
        spec.std_cmake_args(Path::new("/opt/dakota")),
        vec![
            "-DCMAKE_INSTALL_PREFIX:STRING=/opt/dakota",
            "-DCMAKE_BUILD_TYPE:STRING=Release",
        ]
    );

    let cmd = spec.cmake_command_line(Path::new("/src/dakota"), Path::new("/opt/dakota"));
    assert_eq!(cmd[0], "cmake");
    assert_eq!(cmd[1], "/src/dakota");
    assert_eq!(cmd.last().map(String::as_str), Some("-DBUILD_SHARED_LIBS:BOOL=ON"));

    let json = serde_json::to_value(&spec).unwrap();
    assert_eq!(json["version"], "6.12");
    assert_eq!(json["variants"]["mpi"], false);
    assert_eq!(json["variants"]["build_type"], "Release");
}

#[test]
fn test_source_urls() {
    let recipe = dakota();
    let url = |label: &str| recipe.fetch_target(&version(label)).unwrap().url;

    assert!(url("6.9").ends_with("/dakota-6.9-release-public.src.tar.gz"));
    // 6.3 has its own URL
    assert_eq!(
        url("6.3"),
        "https://dakota.sandia.gov/sites/default/files/distributions/public/dakota-6.3-public.src.tar.gz"
    );
}
