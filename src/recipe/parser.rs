// src/recipe/parser.rs

//! Recipe file parsing
//!
//! Loading a recipe deserializes the TOML and then compiles it: every guard
//! and dependency spec is parsed, every cross-reference is checked, and the
//! first problem is reported as a [`DeclarationError`].

use crate::digest::{Digest, DigestAlgorithm, Integrity};
use crate::error::{DeclarationError, Result};
use crate::recipe::cmake::{ArgValue, CmakeArg, CmakeType};
use crate::recipe::conflict::ConflictRule;
use crate::recipe::dependency::{DepTypes, DependencyEdge};
use crate::recipe::descriptor::{
    BuildSystem, PackageSpec, RecipeDescriptor, VersionEntry, BUILD_TYPES, BUILD_TYPE_VARIANT,
    DEFAULT_BUILD_TYPE,
};
use crate::recipe::format::{
    CmakeArgSection, ConflictSection, DefaultValue, DependsOnSection, InstallSection, RecipeFile,
    VariantSection, VersionSection,
};
use crate::recipe::guard::{Condition, Guard};
use crate::recipe::install::InstallStep;
use crate::recipe::variant::{Variant, VariantValue};
use crate::version::Version;
use std::collections::HashSet;
use std::path::Path;

type Compiled<T> = std::result::Result<T, DeclarationError>;

/// Parse a recipe from a TOML string
pub fn parse_recipe(content: &str) -> Result<RecipeDescriptor> {
    parse_with_origin(content, "<recipe>")
}

/// Parse a recipe from a file
pub fn parse_recipe_file(path: &Path) -> Result<RecipeDescriptor> {
    let content = std::fs::read_to_string(path)?;
    parse_with_origin(&content, &path.display().to_string())
}

fn parse_with_origin(content: &str, origin: &str) -> Result<RecipeDescriptor> {
    let file: RecipeFile = toml::from_str(content)
        .map_err(|e| DeclarationError::new(origin, format!("invalid TOML: {}", e)))?;
    Ok(compile(file)?)
}

fn fail(package: &PackageSpec, message: impl Into<String>) -> DeclarationError {
    DeclarationError::new(&package.name, message)
}

/// Compile a deserialized recipe into a descriptor
pub fn compile(file: RecipeFile) -> Compiled<RecipeDescriptor> {
    let name = file.package.name.trim().to_string();
    if name.is_empty() {
        return Err(DeclarationError::new(
            "<recipe>",
            "package name cannot be empty",
        ));
    }
    if name.contains(|c: char| c.is_whitespace() || "@+~=".contains(c)) {
        return Err(DeclarationError::new(
            &name,
            "package name may not contain whitespace or '@', '+', '~', '='",
        ));
    }

    let package = PackageSpec {
        name,
        homepage: file.package.homepage,
        url: file.package.url,
        git: file.package.git,
        summary: file.package.summary,
        description: file.package.description,
        build_system: file.package.build_system,
        extends: file.package.extends,
    };

    let versions = compile_versions(&package, &file.versions)?;
    let variants = compile_variants(&package, &file.variants)?;
    let dependencies = compile_dependencies(&package, &file.depends_on, &variants)?;
    let conflicts = compile_conflicts(&package, &file.conflicts, &variants)?;
    let cmake_args = compile_cmake_args(&package, &file.cmake_args, &variants, &dependencies)?;
    let install = compile_install(&package, &file.install)?;

    Ok(RecipeDescriptor {
        package,
        versions,
        variants,
        dependencies,
        conflicts,
        cmake_args,
        install,
    })
}

fn compile_versions(package: &PackageSpec, sections: &[VersionSection]) -> Compiled<Vec<VersionEntry>> {
    if sections.is_empty() {
        return Err(fail(package, "declares no versions"));
    }

    let mut seen = HashSet::new();
    let mut entries = Vec::with_capacity(sections.len());
    for section in sections {
        let version = Version::parse(&section.version)
            .map_err(|e| fail(package, format!("bad version '{}': {}", section.version, e)))?;
        if !seen.insert(version.clone()) {
            return Err(fail(package, format!("version {} declared twice", version)));
        }

        let archive = |algorithm: DigestAlgorithm, value: &str| {
            Digest::new(algorithm, value)
                .map(|digest| Integrity::Archive { digest })
                .map_err(|e| fail(package, format!("version {}: {}", version, e)))
        };
        let integrity = match (&section.sha256, &section.sha512, &section.commit) {
            (Some(hash), None, None) => archive(DigestAlgorithm::Sha256, hash)?,
            (None, Some(hash), None) => archive(DigestAlgorithm::Sha512, hash)?,
            (None, None, Some(commit)) => {
                if package.git.is_none() {
                    return Err(fail(
                        package,
                        format!("version {} pins a commit but the package has no git URL", version),
                    ));
                }
                if section.url.is_some() {
                    return Err(fail(
                        package,
                        format!("version {} pins a commit and cannot override the URL", version),
                    ));
                }
                Integrity::git(commit.as_str())
                    .map_err(|e| fail(package, format!("version {}: {}", version, e)))?
            }
            (None, None, None) => {
                return Err(fail(
                    package,
                    format!("version {} has no sha256, sha512 or commit", version),
                ));
            }
            _ => {
                return Err(fail(
                    package,
                    format!("version {} gives more than one of sha256, sha512, commit", version),
                ));
            }
        };

        let entry = VersionEntry {
            version,
            integrity,
            url: section.url.clone(),
        };
        entry.source_url(package).map_err(|_| {
            fail(
                package,
                format!("version {} has no usable source URL", entry.version),
            )
        })?;
        entries.push(entry);
    }
    Ok(entries)
}

fn compile_variants(package: &PackageSpec, sections: &[VariantSection]) -> Compiled<Vec<Variant>> {
    let mut variants: Vec<Variant> = Vec::with_capacity(sections.len() + 1);
    for section in sections {
        let name = section.name.trim();
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
            return Err(fail(package, format!("invalid variant name '{}'", section.name)));
        }
        if variants.iter().any(|v| v.name == name) {
            return Err(fail(package, format!("variant '{}' declared twice", name)));
        }

        let variant = match &section.default {
            DefaultValue::Bool(default) => {
                if !section.values.is_empty() {
                    return Err(fail(
                        package,
                        format!("boolean variant '{}' cannot list values", name),
                    ));
                }
                Variant::boolean(name, *default, section.description.clone())
            }
            DefaultValue::Choice(default) => {
                if section.values.is_empty() {
                    return Err(fail(
                        package,
                        format!("choice variant '{}' needs a list of values", name),
                    ));
                }
                if !section.values.contains(default) {
                    return Err(fail(
                        package,
                        format!(
                            "default '{}' of variant '{}' is not one of: {}",
                            default,
                            name,
                            section.values.join(", ")
                        ),
                    ));
                }
                Variant::choice(name, default.clone(), section.values.clone(), section.description.clone())
            }
        };
        variants.push(variant);
    }

    if package.build_system == BuildSystem::Cmake {
        match variants.iter().find(|v| v.name == BUILD_TYPE_VARIANT) {
            Some(v) if v.is_bool() => {
                return Err(fail(
                    package,
                    format!("variant '{}' must be a choice variant", BUILD_TYPE_VARIANT),
                ));
            }
            Some(_) => {}
            None => variants.push(Variant::choice(
                BUILD_TYPE_VARIANT,
                DEFAULT_BUILD_TYPE,
                BUILD_TYPES.iter().map(|s| s.to_string()).collect(),
                "CMake build type",
            )),
        }
    }
    Ok(variants)
}

/// Parse a guard and check it against the declared variants
///
/// `name=value` on a boolean variant is rewritten to `+name` or `~name`.
fn compile_guard(
    package: &PackageSpec,
    text: &str,
    variants: &[Variant],
    context: &str,
) -> Compiled<Guard> {
    let parsed = Guard::parse(text)
        .map_err(|e| fail(package, format!("{}: bad condition '{}': {}", context, text, e)))?;
    parsed
        .check_variants(|name| variants.iter().any(|v| v.name == name))
        .map_err(|e| fail(package, format!("{}: {}", context, e)))?;

    let mut guard = Guard::always();
    for condition in parsed.conditions() {
        let condition = match condition {
            Condition::Enabled(name) | Condition::Disabled(name) => {
                if variants.iter().any(|v| &v.name == name && !v.is_bool()) {
                    return Err(fail(
                        package,
                        format!("{}: '{}' is not a boolean variant", context, name),
                    ));
                }
                condition.clone()
            }
            Condition::Equals(name, value) => match variants.iter().find(|v| &v.name == name) {
                Some(v) if v.is_bool() => match v.accept(&VariantValue::Choice(value.clone())) {
                    Ok(VariantValue::Bool(true)) => Condition::Enabled(name.clone()),
                    Ok(_) => Condition::Disabled(name.clone()),
                    Err(e) => return Err(fail(package, format!("{}: {}", context, e))),
                },
                Some(v) if !v.values.contains(value) => {
                    return Err(fail(
                        package,
                        format!("{}: '{}' is not a value of variant '{}'", context, value, name),
                    ));
                }
                _ => condition.clone(),
            },
            Condition::Version(_) => condition.clone(),
        };
        guard = guard.and(condition);
    }
    Ok(guard)
}

fn compile_dependencies(
    package: &PackageSpec,
    sections: &[DependsOnSection],
    variants: &[Variant],
) -> Compiled<Vec<DependencyEdge>> {
    let mut edges = Vec::with_capacity(sections.len());
    for section in sections {
        let context = format!("dependency '{}'", section.spec);
        let edge = DependencyEdge::parse(&section.spec)
            .map_err(|e| fail(package, format!("{}: {}", context, e)))?;
        if edge.name == package.name {
            return Err(fail(package, "package depends on itself"));
        }

        let types = match &section.types {
            Some(list) => DepTypes::parse(&list.names())
                .map_err(|e| fail(package, format!("{}: {}", context, e)))?,
            None => DepTypes::default(),
        };
        let when = compile_guard(package, &section.when, variants, &context)?;
        edges.push(edge.with_types(types).when(when));
    }
    Ok(edges)
}

fn compile_conflicts(
    package: &PackageSpec,
    sections: &[ConflictSection],
    variants: &[Variant],
) -> Compiled<Vec<ConflictRule>> {
    let mut rules = Vec::with_capacity(sections.len());
    for section in sections {
        let context = format!("conflict '{}'", section.spec);
        let trigger = compile_guard(package, &section.spec, variants, &context)?;
        if trigger.is_always() {
            return Err(fail(package, "conflict has an empty spec"));
        }
        let when = compile_guard(package, &section.when, variants, &context)?;
        let message = section
            .msg
            .clone()
            .unwrap_or_else(|| ConflictRule::default_message(&trigger, &when));
        rules.push(ConflictRule::new(trigger, when, message));
    }
    Ok(rules)
}

fn compile_cmake_args(
    package: &PackageSpec,
    sections: &[CmakeArgSection],
    variants: &[Variant],
    dependencies: &[DependencyEdge],
) -> Compiled<Vec<CmakeArg>> {
    if !sections.is_empty() && package.build_system != BuildSystem::Cmake {
        return Err(fail(package, "cmake_args require build_system = \"cmake\""));
    }

    let mut args = Vec::with_capacity(sections.len());
    for section in sections {
        let define = section.define.trim();
        if define.is_empty() || define.contains(|c: char| c.is_whitespace() || c == '=' || c == ':') {
            return Err(fail(package, format!("invalid cmake define '{}'", section.define)));
        }
        let context = format!("cmake arg {}", define);

        let explicit_ty = section
            .ty
            .as_deref()
            .map(|t| {
                t.parse::<CmakeType>()
                    .map_err(|_| fail(package, format!("{}: unknown type '{}'", context, t)))
            })
            .transpose()?;

        let (value, inferred_ty) = match (&section.from_variant, &section.value, &section.dependency) {
            (Some(name), None, None) => {
                let variant = variants.iter().find(|v| &v.name == name).ok_or_else(|| {
                    fail(package, format!("{}: undeclared variant '{}'", context, name))
                })?;
                if !variant.is_bool() && section.when_off.is_some() {
                    return Err(fail(
                        package,
                        format!("{}: when_off only applies to boolean variants", context),
                    ));
                }
                let ty = if variant.is_bool() {
                    CmakeType::Bool
                } else {
                    CmakeType::String
                };
                (
                    ArgValue::Variant {
                        variant: name.clone(),
                        when_off: section.when_off.unwrap_or_default(),
                    },
                    ty,
                )
            }
            (None, Some(value), None) => (ArgValue::Literal { value: value.clone() }, CmakeType::String),
            (None, None, Some(dependency)) => {
                if !dependencies.iter().any(|e| &e.name == dependency) {
                    return Err(fail(
                        package,
                        format!("{}: '{}' is not a declared dependency", context, dependency),
                    ));
                }
                (
                    ArgValue::Dependency {
                        dependency: dependency.clone(),
                        attribute: section.attribute.clone().unwrap_or_else(|| "prefix".to_string()),
                    },
                    CmakeType::String,
                )
            }
            _ => {
                return Err(fail(
                    package,
                    format!("{}: needs exactly one of from_variant, value, dependency", context),
                ));
            }
        };

        if section.when_off.is_some() && !matches!(value, ArgValue::Variant { .. }) {
            return Err(fail(package, format!("{}: when_off needs from_variant", context)));
        }
        if section.attribute.is_some() && section.dependency.is_none() {
            return Err(fail(package, format!("{}: attribute needs dependency", context)));
        }

        let when = compile_guard(package, &section.when, variants, &context)?;
        let ty = explicit_ty.unwrap_or(inferred_ty);
        args.push(CmakeArg::new(define, ty, value).when(when));
    }
    Ok(args)
}

fn compile_install(package: &PackageSpec, sections: &[InstallSection]) -> Compiled<Vec<InstallStep>> {
    let mut steps = Vec::with_capacity(sections.len());
    for section in sections {
        let step = match (&section.mkdirp, &section.install, &section.install_tree, &section.to) {
            (Some(path), None, None, None) => InstallStep::Mkdirp { path: path.clone() },
            (None, Some(pattern), None, Some(to)) => {
                glob::Pattern::new(pattern).map_err(|e| {
                    fail(package, format!("install pattern '{}': {}", pattern, e))
                })?;
                InstallStep::Install {
                    pattern: pattern.clone(),
                    dest: to.clone(),
                }
            }
            (None, None, Some(src), Some(to)) => InstallStep::InstallTree {
                src: src.clone(),
                dest: to.clone(),
            },
            _ => {
                return Err(fail(
                    package,
                    "install step needs exactly one of mkdirp, install, install_tree \
                     (install and install_tree also need 'to')",
                ));
            }
        };
        if let Some(placeholder) = step.unknown_placeholder() {
            return Err(fail(
                package,
                format!("install step '{}': unknown placeholder {}", step, placeholder),
            ));
        }
        steps.push(step);
    }
    Ok(steps)
}

/// Check whether two guards can hold for the same build
fn may_overlap(a: &Guard, b: &Guard) -> bool {
    for ca in a.conditions() {
        for cb in b.conditions() {
            let disjoint = match (ca, cb) {
                (Condition::Version(x), Condition::Version(y)) => !x.overlaps(y),
                (Condition::Enabled(x), Condition::Disabled(y))
                | (Condition::Disabled(x), Condition::Enabled(y)) => x == y,
                (Condition::Equals(x, vx), Condition::Equals(y, vy)) => x == y && vx != vy,
                _ => false,
            };
            if disjoint {
                return false;
            }
        }
    }
    true
}

/// Non-fatal problems with a loaded recipe
pub fn validate_recipe(recipe: &RecipeDescriptor) -> Vec<String> {
    let mut warnings = Vec::new();
    let package = recipe.package();

    if package.summary.is_none() {
        warnings.push("Missing package summary".to_string());
    }
    if package.homepage.is_none() {
        warnings.push("Missing package homepage".to_string());
    }

    for arg in recipe.cmake_args() {
        if let ArgValue::Variant { variant, .. } = &arg.value {
            if arg.omits_off() {
                warnings.push(format!(
                    "-D{} is omitted when '{}' is off; the build sees no explicit OFF",
                    arg.define, variant
                ));
            }
        }
    }

    let deps = recipe.dependencies();
    for (i, a) in deps.iter().enumerate() {
        for b in &deps[i + 1..] {
            if a.name == b.name && !a.constraint.overlaps(&b.constraint) && may_overlap(&a.when, &b.when) {
                warnings.push(format!(
                    "Dependencies '{}' and '{}' can both apply to the same build",
                    a, b
                ));
            }
        }
    }

    for variant in recipe.variants() {
        if variant.name == BUILD_TYPE_VARIANT && package.build_system == BuildSystem::Cmake {
            continue;
        }
        let name = variant.name.as_str();
        let in_guards = deps
            .iter()
            .map(|d| &d.when)
            .chain(recipe.conflicts().iter().flat_map(|c| [&c.trigger, &c.when]))
            .chain(recipe.cmake_args().iter().map(|a| &a.when))
            .any(|g| g.variants().any(|v| v == name));
        let in_args = recipe
            .cmake_args()
            .iter()
            .any(|a| matches!(&a.value, ArgValue::Variant { variant, .. } if variant == name));
        if !in_guards && !in_args {
            warnings.push(format!("Variant '{}' is never used", name));
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    const SHA: &str = "bca9448ebbcc5a29226eab2abbd9e5e87ccaef6818658edb64588f234bf7bd1b";

    fn recipe(body: &str) -> String {
        format!(
            r#"
[package]
name = "test"
summary = "A test package"
homepage = "https://example.com"
url = "https://example.com/test-1.0.tar.gz"
build_system = "cmake"

[[versions]]
version = "1.0"
sha256 = "{SHA}"

{body}
"#
        )
    }

    fn declaration_error(content: &str) -> String {
        match parse_recipe(content) {
            Err(Error::Declaration(e)) => e.message,
            other => panic!("expected a declaration error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_valid_recipe() {
        let content = recipe(
            r#"
[[variants]]
name = "mpi"
default = true

[[depends_on]]
spec = "mpi"
when = "+mpi"

[[cmake_args]]
define = "HAVE_MPI"
from_variant = "mpi"
"#,
        );
        let recipe = parse_recipe(&content).unwrap();
        assert_eq!(recipe.name(), "test");
        assert_eq!(recipe.versions().len(), 1);
        assert_eq!(recipe.dependencies()[0].when, Guard::enabled("mpi"));
        assert_eq!(recipe.cmake_args()[0].ty, CmakeType::Bool);
    }

    #[test]
    fn test_cmake_recipe_gets_build_type() {
        let recipe = parse_recipe(&recipe("")).unwrap();
        let build_type = recipe
            .variants()
            .iter()
            .find(|v| v.name == BUILD_TYPE_VARIANT)
            .unwrap();
        assert_eq!(build_type.default_spec(), "build_type=RelWithDebInfo");
        assert_eq!(build_type.values.len(), BUILD_TYPES.len());
    }

    #[test]
    fn test_parse_invalid_recipe() {
        let content = "this is not valid toml at all {}";
        assert!(matches!(parse_recipe(content), Err(Error::Declaration(_))));
    }

    #[test]
    fn test_empty_name() {
        let content = r#"
[package]
name = ""
"#;
        assert!(declaration_error(content).contains("name"));
    }

    #[test]
    fn test_bad_digest() {
        let content = r#"
[package]
name = "test"
url = "https://example.com/test-1.0.tar.gz"

[[versions]]
version = "1.0"
sha256 = "abc123"
"#;
        assert!(declaration_error(content).contains("1.0"));
    }

    #[test]
    fn test_missing_digest() {
        let content = r#"
[package]
name = "test"
url = "https://example.com/test-1.0.tar.gz"

[[versions]]
version = "1.0"
"#;
        assert!(declaration_error(content).contains("no sha256"));
    }

    #[test]
    fn test_duplicate_version() {
        let content = format!(
            r#"
[package]
name = "test"
url = "https://example.com/test-1.0.tar.gz"

[[versions]]
version = "1.0"
sha256 = "{SHA}"

[[versions]]
version = "1.0"
sha256 = "{SHA}"
"#
        );
        assert!(declaration_error(&content).contains("twice"));
    }

    #[test]
    fn test_commit_requires_git() {
        let content = r#"
[package]
name = "test"

[[versions]]
version = "master"
commit = "8c5a541"
"#;
        assert!(declaration_error(content).contains("git URL"));
    }

    #[test]
    fn test_choice_default_outside_values() {
        let content = recipe(
            r#"
[[variants]]
name = "precision"
default = "quad"
values = ["single", "double"]
"#,
        );
        assert!(declaration_error(&content).contains("quad"));
    }

    #[test]
    fn test_guard_with_undeclared_variant() {
        let content = recipe(
            r#"
[[depends_on]]
spec = "cuda"
when = "+cuda"
"#,
        );
        assert!(declaration_error(&content).contains("cuda"));
    }

    #[test]
    fn test_cmake_arg_needs_declared_dependency() {
        let content = recipe(
            r#"
[[cmake_args]]
define = "MPI_CXX_COMPILER"
dependency = "mpi"
attribute = "mpicxx"
"#,
        );
        assert!(declaration_error(&content).contains("not a declared dependency"));
    }

    #[test]
    fn test_cmake_args_need_cmake() {
        let content = format!(
            r#"
[package]
name = "test"
url = "https://example.com/test-1.0.tar.gz"

[[versions]]
version = "1.0"
sha256 = "{SHA}"

[[cmake_args]]
define = "FOO"
value = "bar"
"#
        );
        assert!(declaration_error(&content).contains("build_system"));
    }

    #[test]
    fn test_unknown_install_placeholder() {
        let content = format!(
            r#"
[package]
name = "test"
url = "https://example.com/test-1.0.tar.gz"

[[versions]]
version = "1.0"
sha256 = "{SHA}"

[[install]]
mkdirp = "%(python_lib)s"
"#
        );
        assert!(declaration_error(&content).contains("%(python_lib)s"));
    }

    #[test]
    fn test_validate_warnings() {
        let content = r#"
[package]
name = "test"
git = "https://example.com/test.git"

[[versions]]
version = "master"
commit = "8c5a541"

[[variants]]
name = "docs"
default = false
"#;
        let recipe = parse_recipe(content).unwrap();
        let warnings = validate_recipe(&recipe);
        assert!(warnings.iter().any(|w| w.contains("summary")));
        assert!(warnings.iter().any(|w| w.contains("homepage")));
        assert!(warnings.iter().any(|w| w.contains("'docs' is never used")));
    }

    #[test]
    fn test_validate_flags_omitted_off_and_overlaps() {
        let content = recipe(
            r#"
[[variants]]
name = "hdf5"
default = false

[[depends_on]]
spec = "python@3:"
when = "@1.0:"

[[depends_on]]
spec = "python@:2"
when = "@:1.0"

[[depends_on]]
spec = "hdf5"
when = "+hdf5"

[[cmake_args]]
define = "HAVE_HDF5"
from_variant = "hdf5"
when_off = "omit"
"#,
        );
        let recipe = parse_recipe(&content).unwrap();
        let warnings = validate_recipe(&recipe);
        assert!(warnings.iter().any(|w| w.contains("-DHAVE_HDF5 is omitted")));
        assert!(warnings.iter().any(|w| w.contains("python@3:") && w.contains("python@:2")));
    }

    #[test]
    fn test_disjoint_guards_do_not_warn() {
        let content = recipe(
            r#"
[[variants]]
name = "mpi"
default = true

[[depends_on]]
spec = "python@3:"
when = "+mpi"

[[depends_on]]
spec = "python@:2"
when = "~mpi"
"#,
        );
        let recipe = parse_recipe(&content).unwrap();
        assert!(validate_recipe(&recipe).iter().all(|w| !w.contains("python")));
    }

    #[test]
    fn test_boolean_equals_guard_is_normalised() {
        let content = recipe(
            r#"
[[variants]]
name = "mpi"
default = false

[[depends_on]]
spec = "mpi"
when = "mpi=on"

[[depends_on]]
spec = "serial-solver"
when = "mpi=False"
"#,
        );
        let recipe = parse_recipe(&content).unwrap();
        assert_eq!(recipe.dependencies()[0].when, Guard::enabled("mpi"));
        assert_eq!(recipe.dependencies()[1].when, Guard::disabled("mpi"));

        let version = Version::parse("1.0").unwrap();
        let state = crate::recipe::variant::VariantState::parse("mpi=on").unwrap();
        let deps = recipe.resolve_dependencies(&version, &state).unwrap();
        let names: Vec<&str> = deps.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["mpi"]);
    }

    #[test]
    fn test_boolean_equals_guard_with_bad_value() {
        let content = recipe(
            r#"
[[variants]]
name = "mpi"
default = false

[[depends_on]]
spec = "mpi"
when = "mpi=maybe"
"#,
        );
        assert!(declaration_error(&content).contains("maybe"));
    }

    #[test]
    fn test_unparsable_guard() {
        let content = recipe(
            r#"
[[depends_on]]
spec = "zlib"
when = "+"
"#,
        );
        assert!(declaration_error(&content).contains("bad condition"));
    }

    #[test]
    fn test_unparsable_dependency_spec() {
        let content = recipe(
            r#"
[[depends_on]]
spec = "@1.0"
"#,
        );
        assert!(declaration_error(&content).contains("dependency '@1.0'"));
    }

    #[test]
    fn test_when_off_on_choice_variant() {
        let content = recipe(
            r#"
[[cmake_args]]
define = "CMAKE_BUILD_TYPE"
from_variant = "build_type"
when_off = "omit"
"#,
        );
        assert!(declaration_error(&content).contains("when_off"));
    }
}
