// src/recipe/dependency.rs

//! Dependency edges declared by a recipe

use crate::error::{Error, Result};
use crate::recipe::guard::Guard;
use crate::recipe::syntax::{parse_terms, split_name, Term};
use crate::recipe::variant::{ResolvedVariants, VariantState};
use crate::version::{Version, VersionConstraint};
use serde::{Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;
use strum_macros::{Display, EnumString};

/// When a dependency is needed
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, Serialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DepType {
    /// Needed on PATH while building
    Build,
    /// Linked into the package's libraries or executables
    Link,
    /// Needed when the installed package runs
    Run,
    /// Needed only to run the package's tests
    Test,
}

/// Set of dependency types; defaults to `build, link`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DepTypes(BTreeSet<DepType>);

impl DepTypes {
    pub fn new(types: impl IntoIterator<Item = DepType>) -> Self {
        Self(types.into_iter().collect())
    }

    /// Parse a list like `["build", "run"]`
    pub fn parse<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        if names.is_empty() {
            return Err(Error::ParseError("empty dependency type list".to_string()));
        }
        names
            .iter()
            .map(|n| {
                n.as_ref()
                    .trim()
                    .parse::<DepType>()
                    .map_err(|_| Error::ParseError(format!("unknown dependency type '{}'", n.as_ref())))
            })
            .collect::<Result<BTreeSet<_>>>()
            .map(Self)
    }

    pub fn contains(&self, t: DepType) -> bool {
        self.0.contains(&t)
    }

    pub fn iter(&self) -> impl Iterator<Item = DepType> + '_ {
        self.0.iter().copied()
    }
}

impl Default for DepTypes {
    fn default() -> Self {
        Self::new([DepType::Build, DepType::Link])
    }
}

impl fmt::Display for DepTypes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.0.iter().map(|t| t.to_string()).collect();
        write!(f, "{}", names.join(","))
    }
}

/// A requirement on another package, possibly conditional
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyEdge {
    /// Target package name
    pub name: String,
    /// Acceptable versions of the target
    #[serde(serialize_with = "serialize_display")]
    pub constraint: VersionConstraint,
    /// Variants the target must be built with (passed through to the orchestrator)
    #[serde(serialize_with = "serialize_display")]
    pub variants: VariantState,
    pub types: DepTypes,
    /// Condition on *this* package's build under which the edge applies
    pub when: Guard,
}

fn serialize_display<T: fmt::Display, S: Serializer>(
    value: &T,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

impl DependencyEdge {
    /// Parse a dependency spec such as `python@3:` or `hdf5+mpi@1.10:`
    ///
    /// The edge applies unconditionally with default types until
    /// [`with_types`](Self::with_types) / [`when`](Self::when) say otherwise.
    pub fn parse(spec: &str) -> Result<Self> {
        let (name, rest) = split_name(spec)?;
        let mut constraint = VersionConstraint::any();
        let mut variants = VariantState::new();

        for term in parse_terms(rest)? {
            match term {
                Term::Version(c) => {
                    if !constraint.is_any() {
                        return Err(Error::ParseError(format!(
                            "dependency '{}' has more than one version constraint",
                            spec
                        )));
                    }
                    constraint = c;
                }
                Term::Enabled(v) => variants = variants.with_bool(v, true),
                Term::Disabled(v) => variants = variants.with_bool(v, false),
                Term::Equals(v, value) => variants = variants.with_choice(v, value),
            }
        }

        Ok(Self {
            name: name.to_string(),
            constraint,
            variants,
            types: DepTypes::default(),
            when: Guard::always(),
        })
    }

    pub fn with_types(mut self, types: DepTypes) -> Self {
        self.types = types;
        self
    }

    pub fn when(mut self, guard: Guard) -> Self {
        self.when = guard;
        self
    }

    /// Check whether this edge applies to the given build
    pub fn applies(&self, version: &Version, variants: &ResolvedVariants) -> bool {
        self.when.evaluate(version, variants)
    }

    /// The target requirement in spec form: `python@3:`, `hdf5+mpi`
    pub fn target_spec(&self) -> String {
        let mut s = self.name.clone();
        if !self.constraint.is_any() {
            s.push_str(&format!("@{}", self.constraint));
        }
        if !self.variants.is_empty() {
            let v = self.variants.to_string();
            if !v.starts_with(['+', '~']) {
                s.push(' ');
            }
            s.push_str(&v);
        }
        s
    }
}

impl fmt::Display for DependencyEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (type={})", self.target_spec(), self.types)?;
        if !self.when.is_always() {
            write!(f, " when '{}'", self.when)?;
        }
        Ok(())
    }
}
