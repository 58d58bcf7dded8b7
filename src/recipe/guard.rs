// src/recipe/guard.rs

//! Guard predicates over a resolved build
//!
//! Dependencies, conflicts and CMake arguments may apply only to some builds.
//! Recipes write the condition inline (`when = "+mpi@6.8:"`); it is parsed
//! once, at load time, into a [`Guard`]: a conjunction of [`Condition`]s
//! evaluated against the chosen version and resolved variants.

use crate::error::{Error, Result};
use crate::recipe::syntax::{parse_terms, Term};
use crate::recipe::variant::{bool_from_text, ResolvedVariants, VariantValue};
use crate::version::{Version, VersionConstraint};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A single test against the resolved build
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// Version lies in the constraint (`@6.8:`)
    Version(VersionConstraint),
    /// Boolean variant is on (`+mpi`)
    Enabled(String),
    /// Boolean variant is off (`~mpi`)
    Disabled(String),
    /// Variant has the given value (`build_type=Release`)
    Equals(String, String),
}

impl Condition {
    /// Evaluate against a version and resolved variants
    pub fn holds(&self, version: &Version, variants: &ResolvedVariants) -> bool {
        match self {
            Condition::Version(constraint) => constraint.satisfies(version),
            Condition::Enabled(name) => variants.is_enabled(name),
            Condition::Disabled(name) => variants.is_disabled(name),
            Condition::Equals(name, expected) => match variants.get(name) {
                Some(VariantValue::Choice(actual)) => actual == expected,
                Some(VariantValue::Bool(actual)) => bool_from_text(expected) == Some(*actual),
                None => false,
            },
        }
    }

    /// Variant named by this condition, if any
    pub fn variant(&self) -> Option<&str> {
        match self {
            Condition::Version(_) => None,
            Condition::Enabled(name) | Condition::Disabled(name) | Condition::Equals(name, _) => {
                Some(name)
            }
        }
    }
}

impl From<Term> for Condition {
    fn from(term: Term) -> Self {
        match term {
            Term::Version(c) => Condition::Version(c),
            Term::Enabled(n) => Condition::Enabled(n),
            Term::Disabled(n) => Condition::Disabled(n),
            Term::Equals(n, v) => Condition::Equals(n, v),
        }
    }
}

/// A conjunction of conditions; the empty guard always holds
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Guard {
    conditions: Vec<Condition>,
}

impl Guard {
    /// A guard that always holds
    pub fn always() -> Self {
        Self::default()
    }

    /// Guard on a boolean variant being on
    pub fn enabled(variant: impl Into<String>) -> Self {
        Self::always().and(Condition::Enabled(variant.into()))
    }

    /// Guard on a boolean variant being off
    pub fn disabled(variant: impl Into<String>) -> Self {
        Self::always().and(Condition::Disabled(variant.into()))
    }

    /// Guard on the version range
    pub fn version(constraint: VersionConstraint) -> Self {
        Self::always().and(Condition::Version(constraint))
    }

    /// Add a condition
    pub fn and(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Parse `+mpi`, `@:6.3`, `+mpi@6.8: build_type=Release`, or `` (always)
    pub fn parse(s: &str) -> Result<Self> {
        let conditions = parse_terms(s)?.into_iter().map(Condition::from).collect();
        Ok(Self { conditions })
    }

    pub fn is_always(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Evaluate the guard; pure, no side effects
    pub fn evaluate(&self, version: &Version, variants: &ResolvedVariants) -> bool {
        self.conditions.iter().all(|c| c.holds(version, variants))
    }

    /// Variants this guard refers to, in order of appearance
    pub fn variants(&self) -> impl Iterator<Item = &str> {
        self.conditions.iter().filter_map(|c| c.variant())
    }

    /// Version constraints in this guard; empty when the version is unconstrained
    pub fn version_constraints(&self) -> impl Iterator<Item = &VersionConstraint> {
        self.conditions.iter().filter_map(|c| match c {
            Condition::Version(v) => Some(v),
            _ => None,
        })
    }

    /// Check that every referenced variant exists
    pub fn check_variants(&self, mut declared: impl FnMut(&str) -> bool) -> Result<()> {
        for name in self.variants() {
            if !declared(name) {
                return Err(Error::ParseError(format!(
                    "condition '{}' refers to undeclared variant '{}'",
                    self, name
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for Guard {
    /// Canonical form: version terms first, then toggles, then choices
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        for c in &self.conditions {
            if let Condition::Version(v) = c {
                out.push_str(&format!("@{}", v));
            }
        }
        for c in &self.conditions {
            match c {
                Condition::Enabled(n) => out.push_str(&format!("+{}", n)),
                Condition::Disabled(n) => out.push_str(&format!("~{}", n)),
                _ => {}
            }
        }
        for c in &self.conditions {
            if let Condition::Equals(n, v) = c {
                if !out.is_empty() {
                    out.push(' ');
                }
                out.push_str(&format!("{}={}", n, v));
            }
        }
        write!(f, "{}", out)
    }
}

impl FromStr for Guard {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Guard::parse(s)
    }
}

impl Serialize for Guard {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::variant::{Variant, VariantState};

    fn resolved(state: &str) -> ResolvedVariants {
        let declared = vec![
            Variant::boolean("mpi", true, ""),
            Variant::boolean("hdf5", false, ""),
            Variant::choice("build_type", "Release", vec!["Debug".into(), "Release".into()], ""),
        ];
        Variant::resolve("test", &declared, &VariantState::parse(state).unwrap()).unwrap()
    }

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn test_always() {
        let g = Guard::parse("").unwrap();
        assert!(g.is_always());
        assert!(g.evaluate(&v("1.0"), &resolved("")));
        assert_eq!(g.to_string(), "");
    }

    #[test]
    fn test_variant_guard() {
        let g = Guard::parse("+mpi").unwrap();
        assert_eq!(g, Guard::enabled("mpi"));
        assert!(g.evaluate(&v("6.13"), &resolved("")));
        assert!(!g.evaluate(&v("6.13"), &resolved("~mpi")));

        let g = Guard::parse("~hdf5").unwrap();
        assert!(g.evaluate(&v("6.13"), &resolved("")));
        assert!(!g.evaluate(&v("6.13"), &resolved("+hdf5")));
    }

    #[test]
    fn test_version_guard() {
        let g = Guard::parse("@:6.3").unwrap();
        assert!(g.evaluate(&v("6.3"), &resolved("")));
        assert!(!g.evaluate(&v("6.13"), &resolved("")));
    }

    #[test]
    fn test_combined_guard_is_conjunction() {
        let g = Guard::parse("+mpi@6.8:").unwrap();
        assert!(g.evaluate(&v("6.13"), &resolved("+mpi")));
        assert!(!g.evaluate(&v("6.3"), &resolved("+mpi")));
        assert!(!g.evaluate(&v("6.13"), &resolved("~mpi")));
    }

    #[test]
    fn test_choice_guard() {
        let g = Guard::parse("build_type=Debug").unwrap();
        assert!(g.evaluate(&v("1.0"), &resolved("build_type=Debug")));
        assert!(!g.evaluate(&v("1.0"), &resolved("")));

        let g = Guard::parse("mpi=true").unwrap();
        assert!(g.evaluate(&v("1.0"), &resolved("")));
        let g = Guard::parse("mpi=on").unwrap();
        assert!(g.evaluate(&v("1.0"), &resolved("")));
        assert!(!g.evaluate(&v("1.0"), &resolved("~mpi")));
    }

    #[test]
    fn test_evaluation_is_repeatable() {
        let g = Guard::parse("+mpi@6.8:").unwrap();
        let r = resolved("");
        let first = g.evaluate(&v("6.13"), &r);
        for _ in 0..3 {
            assert_eq!(g.evaluate(&v("6.13"), &r), first);
        }
    }

    #[test]
    fn test_canonical_display() {
        let g = Guard::parse("build_type=Debug ~hdf5 @6.8: +mpi").unwrap();
        assert_eq!(g.to_string(), "@6.8:~hdf5+mpi build_type=Debug");
        assert_eq!(Guard::parse(&g.to_string()).unwrap().to_string(), g.to_string());
    }

    #[test]
    fn test_check_variants() {
        let g = Guard::parse("+cuda").unwrap();
        assert!(g.check_variants(|n| n == "mpi").is_err());
        assert!(Guard::parse("+mpi").unwrap().check_variants(|n| n == "mpi").is_ok());
    }
}
