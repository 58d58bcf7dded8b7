// src/recipe/variant.rs

//! Build variants and variant state
//!
//! A variant is a user-selectable build option declared by a recipe, either a
//! boolean toggle (`+mpi` / `~mpi`) or a choice among named values
//! (`build_type=Release`). Users supply a [`VariantState`] with explicit
//! choices; [`Variant::resolve`] fills in defaults for everything left unset.

use crate::error::{Error, Result};
use crate::recipe::syntax::{parse_terms, Term};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// `true`/`on` and `false`/`off`, any case
pub(crate) fn bool_from_text(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "on" => Some(true),
        "false" | "off" => Some(false),
        _ => None,
    }
}

/// The value of a variant
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VariantValue {
    Bool(bool),
    Choice(String),
}

impl VariantValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Choice(_) => None,
        }
    }
}

impl fmt::Display for VariantValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Choice(s) => write!(f, "{}", s),
        }
    }
}

impl Serialize for VariantValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Choice(s) => serializer.serialize_str(s),
        }
    }
}

/// A declared variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Variant {
    pub name: String,
    pub default: VariantValue,
    /// Allowed values for choice variants; empty for boolean variants
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
    pub description: String,
}

impl Variant {
    /// Declare a boolean variant
    pub fn boolean(name: impl Into<String>, default: bool, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: VariantValue::Bool(default),
            values: Vec::new(),
            description: description.into(),
        }
    }

    /// Declare a choice variant
    ///
    /// The caller is responsible for `default` being one of `values`;
    /// recipe loading checks this.
    pub fn choice(
        name: impl Into<String>,
        default: impl Into<String>,
        values: Vec<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            default: VariantValue::Choice(default.into()),
            values,
            description: description.into(),
        }
    }

    pub fn is_bool(&self) -> bool {
        matches!(self.default, VariantValue::Bool(_))
    }

    /// Check a user-supplied value against this declaration
    ///
    /// Boolean variants also accept `name=true` / `name=false`.
    pub fn accept(&self, value: &VariantValue) -> Result<VariantValue> {
        match (&self.default, value) {
            (VariantValue::Bool(_), VariantValue::Bool(b)) => Ok(VariantValue::Bool(*b)),
            (VariantValue::Bool(_), VariantValue::Choice(s)) => match bool_from_text(s) {
                Some(b) => Ok(VariantValue::Bool(b)),
                None => Err(self.invalid(value)),
            },
            (VariantValue::Choice(_), VariantValue::Choice(s)) if self.values.contains(s) => {
                Ok(value.clone())
            }
            (VariantValue::Choice(_), _) => Err(self.invalid(value)),
        }
    }

    fn invalid(&self, value: &VariantValue) -> Error {
        let allowed = if self.is_bool() {
            "true, false".to_string()
        } else {
            self.values.join(", ")
        };
        Error::InvalidVariantValue {
            variant: self.name.clone(),
            value: value.to_string(),
            allowed,
        }
    }

    /// Display form used in listings: `+mpi`, `~hdf5`, `build_type=Release`
    pub fn default_spec(&self) -> String {
        match &self.default {
            VariantValue::Bool(true) => format!("+{}", self.name),
            VariantValue::Bool(false) => format!("~{}", self.name),
            VariantValue::Choice(v) => format!("{}={}", self.name, v),
        }
    }

    /// Resolve every declared variant against explicit choices
    ///
    /// Unset variants take their default. Choices naming undeclared variants
    /// are rejected.
    pub fn resolve(
        package: &str,
        declared: &[Variant],
        state: &VariantState,
    ) -> Result<ResolvedVariants> {
        for name in state.choices.keys() {
            if !declared.iter().any(|v| &v.name == name) {
                return Err(Error::UnknownVariant {
                    package: package.to_string(),
                    variant: name.clone(),
                });
            }
        }

        let mut values = BTreeMap::new();
        for variant in declared {
            let value = match state.choices.get(&variant.name) {
                Some(chosen) => variant.accept(chosen)?,
                None => variant.default.clone(),
            };
            values.insert(variant.name.clone(), value);
        }
        Ok(ResolvedVariants { values })
    }
}

/// Explicit variant choices for one build request
///
/// Parsed from `+mpi ~hdf5 build_type=Release`. Later terms override
/// earlier ones.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VariantState {
    choices: BTreeMap<String, VariantValue>,
}

impl VariantState {
    /// An empty state: every variant takes its default
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variant choice
    pub fn with(mut self, name: impl Into<String>, value: VariantValue) -> Self {
        self.choices.insert(name.into(), value);
        self
    }

    /// Enable or disable a boolean variant
    pub fn with_bool(self, name: impl Into<String>, enabled: bool) -> Self {
        self.with(name, VariantValue::Bool(enabled))
    }

    /// Select a value for a choice variant
    pub fn with_choice(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.with(name, VariantValue::Choice(value.into()))
    }

    pub fn get(&self, name: &str) -> Option<&VariantValue> {
        self.choices.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &VariantValue)> {
        self.choices.iter()
    }

    /// Parse variant terms; version terms are rejected
    pub fn parse(s: &str) -> Result<Self> {
        let mut state = Self::new();
        for term in parse_terms(s)? {
            state = match term {
                Term::Enabled(name) => state.with_bool(name, true),
                Term::Disabled(name) => state.with_bool(name, false),
                Term::Equals(name, value) => state.with_choice(name, value),
                Term::Version(_) => {
                    return Err(Error::ParseError(format!(
                        "Version not allowed in variant list '{}'",
                        s
                    )));
                }
            };
        }
        Ok(state)
    }
}

impl fmt::Display for VariantState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_variants(self.choices.iter()))
    }
}

impl FromStr for VariantState {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        VariantState::parse(s)
    }
}

/// Spack-style rendering: toggles glued together, choices space-separated
fn format_variants<'a>(values: impl Iterator<Item = (&'a String, &'a VariantValue)>) -> String {
    let mut toggles = String::new();
    let mut choices = Vec::new();
    for (name, value) in values {
        match value {
            VariantValue::Bool(true) => toggles.push_str(&format!("+{}", name)),
            VariantValue::Bool(false) => toggles.push_str(&format!("~{}", name)),
            VariantValue::Choice(v) => choices.push(format!("{}={}", name, v)),
        }
    }
    let mut parts = Vec::new();
    if !toggles.is_empty() {
        parts.push(toggles);
    }
    parts.extend(choices);
    parts.join(" ")
}

/// A value for every declared variant of a recipe
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct ResolvedVariants {
    values: BTreeMap<String, VariantValue>,
}

impl ResolvedVariants {
    pub fn get(&self, name: &str) -> Option<&VariantValue> {
        self.values.get(name)
    }

    /// True only for a boolean variant that is on
    pub fn is_enabled(&self, name: &str) -> bool {
        matches!(self.values.get(name), Some(VariantValue::Bool(true)))
    }

    /// True only for a boolean variant that is off
    pub fn is_disabled(&self, name: &str) -> bool {
        matches!(self.values.get(name), Some(VariantValue::Bool(false)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &VariantValue)> {
        self.values.iter()
    }
}

impl fmt::Display for ResolvedVariants {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_variants(self.values.iter()))
    }
}
