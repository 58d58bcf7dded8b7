// src/recipe/cmake.rs

//! CMake argument declarations
//!
//! Each declaration renders to at most one `-D<NAME>:<TYPE>=<VALUE>` token for
//! a resolved build. Values come from a variant, a literal, or an attribute of
//! an installed dependency.

use crate::error::{Error, Result};
use crate::recipe::guard::Guard;
use crate::recipe::installed::InstalledDependencies;
use crate::recipe::variant::{ResolvedVariants, VariantValue};
use crate::version::Version;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::{Display, EnumString};
use tracing::debug;

/// What to do with a boolean argument whose variant is off
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OffPolicy {
    /// Emit `=OFF` explicitly
    #[default]
    Emit,
    /// Emit nothing when the variant is off
    Omit,
}

/// CMake cache entry type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
#[serde(rename_all = "UPPERCASE")]
pub enum CmakeType {
    Bool,
    String,
    Path,
    Filepath,
}

/// Where an argument's value comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum ArgValue {
    /// A variant's resolved value; booleans become `ON`/`OFF`
    Variant { variant: String, when_off: OffPolicy },
    Literal { value: String },
    /// An attribute of an installed dependency, e.g. `mpi.mpicxx`
    Dependency { dependency: String, attribute: String },
}

/// One `-D` declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CmakeArg {
    pub define: String,
    #[serde(rename = "type")]
    pub ty: CmakeType,
    pub value: ArgValue,
    pub when: Guard,
}

/// Format a single cache definition
pub fn cmake_define(name: &str, ty: CmakeType, value: &str) -> String {
    format!("-D{}:{}={}", name, ty, value)
}

impl CmakeArg {
    pub fn new(define: impl Into<String>, ty: CmakeType, value: ArgValue) -> Self {
        Self {
            define: define.into(),
            ty,
            value,
            when: Guard::always(),
        }
    }

    /// Boolean flag driven by a variant
    pub fn from_variant(define: impl Into<String>, variant: impl Into<String>) -> Self {
        Self::new(
            define,
            CmakeType::Bool,
            ArgValue::Variant {
                variant: variant.into(),
                when_off: OffPolicy::Emit,
            },
        )
    }

    pub fn when(mut self, guard: Guard) -> Self {
        self.when = guard;
        self
    }

    pub fn omit_when_off(mut self) -> Self {
        if let ArgValue::Variant { when_off, .. } = &mut self.value {
            *when_off = OffPolicy::Omit;
        }
        self
    }

    /// True for a variant-driven argument that emits nothing when off
    pub fn omits_off(&self) -> bool {
        matches!(
            self.value,
            ArgValue::Variant {
                when_off: OffPolicy::Omit,
                ..
            }
        )
    }

    /// Dependency this argument reads from, if any
    pub fn dependency(&self) -> Option<&str> {
        match &self.value {
            ArgValue::Dependency { dependency, .. } => Some(dependency),
            _ => None,
        }
    }

    /// Render the token for a resolved build
    ///
    /// Returns `None` when the guard is false or the variant is off under
    /// [`OffPolicy::Omit`].
    pub fn render(
        &self,
        version: &Version,
        variants: &ResolvedVariants,
        installed: &dyn InstalledDependencies,
    ) -> Result<Option<String>> {
        if !self.when.evaluate(version, variants) {
            debug!("skipping {} (guard '{}' is false)", self.define, self.when);
            return Ok(None);
        }

        let value = match &self.value {
            ArgValue::Variant { variant, when_off } => match variants.get(variant) {
                Some(VariantValue::Bool(true)) => "ON".to_string(),
                Some(VariantValue::Bool(false)) => {
                    if *when_off == OffPolicy::Omit {
                        debug!("omitting {} ({} is off)", self.define, variant);
                        return Ok(None);
                    }
                    "OFF".to_string()
                }
                Some(VariantValue::Choice(choice)) => choice.clone(),
                None => {
                    return Err(Error::ParseError(format!(
                        "argument {} refers to unresolved variant '{}'",
                        self.define, variant
                    )));
                }
            },
            ArgValue::Literal { value } => value.clone(),
            ArgValue::Dependency {
                dependency,
                attribute,
            } => installed.require(dependency, attribute)?,
        };

        let token = cmake_define(&self.define, self.ty, &value);
        debug!("emitting {}", token);
        Ok(Some(token))
    }
}

impl fmt::Display for CmakeArg {
    /// Declaration summary: `-DDAKOTA_HAVE_MPI:BOOL=<+mpi> when '+mpi'`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "-D{}:{}=", self.define, self.ty)?;
        match &self.value {
            ArgValue::Variant { variant, when_off } => {
                write!(f, "<+{}>", variant)?;
                if *when_off == OffPolicy::Omit {
                    write!(f, " (omitted when off)")?;
                }
            }
            ArgValue::Literal { value } => write!(f, "{}", value)?,
            ArgValue::Dependency {
                dependency,
                attribute,
            } => write!(f, "<{}.{}>", dependency, attribute)?,
        }
        if !self.when.is_always() {
            write!(f, " when '{}'", self.when)?;
        }
        Ok(())
    }
}
