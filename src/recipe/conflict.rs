// src/recipe/conflict.rs

//! Conflict rules: version/variant combinations a recipe refuses to build

use crate::error::ConflictError;
use crate::recipe::guard::Guard;
use crate::recipe::variant::ResolvedVariants;
use crate::version::Version;
use serde::Serialize;

/// A declared incompatibility
///
/// Matches when both `trigger` and `when` hold, e.g. trigger `+mpi` when
/// `@:6.3`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConflictRule {
    pub trigger: Guard,
    pub when: Guard,
    pub message: String,
}

impl ConflictRule {
    pub fn new(trigger: Guard, when: Guard, message: impl Into<String>) -> Self {
        Self {
            trigger,
            when,
            message: message.into(),
        }
    }

    /// Default message when the recipe gives none
    pub fn default_message(trigger: &Guard, when: &Guard) -> String {
        if when.is_always() {
            format!("conflicts with '{}'", trigger)
        } else {
            format!("conflicts with '{}' when '{}'", trigger, when)
        }
    }

    pub fn matches(&self, version: &Version, variants: &ResolvedVariants) -> bool {
        self.trigger.evaluate(version, variants) && self.when.evaluate(version, variants)
    }

    /// The predicate in canonical form: `'+mpi' when '@:6.3'`
    pub fn predicate(&self) -> String {
        if self.when.is_always() {
            format!("'{}'", self.trigger)
        } else {
            format!("'{}' when '{}'", self.trigger, self.when)
        }
    }

    pub fn to_error(&self, package: &str) -> ConflictError {
        ConflictError {
            package: package.to_string(),
            message: self.message.clone(),
            predicate: self.predicate(),
        }
    }
}
