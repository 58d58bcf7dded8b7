// src/error.rs

use thiserror::Error;

/// A conflict rule matched the requested build
///
/// Fatal for the build. The orchestrator receives the recipe author's message
/// together with the predicate that triggered it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{package}: {message} (conflict: {predicate})")]
pub struct ConflictError {
    /// Package whose conflict rule matched
    pub package: String,
    /// Human-readable explanation from the recipe
    pub message: String,
    /// Canonical form of the matching predicate, e.g. `'+mpi' when '@:6.3'`
    pub predicate: String,
}

/// A recipe declaration is malformed
///
/// Detected when a recipe is loaded or registered, never during resolution.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid recipe '{recipe}': {message}")]
pub struct DeclarationError {
    /// Recipe name, or the file it came from when the name is unknown
    pub recipe: String,
    pub message: String,
}

impl DeclarationError {
    pub fn new(recipe: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            recipe: recipe.into(),
            message: message.into(),
        }
    }
}

/// Core error types for recipebook
#[derive(Error, Debug)]
pub enum Error {
    /// Requested version/variant combination is disallowed by the recipe
    #[error(transparent)]
    Conflict(#[from] ConflictError),

    /// Recipe declaration is malformed
    #[error(transparent)]
    Declaration(#[from] DeclarationError),

    /// No recipe registered under this name
    #[error("Unknown package: {0}")]
    UnknownPackage(String),

    /// The recipe does not declare this version
    #[error("{package} has no version {version}")]
    UnknownVersion { package: String, version: String },

    /// The recipe does not declare this variant
    #[error("{package} has no variant '{variant}'")]
    UnknownVariant { package: String, variant: String },

    /// A variant was given a value it does not accept
    #[error("Invalid value '{value}' for variant '{variant}' (allowed: {allowed})")]
    InvalidVariantValue {
        variant: String,
        value: String,
        allowed: String,
    },

    /// An installed dependency (or one of its attributes) could not be found
    #[error("Dependency '{package}' does not provide '{attribute}'")]
    MissingDependency { package: String, attribute: String },

    /// Fetched content does not match the declared digest
    #[error("Integrity check failed for {name}: expected {expected}, got {actual}")]
    IntegrityMismatch {
        name: String,
        expected: String,
        actual: String,
    },

    /// Parse errors for guards, versions and request strings
    #[error("Parse error: {0}")]
    ParseError(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using recipebook's Error type
pub type Result<T> = std::result::Result<T, Error>;
