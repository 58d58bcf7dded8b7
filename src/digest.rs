// src/digest.rs

//! Integrity digests for source archives
//!
//! Every archive version in a recipe carries a digest that the fetch
//! subsystem checks after download. Git-sourced versions pin a commit instead.
//!
//! | Recipe key | Meaning |
//! |------------|---------|
//! | `sha256`   | SHA-256 of the archive, 64 hex chars |
//! | `sha512`   | SHA-512 of the archive, 128 hex chars |
//! | `commit`   | Git commit (abbreviated or full) |

use crate::error::{Error, Result};
use serde::Serialize;
use sha2::{Digest as _, Sha256, Sha512};
use std::fmt;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

/// Digest algorithm selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    #[default]
    Sha256,
    Sha512,
}

impl DigestAlgorithm {
    /// Get the digest output length in bytes
    #[inline]
    pub const fn output_len(&self) -> usize {
        match self {
            Self::Sha256 => 32,
            Self::Sha512 => 64,
        }
    }

    /// Get the digest length as a hex string
    #[inline]
    pub const fn hex_len(&self) -> usize {
        self.output_len() * 2
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Sha512 => "sha512",
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for DigestAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sha256" | "sha-256" => Ok(Self::Sha256),
            "sha512" | "sha-512" => Ok(Self::Sha512),
            _ => Err(Error::ParseError(format!("unknown digest algorithm: {}", s))),
        }
    }
}

/// A digest value with its algorithm
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Digest {
    pub algorithm: DigestAlgorithm,
    /// Lowercase hex
    pub value: String,
}

impl Digest {
    /// Create a digest, validating length and hex characters
    pub fn new(algorithm: DigestAlgorithm, value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        let expected_len = algorithm.hex_len();

        if value.len() != expected_len {
            return Err(Error::ParseError(format!(
                "invalid {} digest length: expected {}, got {}",
                algorithm,
                expected_len,
                value.len()
            )));
        }
        if !value.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::ParseError(format!("invalid hex in digest: {}", value)));
        }

        Ok(Self {
            algorithm,
            value: value.to_lowercase(),
        })
    }

    /// Parse a prefixed digest string (e.g., "sha256:abc123...")
    ///
    /// Unprefixed strings are taken as SHA-256.
    pub fn parse_prefixed(s: &str) -> Result<Self> {
        match s.split_once(':') {
            Some((algo, value)) => Self::new(algo.parse()?, value),
            None => Self::new(DigestAlgorithm::Sha256, s),
        }
    }

    /// Format as a prefixed string (e.g., "sha256:abc123...")
    pub fn to_prefixed_string(&self) -> String {
        format!("{}:{}", self.algorithm.name(), self.value)
    }

    /// Compute the digest of a byte slice
    pub fn of_bytes(algorithm: DigestAlgorithm, data: &[u8]) -> Self {
        let value = match algorithm {
            DigestAlgorithm::Sha256 => hex::encode(Sha256::digest(data)),
            DigestAlgorithm::Sha512 => hex::encode(Sha512::digest(data)),
        };
        Self { algorithm, value }
    }

    /// Compute the digest of everything a reader yields
    pub fn of_reader<R: Read>(algorithm: DigestAlgorithm, reader: &mut R) -> Result<Self> {
        let mut buffer = [0u8; 8192];
        let value = match algorithm {
            DigestAlgorithm::Sha256 => {
                let mut hasher = Sha256::new();
                loop {
                    let n = reader.read(&mut buffer)?;
                    if n == 0 {
                        break;
                    }
                    hasher.update(&buffer[..n]);
                }
                hex::encode(hasher.finalize())
            }
            DigestAlgorithm::Sha512 => {
                let mut hasher = Sha512::new();
                loop {
                    let n = reader.read(&mut buffer)?;
                    if n == 0 {
                        break;
                    }
                    hasher.update(&buffer[..n]);
                }
                hex::encode(hasher.finalize())
            }
        };
        Ok(Self { algorithm, value })
    }

    /// Verify bytes match this digest
    pub fn verify_bytes(&self, name: &str, data: &[u8]) -> Result<()> {
        self.check(name, Self::of_bytes(self.algorithm, data))
    }

    /// Verify a file matches this digest
    ///
    /// Streams the file content to avoid loading it entirely into memory.
    pub fn verify_file(&self, path: &Path) -> Result<()> {
        let mut file = std::fs::File::open(path)?;
        let actual = Self::of_reader(self.algorithm, &mut file)?;
        self.check(&path.display().to_string(), actual)
    }

    fn check(&self, name: &str, actual: Digest) -> Result<()> {
        if actual.value == self.value {
            Ok(())
        } else {
            Err(Error::IntegrityMismatch {
                name: name.to_string(),
                expected: self.to_prefixed_string(),
                actual: actual.to_prefixed_string(),
            })
        }
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// What pins a version's source: an archive digest or a git commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Integrity {
    Archive { digest: Digest },
    Git { commit: String },
}

impl Integrity {
    /// Validate a git commit id (7 to 40 hex chars)
    pub fn git(commit: impl Into<String>) -> Result<Self> {
        let commit = commit.into();
        if !(7..=40).contains(&commit.len()) || !commit.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::ParseError(format!("invalid git commit: {}", commit)));
        }
        Ok(Self::Git {
            commit: commit.to_lowercase(),
        })
    }
}

impl fmt::Display for Integrity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Archive { digest } => write!(f, "{}", digest.to_prefixed_string()),
            Self::Git { commit } => write!(f, "commit:{}", commit),
        }
    }
}
