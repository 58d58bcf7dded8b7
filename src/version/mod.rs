// src/version/mod.rs

//! Version labels and range constraints for recipes
//!
//! Recipe versions are dotted labels such as `6.13`, `1.68.0` or `master`.
//! Constraints use the `lo:hi` range syntax found in `when` guards and
//! dependency specs:
//!
//! - `6.8:` → 6.8 or newer
//! - `:6.3` → up to and including any 6.3.x release
//! - `1.2:1.4` → between 1.2 and any 1.4.x
//! - `6.3` → 6.3 and any 6.3.x release
//! - `1.2,2.0:` → union of ranges

use crate::error::{Error, Result};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Development branch names that sort above every numbered release
const INFINITY_NAMES: &[&str] = &["stable", "trunk", "head", "master", "main", "develop"];

/// One component of a version label
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Segment {
    Num(u64),
    Str(String),
}

impl Segment {
    fn infinity_rank(s: &str) -> Option<usize> {
        INFINITY_NAMES.iter().position(|name| *name == s)
    }

    fn compare(&self, other: &Segment) -> Ordering {
        match (self, other) {
            (Segment::Num(a), Segment::Num(b)) => a.cmp(b),
            (Segment::Str(a), Segment::Str(b)) => {
                match (Self::infinity_rank(a), Self::infinity_rank(b)) {
                    (Some(x), Some(y)) => x.cmp(&y),
                    (Some(_), None) => Ordering::Greater,
                    (None, Some(_)) => Ordering::Less,
                    (None, None) => a.cmp(b),
                }
            }
            // Numbers beat tags at the same position ("1.1" > "1.b"), branch names beat both
            (Segment::Num(_), Segment::Str(s)) => {
                if Self::infinity_rank(s).is_some() {
                    Ordering::Less
                } else {
                    Ordering::Greater
                }
            }
            (Segment::Str(_), Segment::Num(_)) => other.compare(self).reverse(),
        }
    }
}

/// A parsed version label
///
/// Equality and ordering look at the parsed segments, so `6.03` equals `6.3`;
/// `Display` reproduces the label as written.
#[derive(Debug, Clone)]
pub struct Version {
    label: String,
    segments: Vec<Segment>,
}

impl Version {
    /// Parse a version label
    ///
    /// Labels are split on `.`, `-` and `_`, and on digit/letter boundaries,
    /// so `2.0rc1` has segments `2`, `0`, `rc`, `1`.
    pub fn parse(s: &str) -> Result<Self> {
        let label = s.trim();
        if label.is_empty() {
            return Err(Error::ParseError("Empty version label".to_string()));
        }

        let mut segments = Vec::new();
        for part in label.split(['.', '-', '_']) {
            if part.is_empty() {
                return Err(Error::ParseError(format!(
                    "Empty component in version '{}'",
                    label
                )));
            }
            if let Some(bad) = part.chars().find(|c| !c.is_ascii_alphanumeric()) {
                return Err(Error::ParseError(format!(
                    "Invalid character '{}' in version '{}'",
                    bad, label
                )));
            }

            let mut run = String::new();
            let mut run_is_digit = None;
            for c in part.chars() {
                let is_digit = c.is_ascii_digit();
                if run_is_digit.is_some_and(|d| d != is_digit) {
                    segments.push(Self::segment(&run)?);
                    run.clear();
                }
                run.push(c);
                run_is_digit = Some(is_digit);
            }
            segments.push(Self::segment(&run)?);
        }

        Ok(Self {
            label: label.to_string(),
            segments,
        })
    }

    fn segment(run: &str) -> Result<Segment> {
        if run.chars().all(|c| c.is_ascii_digit()) {
            run.parse::<u64>()
                .map(Segment::Num)
                .map_err(|e| Error::ParseError(format!("Invalid version number '{}': {}", run, e)))
        } else {
            Ok(Segment::Str(run.to_ascii_lowercase()))
        }
    }

    /// The label as written in the recipe
    pub fn as_str(&self) -> &str {
        &self.label
    }

    /// True for branch versions like `master` or `develop`
    pub fn is_branch(&self) -> bool {
        matches!(self.segments.first(), Some(Segment::Str(s)) if Segment::infinity_rank(s).is_some())
    }

    /// Check whether `other` starts with all of this version's segments
    ///
    /// `6.3` is a prefix of `6.3` and `6.3.1`, but not of `6.30`.
    pub fn is_prefix_of(&self, other: &Version) -> bool {
        other.segments.starts_with(&self.segments)
    }

    /// Compare two versions segment by segment
    pub fn compare(&self, other: &Version) -> Ordering {
        for (a, b) in self.segments.iter().zip(other.segments.iter()) {
            match a.compare(b) {
                Ordering::Equal => {}
                ord => return ord,
            }
        }
        // A strict prefix sorts first: 6.3 < 6.3.1
        self.segments.len().cmp(&other.segments.len())
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.segments == other.segments
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.segments.hash(state);
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Version::parse(s)
    }
}

/// A closed interval of versions; either end may be open
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRange {
    pub lo: Option<Version>,
    pub hi: Option<Version>,
}

impl VersionRange {
    /// Range containing exactly one release series, e.g. `6.3` (includes 6.3.x)
    pub fn exact(version: Version) -> Self {
        Self {
            lo: Some(version.clone()),
            hi: Some(version),
        }
    }

    /// Parse `lo:hi`, `lo:`, `:hi`, `:` or a bare version
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::ParseError("Empty version range".to_string()));
        }

        match s.split_once(':') {
            Some((lo, hi)) => {
                let lo = lo.trim();
                let hi = hi.trim();
                let range = Self {
                    lo: if lo.is_empty() { None } else { Some(Version::parse(lo)?) },
                    hi: if hi.is_empty() { None } else { Some(Version::parse(hi)?) },
                };
                if let (Some(lo), Some(hi)) = (&range.lo, &range.hi) {
                    if lo > hi && !hi.is_prefix_of(lo) {
                        return Err(Error::ParseError(format!(
                            "Version range '{}' is empty: {} > {}",
                            s, lo, hi
                        )));
                    }
                }
                Ok(range)
            }
            None => Ok(Self::exact(Version::parse(s)?)),
        }
    }

    /// Check if a version falls in this range
    ///
    /// The upper bound includes every release that extends it, so `:6.8`
    /// contains `6.8.1`.
    pub fn contains(&self, version: &Version) -> bool {
        let above_lo = self.lo.as_ref().is_none_or(|lo| version >= lo);
        let below_hi = self
            .hi
            .as_ref()
            .is_none_or(|hi| version <= hi || hi.is_prefix_of(version));
        above_lo && below_hi
    }

    /// Check whether some version could lie in both ranges
    pub fn overlaps(&self, other: &VersionRange) -> bool {
        fn ends_before(hi: &Option<Version>, lo: &Option<Version>) -> bool {
            match (hi, lo) {
                (Some(hi), Some(lo)) => hi < lo && !hi.is_prefix_of(lo),
                _ => false,
            }
        }
        !ends_before(&self.hi, &other.lo) && !ends_before(&other.hi, &self.lo)
    }

    fn is_exact(&self) -> bool {
        matches!((&self.lo, &self.hi), (Some(lo), Some(hi)) if lo == hi)
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_exact() {
            if let Some(lo) = &self.lo {
                return write!(f, "{}", lo);
            }
        }
        if let Some(lo) = &self.lo {
            write!(f, "{}", lo)?;
        }
        write!(f, ":")?;
        if let Some(hi) = &self.hi {
            write!(f, "{}", hi)?;
        }
        Ok(())
    }
}

/// A union of version ranges; no ranges means any version
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VersionConstraint {
    ranges: Vec<VersionRange>,
}

impl VersionConstraint {
    /// Constraint satisfied by every version
    pub fn any() -> Self {
        Self::default()
    }

    /// Parse a comma-separated list of ranges
    ///
    /// Examples:
    /// - `6.8:` → GreaterOrEqual(6.8)
    /// - `:1.68.0` → up to 1.68.0
    /// - `1.2,2.0:` → 1.2.x or anything from 2.0
    /// - `` or `:` → any
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() || s == ":" {
            return Ok(Self::any());
        }

        let ranges = s
            .split(',')
            .map(VersionRange::parse)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { ranges })
    }

    pub fn is_any(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Check if a version satisfies this constraint
    pub fn satisfies(&self, version: &Version) -> bool {
        self.is_any() || self.ranges.iter().any(|r| r.contains(version))
    }

    /// Check whether some version satisfies both constraints
    pub fn overlaps(&self, other: &VersionConstraint) -> bool {
        if self.is_any() || other.is_any() {
            return true;
        }
        self.ranges
            .iter()
            .any(|a| other.ranges.iter().any(|b| a.overlaps(b)))
    }
}

impl From<VersionRange> for VersionConstraint {
    fn from(range: VersionRange) -> Self {
        Self {
            ranges: vec![range],
        }
    }
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_any() {
            return write!(f, ":");
        }
        let parts: Vec<String> = self.ranges.iter().map(|r| r.to_string()).collect();
        write!(f, "{}", parts.join(","))
    }
}

impl FromStr for VersionConstraint {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        VersionConstraint::parse(s)
    }
}
