// src/recipe/install.rs

//! Install steps for recipes that do not use a build system
//!
//! A recipe lists steps like `install PerlLib/*.pm -> %(perl_lib)s`. The
//! steps are rendered against an install prefix into an [`InstallPlan`] and
//! executed through [`InstallPrimitives`], so the orchestrator decides how
//! files actually land. [`FsInstaller`] copies with `std::fs`.

use crate::error::{Error, Result};
use serde::Serialize;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Placeholders available in step paths, relative to the prefix
const PREFIX_LAYOUT: &[(&str, &str)] = &[
    ("bin", "bin"),
    ("lib", "lib"),
    ("include", "include"),
    ("share", "share"),
    ("perl_lib", "lib/perl5"),
];

/// One declarative install step
///
/// Source paths are relative to the unpacked source directory; destination
/// paths normally start with a placeholder such as `%(bin)s`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum InstallStep {
    /// Create a directory and its parents
    Mkdirp { path: String },
    /// Copy files matching a glob into a directory
    Install { pattern: String, dest: String },
    /// Copy a directory's contents recursively
    InstallTree { src: String, dest: String },
}

impl InstallStep {
    fn map_dest(&self, f: impl Fn(&str) -> String) -> Self {
        match self {
            Self::Mkdirp { path } => Self::Mkdirp { path: f(path) },
            Self::Install { pattern, dest } => Self::Install {
                pattern: pattern.clone(),
                dest: f(dest),
            },
            Self::InstallTree { src, dest } => Self::InstallTree {
                src: src.clone(),
                dest: f(dest),
            },
        }
    }

    fn dest(&self) -> &str {
        match self {
            Self::Mkdirp { path } => path,
            Self::Install { dest, .. } | Self::InstallTree { dest, .. } => dest,
        }
    }

    /// Substitute `%(prefix)s` and the layout placeholders
    pub fn render(&self, prefix: &Path) -> Self {
        self.map_dest(|template| substitute(template, prefix))
    }

    /// First placeholder in the destination that rendering does not know
    pub fn unknown_placeholder(&self) -> Option<String> {
        let rendered = substitute(self.dest(), Path::new("/"));
        let start = rendered.find("%(")?;
        let end = rendered[start..]
            .find(")s")
            .map_or(rendered.len(), |e| start + e + 2);
        Some(rendered[start..end].to_string())
    }
}

fn substitute(template: &str, prefix: &Path) -> String {
    let mut result = template.replace("%(prefix)s", &prefix.display().to_string());
    for (name, rel) in PREFIX_LAYOUT {
        result = result.replace(
            &format!("%({})s", name),
            &prefix.join(rel).display().to_string(),
        );
    }
    result
}

impl fmt::Display for InstallStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mkdirp { path } => write!(f, "mkdirp {}", path),
            Self::Install { pattern, dest } => write!(f, "install {} -> {}", pattern, dest),
            Self::InstallTree { src, dest } => write!(f, "install_tree {} -> {}", src, dest),
        }
    }
}

/// Filesystem operations an install plan needs
pub trait InstallPrimitives {
    /// Create `dir` and any missing parents
    fn mkdirp(&mut self, dir: &Path) -> Result<()>;

    /// Copy one file; a directory `dest` receives the file under its own name
    fn install(&mut self, src: &Path, dest: &Path) -> Result<()>;

    /// Copy the contents of `src` into `dest` recursively
    fn install_tree(&mut self, src: &Path, dest: &Path) -> Result<()>;
}

/// Install steps rendered against a concrete prefix
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallPlan {
    pub prefix: PathBuf,
    pub steps: Vec<InstallStep>,
}

impl InstallPlan {
    pub fn new(prefix: &Path, steps: &[InstallStep]) -> Self {
        Self {
            prefix: prefix.to_path_buf(),
            steps: steps.iter().map(|s| s.render(prefix)).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run every step in order against an unpacked source tree
    ///
    /// A glob that matches nothing fails the plan. When a glob matches more
    /// than one file, `dest` is created as a directory first.
    pub fn execute(&self, source_dir: &Path, primitives: &mut dyn InstallPrimitives) -> Result<()> {
        for step in &self.steps {
            debug!("install step: {}", step);
            match step {
                InstallStep::Mkdirp { path } => primitives.mkdirp(Path::new(path))?,
                InstallStep::Install { pattern, dest } => {
                    let sources = expand_glob(source_dir, pattern)?;
                    let dest = Path::new(dest);
                    if sources.len() > 1 {
                        primitives.mkdirp(dest)?;
                    }
                    for src in sources {
                        primitives.install(&src, dest)?;
                    }
                }
                InstallStep::InstallTree { src, dest } => {
                    primitives.install_tree(&source_dir.join(src), Path::new(dest))?
                }
            }
        }
        Ok(())
    }
}

fn expand_glob(source_dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let base = glob::Pattern::escape(&source_dir.to_string_lossy());
    let full = Path::new(&base).join(pattern);
    let full = full.to_string_lossy();
    let paths = glob::glob(&full)
        .map_err(|e| Error::ParseError(format!("invalid install pattern '{}': {}", pattern, e)))?;

    let mut matches = Vec::new();
    for entry in paths {
        let path = entry.map_err(|e| Error::Io(e.into()))?;
        if path.is_file() {
            matches.push(path);
        }
    }
    if matches.is_empty() {
        return Err(Error::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("install pattern '{}' matched no files", pattern),
        )));
    }
    matches.sort();
    Ok(matches)
}

/// Copies files on the local filesystem
#[derive(Debug, Default)]
pub struct FsInstaller {
    copied: usize,
}

impl FsInstaller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of files copied so far
    pub fn copied(&self) -> usize {
        self.copied
    }
}

impl InstallPrimitives for FsInstaller {
    fn mkdirp(&mut self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir)?;
        Ok(())
    }

    fn install(&mut self, src: &Path, dest: &Path) -> Result<()> {
        let target = if dest.is_dir() {
            match src.file_name() {
                Some(name) => dest.join(name),
                None => {
                    return Err(Error::ParseError(format!(
                        "cannot install '{}': no file name",
                        src.display()
                    )));
                }
            }
        } else {
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            dest.to_path_buf()
        };
        fs::copy(src, &target)?;
        self.copied += 1;
        Ok(())
    }

    fn install_tree(&mut self, src: &Path, dest: &Path) -> Result<()> {
        if !src.is_dir() {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("install_tree source '{}' is not a directory", src.display()),
            )));
        }
        fs::create_dir_all(dest)?;
        for entry in WalkDir::new(src).follow_links(true).min_depth(1) {
            let entry = entry.map_err(|e| Error::Io(e.into()))?;
            let Ok(rel) = entry.path().strip_prefix(src) else {
                continue;
            };
            let target = dest.join(rel);
            if entry.file_type().is_dir() {
                fs::create_dir_all(&target)?;
            } else {
                fs::copy(entry.path(), &target)?;
                self.copied += 1;
            }
        }
        Ok(())
    }
}
