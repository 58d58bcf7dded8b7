// src/recipe/syntax.rs

//! Tokenizer for the compact spec syntax used in recipes and on the command line
//!
//! ```text
//! dakota@6.13+mpi~hdf5 build_type=Release
//! ^name  ^version ^on ^off ^choice
//! ```
//!
//! Terms may be glued together (`+mpi@6.8:`) or separated by whitespace.

use crate::error::{Error, Result};
use crate::version::VersionConstraint;

/// One term of a spec string
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Term {
    /// `@range`
    Version(VersionConstraint),
    /// `+name`
    Enabled(String),
    /// `~name`
    Disabled(String),
    /// `name=value`
    Equals(String, String),
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.'
}

fn check_name(name: &str, input: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::ParseError(format!("Missing name in '{}'", input)));
    }
    if let Some(bad) = name.chars().find(|c| !is_name_char(*c)) {
        return Err(Error::ParseError(format!(
            "Invalid character '{}' in '{}'",
            bad, input
        )));
    }
    Ok(())
}

/// Split off a leading package name: `python@3:` → (`python`, `@3:`)
pub(crate) fn split_name(input: &str) -> Result<(&str, &str)> {
    let s = input.trim();
    let end = s.find(['@', '+', '~', ' ', '\t']).unwrap_or(s.len());
    let name = &s[..end];
    check_name(name, input)?;
    Ok((name, &s[end..]))
}

/// Parse a sequence of terms
pub(crate) fn parse_terms(input: &str) -> Result<Vec<Term>> {
    let mut terms = Vec::new();
    let mut rest = input.trim();

    while !rest.is_empty() {
        let sigil = rest.chars().next().unwrap_or(' ');
        match sigil {
            '@' | '+' | '~' => {
                let body = &rest[1..];
                // `~` and `+` end a version; `@` ends a variant name
                let end = if sigil == '@' {
                    body.find(['+', '~', '@', ' ', '\t']).unwrap_or(body.len())
                } else {
                    body.find(['+', '~', '@', ' ', '\t', '=']).unwrap_or(body.len())
                };
                let word = &body[..end];
                rest = &body[end..];

                match sigil {
                    '@' => {
                        if word.is_empty() {
                            return Err(Error::ParseError(format!(
                                "Missing version after '@' in '{}'",
                                input
                            )));
                        }
                        terms.push(Term::Version(VersionConstraint::parse(word)?));
                    }
                    '+' => {
                        check_name(word, input)?;
                        terms.push(Term::Enabled(word.to_string()));
                    }
                    _ => {
                        check_name(word, input)?;
                        terms.push(Term::Disabled(word.to_string()));
                    }
                }
            }
            c if c.is_whitespace() => {
                rest = rest.trim_start();
            }
            _ => {
                let end = rest.find([' ', '\t']).unwrap_or(rest.len());
                let word = &rest[..end];
                rest = &rest[end..];

                let Some((name, value)) = word.split_once('=') else {
                    return Err(Error::ParseError(format!(
                        "Unexpected '{}' in '{}' (expected @version, +variant, ~variant or name=value)",
                        word, input
                    )));
                };
                check_name(name, input)?;
                if value.is_empty() {
                    return Err(Error::ParseError(format!(
                        "Missing value for '{}' in '{}'",
                        name, input
                    )));
                }
                terms.push(Term::Equals(name.to_string(), value.to_string()));
            }
        }
    }

    Ok(terms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_glued_terms() {
        let terms = parse_terms("+mpi~hdf5@6.8:").unwrap();
        assert_eq!(
            terms,
            vec![
                Term::Enabled("mpi".to_string()),
                Term::Disabled("hdf5".to_string()),
                Term::Version(VersionConstraint::parse("6.8:").unwrap()),
            ]
        );
    }

    #[test]
    fn test_parse_spaced_terms() {
        let terms = parse_terms(" +shared  build_type=Release ").unwrap();
        assert_eq!(terms.len(), 2);
        assert_eq!(
            terms[1],
            Term::Equals("build_type".to_string(), "Release".to_string())
        );
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse_terms("").unwrap().is_empty());
        assert!(parse_terms("   ").unwrap().is_empty());
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_terms("+").is_err());
        assert!(parse_terms("@").is_err());
        assert!(parse_terms("mpi").is_err());
        assert!(parse_terms("build_type=").is_err());
        assert!(parse_terms("+m$i").is_err());
    }

    #[test]
    fn test_split_name() {
        assert_eq!(split_name("python@3:").unwrap(), ("python", "@3:"));
        assert_eq!(split_name("netlib-lapack").unwrap(), ("netlib-lapack", ""));
        assert_eq!(split_name("hdf5+mpi").unwrap(), ("hdf5", "+mpi"));
        assert!(split_name("@6.3").is_err());
    }
}
