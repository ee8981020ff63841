//! Extraction engine
//!
//! Patterns are resolved and compiled once, at configuration time. A compiled
//! [`Extractor`] is immutable and shared by every fetch task.

pub mod patterns;

use crate::ConfigError;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

/// A pattern specifier as given by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    /// The built-in phone number expression
    Phone,

    /// The built-in email expression
    Email,

    /// Any other expression
    Custom(String),
}

impl Pattern {
    /// Returns the regular expression source for this pattern
    pub fn expression(&self) -> &str {
        match self {
            Self::Phone => patterns::PHONE,
            Self::Email => patterns::EMAIL,
            Self::Custom(expr) => expr,
        }
    }
}

impl From<&str> for Pattern {
    fn from(s: &str) -> Self {
        match s {
            "phone" => Self::Phone,
            "email" => Self::Email,
            other => Self::Custom(other.to_string()),
        }
    }
}

impl FromStr for Pattern {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Phone => f.write_str("phone"),
            Self::Email => f.write_str("email"),
            Self::Custom(expr) => f.write_str(expr),
        }
    }
}

/// A compiled set of patterns
#[derive(Debug, Clone)]
pub struct Extractor {
    regex: Regex,
}

impl Extractor {
    /// Compiles one or more patterns into a single extractor
    ///
    /// Each pattern is compiled on its own first so that an invalid custom expression is
    /// reported by name. The patterns are then joined into one alternation; at any
    /// position the earliest listed pattern that matches wins.
    ///
    /// # Returns
    ///
    /// * `Ok(Extractor)` - All patterns compiled
    /// * `Err(ConfigError::InvalidPattern)` - A pattern failed to compile
    /// * `Err(ConfigError::Validation)` - No patterns were given
    pub fn new(patterns: &[Pattern]) -> Result<Self, ConfigError> {
        if patterns.is_empty() {
            return Err(ConfigError::Validation(
                "at least one pattern is required".to_string(),
            ));
        }

        for pattern in patterns {
            Regex::new(pattern.expression()).map_err(|e| ConfigError::InvalidPattern {
                pattern: pattern.to_string(),
                message: e.to_string(),
            })?;
        }

        let combined = patterns
            .iter()
            .map(|p| format!("(?:{})", p.expression()))
            .collect::<Vec<_>>()
            .join("|");

        let regex = Regex::new(&combined).map_err(|e| ConfigError::InvalidPattern {
            pattern: combined.clone(),
            message: e.to_string(),
        })?;

        Ok(Self { regex })
    }

    /// Returns every non-overlapping match in `content`, left to right, duplicates kept
    ///
    /// # Example
    ///
    /// ```
    /// use maxtract::extract::{Extractor, Pattern};
    ///
    /// let extractor = Extractor::new(&[Pattern::Phone]).unwrap();
    /// assert_eq!(extractor.extract("call 555-123-4567"), vec!["555-123-4567"]);
    /// ```
    pub fn extract(&self, content: &str) -> Vec<String> {
        self.regex
            .find_iter(content)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// The combined expression this extractor runs
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}
