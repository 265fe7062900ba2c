// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Java language level for version-aware parsing.
//!
//! [`LanguageLevel`] and [`ParseOptions`] are threaded through the parser.
//! Unlike the permissive default, a specific level makes the parser reject
//! constructs introduced by a later feature release with
//! [`ParserError::FeatureNotAvailable`](crate::ParserError::FeatureNotAvailable).

use std::str::FromStr;

/// Target Java language level.
///
/// # Example
///
/// ```
/// use jtree_syntax::{parse_compilation_unit_with_options, LanguageLevel, ParseOptions};
///
/// // Records need Java 16 or later.
/// let options = ParseOptions::new(LanguageLevel::JDK_11);
/// assert!(parse_compilation_unit_with_options("record P(int x) {}", options).is_err());
///
/// let options = ParseOptions::new(LanguageLevel::JDK_17);
/// assert!(parse_compilation_unit_with_options("record P(int x) {}", options).is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LanguageLevel {
    /// Accept everything the grammar handles.
    Permissive,

    /// A specific JDK feature release (8, 11, 17, 21, ...).
    Jdk {
        /// Feature release number.
        feature: u8,
    },
}

impl LanguageLevel {
    /// Java 8 - lambdas and method references.
    pub const JDK_8: Self = Self::Jdk { feature: 8 };

    /// Java 11 - `var` for locals and lambda parameters.
    pub const JDK_11: Self = Self::Jdk { feature: 11 };

    /// Java 17 - switch expressions, text blocks, records, sealed types,
    /// instanceof patterns.
    pub const JDK_17: Self = Self::Jdk { feature: 17 };

    /// Java 21 - switch patterns, record patterns.
    pub const JDK_21: Self = Self::Jdk { feature: 21 };

    /// Java 22 - unnamed patterns and variables.
    pub const JDK_22: Self = Self::Jdk { feature: 22 };

    fn at_least(self, feature: u8) -> bool {
        match self {
            Self::Permissive => true,
            Self::Jdk { feature: level } => level >= feature,
        }
    }

    /// Local variable type inference (`var`), Java 10.
    #[must_use]
    pub fn has_var(self) -> bool {
        self.at_least(10)
    }

    /// Switch expressions, arrow labels and `yield`, Java 14.
    #[must_use]
    pub fn has_switch_expressions(self) -> bool {
        self.at_least(14)
    }

    /// Text blocks, Java 15.
    #[must_use]
    pub fn has_text_blocks(self) -> bool {
        self.at_least(15)
    }

    /// Record classes, Java 16.
    #[must_use]
    pub fn has_records(self) -> bool {
        self.at_least(16)
    }

    /// Pattern matching for `instanceof`, Java 16.
    #[must_use]
    pub fn has_instanceof_patterns(self) -> bool {
        self.at_least(16)
    }

    /// Sealed classes and `permits`, Java 17.
    #[must_use]
    pub fn has_sealed_classes(self) -> bool {
        self.at_least(17)
    }

    /// Patterns, guards and `case null` in switch labels, Java 21.
    #[must_use]
    pub fn has_switch_patterns(self) -> bool {
        self.at_least(21)
    }

    /// Record (deconstruction) patterns, Java 21.
    #[must_use]
    pub fn has_record_patterns(self) -> bool {
        self.at_least(21)
    }

    /// Record patterns in enhanced `for` headers. This was a Java 20
    /// preview feature and was dropped again in Java 21.
    #[must_use]
    pub fn has_foreach_record_patterns(self) -> bool {
        match self {
            Self::Permissive => true,
            Self::Jdk { feature } => feature == 20,
        }
    }

    /// Unnamed patterns and variables (`_`), Java 22.
    #[must_use]
    pub fn has_unnamed_patterns(self) -> bool {
        self.at_least(22)
    }

    #[must_use]
    pub fn is_permissive(self) -> bool {
        matches!(self, Self::Permissive)
    }

    /// The feature release number, or `None` for permissive mode.
    #[must_use]
    pub fn feature(self) -> Option<u8> {
        match self {
            Self::Permissive => None,
            Self::Jdk { feature } => Some(feature),
        }
    }
}

impl Default for LanguageLevel {
    fn default() -> Self {
        Self::Permissive
    }
}

impl std::fmt::Display for LanguageLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Permissive => write!(f, "permissive"),
            Self::Jdk { feature } => write!(f, "{}", feature),
        }
    }
}

impl FromStr for LanguageLevel {
    type Err = String;

    /// Accepts `permissive`, `17`, `jdk17` or `1.8`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        if s == "permissive" {
            return Ok(Self::Permissive);
        }
        let digits = s
            .strip_prefix("jdk")
            .or_else(|| s.strip_prefix("1."))
            .unwrap_or(&s);
        match digits.parse::<u8>() {
            Ok(feature) if feature >= 8 => Ok(Self::Jdk { feature }),
            _ => Err(format!("unknown language level '{}'", s)),
        }
    }
}

/// Configuration options for parsing Java source code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParseOptions {
    /// Target language level.
    pub level: LanguageLevel,
}

impl ParseOptions {
    #[must_use]
    pub fn new(level: LanguageLevel) -> Self {
        Self { level }
    }
}
