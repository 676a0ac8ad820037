//! Normalized instrument symbols.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PaperTradeError;

/// Case-insensitive ticker symbol, stored trimmed and upper-cased.
///
/// Construction is the only validation point: a `Symbol` is never empty and
/// never contains whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// Normalize and validate a raw symbol.
    ///
    /// # Errors
    /// Returns `InvalidSymbol` when the input is blank or contains interior whitespace.
    pub fn parse(raw: &str) -> Result<Self, PaperTradeError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
            return Err(PaperTradeError::invalid_symbol(raw));
        }
        Ok(Self(trimmed.to_uppercase()))
    }

    /// Borrow the normalized symbol text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Symbol {
    type Err = PaperTradeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Symbol {
    type Error = PaperTradeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Symbol> for String {
    fn from(s: Symbol) -> Self {
        s.0
    }
}
