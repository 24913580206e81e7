//! Email value object.

use outcome::Outcome;
use serde::{Deserialize, Serialize};

use crate::fault::Fault;

/// A validated email address, stored lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Parses an email address, rejecting anything that is not shaped like
    /// `local@domain.tld`.
    pub fn parse(input: &str) -> Result<Self, Fault> {
        let normalized = Self::validate(input)?;
        Ok(Self(normalized))
    }

    /// Safe form of [`Email::parse`]; identical rules, identical field name.
    pub fn try_parse(input: &str) -> Outcome<Self> {
        Outcome::from_result(Self::parse(input))
    }

    // Both construction paths funnel through here so the rules cannot drift.
    fn validate(input: &str) -> Result<String, Fault> {
        let trimmed = input.trim();
        let invalid = || Fault::InvalidEmail {
            value: input.to_string(),
        };

        if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
            return Err(invalid());
        }

        let mut parts = trimmed.split('@');
        let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(invalid());
        };

        if local.is_empty()
            || domain.is_empty()
            || !domain.contains('.')
            || domain.starts_with('.')
            || domain.ends_with('.')
        {
            return Err(invalid());
        }

        Ok(trimmed.to_ascii_lowercase())
    }

    /// Returns the normalized address.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
