//! Institutional email addresses.

use std::fmt;

use regex::Regex;

use super::ValidationError;

/// Institution whose addresses are accepted when nothing else is configured.
pub const DEFAULT_INSTITUTION_DOMAIN: &str = "valenciacollege.edu";

/// Accepts `local@<domain>` and `local@mail.<domain>`.
#[derive(Clone, Debug)]
pub struct EmailPolicy {
    domain: String,
    pattern: Regex,
}

impl EmailPolicy {
    pub fn new(domain: &str) -> Result<Self, ValidationError> {
        let domain = domain.trim().to_lowercase();
        if domain.is_empty() || domain.contains('@') || domain.chars().any(char::is_whitespace) {
            return Err(ValidationError::InvalidDomain(domain));
        }
        let pattern = Regex::new(&format!(
            r"^[A-Za-z0-9._%+-]+@(?:mail\.)?{}$",
            regex::escape(&domain)
        ))
        .map_err(|e| ValidationError::InvalidDomain(e.to_string()))?;
        Ok(Self { domain, pattern })
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Validate and normalize (trim + lowercase) an address.
    pub fn validate(&self, raw: &str) -> Result<InstitutionalEmail, ValidationError> {
        let email = normalize_email(raw);
        if email.is_empty() {
            return Err(ValidationError::MissingField("email"));
        }
        if !self.pattern.is_match(&email) {
            return Err(ValidationError::InvalidEmail {
                email,
                domain: self.domain.clone(),
            });
        }
        Ok(InstitutionalEmail(email))
    }
}

impl Default for EmailPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_INSTITUTION_DOMAIN).expect("default institution domain is valid")
    }
}

/// Canonical form used for every email comparison.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// An address that passed an [`EmailPolicy`]. Only these reach the store.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct InstitutionalEmail(String);

impl InstitutionalEmail {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for InstitutionalEmail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for InstitutionalEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
