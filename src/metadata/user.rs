use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use super::MetadataError;

const EMAIL_PATTERN: &str = r"^[^@]+@[^@]+\.[^@]+";

static EMAIL_REGEX: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();

/// Operator identity attached to every calibration record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    /// Given name
    #[serde(rename = "First Name")]
    pub first_name: String,

    /// Family name
    #[serde(rename = "Last Name")]
    pub last_name: String,

    /// Contact address
    #[serde(rename = "Email")]
    pub email: String,

    /// Institute or company
    #[serde(rename = "Affiliation")]
    pub affiliation: String,
}

impl UserInfo {
    /// Create user info from its four fields
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        affiliation: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            affiliation: affiliation.into(),
        }
    }

    /// Check that every field is filled in and the email looks like one
    pub fn validate(&self) -> Result<(), MetadataError> {
        let mut problems = Vec::new();

        let missing: Vec<&str> = [
            ("First Name", &self.first_name),
            ("Last Name", &self.last_name),
            ("Email", &self.email),
            ("Affiliation", &self.affiliation),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(label, _)| label)
        .collect();
        if !missing.is_empty() {
            problems.push(format!(
                "Missing user information for the following fields: {}",
                missing.join(", ")
            ));
        }

        if !self.email.trim().is_empty() && !is_valid_email(&self.email)? {
            problems.push(format!("Invalid email format: '{}'", self.email));
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(MetadataError::Validation(problems))
        }
    }
}

/// Loose email shape check: something, `@`, something, `.`, something
pub fn is_valid_email(email: &str) -> Result<bool, MetadataError> {
    Ok(email_regex()?.is_match(email))
}

/// The email pattern, compiled on first use
pub(super) fn email_regex() -> Result<&'static Regex, MetadataError> {
    EMAIL_REGEX
        .get_or_init(|| Regex::new(EMAIL_PATTERN))
        .as_ref()
        .map_err(|e| MetadataError::Pattern(e.clone()))
}
