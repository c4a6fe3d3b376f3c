//! Boundary validation for records entering or leaving the system.
//!
//! The serde layer already rejects structurally incoherent records
//! (conflicting outcomes, out-of-enum statuses). This module covers the
//! rules the shapes themselves cannot express: mandatory fields must be
//! non-blank, timestamps must parse, the endpoint URL must be absolute.

use chrono::DateTime;

use crate::types::{Brief, DeliveryState, Env, Processed};

/// A record failed a boundary validation rule.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A mandatory field was empty or blank.
    #[error("field `{0}` must not be empty")]
    EmptyField(&'static str),
    /// A timestamp field did not parse as RFC 3339.
    #[error("field `{field}` is not a valid RFC 3339 timestamp: {value:?}")]
    BadTimestamp {
        /// Offending field name.
        field: &'static str,
        /// The rejected value.
        value: String,
    },
    /// The endpoint URL did not parse as an absolute URL.
    #[error("endpoint url is not a valid absolute URL: {0:?}")]
    BadUrl(String),
}

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(())
}

fn require_timestamp(field: &'static str, value: &str) -> Result<(), ValidationError> {
    DateTime::parse_from_rfc3339(value).map_err(|_| ValidationError::BadTimestamp {
        field,
        value: value.to_string(),
    })?;
    Ok(())
}

impl Env {
    /// Check that the credential bundle is fully populated and addressable.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule: every field non-blank, `url` an
    /// absolute URL.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("api_key", &self.api_key)?;
        require("identifier", &self.identifier)?;
        require("url", &self.url)?;
        url::Url::parse(&self.url).map_err(|_| ValidationError::BadUrl(self.url.clone()))?;
        Ok(())
    }
}

impl Brief {
    /// Check a brief against the submission rules.
    ///
    /// `text` and the recipient line must be non-blank; lines 2–5 may be
    /// empty. `created` must parse as RFC 3339. A terminal outcome must
    /// carry a non-blank hash or error.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("text", &self.text)?;
        require("addressline1", &self.address.line1)?;
        require_timestamp("created", &self.created)?;
        match &self.state {
            DeliveryState::Succeeded { hash } => require("hash", hash)?,
            DeliveryState::Failed { error } => require("error", error)?,
            DeliveryState::Created | DeliveryState::Sending => {}
        }
        Ok(())
    }
}

impl Processed {
    /// Check an outcome record against the reporting rules.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule: non-blank hash, RFC 3339
    /// `processed_at`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("hash", &self.hash)?;
        require_timestamp("processedAt", &self.processed_at)?;
        Ok(())
    }
}
