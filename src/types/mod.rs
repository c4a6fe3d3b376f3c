//! Core data contract: briefs, delivery outcomes, and the endpoint
//! credential bundle.
//!
//! The wire shape is fixed by the external submission and reporting layers:
//! a flat brief record with five `addresslineN` fields and three optional
//! annotations (`hash`, `error`, `isSending`). Internally the annotations
//! are modeled as a single [`DeliveryState`] so the contradictory
//! hash-plus-error combination cannot be constructed; wire records carrying
//! it are rejected during deserialization.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Credential and addressing bundle for the external delivery endpoint.
///
/// All three fields are mandatory and only meaningful together; a partially
/// populated `Env` is useless to every consumer. Loaded from configuration
/// by [`crate::config::BriefpostConfig`].
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Env {
    /// Secret credential for the endpoint.
    pub api_key: String,
    /// Caller/account identifier.
    pub identifier: String,
    /// Endpoint address.
    pub url: String,
}

impl std::fmt::Debug for Env {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Env")
            .field("api_key", &"__REDACTED__")
            .field("identifier", &self.identifier)
            .field("url", &self.url)
            .finish()
    }
}

/// The five ordered address lines of a brief.
///
/// All five are always present on the wire, even when empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressLines {
    /// First line — the recipient.
    pub line1: String,
    /// Second line.
    pub line2: String,
    /// Third line.
    pub line3: String,
    /// Fourth line.
    pub line4: String,
    /// Fifth line.
    pub line5: String,
}

impl AddressLines {
    /// Build from five owned lines, top to bottom.
    pub fn new(
        line1: impl Into<String>,
        line2: impl Into<String>,
        line3: impl Into<String>,
        line4: impl Into<String>,
        line5: impl Into<String>,
    ) -> Self {
        Self {
            line1: line1.into(),
            line2: line2.into(),
            line3: line3.into(),
            line4: line4.into(),
            line5: line5.into(),
        }
    }

    /// The lines in order.
    pub fn lines(&self) -> [&str; 5] {
        [
            &self.line1,
            &self.line2,
            &self.line3,
            &self.line4,
            &self.line5,
        ]
    }
}

/// Delivery state of a brief.
///
/// Replaces the wire format's three independent optional fields with a
/// tagged union: a brief is pending, in flight, or terminal with exactly
/// one of a content hash or an error description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryState {
    /// Constructed, not yet handed to the sender.
    Created,
    /// A send is outstanding (`isSending = true` on the wire).
    Sending,
    /// Delivered; carries the content fingerprint.
    Succeeded {
        /// Content fingerprint reported by the sender.
        hash: String,
    },
    /// Delivery failed; carries the sender's failure description.
    Failed {
        /// Free-text failure description.
        error: String,
    },
}

/// A wire brief violated the contract during deserialization.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ContractError {
    /// Both `hash` and `error` were set — an incoherent outcome.
    #[error("brief carries both a hash and an error")]
    ConflictingOutcome,
    /// `isSending` was true on a brief that already has a terminal outcome.
    #[error("brief marked as sending but already carries a terminal outcome")]
    SendingAfterOutcome,
}

/// An illegal lifecycle transition was requested on a brief.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    /// The brief already reached a terminal state.
    #[error("brief is already terminal, cannot {attempted}")]
    AlreadyTerminal {
        /// The transition that was attempted.
        attempted: &'static str,
    },
    /// `begin_send` on a brief that is already in flight.
    #[error("a send is already outstanding for this brief")]
    AlreadySending,
}

/// One unit of content to be delivered, with routing metadata and its
/// current delivery state.
///
/// Serializes to and from the external flat record shape; see the module
/// docs. `created` is kept textual because the surrounding system defines
/// its format — validation code parses it as RFC 3339.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BriefWire", into = "BriefWire")]
pub struct Brief {
    /// The content body.
    pub text: String,
    /// Five ordered address lines.
    pub address: AddressLines,
    /// Creation timestamp, as given by the producer.
    pub created: String,
    /// Current delivery state.
    pub state: DeliveryState,
}

impl Brief {
    /// Construct a fresh brief in the `Created` state.
    pub fn new(text: impl Into<String>, address: AddressLines, created: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            address,
            created: created.into(),
            state: DeliveryState::Created,
        }
    }

    /// Construct a fresh brief stamped with the current time (RFC 3339).
    pub fn created_now(text: impl Into<String>, address: AddressLines) -> Self {
        Self::new(text, address, Utc::now().to_rfc3339())
    }

    /// Mark a send as outstanding.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError`] if the brief is already in flight or
    /// already terminal.
    pub fn begin_send(&mut self) -> Result<(), TransitionError> {
        match self.state {
            DeliveryState::Created => {
                self.state = DeliveryState::Sending;
                Ok(())
            }
            DeliveryState::Sending => Err(TransitionError::AlreadySending),
            DeliveryState::Succeeded { .. } | DeliveryState::Failed { .. } => {
                Err(TransitionError::AlreadyTerminal {
                    attempted: "begin a send",
                })
            }
        }
    }

    /// Record successful delivery with the content fingerprint.
    ///
    /// Valid from `Created` or `Sending` — the contract allows completion
    /// without the in-flight flag ever having been set.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::AlreadyTerminal`] if an outcome was
    /// already recorded.
    pub fn succeed(&mut self, hash: impl Into<String>) -> Result<(), TransitionError> {
        match self.state {
            DeliveryState::Created | DeliveryState::Sending => {
                self.state = DeliveryState::Succeeded { hash: hash.into() };
                Ok(())
            }
            _ => Err(TransitionError::AlreadyTerminal {
                attempted: "record a success",
            }),
        }
    }

    /// Record failed delivery with the sender's error description.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::AlreadyTerminal`] if an outcome was
    /// already recorded.
    pub fn fail(&mut self, error: impl Into<String>) -> Result<(), TransitionError> {
        match self.state {
            DeliveryState::Created | DeliveryState::Sending => {
                self.state = DeliveryState::Failed {
                    error: error.into(),
                };
                Ok(())
            }
            _ => Err(TransitionError::AlreadyTerminal {
                attempted: "record a failure",
            }),
        }
    }

    /// Content fingerprint, if delivery succeeded.
    pub fn hash(&self) -> Option<&str> {
        match &self.state {
            DeliveryState::Succeeded { hash } => Some(hash),
            _ => None,
        }
    }

    /// Failure description, if delivery failed.
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            DeliveryState::Failed { error } => Some(error),
            _ => None,
        }
    }

    /// True while a send is outstanding.
    pub fn is_sending(&self) -> bool {
        self.state == DeliveryState::Sending
    }

    /// True once an outcome (success or failure) has been recorded.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.state,
            DeliveryState::Succeeded { .. } | DeliveryState::Failed { .. }
        )
    }
}

/// Flat wire representation of a brief, matching the external record shape.
#[derive(Serialize, Deserialize)]
struct BriefWire {
    text: String,
    addressline1: String,
    addressline2: String,
    addressline3: String,
    addressline4: String,
    addressline5: String,
    created: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(
        rename = "isSending",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    is_sending: Option<bool>,
}

impl TryFrom<BriefWire> for Brief {
    type Error = ContractError;

    fn try_from(wire: BriefWire) -> Result<Self, ContractError> {
        let sending = wire.is_sending.unwrap_or(false);
        let state = match (wire.hash, wire.error) {
            (Some(_), Some(_)) => return Err(ContractError::ConflictingOutcome),
            (Some(hash), None) => {
                if sending {
                    return Err(ContractError::SendingAfterOutcome);
                }
                DeliveryState::Succeeded { hash }
            }
            (None, Some(error)) => {
                if sending {
                    return Err(ContractError::SendingAfterOutcome);
                }
                DeliveryState::Failed { error }
            }
            (None, None) if sending => DeliveryState::Sending,
            (None, None) => DeliveryState::Created,
        };
        Ok(Self {
            text: wire.text,
            address: AddressLines {
                line1: wire.addressline1,
                line2: wire.addressline2,
                line3: wire.addressline3,
                line4: wire.addressline4,
                line5: wire.addressline5,
            },
            created: wire.created,
            state,
        })
    }
}

impl From<Brief> for BriefWire {
    fn from(brief: Brief) -> Self {
        let (hash, error, is_sending) = match brief.state {
            DeliveryState::Created => (None, None, None),
            DeliveryState::Sending => (None, None, Some(true)),
            DeliveryState::Succeeded { hash } => (Some(hash), None, None),
            DeliveryState::Failed { error } => (None, Some(error), None),
        };
        Self {
            text: brief.text,
            addressline1: brief.address.line1,
            addressline2: brief.address.line2,
            addressline3: brief.address.line3,
            addressline4: brief.address.line4,
            addressline5: brief.address.line5,
            created: brief.created,
            hash,
            error,
            is_sending,
        }
    }
}

/// Recognized terminal outcomes of processing.
///
/// Closed enumeration — any other wire string fails deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessedStatus {
    /// The item was delivered.
    Success,
    /// The item was recognized and deliberately skipped.
    Ignored,
}

/// Terminal outcome record for one processed brief.
///
/// Correlated to its originating [`Brief`] by hash equality only — no
/// entity holds a reference to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Processed {
    /// Timestamp of processing completion, as given by the reporter.
    pub processed_at: String,
    /// Fingerprint of the processed content. Mandatory, unlike the
    /// in-flight annotation on a brief.
    pub hash: String,
    /// Terminal status, when the reporter supplied one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProcessedStatus>,
}

impl Processed {
    /// Build an outcome record for a brief whose delivery succeeded,
    /// stamped with the current time (RFC 3339).
    ///
    /// Returns `None` for briefs without a hash — only succeeded briefs
    /// produce outcome records.
    pub fn for_brief(brief: &Brief, status: ProcessedStatus) -> Option<Self> {
        brief.hash().map(|hash| Self {
            processed_at: Utc::now().to_rfc3339(),
            hash: hash.to_string(),
            status: Some(status),
        })
    }
}
