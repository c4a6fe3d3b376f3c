//! Briefpost — data contract and boundary tooling for mail-merge brief
//! delivery.
//!
//! The contract sits between an unseen submission layer and an unseen
//! delivery/reporting layer: briefs go out with five address lines and a
//! creation timestamp, outcome records come back keyed by content hash.
//! This crate defines the record shapes, validates them at the boundary,
//! fingerprints content, and reconciles briefs against their outcomes.
//!
//! What happens in between — how briefs are actually sent, retried, or
//! scheduled — is the surrounding system's business, not this crate's.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod fingerprint;
pub mod logging;
pub mod reconcile;
pub mod types;
pub mod validate;
