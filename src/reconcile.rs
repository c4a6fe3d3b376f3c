//! Reconciliation of briefs against their processed outcome records.
//!
//! The association is hash equality and nothing else — no record holds a
//! reference to another. Reconciliation sorts a batch of briefs and a
//! batch of `Processed` records into buckets: confirmed deliveries,
//! deliberately ignored items, succeeded briefs the reporter never
//! confirmed, and outcome records with no matching brief.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::types::{Brief, DeliveryState, Processed, ProcessedStatus};

/// Result of reconciling one batch of briefs against one batch of
/// outcome records.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    /// Hashes confirmed delivered (`status = success`).
    pub confirmed: Vec<String>,
    /// Hashes the endpoint deliberately skipped (`status = ignored`).
    pub ignored: Vec<String>,
    /// Hashes matched by an outcome record that carries no status.
    pub unlabeled: Vec<String>,
    /// Succeeded briefs with no matching outcome record.
    pub unconfirmed: Vec<String>,
    /// Outcome records whose hash matches no succeeded brief.
    pub unmatched: Vec<String>,
    /// Briefs still in the `Created` state.
    pub pending: usize,
    /// Briefs with a send outstanding.
    pub in_flight: usize,
    /// Briefs whose delivery failed.
    pub failed: usize,
}

impl ReconcileReport {
    /// True when every succeeded brief was confirmed and every outcome
    /// record matched a brief.
    pub fn is_settled(&self) -> bool {
        self.unconfirmed.is_empty() && self.unmatched.is_empty()
    }
}

/// Match succeeded briefs to outcome records by hash.
///
/// Duplicate outcome records for the same hash are collapsed to the first
/// one seen; later duplicates are logged and dropped.
pub fn reconcile(briefs: &[Brief], processed: &[Processed]) -> ReconcileReport {
    let mut outcomes: HashMap<&str, &Processed> = HashMap::new();
    for record in processed {
        if let Some(previous) = outcomes.insert(record.hash.as_str(), record) {
            warn!(
                hash = %record.hash,
                first_seen = %previous.processed_at,
                "duplicate outcome record for hash, keeping the first"
            );
            outcomes.insert(record.hash.as_str(), previous);
        }
    }

    let mut report = ReconcileReport::default();
    for brief in briefs {
        match &brief.state {
            DeliveryState::Created => report.pending = report.pending.saturating_add(1),
            DeliveryState::Sending => report.in_flight = report.in_flight.saturating_add(1),
            DeliveryState::Failed { .. } => report.failed = report.failed.saturating_add(1),
            DeliveryState::Succeeded { hash } => match outcomes.remove(hash.as_str()) {
                Some(record) => match record.status {
                    Some(ProcessedStatus::Success) => report.confirmed.push(hash.clone()),
                    Some(ProcessedStatus::Ignored) => report.ignored.push(hash.clone()),
                    None => report.unlabeled.push(hash.clone()),
                },
                None => {
                    warn!(hash = %hash, "succeeded brief has no outcome record");
                    report.unconfirmed.push(hash.clone());
                }
            },
        }
    }

    // Whatever is left matched no succeeded brief.
    let mut leftover: Vec<String> = outcomes.keys().map(|h| (*h).to_string()).collect();
    leftover.sort();
    for hash in &leftover {
        warn!(hash = %hash, "outcome record matches no succeeded brief");
    }
    report.unmatched = leftover;

    debug!(
        confirmed = report.confirmed.len(),
        ignored = report.ignored.len(),
        unconfirmed = report.unconfirmed.len(),
        unmatched = report.unmatched.len(),
        "reconciliation complete"
    );
    report
}
