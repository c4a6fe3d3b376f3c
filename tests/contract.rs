#![allow(missing_docs)]
// Integration tests for the brief delivery contract.
//
// Exercises the full boundary flow: wire records in, lifecycle
// transitions, validation, fingerprinting, and reconciliation of a batch
// against its outcome records.

use briefpost::fingerprint::fingerprint;
use briefpost::reconcile::reconcile;
use briefpost::types::{AddressLines, Brief, DeliveryState, Processed, ProcessedStatus};

// ── Test fixtures ──

const WIRE_BRIEF: &str = r#"{
    "text": "Invoice #1",
    "addressline1": "Ada Lovelace",
    "addressline2": "12 Analytical Row",
    "addressline3": "",
    "addressline4": "London",
    "addressline5": "UK",
    "created": "2024-01-01T00:00:00Z"
}"#;

fn address() -> AddressLines {
    AddressLines::new("Ada Lovelace", "12 Analytical Row", "", "London", "UK")
}

#[test]
fn wire_brief_roundtrips_through_every_state() {
    let mut brief: Brief = serde_json::from_str(WIRE_BRIEF).expect("parse wire brief");
    assert_eq!(brief.state, DeliveryState::Created);
    assert_eq!(brief.address, address());

    for _ in 0..2 {
        let json = serde_json::to_string(&brief).expect("serialize");
        let back: Brief = serde_json::from_str(&json).expect("reparse");
        assert_eq!(back, brief);
        brief.begin_send().ok();
    }

    brief.succeed(fingerprint(&brief)).expect("succeed");
    let json = serde_json::to_string(&brief).expect("serialize terminal");
    let back: Brief = serde_json::from_str(&json).expect("reparse terminal");
    assert_eq!(back.hash(), brief.hash());
    assert!(!json.contains("isSending"));
}

#[test]
fn failed_brief_roundtrips_with_error_only() {
    let mut brief: Brief = serde_json::from_str(WIRE_BRIEF).expect("parse");
    brief.begin_send().expect("send");
    brief.fail("timeout").expect("fail");

    let json = serde_json::to_string(&brief).expect("serialize");
    assert!(json.contains(r#""error":"timeout""#));
    assert!(!json.contains("hash"));

    let back: Brief = serde_json::from_str(&json).expect("reparse");
    assert_eq!(back.error(), Some("timeout"));
    assert!(back.validate().is_ok());
}

#[test]
fn conflicting_wire_records_never_reach_validation() {
    // A record with both outcomes is rejected while still a wire shape.
    let raw = r#"{
        "text": "Invoice #1",
        "addressline1": "Ada", "addressline2": "", "addressline3": "",
        "addressline4": "", "addressline5": "",
        "created": "2024-01-01T00:00:00Z",
        "hash": "abc123", "error": "timeout"
    }"#;
    assert!(serde_json::from_str::<Brief>(raw).is_err());
}

#[test]
fn processed_enumeration_is_closed_on_the_wire() {
    let parsed: Processed = serde_json::from_str(
        r#"{"processedAt": "2024-01-01T00:05:00Z", "hash": "abc123", "status": "ignored"}"#,
    )
    .expect("parse");
    assert_eq!(parsed.status, Some(ProcessedStatus::Ignored));

    serde_json::from_str::<Processed>(
        r#"{"processedAt": "2024-01-01T00:05:00Z", "hash": "abc123", "status": "pending"}"#,
    )
    .expect_err("reject out-of-enum status");
}

#[test]
fn batch_reconciles_end_to_end() {
    // Three briefs go out; the reporter confirms one, ignores one, and
    // never mentions the third.
    let mut batch: Vec<Brief> = (1..=3)
        .map(|n| Brief::new(format!("Invoice #{n}"), address(), "2024-01-01T00:00:00Z"))
        .collect();
    for brief in &mut batch {
        brief.begin_send().expect("send");
        let digest = fingerprint(brief);
        brief.succeed(digest).expect("succeed");
        assert!(brief.validate().is_ok());
    }

    let confirmed = Processed::for_brief(&batch[0], ProcessedStatus::Success).expect("record");
    let ignored = Processed::for_brief(&batch[1], ProcessedStatus::Ignored).expect("record");
    assert!(confirmed.validate().is_ok());

    let report = reconcile(&batch, &[confirmed.clone(), ignored]);
    assert_eq!(report.confirmed, vec![confirmed.hash.clone()]);
    assert_eq!(report.ignored.len(), 1);
    assert_eq!(report.unconfirmed, vec![batch[2].hash().expect("hash")]);
    assert!(!report.is_settled());

    // The report serializes for the CLI.
    let json = serde_json::to_string(&report).expect("serialize report");
    assert!(json.contains(&confirmed.hash));
}

#[test]
fn identical_content_correlates_across_resubmission() {
    // Hash equality is the only association the contract offers, so a
    // re-submitted brief with identical content maps onto the same
    // outcome record.
    let mut first = Brief::new("Reminder", address(), "2024-01-01T00:00:00Z");
    let mut second = Brief::new("Reminder", address(), "2024-02-01T00:00:00Z");
    let digest = fingerprint(&first);
    first.succeed(digest.clone()).expect("succeed");
    second.succeed(fingerprint(&second)).expect("succeed");

    let outcome = Processed {
        processed_at: "2024-02-01T00:05:00Z".to_string(),
        hash: digest,
        status: Some(ProcessedStatus::Ignored),
    };

    // Only one outcome record exists; the other brief stays unconfirmed.
    let report = reconcile(&[first, second], &[outcome]);
    assert_eq!(report.ignored.len(), 1);
    assert_eq!(report.unconfirmed.len(), 1);
}
