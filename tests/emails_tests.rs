mod common;

use pretty_assertions::assert_eq;
use serde_json::json;
use warden::caller::Caller;
use warden::error::ErrorKind;
use warden::types::{EmailAddressRecord, VerificationOutcome};

use common::{facade, unverified_email, verified_email, RecordingProvider, USER_ID};

fn caller() -> Caller {
    Caller::new(USER_ID)
}

fn record(id: &str, verified: bool, primary: bool) -> EmailAddressRecord {
    EmailAddressRecord {
        id: id.to_string(),
        email_address: format!("{id}@example.com"),
        verified,
        primary,
        pending_code: None,
    }
}

#[tokio::test]
async fn malformed_address_is_rejected_before_any_call() {
    let provider = RecordingProvider::shared();
    let facade = facade(&provider);

    for bad in ["not-an-email", "ada@", "ada@example", "  "] {
        let result = facade.add_email(&caller(), bad).await;
        assert_eq!(result.error, Some(ErrorKind::InvalidEmail), "{bad:?}");
    }
    assert_eq!(provider.total_calls(), 0);
}

#[tokio::test]
async fn add_creates_then_prepares_challenge() {
    let provider = RecordingProvider::shared();

    let result = facade(&provider)
        .add_email(&caller(), " ada@example.com ")
        .await;

    let created = result.data.expect("address created");
    assert_eq!(created.email_address, "ada@example.com");
    assert!(!created.verified);
    assert!(!created.primary);
    assert_eq!(
        provider.calls(),
        vec![
            "create_email_address:ada@example.com".to_string(),
            format!("prepare_email_verification:{}", created.id),
        ]
    );
}

#[tokio::test]
async fn failed_challenge_does_not_fail_add() {
    let provider = RecordingProvider::shared();
    provider.fail("prepare_email_verification");

    let result = facade(&provider)
        .add_email(&caller(), "ada@example.com")
        .await;

    assert!(result.ok);
    assert_eq!(provider.count("prepare_email_verification"), 1);
}

#[tokio::test]
async fn failed_create_is_reported() {
    let provider = RecordingProvider::shared();
    provider.fail("create_email_address");

    let result = facade(&provider)
        .add_email(&caller(), "ada@example.com")
        .await;

    assert_eq!(result.error, Some(ErrorKind::UpstreamError));
    assert_eq!(provider.count("prepare_email_verification"), 0);
}

#[tokio::test]
async fn resend_prepares_again() {
    let provider = RecordingProvider::shared();
    let result = facade(&provider)
        .resend_verification(&caller(), "idn_7")
        .await;
    assert!(result.ok);
    assert_eq!(
        provider.calls(),
        vec!["prepare_email_verification:idn_7".to_string()]
    );
}

#[tokio::test]
async fn blank_code_is_rejected_without_a_call() {
    let provider = RecordingProvider::shared();
    let facade = facade(&provider);

    for code in ["", "   "] {
        let result = facade.attempt_verification(&caller(), "idn_1", code).await;
        assert_eq!(result.error_str(), Some("empty_code"));
    }
    assert_eq!(provider.total_calls(), 0);
}

#[tokio::test]
async fn attempt_reports_verified_status() {
    let provider = RecordingProvider::shared();
    provider.set_attempt_status("verified");

    let result = facade(&provider)
        .attempt_verification(&caller(), "idn_1", " 424242 ")
        .await;

    assert_eq!(result.data, Some(VerificationOutcome { verified: true }));
    assert_eq!(
        provider.calls(),
        vec!["attempt_email_verification:idn_1/424242".to_string()]
    );
}

#[tokio::test]
async fn non_verified_status_is_a_successful_not_yet() {
    let provider = RecordingProvider::shared();
    provider.set_attempt_status("pending");

    let result = facade(&provider)
        .attempt_verification(&caller(), "idn_1", "000000")
        .await;

    assert!(result.ok);
    assert_eq!(result.data, Some(VerificationOutcome { verified: false }));
}

#[tokio::test]
async fn unverified_address_cannot_become_primary() {
    let provider = RecordingProvider::shared();
    let emails = vec![record("idn_1", true, true), record("idn_2", false, false)];

    let result = facade(&provider)
        .set_primary_email(&caller(), &emails, "idn_2")
        .await;

    assert_eq!(result.error, Some(ErrorKind::EmailNotVerified));
    assert_eq!(provider.total_calls(), 0);
}

#[tokio::test]
async fn unknown_address_cannot_become_primary() {
    let provider = RecordingProvider::shared();
    let emails = vec![record("idn_1", true, true)];

    let result = facade(&provider)
        .set_primary_email(&caller(), &emails, "idn_9")
        .await;

    assert_eq!(result.error, Some(ErrorKind::EmailNotFound));
    assert_eq!(provider.total_calls(), 0);
}

#[tokio::test]
async fn set_primary_leaves_exactly_one_primary() {
    let provider = RecordingProvider::shared();
    let emails = vec![
        record("idn_1", true, true),
        record("idn_2", true, false),
        record("idn_3", false, false),
    ];

    let result = facade(&provider)
        .set_primary_email(&caller(), &emails, "idn_2")
        .await;

    let updated = result.data.expect("primary changed");
    let primaries: Vec<&str> = updated
        .iter()
        .filter(|e| e.primary)
        .map(|e| e.id.as_str())
        .collect();
    assert_eq!(primaries, vec!["idn_2"]);
    assert_eq!(
        provider.calls(),
        vec!["update_user:primary=idn_2".to_string()]
    );
    assert_eq!(
        provider.user_snapshot().primary_email_address_id.as_deref(),
        Some("idn_2")
    );
}

#[tokio::test]
async fn failed_primary_update_returns_no_list() {
    let provider = RecordingProvider::shared();
    provider.fail("update_user");
    let emails = vec![record("idn_1", true, true), record("idn_2", true, false)];

    let result = facade(&provider)
        .set_primary_email(&caller(), &emails, "idn_2")
        .await;

    assert!(!result.ok);
    assert_eq!(result.data, None);
}

#[tokio::test]
async fn loaded_account_marks_only_verified_primary() {
    let provider = RecordingProvider::shared();
    provider.seed_user(json!({
        "primary_email_address_id": "idn_1",
        "email_addresses": [
            verified_email("idn_1", "ada@example.com"),
            unverified_email("idn_2", "ada@work.example.com"),
        ]
    }));

    let account = facade(&provider)
        .load_account(&caller())
        .await
        .data
        .unwrap();

    let flags: Vec<(bool, bool)> = account
        .emails
        .iter()
        .map(|e| (e.verified, e.primary))
        .collect();
    assert_eq!(flags, vec![(true, true), (false, false)]);
}
