use std::cell::Cell;
use std::rc::Rc;

use super::*;

#[test]
fn parse_identity_json_reads_provider_user() {
    let raw = r#"{"uid":"u1","displayName":"Dr. Grey","email":"grey@example.com","emailVerified":true}"#;
    let identity = parse_identity_json(raw).expect("parse").expect("identity");
    assert_eq!(identity.uid, "u1");
    assert_eq!(identity.display_name.as_deref(), Some("Dr. Grey"));
    assert_eq!(identity.email.as_deref(), Some("grey@example.com"));
}

#[test]
fn parse_identity_json_null_is_signed_out() {
    assert_eq!(parse_identity_json("null"), Ok(None));
}

#[test]
fn parse_identity_json_without_uid_is_error() {
    assert!(matches!(parse_identity_json(r#"{"email":"x@y.z"}"#), Err(AuthProviderError::Payload(_))));
}

#[test]
fn greeting_name_falls_back_to_email_then_uid() {
    let mut identity = Identity {
        uid: "u1".to_owned(),
        display_name: Some("Ada".to_owned()),
        email: Some("ada@example.com".to_owned()),
    };
    assert_eq!(identity.greeting_name(), "Ada");
    identity.display_name = None;
    assert_eq!(identity.greeting_name(), "ada@example.com");
    identity.email = None;
    assert_eq!(identity.greeting_name(), "u1");
}

#[test]
fn subscription_runs_teardown_once() {
    let calls = Rc::new(Cell::new(0));
    let counter = calls.clone();
    let mut subscription = Subscription::new(move || counter.set(counter.get() + 1));
    assert!(subscription.is_active());

    subscription.unsubscribe();
    subscription.unsubscribe();
    assert!(!subscription.is_active());
    drop(subscription);
    assert_eq!(calls.get(), 1);
}

#[test]
fn subscription_drop_unsubscribes() {
    let calls = Rc::new(Cell::new(0));
    let counter = calls.clone();
    drop(Subscription::new(move || counter.set(counter.get() + 1)));
    assert_eq!(calls.get(), 1);
}
