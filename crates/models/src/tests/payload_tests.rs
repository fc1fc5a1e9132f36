use chrono::{Duration, Utc};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::customer::{self, CustomerChanges, NewCustomer};
use crate::payment::{NewPayment, PaymentChanges, PaymentStatus};
use crate::product::{self, NewProduct, ProductChanges};
use crate::session::{NewSession, SessionChanges, SessionStatus};
use crate::verification::{NewVerification, VerificationStatus};

fn new_customer() -> NewCustomer {
    serde_json::from_value(json!({
        "name": "A",
        "email": "a@x.com",
        "phone": "123",
        "address": "Y"
    }))
    .unwrap()
}

fn new_payment(status: Option<&str>) -> NewPayment {
    let mut body = json!({
        "customer_id": Uuid::new_v4(),
        "product_id": Uuid::new_v4(),
        "amount": "49.90",
        "currency": "usd",
        "method": "card",
        "reference": "ch_123"
    });
    if let Some(s) = status {
        body["status"] = json!(s);
    }
    serde_json::from_value(body).unwrap()
}

#[test]
fn customer_defaults_to_active_with_generated_id() {
    let input = new_customer();
    assert!(input.validate().is_ok());
    let m = input.into_model();
    assert!(m.active);
    assert!(!m.id.is_nil());
    assert_eq!(m.created_at, m.updated_at);
}

#[test]
fn customer_missing_field_fails_to_parse() {
    let res = serde_json::from_value::<NewCustomer>(json!({"name": "A", "phone": "1", "address": "Y"}));
    assert!(res.is_err());
}

#[test]
fn customer_invalid_email_and_blank_name_are_reported_per_field() {
    let mut input = new_customer();
    input.email = "not-an-email".into();
    input.name = "   ".into();
    let errs = input.validate().unwrap_err();
    assert!(errs.errors().contains_key("email"));
    assert!(errs.errors().contains_key("name"));
    assert!(!errs.errors().contains_key("phone"));
}

#[test]
fn customer_email_is_normalized() {
    let mut input = new_customer();
    input.email = "A@X.com".into();
    assert_eq!(input.into_model().email, "a@x.com");
    assert_eq!(customer::normalize_email("  B@Y.ORG "), "b@y.org");
}

#[test]
fn customer_changes_only_touch_present_fields() {
    let mut m = new_customer().into_model();
    let before = m.clone();
    let changes: CustomerChanges = serde_json::from_value(json!({"phone": "999"})).unwrap();
    assert!(changes.validate().is_ok());
    changes.apply(&mut m);
    assert_eq!(m.phone, "999");
    assert_eq!(m.name, before.name);
    assert_eq!(m.email, before.email);
    assert_eq!(m.created_at, before.created_at);
    assert!(m.updated_at >= before.updated_at);
}

#[test]
fn empty_customer_changes_validate() {
    assert!(CustomerChanges::default().validate().is_ok());
}

#[test]
fn product_defaults_to_active() {
    let input: NewProduct = serde_json::from_value(json!({
        "customer_id": Uuid::new_v4(),
        "name": "Office",
        "description": "Desk space",
        "min_monthly_rent": "100",
        "max_monthly_rent": "250.50"
    }))
    .unwrap();
    assert!(input.validate().is_ok());
    assert!(input.into_model().active);
}

#[test]
fn product_rejects_non_decimal_rent() {
    let changes = ProductChanges { min_monthly_rent: Some("cheap".into()), ..Default::default() };
    let errs = changes.validate().unwrap_err();
    assert!(errs.errors().contains_key("min_monthly_rent"));
}

#[test]
fn rent_bounds_must_be_ordered() {
    assert!(product::check_rent_bounds("100", "200").is_ok());
    assert!(product::check_rent_bounds("200", "200").is_ok());
    assert!(product::check_rent_bounds("300", "200").is_err());
}

#[test]
fn session_defaults_to_active_and_started_now() {
    let input: NewSession = serde_json::from_value(json!({
        "customer_id": Uuid::new_v4(),
        "user_agent": "UA"
    }))
    .unwrap();
    let before = Utc::now();
    let m = input.into_model();
    assert_eq!(m.status, SessionStatus::Active);
    assert!(m.started_at >= before);
    assert!(m.ended_at.is_none());
}

#[test]
fn session_rejects_unknown_status_literal() {
    let res = serde_json::from_value::<NewSession>(json!({
        "customer_id": Uuid::new_v4(),
        "user_agent": "UA",
        "status": "paused"
    }));
    assert!(res.is_err());
}

#[test]
fn session_changes_can_clear_ended_at() {
    let mut m: crate::session::Model = serde_json::from_value::<NewSession>(json!({
        "customer_id": Uuid::new_v4(),
        "user_agent": "UA",
        "status": "ended",
        "ended_at": Utc::now()
    }))
    .unwrap()
    .into_model();
    assert!(m.ended_at.is_some());
    let changes: SessionChanges = serde_json::from_value(json!({"status": "active", "ended_at": null})).unwrap();
    changes.apply(&mut m);
    assert_eq!(m.status, SessionStatus::Active);
    assert!(m.ended_at.is_none());
}

#[test]
fn payment_defaults_to_pending_without_paid_at() {
    let input = new_payment(None);
    assert!(input.validate().is_ok());
    let m = input.into_model();
    assert_eq!(m.status, PaymentStatus::Pending);
    assert!(m.paid_at.is_none());
    assert_eq!(m.currency, "USD");
}

#[test]
fn payment_created_paid_is_stamped() {
    let m = new_payment(Some("paid")).into_model();
    assert_eq!(m.status, PaymentStatus::Paid);
    assert!(m.paid_at.is_some());
}

#[test]
fn payment_transition_to_paid_stamps_once() {
    let mut m = new_payment(None).into_model();
    PaymentChanges { status: Some(PaymentStatus::Paid), ..Default::default() }.apply(&mut m);
    let stamped = m.paid_at.expect("paid_at set on transition");
    PaymentChanges { status: Some(PaymentStatus::Paid), ..Default::default() }.apply(&mut m);
    assert_eq!(m.paid_at, Some(stamped));
}

#[test]
fn payment_rejects_bad_amount_and_currency() {
    let mut input = new_payment(None);
    input.amount = "-5".into();
    input.currency = "dollars".into();
    let errs = input.validate().unwrap_err();
    assert!(errs.errors().contains_key("amount"));
    assert!(errs.errors().contains_key("currency"));
}

#[test]
fn verification_defaults_and_wire_name() {
    let input: NewVerification = serde_json::from_value(json!({
        "customer_id": Uuid::new_v4(),
        "session_id": Uuid::new_v4(),
        "payment_id": Uuid::new_v4(),
        "type": "email",
        "expires_at": Utc::now() + Duration::hours(1)
    }))
    .unwrap();
    assert!(input.validate().is_ok());
    let m = input.into_model();
    assert_eq!(m.status, VerificationStatus::Pending);
    assert_eq!(m.attempts, 0);
    let body = serde_json::to_value(&m).unwrap();
    assert_eq!(body["type"], "email");
    assert_eq!(body["status"], "pending");
}

#[test]
fn verification_rejects_negative_attempts() {
    let input: NewVerification = serde_json::from_value(json!({
        "customer_id": Uuid::new_v4(),
        "session_id": Uuid::new_v4(),
        "payment_id": Uuid::new_v4(),
        "type": "sms",
        "attempts": -1,
        "expires_at": Utc::now()
    }))
    .unwrap();
    let errs = input.validate().unwrap_err();
    assert!(errs.errors().contains_key("attempts"));
}
