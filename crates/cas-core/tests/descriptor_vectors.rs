//! Encoding selection against catalog descriptor vectors.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]


use cas_core::{Denial, Policy, Verdict};

fn decide(name: &str) -> (vector_loader::TestVector, Verdict) {
    let v = vector_loader::load(name);
    let policy = Policy::new(v.policy_drm_id.clone()).expect("vector policy");
    let verdict = match policy.select(&v.descriptor.encodings) {
        Some(enc) => Verdict::Authorized(enc.clone()),
        None => Verdict::Denied(Denial::NoMatchingEncodings),
    };
    (v, verdict)
}

fn check(name: &str) {
    let (v, verdict) = decide(name);
    match (&v.expect, &v.expect_denial) {
        (Some(exp), None) => match verdict {
            Verdict::Authorized(enc) => assert_eq!(enc.uri, exp.uri, "{}", v.description),
            other => panic!("{}: expected authorized, got {other:?}", v.description),
        },
        (None, Some(label)) => assert_eq!(verdict.outcome(), label.as_str(), "{}", v.description),
        _ => panic!("{name}: vector must set exactly one of expect/expect_denial"),
    }
}

#[test]
fn first_match_vector() {
    check("first_match.json");
}

#[test]
fn no_match_vector() {
    check("no_match.json");
}

#[test]
fn sparse_fields_vector() {
    check("sparse_fields.json");
}

#[test]
fn empty_encodings_vector() {
    check("empty_encodings.json");
}

#[test]
fn first_match_keeps_descriptor_attributes() {
    let (v, _) = decide("first_match.json");
    assert_eq!(v.descriptor.attributes["title"].as_str(), Some("Pilot"));
    let reencoded = serde_json::to_value(&v.descriptor).unwrap();
    assert_eq!(reencoded["attributes"]["season"], 1);
    assert_eq!(reencoded["attributes"]["hd"], true);
    assert_eq!(reencoded["encodings"][1]["channel"], "web");
}
