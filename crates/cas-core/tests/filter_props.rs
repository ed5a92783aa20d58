//! Property tests for policy filtering.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use proptest::prelude::*;

use cas_core::{Encoding, Policy};

fn encoding() -> impl Strategy<Value = Encoding> {
    (
        prop::option::of(prop::sample::select(vec!["5", "6", "7", "9", ""])),
        "[a-z]{1,8}",
        0i64..3,
    )
        .prop_map(|(drm, uri, status)| Encoding {
            uri: format!("http://cdn/{uri}"),
            drm_id: drm.map(str::to_string),
            status,
            ..Encoding::default()
        })
}

fn policy() -> impl Strategy<Value = Policy> {
    prop::sample::select(vec!["5", "6", "7", "9"]).prop_map(|id| Policy::new(id).unwrap())
}

/// True when `sub` is an in-order subsequence of `full`.
fn is_subsequence(sub: &[Encoding], full: &[Encoding]) -> bool {
    let mut it = full.iter();
    sub.iter().all(|s| it.any(|f| f == s))
}

proptest! {
    #[test]
    fn filter_is_exact_ordered_subsequence(p in policy(), list in prop::collection::vec(encoding(), 0..24)) {
        let out = p.filter(&list);
        prop_assert!(is_subsequence(&out, &list));
        prop_assert!(out.iter().all(|e| e.drm_id() == Some(p.required_drm_id())));
        let expected = list.iter().filter(|e| e.drm_id() == Some(p.required_drm_id())).count();
        prop_assert_eq!(out.len(), expected);
    }

    #[test]
    fn filter_is_idempotent(p in policy(), list in prop::collection::vec(encoding(), 0..24)) {
        let once = p.filter(&list);
        let twice = p.filter(&once);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn select_is_head_of_filter(p in policy(), list in prop::collection::vec(encoding(), 0..24)) {
        let filtered = p.filter(&list);
        prop_assert_eq!(p.select(&list), filtered.first());
    }
}
