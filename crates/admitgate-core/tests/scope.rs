//! Operation scope membership and polarity laws.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use admitgate_core::{OperationScope, Polarity};
use proptest::prelude::*;

#[test]
fn include_matches_only_listed() {
    let scope = OperationScope::include(["a/b/c", "x/y/z"]);
    assert!(scope.matches("a/b/c"));
    assert!(scope.matches("x/y/z"));
    assert!(!scope.matches("a/b/d"));
}

#[test]
fn exclude_matches_all_but_listed() {
    let scope = OperationScope::exclude(["a/b/c", "x/y/z"]);
    assert!(!scope.matches("a/b/c"));
    assert!(!scope.matches("x/y/z"));
    assert!(scope.matches("a/b/d"));
}

#[test]
fn empty_members() {
    let none: [&str; 0] = [];
    assert!(!OperationScope::include(none).matches("/pkg.Svc/Any"));
    assert!(OperationScope::exclude(none).matches("/pkg.Svc/Any"));
}

#[test]
fn duplicates_collapse() {
    let scope = OperationScope::include(["a", "a", "b"]);
    assert_eq!(scope.len(), 2);
}

#[test]
fn opposite_flips_polarity_and_keeps_members() {
    let scope = OperationScope::include(["a/b/c", "x/y/z"]).opposite();
    assert_eq!(scope.polarity(), Polarity::Exclude);
    assert!(!scope.matches("a/b/c"));
    assert!(!scope.matches("x/y/z"));
    assert!(scope.matches("a/b/d"));

    let scope = OperationScope::exclude(["a/b/c", "x/y/z"]).opposite();
    assert_eq!(scope.polarity(), Polarity::Include);
    assert!(scope.matches("a/b/c"));
    assert!(!scope.matches("a/b/d"));
}

#[test]
fn opposite_is_an_independent_copy() {
    let base = OperationScope::include(["a"]);
    let flipped = base.opposite();
    assert_eq!(base.polarity(), Polarity::Include);
    assert!(base.matches("a"));
    assert!(!flipped.matches("a"));
    assert_eq!(flipped.opposite(), base);
}

#[test]
fn polarity_opposite() {
    assert_eq!(Polarity::Include.opposite(), Polarity::Exclude);
    assert_eq!(Polarity::Exclude.opposite(), Polarity::Include);
}

proptest! {
    #[test]
    fn include_is_membership(
        members in prop::collection::hash_set("[a-c/]{1,4}", 0..8),
        probe in "[a-c/]{1,4}",
    ) {
        let scope = OperationScope::include(members.iter().cloned());
        prop_assert_eq!(scope.matches(&probe), members.contains(&probe));
    }

    #[test]
    fn exclude_is_non_membership(
        members in prop::collection::hash_set("[a-c/]{1,4}", 0..8),
        probe in "[a-c/]{1,4}",
    ) {
        let scope = OperationScope::exclude(members.iter().cloned());
        prop_assert_eq!(scope.matches(&probe), !members.contains(&probe));
    }

    #[test]
    fn double_opposite_is_identity(
        members in prop::collection::vec("[a-c/]{1,4}", 0..8),
        include in any::<bool>(),
        probe in "[a-c/]{1,4}",
    ) {
        let polarity = if include { Polarity::Include } else { Polarity::Exclude };
        let scope = OperationScope::new(polarity, members);
        let round_trip = scope.opposite().opposite();
        prop_assert_eq!(round_trip.matches(&probe), scope.matches(&probe));
        prop_assert_eq!(scope.opposite().matches(&probe), !scope.matches(&probe));
    }
}
