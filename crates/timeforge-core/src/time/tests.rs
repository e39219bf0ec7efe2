//! Tests for time groups.

use std::sync::Arc;

use super::*;

#[test]
fn test_new_sorts_and_dedups() {
    let g = TimeGroup::new(8, [5, 1, 5, 3]);
    assert_eq!(g.times(), &[1, 3, 5]);
    assert_eq!(g.len(), 3);
    assert_eq!(g.first(), Some(1));
    assert!(!g.is_empty());
}

#[test]
#[should_panic(expected = "outside cycle")]
fn test_new_rejects_out_of_cycle_time() {
    let _ = TimeGroup::new(4, [4]);
}

#[test]
fn test_membership_beyond_first_word() {
    let g = TimeGroup::new(130, [0, 64, 129]);
    assert!(g.contains(64));
    assert!(g.contains(129));
    assert!(!g.contains(65));
    assert!(!g.contains(500));
}

#[test]
fn test_subset_disjoint_equality() {
    let a = TimeGroup::new(10, [1, 2]);
    let b = TimeGroup::new(10, [1, 2, 3]);
    let c = TimeGroup::new(10, [7, 8]);

    assert!(a.is_subset(&b));
    assert!(!b.is_subset(&a));
    assert!(a.is_disjoint(&c));
    assert!(!a.is_disjoint(&b));
    assert!(TimeGroup::empty(10).is_subset(&a));
    assert_eq!(a, TimeGroup::new(10, [2, 1]).with_name("other name"));
    assert_ne!(a, b);
}

#[test]
fn test_neighbour_drops_times_leaving_cycle() {
    let g = Arc::new(TimeGroup::new(6, [0, 3, 5]));
    assert_eq!(g.neighbour(1).times(), &[1, 4]);
    assert_eq!(g.neighbour(-3).times(), &[0, 2]);
    assert!(g.neighbour(6).is_empty());
    assert!(g.neighbour(-6).is_empty());
}

#[test]
fn test_neighbour_zero_and_memoization() {
    let g = Arc::new(TimeGroup::new(6, [2, 3]));
    assert!(Arc::ptr_eq(&g, &g.neighbour(0)));

    let n1 = g.neighbour(-2);
    let n2 = g.neighbour(-2);
    assert!(Arc::ptr_eq(&n1, &n2));
    assert_eq!(n1.times(), &[0, 1]);
}

#[test]
fn test_is_subset_shifted_matches_neighbour() {
    let g = Arc::new(TimeGroup::new(10, [0, 4, 9]));
    let target = TimeGroup::new(10, [2, 6]);

    // 0+2=2, 4+2=6, 9+2 leaves the cycle
    assert!(g.is_subset_shifted(2, &target));
    assert_eq!(
        g.is_subset_shifted(2, &target),
        g.neighbour(2).is_subset(&target)
    );
    assert!(!g.is_subset_shifted(1, &target));
    assert_eq!(
        g.is_subset_shifted(1, &target),
        g.neighbour(1).is_subset(&target)
    );
}

#[test]
fn test_intersection() {
    let a = TimeGroup::new(10, [1, 2, 3, 8]);
    let b = TimeGroup::new(10, [2, 3, 4, 8, 9]);
    assert_eq!(a.intersection(&b).times(), &[2, 3, 8]);
    assert!(a.intersection(&TimeGroup::empty(10)).is_empty());
}

#[test]
fn test_full_and_singleton() {
    assert_eq!(TimeGroup::full(3).times(), &[0, 1, 2]);
    assert_eq!(TimeGroup::singleton(3, 1).times(), &[1]);
    assert_eq!(format!("{}", TimeGroup::full(3).with_name("All")), "All");
}
