//! Join-eligibility capacity math.
//!
//! Capacity numbers arrive from list endpoints that may omit them while a
//! record is still syncing. Missing data never blocks a join attempt from
//! the client side; the server stays the authority and rejects a join into
//! an actually-full game.

/// True only when the caller has not joined, both capacity numbers are
/// known, and the current count has reached the maximum.
///
/// Already-joined callers and unknown numbers are never "full" — blocking
/// on missing data would strand users on stale list screens.
pub fn is_full(joined: bool, max_capacity: Option<u32>, current_count: Option<u32>) -> bool {
    if joined {
        return false;
    }
    match (max_capacity, current_count) {
        (Some(max), Some(current)) => current >= max,
        _ => false,
    }
}

/// Remaining open slots, or `None` when either number is unknown.
///
/// Never negative: an over-subscribed game reports zero slots.
pub fn slots_left(max_capacity: Option<u32>, current_count: Option<u32>) -> Option<u32> {
    Some(max_capacity?.saturating_sub(current_count?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joined_callers_are_never_full() {
        assert!(!is_full(true, Some(5), Some(5)));
        assert!(!is_full(true, Some(5), Some(9)));
        assert!(!is_full(true, None, None));
    }

    #[test]
    fn full_requires_both_numbers_and_reached_capacity() {
        assert!(is_full(false, Some(5), Some(5)));
        assert!(is_full(false, Some(5), Some(7)));
        assert!(!is_full(false, Some(5), Some(4)));
    }

    #[test]
    fn missing_numbers_degrade_to_not_full() {
        assert!(!is_full(false, None, Some(9)));
        assert!(!is_full(false, Some(5), None));
        assert!(!is_full(false, None, None));
    }

    #[test]
    fn slots_left_counts_remaining_capacity() {
        assert_eq!(slots_left(Some(10), Some(3)), Some(7));
        assert_eq!(slots_left(Some(5), Some(5)), Some(0));
    }

    #[test]
    fn slots_left_never_goes_negative() {
        assert_eq!(slots_left(Some(5), Some(7)), Some(0));
    }

    #[test]
    fn slots_left_is_unknown_without_both_numbers() {
        assert_eq!(slots_left(None, Some(5)), None);
        assert_eq!(slots_left(Some(5), None), None);
        assert_eq!(slots_left(None, None), None);
    }

    #[cfg(feature = "fuzz-tests")]
    mod prop_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn joined_is_never_full(max in proptest::option::of(any::<u32>()),
                                    current in proptest::option::of(any::<u32>())) {
                prop_assert!(!is_full(true, max, current));
            }

            #[test]
            fn slots_never_exceed_max(max in any::<u32>(), current in any::<u32>()) {
                let slots = slots_left(Some(max), Some(current)).unwrap();
                prop_assert!(slots <= max);
            }
        }
    }
}
