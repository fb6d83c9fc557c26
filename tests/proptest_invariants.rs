//! Property-based tests using proptest
//!
//! These cover the arithmetic and mapping invariants of the client
//! layer: pagination range labels, the FOMO window duration gate, the
//! per-resource status vocabulary round trips, and the determinism of
//! the optimistic user-status patch.

use proptest::prelude::*;
use rancha_admin::envelope::Page;
use rancha_admin::resources::{fomo, ghost, moderation, support, users};

mod pagination_tests {
    use super::*;

    fn page_of(total: u64, page: u64, limit: u64) -> Page<u8> {
        Page {
            items: vec![],
            total,
            page,
            limit,
        }
    }

    proptest! {
        /// The range label is exactly [min((page-1)*limit+1, total),
        /// min(page*limit, total)].
        #[test]
        fn display_range_matches_formula(
            total in 0u64..10_000,
            page in 1u64..200,
            limit in 1u64..100,
        ) {
            let (start, end) = page_of(total, page, limit).display_range();
            prop_assert_eq!(start, ((page - 1) * limit + 1).min(total));
            prop_assert_eq!(end, (page * limit).min(total));
        }

        /// total_pages is the ceiling division, and every row fits.
        #[test]
        fn total_pages_is_ceiling(
            total in 0u64..10_000,
            limit in 1u64..100,
        ) {
            let pages = page_of(total, 1, limit).total_pages();
            prop_assert_eq!(pages, total.div_ceil(limit));
            prop_assert!(pages * limit >= total);
            prop_assert!(pages == 0 || (pages - 1) * limit < total);
        }

        /// A page past the end yields an empty, clamped range.
        #[test]
        fn page_past_the_end_is_empty(
            total in 0u64..1_000,
            limit in 1u64..100,
            beyond in 1u64..50,
        ) {
            let view = page_of(total, total.div_ceil(limit) + beyond, limit);
            let (start, end) = view.display_range();
            prop_assert_eq!(start, total);
            prop_assert_eq!(end, total);
        }

        /// The range never spans more rows than the page size.
        #[test]
        fn range_never_exceeds_limit(
            total in 0u64..10_000,
            page in 1u64..200,
            limit in 1u64..100,
        ) {
            let (start, end) = page_of(total, page, limit).display_range();
            prop_assert!(end <= total);
            prop_assert!(end.saturating_sub(start) < limit);
        }
    }
}

mod duration_gate_tests {
    use super::*;
    use chrono::{DateTime, Duration as ChronoDuration, Utc};

    const MIN_SECS: i64 = 5 * 60;
    const MAX_SECS: i64 = 48 * 60 * 60;

    fn window(offset_secs: i64) -> (String, String) {
        let start = DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let end = start + ChronoDuration::seconds(offset_secs);
        (start.to_rfc3339(), end.to_rfc3339())
    }

    proptest! {
        /// Accepted iff the duration is within [5 minutes, 48 hours],
        /// inclusive on both bounds.
        #[test]
        fn acceptance_matches_bounds(duration_secs in 0i64..200_000) {
            let (start, end) = window(duration_secs);
            let expected = (MIN_SECS..=MAX_SECS).contains(&duration_secs);
            prop_assert_eq!(fomo::duration_in_bounds(&start, &end), expected);
        }

        /// Reversed windows are always rejected.
        #[test]
        fn reversed_windows_rejected(duration_secs in 1i64..200_000) {
            let (start, end) = window(duration_secs);
            prop_assert!(!fomo::duration_in_bounds(&end, &start));
        }
    }

    #[test]
    fn boundary_cases_are_exact() {
        let (start, end) = window(MIN_SECS - 60);
        assert!(!fomo::duration_in_bounds(&start, &end));
        let (start, end) = window(MIN_SECS);
        assert!(fomo::duration_in_bounds(&start, &end));
        let (start, end) = window(MAX_SECS);
        assert!(fomo::duration_in_bounds(&start, &end));
        let (start, end) = window(MAX_SECS + 60);
        assert!(!fomo::duration_in_bounds(&start, &end));
    }
}

mod vocabulary_tests {
    use super::*;

    fn arb_flag_status() -> impl Strategy<Value = moderation::FlagStatus> {
        prop_oneof![
            Just(moderation::FlagStatus::Pending),
            Just(moderation::FlagStatus::Reviewed),
            Just(moderation::FlagStatus::Hidden),
        ]
    }

    proptest! {
        /// ui -> backend -> ui is the identity for every moderation
        /// status.
        #[test]
        fn moderation_round_trip(status in arb_flag_status()) {
            prop_assert_eq!(
                moderation::FlagStatus::from_backend(status.backend()),
                status
            );
        }
    }

    #[test]
    fn moderation_backend_pairs() {
        assert_eq!(moderation::FlagStatus::Reviewed.backend(), "approved");
        assert_eq!(moderation::FlagStatus::Hidden.backend(), "removed");
        assert_eq!(moderation::FlagStatus::Pending.backend(), "pending");
    }

    #[test]
    fn user_status_round_trip_is_identity() {
        for status in [
            users::UserStatus::Active,
            users::UserStatus::Inactive,
            users::UserStatus::Suspended,
        ] {
            assert_eq!(users::UserStatus::from_backend(status.backend()), status);
            // the users vocabulary maps through unchanged
            assert_eq!(status.backend(), status.as_str());
        }
    }

    #[test]
    fn ticket_status_round_trip_is_identity() {
        for status in [
            support::TicketStatus::Open,
            support::TicketStatus::InProgress,
            support::TicketStatus::Resolved,
            support::TicketStatus::Closed,
        ] {
            assert_eq!(support::TicketStatus::from_backend(status.as_str()), status);
        }
    }
}

mod status_patch_tests {
    use super::*;

    fn arb_status() -> impl Strategy<Value = users::UserStatus> {
        prop_oneof![
            Just(users::UserStatus::Active),
            Just(users::UserStatus::Inactive),
            Just(users::UserStatus::Suspended),
        ]
    }

    fn user_with(status: users::UserStatus, verified: bool) -> users::User {
        users::User {
            id: "u1".into(),
            username: "ada".into(),
            email: "ada@example.com".into(),
            status,
            posts_count: 0,
            comments_count: 0,
            verified,
            join_date: "2024-01-01".into(),
        }
    }

    proptest! {
        /// Status actions land on their fixed target regardless of the
        /// starting state, and never touch the verified badge.
        #[test]
        fn status_actions_are_deterministic(
            initial in arb_status(),
            verified in any::<bool>(),
        ) {
            let cases = [
                (users::UserAction::Ban, users::UserStatus::Suspended),
                (users::UserAction::Suspend, users::UserStatus::Suspended),
                (users::UserAction::Restrict, users::UserStatus::Inactive),
                (users::UserAction::Unban, users::UserStatus::Active),
                (users::UserAction::Unsuspend, users::UserStatus::Active),
                (users::UserAction::Unrestrict, users::UserStatus::Active),
            ];
            for (action, expected) in cases {
                let mut user = user_with(initial, verified);
                users::apply_action(&mut user, action);
                prop_assert_eq!(user.status, expected);
                prop_assert_eq!(user.verified, verified);
            }
        }

        /// Verification actions toggle the badge and leave status alone.
        #[test]
        fn verify_actions_only_touch_the_badge(
            initial in arb_status(),
            verified in any::<bool>(),
        ) {
            let mut user = user_with(initial, verified);
            users::apply_action(&mut user, users::UserAction::Verify);
            prop_assert!(user.verified);
            prop_assert_eq!(user.status, initial);

            users::apply_action(&mut user, users::UserAction::Unverify);
            prop_assert!(!user.verified);
            prop_assert_eq!(user.status, initial);
        }
    }

    #[test]
    fn ghost_name_status_patch_is_deterministic() {
        let mut entry = ghost::GhostNameEntry {
            name: "fox".into(),
            username: String::new(),
            school: String::new(),
            work: String::new(),
            status: ghost::GhostNameStatus::Available,
            restricted: false,
            reserved: false,
        };
        for status in [
            ghost::GhostNameStatus::Reserved,
            ghost::GhostNameStatus::Restricted,
            ghost::GhostNameStatus::Available,
        ] {
            ghost::apply_name_status(&mut entry, status);
            assert_eq!(entry.status, status);
            assert_eq!(entry.reserved, status == ghost::GhostNameStatus::Reserved);
            assert_eq!(entry.restricted, status == ghost::GhostNameStatus::Restricted);
        }
    }
}
