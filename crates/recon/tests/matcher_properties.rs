// Property-based tests for name normalization and matching.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use proptest::prelude::*;
use rostermerge_recon::config::{MatchingConfig, ParserConfig};
use rostermerge_recon::role::RoleSet;
use rostermerge_recon::{names_match, normalize_name, parse_groups};

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

/// Name-like text: words, initials, stray punctuation and padding.
fn arb_name() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            3 => r"[A-Za-z]{1,9}",
            1 => r"[A-Z]\.",
            1 => Just("Dr.".to_string()),
            1 => r"[a-zé]{2,6},",
        ],
        0..5,
    )
    .prop_map(|words| words.join("  "))
}

fn arb_matching() -> impl Strategy<Value = MatchingConfig> {
    (0usize..4, 1usize..4, any::<bool>(), 0usize..15).prop_map(
        |(min_token_len, min_shared_tokens, containment, containment_min_len)| MatchingConfig {
            min_token_len,
            min_shared_tokens,
            containment,
            containment_min_len,
        },
    )
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn names_match_is_symmetric(a in arb_name(), b in arb_name(), cfg in arb_matching()) {
        prop_assert_eq!(names_match(&a, &b, &cfg), names_match(&b, &a, &cfg));
    }

    #[test]
    fn normalize_is_idempotent(name in arb_name()) {
        let once = normalize_name(&name);
        prop_assert_eq!(normalize_name(&once), once.clone());
        prop_assert!(!once.contains('.') && !once.contains(','));
        prop_assert!(!once.contains("  "));
        prop_assert_eq!(once.trim(), once.as_str());
    }

    #[test]
    fn non_empty_name_matches_itself(name in arb_name(), cfg in arb_matching()) {
        prop_assume!(!normalize_name(&name).is_empty());
        prop_assert!(names_match(&name, &name.to_uppercase(), &cfg));
    }

    #[test]
    fn text_without_delimiter_has_no_groups(text in r"[A-Za-z0-9 .,\n-]{0,200}") {
        prop_assume!(!text.contains("Group No - "));
        prop_assert!(parse_groups(&text, &ParserConfig::default()).groups.is_empty());
    }

    #[test]
    fn ten_digit_lines_never_become_captains(phone in r"[0-9]{10}", tail in r"[0-9 ]{0,4}") {
        let text = format!("Group No - 1\nCaptain\n{phone}{tail}\nReal Lead\n1. Member");
        let parsed = parse_groups(&text, &ParserConfig::default());
        prop_assert_eq!(parsed.groups[0].captains.clone(), vec!["Real Lead".to_string()]);
    }

    #[test]
    fn captain_promotion_is_idempotent(role in r"(President|Member|Secretary|Cooking Captain)(, (President|Member|Treasurer))?") {
        let mut once = RoleSet::parse(&role);
        once.promote_to_captain();
        let rendered = once.to_string();

        let mut twice = RoleSet::parse(&rendered);
        prop_assert!(!twice.promote_to_captain());
        prop_assert_eq!(twice.to_string(), rendered);
    }
}
