use fieldguard::primitives::Predicates;
use proptest::prelude::*;
use regex::{Regex, RegexBuilder};

const ATOMS: &[&str] = &[
    "[abc]", "[^a]", "(a)", "(b|c)", ".", "a", "b+", "c?", "\\d", "x*", "a{1,2}", "[0-9]",
];

/// Patterns that open with a class, a group, a dot, a letter or an escape.
fn bare_pattern() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(ATOMS), 1..5).prop_map(|atoms| atoms.concat())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn bare_patterns_match_like_regex(pattern in bare_pattern(), subject in "[abcx0-9]{0,6}") {
        let expected = Regex::new(&pattern).unwrap().is_match(&subject);
        prop_assert_eq!(Predicates::new().matches_pattern(&subject, &pattern), Some(expected));
    }

    #[test]
    fn slash_delimiters_do_not_change_matching(
        pattern in bare_pattern(),
        subject in "[abcx0-9]{0,6}",
    ) {
        let predicates = Predicates::new();
        prop_assert_eq!(
            predicates.matches_pattern(&subject, &format!("/{}/", pattern)),
            predicates.matches_pattern(&subject, &pattern)
        );
    }

    #[test]
    fn case_flag_matches_case_insensitive_regex(
        pattern in bare_pattern(),
        subject in "[abcABCx0-9]{0,6}",
    ) {
        let expected = RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .build()
            .unwrap()
            .is_match(&subject);
        prop_assert_eq!(
            Predicates::new().matches_pattern(&subject, &format!("#{}#i", pattern)),
            Some(expected)
        );
    }
}
