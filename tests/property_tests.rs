//! Property-based tests for logr using proptest

use logr::prelude::*;
use logr::{generate_code, join_args};
use proptest::prelude::*;

fn any_severity() -> impl Strategy<Value = Severity> {
    any::<u8>().prop_map(Severity::from_bits_truncate)
}

fn elementary_severity() -> impl Strategy<Value = Severity> {
    prop_oneof![
        Just(Severity::NONE),
        Just(Severity::PANIC),
        Just(Severity::ERROR),
        Just(Severity::WARNING),
        Just(Severity::INFO),
        Just(Severity::DEBUG),
        Just(Severity::SUCCESS),
    ]
}

fn label() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("none"),
        Just("panic"),
        Just("error"),
        Just("warning"),
        Just("info"),
        Just("success"),
        Just("debug"),
        Just("critical"),
        Just("monitor"),
        Just("verbose"),
        Just("all"),
    ]
}

// ============================================================================
// Severity Tests
// ============================================================================

proptest! {
    /// A severity matches a filter exactly when it is a subset of it
    #[test]
    fn test_matches_is_subset(s in any_severity(), f in any_severity()) {
        prop_assert_eq!(s.matches(f), (s & f) == s);
    }

    /// NONE matches every filter and every severity matches ALL
    #[test]
    fn test_matches_extremes(s in any_severity()) {
        prop_assert!(Severity::NONE.matches(s));
        prop_assert!(s.matches(Severity::ALL));
    }

    /// Labels resolve regardless of case and surrounding whitespace
    #[test]
    fn test_label_case_and_trim_insensitive(
        name in label(),
        upper in any::<bool>(),
        left in "[ \t]{0,3}",
        right in "[ \t]{0,3}",
    ) {
        let cased = if upper { name.to_uppercase() } else { name.to_string() };
        let decorated = format!("{}{}{}", left, cased, right);
        prop_assert_eq!(
            Severity::from_label(&decorated).unwrap(),
            Severity::from_label(name).unwrap()
        );
    }

    /// Anything outside the vocabulary is rejected
    #[test]
    fn test_unknown_labels_rejected(name in "[a-z]{1,12}") {
        let known = [
            "none", "panic", "error", "warning", "info", "success", "debug",
            "critical", "monitor", "verbose", "all",
        ];
        prop_assume!(!known.contains(&name.as_str()));
        prop_assert!(Severity::from_label(&name).is_err());
    }

    /// An elementary label always includes its own level
    #[test]
    fn test_elementary_label_contains_level(s in elementary_severity()) {
        prop_assert!(s.matches(Severity::from_label(s.word()).unwrap()));
    }

    /// Short codes map each character to its own bit
    #[test]
    fn test_from_codes_is_union(codes in "[PEWIDS]{0,6}") {
        let expected = codes
            .chars()
            .map(Severity::from_code)
            .fold(Severity::NONE, |acc, s| acc | s);
        let parsed = Severity::from_codes(&codes);
        prop_assert_eq!(parsed, expected);
        prop_assert_eq!(parsed.bits().count_ones() as usize, {
            let mut unique: Vec<char> = codes.chars().collect();
            unique.sort_unstable();
            unique.dedup();
            unique.len()
        });
    }

    /// Glyph and word agree for elementary levels
    #[test]
    fn test_glyph_matches_code(s in elementary_severity()) {
        prop_assume!(s != Severity::NONE);
        let glyph = s.glyph();
        let code = glyph.chars().next().unwrap();
        prop_assert_eq!(Severity::from_code(code), s);
    }
}

// ============================================================================
// Code and Meta Tests
// ============================================================================

proptest! {
    /// Codes are lowercase base-36 and parse back to the timestamp
    #[test]
    fn test_code_is_base36(nanos in any::<u64>()) {
        let code = generate_code(nanos);
        prop_assert!(code.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
        prop_assert_eq!(u64::from_str_radix(&code, 36).unwrap(), nanos);
    }

    /// Later timestamps of equal code length sort after earlier ones
    #[test]
    fn test_code_order_follows_time(a in 1u64 << 60..u64::MAX, b in 1u64 << 60..u64::MAX) {
        let (ca, cb) = (generate_code(a), generate_code(b));
        prop_assume!(ca.len() == cb.len());
        prop_assert_eq!(a.cmp(&b), ca.cmp(&cb));
    }

    /// Deriving metadata never changes the parent
    #[test]
    fn test_meta_copy_on_write(
        keys in prop::collection::vec("[a-z]{1,8}", 0..8),
        extra in "[a-z]{1,8}",
    ) {
        let base: Meta = keys
            .iter()
            .map(|k| (k.clone(), MetaValue::from(k.as_str())))
            .collect();
        let before = base.len();

        let derived = base.with(extra.clone(), true);

        prop_assert_eq!(base.len(), before);
        prop_assert_eq!(derived.get(&extra), Some(&MetaValue::Bool(true)));
        prop_assert!(derived.len() >= before);
    }

    /// Joined arguments never carry leading or trailing whitespace
    #[test]
    fn test_join_args_trimmed(a in ".{0,10}", b in ".{0,10}") {
        let joined = join_args(&[&a, &b]);
        prop_assert_eq!(joined.trim(), joined.as_str());
    }
}
