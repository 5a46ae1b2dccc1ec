//! Property-based tests for scrubber invariants.

use dc_redact::{BuiltinRule, Scrubber};
use proptest::prelude::*;

/// Lines built from lowercase words and punctuation: nothing any default
/// rule can match.
fn pii_free_line() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z]{1,8}", 0..8).prop_map(|words| words.join(" "))
}

/// Lines that mix plain words with names, dates, phones and emails.
fn mixed_line() -> impl Strategy<Value = String> {
    let piece = prop_oneof![
        "[a-z]{1,8}",
        "[A-Z][a-z]{1,6} [A-Z][a-z]{1,6}",
        "[0-9]{1,2}/[0-9]{1,2}/[0-9]{4}",
        "[0-9]{3}-[0-9]{3}-[0-9]{4}",
        "[a-z]{1,6}@[a-z]{1,6}\\.com",
    ];
    prop::collection::vec(piece, 0..6).prop_map(|pieces| pieces.join(" "))
}

/// Text where names and phone numbers may be wrapped across lines.
fn wrapped_text() -> impl Strategy<Value = String> {
    let piece = prop_oneof![
        "[a-z]{1,8}",
        "[A-Z][a-z]{1,6}\n[A-Z][a-z]{1,6}",
        "\\([0-9]{3}\\)\n[0-9]{3}-[0-9]{4}",
        "[0-9]{3}-[0-9]{3}\n[0-9]{4}",
        "\n",
    ];
    prop::collection::vec(piece, 0..10).prop_map(|pieces| pieces.join(" "))
}

proptest! {
    #[test]
    fn pii_free_text_is_unchanged(lines in prop::collection::vec(pii_free_line(), 0..6)) {
        let text = lines.join("\n");
        prop_assert_eq!(Scrubber::new().scrub(&text), text);
    }

    #[test]
    fn scrub_is_idempotent(lines in prop::collection::vec(mixed_line(), 0..6)) {
        let scrubber = Scrubber::new();
        let text = lines.join("\n");
        let once = scrubber.scrub(&text);
        if !scrubber.has_matches(&once) {
            prop_assert_eq!(scrubber.scrub(&once), once);
        }
    }

    #[test]
    fn scrub_preserves_line_count(lines in prop::collection::vec(mixed_line(), 1..6)) {
        let text = lines.join("\n");
        let out = Scrubber::new().scrub(&text);
        prop_assert_eq!(out.matches('\n').count(), text.matches('\n').count());
    }

    #[test]
    fn wrapped_pii_is_redacted_without_losing_lines(text in wrapped_text()) {
        let scrubber = Scrubber::new();
        let out = scrubber.scrub(&text);
        prop_assert_eq!(out.matches('\n').count(), text.matches('\n').count());
        prop_assert!(!out.chars().any(|c| c.is_ascii_digit()));
    }

    #[test]
    fn report_total_matches_token_count(line in mixed_line()) {
        let result = Scrubber::new().scrub_with_report(&line);
        let tokens = BuiltinRule::DEFAULT_ORDER
            .iter()
            .map(|r| result.text.matches(r.token()).count())
            .sum::<usize>();
        prop_assert_eq!(result.report.total(), tokens);
    }
}
