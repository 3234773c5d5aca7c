//! Property-based tests for the Markdown sanitizer.

use proptest::prelude::*;

use crate::sync::sanitize::Sanitizer;

fn core() -> Sanitizer {
    Sanitizer::for_repo("BrainDriveAI/BrainDrive-Core").unwrap()
}

proptest! {
    /// Content inside a fenced code block survives sanitization verbatim,
    /// whatever it contains.
    #[test]
    fn fenced_content_is_never_altered(
        content in "[a-zA-Z0-9 <>{}=#.:/_-]{0,60}",
    ) {
        let doc = format!("```\n{}\n```\n", content);
        let sanitized = core().sanitize_text(&doc);
        prop_assert_eq!(sanitized, doc);
    }

    /// Inline code spans survive sanitization verbatim.
    #[test]
    fn inline_code_is_never_altered(
        content in "[a-zA-Z0-9 <>{}=#.:/_-]{0,40}",
    ) {
        let doc = format!("before `{}` after", content);
        let sanitized = core().sanitize_text(&doc);
        let needle = format!("`{}`", content);
        prop_assert!(sanitized.contains(&needle));
    }

    /// A `<` immediately followed by a digit is always escaped in prose.
    #[test]
    fn lt_before_digit_is_escaped(n in 0u32..10_000) {
        let line = format!("latency <{}ms", n);
        let sanitized = core().sanitize_text(&line);
        prop_assert_eq!(sanitized, format!("latency &lt;{}ms", n));
    }

    /// Line structure is preserved: sanitization never adds or removes
    /// newlines.
    #[test]
    fn line_count_is_preserved(
        lines in proptest::collection::vec("[a-zA-Z0-9 <.{}-]{0,30}", 0..8),
    ) {
        let doc = lines.join("\n");
        let sanitized = core().sanitize_text(&doc);
        prop_assert_eq!(
            sanitized.split('\n').count(),
            doc.split('\n').count()
        );
    }
}
