//! Character budget applied to every tool result.

/// Longest result handed back to the caller, in characters.
pub const MAX_OUTPUT_CHARS: usize = 100_000;

/// Cut `text` to [`MAX_OUTPUT_CHARS`].
#[must_use]
pub fn truncate_output(text: String) -> String {
    truncate_to(text, MAX_OUTPUT_CHARS)
}

/// Cut `text` to its first `budget` characters and note how many were dropped.
///
/// Characters are Unicode scalar values, so multi-byte text is never split
/// mid-character. Text within budget is returned unchanged.
#[must_use]
pub fn truncate_to(text: String, budget: usize) -> String {
    let Some((cut, _)) = text.char_indices().nth(budget) else {
        return text;
    };

    let omitted = text[cut..].chars().count();
    let mut out = String::with_capacity(cut + 48);
    out.push_str(&text[..cut]);
    out.push_str(&format!("\n\n[truncated: {omitted} characters omitted]"));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(truncate_output("hello".to_string()), "hello");
        let exact = "x".repeat(MAX_OUTPUT_CHARS);
        assert_eq!(truncate_output(exact.clone()), exact);
    }

    #[test]
    fn long_text_keeps_prefix_and_reports_omitted_count() {
        let text = "a".repeat(MAX_OUTPUT_CHARS + 1234);
        let out = truncate_output(text);
        let expected_note = "\n\n[truncated: 1234 characters omitted]";
        assert!(out.ends_with(expected_note));
        assert_eq!(
            out.chars().count(),
            MAX_OUTPUT_CHARS + expected_note.chars().count()
        );
    }

    #[test]
    fn counts_characters_not_bytes() {
        let out = truncate_to("héllo wörld".to_string(), 4);
        assert_eq!(out, "héll\n\n[truncated: 7 characters omitted]");
    }

    proptest! {
        #[test]
        fn truncation_is_exact(len in 0usize..400, budget in 0usize..200) {
            let text: String = "é".repeat(len);
            let out = truncate_to(text.clone(), budget);
            if len <= budget {
                prop_assert_eq!(out, text);
            } else {
                let note = format!("\n\n[truncated: {} characters omitted]", len - budget);
                prop_assert!(out.ends_with(&note));
                let kept: String = out.chars().take(budget).collect();
                prop_assert_eq!(kept, "é".repeat(budget));
                prop_assert_eq!(out.chars().count(), budget + note.chars().count());
            }
        }
    }
}
