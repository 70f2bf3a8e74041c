use unicode_normalization::UnicodeNormalization;

/// Canonicalizes a line of text for fuzzy comparison.
///
/// Applies NFKD, lower-cases, replaces every non-word character with a
/// space, collapses whitespace runs and trims, so diacritics and
/// compatibility forms compare equal on both sides.
///
/// NFKD runs on both sides of lower-casing: `ᴬ` only becomes `A` after
/// decomposition, and lower-casing `İ` yields a sequence that must be
/// re-decomposed. Filtering comes last so a second pass is a no-op.
pub fn normalize(text: &str) -> String {
    let decomposed: String = text.nfkd().collect();
    let folded: String = decomposed.to_lowercase().nfkd().collect();
    let spaced: String = folded
        .chars()
        .map(|c| if is_word_char(c) { c } else { ' ' })
        .collect();
    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Word characters: alphanumerics in any script, underscore, and the
/// combining marks that NFKD splits off accented letters.
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || is_combining_mark(c)
}

fn is_combining_mark(c: char) -> bool {
    unicode_normalization::char::is_combining_mark(c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::lowercase("Hello World", "hello world")]
    #[case::punctuation("Hello, world!", "hello world")]
    #[case::apostrophe("don't stop", "don t stop")]
    #[case::whitespace_runs("  a \t b\n\nc  ", "a b c")]
    #[case::underscore_kept("snake_case", "snake_case")]
    #[case::digits("99 red balloons", "99 red balloons")]
    #[case::only_punctuation("...!?", "")]
    #[case::empty("", "")]
    fn test_normalize(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize(input), expected);
    }

    #[test]
    fn test_normalize_decomposes_diacritics() {
        let out = normalize("Café");
        assert!(out.starts_with("cafe"));
        assert_eq!(out.chars().count(), 5);
    }

    #[test]
    fn test_normalize_fraction_splits_on_slash() {
        assert_eq!(normalize("½"), "1 2");
    }

    #[test]
    fn test_normalize_folds_modifier_capitals() {
        let out = normalize("Xᴬ");
        assert_eq!(out, "xa");
        assert_eq!(normalize(&out), out);
    }

    #[test]
    fn test_normalize_compatibility_forms() {
        // Full-width letters fold to ASCII under NFKD
        assert_eq!(normalize("ＡＢＣ"), "abc");
    }

    #[test]
    fn test_normalize_keeps_non_latin_scripts() {
        assert_eq!(normalize("사랑해, 너를!"), normalize("사랑해 너를"));
        assert!(!normalize("사랑해").is_empty());
    }

    #[rstest]
    #[case("Hello, World!")]
    #[case("Ça va? Très bien...")]
    #[case("  mixed\tWHITE   space ")]
    #[case("ﬁnal ＡＢＣ ½")]
    #[case("사랑해요 — 정말로")]
    #[case("")]
    fn test_normalize_is_idempotent(#[case] input: &str) {
        let once = normalize(input);
        assert_eq!(normalize(&once), once);
    }
}
