use strsim::normalized_levenshtein;

/// A textual similarity metric over normalized strings.
///
/// Scores lie in `[0.0, 1.0]`, where `1.0` means identical for the purpose
/// of the metric. `reference` is the lyric line and `candidate` the
/// transcribed text it is compared against; metrics may be asymmetric.
/// Any empty side scores `0.0`.
pub trait SimilarityScorer: Send + Sync {
    fn name(&self) -> &'static str;

    fn score(&self, reference: &str, candidate: &str) -> f64;
}

/// Edit-distance similarity over the whole string.
#[derive(Debug, Clone, Copy, Default)]
pub struct WholeStringScorer;

impl SimilarityScorer for WholeStringScorer {
    fn name(&self) -> &'static str {
        "whole"
    }

    fn score(&self, reference: &str, candidate: &str) -> f64 {
        if reference.is_empty() || candidate.is_empty() {
            return 0.0;
        }
        normalized_levenshtein(reference, candidate)
    }
}

/// How well the reference appears somewhere inside the candidate.
///
/// The reference is compared against every same-length window of the
/// candidate that starts on a word boundary, and the best window wins. A
/// candidate shorter than the reference is only a fragment of the line and
/// earns no partial credit: it is scored as a whole string, which leaves
/// room for a multi-segment window to cover the rest of the line.
#[derive(Debug, Clone, Copy, Default)]
pub struct PartialScorer;

impl SimilarityScorer for PartialScorer {
    fn name(&self) -> &'static str {
        "partial"
    }

    fn score(&self, reference: &str, candidate: &str) -> f64 {
        if reference.is_empty() || candidate.is_empty() {
            return 0.0;
        }

        let reference_len = reference.chars().count();
        let chars: Vec<char> = candidate.chars().collect();
        if chars.len() <= reference_len {
            return WholeStringScorer.score(reference, candidate);
        }

        let last_start = chars.len() - reference_len;
        let mut best = 0.0f64;
        for start in 0..=last_start {
            let on_boundary = start == 0 || chars[start - 1] == ' ' || start == last_start;
            if !on_boundary {
                continue;
            }
            let window: String = chars[start..start + reference_len].iter().collect();
            best = best.max(normalized_levenshtein(reference, &window));
            if best >= 1.0 {
                break;
            }
        }
        best
    }
}

/// Whole-string similarity after sorting the words of both sides, so word
/// order differences cost nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenSortScorer;

impl SimilarityScorer for TokenSortScorer {
    fn name(&self) -> &'static str {
        "token_sort"
    }

    fn score(&self, reference: &str, candidate: &str) -> f64 {
        WholeStringScorer.score(&sorted_tokens(reference), &sorted_tokens(candidate))
    }
}

fn sorted_tokens(text: &str) -> String {
    let mut tokens: Vec<&str> = text.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Highest score any of the given metrics assigns. `0.0` with no metrics.
pub fn best_score(scorers: &[Box<dyn SimilarityScorer>], reference: &str, candidate: &str) -> f64 {
    scorers
        .iter()
        .map(|s| s.score(reference, candidate))
        .fold(0.0, f64::max)
}

/// Metrics applied to a single transcribed segment.
pub fn single_segment_scorers() -> Vec<Box<dyn SimilarityScorer>> {
    vec![
        Box::new(WholeStringScorer),
        Box::new(PartialScorer),
        Box::new(TokenSortScorer),
    ]
}

/// Metrics applied to a window of concatenated segments.
pub fn window_scorers() -> Vec<Box<dyn SimilarityScorer>> {
    vec![Box::new(WholeStringScorer), Box::new(TokenSortScorer)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case::whole(Box::new(WholeStringScorer))]
    #[case::partial(Box::new(PartialScorer))]
    #[case::token_sort(Box::new(TokenSortScorer))]
    fn test_identical_strings_score_one(#[case] scorer: Box<dyn SimilarityScorer>) {
        assert_relative_eq!(scorer.score("hello world", "hello world"), 1.0);
    }

    #[rstest]
    #[case::whole(Box::new(WholeStringScorer))]
    #[case::partial(Box::new(PartialScorer))]
    #[case::token_sort(Box::new(TokenSortScorer))]
    fn test_empty_side_scores_zero(#[case] scorer: Box<dyn SimilarityScorer>) {
        assert_relative_eq!(scorer.score("", "hello"), 0.0);
        assert_relative_eq!(scorer.score("hello", ""), 0.0);
        assert_relative_eq!(scorer.score("", ""), 0.0);
    }

    #[rstest]
    #[case::whole(Box::new(WholeStringScorer))]
    #[case::partial(Box::new(PartialScorer))]
    #[case::token_sort(Box::new(TokenSortScorer))]
    fn test_scores_stay_in_unit_range(#[case] scorer: Box<dyn SimilarityScorer>) {
        let pairs = [
            ("abc", "xyz"),
            ("the quick brown fox", "fox"),
            ("a", "a much longer candidate string"),
            ("sing it loud", "sing it loud sing it proud"),
        ];
        for (a, b) in pairs {
            let s = scorer.score(a, b);
            assert!((0.0..=1.0).contains(&s), "{} gave {s} for {a:?}/{b:?}", scorer.name());
        }
    }

    #[test]
    fn test_whole_string_one_edit() {
        // One substitution over eleven characters
        assert_relative_eq!(
            WholeStringScorer.score("hello world", "hello wurld"),
            1.0 - 1.0 / 11.0
        );
    }

    #[test]
    fn test_partial_finds_line_inside_longer_segment() {
        let score = PartialScorer.score("goodbye now", "well goodbye now my friend");
        assert_relative_eq!(score, 1.0);
    }

    #[test]
    fn test_partial_gives_fragments_no_extra_credit() {
        let reference = "the quick brown fox jumps";
        let fragment = "the quick brown";
        assert_relative_eq!(
            PartialScorer.score(reference, fragment),
            WholeStringScorer.score(reference, fragment)
        );
        assert!(PartialScorer.score(reference, fragment) < 1.0);
    }

    #[test]
    fn test_partial_tolerates_typo_inside_window() {
        let score = PartialScorer.score("goodbye now", "oh goodbye naw baby");
        assert!(score > 0.9, "got {score}");
    }

    #[test]
    fn test_token_sort_ignores_word_order() {
        assert_relative_eq!(TokenSortScorer.score("world hello", "hello world"), 1.0);
        assert!(WholeStringScorer.score("world hello", "hello world") < 1.0);
    }

    #[test]
    fn test_best_score_takes_maximum() {
        let scorers = single_segment_scorers();
        let best = best_score(&scorers, "world hello", "hello world");
        assert_relative_eq!(best, 1.0);
    }

    #[test]
    fn test_best_score_without_scorers_is_zero() {
        assert_relative_eq!(best_score(&[], "a", "a"), 0.0);
    }

    #[test]
    fn test_window_scorers_exclude_partial() {
        let names: Vec<_> = window_scorers().iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["whole", "token_sort"]);
    }
}
