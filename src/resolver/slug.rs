//! Slug heuristics for recovering dead article URLs
//!
//! Generated citations often point at a plausible but wrong slug
//! (`/easy-ukranian-borscht-recipes/` instead of `/borscht/`). These helpers
//! derive nearby slugs to probe and score search results against the words of
//! the requested path.

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

use crate::utils::MAX_SLUG_CANDIDATES;

/// Words that decorate a slug without identifying the page
const STOP_WORDS: &[&str] = &[
    "easy", "best", "quick", "simple", "classic", "authentic", "healthy", "keto", "low",
    "low-carb", "gluten", "gluten-free", "vegan", "vegetarian", "paleo", "dairy-free", "spicy",
    "russian", "italian", "mexican", "thai", "greek", "indian", "recipe", "recipes", "with", "and",
    "or", "the", "a", "an", "to", "of", "on", "in",
];

/// Misspellings the generator is known to produce in slugs
const TYPO_CORRECTIONS: &[(&str, &str)] = &[("ukranian", "ukrainian")];

/// Minimum token length that counts toward a match score
const MIN_SCORED_TOKEN_LEN: usize = 3;

static NON_SLUG_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9/-]+").expect("slug character class is valid"));

fn is_stop_word(token: &str) -> bool {
    STOP_WORDS
        .iter()
        .any(|stop| stop.eq_ignore_ascii_case(token))
}

fn correct_typo(token: &str) -> &str {
    TYPO_CORRECTIONS
        .iter()
        .find(|(wrong, _)| *wrong == token)
        .map_or(token, |(_, right)| *right)
}

/// Meaningful lowercase words of a URL path, used as site-search terms
///
/// Every run of characters outside `[a-z0-9/-]` becomes a separator, known
/// typos are corrected, and stop words and purely numeric tokens are dropped.
#[must_use]
pub fn path_tokens(path: &str) -> Vec<String> {
    let lowered = path.to_lowercase();
    let cleaned = NON_SLUG_CHARS.replace_all(&lowered, "-");
    cleaned
        .split(['/', '-'])
        .filter(|token| !token.is_empty())
        .map(correct_typo)
        .filter(|token| !is_stop_word(token) && !token.bytes().all(|b| b.is_ascii_digit()))
        .map(str::to_string)
        .collect()
}

/// Alternative slugs for the last segment of `path`, most specific first
///
/// 1. the segment without stop words
/// 2. the same with a trailing plural singularized
/// 3. the full segment without its first word
///
/// Duplicates are removed and at most three candidates are returned.
#[must_use]
pub fn slug_candidates(path: &str) -> Vec<String> {
    let Some(last) = path.split('/').rev().find(|segment| !segment.is_empty()) else {
        return Vec::new();
    };

    let tokens: Vec<&str> = last.split('-').filter(|t| !t.is_empty()).collect();
    let filtered: Vec<&str> = tokens.iter().copied().filter(|t| !is_stop_word(t)).collect();

    let mut candidates: Vec<String> = Vec::with_capacity(MAX_SLUG_CANDIDATES);
    let mut push = |candidate: String| {
        if !candidate.is_empty() && !candidates.contains(&candidate) {
            candidates.push(candidate);
        }
    };

    if let Some((last_token, head)) = filtered.split_last() {
        push(filtered.join("-"));
        if let Some(singular) = last_token.strip_suffix('s') {
            let mut words: Vec<&str> = head.to_vec();
            words.push(singular);
            push(words.join("-"));
        }
    }
    if tokens.len() > 1 {
        push(tokens[1..].join("-"));
    }

    candidates.truncate(MAX_SLUG_CANDIDATES);
    candidates
}

/// Number of meaningful tokens contained in `text` (case-insensitive)
#[must_use]
pub fn score_text(text: &str, tokens: &[String]) -> usize {
    let haystack = text.to_lowercase();
    tokens
        .iter()
        .filter(|token| token.len() >= MIN_SCORED_TOKEN_LEN && haystack.contains(token.as_str()))
        .count()
}

/// Highest-scoring candidate by path token overlap, with its score
///
/// Candidates are resolved against `base`; unparseable ones are skipped. Ties
/// keep the first candidate encountered.
#[must_use]
pub fn pick_best_by_tokens(
    candidates: &[String],
    tokens: &[String],
    base: &Url,
) -> Option<(String, usize)> {
    let mut best: Option<(String, usize)> = None;
    for candidate in candidates {
        let Ok(resolved) = base.join(candidate) else {
            continue;
        };
        let score = score_text(resolved.path(), tokens);
        if best.as_ref().is_none_or(|(_, best_score)| score > *best_score) {
            best = Some((resolved.to_string(), score));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_tokens_drop_noise_and_fix_typos() {
        assert_eq!(
            path_tokens("/2023/05/Easy-Ukranian-Borscht_Recipe/"),
            vec!["ukrainian", "borscht"]
        );
    }

    #[test]
    fn slug_candidates_follow_fixed_order() {
        assert_eq!(
            slug_candidates("/blog/easy-chicken-dumplings/"),
            vec!["chicken-dumplings", "chicken-dumpling"]
        );
        assert_eq!(
            slug_candidates("/classic-beef-stew"),
            vec!["beef-stew"]
        );
        assert_eq!(
            slug_candidates("/lemon-bars-recipe"),
            vec!["lemon-bars", "lemon-bar", "bars-recipe"]
        );
    }

    #[test]
    fn slug_candidates_for_single_stop_word_segment() {
        assert!(slug_candidates("/recipes/").is_empty());
        assert!(slug_candidates("/").is_empty());
    }

    #[test]
    fn scoring_ignores_short_tokens() {
        let tokens = vec!["ox".to_string(), "tail".to_string(), "soup".to_string()];
        assert_eq!(score_text("/recipe/oxtail-soup-123", &tokens), 2);
    }

    #[test]
    fn ties_keep_first_candidate() {
        let base = Url::parse("https://site.example/").expect("valid base");
        let tokens = vec!["borscht".to_string()];
        let candidates = vec![
            "/a/borscht-one".to_string(),
            "/b/borscht-two".to_string(),
            "/c/other".to_string(),
        ];
        assert_eq!(
            pick_best_by_tokens(&candidates, &tokens, &base),
            Some(("https://site.example/a/borscht-one".to_string(), 1))
        );
    }
}
