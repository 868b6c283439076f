//! Lexical analysis - tokenization, keyword extraction, affect detection,
//! and expression style classification.
//!
//! Every overlap metric in the engine runs over tokens produced by
//! [`tokenize`]; keeping one tokenizer avoids drift between near-duplicate
//! heuristics.

use thought_store::{Affect, ExpressionStyle};

/// Maximum number of keywords cached on a thought.
pub const MAX_KEYWORDS: usize = 5;

/// Minimum token length for keyword candidacy. Shorter tokens are noise.
const MIN_KEYWORD_LEN: usize = 4;

/// Fixed stop-word set. Only words longer than three characters matter here,
/// since shorter tokens are dropped by the length rule anyway.
const STOP_WORDS: &[&str] = &[
    "that", "this", "with", "from", "have", "what", "when", "where", "which",
    "will", "would", "could", "should", "there", "their", "they", "them",
    "then", "than", "because", "been", "being", "were", "into", "just",
    "like", "some", "such", "very", "really", "thing", "things",
];

/// Trigger tables for affect detection. A thought may carry several affects.
const AFFECT_TRIGGERS: &[(Affect, &[&str])] = &[
    (
        Affect::Joy,
        &["happy", "joy", "grateful", "excited", "delight", "glad", "love"],
    ),
    (
        Affect::Sadness,
        &["sad", "grief", "lonely", "loss", "miss", "sorrow", "cry"],
    ),
    (
        Affect::Anger,
        &["angry", "anger", "frustrat", "rage", "resent", "annoy", "furious"],
    ),
    (
        Affect::Fear,
        &["afraid", "anxious", "anxiety", "fear", "worry", "scared", "nervous", "dread"],
    ),
    (
        Affect::Curiosity,
        &["wonder", "curious", "intrigu", "fascinat", "what if"],
    ),
    (
        Affect::Calm,
        &["calm", "peace", "still", "serene", "settled"],
    ),
    (
        Affect::Hope,
        &["hope", "trust", "faith", "believe"],
    ),
];

/// Lowercase, whitespace-split tokens with non-alphanumeric edges trimmed.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(|t| t.trim_matches(|c: char| !c.is_alphanumeric()).to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Extract up to [`MAX_KEYWORDS`] keywords from text.
///
/// Drops stop words, tokens shorter than four characters, and pure-numeric
/// tokens; preserves first-occurrence order and deduplicates.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let mut keywords: Vec<String> = Vec::new();
    for token in tokenize(text) {
        if token.len() < MIN_KEYWORD_LEN {
            continue;
        }
        if token.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        if STOP_WORDS.contains(&token.as_str()) {
            continue;
        }
        if keywords.contains(&token) {
            continue;
        }
        keywords.push(token);
        if keywords.len() == MAX_KEYWORDS {
            break;
        }
    }
    keywords
}

/// Detect emotional tones via case-insensitive substring triggers.
///
/// Returns `[Neutral]` when no trigger matches. Deterministic: affects come
/// back in trigger-table order, deduplicated.
pub fn detect_affect(text: &str) -> Vec<Affect> {
    let lowered = text.to_lowercase();
    let mut affects: Vec<Affect> = AFFECT_TRIGGERS
        .iter()
        .filter(|(_, triggers)| triggers.iter().any(|t| lowered.contains(t)))
        .map(|(affect, _)| *affect)
        .collect();

    if affects.is_empty() {
        affects.push(Affect::Neutral);
    }
    affects
}

/// Classify how a thought is voiced. First matching rule wins, in priority
/// order: questioning, affirming, negating, exploring, concluding, neutral.
pub fn classify_expression_style(text: &str) -> ExpressionStyle {
    let lowered = text.to_lowercase();

    if lowered.contains('?') {
        return ExpressionStyle::Questioning;
    }
    if ["i am ", "i can ", "i will "]
        .iter()
        .any(|m| lowered.contains(m))
    {
        return ExpressionStyle::Affirming;
    }
    if ["not ", "never", "can't", "cannot", "won't", "don't"]
        .iter()
        .any(|m| lowered.contains(m))
    {
        return ExpressionStyle::Negating;
    }
    if ["maybe", "perhaps", "might", "possibly", "wonder"]
        .iter()
        .any(|m| lowered.contains(m))
    {
        return ExpressionStyle::Exploring;
    }
    if ["therefore", "realize", "realise", "conclude", "in the end", "so now"]
        .iter()
        .any(|m| lowered.contains(m))
    {
        return ExpressionStyle::Concluding;
    }
    ExpressionStyle::Neutral
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_lowercases_and_trims() {
        let tokens = tokenize("The Tide, pulls... BACK!");
        assert_eq!(tokens, vec!["the", "tide", "pulls", "back"]);
    }

    #[test]
    fn test_tokenize_drops_pure_punctuation() {
        assert!(tokenize("... ?! --").is_empty());
    }

    #[test]
    fn test_extract_keywords_keeps_topic_words() {
        // "about" is deliberately not a stop word here.
        let keywords = extract_keywords("I feel anxious about change");
        assert_eq!(keywords, vec!["feel", "anxious", "about", "change"]);
    }

    #[test]
    fn test_extract_keywords_filters() {
        let keywords = extract_keywords("the cat sat at 1234 with that thing");
        // "cat"/"sat"/"at" too short, "1234" numeric, "the"/"with"/"that"/"thing" stopped.
        assert!(keywords.is_empty());
    }

    #[test]
    fn test_extract_keywords_caps_and_dedupes() {
        let keywords =
            extract_keywords("water water stone river cloud mountain forest valley");
        assert_eq!(keywords.len(), MAX_KEYWORDS);
        assert_eq!(keywords[0], "water");
        assert_eq!(
            keywords,
            vec!["water", "stone", "river", "cloud", "mountain"]
        );
    }

    #[test]
    fn test_detect_affect_fear() {
        let affects = detect_affect("I feel anxious about change");
        assert!(affects.contains(&Affect::Fear));
        assert!(!affects.contains(&Affect::Neutral));
    }

    #[test]
    fn test_detect_affect_multiple() {
        let affects = detect_affect("grateful but a little worried");
        assert_eq!(affects, vec![Affect::Joy, Affect::Fear]);
    }

    #[test]
    fn test_detect_affect_neutral_fallback() {
        assert_eq!(detect_affect("the chair is in the corner"), vec![Affect::Neutral]);
    }

    #[test]
    fn test_expression_style_priority() {
        assert_eq!(
            classify_expression_style("am I not enough?"),
            ExpressionStyle::Questioning
        );
        assert_eq!(
            classify_expression_style("I am learning to rest"),
            ExpressionStyle::Affirming
        );
        assert_eq!(
            classify_expression_style("it is not working"),
            ExpressionStyle::Negating
        );
        assert_eq!(
            classify_expression_style("maybe it passes"),
            ExpressionStyle::Exploring
        );
        assert_eq!(
            classify_expression_style("I realize it was the job all along"),
            ExpressionStyle::Concluding
        );
        assert_eq!(
            classify_expression_style("the sky is grey"),
            ExpressionStyle::Neutral
        );
    }
}
