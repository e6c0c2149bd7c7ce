//! Input extraction and normalization
//!
//! Stateless pure functions that turn free-text answers into typed values.
//! Matching is deliberately simple - ordered substring rules where the
//! first match wins - so behavior stays deterministic and testable.
//! Misses return None/empty; callers re-ask the same step.

use regex::Regex;
use sessionstore::{ActivityLevel, Sex};
use std::sync::LazyLock;

static DIGIT_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("digit-run regex"));

static LIST_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,;]|\s+e\s+|\s+ou\s+").expect("list-separator regex"));

/// Answers that mean "none of those" for the list questions
const NONE_TOKENS: [&str; 4] = ["nenhuma", "nenhum", "não", "não tenho"];

/// Words dropped from split lists when they appear as standalone items
const BARE_CONJUNCTIONS: [&str; 3] = ["e", "ou", "também"];

/// Extract the first run of decimal digits as a base-10 integer.
///
/// The first run wins: "altura 1.75m" yields 1, decimals are truncated and
/// signs ignored. A run that overflows the integer type also yields None.
pub fn extract_number(text: &str) -> Option<u32> {
    DIGIT_RUN.find(text).and_then(|m| m.as_str().parse().ok())
}

/// Extract a sex/gender answer by ordered synonym matching
pub fn extract_sex(text: &str) -> Option<Sex> {
    let normalized = text.to_lowercase();

    if ["masc", "homem", "menino"].iter().any(|s| normalized.contains(s)) {
        return Some(Sex::Masculino);
    }
    if ["fem", "mulher", "menina"].iter().any(|s| normalized.contains(s)) {
        return Some(Sex::Feminino);
    }
    if ["outro", "não binário", "nb"].iter().any(|s| normalized.contains(s)) {
        return Some(Sex::Outro);
    }

    None
}

/// Extract an activity level answer by ordered synonym matching
pub fn extract_activity_level(text: &str) -> Option<ActivityLevel> {
    let normalized = text.to_lowercase();

    if ["sedent", "nenhum", "pouco"].iter().any(|s| normalized.contains(s)) {
        return Some(ActivityLevel::Sedentario);
    }
    if ["leve", "1-3", "pouco exerc"].iter().any(|s| normalized.contains(s)) {
        return Some(ActivityLevel::Leve);
    }
    if ["moderad", "3-5", "regular"].iter().any(|s| normalized.contains(s)) {
        return Some(ActivityLevel::Moderado);
    }
    if ["intens", "pesado", "6-7", "muito"].iter().any(|s| normalized.contains(s)) {
        return Some(ActivityLevel::Intenso);
    }

    None
}

/// Extract a list of items from a free-text answer.
///
/// A "none" answer yields an empty list. Otherwise the text splits on
/// commas, semicolons, and the conjunctions " e "/" ou "; pieces keep
/// their original order and case.
pub fn extract_list(text: &str) -> Vec<String> {
    let normalized = text.trim().to_lowercase();
    if NONE_TOKENS.contains(&normalized.as_str()) {
        return Vec::new();
    }

    LIST_SEPARATOR
        .split(text)
        .map(str::trim)
        .filter(|item| !item.is_empty() && !BARE_CONJUNCTIONS.contains(&item.to_lowercase().as_str()))
        .map(str::to_string)
        .collect()
}
