//! Keyword interpreter: turns free text into an [`Intent`].
//!
//! Matching is plain substring search over the lower-cased query. Dataset and
//! action come from ordered decision tables where the first matching rule
//! wins; state and crop come from fixed vocabularies where the last matching
//! entry wins.

use crate::dataset::Dataset;
use crate::intent::{Action, Filters, Intent};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

/// A keyword predicate over the lower-cased query.
#[derive(Debug, Clone, Copy)]
pub enum KeywordMatch {
    Any(&'static [&'static str]),
    All(&'static [&'static str]),
}

impl KeywordMatch {
    pub fn matches(&self, text: &str) -> bool {
        match self {
            KeywordMatch::Any(words) => words.iter().any(|w| text.contains(w)),
            KeywordMatch::All(words) => words.iter().all(|w| text.contains(w)),
        }
    }
}

/// Dataset rules in priority order. The last rule can never fire because any
/// text containing "crop" already matched the second one; it is kept so the
/// table stays a faithful record of the keyword priority.
pub const DATASET_RULES: &[(KeywordMatch, Dataset)] = &[
    (KeywordMatch::Any(&["rain", "imd"]), Dataset::Rainfall),
    (KeywordMatch::Any(&["crop", "production", "yield"]), Dataset::Crop),
    (KeywordMatch::All(&["rainfall", "crop"]), Dataset::Merged),
];

/// Action rules in priority order; no match means [`Action::General`].
pub const ACTION_RULES: &[(KeywordMatch, Action)] = &[
    (KeywordMatch::Any(&["compare"]), Action::Compare),
    (KeywordMatch::Any(&["top"]), Action::Top),
    (KeywordMatch::Any(&["trend", "year", "over time"]), Action::Trend),
    (KeywordMatch::Any(&["average", "mean"]), Action::Average),
    (KeywordMatch::Any(&["max", "highest"]), Action::Max),
    (KeywordMatch::Any(&["min", "lowest"]), Action::Min),
];

pub const STATES: [&str; 15] = [
    "uttar pradesh",
    "madhya pradesh",
    "maharashtra",
    "tamil nadu",
    "karnataka",
    "bihar",
    "gujarat",
    "west bengal",
    "andhra pradesh",
    "rajasthan",
    "kerala",
    "punjab",
    "haryana",
    "odisha",
    "jharkhand",
];

pub const CROPS: [&str; 7] = [
    "rice",
    "wheat",
    "sugarcane",
    "maize",
    "cotton",
    "pulses",
    "millets",
];

lazy_static! {
    static ref YEAR_RE: Regex = Regex::new(r"\b(?:19|20)[0-9]{2}\b").unwrap();
}

/// Interpret a question. Total over all inputs: text that matches nothing
/// yields an intent with no dataset, no filters and [`Action::General`].
pub fn interpret(text: &str) -> Intent {
    let query = text.to_lowercase();

    let dataset = first_match(DATASET_RULES, &query);
    let action = first_match(ACTION_RULES, &query).unwrap_or(Action::General);
    let filters = Filters {
        state: last_mention(&STATES, &query),
        crop: last_mention(&CROPS, &query),
        years: extract_years(&query),
    };

    let intent = Intent::new(dataset, action, filters);
    debug!("Interpreted {:?} as {:?}", text, intent);
    intent
}

fn first_match<T: Copy>(rules: &[(KeywordMatch, T)], query: &str) -> Option<T> {
    rules
        .iter()
        .find(|(rule, _)| rule.matches(query))
        .map(|(_, value)| *value)
}

/// Scan the whole vocabulary; every hit overwrites the previous one.
fn last_mention(vocabulary: &[&str], query: &str) -> Option<String> {
    vocabulary
        .iter()
        .filter(|term| query.contains(*term))
        .last()
        .map(|term| title_case(term))
}

/// Every 19xx/20xx token, in order of appearance, duplicates kept.
pub fn extract_years(query: &str) -> Vec<i32> {
    YEAR_RE
        .find_iter(query)
        .filter_map(|m| m.as_str().parse().ok())
        .collect()
}

/// Upper-case the first letter of each word, lower-case the rest.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_is_letter = false;
    for c in s.chars() {
        if prev_is_letter {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        prev_is_letter = c.is_alphabetic();
    }
    out
}
