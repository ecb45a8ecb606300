//! Query matching and ranking over the command catalog.

use std::cmp::Ordering;
use std::ops::Range;

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use serde::{Deserialize, Serialize};

use crate::state::{CommandDescriptor, MatchResult};

/// Outcome of matching one candidate against a query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StringMatch {
    pub score: i64,
    pub ranges: Vec<Range<usize>>,
}

/// Scores a display name against the filter text. Higher is better.
pub trait StringMatcher {
    fn string_match(&self, candidate: &str, query: &str) -> Option<StringMatch>;
}

/// Fuzzy subsequence matching (skim v2 scoring), case-insensitive.
pub struct SkimStringMatcher {
    inner: SkimMatcherV2,
}

impl Default for SkimStringMatcher {
    fn default() -> Self {
        Self { inner: SkimMatcherV2::default().ignore_case() }
    }
}

impl StringMatcher for SkimStringMatcher {
    fn string_match(&self, candidate: &str, query: &str) -> Option<StringMatch> {
        if query.is_empty() {
            return Some(StringMatch { score: 0, ranges: Vec::new() });
        }
        self.inner
            .fuzzy_indices(candidate, query)
            .map(|(score, indices)| StringMatch { score, ranges: index_ranges(&indices) })
    }
}

/// Case-insensitive substring containment. Every hit scores the same, so
/// ordering falls back to the name.
#[derive(Clone, Copy, Debug, Default)]
pub struct SubstringMatcher;

impl StringMatcher for SubstringMatcher {
    fn string_match(&self, candidate: &str, query: &str) -> Option<StringMatch> {
        let hay: Vec<char> = candidate.chars().collect();
        let needle: Vec<char> = query.chars().collect();
        if needle.is_empty() {
            return Some(StringMatch { score: 0, ranges: Vec::new() });
        }
        if needle.len() > hay.len() {
            return None;
        }
        (0..=hay.len() - needle.len())
            .find(|&start| {
                hay[start..start + needle.len()]
                    .iter()
                    .zip(&needle)
                    .all(|(a, b)| chars_eq_ignore_case(*a, *b))
            })
            .map(|start| StringMatch { score: 0, ranges: vec![start..start + needle.len()] })
    }
}

fn chars_eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatcherKind {
    #[default]
    Fuzzy,
    Substring,
}

impl MatcherKind {
    pub fn build(self) -> Box<dyn StringMatcher> {
        match self {
            MatcherKind::Fuzzy => Box::new(SkimStringMatcher::default()),
            MatcherKind::Substring => Box::new(SubstringMatcher),
        }
    }
}

/// Collapse sorted char indices into contiguous ranges.
pub fn index_ranges(indices: &[usize]) -> Vec<Range<usize>> {
    let mut ranges: Vec<Range<usize>> = Vec::new();
    for &i in indices {
        match ranges.last_mut() {
            Some(last) if last.end == i => last.end = i + 1,
            _ => ranges.push(i..i + 1),
        }
    }
    ranges
}

/// The query text after the trigger, or `None` if the trigger is absent.
pub fn strip_trigger(query: &str, trigger: char) -> Option<&str> {
    query.strip_prefix(trigger)
}

/// Filter `commands` by `filter` and order best match first.
///
/// An empty filter keeps every command (browse mode). Ties on score are
/// broken by case-insensitive name, then by id.
pub fn rank(
    commands: &[CommandDescriptor],
    filter: &str,
    matcher: &dyn StringMatcher,
) -> Vec<MatchResult> {
    // Surrounding whitespace is not filter text, so "? " still browses.
    let filter = filter.trim();
    let mut results: Vec<MatchResult> = commands
        .iter()
        .filter_map(|c| {
            let hit = if filter.is_empty() {
                StringMatch { score: 0, ranges: Vec::new() }
            } else {
                matcher.string_match(&c.name, filter)?
            };
            Some(MatchResult {
                id: c.id.clone(),
                name: c.name.clone(),
                score: hit.score,
                matched_ranges: hit.ranges,
            })
        })
        .collect();
    results.sort_by(compare_results);
    results
}

fn compare_results(a: &MatchResult, b: &MatchResult) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.id.cmp(&b.id))
}
