//! Palette data: command descriptors, the cached catalog, match results.

use std::ops::Range;

use serde::Serialize;

/// One host command eligible for palette search.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CommandDescriptor {
    pub id: String,
    pub name: String,
}

/// Commands deemed safe to invoke with no arguments, in registry order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<CommandDescriptor>,
}

impl Catalog {
    pub fn new(entries: Vec<CommandDescriptor>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[CommandDescriptor] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|c| c.id == id)
    }
}

/// A scored candidate for one query evaluation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    pub id: String,
    pub name: String,
    pub score: i64,
    /// Char ranges within `name` matched by the query, ascending and disjoint.
    pub matched_ranges: Vec<Range<usize>>,
}
