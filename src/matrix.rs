//! Flat odds entries and the pivot into a runner × bookkeeper matrix.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// One odds quote: what `bookkeeper` currently offers for `runner`.
///
/// Wire shape matches the snapshot endpoint exactly (`fixedP`/`fixedW` are
/// produced at one-decimal precision upstream). Entries are immutable once
/// received; a new poll replaces the whole collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OddsEntry {
    pub runner: String,
    pub bookkeeper: String,
    pub fixed_p: f64,
    pub fixed_w: f64,
}

/// A snapshot pivoted into row-major, column-indexed lookup form.
///
/// `runners` and `bookkeepers` preserve first-seen order across the entry
/// list; that order is observable (it is the unsorted column order) and is
/// not alphabetical.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OddsMatrix {
    pub runners: Vec<String>,
    pub bookkeepers: Vec<String>,
    cells: HashMap<String, HashMap<String, OddsEntry>>,
}

impl OddsMatrix {
    /// Looks up the entry for a (runner, bookkeeper) pair. A missing cell is
    /// a valid "no data" state, not an error.
    pub fn cell(&self, runner: &str, bookkeeper: &str) -> Option<&OddsEntry> {
        self.cells.get(runner).and_then(|row| row.get(bookkeeper))
    }

    pub fn is_empty(&self) -> bool {
        self.runners.is_empty()
    }

    pub fn cell_count(&self) -> usize {
        self.cells.values().map(HashMap::len).sum()
    }
}

/// Pivots a flat snapshot into an [`OddsMatrix`] in a single pass.
///
/// If two entries share a (runner, bookkeeper) pair, the later one wins
/// silently.
pub fn build_matrix(entries: &[OddsEntry]) -> OddsMatrix {
    let mut runners = Vec::new();
    let mut bookkeepers = Vec::new();
    let mut seen_runners: HashSet<&str> = HashSet::new();
    let mut seen_bookkeepers: HashSet<&str> = HashSet::new();
    let mut cells: HashMap<String, HashMap<String, OddsEntry>> = HashMap::new();

    for entry in entries {
        if seen_runners.insert(&entry.runner) {
            runners.push(entry.runner.clone());
        }
        if seen_bookkeepers.insert(&entry.bookkeeper) {
            bookkeepers.push(entry.bookkeeper.clone());
        }
        cells
            .entry(entry.runner.clone())
            .or_default()
            .insert(entry.bookkeeper.clone(), entry.clone());
    }

    OddsMatrix {
        runners,
        bookkeepers,
        cells,
    }
}
