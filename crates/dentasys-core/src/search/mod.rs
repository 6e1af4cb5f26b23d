//! Global search across doctors, patients and records.
//!
//! Storage does the filtering (`LIKE` substring match); results are then
//! ranked here so exact and prefix matches come first, followed by the
//! closest names by fuzzy similarity.

mod debounce;

pub use debounce::*;

use serde::{Deserialize, Serialize};
use strsim::{jaro_winkler, normalized_levenshtein};

use crate::db::{Database, DbResult};
use crate::models::{Doctor, Patient, RecordSummary};

/// Order `items` by how well `key` matches `term`.
///
/// Exact matches first, then prefix matches, then the rest by similarity.
/// Ties keep their incoming order.
pub fn rank_by_similarity<T, F>(items: Vec<T>, term: &str, key: F) -> Vec<T>
where
    F: Fn(&T) -> &str,
{
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return items;
    }

    let mut scored: Vec<(f64, T)> = items
        .into_iter()
        .map(|item| (match_score(&key(&item).to_lowercase(), &term), item))
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored.into_iter().map(|(_, item)| item).collect()
}

fn match_score(candidate: &str, term: &str) -> f64 {
    let tier = if candidate == term {
        2.0
    } else if candidate.starts_with(term) {
        1.0
    } else {
        0.0
    };
    tier + fuzzy_match(candidate, term)
}

/// Combined similarity in 0..=1.
fn fuzzy_match(a: &str, b: &str) -> f64 {
    // Jaro-Winkler favours shared prefixes, Levenshtein overall edit distance
    let jw = jaro_winkler(a, b);
    let lev = normalized_levenshtein(a, b);
    jw * 0.6 + lev * 0.4
}

/// Results of a global search.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchResults {
    pub doctors: Vec<Doctor>,
    pub patients: Vec<Patient>,
    pub records: Vec<RecordSummary>,
}

impl SearchResults {
    /// Number of matches across all entity kinds.
    pub fn total(&self) -> usize {
        self.doctors.len() + self.patients.len() + self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Runs one search term against every entity kind.
pub struct Searcher<'a> {
    db: &'a Database,
}

impl<'a> Searcher<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Search everything. An empty term lists all active doctors and
    /// patients and every record.
    pub fn search(&self, term: &str) -> DbResult<SearchResults> {
        let results = SearchResults {
            doctors: self.db.search_doctors(term)?,
            patients: self.db.search_patients(term)?,
            records: self.db.search_records(term)?,
        };
        tracing::debug!(term, total = results.total(), "search");
        Ok(results)
    }
}
