//! Completed operations and the bounded list that holds them.
//!
//! Entries are immutable once created. The list keeps the most recent
//! entry at the head and never grows past its limit.

use super::format::format_expression;
use super::operator::Operator;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of entries the ledger keeps by default.
pub const DEFAULT_HISTORY_LIMIT: usize = 5;

/// Record of a single completed operation.
///
/// The expression string is computed once at construction and stored,
/// so it survives persistence unchanged.
///
/// # Example
///
/// ```rust
/// use keycalc::core::{HistoryEntry, Operator};
/// use chrono::Utc;
///
/// let entry = HistoryEntry::new(1, Operator::Add, 5.0, Some(3.0), 8.0, Utc::now());
/// assert_eq!(entry.expression, "5 + 3 = 8");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Identifier, strictly increasing within a ledger
    pub id: u64,
    /// The operation performed
    pub operator: Operator,
    /// Left operand, or the radicand for square root
    pub operand1: f64,
    /// Right operand; absent for square root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operand2: Option<f64>,
    /// The value the provider returned
    pub result: f64,
    /// When the entry was created
    pub timestamp: DateTime<Utc>,
    /// Precomputed display string, e.g. `"5 + 3 = 8"`
    pub expression: String,
}

impl HistoryEntry {
    /// Create an entry, formatting its expression.
    pub fn new(
        id: u64,
        operator: Operator,
        operand1: f64,
        operand2: Option<f64>,
        result: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let operand2 = if operator.is_binary() { operand2 } else { None };
        Self {
            id,
            operator,
            operand1,
            operand2,
            result,
            timestamp,
            expression: format_expression(operator, operand1, operand2, result),
        }
    }
}

/// Most-recent-first list of entries, capped at a fixed size.
///
/// Like the rest of the core, `record` does not mutate: it returns a new
/// list with the entry at the head and the overflow dropped from the tail.
///
/// # Example
///
/// ```rust
/// use keycalc::core::{EntryList, HistoryEntry, Operator};
/// use chrono::Utc;
///
/// let list = EntryList::new(2);
/// let list = list.record(HistoryEntry::new(1, Operator::Add, 1.0, Some(1.0), 2.0, Utc::now()));
/// let list = list.record(HistoryEntry::new(2, Operator::Add, 2.0, Some(2.0), 4.0, Utc::now()));
/// let list = list.record(HistoryEntry::new(3, Operator::Add, 3.0, Some(3.0), 6.0, Utc::now()));
///
/// let ids: Vec<u64> = list.entries().iter().map(|e| e.id).collect();
/// assert_eq!(ids, vec![3, 2]);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct EntryList {
    entries: Vec<HistoryEntry>,
    limit: usize,
}

impl Default for EntryList {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl EntryList {
    /// Create an empty list holding at most `limit` entries.
    pub fn new(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            limit,
        }
    }

    /// Build a list from entries already ordered most-recent-first.
    /// Anything beyond the limit is dropped from the tail.
    pub fn from_entries(mut entries: Vec<HistoryEntry>, limit: usize) -> Self {
        entries.truncate(limit);
        Self { entries, limit }
    }

    /// Return a new list with `entry` at the head.
    pub fn record(&self, entry: HistoryEntry) -> Self {
        let mut entries = Vec::with_capacity(self.limit.min(self.entries.len() + 1));
        entries.push(entry);
        entries.extend(self.entries.iter().cloned());
        entries.truncate(self.limit);
        Self {
            entries,
            limit: self.limit,
        }
    }

    /// Return an empty list with the same limit.
    pub fn cleared(&self) -> Self {
        Self::new(self.limit)
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// The most recent entry.
    pub fn first(&self) -> Option<&HistoryEntry> {
        self.entries.first()
    }

    /// Highest identifier in the list.
    pub fn max_id(&self) -> Option<u64> {
        self.entries.iter().map(|e| e.id).max()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}
