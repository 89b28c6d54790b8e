//! Append-only completion history with single-step undo.
//!
//! An ordered log with tail removal; completion order is chronological
//! and independent of queue priority.

use serde::Serialize;

use crate::ticket::Ticket;
use crate::types::Timestamp;

/// Full ticket snapshot taken at the moment of completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionRecord {
    pub ticket: Ticket,
    pub completed_at: Timestamp,
}

/// The completion ledger of one workspace, oldest record first.
#[derive(Debug, Default)]
pub struct CompletionLog {
    records: Vec<CompletionRecord>,
}

impl CompletionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore a ledger from persisted records already in ascending
    /// completion order.
    pub fn from_records(records: Vec<CompletionRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// O(1) tail append, preserving strict completion order.
    pub fn append(&mut self, record: CompletionRecord) {
        self.records.push(record);
    }

    /// The most recent completion, if any.
    pub fn last(&self) -> Option<&CompletionRecord> {
        self.records.last()
    }

    /// Remove and return the most recent completion (the undo step).
    pub fn pop_last(&mut self) -> Option<CompletionRecord> {
        self.records.pop()
    }

    /// All records, ascending completion order.
    pub fn records(&self) -> &[CompletionRecord] {
        &self.records
    }

    /// Whether any record holds the given ticket id. Used by the
    /// load-time corruption check against the active queue.
    pub fn contains_ticket(&self, ticket_id: crate::types::DbId) -> bool {
        self.records.iter().any(|r| r.ticket.id == ticket_id)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    fn record(id: i64, minute: i64) -> CompletionRecord {
        let admitted = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        CompletionRecord {
            ticket: Ticket {
                id,
                workspace_id: 1,
                dish_id: 3,
                dish_name: "Garlic Bread".to_string(),
                prep_time_minutes: 4,
                ingredients: vec!["Gluten".to_string(), "Garlic".to_string()],
                quantity: 1,
                table_number: 2,
                is_vip: false,
                requested_allergies: Vec::new(),
                admitted_at: admitted,
                admission_sequence: id,
                calculated_start_time: admitted + Duration::minutes(4),
            },
            completed_at: admitted + Duration::minutes(minute),
        }
    }

    #[test]
    fn append_keeps_completion_order() {
        let mut log = CompletionLog::new();
        log.append(record(1, 5));
        log.append(record(2, 7));
        log.append(record(3, 6));

        let ids: Vec<i64> = log.records().iter().map(|r| r.ticket.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn pop_last_reverses_the_most_recent_entry_only() {
        let mut log = CompletionLog::new();
        log.append(record(1, 5));
        log.append(record(2, 7));

        let popped = log.pop_last().expect("two records present");
        assert_eq!(popped.ticket.id, 2);
        assert_eq!(log.len(), 1);
        assert_eq!(log.last().map(|r| r.ticket.id), Some(1));
    }

    #[test]
    fn pop_on_empty_log_is_none() {
        let mut log = CompletionLog::new();
        assert!(log.pop_last().is_none());
    }

    #[test]
    fn contains_ticket_scans_all_records() {
        let log = CompletionLog::from_records(vec![record(4, 1), record(9, 2)]);
        assert!(log.contains_ticket(9));
        assert!(!log.contains_ticket(5));
    }
}
