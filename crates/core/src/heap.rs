//! Per-workspace priority queue with arbitrary-id removal.
//!
//! An array-backed binary min-heap ordered by [`PriorityKey`], paired
//! with an id→index side table that is updated on every swap. The side
//! table is what turns "remove an arbitrary ticket" from an O(n) scan
//! into an O(log n) swap-with-last + sift, which matters because staff
//! routinely complete tickets out of priority order.

use std::collections::{HashMap, HashSet};

use crate::ticket::Ticket;
use crate::types::DbId;

/// Corruption detected while building a queue from persisted rows.
///
/// Any of these means the stored rows cannot represent a valid queue;
/// the owning workspace must refuse to serve rather than guess.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueueCorruption {
    #[error("duplicate ticket id {0} in queued rows")]
    DuplicateTicketId(DbId),

    #[error("duplicate admission sequence {0} in queued rows")]
    DuplicateSequence(i64),
}

/// The active queue of one workspace.
///
/// Invariant: for every slot `i > 0`,
/// `slots[(i - 1) / 2].priority_key() <= slots[i].priority_key()`, and
/// `index[slots[i].id] == i` for all slots. Both are maintained by every
/// insertion and removal.
#[derive(Debug, Default)]
pub struct TicketHeap {
    slots: Vec<Ticket>,
    index: HashMap<DbId, usize>,
}

impl TicketHeap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a queue from unordered persisted rows, detecting
    /// corruption (duplicate ids, duplicate admission sequences).
    pub fn rebuild(rows: Vec<Ticket>) -> Result<Self, QueueCorruption> {
        let mut sequences = HashSet::with_capacity(rows.len());
        let mut heap = Self::new();
        for ticket in rows {
            if !sequences.insert(ticket.admission_sequence) {
                return Err(QueueCorruption::DuplicateSequence(
                    ticket.admission_sequence,
                ));
            }
            heap.insert(ticket)?;
        }
        Ok(heap)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn contains(&self, id: DbId) -> bool {
        self.index.contains_key(&id)
    }

    /// Look up a queued ticket by id without touching the ordering.
    pub fn get(&self, id: DbId) -> Option<&Ticket> {
        self.index.get(&id).map(|&pos| &self.slots[pos])
    }

    /// The most urgent ticket, if any.
    pub fn peek(&self) -> Option<&Ticket> {
        self.slots.first()
    }

    /// Largest admission sequence currently queued. Used to seed the
    /// per-workspace counter after a rebuild.
    pub fn max_sequence(&self) -> Option<i64> {
        self.slots.iter().map(|t| t.admission_sequence).max()
    }

    /// Insert a ticket, sifting it up to its position. O(log n).
    pub fn insert(&mut self, ticket: Ticket) -> Result<(), QueueCorruption> {
        if self.index.contains_key(&ticket.id) {
            return Err(QueueCorruption::DuplicateTicketId(ticket.id));
        }
        let pos = self.slots.len();
        self.index.insert(ticket.id, pos);
        self.slots.push(ticket);
        self.sift_up(pos);
        Ok(())
    }

    /// Remove a ticket by id. O(log n). Returns `None` when the id is
    /// not queued (already completed, or never admitted here).
    ///
    /// The target is swapped with the last slot, the array truncated,
    /// and the swapped-in ticket sifted up or down from the vacated
    /// position; the side table tracks every move.
    pub fn remove(&mut self, id: DbId) -> Option<Ticket> {
        let pos = self.index.remove(&id)?;
        let last = self.slots.len() - 1;
        if pos != last {
            self.slots.swap(pos, last);
            self.index.insert(self.slots[pos].id, pos);
        }
        let removed = self.slots.pop()?;
        if pos < self.slots.len() {
            // The swapped-in ticket may violate the invariant in either
            // direction relative to its new neighbours.
            if self.sift_up(pos) == pos {
                self.sift_down(pos);
            }
        }
        Some(removed)
    }

    /// Full queue contents in ascending key order.
    ///
    /// Non-destructive and repeatable: the heap itself is not reordered,
    /// and two calls without an intervening mutation return identical
    /// sequences.
    pub fn ordered(&self) -> Vec<Ticket> {
        let mut all = self.slots.clone();
        all.sort_by_key(Ticket::priority_key);
        all
    }

    /// Sift the slot at `pos` toward the root; returns its final
    /// position.
    fn sift_up(&mut self, mut pos: usize) -> usize {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if self.slots[pos].priority_key() < self.slots[parent].priority_key() {
                self.swap_slots(pos, parent);
                pos = parent;
            } else {
                break;
            }
        }
        pos
    }

    /// Sift the slot at `pos` toward the leaves.
    fn sift_down(&mut self, mut pos: usize) {
        loop {
            let left = 2 * pos + 1;
            if left >= self.slots.len() {
                break;
            }
            let right = left + 1;
            let mut smallest = left;
            if right < self.slots.len()
                && self.slots[right].priority_key() < self.slots[left].priority_key()
            {
                smallest = right;
            }
            if self.slots[smallest].priority_key() < self.slots[pos].priority_key() {
                self.swap_slots(pos, smallest);
                pos = smallest;
            } else {
                break;
            }
        }
    }

    /// Swap two slots and keep the side table pointing at both.
    fn swap_slots(&mut self, a: usize, b: usize) {
        self.slots.swap(a, b);
        self.index.insert(self.slots[a].id, a);
        self.index.insert(self.slots[b].id, b);
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::types::Timestamp;

    fn base() -> Timestamp {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn ticket(id: DbId, is_vip: bool, deadline_min: i64, sequence: i64) -> Ticket {
        let admitted = base();
        Ticket {
            id,
            workspace_id: 1,
            dish_id: 10,
            dish_name: format!("Dish {id}"),
            prep_time_minutes: deadline_min as i32,
            ingredients: vec!["Salt".to_string()],
            quantity: 1,
            table_number: 4,
            is_vip,
            requested_allergies: Vec::new(),
            admitted_at: admitted,
            admission_sequence: sequence,
            calculated_start_time: admitted + Duration::minutes(deadline_min),
        }
    }

    /// Assert the heap invariant and side-table consistency directly.
    fn assert_valid(heap: &TicketHeap) {
        for i in 1..heap.slots.len() {
            let parent = (i - 1) / 2;
            assert!(
                heap.slots[parent].priority_key() <= heap.slots[i].priority_key(),
                "heap order violated between slots {parent} and {i}"
            );
        }
        assert_eq!(heap.index.len(), heap.slots.len());
        for (i, t) in heap.slots.iter().enumerate() {
            assert_eq!(heap.index.get(&t.id), Some(&i), "stale index for id {}", t.id);
        }
    }

    #[test]
    fn vip_ranks_ahead_of_all_regulars() {
        let mut heap = TicketHeap::new();
        heap.insert(ticket(1, false, 10, 1)).unwrap();
        heap.insert(ticket(2, false, 5, 2)).unwrap();
        heap.insert(ticket(3, true, 60, 3)).unwrap();

        let ids: Vec<DbId> = heap.ordered().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
        assert_eq!(heap.peek().map(|t| t.id), Some(3));
    }

    #[test]
    fn sequence_breaks_equal_deadlines_deterministically() {
        let mut heap = TicketHeap::new();
        heap.insert(ticket(7, false, 15, 2)).unwrap();
        heap.insert(ticket(5, false, 15, 1)).unwrap();
        heap.insert(ticket(9, false, 15, 3)).unwrap();

        let ids: Vec<DbId> = heap.ordered().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![5, 7, 9]);
    }

    #[test]
    fn ordered_is_repeatable_and_non_destructive() {
        let mut heap = TicketHeap::new();
        for i in 0..8 {
            heap.insert(ticket(i, i % 3 == 0, 30 - i, i)).unwrap();
        }
        let first = heap.ordered();
        let second = heap.ordered();
        assert_eq!(first, second);
        assert_eq!(heap.len(), 8);
        assert_valid(&heap);
    }

    #[test]
    fn remove_by_id_from_the_middle_preserves_validity() {
        let mut heap = TicketHeap::new();
        for i in 0..10 {
            heap.insert(ticket(i, false, (i * 7) % 13, i)).unwrap();
        }

        let removed = heap.remove(4).expect("ticket 4 is queued");
        assert_eq!(removed.id, 4);
        assert_eq!(heap.len(), 9);
        assert!(!heap.contains(4));
        assert_valid(&heap);

        let ids: Vec<DbId> = heap.ordered().iter().map(|t| t.id).collect();
        assert!(!ids.contains(&4));
    }

    #[test]
    fn removing_the_same_id_twice_yields_none() {
        let mut heap = TicketHeap::new();
        heap.insert(ticket(1, false, 5, 1)).unwrap();

        assert!(heap.remove(1).is_some());
        assert!(heap.remove(1).is_none());
        assert!(heap.is_empty());
    }

    #[test]
    fn removing_an_unknown_id_yields_none() {
        let mut heap = TicketHeap::new();
        heap.insert(ticket(1, false, 5, 1)).unwrap();
        assert!(heap.remove(99).is_none());
        assert_eq!(heap.len(), 1);
    }

    #[test]
    fn removing_the_root_promotes_the_next_key() {
        let mut heap = TicketHeap::new();
        heap.insert(ticket(1, false, 5, 1)).unwrap();
        heap.insert(ticket(2, false, 10, 2)).unwrap();
        heap.insert(ticket(3, false, 15, 3)).unwrap();

        heap.remove(1);
        assert_eq!(heap.peek().map(|t| t.id), Some(2));
        assert_valid(&heap);
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let mut heap = TicketHeap::new();
        heap.insert(ticket(1, false, 5, 1)).unwrap();
        let err = heap.insert(ticket(1, true, 9, 2)).unwrap_err();
        assert_eq!(err, QueueCorruption::DuplicateTicketId(1));
        assert_eq!(heap.len(), 1);
    }

    #[test]
    fn rebuild_detects_duplicate_sequences() {
        let rows = vec![ticket(1, false, 5, 3), ticket(2, false, 8, 3)];
        assert_eq!(
            TicketHeap::rebuild(rows).unwrap_err(),
            QueueCorruption::DuplicateSequence(3)
        );
    }

    #[test]
    fn rebuild_detects_duplicate_ids() {
        let rows = vec![ticket(6, false, 5, 1), ticket(6, false, 8, 2)];
        assert_eq!(
            TicketHeap::rebuild(rows).unwrap_err(),
            QueueCorruption::DuplicateTicketId(6)
        );
    }

    #[test]
    fn rebuild_orders_unsorted_rows() {
        let rows = vec![
            ticket(1, false, 40, 4),
            ticket(2, true, 50, 5),
            ticket(3, false, 10, 6),
        ];
        let heap = TicketHeap::rebuild(rows).unwrap();
        let ids: Vec<DbId> = heap.ordered().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
        assert_eq!(heap.max_sequence(), Some(6));
        assert_valid(&heap);
    }

    /// Seeded stress: interleaved inserts and arbitrary removals must
    /// keep the invariant, the side table, and the ordered view in
    /// agreement with a plain sorted model.
    #[test]
    fn randomized_ops_match_a_sorted_model() {
        let mut rng = StdRng::seed_from_u64(0x5EED);
        let mut heap = TicketHeap::new();
        let mut model: Vec<Ticket> = Vec::new();
        let mut next_id: DbId = 1;

        for _ in 0..600 {
            let insert = model.is_empty() || rng.random_bool(0.6);
            if insert {
                let t = ticket(
                    next_id,
                    rng.random_bool(0.25),
                    rng.random_range(0..120),
                    next_id,
                );
                next_id += 1;
                model.push(t.clone());
                heap.insert(t).unwrap();
            } else {
                let victim = model[rng.random_range(0..model.len())].id;
                let removed = heap.remove(victim).expect("model says it is queued");
                assert_eq!(removed.id, victim);
                model.retain(|t| t.id != victim);
            }

            assert_valid(&heap);
            let mut expected = model.clone();
            expected.sort_by_key(Ticket::priority_key);
            assert_eq!(heap.ordered(), expected);
        }
    }
}
