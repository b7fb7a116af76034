//! Bounded undo history of a single edit.

use crate::core::types::IVec3;
use crate::voxel::block::Block;

/// One overwritten voxel: where, and what was there before.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UndoEntry {
    pub coord: IVec3,
    pub previous: Block,
}

/// Result of recording an entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UndoRecord {
    /// Entry stored
    Recorded,
    /// Capacity exceeded by this entry; history cleared. Reported once per ledger.
    Overflowed,
    /// Ledger already overflowed; entry dropped
    Discarded,
}

/// Ordered (coordinate, previous block) history with a hard capacity.
///
/// Once an entry would exceed the capacity the whole history is cleared and
/// the ledger stays non-restorable for the rest of the edit. A partial
/// history is never kept.
#[derive(Clone, Debug)]
pub struct UndoLedger {
    entries: Vec<UndoEntry>,
    capacity: usize,
    restorable: bool,
}

impl UndoLedger {
    /// Create an empty ledger holding at most `capacity` entries
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity,
            restorable: true,
        }
    }

    /// Record the value a voxel held before it was overwritten.
    pub fn record(&mut self, coord: IVec3, previous: Block) -> UndoRecord {
        if !self.restorable {
            return UndoRecord::Discarded;
        }
        if self.entries.len() >= self.capacity {
            self.entries = Vec::new();
            self.restorable = false;
            return UndoRecord::Overflowed;
        }
        self.entries.push(UndoEntry { coord, previous });
        UndoRecord::Recorded
    }

    /// Recorded entries in write order
    pub fn entries(&self) -> &[UndoEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// False once the capacity has been exceeded
    pub fn is_restorable(&self) -> bool {
        self.restorable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_within_capacity() {
        let mut ledger = UndoLedger::new(3);
        assert_eq!(ledger.record(IVec3::ZERO, Block::Air), UndoRecord::Recorded);
        assert_eq!(ledger.record(IVec3::X, Block::Dirt), UndoRecord::Recorded);
        assert_eq!(ledger.record(IVec3::Y, Block::Sand), UndoRecord::Recorded);

        assert_eq!(ledger.len(), 3);
        assert!(ledger.is_restorable());
        assert_eq!(ledger.entries()[1], UndoEntry { coord: IVec3::X, previous: Block::Dirt });
    }

    #[test]
    fn test_overflow_clears_and_stays_empty() {
        let mut ledger = UndoLedger::new(2);
        ledger.record(IVec3::ZERO, Block::Air);
        ledger.record(IVec3::X, Block::Air);

        assert_eq!(ledger.record(IVec3::Y, Block::Air), UndoRecord::Overflowed);
        assert!(ledger.is_empty());
        assert!(!ledger.is_restorable());

        // Overflow is reported once; later entries are dropped
        for i in 0..10 {
            assert_eq!(ledger.record(IVec3::new(i, 5, 5), Block::Air), UndoRecord::Discarded);
        }
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_zero_capacity_overflows_immediately() {
        let mut ledger = UndoLedger::new(0);
        assert_eq!(ledger.record(IVec3::ZERO, Block::Stone), UndoRecord::Overflowed);
        assert!(!ledger.is_restorable());
    }
}
