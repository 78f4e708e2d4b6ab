//! The partitioned k-mer count store.
//!
//! Counts are keyed by [`Seq17`] split into three nested levels (6/6/5
//! base prefixes), which bounds per-map fan-out: no level holds more than
//! 4^6 keys. The store assumes exclusive single-threaded ownership; one
//! loader finishes before any reader starts.

use std::collections::hash_map::Entry;
use std::mem;

use rustc_hash::FxHashMap;
use tracing::info;

use crate::error::{DuplicateSeq, KmerDictError};
use crate::progress::{ClearProgress, ProgressSchedule};
use crate::sequence::{Seq17, HEAD_LEN, MID_LEN, TAIL_LEN};

type HeadKey = [u8; HEAD_LEN];
type MidKey = [u8; MID_LEN];
type TailKey = [u8; TAIL_LEN];

type LeafMap = FxHashMap<TailKey, u64>;
type MidMap = FxHashMap<MidKey, LeafMap>;
type HeadMap = FxHashMap<HeadKey, MidMap>;

/// Approximate per-slot bookkeeping cost of a hash map entry (control
/// byte plus alignment slack), used by the footprint estimate.
const SLOT_OVERHEAD: usize = 8;

/// In-memory count store for 17-base k-mers.
///
/// Created empty, filled by one or more bulk loads (see
/// [`populate_path`](KmerStore::populate_path)), then queried. Each
/// sequence may be stored at most once; re-inserting is an error, never an
/// overwrite.
#[derive(Debug, Default)]
pub struct KmerStore {
    shards: HeadMap,
    num_entries: u64,
}

impl KmerStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sequences.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.num_entries
    }

    /// Returns true if no sequences are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.num_entries == 0
    }

    /// Stores `count` for `seq`.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateSeq`] if the sequence is already stored; the
    /// existing count is left untouched.
    pub fn insert(&mut self, seq: Seq17, count: u64) -> Result<(), DuplicateSeq> {
        let (head, mid, tail) = seq.shards();
        let leaf = self
            .shards
            .entry(head)
            .or_default()
            .entry(mid)
            .or_default();
        match leaf.entry(tail) {
            Entry::Occupied(_) => Err(DuplicateSeq { seq }),
            Entry::Vacant(slot) => {
                slot.insert(count);
                self.num_entries += 1;
                Ok(())
            }
        }
    }

    /// Exact forward lookup.
    #[must_use]
    pub fn get(&self, seq: &Seq17) -> Option<u64> {
        let (head, mid, tail) = seq.shards();
        self.shards.get(&head)?.get(&mid)?.get(&tail).copied()
    }

    /// Forward lookup, falling back to the reverse complement only on a
    /// miss.
    ///
    /// Skips the reverse-complement computation whenever the forward strand
    /// hits, so unlike [`lookup_canonical`](KmerStore::lookup_canonical) it
    /// cannot tell whether both strands are stored.
    #[must_use]
    pub fn lookup_fast(&self, seq: &Seq17) -> Option<u64> {
        self.get(seq)
            .or_else(|| self.get(&seq.reverse_complement()))
    }

    /// Strand-agnostic lookup, checking the sequence and its reverse
    /// complement unconditionally.
    ///
    /// If exactly one strand is stored, returns its count. If both are
    /// stored independently, returns the larger count and emits a
    /// diagnostic naming both sequences.
    ///
    /// # Errors
    ///
    /// Returns [`KmerDictError::NotFound`] if neither strand is stored.
    pub fn lookup_canonical(&self, seq: &Seq17) -> Result<u64, KmerDictError> {
        let rc = seq.reverse_complement();
        match (self.get(seq), self.get(&rc)) {
            (Some(forward), Some(reverse)) => {
                info!(
                    sequence = %seq,
                    reverse_complement = %rc,
                    "both strands stored, returning the larger count"
                );
                Ok(forward.max(reverse))
            }
            (Some(forward), None) => Ok(forward),
            (None, Some(reverse)) => Ok(reverse),
            (None, None) => Err(KmerDictError::NotFound { seq: *seq }),
        }
    }

    /// Approximate memory footprint in bytes.
    ///
    /// Walks all three levels, charging each map its struct size and each
    /// entry its key bytes, value, and slot overhead. Inserting entries
    /// never lowers the estimate; clearing never raises it.
    #[must_use]
    pub fn estimate_size(&self) -> usize {
        let mut total = mem::size_of::<HeadMap>();
        for mid_map in self.shards.values() {
            total += HEAD_LEN + SLOT_OVERHEAD + mem::size_of::<MidMap>();
            for leaf in mid_map.values() {
                total += MID_LEN + SLOT_OVERHEAD + mem::size_of::<LeafMap>();
                total += leaf.len() * (TAIL_LEN + mem::size_of::<u64>() + SLOT_OVERHEAD);
            }
        }
        total
    }

    /// Releases every entry.
    pub fn clear(&mut self) {
        self.clear_with_progress(|_| {});
    }

    /// Releases every entry bottom-up (leaf counts, then each enclosing
    /// level), invoking `on_progress` as completion thresholds are crossed.
    ///
    /// Thresholds follow [`ProgressSchedule`]: 10-point steps to 90%,
    /// 1-point steps to 99%, 0.1-point steps beyond. Afterwards the store
    /// holds zero entries and can be repopulated.
    pub fn clear_with_progress<F>(&mut self, mut on_progress: F)
    where
        F: FnMut(ClearProgress),
    {
        let total = self.num_entries;
        if total == 0 {
            self.shards = HeadMap::default();
            return;
        }

        let mut schedule = ProgressSchedule::new();
        let shards = mem::take(&mut self.shards);
        for (_, mid_map) in shards {
            for (_, leaf) in mid_map {
                for _ in leaf {
                    self.num_entries -= 1;
                    #[allow(clippy::cast_precision_loss)]
                    let percent_complete =
                        (1.0 - self.num_entries as f64 / total as f64) * 100.0;
                    if let Some(percent) = schedule.advance(percent_complete) {
                        on_progress(ClearProgress {
                            percent,
                            remaining: self.num_entries,
                            total,
                        });
                    }
                }
                // Leaf map dropped here, before its parent.
            }
        }
    }
}
