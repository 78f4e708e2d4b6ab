//! Property-based tests using proptest.
//!
//! These tests verify invariants that should hold across all valid
//! 17-base sequences, catching edge cases that example-based tests miss.

use std::collections::HashSet;

use kmerdict::{KmerStore, Seq17};
use proptest::prelude::*;

/// Strategy for generating valid 17-base DNA sequences.
fn seq17() -> impl Strategy<Value = String> {
    proptest::collection::vec(
        prop_oneof![Just('A'), Just('C'), Just('G'), Just('T')],
        17,
    )
    .prop_map(|chars| chars.into_iter().collect())
}

/// Strategy for sets of distinct valid sequences with counts.
fn seq_batch() -> impl Strategy<Value = Vec<(String, u64)>> {
    proptest::collection::hash_set(seq17(), 1..20).prop_flat_map(|seqs| {
        let seqs: Vec<_> = seqs.into_iter().collect();
        let len = seqs.len();
        proptest::collection::vec(any::<u64>(), len)
            .prop_map(move |counts| seqs.clone().into_iter().zip(counts).collect())
    })
}

proptest! {
    /// The reverse complement is an involution.
    #[test]
    fn reverse_complement_roundtrip(s in seq17()) {
        let seq: Seq17 = s.parse().unwrap();
        prop_assert_eq!(seq.reverse_complement().reverse_complement(), seq);
    }

    /// The reverse complement of a 17-mer never equals the sequence
    /// itself (odd length rules out palindromes).
    #[test]
    fn reverse_complement_differs(s in seq17()) {
        let seq: Seq17 = s.parse().unwrap();
        prop_assert_ne!(seq.reverse_complement(), seq);
    }

    /// Every inserted sequence is found again with its own count, by both
    /// lookup paths.
    #[test]
    fn insert_lookup_roundtrip(batch in seq_batch()) {
        let mut store = KmerStore::new();
        let mut stored: Vec<(Seq17, u64)> = Vec::new();
        let mut occupied: HashSet<Seq17> = HashSet::new();

        for (s, count) in batch {
            let seq: Seq17 = s.parse().unwrap();
            store.insert(seq, count).unwrap();
            occupied.insert(seq);
            stored.push((seq, count));
        }

        for (seq, count) in &stored {
            prop_assert_eq!(store.get(seq), Some(*count));
            prop_assert_eq!(store.lookup_fast(seq), Some(*count));
            // The canonical result may come from the other strand when both
            // happen to be stored; it is then the max of the two counts.
            let canonical = store.lookup_canonical(seq).unwrap();
            let rc = seq.reverse_complement();
            if occupied.contains(&rc) {
                let rc_count = store.get(&rc).unwrap();
                prop_assert_eq!(canonical, (*count).max(rc_count));
            } else {
                prop_assert_eq!(canonical, *count);
            }
        }
    }

    /// If only the forward strand is stored, querying by the reverse
    /// complement resolves to it.
    #[test]
    fn reverse_complement_symmetry(s in seq17(), count in any::<u64>()) {
        let seq: Seq17 = s.parse().unwrap();
        let mut store = KmerStore::new();
        store.insert(seq, count).unwrap();

        let rc = seq.reverse_complement();
        prop_assert_eq!(store.lookup_canonical(&rc).unwrap(), count);
        prop_assert_eq!(store.lookup_fast(&rc), Some(count));
    }

    /// A second insertion of the same sequence always fails and leaves the
    /// first count in place.
    #[test]
    fn duplicate_insert_never_overwrites(s in seq17(), first in any::<u64>(), second in any::<u64>()) {
        let seq: Seq17 = s.parse().unwrap();
        let mut store = KmerStore::new();
        store.insert(seq, first).unwrap();
        prop_assert!(store.insert(seq, second).is_err());
        prop_assert_eq!(store.get(&seq), Some(first));
        prop_assert_eq!(store.len(), 1);
    }

    /// The footprint estimate never decreases as entries are added.
    #[test]
    fn footprint_is_monotonic(batch in seq_batch()) {
        let mut store = KmerStore::new();
        let mut last = store.estimate_size();

        for (s, count) in batch {
            let seq: Seq17 = s.parse().unwrap();
            store.insert(seq, count).unwrap();
            let size = store.estimate_size();
            prop_assert!(size >= last);
            last = size;
        }

        store.clear();
        prop_assert!(store.estimate_size() <= last);
        prop_assert_eq!(store.len(), 0);
    }
}
