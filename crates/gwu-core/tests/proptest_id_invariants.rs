//! Property tests for component id allocation and the decimal wire format.

use std::collections::HashSet;
use std::thread;

use gwu_core::{next_id, Id};
use proptest::prelude::*;

proptest! {
    #[test]
    fn format_parse_roundtrip(raw in any::<u64>()) {
        let id = Id(raw);
        prop_assert_eq!(id.to_string().parse::<Id>().unwrap(), id);
    }

    #[test]
    fn parse_rejects_non_digits(s in "[^0-9]+") {
        prop_assert!(s.parse::<Id>().is_err());
    }
}

#[test]
fn ids_unique_and_monotonic_single_thread() {
    let mut prev = Id::NONE;
    let mut seen = HashSet::new();
    for _ in 0..4096 {
        let id = next_id();
        assert!(id > prev, "{id} not greater than {prev}");
        assert!(seen.insert(id));
        prev = id;
    }
}

#[test]
fn ids_unique_across_threads() {
    const THREADS: usize = 8;
    const PER_THREAD: usize = 2048;

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            thread::spawn(|| {
                let mut ids = Vec::with_capacity(PER_THREAD);
                for _ in 0..PER_THREAD {
                    ids.push(next_id());
                }
                ids
            })
        })
        .collect();

    let mut all = HashSet::new();
    for h in handles {
        for id in h.join().expect("allocator thread") {
            assert!(all.insert(id), "duplicate id {id}");
            assert!(!id.is_none());
        }
    }
    assert_eq!(all.len(), THREADS * PER_THREAD);
}
