#![cfg(test)]

use std::thread;

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::*;
use crate::util::alloc::CountedDrop;
use crate::util::error::InvalidChunkSize;
use crate::util::panic::assert_panics;

#[test]
fn test_indexed_access() {
    let arr = AnyArray::from_vec(vec![10, 20, 30]);

    assert!(arr.has(2), "The last index should be valid.");
    assert!(!arr.has(3), "An index equal to len shouldn't be valid.");
    assert_eq!(arr.get(1), Some(20));
    assert_eq!(arr.get(3), None, "Safe access shouldn't panic when out of bounds.");
    assert_eq!(arr.at(0), 10);
    assert_eq!(arr.get_by_indexes(&[2, 7, 0]), [30, 10], "Out of bounds indexes are skipped.");

    assert_eq!(arr.set(1, 25), 20, "Set should return the replaced element.");
    assert_eq!(arr.all(), [10, 25, 30]);

    let err = arr.try_set(3, 0).unwrap_err();
    assert_eq!(err.index, 3);
    assert_eq!(err.len, 3);
    assert_eq!(arr.all(), [10, 25, 30], "A failed set should leave the AnyArray unchanged.");

    assert_panics!({
        AnyArray::from_vec(vec![1_u8]).at(1);
    });
    assert_panics!({
        AnyArray::<u8>::new().set(0, 1);
    });
}

#[test]
fn test_constructors() {
    assert_eq!(AnyArray::<i32>::repeat_default(4).all(), [0, 0, 0, 0]);
    assert!(AnyArray::<String>::with_cap(8).is_empty());
    assert_eq!(AnyArray::from([1, 2]).into_vec(), [1, 2]);

    let mut arr: AnyArray<_> = (1..=3).collect();
    arr.extend([4, 5]);
    assert_eq!(Vec::from(arr), [1, 2, 3, 4, 5]);
}

#[test]
fn test_first_and_last() {
    let arr = AnyArray::from_vec(vec!["x", "y", "z"]);
    assert_eq!(arr.first(), Some("x"));
    assert_eq!(arr.last(), Some("z"));

    let empty = AnyArray::<i64>::new();
    assert_eq!(empty.first(), None);
    assert_eq!(empty.first_or_default(), 0, "An empty AnyArray should yield the zero value.");
    assert_eq!(empty.last_or_default(), 0, "An empty AnyArray should yield the zero value.");

    let single = AnyArray::from_vec(vec![7]);
    assert_eq!(single.first(), single.last(), "One element is both first and last.");
}

#[test]
fn test_defensive_copies() {
    let arr = AnyArray::from_vec(vec![String::from("a"), String::from("b")]);

    let mut copy = arr.all();
    copy[0].push_str("changed");
    copy.push(String::from("c"));

    assert_eq!(
        arr.all(),
        ["a", "b"],
        "Changing the returned Vec shouldn't affect the AnyArray."
    );
    assert_eq!(arr.to_vec(), arr.all());

    let cloned = arr.clone();
    cloned.push(String::from("d"));
    assert_eq!(arr.len(), 2, "A clone should have independent storage.");
    assert_eq!(cloned.len(), 3);
}

#[test]
fn test_filter_and_retain() {
    let arr: AnyArray<u32> = (1..=10).collect();

    let evens = arr.filter(|v| v % 2 == 0);
    assert_eq!(evens.all(), [2, 4, 6, 8, 10], "Filter should keep order.");
    assert_eq!(arr.len(), 10, "Filter shouldn't change the source.");

    arr.retain(|v| *v > 7);
    assert_eq!(arr.all(), [8, 9, 10], "Retain should change the source in place.");
}

#[test]
fn test_unique() {
    let arr = AnyArray::from_vec(vec![1, 2, 1, 3, 2, 4]);
    arr.unique();
    assert_eq!(arr.all(), [1, 2, 3, 4], "The first occurrence of each value should be kept.");

    let words = AnyArray::from_vec(vec!["Apple", "apple", "Banana", "APPLE"]);
    words.unique_by_key(|w| w.to_lowercase());
    assert_eq!(words.all(), ["Apple", "Banana"]);
}

#[test]
fn test_unique_by_display_conflates_equal_text() {
    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    enum Token {
        Number(u32),
        Text(String),
    }

    impl std::fmt::Display for Token {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Token::Number(n) => write!(f, "{n}"),
                Token::Text(t) => write!(f, "{t}"),
            }
        }
    }

    let values = vec![Token::Number(1), Token::Text(String::from("1"))];

    let structural = AnyArray::from_vec(values.clone());
    structural.unique();
    assert_eq!(structural.len(), 2, "Structurally different values should both survive.");

    let textual = AnyArray::from_vec(values);
    textual.unique_by_display();
    assert_eq!(
        textual.all(),
        [Token::Number(1)],
        "Values with the same text should be merged by the textual strategy."
    );
}

#[test]
fn test_empty_handling() {
    let arr = AnyArray::from_vec(vec!["a", "", "b"]);
    assert_eq!(arr.join(","), "a,,b");
    assert_eq!(arr.join_without_empty(","), "a,b");
    assert!(arr.any_empty());
    assert!(!arr.all_empty());
    assert!(!arr.all_not_empty(), "One empty element is enough to fail all_not_empty.");
    assert_eq!(arr.len(), 3, "Joining shouldn't remove anything.");

    arr.remove_empty();
    assert_eq!(arr.all(), ["a", "b"]);
    assert!(!arr.any_empty());
    assert!(arr.all_not_empty());

    let pointers = AnyArray::from_vec(vec![None, Some(Box::new(0)), Some(Box::new(4))]);
    pointers.remove_empty();
    assert_eq!(
        pointers.all(),
        [Some(Box::new(4))],
        "Missing pointers and pointers to zero values should both be removed."
    );

    assert!(AnyArray::<u8>::new().all_empty(), "No elements means all (none) are empty.");
    assert!(!AnyArray::<u8>::new().any_empty());
    assert!(AnyArray::<u8>::new().all_not_empty(), "No elements means none are empty either.");
    assert!(AnyArray::from_vec(vec![0, 0]).all_empty());
}

#[test]
fn test_chunk() {
    let arr: AnyArray<usize> = (0..12).collect();

    let chunks = arr.chunk(5).unwrap();
    assert_eq!(
        chunks.iter().map(Vec::len).collect::<Vec<_>>(),
        [5, 5, 2],
        "The remainder should form a shorter final chunk."
    );
    assert_eq!(chunks.concat(), arr.all());

    assert_eq!(arr.chunk(12).unwrap().len(), 1);
    assert_eq!(arr.chunk(100).unwrap(), vec![arr.all()]);
    assert!(AnyArray::<u8>::new().chunk(3).unwrap().is_empty());
    assert_eq!(arr.chunk(0), Err(InvalidChunkSize { size: 0 }));
}

#[test]
fn test_shuffle() {
    let arr: AnyArray<u16> = (0..100).collect();
    arr.shuffle();

    let mut sorted = arr.all();
    sorted.sort();
    assert_eq!(
        sorted,
        (0..100).collect::<Vec<_>>(),
        "A shuffle should produce a permutation of the input."
    );

    let a: AnyArray<u16> = (0..50).collect();
    let b: AnyArray<u16> = (0..50).collect();
    a.shuffle_with(&mut SmallRng::seed_from_u64(7));
    b.shuffle_with(&mut SmallRng::seed_from_u64(7));
    assert_eq!(a, b, "The same seed should produce the same order.");
}

#[test]
fn test_each_and_every() {
    let arr = AnyArray::from_vec(vec![1, 2, 3]);

    let mut seen = Vec::new();
    arr.each(|i, v| seen.push((i, *v)));
    assert_eq!(seen, [(0, 1), (1, 2), (2, 3)], "Each should visit in order with indexes.");

    arr.every(|v| v * v);
    assert_eq!(arr.all(), [1, 4, 9]);

    let labels = arr.cast(|v| format!("#{v}"));
    assert_eq!(labels.join(" "), "#1 #4 #9");
}

#[test]
fn test_searching() {
    let arr = AnyArray::from_vec(vec!["a", "b", "a", "c"]);

    assert_eq!(arr.index_of(&"a"), Some(0));
    assert_eq!(arr.index_of(&"z"), None);
    assert_eq!(arr.find_index(|v| *v > "a"), Some(1));
    assert_eq!(arr.find_indexes(|v| *v == "a"), [0, 2]);
    assert!(arr.contains(&"c"));
    assert!(arr.not_contains(&"d"));
}

#[test]
fn test_removal() {
    let arr = AnyArray::from_vec(vec![0, 1, 2, 3, 4, 5]);

    arr.remove_by_indexes(&[1, 1, 4, 99]);
    assert_eq!(arr.all(), [0, 2, 3, 5], "Repeated and out of bounds indexes are ignored.");

    arr.remove_by_value(&3);
    assert_eq!(arr.all(), [0, 2, 5]);

    arr.append([2, 5, 7]).remove_by_values(&[2, 5]);
    assert_eq!(arr.all(), [0, 7], "Every matching element should be removed.");

    assert_eq!(arr.remove(0), Ok(0));
    assert!(arr.remove(1).is_err());

    arr.clear();
    assert!(arr.is_empty());
}

#[test]
fn test_set_operations() {
    let a = AnyArray::from_vec(vec![1, 2, 3, 3, 4]);
    let b = AnyArray::from_vec(vec![3, 4, 5, 5]);

    assert_eq!(a.intersection(&b).all(), [3, 3, 4]);
    assert_eq!(a.difference(&b).all(), [1, 2]);
    assert_eq!(a.union(&b).all(), [1, 2, 3, 4, 5], "Union should not repeat elements.");
    assert_eq!(a.intersection(&a).all(), a.all(), "Operating on self shouldn't deadlock.");

    assert!(a.is_superset(&AnyArray::from_vec(vec![4, 1])));
    assert!(AnyArray::from_vec(vec![5]).is_subset(&b));
    assert!(!a.is_subset(&b));
}

#[test]
fn test_display_and_debug() {
    let arr = AnyArray::from_vec(vec![1, 2]);
    assert_eq!(arr.to_string(), "[1, 2]");
    assert_eq!(format!("{arr:?}"), "AnyArray { data: [1, 2], len: 2 }");
}

#[test]
fn test_drop() {
    let counter = CountedDrop::new(0);
    let arr = AnyArray::from_vec(vec![counter.clone(), counter.clone(), counter.clone()]);

    arr.remove_by_indexes(&[0]);
    assert_eq!(counter.count(), 1, "Removed elements should be dropped.");

    arr.clear();
    assert_eq!(counter.count(), 3, "Clearing should drop every element.");
}

#[test]
fn test_concurrent_appends_and_removals() {
    const THREADS: usize = 8;
    const PER_THREAD: usize = 500;

    let arr = AnyArray::new();

    thread::scope(|scope| {
        for t in 0..THREADS {
            let arr = &arr;
            scope.spawn(move || {
                for i in 0..PER_THREAD {
                    arr.push((t, i));
                }
            });
        }
    });
    assert_eq!(arr.len(), THREADS * PER_THREAD, "No append should be lost.");

    thread::scope(|scope| {
        for t in 0..THREADS / 2 {
            let arr = &arr;
            scope.spawn(move || {
                for i in 0..PER_THREAD {
                    arr.remove_by_value(&(t, i));
                }
            });
        }
        for _ in 0..THREADS {
            let arr = &arr;
            scope.spawn(move || {
                for _ in 0..PER_THREAD {
                    let _ = arr.len();
                    let _ = arr.all();
                }
            });
        }
    });
    assert_eq!(
        arr.len(),
        (THREADS - THREADS / 2) * PER_THREAD,
        "Only the removed threads' elements should be gone."
    );
}

#[test]
fn test_opposing_comparisons_with_writers() {
    const ROUNDS: usize = 2_000;

    let a = AnyArray::from_vec(vec![0, 1, 2]);
    let b = AnyArray::from_vec(vec![0, 1, 2]);

    thread::scope(|scope| {
        for (lhs, rhs) in [(&a, &b), (&b, &a)] {
            scope.spawn(move || {
                for _ in 0..ROUNDS {
                    let _ = *lhs == *rhs;
                }
            });
        }
        for arr in [&a, &b] {
            scope.spawn(move || {
                for i in 0..ROUNDS {
                    arr.set(0, i % 2);
                }
            });
        }
    });

    assert_eq!(a, b, "Both writers should finish on the same value.");
    assert_eq!(b, a);
}

#[cfg(feature = "serde")]
#[test]
fn test_serde() {
    let arr = AnyArray::from_vec(vec![3, 1, 2]);
    let json = serde_json::to_string(&arr).unwrap();
    assert_eq!(json, "[3,1,2]");

    let back: AnyArray<i32> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, arr);
}

proptest! {
    #[test]
    fn prop_unique_is_idempotent(values in prop::collection::vec(0_u8..16, 0..64)) {
        let once = AnyArray::from_vec(values);
        once.unique();
        let twice = once.clone();
        twice.unique();
        prop_assert_eq!(once.all(), twice.all());
    }

    #[test]
    fn prop_unique_keeps_first_occurrences(values in prop::collection::vec(0_u8..16, 0..64)) {
        let arr = AnyArray::from_vec(values.clone());
        arr.unique();

        let mut expected = Vec::new();
        for v in values {
            if !expected.contains(&v) {
                expected.push(v);
            }
        }
        prop_assert_eq!(arr.all(), expected);
    }

    #[test]
    fn prop_chunks_reassemble(values in prop::collection::vec(any::<i32>(), 0..200), size in 1_usize..20) {
        let arr = AnyArray::from_vec(values.clone());
        let chunks = arr.chunk(size).unwrap();

        prop_assert!(chunks.iter().all(|c| !c.is_empty() && c.len() <= size));
        prop_assert_eq!(chunks.len(), values.len().div_ceil(size));
        prop_assert_eq!(chunks.concat(), values);
    }

    #[test]
    fn prop_remove_by_indexes_matches_mask(
        values in prop::collection::vec(any::<u16>(), 0..50),
        indexes in prop::collection::vec(0_usize..60, 0..20),
    ) {
        let arr = AnyArray::from_vec(values.clone());
        arr.remove_by_indexes(&indexes);

        let expected: Vec<u16> = values.into_iter()
            .enumerate()
            .filter(|(i, _)| !indexes.contains(i))
            .map(|(_, v)| v)
            .collect();
        prop_assert_eq!(arr.all(), expected);
    }
}
