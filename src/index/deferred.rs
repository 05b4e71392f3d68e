use std::sync::Arc;
use parking_lot::Mutex;

/// Either the raw accumulated form of an index or its ranked form.
#[derive(Debug)]
pub enum Stage<A, R> {
    Accumulating(A),
    Ranked(Arc<R>),
}

/// An index that is converted from its accumulated form to its ranked form
/// exactly once, either eagerly at finalize or on first read.
///
/// Only one representation exists at any time: ranking moves the
/// accumulated value out and replaces it.
#[derive(Debug)]
pub struct Deferred<A, R> {
    stage: Mutex<Stage<A, R>>,
}

impl<A: Default, R> Deferred<A, R> {
    pub fn accumulating(value: A) -> Self {
        Deferred {
            stage: Mutex::new(Stage::Accumulating(value)),
        }
    }

    pub fn ranked(value: R) -> Self {
        Deferred {
            stage: Mutex::new(Stage::Ranked(Arc::new(value))),
        }
    }

    /// Returns the ranked form, running `rank` if this is the first request.
    pub fn rank_with(&self, rank: impl FnOnce(A) -> R) -> Arc<R> {
        let mut stage = self.stage.lock();
        match &mut *stage {
            Stage::Ranked(ranked) => ranked.clone(),
            Stage::Accumulating(pending) => {
                let pending = std::mem::take(pending);
                let ranked = Arc::new(rank(pending));
                *stage = Stage::Ranked(ranked.clone());
                ranked
            }
        }
    }

    pub fn is_ranked(&self) -> bool {
        matches!(&*self.stage.lock(), Stage::Ranked(_))
    }
}

impl<E> Deferred<Vec<E>, Vec<E>> {
    /// Reads the elements in whatever order they currently have.
    pub fn with_unordered<T>(&self, read: impl FnOnce(&[E]) -> T) -> T {
        match &*self.stage.lock() {
            Stage::Accumulating(pending) => read(pending),
            Stage::Ranked(ranked) => read(ranked),
        }
    }

    pub fn len(&self) -> usize {
        self.with_unordered(|items| items.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::cell::Cell;
    use std::sync::Barrier;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn ranks_once() {
        let deferred: Deferred<Vec<u32>, Vec<u32>> = Deferred::accumulating(vec![3, 1, 2]);
        let calls = Cell::new(0);
        let rank = |mut v: Vec<u32>| {
            calls.set(calls.get() + 1);
            v.sort();
            v
        };

        assert!(!deferred.is_ranked());
        assert_eq!(*deferred.rank_with(rank), vec![1, 2, 3]);
        assert_eq!(*deferred.rank_with(|v| v), vec![1, 2, 3]);
        assert_eq!(calls.get(), 1);
        assert!(deferred.is_ranked());
    }

    #[test]
    fn concurrent_readers_rank_once() {
        let deferred: Deferred<Vec<u32>, Vec<u32>> = Deferred::accumulating((0..1000).rev().collect());
        let calls = AtomicUsize::new(0);
        let barrier = Barrier::new(2);

        let rank = || {
            barrier.wait();
            deferred.rank_with(|mut v| {
                calls.fetch_add(1, Ordering::SeqCst);
                thread::sleep(Duration::from_millis(20));
                v.sort();
                v
            })
        };
        let (first, second) = thread::scope(|s| {
            let a = s.spawn(rank);
            let b = s.spawn(rank);
            (a.join().unwrap(), b.join().unwrap())
        });

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.len(), 1000);
        assert!(first.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn map_converted_to_sequence() {
        let mut map = HashMap::new();
        map.insert(1u64, "a");
        map.insert(2u64, "b");
        let deferred: Deferred<HashMap<u64, &str>, Vec<&str>> = Deferred::accumulating(map);

        let ranked = deferred.rank_with(|map| {
            let mut values: Vec<&str> = map.into_values().collect();
            values.sort();
            values
        });
        assert_eq!(*ranked, vec!["a", "b"]);
    }

    #[test]
    fn unordered_read_does_not_rank() {
        let deferred: Deferred<Vec<u32>, Vec<u32>> = Deferred::accumulating(vec![5, 4]);
        assert_eq!(deferred.with_unordered(|items| items.iter().sum::<u32>()), 9);
        assert_eq!(deferred.len(), 2);
        assert!(!deferred.is_ranked());
    }
}
