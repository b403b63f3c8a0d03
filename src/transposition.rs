use rustc_hash::FxHashMap;

/// How a stored score relates to the window it was computed with.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Bound {
    Exact,
    LowerBound,
    UpperBound,
}

#[derive(Clone, Copy, Debug)]
pub struct Entry {
    pub depth: u8,
    pub score: i32,
    pub bound: Bound,
}

/// Default entry cap, per the resource bounds on a single search instance.
pub const DEFAULT_CAPACITY: usize = 1_000_000;

/// A bounded hash-to-entry cache. Not shared across searches; a fresh
/// [`crate::search::Searcher`] owns (and may clear or reuse) its own table.
pub struct TranspositionTable {
    entries: FxHashMap<u64, Entry>,
    capacity: usize,
}

impl TranspositionTable {
    pub fn new(capacity: usize) -> Self {
        TranspositionTable {
            entries: FxHashMap::default(),
            capacity,
        }
    }

    pub fn probe(&self, hash: u64, min_depth: u8) -> Option<Entry> {
        self.entries
            .get(&hash)
            .filter(|e| e.depth >= min_depth)
            .copied()
    }

    pub fn store(&mut self, hash: u64, entry: Entry) {
        if !self.entries.contains_key(&hash) && self.entries.len() >= self.capacity {
            if let Some((&evict_hash, _)) = self
                .entries
                .iter()
                .min_by_key(|(_, e)| e.depth)
            {
                self.entries.remove(&evict_hash);
            }
        }
        self.entries.insert(hash, entry);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for TranspositionTable {
    fn default() -> Self {
        TranspositionTable::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_requires_sufficient_depth() {
        let mut tt = TranspositionTable::new(10);
        tt.store(
            1,
            Entry {
                depth: 3,
                score: 42,
                bound: Bound::Exact,
            },
        );
        assert!(tt.probe(1, 3).is_some());
        assert!(tt.probe(1, 4).is_none());
    }

    #[test]
    fn test_evicts_lowest_depth_when_full() {
        let mut tt = TranspositionTable::new(2);
        tt.store(1, Entry { depth: 1, score: 0, bound: Bound::Exact });
        tt.store(2, Entry { depth: 5, score: 0, bound: Bound::Exact });
        tt.store(3, Entry { depth: 2, score: 0, bound: Bound::Exact });
        assert_eq!(tt.len(), 2);
        assert!(tt.probe(1, 0).is_none());
        assert!(tt.probe(2, 0).is_some());
        assert!(tt.probe(3, 0).is_some());
    }
}
