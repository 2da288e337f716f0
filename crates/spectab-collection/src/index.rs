//! # Interval Index
//!
//! A sorted-array interval index over the hertz axis.
//!
//! Entries are kept sorted by start frequency (ties in insertion order).
//! Alongside them runs a prefix-maximum of stop frequencies, the "reach":
//! `reach[i]` is the highest stop among `entries[..=i]`. Because reach is
//! non-decreasing, the first entry that can still overlap a query is found
//! by binary search, and the last by binary search on start. Queries cost
//! `O(log n + k)` over the candidate window.
//!
//! Appending in start order is `O(1)`; out-of-order inserts and removals
//! recompute the reach suffix. Collections are built once per run and then
//! queried, which is the access pattern this favours.

use spectab_core::Frequency;

/// One stored interval.
#[derive(Debug, Clone)]
pub struct Entry<T> {
    start: Frequency,
    stop: Frequency,
    seq: u64,
    value: T,
}

impl<T> Entry<T> {
    /// Lower edge (inclusive).
    pub fn start(&self) -> Frequency {
        self.start
    }

    /// Upper edge (exclusive).
    pub fn stop(&self) -> Frequency {
        self.stop
    }

    /// Insertion sequence number, unique within the index.
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Stored value.
    pub fn value(&self) -> &T {
        &self.value
    }
}

/// Sorted-array interval index keyed on `[start, stop)`.
#[derive(Debug, Clone)]
pub struct IntervalIndex<T> {
    entries: Vec<Entry<T>>,
    reach: Vec<Frequency>,
    next_seq: u64,
}

impl<T> Default for IntervalIndex<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> IntervalIndex<T> {
    /// Empty index.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            reach: Vec::new(),
            next_seq: 0,
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert `[start, stop)` carrying `value`; returns its sequence number.
    pub fn insert(&mut self, start: Frequency, stop: Frequency, value: T) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        let pos = self.entries.partition_point(|e| e.start <= start);
        self.entries.insert(
            pos,
            Entry {
                start,
                stop,
                seq,
                value,
            },
        );
        if pos + 1 == self.entries.len() {
            let reach = self.reach.last().map_or(stop, |r| (*r).max(stop));
            self.reach.push(reach);
        } else {
            self.recompute_reach(pos);
        }
        seq
    }

    /// Remove the first entry (in start order) accepted by `predicate`.
    pub fn remove_first<P>(&mut self, mut predicate: P) -> Option<T>
    where
        P: FnMut(&Entry<T>) -> bool,
    {
        let pos = self.entries.iter().position(|e| predicate(e))?;
        let entry = self.entries.remove(pos);
        self.reach.truncate(pos);
        self.recompute_reach(pos);
        Some(entry.value)
    }

    /// Mutable access to the value of the entry with sequence number `seq`.
    ///
    /// The entry's span cannot change through this reference.
    pub fn value_mut(&mut self, seq: u64) -> Option<&mut T> {
        self.entries
            .iter_mut()
            .find(|e| e.seq == seq)
            .map(|e| &mut e.value)
    }

    /// Entries in start order.
    pub fn entries(&self) -> impl Iterator<Item = &Entry<T>> + '_ {
        self.entries.iter()
    }

    /// Entries whose span intersects `[lo, hi)`.
    pub fn overlapping(&self, lo: Frequency, hi: Frequency) -> impl Iterator<Item = &Entry<T>> + '_ {
        let begin = self.reach.partition_point(|r| *r <= lo);
        let end = self.entries.partition_point(|e| e.start < hi);
        let window = if begin < end { &self.entries[begin..end] } else { &[][..] };
        window.iter().filter(move |e| e.stop > lo)
    }

    /// Entries whose span contains `frequency`.
    pub fn containing(&self, frequency: Frequency) -> impl Iterator<Item = &Entry<T>> + '_ {
        let begin = self.reach.partition_point(|r| *r <= frequency);
        let end = self.entries.partition_point(|e| e.start <= frequency);
        let window = if begin < end { &self.entries[begin..end] } else { &[][..] };
        window.iter().filter(move |e| e.stop > frequency)
    }

    /// Lowest start, if any.
    pub fn begin(&self) -> Option<Frequency> {
        self.entries.first().map(|e| e.start)
    }

    /// Highest stop, if any.
    pub fn end(&self) -> Option<Frequency> {
        self.reach.last().copied()
    }

    fn recompute_reach(&mut self, from: usize) {
        self.reach.truncate(from);
        let mut reach = self.reach.last().copied();
        for entry in &self.entries[from..] {
            let r = reach.map_or(entry.stop, |r| r.max(entry.stop));
            self.reach.push(r);
            reach = Some(r);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mhz(v: f64) -> Frequency {
        Frequency::mhz(v)
    }

    fn index(spans: &[(f64, f64)]) -> IntervalIndex<usize> {
        let mut idx = IntervalIndex::new();
        for (i, (a, b)) in spans.iter().enumerate() {
            idx.insert(mhz(*a), mhz(*b), i);
        }
        idx
    }

    fn values<'a>(it: impl Iterator<Item = &'a Entry<usize>>) -> Vec<usize> {
        it.map(|e| *e.value()).collect()
    }

    #[test]
    fn point_query_is_half_open() {
        let idx = index(&[(100.0, 200.0), (200.0, 300.0)]);
        assert_eq!(values(idx.containing(mhz(200.0))), [1]);
        assert_eq!(values(idx.containing(mhz(100.0))), [0]);
        assert!(idx.containing(mhz(300.0)).next().is_none());
        assert!(idx.containing(mhz(50.0)).next().is_none());
    }

    #[test]
    fn range_query_finds_long_early_interval() {
        // The wide first interval reaches past the short ones after it.
        let idx = index(&[(0.0, 1000.0), (10.0, 20.0), (30.0, 40.0), (500.0, 600.0)]);
        assert_eq!(values(idx.overlapping(mhz(700.0), mhz(800.0))), [0]);
        assert_eq!(values(idx.overlapping(mhz(15.0), mhz(35.0))), [0, 1, 2]);
        assert_eq!(values(idx.overlapping(mhz(40.0), mhz(500.0))), [0]);
    }

    #[test]
    fn out_of_order_inserts_keep_order_and_reach() {
        let idx = index(&[(500.0, 600.0), (0.0, 50.0), (100.0, 550.0)]);
        let starts: Vec<f64> = idx.entries().map(|e| e.start().in_unit(spectab_core::FrequencyUnit::MHz)).collect();
        assert_eq!(starts, [0.0, 100.0, 500.0]);
        assert_eq!(values(idx.containing(mhz(520.0))), [2, 0]);
        assert_eq!(idx.begin(), Some(mhz(0.0)));
        assert_eq!(idx.end(), Some(mhz(600.0)));
    }

    #[test]
    fn equal_starts_keep_insertion_order() {
        let idx = index(&[(100.0, 200.0), (100.0, 150.0), (100.0, 300.0)]);
        assert_eq!(values(idx.containing(mhz(120.0))), [0, 1, 2]);
    }

    #[test]
    fn remove_recomputes_reach() {
        let mut idx = index(&[(0.0, 1000.0), (10.0, 20.0)]);
        assert_eq!(idx.remove_first(|e| *e.value() == 0), Some(0));
        assert_eq!(idx.len(), 1);
        assert!(idx.containing(mhz(500.0)).next().is_none());
        assert_eq!(idx.end(), Some(mhz(20.0)));
        assert!(idx.remove_first(|_| false).is_none());
    }

    #[test]
    fn value_mut_by_seq() {
        let mut idx = IntervalIndex::new();
        let seq = idx.insert(mhz(1.0), mhz(2.0), String::from("a"));
        idx.value_mut(seq).unwrap().push('b');
        assert_eq!(idx.entries().next().unwrap().value(), "ab");
        assert!(idx.value_mut(seq + 1).is_none());
    }

    #[test]
    fn empty_index() {
        let idx: IntervalIndex<()> = IntervalIndex::default();
        assert!(idx.is_empty());
        assert!(idx.begin().is_none());
        assert!(idx.end().is_none());
        assert!(idx.overlapping(mhz(0.0), mhz(1.0)).next().is_none());
    }
}
