//! Dense bit set over state indices.
//!
//! Satisfaction sets are computed as [`StateSet`]s: one bit per state of the
//! model, stored in `u64` words. All set algebra used by the fixpoint routines
//! (union, intersection, difference, subset tests) works word-at-a-time.

use std::fmt;

use crate::types::StateId;

/// A set of states backed by a vector of u64 words.
///
/// Each bit corresponds to a [`StateId`]. The set grows automatically when
/// inserting beyond the current capacity, so two sets built for the same model
/// may have different word counts; equality treats missing words as zero.
#[derive(Clone, Default)]
pub struct StateSet {
    /// Storage: each u64 holds 64 bits
    words: Vec<u64>,
    /// Number of set bits (cached for O(1) len())
    count: usize,
}

impl StateSet {
    /// Number of bits per word.
    const BITS_PER_WORD: usize = 64;

    /// Creates a new empty set with room for `capacity` states.
    pub fn new(capacity: usize) -> Self {
        Self {
            words: vec![0; Self::words_for(capacity)],
            count: 0,
        }
    }

    /// Creates an empty set with no pre-allocated capacity.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates the set `{0, 1, ..., n - 1}`.
    pub fn full(n: usize) -> Self {
        let mut words = vec![u64::MAX; Self::words_for(n)];
        let tail = n % Self::BITS_PER_WORD;
        if tail != 0 {
            if let Some(last) = words.last_mut() {
                *last = (1u64 << tail) - 1;
            }
        }
        Self { words, count: n }
    }

    #[inline]
    fn words_for(bits: usize) -> usize {
        (bits + Self::BITS_PER_WORD - 1) / Self::BITS_PER_WORD
    }

    /// Gets the word index and bit position for a given bit index.
    #[inline]
    fn word_and_bit(index: usize) -> (usize, usize) {
        (index / Self::BITS_PER_WORD, index % Self::BITS_PER_WORD)
    }

    #[inline]
    fn word(&self, i: usize) -> u64 {
        self.words.get(i).copied().unwrap_or(0)
    }

    fn recount(&mut self) {
        self.count = self.words.iter().map(|w| w.count_ones() as usize).sum();
    }

    /// Returns the number of states in the set.
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns true if the set has no states.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns true if `id` is in the set.
    #[inline]
    pub fn contains(&self, id: StateId) -> bool {
        let (word_idx, bit_idx) = Self::word_and_bit(id.index());
        (self.word(word_idx) & (1u64 << bit_idx)) != 0
    }

    /// Adds `id` to the set. Returns true if it was not previously present.
    #[inline]
    pub fn insert(&mut self, id: StateId) -> bool {
        let (word_idx, bit_idx) = Self::word_and_bit(id.index());

        if word_idx >= self.words.len() {
            self.words.resize(word_idx + 1, 0);
        }

        let mask = 1u64 << bit_idx;
        let was_clear = (self.words[word_idx] & mask) == 0;
        if was_clear {
            self.words[word_idx] |= mask;
            self.count += 1;
        }
        was_clear
    }

    /// In-place union: `self = self ∪ other`.
    pub fn union_with(&mut self, other: &StateSet) {
        if other.words.len() > self.words.len() {
            self.words.resize(other.words.len(), 0);
        }
        for (w, o) in self.words.iter_mut().zip(&other.words) {
            *w |= *o;
        }
        self.recount();
    }

    /// In-place intersection: `self = self ∩ other`.
    pub fn intersect_with(&mut self, other: &StateSet) {
        for (i, w) in self.words.iter_mut().enumerate() {
            *w &= other.word(i);
        }
        self.recount();
    }

    /// In-place difference: `self = self \ other`.
    pub fn difference_with(&mut self, other: &StateSet) {
        for (w, o) in self.words.iter_mut().zip(&other.words) {
            *w &= !*o;
        }
        self.recount();
    }

    /// Returns `self ∪ other`.
    pub fn union(&self, other: &StateSet) -> StateSet {
        let mut res = self.clone();
        res.union_with(other);
        res
    }

    /// Returns `self ∩ other`.
    pub fn intersection(&self, other: &StateSet) -> StateSet {
        let mut res = self.clone();
        res.intersect_with(other);
        res
    }

    /// Returns `self \ other`.
    pub fn difference(&self, other: &StateSet) -> StateSet {
        let mut res = self.clone();
        res.difference_with(other);
        res
    }

    /// Returns true if every state of `self` is also in `other`.
    pub fn is_subset(&self, other: &StateSet) -> bool {
        self.words.iter().enumerate().all(|(i, w)| w & !other.word(i) == 0)
    }

    /// Returns true if `self` and `other` share no state.
    pub fn is_disjoint(&self, other: &StateSet) -> bool {
        self.words.iter().zip(&other.words).all(|(w, o)| w & o == 0)
    }

    /// Returns an iterator over the states in ascending index order.
    pub fn iter(&self) -> StateSetIter<'_> {
        StateSetIter {
            set: self,
            word_idx: 0,
            current_word: self.words.first().copied().unwrap_or(0),
        }
    }
}

impl PartialEq for StateSet {
    fn eq(&self, other: &Self) -> bool {
        if self.count != other.count {
            return false;
        }
        let n = self.words.len().max(other.words.len());
        (0..n).all(|i| self.word(i) == other.word(i))
    }
}

impl Eq for StateSet {}

impl fmt::Debug for StateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(StateId::index)).finish()
    }
}

impl Extend<StateId> for StateSet {
    fn extend<T: IntoIterator<Item = StateId>>(&mut self, iter: T) {
        for id in iter {
            self.insert(id);
        }
    }
}

impl FromIterator<StateId> for StateSet {
    fn from_iter<T: IntoIterator<Item = StateId>>(iter: T) -> Self {
        let mut set = StateSet::empty();
        set.extend(iter);
        set
    }
}

impl<'a> IntoIterator for &'a StateSet {
    type Item = StateId;
    type IntoIter = StateSetIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the states of a [`StateSet`].
pub struct StateSetIter<'a> {
    set: &'a StateSet,
    word_idx: usize,
    current_word: u64,
}

impl Iterator for StateSetIter<'_> {
    type Item = StateId;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.current_word != 0 {
                let bit_idx = self.current_word.trailing_zeros() as usize;
                self.current_word &= self.current_word - 1; // Clear lowest set bit
                return Some(StateId::new(self.word_idx * StateSet::BITS_PER_WORD + bit_idx));
            }

            self.word_idx += 1;
            if self.word_idx >= self.set.words.len() {
                return None;
            }
            self.current_word = self.set.words[self.word_idx];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(ids: &[usize]) -> StateSet {
        ids.iter().copied().map(StateId::new).collect()
    }

    fn ids(s: &StateSet) -> Vec<usize> {
        s.iter().map(StateId::index).collect()
    }

    #[test]
    fn test_empty() {
        let s = StateSet::empty();
        assert!(s.is_empty());
        assert_eq!(s.len(), 0);
        assert!(!s.contains(StateId::new(0)));
        assert!(!s.contains(StateId::new(100)));
    }

    #[test]
    fn test_insert_contains() {
        let mut s = StateSet::new(100);
        assert!(!s.contains(StateId::new(42)));
        assert!(s.insert(StateId::new(42)));
        assert!(s.contains(StateId::new(42)));
        assert!(!s.insert(StateId::new(42))); // Already set
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn test_full() {
        assert!(StateSet::full(0).is_empty());
        let s = StateSet::full(70);
        assert_eq!(s.len(), 70);
        assert!(s.contains(StateId::new(69)));
        assert!(!s.contains(StateId::new(70)));
        assert_eq!(StateSet::full(64).len(), 64);
    }

    #[test]
    fn test_iter() {
        let s = set(&[5, 10, 3, 64, 65]);
        assert_eq!(ids(&s), vec![3, 5, 10, 64, 65]);
    }

    #[test]
    fn test_set_algebra() {
        let a = set(&[1, 2, 3, 100]);
        let b = set(&[3, 4]);
        assert_eq!(ids(&a.union(&b)), vec![1, 2, 3, 4, 100]);
        assert_eq!(ids(&a.intersection(&b)), vec![3]);
        assert_eq!(ids(&a.difference(&b)), vec![1, 2, 100]);
        assert_eq!(ids(&b.difference(&a)), vec![4]);
        assert_eq!(a.union(&b).len(), 5);
    }

    #[test]
    fn test_subset_and_disjoint() {
        let a = set(&[1, 2]);
        let b = set(&[1, 2, 70]);
        assert!(a.is_subset(&b));
        assert!(!b.is_subset(&a));
        assert!(StateSet::empty().is_subset(&a));
        assert!(!a.is_disjoint(&b));
        assert!(a.is_disjoint(&set(&[3, 70])));
    }

    #[test]
    fn test_eq_ignores_capacity() {
        let mut a = StateSet::new(1000);
        a.insert(StateId::new(3));
        let b = set(&[3]);
        assert_eq!(a, b);
        assert_ne!(a, set(&[4]));
    }
}
