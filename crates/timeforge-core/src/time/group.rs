//! Immutable sets of times with shift ("neighbour") support.

use std::fmt;
use std::sync::{Arc, OnceLock};

const WORD_BITS: usize = 64;

/// An immutable set of times within a cycle of `cycle_len` times.
///
/// Membership is a bit test. Neighbour groups (every time shifted by the
/// same delta, dropping times that leave the cycle) are memoized per delta,
/// so repeated shifts of the same group share one `Arc`.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use timeforge_core::TimeGroup;
///
/// let mornings = Arc::new(TimeGroup::new(10, [0, 1, 5, 6]));
/// assert!(mornings.contains(5));
/// assert!(!mornings.contains(2));
///
/// let later = mornings.neighbour(2);
/// assert_eq!(later.times(), &[2, 3, 7, 8]);
/// assert!(Arc::ptr_eq(&later, &mornings.neighbour(2)));
///
/// // Times shifted past the end of the cycle are dropped
/// assert_eq!(mornings.neighbour(5).times(), &[5, 6]);
/// ```
pub struct TimeGroup {
    name: Option<String>,
    cycle_len: usize,
    times: Vec<usize>,
    bits: Vec<u64>,
    neighbours: OnceLock<Box<[OnceLock<Arc<TimeGroup>>]>>,
}

impl TimeGroup {
    /// Creates a time group from arbitrary times, sorting and deduplicating.
    ///
    /// # Panics
    /// Panics if a time lies outside `0..cycle_len`.
    pub fn new(cycle_len: usize, times: impl IntoIterator<Item = usize>) -> Self {
        let mut bits = vec![0u64; cycle_len.div_ceil(WORD_BITS)];
        for t in times {
            assert!(
                t < cycle_len,
                "time {} outside cycle of length {}",
                t,
                cycle_len
            );
            bits[t / WORD_BITS] |= 1u64 << (t % WORD_BITS);
        }
        Self::from_bits(cycle_len, bits)
    }

    fn from_bits(cycle_len: usize, bits: Vec<u64>) -> Self {
        let times = (0..cycle_len)
            .filter(|&t| bits[t / WORD_BITS] & (1u64 << (t % WORD_BITS)) != 0)
            .collect();
        Self {
            name: None,
            cycle_len,
            times,
            bits,
            neighbours: OnceLock::new(),
        }
    }

    /// Creates the group of every time of the cycle.
    pub fn full(cycle_len: usize) -> Self {
        Self::new(cycle_len, 0..cycle_len)
    }

    /// Creates the empty group.
    pub fn empty(cycle_len: usize) -> Self {
        Self::new(cycle_len, std::iter::empty())
    }

    /// Creates a group holding a single time.
    pub fn singleton(cycle_len: usize, time: usize) -> Self {
        Self::new(cycle_len, std::iter::once(time))
    }

    /// Attaches a name, used for diagnostics only.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Number of times in the cycle this group belongs to.
    #[inline]
    pub fn cycle_len(&self) -> usize {
        self.cycle_len
    }

    /// The times of this group in increasing order.
    #[inline]
    pub fn times(&self) -> &[usize] {
        &self.times
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Returns the earliest time, if any.
    #[inline]
    pub fn first(&self) -> Option<usize> {
        self.times.first().copied()
    }

    /// O(1) membership test. Times outside the cycle are never members.
    #[inline]
    pub fn contains(&self, time: usize) -> bool {
        time < self.cycle_len && self.bits[time / WORD_BITS] & (1u64 << (time % WORD_BITS)) != 0
    }

    /// Returns true if every time of `self` is in `other`.
    pub fn is_subset(&self, other: &TimeGroup) -> bool {
        debug_assert_eq!(self.cycle_len, other.cycle_len);
        self.bits
            .iter()
            .zip(other.bits.iter())
            .all(|(a, b)| a & !b == 0)
    }

    /// Returns true if `self` and `other` share no time.
    pub fn is_disjoint(&self, other: &TimeGroup) -> bool {
        debug_assert_eq!(self.cycle_len, other.cycle_len);
        self.bits
            .iter()
            .zip(other.bits.iter())
            .all(|(a, b)| a & b == 0)
    }

    /// Returns true if both groups hold exactly the same times.
    pub fn same_times(&self, other: &TimeGroup) -> bool {
        self.cycle_len == other.cycle_len && self.bits == other.bits
    }

    /// Subset test after shifting `self` by `delta`, without building the
    /// shifted group.
    ///
    /// Equivalent to `self.neighbour(delta).is_subset(other)`: times that
    /// leave the cycle after the shift are ignored.
    pub fn is_subset_shifted(&self, delta: isize, other: &TimeGroup) -> bool {
        self.times.iter().all(|&t| {
            let shifted = t as isize + delta;
            shifted < 0 || shifted as usize >= self.cycle_len || other.contains(shifted as usize)
        })
    }

    /// Builds the intersection of two groups.
    pub fn intersection(&self, other: &TimeGroup) -> TimeGroup {
        debug_assert_eq!(self.cycle_len, other.cycle_len);
        let bits = self
            .bits
            .iter()
            .zip(other.bits.iter())
            .map(|(a, b)| a & b)
            .collect();
        TimeGroup::from_bits(self.cycle_len, bits)
    }

    /// Returns the group of this group's times shifted by `delta`.
    ///
    /// Delta zero returns `self`; other deltas are memoized.
    pub fn neighbour(self: &Arc<Self>, delta: isize) -> Arc<TimeGroup> {
        if delta == 0 {
            return Arc::clone(self);
        }
        let n = self.cycle_len as isize;
        if delta <= -n || delta >= n {
            return Arc::new(TimeGroup::empty(self.cycle_len));
        }
        let table = self.neighbours.get_or_init(|| {
            (0..(2 * self.cycle_len - 1))
                .map(|_| OnceLock::new())
                .collect::<Vec<_>>()
                .into_boxed_slice()
        });
        let slot = &table[(delta + n - 1) as usize];
        Arc::clone(slot.get_or_init(|| Arc::new(self.shifted(delta))))
    }

    fn shifted(&self, delta: isize) -> TimeGroup {
        let n = self.cycle_len as isize;
        TimeGroup::new(
            self.cycle_len,
            self.times
                .iter()
                .map(|&t| t as isize + delta)
                .filter(|&s| s >= 0 && s < n)
                .map(|s| s as usize),
        )
    }
}

impl PartialEq for TimeGroup {
    fn eq(&self, other: &Self) -> bool {
        self.same_times(other)
    }
}

impl Eq for TimeGroup {}

impl fmt::Debug for TimeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "TimeGroup({} {:?})", name, self.times),
            None => write!(f, "TimeGroup({:?})", self.times),
        }
    }
}

impl fmt::Display for TimeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "{:?}", self.times),
        }
    }
}
