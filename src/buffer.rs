//! Fixed-capacity circular sample buffer with in-place order statistics
//!
//! ## Overview
//!
//! [`MedianBuffer`] keeps the most recent `N` timestamped samples in a single
//! owned array and computes order statistics (median, median-average,
//! min/max, mean absolute deviation) and interval statistics (inter-arrival
//! medians, rate of change) without a second array and without heap
//! allocation. It is built for the same class of targets as the rest of the
//! embedded pack: small RAM, no exception budget, one owner.
//!
//! ## The reorder/restore protocol
//!
//! Order statistics need the live window sorted by value, but the physical
//! slot order of a circular buffer *is* the age order that `push`/`pop`
//! depend on. Sorting in place would destroy it, so the buffer:
//!
//! 1. tags every live item with its age rank (0 = oldest) while still in
//!    insertion order,
//! 2. insertion-sorts the window by value through the ring-index mapping,
//! 3. reads the statistic,
//! 4. restores age order by sorting the window again, keyed on the tag.
//!
//! The restore is lazy: the buffer tracks its current physical order and
//! consecutive read-only statistics reuse the sorted window. Every operation
//! that reads or moves the tail (`push`, `pop`, `peek`, `iter`, the delete
//! helpers) restores insertion order first, so laziness is never observable.
//!
//! ## Interval statistics are destructive
//!
//! The interval family rewrites each item's `value` to the time delta to its
//! successor (the newest item gets a neutral zero, which every interval
//! statistic excludes). The transform is cached and invalidated by the next
//! `push`/`pop`, but the original sample values are gone: interval buffers
//! are meant for occurrence streams where the pushed value carries no
//! meaning. Value statistics called after an interval statistic observe the
//! deltas until the window refills.
//!
//! ## Failure policy
//!
//! Expected edge conditions never panic and never destabilize the buffer:
//! operations on an empty window return `None`, and the interval family
//! additionally returns `None` below two items (which is also what guards
//! rate-of-change against dividing by a zero interval). Capacity bounds and
//! time-type unsignedness are enforced at compile time.
//!
//! ## Usage
//!
//! ```rust
//! use medring::MedianBuffer;
//!
//! let mut history: MedianBuffer<i32, u32, 5> = MedianBuffer::new();
//! for (i, v) in [5, 1, 9, 3, 7].into_iter().enumerate() {
//!     history.push(v, i as u32 * 100);
//! }
//!
//! assert_eq!(history.median(), Some(5));
//! assert_eq!(history.range(), Some(8));
//! // Age order survives the statistics: the oldest sample pops first
//! assert_eq!(history.pop(), Some(5));
//! ```

use num_traits::{Num, NumCast, Unsigned};

use crate::ring::{insertion_sort, ring_index};
use crate::stats;

/// One stored entry: a sample, its timestamp, and the age-rank tag used by
/// the restore sort. The tag is only meaningful between "sort by value" and
/// the following restore; at any other time it is stale.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Sample<T, U> {
    /// The sample value (or the inter-arrival delta after the destructive
    /// interval transform).
    pub value: T,
    /// Caller-supplied monotonic timestamp, in the caller's unit.
    pub time: U,
    pub(crate) insert_order: u8,
}

/// Current physical order of the live window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotOrder {
    /// Slot order matches insertion age; `push`/`pop` are safe.
    Insertion,
    /// Window is sorted by value; age is recoverable via the tags.
    ByValue,
}

#[cfg(feature = "defmt")]
impl defmt::Format for SlotOrder {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Insertion => defmt::write!(fmt, "insertion"),
            Self::ByValue => defmt::write!(fmt, "by-value"),
        }
    }
}

/// Fixed-capacity circular buffer with order and interval statistics.
///
/// ## Type parameters
///
/// - `T`: sample type. Any totally ordered numeric type; it must be able to
///   represent the window length `N` for the averaging divisors. Signed or
///   floating types are preferred when the deviation/averaging statistics
///   are used.
/// - `U`: time type, strictly unsigned (enforced by the [`Unsigned`] bound).
///   Timestamps must be monotonically non-decreasing; that contract is the
///   caller's.
/// - `N`: capacity, 1..=255, checked at compile time.
///
/// Overwrite-oldest-on-full semantics: pushing into a full buffer silently
/// displaces the oldest sample rather than rejecting the new one.
#[derive(Debug, Clone)]
pub struct MedianBuffer<T, U, const N: usize> {
    slots: [Sample<T, U>; N],
    /// Next write position.
    head: usize,
    /// Oldest live item.
    tail: usize,
    /// Disambiguates `head == tail` between empty and full.
    is_full: bool,
    push_count: u32,
    order: SlotOrder,
    /// Whether `value` fields currently hold inter-arrival deltas.
    values_are_intervals: bool,
}

impl<T, U, const N: usize> MedianBuffer<T, U, N>
where
    T: Copy + Default + PartialOrd + Num + NumCast,
    U: Copy + Default + PartialOrd + Num + NumCast + Unsigned,
{
    const CAPACITY_OK: () = assert!(N >= 1 && N <= 255, "capacity must be in 1..=255");

    /// Creates an empty buffer.
    pub fn new() -> Self {
        let () = Self::CAPACITY_OK;
        Self {
            slots: [Sample::default(); N],
            head: 0,
            tail: 0,
            is_full: false,
            push_count: 0,
            order: SlotOrder::Insertion,
            values_are_intervals: false,
        }
    }

    // ---- circular insertion/removal ----

    /// Appends a sample, displacing the oldest one when full.
    ///
    /// Invalidates any cached interval transform. `time` must not be smaller
    /// than the previously pushed timestamp.
    pub fn push(&mut self, value: T, time: U) {
        self.ensure_insertion_order();
        self.push_count = self.push_count.wrapping_add(1);
        self.values_are_intervals = false;

        self.slots[self.head] = Sample {
            value,
            time,
            insert_order: 0,
        };
        if self.is_full {
            self.tail = (self.tail + 1) % N;
        }
        self.head = (self.head + 1) % N;
        self.is_full = self.head == self.tail;
    }

    /// Removes and returns the oldest sample's value, or `None` when empty.
    pub fn pop(&mut self) -> Option<T> {
        self.ensure_insertion_order();
        if self.is_empty() {
            return None;
        }
        self.values_are_intervals = false;

        let value = self.slots[self.tail].value;
        self.is_full = false;
        self.tail = (self.tail + 1) % N;
        Some(value)
    }

    /// Returns the oldest sample's value without removing it.
    pub fn peek(&mut self) -> Option<T> {
        self.ensure_insertion_order();
        if self.is_empty() {
            return None;
        }
        Some(self.slots[self.tail].value)
    }

    /// Returns the oldest sample's timestamp without removing it.
    pub fn peek_time(&mut self) -> Option<U> {
        self.ensure_insertion_order();
        if self.is_empty() {
            return None;
        }
        Some(self.slots[self.tail].time)
    }

    /// Pops the oldest sample when it is still *within* `interval` of `now`,
    /// i.e. when `now - oldest_time < interval`. Returns whether a sample
    /// was removed.
    ///
    /// Counterpart of [`Self::delete_if_older_than`] with the comparison
    /// inverted; integrations that treat the window as "keep only samples
    /// that have aged past `interval`" use this variant.
    pub fn delete_if_within_interval(&mut self, now: U, interval: U) -> bool {
        match self.peek_time() {
            Some(oldest) if now - oldest < interval => {
                self.pop();
                true
            }
            _ => false,
        }
    }

    /// Pops the oldest sample when its age has reached `interval`, i.e. when
    /// `now - oldest_time >= interval`. Returns whether a sample was removed.
    pub fn delete_if_older_than(&mut self, now: U, interval: U) -> bool {
        match self.peek_time() {
            Some(oldest) if now - oldest >= interval => {
                self.pop();
                true
            }
            _ => false,
        }
    }

    /// Discards all samples in O(1). Slots are not zeroed.
    pub fn clear(&mut self) {
        self.tail = self.head;
        self.is_full = false;
        self.order = SlotOrder::Insertion;
        self.values_are_intervals = false;
    }

    // ---- capacity bookkeeping ----

    /// Number of live samples.
    pub fn len(&self) -> usize {
        if self.is_full {
            N
        } else if self.head >= self.tail {
            self.head - self.tail
        } else {
            N + self.head - self.tail
        }
    }

    /// True when no samples are live.
    pub fn is_empty(&self) -> bool {
        !self.is_full && self.head == self.tail
    }

    /// True when the next push will displace the oldest sample.
    pub fn is_full(&self) -> bool {
        self.is_full
    }

    /// Fixed capacity `N`.
    pub fn capacity(&self) -> usize {
        N
    }

    /// Total number of pushes since construction or the last reset,
    /// independent of eviction. Wraps on overflow.
    pub fn push_count(&self) -> u32 {
        self.push_count
    }

    /// Resets the push counter to zero.
    pub fn reset_push_count(&mut self) {
        self.push_count = 0;
    }

    /// Iterates the live window oldest to newest.
    pub fn iter(&mut self) -> Iter<'_, T, U, N> {
        self.ensure_insertion_order();
        Iter {
            slots: &self.slots,
            tail: self.tail,
            len: self.len(),
            logical: 0,
        }
    }

    // ---- value statistics ----

    /// Smallest live value. Linear scan; no reordering.
    pub fn min_value(&self) -> Option<T> {
        let len = self.len();
        if len == 0 {
            return None;
        }
        let mut min = self.slots[ring_index(0, self.tail, N)].value;
        for i in 1..len {
            let v = self.slots[ring_index(i, self.tail, N)].value;
            if v < min {
                min = v;
            }
        }
        Some(min)
    }

    /// Largest live value. Linear scan; no reordering.
    pub fn max_value(&self) -> Option<T> {
        let len = self.len();
        if len == 0 {
            return None;
        }
        let mut max = self.slots[ring_index(0, self.tail, N)].value;
        for i in 1..len {
            let v = self.slots[ring_index(i, self.tail, N)].value;
            if v > max {
                max = v;
            }
        }
        Some(max)
    }

    /// `max - min`, or `None` when empty.
    pub fn range(&self) -> Option<T> {
        Some(self.max_value()? - self.min_value()?)
    }

    /// Exact median: the sample at sorted index `len / 2` (upper middle for
    /// even lengths). Always a value that was actually pushed.
    pub fn median(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        self.ensure_sorted_by_value();
        stats::median_of(&self.slots, self.tail, self.len(), |s: &Sample<T, U>| {
            s.value
        })
    }

    /// Smoothed median with the default reach of `len / 4` items on each
    /// side of the median position.
    pub fn median_average(&mut self) -> Option<T> {
        let max_distance = self.len() / 4;
        self.median_average_with(max_distance)
    }

    /// Smoothed median: mean of `1 + 2 * max_distance` sorted items (one
    /// more when the length is even) centered on the median index, clamped
    /// to the live length.
    pub fn median_average_with(&mut self, max_distance: usize) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        self.ensure_sorted_by_value();
        stats::median_average_of(
            &self.slots,
            self.tail,
            self.len(),
            max_distance,
            |s: &Sample<T, U>| s.value,
        )
    }

    /// Mean of the live values. Order-independent, so the window is never
    /// reordered. Uses the running-average formula unless the `plain-sum`
    /// feature selects `sum / len`.
    pub fn average(&self) -> Option<T> {
        stats::mean_of_range(&self.slots, self.tail, 0, self.len(), |s: &Sample<T, U>| {
            s.value
        })
    }

    /// Mean absolute deviation of the live values around their mean.
    pub fn mean_abs_deviation_around_average(&self) -> Option<T> {
        let center = self.average()?;
        stats::mean_of_range(&self.slots, self.tail, 0, self.len(), |s: &Sample<T, U>| {
            stats::abs_diff(s.value, center)
        })
    }

    /// Mean absolute deviation of the live values around their smoothed
    /// median (see [`Self::median_average_with`]).
    pub fn mean_abs_deviation_around_median_average(
        &mut self,
        max_distance: usize,
    ) -> Option<T> {
        let center = self.median_average_with(max_distance)?;
        stats::mean_of_range(&self.slots, self.tail, 0, self.len(), |s: &Sample<T, U>| {
            stats::abs_diff(s.value, center)
        })
    }

    /// Number of live values with `|value - test| < epsilon` (strict).
    pub fn occurrence_of(&self, test: T, epsilon: T) -> usize {
        stats::count_within_of(
            &self.slots,
            self.tail,
            self.len(),
            test,
            epsilon,
            |s: &Sample<T, U>| s.value,
        )
    }

    /// Fraction of live values with `|value - test| < epsilon`, or `None`
    /// when empty.
    pub fn frequency_of(&self, test: T, epsilon: T) -> Option<f32> {
        let len = self.len();
        if len == 0 {
            return None;
        }
        Some(self.occurrence_of(test, epsilon) as f32 / len as f32)
    }

    // ---- interval statistics ----

    /// Median inter-arrival interval, or `None` below two samples.
    pub fn median_interval(&mut self) -> Option<T> {
        let genuine = self.sort_genuine_intervals()?;
        let result =
            stats::median_of(&self.slots, self.tail, genuine, |s: &Sample<T, U>| s.value);
        self.restore_insertion_order_now();
        result
    }

    /// Smoothed median inter-arrival interval (reach `genuine_len / 4`), or
    /// `None` below two samples.
    pub fn median_average_interval(&mut self) -> Option<T> {
        let genuine = self.sort_genuine_intervals()?;
        let result = stats::median_average_of(
            &self.slots,
            self.tail,
            genuine,
            genuine / 4,
            |s: &Sample<T, U>| s.value,
        );
        self.restore_insertion_order_now();
        result
    }

    /// Mean inter-arrival interval, or `None` below two samples.
    pub fn average_interval(&mut self) -> Option<T> {
        let len = self.len();
        if len < 2 {
            return None;
        }
        self.ensure_insertion_order();
        self.intervals_to_values();
        stats::mean_of_range(&self.slots, self.tail, 0, len - 1, |s: &Sample<T, U>| {
            s.value
        })
    }

    /// `1 / median_interval`, or `None` below two samples or when the median
    /// interval is zero.
    pub fn median_rate_of_change(&mut self) -> Option<T> {
        Self::rate_of(self.median_interval()?)
    }

    /// `1 / median_average_interval`, with the same guards.
    pub fn median_average_rate_of_change(&mut self) -> Option<T> {
        Self::rate_of(self.median_average_interval()?)
    }

    /// `1 / average_interval`, with the same guards.
    pub fn average_rate_of_change(&mut self) -> Option<T> {
        Self::rate_of(self.average_interval()?)
    }

    // ---- reorder/restore protocol ----

    /// Restores insertion order when a statistic left the window sorted by
    /// value. Invoked by every operation that reads or moves the tail.
    fn ensure_insertion_order(&mut self) {
        if self.order == SlotOrder::ByValue {
            let len = self.len();
            insertion_sort(&mut self.slots, self.tail, len, |s: &Sample<T, U>| {
                s.insert_order
            });
            self.order = SlotOrder::Insertion;

            #[cfg(feature = "log")]
            log::trace!("restored insertion order over {} samples", len);
            #[cfg(feature = "defmt")]
            defmt::trace!("restored insertion order over {=usize} samples", len);
        }
    }

    /// Tags age ranks and sorts the window by value, unless a previous
    /// statistic already left it sorted.
    fn ensure_sorted_by_value(&mut self) {
        if self.order == SlotOrder::Insertion {
            let len = self.len();
            self.tag_insertion_ranks();
            insertion_sort(&mut self.slots, self.tail, len, |s: &Sample<T, U>| s.value);
            self.order = SlotOrder::ByValue;

            #[cfg(feature = "log")]
            log::trace!("sorted {} samples by value", len);
            #[cfg(feature = "defmt")]
            defmt::trace!("sorted {=usize} samples by value", len);
        }
    }

    /// Assigns `insert_order = 0..len` (0 = oldest). The window must be in
    /// insertion order.
    fn tag_insertion_ranks(&mut self) {
        for i in 0..self.len() {
            self.slots[ring_index(i, self.tail, N)].insert_order = i as u8;
        }
    }

    /// Applies the interval transform and sorts the `len - 1` genuine
    /// intervals by value, leaving the manufactured trailing zero in place
    /// so it never displaces a real interval. Returns the genuine count, or
    /// `None` below two samples. The caller must restore insertion order
    /// with [`Self::restore_insertion_order_now`] before returning.
    fn sort_genuine_intervals(&mut self) -> Option<usize> {
        let len = self.len();
        if len < 2 {
            return None;
        }
        self.ensure_insertion_order();
        self.intervals_to_values();
        self.tag_insertion_ranks();
        insertion_sort(&mut self.slots, self.tail, len - 1, |s: &Sample<T, U>| s.value);
        Some(len - 1)
    }

    /// Unconditional restore sort keyed on the age tags. Used after the
    /// partial interval sort, which must not be left behind as "sorted by
    /// value".
    fn restore_insertion_order_now(&mut self) {
        let len = self.len();
        insertion_sort(&mut self.slots, self.tail, len, |s: &Sample<T, U>| {
            s.insert_order
        });
    }

    /// Rewrites each value to the time delta to its successor, in insertion
    /// order; the newest item gets a neutral zero. Cached until the next
    /// push/pop. Destroys the original sample values.
    fn intervals_to_values(&mut self) {
        if self.values_are_intervals {
            return;
        }
        let len = self.len();
        for i in 1..len {
            let earlier = self.slots[ring_index(i - 1, self.tail, N)].time;
            let later = self.slots[ring_index(i, self.tail, N)].time;
            let delta: T = NumCast::from(later - earlier).unwrap_or_else(T::zero);
            self.slots[ring_index(i - 1, self.tail, N)].value = delta;
        }
        self.slots[ring_index(len - 1, self.tail, N)].value = T::zero();
        self.values_are_intervals = true;
    }

    fn rate_of(interval: T) -> Option<T> {
        if interval.is_zero() {
            None
        } else {
            Some(T::one() / interval)
        }
    }
}

impl<T, U, const N: usize> Default for MedianBuffer<T, U, N>
where
    T: Copy + Default + PartialOrd + Num + NumCast,
    U: Copy + Default + PartialOrd + Num + NumCast + Unsigned,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Oldest-to-newest iterator over the live window.
pub struct Iter<'a, T, U, const N: usize> {
    slots: &'a [Sample<T, U>; N],
    tail: usize,
    len: usize,
    logical: usize,
}

impl<'a, T, U, const N: usize> Iterator for Iter<'a, T, U, N> {
    type Item = &'a Sample<T, U>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.logical >= self.len {
            return None;
        }
        let item = &self.slots[ring_index(self.logical, self.tail, N)];
        self.logical += 1;
        Some(item)
    }
}
