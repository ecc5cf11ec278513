//! Order statistics as free functions over a window view
//!
//! Every function here operates on `(slots, tail, len)` — a logical window
//! into the circular backing array — plus a value extractor closure, so the
//! same routines serve the sample-value and interval renditions of each
//! statistic. None of them reorder the window; the functions that need a
//! value-sorted window (`median_of`, `median_average_of`) document that as a
//! precondition, and the buffer's reorder protocol establishes it.
//!
//! ## Averaging strategy
//!
//! The default mean is the running form `avg += (x - avg) / (i + 1)`, which
//! trades a little precision for never building an intermediate sum that can
//! overflow a narrow sample type. The subtraction is branched on ordering so
//! the same formula is safe for unsigned types. The `plain-sum` cargo feature
//! switches to `sum / len` for callers whose sample type is guaranteed wide
//! enough.

use num_traits::{Num, NumCast};

use crate::ring::ring_index;

/// Absolute difference without a signed `abs`, so it works for unsigned and
/// floating sample types alike.
#[inline]
pub(crate) fn abs_diff<T>(a: T, b: T) -> T
where
    T: Copy + PartialOrd + core::ops::Sub<Output = T>,
{
    if a > b {
        a - b
    } else {
        b - a
    }
}

/// Count of `i + 1` style divisors as `T`.
///
/// The window never exceeds 255 items; a sample type that cannot represent
/// its own window length (e.g. `i8` with more than 127 live items) is a
/// contract violation, degraded here to a divisor of one rather than a panic.
#[inline]
fn count_as<T: Num + NumCast>(n: usize) -> T {
    NumCast::from(n).unwrap_or_else(T::one)
}

/// Exact median of a value-sorted window: the item at logical index `len / 2`
/// (upper middle for even lengths). Always a stored sample, never an average.
pub(crate) fn median_of<S, T>(
    slots: &[S],
    tail: usize,
    len: usize,
    value: impl Fn(&S) -> T,
) -> Option<T>
where
    T: Copy,
{
    if len == 0 {
        return None;
    }
    Some(value(&slots[ring_index(len / 2, tail, slots.len())]))
}

/// Mean over the logical sub-range `[start, start + count)`.
pub(crate) fn mean_of_range<S, T>(
    slots: &[S],
    tail: usize,
    start: usize,
    count: usize,
    value: impl Fn(&S) -> T,
) -> Option<T>
where
    T: Copy + PartialOrd + Num + NumCast,
{
    if count == 0 {
        return None;
    }
    let capacity = slots.len();

    #[cfg(not(feature = "plain-sum"))]
    {
        let mut avg = T::zero();
        for i in 0..count {
            let x = value(&slots[ring_index(start + i, tail, capacity)]);
            let n = count_as::<T>(i + 1);
            // Branch instead of (x - avg) so unsigned types never underflow
            avg = if x >= avg {
                avg + (x - avg) / n
            } else {
                avg - (avg - x) / n
            };
        }
        Some(avg)
    }

    #[cfg(feature = "plain-sum")]
    {
        let mut sum = T::zero();
        for i in 0..count {
            sum = sum + value(&slots[ring_index(start + i, tail, capacity)]);
        }
        Some(sum / count_as::<T>(count))
    }
}

/// Smoothed median of a value-sorted window: the mean of a symmetric window
/// of `1 + 2 * max_distance` items (one more when `len` is even, so both
/// middles are always included) centered on the median index, clamped to the
/// live length.
pub(crate) fn median_average_of<S, T>(
    slots: &[S],
    tail: usize,
    len: usize,
    max_distance: usize,
    value: impl Fn(&S) -> T,
) -> Option<T>
where
    T: Copy + PartialOrd + Num + NumCast,
{
    if len == 0 {
        return None;
    }
    if len == 1 {
        return Some(value(&slots[ring_index(0, tail, slots.len())]));
    }

    let mut window = 1 + 2 * max_distance + <usize as From<bool>>::from(len % 2 == 0);
    if window > len {
        window = len;
    }
    let start = (len / 2).saturating_sub(window / 2).min(len - window);
    mean_of_range(slots, tail, start, window, value)
}

/// Number of items whose absolute difference from `test` is strictly below
/// `epsilon`. Order-independent, so no sort precondition.
pub(crate) fn count_within_of<S, T>(
    slots: &[S],
    tail: usize,
    len: usize,
    test: T,
    epsilon: T,
    value: impl Fn(&S) -> T,
) -> usize
where
    T: Copy + PartialOrd + core::ops::Sub<Output = T>,
{
    let capacity = slots.len();
    (0..len)
        .filter(|&i| abs_diff(value(&slots[ring_index(i, tail, capacity)]), test) < epsilon)
        .count()
}
