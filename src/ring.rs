//! Ring-index mapping and the in-place sort primitive
//!
//! The live window of the buffer is a contiguous range of logical positions
//! `[0, len)` starting at `tail`, wrapping modulo the capacity. Everything in
//! this module addresses the backing array exclusively through that mapping,
//! so the sort never needs to know that the "array" is really a ring.
//!
//! The sort is a plain insertion sort parameterized by a key extractor. The
//! same routine sorts the window by sample value (for order statistics) and
//! by insertion-order tag (to restore age order afterwards). Quadratic worst
//! case is fine here: the capacity is capped at 255 and typical embedded
//! windows hold 5-30 samples.

/// Translate a logical offset from `tail` into a physical slot index.
#[inline]
pub(crate) fn ring_index(logical: usize, tail: usize, capacity: usize) -> usize {
    (tail + logical) % capacity
}

/// In-place insertion sort of the logical window `[0, len)`.
///
/// `key` extracts the sort key from a slot; slots compare by that key only.
/// Sorting a prefix of the window (`len` smaller than the live length) is
/// allowed and leaves the remaining slots untouched.
pub(crate) fn insertion_sort<S, K>(slots: &mut [S], tail: usize, len: usize, key: impl Fn(&S) -> K)
where
    S: Copy,
    K: PartialOrd,
{
    let capacity = slots.len();
    for i in 1..len {
        let held = slots[ring_index(i, tail, capacity)];
        let held_key = key(&held);
        let mut j = i;
        while j > 0 {
            let prev = slots[ring_index(j - 1, tail, capacity)];
            if key(&prev) > held_key {
                slots[ring_index(j, tail, capacity)] = prev;
                j -= 1;
            } else {
                break;
            }
        }
        slots[ring_index(j, tail, capacity)] = held;
    }
}
