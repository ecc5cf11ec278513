//! Integration tests for the circular insertion/removal surface:
//! FIFO semantics, overwrite-on-full, timed deletion, and bookkeeping.

use medring::MedianBuffer;

#[test]
fn fifo_order_without_eviction() {
    let mut buf: MedianBuffer<i32, u32, 8> = MedianBuffer::new();
    let pushed = [3, -1, 4, 1, -5, 9];
    for (i, v) in pushed.into_iter().enumerate() {
        buf.push(v, i as u32 * 10);
    }

    let popped: Vec<i32> = std::iter::from_fn(|| buf.pop()).collect();
    assert_eq!(popped, pushed);
    assert!(buf.is_empty());
}

#[test]
fn fifo_order_with_interleaved_statistics() {
    let mut buf: MedianBuffer<i32, u32, 8> = MedianBuffer::new();
    let pushed = [5, 1, 9, 3, 7];
    for (i, v) in pushed.into_iter().enumerate() {
        buf.push(v, i as u32);
        // Each of these may leave the window sorted internally
        let _ = buf.median();
        let _ = buf.median_average();
        let _ = buf.min_value();
        let _ = buf.mean_abs_deviation_around_average();
    }

    let popped: Vec<i32> = std::iter::from_fn(|| buf.pop()).collect();
    assert_eq!(popped, pushed);
}

#[test]
fn capacity_overwrite_keeps_newest_window() {
    const N: usize = 4;
    let mut buf: MedianBuffer<i32, u32, N> = MedianBuffer::new();
    for i in 0..10 {
        buf.push(i, i as u32);
    }

    assert_eq!(buf.len(), N);
    let popped: Vec<i32> = std::iter::from_fn(|| buf.pop()).collect();
    assert_eq!(popped, vec![6, 7, 8, 9]);
}

#[test]
fn overwrite_after_statistic_displaces_true_oldest() {
    let mut buf: MedianBuffer<i32, u32, 3> = MedianBuffer::new();
    buf.push(30, 0);
    buf.push(10, 1);
    buf.push(20, 2);

    // Leaves the window internally sorted
    assert_eq!(buf.median(), Some(20));

    // Full buffer: this push must evict 30 (the oldest), not whatever
    // happened to sit at the tail slot after sorting
    buf.push(40, 3);
    let popped: Vec<i32> = std::iter::from_fn(|| buf.pop()).collect();
    assert_eq!(popped, vec![10, 20, 40]);
}

#[test]
fn peek_family_is_non_destructive() {
    let mut buf: MedianBuffer<u16, u64, 4> = MedianBuffer::new();
    buf.push(11, 1_000);
    buf.push(22, 2_000);

    assert_eq!(buf.peek(), Some(11));
    assert_eq!(buf.peek_time(), Some(1_000));
    assert_eq!(buf.len(), 2);

    assert_eq!(buf.pop(), Some(11));
    assert_eq!(buf.peek_time(), Some(2_000));
}

#[test]
fn empty_buffer_defaults() {
    let mut buf: MedianBuffer<i32, u32, 6> = MedianBuffer::new();
    assert_eq!(buf.pop(), None);
    assert_eq!(buf.peek(), None);
    assert_eq!(buf.peek_time(), None);
    assert_eq!(buf.median(), None);
    assert_eq!(buf.average(), None);
    assert_eq!(buf.min_value(), None);
    assert_eq!(buf.max_value(), None);
    assert_eq!(buf.range(), None);
    assert!(buf.is_empty());
    assert_eq!(buf.len(), 0);
}

#[test]
fn clear_discards_everything() {
    let mut buf: MedianBuffer<i32, u32, 4> = MedianBuffer::new();
    for i in 0..4 {
        buf.push(i * 10, i as u32);
    }
    assert!(buf.is_full());

    buf.clear();
    assert!(buf.is_empty());
    assert!(!buf.is_full());
    assert_eq!(buf.median(), None);

    // Buffer remains usable
    buf.push(99, 100);
    assert_eq!(buf.pop(), Some(99));
}

#[test]
fn push_count_is_independent_of_eviction() {
    let mut buf: MedianBuffer<i32, u32, 2> = MedianBuffer::new();
    for i in 0..9 {
        buf.push(i, i as u32);
    }
    assert_eq!(buf.push_count(), 9);
    assert_eq!(buf.len(), 2);

    buf.pop();
    assert_eq!(buf.push_count(), 9);

    buf.reset_push_count();
    assert_eq!(buf.push_count(), 0);
}

#[test]
fn delete_variants_disagree_exactly_where_the_name_inverted() {
    // Oldest sample at t=100; now=130 gives age 30 against interval 50.
    let mut literal: MedianBuffer<i32, u32, 4> = MedianBuffer::new();
    literal.push(1, 100);
    let mut intended: MedianBuffer<i32, u32, 4> = MedianBuffer::new();
    intended.push(1, 100);

    // Fresh sample: literal variant deletes, intended variant keeps
    assert!(literal.delete_if_within_interval(130, 50));
    assert!(!intended.delete_if_older_than(130, 50));
    assert_eq!(intended.len(), 1);

    // Expired sample (age 80 >= 50): intended variant deletes
    assert!(intended.delete_if_older_than(180, 50));
    assert!(intended.is_empty());

    // Both are no-ops on an empty buffer
    assert!(!literal.delete_if_within_interval(200, 50));
    assert!(!intended.delete_if_older_than(200, 50));
}

#[test]
fn iter_walks_oldest_to_newest_across_the_wrap() {
    let mut buf: MedianBuffer<i32, u32, 3> = MedianBuffer::new();
    for i in 0..5 {
        buf.push(i, i as u32 * 7);
    }

    let pairs: Vec<(i32, u32)> = buf.iter().map(|s| (s.value, s.time)).collect();
    assert_eq!(pairs, vec![(2, 14), (3, 21), (4, 28)]);
}
