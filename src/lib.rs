//! Order statistics over a fixed-capacity circular sample buffer
//!
//! Keeps the newest `N` timestamped samples in one owned array and answers
//! median, smoothed median, min/max, mean, mean-absolute-deviation, and
//! inter-arrival interval/rate questions — all in place, with no heap
//! allocation and no second array. Built for memory-constrained targets
//! where a full sorted copy or a statistics library is not an option.
//!
//! Key constraints:
//! - no_std by default gating, zero allocations, capacity fixed at 1..=255
//! - statistics never panic: empty-window conditions return `None`
//! - FIFO age order always survives any sequence of statistics calls
//!
//! ```rust
//! use medring::MedianBuffer;
//!
//! let mut samples: MedianBuffer<i32, u32, 5> = MedianBuffer::new();
//! for (i, v) in [4, 2, 9, 2].into_iter().enumerate() {
//!     samples.push(v, i as u32 * 50);
//! }
//!
//! assert_eq!(samples.median(), Some(4));
//! assert_eq!(samples.min_value(), Some(2));
//! assert_eq!(samples.max_value(), Some(9));
//! assert_eq!(samples.pop(), Some(4)); // oldest first, statistics or not
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod buffer;

mod ring;
mod stats;

// Public API
pub use buffer::{Iter, MedianBuffer, Sample};

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
