//! Sliding-window memoization of index-keyed computations.
//!
//! A series grows without limit while also dropping its oldest entries on
//! its own schedule. [`IndexedMemoCache`] computes each index at most once,
//! keeps its own memory bounded, and stays usable when asked for an index the
//! series has already discarded.
//!
//! ## Pieces
//!
//! - [`WindowSize`]: how many results may be retained, either a fixed
//!   lookback declared by the consumer or the series' own retention cap.
//! - [`EvictionPolicy`]: batched front trimming with a hysteresis band.
//! - [`IndexedMemoCache`]: the buffer, its high-water mark, gap filling and
//!   the fallback for discarded indices.
//!
//! ## Request flow
//!
//! ```text
//! get(index)
//!   index < removed_count  -> raise lower bound, answer from slot 0 (computed at index 0)
//!   index > highest        -> append placeholders (or reset on a jump >= cap), trim, compute tail
//!   index <= highest       -> map to position; below the buffer -> extend front; compute if empty
//! ```
//!
//! ## Example
//!
//! ```
//! use seriescache::cache::{IndexedMemoCache, WindowSize};
//! use seriescache::data::BarSeries;
//!
//! let series = BarSeries::new("demo");
//! let mut cache = IndexedMemoCache::new(WindowSize::Unbounded);
//! let squared = cache.get(&series, 12, |i| i * i).unwrap();
//! assert_eq!(squared, 144);
//! assert_eq!(cache.get(&series, 12, |_| unreachable!()).unwrap(), 144);
//! ```

pub mod eviction;
pub mod memo;
pub mod window;

pub use eviction::EvictionPolicy;
pub use memo::{IndexedMemoCache, Lookup, PendingSlot};
pub use window::WindowSize;
