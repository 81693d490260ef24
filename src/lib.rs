//! seriescache: memoized indicator values over bounded, front-truncated bar series.

pub mod cache;
pub mod config;
pub mod data;
pub mod error;
pub mod functions;

pub use cache::{EvictionPolicy, IndexedMemoCache, WindowSize};
pub use data::{Bar, BarSeries, Series, SharedSeries};
pub use error::{Result, SeriesCacheError};
pub use functions::{CachedIndicator, Calculation, Indicator};
