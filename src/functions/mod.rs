pub mod cached;
pub mod indicators;
pub mod traits;

pub use cached::CachedIndicator;
pub use traits::{Calculation, Indicator};
