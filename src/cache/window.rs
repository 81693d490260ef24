use crate::data::series::Series;
use std::num::NonZeroUsize;

/// How many results a cache may retain.
///
/// Resolved once when the cache is built and never reclassified afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowSize {
    /// Follow the series' own retention cap, re-read on every request.
    Unbounded,
    /// Keep this many results whatever the series retains.
    Fixed(NonZeroUsize),
}

impl WindowSize {
    /// Resolves a consumer's declared lookback. No declaration, or a zero
    /// one, means unbounded.
    pub fn resolve(declared: Option<usize>) -> Self {
        match declared.and_then(NonZeroUsize::new) {
            Some(n) => Self::Fixed(n),
            None => Self::Unbounded,
        }
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self, Self::Fixed(_))
    }

    /// Effective cap for the next request, always at least 1.
    pub fn cap<S: Series + ?Sized>(&self, series: &S) -> usize {
        match self {
            Self::Fixed(n) => n.get(),
            Self::Unbounded => series.retention_cap().max(1),
        }
    }
}
