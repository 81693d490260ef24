use crate::data::series::SharedSeries;
use crate::error::Result;
use crate::functions::cached::CachedIndicator;
use std::rc::Rc;

/// Base trait for all indicators
pub trait Indicator {
    type Output: Clone;

    /// Value at absolute bar `index`
    fn value(&self, index: usize) -> Result<Self::Output>;

    /// Series the indicator is computed over
    fn series(&self) -> &SharedSeries;
}

/// Per-index formula behind a [`CachedIndicator`].
pub trait Calculation: Sized {
    type Output: Clone;

    /// Computes the value at `index`. `this` is the cached indicator being
    /// filled, so a formula can read its own earlier values.
    fn calculate(&self, this: &CachedIndicator<Self>, index: usize) -> Result<Self::Output>;

    /// Fixed lookback this formula needs, if any. `None` lets the cache
    /// follow the series' retention cap.
    fn window(&self) -> Option<usize> {
        None
    }
}

impl<I: Indicator + ?Sized> Indicator for Rc<I> {
    type Output = I::Output;

    fn value(&self, index: usize) -> Result<Self::Output> {
        (**self).value(index)
    }

    fn series(&self) -> &SharedSeries {
        (**self).series()
    }
}

impl<I: Indicator + ?Sized> Indicator for &I {
    type Output = I::Output;

    fn value(&self, index: usize) -> Result<Self::Output> {
        (**self).value(index)
    }

    fn series(&self) -> &SharedSeries {
        (**self).series()
    }
}
