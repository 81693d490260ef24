use crate::cache::{EvictionPolicy, IndexedMemoCache, Lookup, WindowSize};
use crate::data::series::SharedSeries;
use crate::error::{Result, SeriesCacheError};
use crate::functions::traits::{Calculation, Indicator};
use std::cell::RefCell;

/// An indicator whose values are memoized per bar index.
///
/// The lookback window is taken from [`Calculation::window`] once, at
/// construction. Single-threaded: the series is an `Rc` and the cache a
/// `RefCell`.
pub struct CachedIndicator<C: Calculation> {
    calculation: C,
    series: SharedSeries,
    cache: RefCell<IndexedMemoCache<C::Output>>,
}

impl<C: Calculation> CachedIndicator<C> {
    pub fn from_calculation(series: SharedSeries, calculation: C) -> Self {
        let window = WindowSize::resolve(calculation.window());
        Self {
            calculation,
            series,
            cache: RefCell::new(IndexedMemoCache::new(window)),
        }
    }

    /// Replaces the eviction policy, discarding anything cached so far.
    pub fn with_eviction(self, eviction: EvictionPolicy) -> Self {
        let window = self.window();
        Self {
            cache: RefCell::new(IndexedMemoCache::with_eviction(window, eviction)),
            ..self
        }
    }

    pub fn calculation(&self) -> &C {
        &self.calculation
    }

    pub fn window(&self) -> WindowSize {
        self.cache.borrow().window()
    }

    pub fn cache_len(&self) -> usize {
        self.cache.borrow().len()
    }

    pub fn highest_result_index(&self) -> Option<usize> {
        self.cache.borrow().highest_result_index()
    }

    pub fn is_cached(&self, index: usize) -> bool {
        self.cache.borrow().cached(index).is_some()
    }
}

impl<C: Calculation> Indicator for CachedIndicator<C> {
    type Output = C::Output;

    fn value(&self, index: usize) -> Result<Self::Output> {
        let lookup = {
            let series = self.series.try_borrow().map_err(|_| {
                SeriesCacheError::Indicator("series is being modified".to_string())
            })?;
            self.cache.borrow_mut().lookup(&*series, index)?
        };

        match lookup {
            Lookup::Hit(value) => Ok(value),
            Lookup::Miss(slot) => {
                let value = self.calculation.calculate(self, slot.compute_index())?;
                Ok(self.cache.borrow_mut().fill(slot, value))
            }
        }
    }

    fn series(&self) -> &SharedSeries {
        &self.series
    }
}
