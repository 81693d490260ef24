use super::{eviction::EvictionPolicy, window::WindowSize};
use crate::data::series::Series;
use crate::error::{Result, SeriesCacheError};
use std::collections::VecDeque;

/// Outcome of [`IndexedMemoCache::lookup`].
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    /// The value was already computed.
    Hit(T),
    /// The slot is reserved but empty; compute and hand it to [`IndexedMemoCache::fill`].
    Miss(PendingSlot),
}

/// An empty slot waiting for its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingSlot {
    slot_index: usize,
    compute_index: usize,
}

impl PendingSlot {
    fn at(index: usize) -> Self {
        Self {
            slot_index: index,
            compute_index: index,
        }
    }

    /// Absolute index the computed value is stored under.
    pub fn slot_index(&self) -> usize {
        self.slot_index
    }

    /// Index to pass to the compute function. Differs from
    /// [`slot_index`](Self::slot_index) only for requests below the series'
    /// removal boundary, which are computed at index 0.
    pub fn compute_index(&self) -> usize {
        self.compute_index
    }
}

/// Sliding-window memo of an index-keyed computation over a [`Series`].
///
/// The buffer holds the contiguous absolute range
/// `[highest_result_index - len + 1, highest_result_index]`; a `None` slot is
/// in range but not computed yet. Not thread-safe: wrap the whole cache in one
/// lock if it must be shared.
#[derive(Debug, Clone)]
pub struct IndexedMemoCache<T> {
    results: VecDeque<Option<T>>,
    highest_result_index: Option<usize>,
    window: WindowSize,
    eviction: EvictionPolicy,
}

impl<T: Clone> IndexedMemoCache<T> {
    pub fn new(window: WindowSize) -> Self {
        Self::with_eviction(window, EvictionPolicy::default())
    }

    pub fn with_eviction(window: WindowSize, eviction: EvictionPolicy) -> Self {
        log::debug!("memo cache window resolved to {:?}", window);
        Self {
            results: VecDeque::new(),
            highest_result_index: None,
            window,
            eviction,
        }
    }

    pub fn window(&self) -> WindowSize {
        self.window
    }

    pub fn eviction(&self) -> EvictionPolicy {
        self.eviction
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn highest_result_index(&self) -> Option<usize> {
        self.highest_result_index
    }

    /// Oldest absolute index the buffer covers, clamped at 0.
    pub fn lower_bound(&self) -> Option<usize> {
        self.highest_result_index
            .map(|highest| (highest + 1).saturating_sub(self.results.len()))
    }

    /// Value memoized for `index`, if any.
    pub fn cached(&self, index: usize) -> Option<&T> {
        self.position_of(index)
            .and_then(|position| self.results[position].as_ref())
    }

    /// Returns the value at `index`, computing it with `compute` on a miss.
    pub fn get<S, F>(&mut self, series: &S, index: usize, compute: F) -> Result<T>
    where
        S: Series + ?Sized,
        F: FnOnce(usize) -> T,
    {
        self.try_get(series, index, |i| Ok(compute(i)))
    }

    /// Like [`get`](Self::get) with a fallible computation. A failure leaves
    /// the slot empty so the next request retries.
    pub fn try_get<S, F>(&mut self, series: &S, index: usize, compute: F) -> Result<T>
    where
        S: Series + ?Sized,
        F: FnOnce(usize) -> Result<T>,
    {
        match self.lookup(series, index)? {
            Lookup::Hit(value) => Ok(value),
            Lookup::Miss(slot) => {
                let value = compute(slot.compute_index())?;
                Ok(self.fill(slot, value))
            }
        }
    }

    /// Makes the buffer cover `index` and reports whether its value is known.
    ///
    /// The cache is not borrowed while the caller computes a miss, so the
    /// computation may itself read other indices of this cache.
    pub fn lookup<S: Series + ?Sized>(&mut self, series: &S, index: usize) -> Result<Lookup<T>> {
        if index == usize::MAX {
            return Err(SeriesCacheError::InvalidIndex(index));
        }

        let removed = series.removed_count();
        let cap = self.window.cap(series);

        if index < removed {
            return Ok(self.lookup_removed(index, removed, cap));
        }

        match self.highest_result_index {
            Some(highest) if index <= highest => Ok(self.lookup_covered(index, highest)),
            _ => {
                self.grow_to(index, cap);
                Ok(Lookup::Miss(PendingSlot::at(index)))
            }
        }
    }

    /// Stores a computed value. If the slot was filled in the meantime the
    /// stored value wins and is returned; if it left the buffer the value is
    /// returned unstored.
    pub fn fill(&mut self, slot: PendingSlot, value: T) -> T {
        let Some(position) = self.position_of(slot.slot_index) else {
            return value;
        };
        match &mut self.results[position] {
            Some(existing) => existing.clone(),
            empty => {
                *empty = Some(value.clone());
                value
            }
        }
    }

    fn lookup_covered(&mut self, index: usize, highest: usize) -> Lookup<T> {
        let len = self.results.len();
        let back = highest - index;
        if back >= len {
            // older than the buffer: extend the front down to `index`
            let missing = back + 1 - len;
            self.results.reserve(missing);
            for _ in 0..missing {
                self.results.push_front(None);
            }
            return Lookup::Miss(PendingSlot::at(index));
        }
        match &self.results[len - 1 - back] {
            Some(value) => Lookup::Hit(value.clone()),
            None => Lookup::Miss(PendingSlot::at(index)),
        }
    }

    /// Requests below the series' removal boundary are answered from the
    /// slot of index `removed`, which becomes the buffer's lower bound. That
    /// slot is computed at index 0 rather than at its own index.
    fn lookup_removed(&mut self, index: usize, removed: usize, cap: usize) -> Lookup<T> {
        log::trace!(
            "result for index {} already removed from series, using slot {} instead",
            index,
            removed
        );

        let highest = match self.highest_result_index {
            Some(highest) if highest >= removed => highest,
            _ => {
                self.grow_to(removed, cap);
                removed
            }
        };

        // slot 0 must sit exactly on `removed`: drop older slots, or extend
        // the front down to it when the buffer starts above it
        let len = self.results.len();
        let below = (removed + len).saturating_sub(highest + 1);
        if below > 0 {
            self.results.drain(..below);
        } else {
            let missing = (highest + 1 - len) - removed;
            self.results.reserve(missing);
            for _ in 0..missing {
                self.results.push_front(None);
            }
        }

        match self.results.front() {
            Some(Some(value)) => Lookup::Hit(value.clone()),
            _ => Lookup::Miss(PendingSlot {
                slot_index: removed,
                compute_index: 0,
            }),
        }
    }

    /// Moves the high-water mark forward to `index`, exposing empty slots.
    fn grow_to(&mut self, index: usize, cap: usize) {
        match self.highest_result_index {
            None => {
                // fixed-window consumers may look back past their own
                // window on first use
                let len = if self.window.is_fixed() {
                    (index + 1).max(cap)
                } else {
                    (index + 1).min(cap)
                };
                self.results.clear();
                self.results.resize(len, None);
            }
            Some(highest) => {
                let gap = index - highest;
                if !self.window.is_fixed() && gap >= cap {
                    log::debug!(
                        "memo cache jump {} -> {} spans the whole cap {}, resetting",
                        highest,
                        index,
                        cap
                    );
                    self.results.clear();
                    self.results.resize(cap, None);
                } else {
                    self.results.resize(self.results.len() + gap, None);
                    self.remove_exceeding_results(cap);
                }
            }
        }
        self.highest_result_index = Some(index);
    }

    fn remove_exceeding_results(&mut self, cap: usize) {
        let excess = self.eviction.excess_to_remove(self.results.len(), cap);
        if excess > 0 {
            log::trace!("memo cache trimming {} results over cap {}", excess, cap);
            self.results.drain(..excess);
        }
    }

    fn position_of(&self, index: usize) -> Option<usize> {
        let highest = self.highest_result_index?;
        let back = highest.checked_sub(index)?;
        let len = self.results.len();
        (back < len).then(|| len - 1 - back)
    }
}
