use crate::error::{Result, SeriesCacheError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Retention cap reported by a series that never drops bars.
pub const UNBOUNDED: usize = usize::MAX;

/// The two facts a result cache needs from the data it is computed over.
pub trait Series {
    /// Number of entries already discarded from the front. Never decreases.
    fn removed_count(&self) -> usize;

    /// Maximum number of entries the series keeps, [`UNBOUNDED`] if it keeps everything.
    fn retention_cap(&self) -> usize;
}

/// A bar series shared between the indicators computed over it.
pub type SharedSeries = Rc<RefCell<BarSeries>>;

/// One OHLCV bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    pub fn new(timestamp: DateTime<Utc>, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// High and low must bound open and close; volume may not be negative.
    pub fn check(&self) -> Result<()> {
        let invalid = |what: String| {
            Err(SeriesCacheError::DataLoading(format!("Invalid bar at {}: {}", self.timestamp, what)))
        };
        if self.high < self.low {
            return invalid(format!("high ({}) < low ({})", self.high, self.low));
        }
        if self.high < self.open.max(self.close) {
            return invalid(format!("high ({}) below open ({}) or close ({})", self.high, self.open, self.close));
        }
        if self.low > self.open.min(self.close) {
            return invalid(format!("low ({}) above open ({}) or close ({})", self.low, self.open, self.close));
        }
        if self.volume < 0.0 {
            return invalid(format!("negative volume ({})", self.volume));
        }
        Ok(())
    }
}

/// Append-only bar storage that can be capped, in which case the oldest
/// bars are dropped as new ones arrive. Absolute indices keep counting
/// across drops: the first retained bar sits at [`BarSeries::begin_index`].
#[derive(Debug, Clone)]
pub struct BarSeries {
    name: String,
    bars: VecDeque<Bar>,
    maximum_bar_count: Option<usize>,
    removed_count: usize,
}

impl BarSeries {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bars: VecDeque::new(),
            maximum_bar_count: None,
            removed_count: 0,
        }
    }

    pub fn with_maximum_bar_count(name: impl Into<String>, maximum_bar_count: usize) -> Result<Self> {
        let mut series = Self::new(name);
        series.set_maximum_bar_count(Some(maximum_bar_count))?;
        Ok(series)
    }

    pub fn into_shared(self) -> SharedSeries {
        Rc::new(RefCell::new(self))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn maximum_bar_count(&self) -> Option<usize> {
        self.maximum_bar_count
    }

    /// Changes the cap and drops any bars already over it.
    pub fn set_maximum_bar_count(&mut self, maximum_bar_count: Option<usize>) -> Result<()> {
        if maximum_bar_count == Some(0) {
            return Err(SeriesCacheError::Configuration(
                "Maximum bar count must be positive".to_string(),
            ));
        }
        self.maximum_bar_count = maximum_bar_count;
        self.remove_exceeding_bars();
        Ok(())
    }

    /// Appends a bar. Timestamps must be strictly increasing and the bar
    /// must pass [`Bar::check`].
    pub fn add_bar(&mut self, bar: Bar) -> Result<()> {
        bar.check()?;
        if let Some(last) = self.bars.back() {
            if bar.timestamp <= last.timestamp {
                return Err(SeriesCacheError::DataLoading(format!(
                    "Bar at {} is not after the last bar at {} in series '{}'",
                    bar.timestamp, last.timestamp, self.name
                )));
            }
        }
        self.bars.push_back(bar);
        self.remove_exceeding_bars();
        Ok(())
    }

    pub fn bar_count(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn begin_index(&self) -> usize {
        self.removed_count
    }

    pub fn end_index(&self) -> Option<usize> {
        (self.removed_count + self.bars.len()).checked_sub(1)
    }

    pub fn first_bar(&self) -> Option<&Bar> {
        self.bars.front()
    }

    pub fn last_bar(&self) -> Option<&Bar> {
        self.bars.back()
    }

    /// Returns the bar at absolute `index`.
    ///
    /// Indices that were already dropped resolve to the first retained bar.
    pub fn bar(&self, index: usize) -> Result<&Bar> {
        let end = self.end_index().ok_or(SeriesCacheError::EmptySeries)?;
        if index > end {
            return Err(SeriesCacheError::OutOfRange {
                index,
                begin: self.removed_count,
                end,
            });
        }
        let inner = match index.checked_sub(self.removed_count) {
            Some(inner) => inner,
            None => {
                log::trace!(
                    "series '{}' ({} bars): bar {} already removed, using {} instead",
                    self.name,
                    self.bars.len(),
                    index,
                    self.removed_count
                );
                0
            }
        };
        self.bars.get(inner).ok_or(SeriesCacheError::OutOfRange {
            index,
            begin: self.removed_count,
            end,
        })
    }

    fn remove_exceeding_bars(&mut self) {
        let Some(max) = self.maximum_bar_count else {
            return;
        };
        let excess = self.bars.len().saturating_sub(max);
        if excess > 0 {
            self.bars.drain(..excess);
            self.removed_count += excess;
        }
    }
}

impl Series for BarSeries {
    fn removed_count(&self) -> usize {
        self.removed_count
    }

    fn retention_cap(&self) -> usize {
        self.maximum_bar_count.unwrap_or(UNBOUNDED)
    }
}
