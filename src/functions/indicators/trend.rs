use crate::error::{Result, SeriesCacheError};
use crate::functions::{
    cached::CachedIndicator,
    traits::{Calculation, Indicator},
};

// --- SMA ---
pub struct SmaCalculation<I> {
    pub indicator: I,
    pub period: usize,
}

impl<I: Indicator<Output = f64>> Calculation for SmaCalculation<I> {
    type Output = f64;

    fn calculate(&self, _this: &CachedIndicator<Self>, index: usize) -> Result<f64> {
        // shorter average until a full period is available
        let start = (index + 1).saturating_sub(self.period);
        let mut sum = 0.0;
        for i in start..=index {
            sum += self.indicator.value(i)?;
        }
        Ok(sum / (index + 1 - start) as f64)
    }

    fn window(&self) -> Option<usize> {
        Some(self.period)
    }
}

pub type SMA<I> = CachedIndicator<SmaCalculation<I>>;

impl<I: Indicator<Output = f64>> CachedIndicator<SmaCalculation<I>> {
    pub fn new(indicator: I, period: usize) -> Result<Self> {
        check_period("SMA", period)?;
        let series = indicator.series().clone();
        Ok(Self::from_calculation(series, SmaCalculation { indicator, period }))
    }
}

// --- EMA ---
pub struct EmaCalculation<I> {
    pub indicator: I,
    pub period: usize,
    multiplier: f64,
}

impl<I: Indicator<Output = f64>> Calculation for EmaCalculation<I> {
    type Output = f64;

    fn calculate(&self, this: &CachedIndicator<Self>, index: usize) -> Result<f64> {
        let current = self.indicator.value(index)?;
        if index == 0 {
            return Ok(current);
        }
        if !this.is_cached(index - 1) {
            self.warm_up(this, index)?;
        }
        let previous = this.value(index - 1)?;
        Ok((current - previous) * self.multiplier + previous)
    }

    fn window(&self) -> Option<usize> {
        Some(self.period)
    }
}

impl<I: Indicator<Output = f64>> EmaCalculation<I> {
    /// Fills `begin_index..index` oldest first so the recursion on the
    /// previous value stays one level deep.
    fn warm_up(&self, this: &CachedIndicator<Self>, index: usize) -> Result<()> {
        let begin = this.series().borrow().begin_index();
        for i in begin..index.saturating_sub(1) {
            if !this.is_cached(i) {
                this.value(i)?;
            }
        }
        Ok(())
    }
}

pub type EMA<I> = CachedIndicator<EmaCalculation<I>>;

impl<I: Indicator<Output = f64>> CachedIndicator<EmaCalculation<I>> {
    pub fn new(indicator: I, period: usize) -> Result<Self> {
        check_period("EMA", period)?;
        let series = indicator.series().clone();
        let multiplier = 2.0 / (period as f64 + 1.0);
        Ok(Self::from_calculation(
            series,
            EmaCalculation {
                indicator,
                period,
                multiplier,
            },
        ))
    }
}

fn check_period(name: &str, period: usize) -> Result<()> {
    if period == 0 {
        return Err(SeriesCacheError::Indicator(format!(
            "{}: period must be positive",
            name
        )));
    }
    Ok(())
}
