use crate::data::series::SharedSeries;
use crate::error::Result;
use crate::functions::{
    cached::CachedIndicator,
    traits::{Calculation, Indicator},
};

/// Bar field read by a [`PriceIndicator`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceField {
    Open,
    High,
    Low,
    Close,
    Volume,
}

pub struct PriceCalculation {
    pub field: PriceField,
}

impl Calculation for PriceCalculation {
    type Output = f64;

    fn calculate(&self, this: &CachedIndicator<Self>, index: usize) -> Result<f64> {
        let series = this.series().borrow();
        let bar = series.bar(index)?;
        Ok(match self.field {
            PriceField::Open => bar.open,
            PriceField::High => bar.high,
            PriceField::Low => bar.low,
            PriceField::Close => bar.close,
            PriceField::Volume => bar.volume,
        })
    }
}

pub type PriceIndicator = CachedIndicator<PriceCalculation>;

impl CachedIndicator<PriceCalculation> {
    pub fn new(series: SharedSeries, field: PriceField) -> Self {
        Self::from_calculation(series, PriceCalculation { field })
    }

    pub fn close(series: SharedSeries) -> Self {
        Self::new(series, PriceField::Close)
    }
}
