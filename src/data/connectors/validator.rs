use crate::data::series::Bar;
use crate::error::{Result, SeriesCacheError};
use chrono::{DateTime, Utc};
use polars::prelude::*;
use super::types::RequiredColumn;

/// The five price/volume columns of a frame, found through their aliases
/// and cast to Float64.
pub struct OhlcvColumns {
    open: Column,
    high: Column,
    low: Column,
    close: Column,
    volume: Column,
}

impl OhlcvColumns {
    pub fn resolve(df: &DataFrame) -> Result<Self> {
        Ok(Self {
            open: Self::float_column(df, RequiredColumn::Open)?,
            high: Self::float_column(df, RequiredColumn::High)?,
            low: Self::float_column(df, RequiredColumn::Low)?,
            close: Self::float_column(df, RequiredColumn::Close)?,
            volume: Self::float_column(df, RequiredColumn::Volume)?,
        })
    }

    /// Name under which `required` appears in the frame
    pub fn find_name<'a>(df: &'a DataFrame, required: RequiredColumn) -> Option<&'a str> {
        df.get_column_names()
            .into_iter()
            .map(|name| name.as_str())
            .find(|name| required.aliases().iter().any(|alias| alias == name))
    }

    fn float_column(df: &DataFrame, required: RequiredColumn) -> Result<Column> {
        let name = Self::find_name(df, required).ok_or_else(|| {
            SeriesCacheError::DataLoading(format!(
                "Missing required column: {} (tried aliases: {:?})",
                required.as_str(),
                required.aliases()
            ))
        })?;
        let column = df.column(name)?;
        let dtype = column.dtype();
        if !(dtype.is_float() || dtype.is_integer()) {
            return Err(SeriesCacheError::DataLoading(format!(
                "Column '{}' ({}) must be numeric, found {:?}",
                name,
                required.as_str(),
                dtype
            )));
        }
        Ok(column.cast(&DataType::Float64)?)
    }

    /// One bar per row, paired with `timestamps`. Rows with any null field
    /// are skipped and counted.
    pub fn bars(&self, timestamps: &[DateTime<Utc>]) -> Result<(Vec<Bar>, usize)> {
        let (open, high, low) = (self.open.f64()?, self.high.f64()?, self.low.f64()?);
        let (close, volume) = (self.close.f64()?, self.volume.f64()?);

        let mut bars = Vec::with_capacity(timestamps.len());
        let mut skipped = 0;
        for (row, &timestamp) in timestamps.iter().enumerate() {
            match (open.get(row), high.get(row), low.get(row), close.get(row), volume.get(row)) {
                (Some(o), Some(h), Some(l), Some(c), Some(v)) => {
                    bars.push(Bar::new(timestamp, o, h, l, c, v))
                }
                _ => skipped += 1,
            }
        }
        Ok((bars, skipped))
    }
}
