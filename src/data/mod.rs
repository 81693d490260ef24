pub mod connectors;
pub mod series;

pub use connectors::{CsvConnector, OhlcvColumns};
pub use series::{Bar, BarSeries, Series, SharedSeries, UNBOUNDED};
