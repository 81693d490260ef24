pub mod price;
pub mod trend;

pub use price::{PriceCalculation, PriceField, PriceIndicator};
pub use trend::{EmaCalculation, SmaCalculation, EMA, SMA};
