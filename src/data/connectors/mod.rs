mod csv;
mod types;
mod validator;

pub use csv::CsvConnector;
pub use types::{RequiredColumn, DATETIME_ALIASES};
pub use validator::OhlcvColumns;
