pub mod traits;
pub mod eviction;
pub mod series;
pub mod manager;

pub use manager::{ConfigManager, AppConfig};
pub use eviction::EvictionConfig;
pub use series::SeriesConfig;
pub use traits::ConfigSection;
