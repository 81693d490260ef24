use seriescache::cache::EvictionPolicy;
use seriescache::config::{AppConfig, ConfigManager, EvictionConfig, SeriesConfig};
use seriescache::data::CsvConnector;
use seriescache::data::Series;
use std::fs;

#[test]
fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.toml");
    fs::write(
        &path,
        "[eviction]\nthreshold = 20\ndivider = 4\n\n[series]\nmaximum_bar_count = 500\n",
    )
    .unwrap();

    let manager = ConfigManager::new();
    manager.load_from_file(&path).unwrap();
    let config = manager.get();

    assert_eq!(config.eviction, EvictionConfig { threshold: 20, divider: 4 });
    assert_eq!(config.series.maximum_bar_count, Some(500));

    let policy = EvictionPolicy::from(&config.eviction);
    assert_eq!(policy.threshold(), 20);
    assert_eq!(policy.divider(), 4);
}

#[test]
fn test_missing_sections_use_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("partial.toml");
    fs::write(&path, "[series]\nmaximum_bar_count = 10\n").unwrap();

    let manager = ConfigManager::new();
    manager.load_from_file(&path).unwrap();
    let config = manager.get();
    assert_eq!(config.eviction, EvictionConfig::default());
    assert_eq!(config.series, SeriesConfig { maximum_bar_count: Some(10) });
}

#[test]
fn test_invalid_file_keeps_previous_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, "[eviction]\ndivider = 0\n").unwrap();

    let manager = ConfigManager::new();
    assert!(manager.load_from_file(&path).is_err());
    assert_eq!(manager.get(), AppConfig::default());

    assert!(manager.load_from_file(dir.path().join("absent.toml")).is_err());
}

#[test]
fn test_save_and_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roundtrip.toml");

    let manager = ConfigManager::new();
    manager
        .update(|config| {
            config.eviction.threshold = 7;
            config.series.maximum_bar_count = Some(64);
        })
        .unwrap();
    manager.save_to_file(&path).unwrap();

    let reloaded = ConfigManager::new();
    reloaded.load_from_file(&path).unwrap();
    assert_eq!(reloaded.get(), manager.get());
}

#[test]
fn test_update_rejects_invalid_change() {
    let manager = ConfigManager::new();
    let result = manager.update(|config| config.series.maximum_bar_count = Some(0));
    assert!(result.is_err());
    assert_eq!(manager.get().series.maximum_bar_count, None);
}

#[test]
fn test_layered_environment_override() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("layered.toml");
    fs::write(&path, "[eviction]\nthreshold = 20\ndivider = 4\n").unwrap();

    std::env::set_var("SERIESCACHE_EVICTION__THRESHOLD", "7");
    let manager = ConfigManager::new();
    let result = manager.load_layered(&path);
    std::env::remove_var("SERIESCACHE_EVICTION__THRESHOLD");
    result.unwrap();

    let config = manager.get();
    assert_eq!(config.eviction.threshold, 7);
    assert_eq!(config.eviction.divider, 4);
}

#[test]
fn test_csv_series_uses_configured_cap() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bars.csv");
    let mut csv = String::from("timestamp,open,high,low,close,volume\n");
    for i in 0..12 {
        let price = 10.0 + i as f64;
        csv.push_str(&format!(
            "{},{},{},{},{},{}\n",
            1_700_000_000 + i * 60,
            price,
            price + 1.0,
            price - 1.0,
            price,
            100
        ));
    }
    fs::write(&path, csv).unwrap();

    let series = CsvConnector::load_series(&path, Some(5)).unwrap();
    assert_eq!(series.name(), "bars");
    assert_eq!(series.bar_count(), 5);
    assert_eq!(series.removed_count(), 7);
    assert_eq!(series.retention_cap(), 5);
    assert_eq!(series.last_bar().unwrap().close, 21.0);
}
