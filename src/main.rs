use anyhow::{bail, Context, Result};
use seriescache::cache::EvictionPolicy;
use seriescache::config::ConfigManager;
use seriescache::data::CsvConnector;
use seriescache::functions::indicators::{PriceIndicator, EMA, SMA};
use seriescache::functions::Indicator;
use std::rc::Rc;

const USAGE: &str = "usage: seriescache <bars.csv> [period] [config.toml]";

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let Some(csv_path) = args.next() else {
        bail!(USAGE);
    };
    let period: usize = match args.next() {
        Some(raw) => raw.parse().with_context(|| format!("invalid period '{}'", raw))?,
        None => 14,
    };

    let manager = ConfigManager::new();
    if let Some(config_path) = args.next() {
        manager
            .load_layered(&config_path)
            .with_context(|| format!("loading {}", config_path))?;
    }
    let config = manager.get();

    let series = CsvConnector::load_series(&csv_path, config.series.maximum_bar_count)
        .with_context(|| format!("loading {}", csv_path))?;
    let Some(last) = series.end_index() else {
        bail!("{} contains no bars", csv_path);
    };
    let first = series.begin_index();
    let series = series.into_shared();

    let eviction = EvictionPolicy::from(&config.eviction);
    let close = Rc::new(PriceIndicator::close(series).with_eviction(eviction));
    let sma = SMA::new(close.clone(), period)?.with_eviction(eviction);
    let ema = EMA::new(close.clone(), period)?.with_eviction(eviction);

    for index in first..=last {
        sma.value(index)?;
        ema.value(index)?;
    }

    println!(
        "bar {}: close={:.4} sma({})={:.4} ema({})={:.4}",
        last,
        close.value(last)?,
        period,
        sma.value(last)?,
        period,
        ema.value(last)?
    );
    log::info!(
        "cached results: close={} sma={} ema={}",
        close.cache_len(),
        sma.cache_len(),
        ema.cache_len()
    );
    Ok(())
}
