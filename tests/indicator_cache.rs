use chrono::{Duration, TimeZone, Utc};
use seriescache::cache::{EvictionPolicy, WindowSize};
use seriescache::data::{Bar, BarSeries, Series, SharedSeries};
use seriescache::functions::indicators::{PriceField, PriceIndicator, EMA, SMA};
use seriescache::functions::Indicator;
use seriescache::SeriesCacheError;
use std::rc::Rc;

fn bar(minute: i64, close: f64) -> Bar {
    let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
    Bar::new(start + Duration::minutes(minute), close, close + 0.5, close - 0.5, close, 1000.0)
}

fn closes(n: usize) -> Vec<f64> {
    (0..n).map(|i| 100.0 + ((i * 7) % 13) as f64 - (i % 5) as f64 * 0.25).collect()
}

fn series_with(values: &[f64], maximum_bar_count: Option<usize>) -> SharedSeries {
    let mut series = BarSeries::new("test");
    series.set_maximum_bar_count(maximum_bar_count).unwrap();
    for (i, &close) in values.iter().enumerate() {
        series.add_bar(bar(i as i64, close)).unwrap();
    }
    series.into_shared()
}

fn reference_ema(values: &[f64], period: usize) -> Vec<f64> {
    let multiplier = 2.0 / (period as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    for (i, &v) in values.iter().enumerate() {
        let next = if i == 0 { v } else { (v - out[i - 1]) * multiplier + out[i - 1] };
        out.push(next);
    }
    out
}

fn assert_close(actual: f64, expected: f64) {
    assert!((actual - expected).abs() < 1e-9, "{} != {}", actual, expected);
}

#[test]
fn test_close_price_is_unbounded() {
    let series = series_with(&[1.0, 2.0, 3.0], None);
    let close = PriceIndicator::close(series);
    assert_eq!(close.window(), WindowSize::Unbounded);
    assert_eq!(close.value(1).unwrap(), 2.0);

    let volume = PriceIndicator::new(close.series().clone(), PriceField::Volume);
    assert_eq!(volume.value(2).unwrap(), 1000.0);
}

#[test]
fn test_sma_matches_direct_average() {
    let values = [1.0, 2.0, 3.0, 4.0, 5.0];
    let series = series_with(&values, None);
    let sma = SMA::new(PriceIndicator::close(series), 3).unwrap();

    assert_eq!(sma.window(), WindowSize::resolve(Some(3)));
    assert_close(sma.value(0).unwrap(), 1.0);
    assert_close(sma.value(1).unwrap(), 1.5);
    assert_close(sma.value(2).unwrap(), 2.0);
    assert_close(sma.value(4).unwrap(), 4.0);
    assert_close(sma.value(3).unwrap(), 3.0);
}

#[test]
fn test_zero_period_rejected() {
    let series = series_with(&[1.0], None);
    let close = Rc::new(PriceIndicator::close(series));
    assert!(matches!(SMA::new(close.clone(), 0), Err(SeriesCacheError::Indicator(_))));
    assert!(matches!(EMA::new(close, 0), Err(SeriesCacheError::Indicator(_))));
}

#[test]
fn test_ema_matches_reference() {
    let values = closes(300);
    let series = series_with(&values, None);
    let ema = EMA::new(PriceIndicator::close(series), 10).unwrap();
    let expected = reference_ema(&values, 10);

    for index in [0, 1, 50, 299, 120, 7] {
        assert_close(ema.value(index).unwrap(), expected[index]);
    }
}

#[test]
fn test_ema_cold_start_deep_index() {
    let values = closes(20_000);
    let series = series_with(&values, None);
    let ema = EMA::new(PriceIndicator::close(series), 14).unwrap();
    let expected = reference_ema(&values, 14);

    assert_close(ema.value(19_999).unwrap(), expected[19_999]);
}

#[test]
fn test_shared_close_is_computed_once() {
    let values = closes(50);
    let series = series_with(&values, None);
    let close = Rc::new(PriceIndicator::close(series));
    let sma = SMA::new(close.clone(), 5).unwrap();
    let ema = EMA::new(close.clone(), 5).unwrap();

    sma.value(49).unwrap();
    ema.value(49).unwrap();
    assert!(close.is_cached(45));
    assert!(sma.is_cached(49));
    assert_eq!(close.highest_result_index(), Some(49));
}

#[test]
fn test_sequential_run_keeps_cache_bounded() {
    let values = closes(5000);
    let series = series_with(&values, None);
    let close = Rc::new(PriceIndicator::close(series));
    let sma = SMA::new(close.clone(), 20).unwrap();

    for index in 0..5000 {
        sma.value(index).unwrap();
        assert!(sma.cache_len() <= 20 + 100);
    }
    // close follows the series cap, which is unbounded here
    assert_eq!(close.cache_len(), 5000);
}

#[test]
fn test_live_feed_with_capped_series() {
    let all = closes(400);
    let series = series_with(&all[..50], Some(50));
    let close = Rc::new(PriceIndicator::close(series.clone()));
    let sma = SMA::new(close.clone(), 4).unwrap();

    for (i, &value) in all.iter().enumerate().skip(50) {
        series.borrow_mut().add_bar(bar(i as i64, value)).unwrap();
        let expected = all[i - 3..=i].iter().sum::<f64>() / 4.0;
        assert_close(sma.value(i).unwrap(), expected);
        assert!(close.cache_len() <= 50 + 100);
    }
    assert_eq!(series.borrow().removed_count(), 350);
}

#[test]
fn test_configured_eviction_applies_to_close_price() {
    let all = closes(150);
    let series = series_with(&all[..50], Some(50));
    let default = PriceIndicator::close(series.clone());
    let eager = PriceIndicator::close(series.clone()).with_eviction(EvictionPolicy::new(0, 100));

    for (i, &value) in all.iter().enumerate().skip(50) {
        series.borrow_mut().add_bar(bar(i as i64, value)).unwrap();
        assert_eq!(eager.value(i).unwrap(), value);
        assert_eq!(default.value(i).unwrap(), value);
        assert!(eager.cache_len() <= 50);
    }
    // the default policy is still inside its hysteresis band
    assert!(default.cache_len() > 100);
}

#[test]
fn test_removed_bar_falls_back_to_first_retained() {
    let all = closes(100);
    let series = series_with(&all, Some(30));
    let close = PriceIndicator::close(series);

    // index 5 was dropped by the series; the first retained bar answers
    assert_eq!(close.value(5).unwrap(), all[70]);
    assert_eq!(close.value(70).unwrap(), all[70]);
    assert_eq!(close.value(99).unwrap(), all[99]);
}

#[test]
fn test_index_past_end_is_an_error_and_not_cached() {
    let series = series_with(&[1.0, 2.0], None);
    let close = PriceIndicator::close(series.clone());
    assert!(matches!(close.value(5), Err(SeriesCacheError::OutOfRange { .. })));
    assert!(!close.is_cached(5));

    series.borrow_mut().add_bar(bar(2, 3.0)).unwrap();
    series.borrow_mut().add_bar(bar(3, 4.0)).unwrap();
    series.borrow_mut().add_bar(bar(4, 5.0)).unwrap();
    series.borrow_mut().add_bar(bar(5, 6.0)).unwrap();
    assert_eq!(close.value(5).unwrap(), 6.0);
}

#[test]
fn test_value_while_series_borrowed_mutably_fails() {
    let series = series_with(&[1.0, 2.0], None);
    let close = PriceIndicator::close(series.clone());
    let _guard = series.borrow_mut();
    assert!(matches!(close.value(0), Err(SeriesCacheError::Indicator(_))));
}
