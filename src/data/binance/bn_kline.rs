// Std library crates
use std::collections::HashSet;
use std::convert::TryFrom;
use std::error::Error;
use std::fmt;

// External crates
use anyhow::{Result, bail};
use binance_sdk::common::models::Interval as binance_interval;
use binance_sdk::config::ConfigurationRestApi;
use binance_sdk::models::RestApiRateLimit;
use binance_sdk::spot::{
    SpotRestApi,
    rest_api::{KlinesIntervalEnum, KlinesItemInner, KlinesParams, RestApi},
};
use binance_sdk::{errors, errors::ConnectorError as connection_error};
use tokio::time::{Duration, sleep};

// Local crates
use crate::config::binance::{BINANCE, BinanceApiConfig};
use crate::config::DEBUG_FLAGS;
use crate::domain::{Bar, TickerInterval};
use crate::error::ChartError;
use crate::utils::{TimeUtils, time_utils};

// For "MS -> Enum" we return Result instead of panicking.
pub fn try_interval_from_ms(ms: i64) -> Result<KlinesIntervalEnum, String> {
    match ms {
        TimeUtils::MS_IN_S => Ok(KlinesIntervalEnum::Interval1s),
        TimeUtils::MS_IN_MIN => Ok(KlinesIntervalEnum::Interval1m),
        TimeUtils::MS_IN_3_MIN => Ok(KlinesIntervalEnum::Interval3m),
        TimeUtils::MS_IN_5_MIN => Ok(KlinesIntervalEnum::Interval5m),
        TimeUtils::MS_IN_15_MIN => Ok(KlinesIntervalEnum::Interval15m),
        TimeUtils::MS_IN_30_MIN => Ok(KlinesIntervalEnum::Interval30m),
        TimeUtils::MS_IN_H => Ok(KlinesIntervalEnum::Interval1h),
        TimeUtils::MS_IN_2_H => Ok(KlinesIntervalEnum::Interval2h),
        TimeUtils::MS_IN_4_H => Ok(KlinesIntervalEnum::Interval4h),
        TimeUtils::MS_IN_6_H => Ok(KlinesIntervalEnum::Interval6h),
        TimeUtils::MS_IN_8_H => Ok(KlinesIntervalEnum::Interval8h),
        TimeUtils::MS_IN_12_H => Ok(KlinesIntervalEnum::Interval12h),
        TimeUtils::MS_IN_D => Ok(KlinesIntervalEnum::Interval1d),
        TimeUtils::MS_IN_3_D => Ok(KlinesIntervalEnum::Interval3d),
        TimeUtils::MS_IN_W => Ok(KlinesIntervalEnum::Interval1w),
        TimeUtils::MS_IN_1_M => Ok(KlinesIntervalEnum::Interval1M),
        _ => Err(format!("Unsupported Binance interval: {}ms", ms)),
    }
}

#[derive(Debug, PartialEq)]
pub struct BNKline {
    pub open_timestamp_ms: i64, // only necessary field. All others are optional
    pub open_price: Option<f64>,
    pub high_price: Option<f64>,
    pub low_price: Option<f64>,
    pub close_price: Option<f64>,
    pub base_asset_volume: Option<f64>,
}

// Custom error type for BNKline for better error messages.
#[derive(Debug)]
pub enum BNKlineError {
    InvalidLength,
    InvalidType(String),
    ConnectionFailed(String),
}

impl fmt::Display for BNKlineError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            BNKlineError::InvalidLength => write!(f, "Invalid length"),
            BNKlineError::InvalidType(string) => write!(f, "Invalid type: {}", string),
            BNKlineError::ConnectionFailed(msg) => {
                write!(f, "Binance API connection failed: {}.", msg)
            }
        }
    }
}

impl Error for BNKlineError {}

/// `Some(f64)` only for the String variant holding a parseable number.
fn kline_item_to_float(item: Option<KlinesItemInner>) -> Option<f64> {
    item.and_then(|inner| {
        if let KlinesItemInner::String(s) = inner {
            s.parse::<f64>().ok()
        } else {
            None
        }
    })
}

impl TryFrom<Vec<KlinesItemInner>> for BNKline {
    type Error = BNKlineError;

    fn try_from(vec_inner_klines: Vec<KlinesItemInner>) -> Result<Self, Self::Error> {
        let mut items = vec_inner_klines.into_iter();
        let open_timestamp_ms = match items.next().ok_or(BNKlineError::InvalidLength)? {
            KlinesItemInner::Integer(a) => a,
            _ => return Err(BNKlineError::InvalidType("open_time".to_string())),
        };

        // Unparseable prices become None and are rejected in `klines_to_bars`
        let open_price = kline_item_to_float(items.next());
        let high_price = kline_item_to_float(items.next());
        let low_price = kline_item_to_float(items.next());
        let close_price = kline_item_to_float(items.next());
        let base_asset_volume = kline_item_to_float(items.next());

        Ok(BNKline {
            open_timestamp_ms,
            open_price,
            high_price,
            low_price,
            close_price,
            base_asset_volume,
        })
    }
}

fn convert_klines(data: Vec<Vec<KlinesItemInner>>) -> Result<Vec<BNKline>, BNKlineError> {
    data.into_iter().map(Vec::try_into).collect()
}

/// Klines to bars. A kline missing any price is a malformed bar.
pub fn klines_to_bars(klines: &[BNKline]) -> Result<Vec<Bar>, ChartError> {
    klines
        .iter()
        .enumerate()
        .map(|(index, kline)| {
            match (
                kline.open_price,
                kline.high_price,
                kline.low_price,
                kline.close_price,
            ) {
                (Some(open), Some(high), Some(low), Some(close)) => {
                    let bar = Bar::new(kline.open_timestamp_ms, open, high, low, close);
                    Ok(match kline.base_asset_volume {
                        Some(volume) => bar.with_volume(volume),
                        None => bar,
                    })
                }
                _ => Err(ChartError::MalformedBar {
                    index,
                    timestamp_ms: kline.open_timestamp_ms,
                    reason: "kline is missing a price field".to_string(),
                }),
            }
        })
        .collect()
}

async fn configure_binance_client() -> Result<RestApi, anyhow::Error> {
    let config = BinanceApiConfig::default();
    let rest_conf = ConfigurationRestApi::builder()
        .timeout(config.timeout_ms)
        .retries(config.retries)
        .backoff(config.backoff_ms)
        .build()?;
    // Create the Spot REST API client
    let rest_client = SpotRestApi::production(rest_conf);
    Ok(rest_client)
}

/// Sleep to the start of the next minute when the used request weight leaves
/// no headroom for another kline call.
async fn handle_rate_limits(
    rate_limits: &Option<Vec<RestApiRateLimit>>,
    ticker_interval: &TickerInterval,
    kline_call_weight: u32,
    bn_weight_limit_minute: u32,
) {
    let Some(value) = rate_limits else {
        return;
    };
    for rate_limit in value {
        if rate_limit.interval_num == 1 && rate_limit.interval == binance_interval::Minute {
            let current_weight = rate_limit.count;
            let required_headroom = bn_weight_limit_minute.saturating_sub(kline_call_weight);
            if DEBUG_FLAGS.print_fetch_pages {
                log::info!(
                    "Binance min-weight: {} (headroom: {})",
                    current_weight,
                    required_headroom
                );
            }
            if current_weight > required_headroom {
                let secs_into_min = (time_utils::utc_now_as_timestamp_ms() / 1000).rem_euclid(60);
                let sleep_duration = Duration::from_secs((60 - secs_into_min) as u64);
                log::warn!(
                    "{} Current weight ({}) > required headroom ({}), sleeping {:?} until the next minute",
                    ticker_interval,
                    current_weight,
                    required_headroom,
                    sleep_duration
                );
                sleep(sleep_duration).await;
            }
        }
    }
}

/// Prepend one page (oldest first, as Binance returns it) to `all_klines`.
/// Returns the `end_time` for the next, older page, or `None` once paging is done.
fn process_new_klines(
    mut page: Vec<BNKline>,
    limit_klines_returned: usize,
    start_ms: Option<i64>,
    all_klines: &mut Vec<BNKline>,
) -> Option<i64> {
    let first_open_ms = page.first()?.open_timestamp_ms;
    let short_page = page.len() < limit_klines_returned;
    let reached_start = start_ms.is_some_and(|start| first_open_ms <= start);

    // `end_time` is inclusive so the newest kline repeats the previous page's oldest
    if let (Some(last), Some(first_known)) = (page.last(), all_klines.first()) {
        if last.open_timestamp_ms == first_known.open_timestamp_ms {
            page.pop();
        }
    }
    if page.is_empty() {
        return None;
    }

    all_klines.splice(0..0, page);

    if short_page || reached_start {
        None
    } else {
        Some(first_open_ms)
    }
}

async fn fetch_binance_klines_with_limits(
    rest_client: &RestApi,
    params: KlinesParams,
    ticker_interval: &TickerInterval,
) -> Result<(Option<Vec<RestApiRateLimit>>, Vec<Vec<KlinesItemInner>>), anyhow::Error> {
    let response_result = rest_client.klines(params).await;

    match response_result {
        Ok(r) => {
            // Take the rate_limits (Option<Vec<...>>) from the response, then get the inner data
            let rate_limits = r.rate_limits.clone();
            let data = r.data().await?;
            Ok((rate_limits, data))
        }
        Err(e) => {
            if let Some(conn_err) = e.downcast_ref::<errors::ConnectorError>() {
                match conn_err {
                    connection_error::ConnectorClientError(msg) => {
                        log::error!(
                            "{} Client error: Check your request parameters. {}",
                            ticker_interval,
                            msg
                        );
                    }
                    connection_error::TooManyRequestsError(msg) => {
                        log::error!(
                            "{} Rate limit exceeded. Please wait and try again. {}",
                            ticker_interval,
                            msg
                        );
                    }
                    connection_error::RateLimitBanError(msg) => {
                        log::error!(
                            "{} IP address banned due to excessive rate limits. {}",
                            ticker_interval,
                            msg
                        );
                    }
                    errors::ConnectorError::ServerError { msg, status_code } => {
                        log::error!(
                            "{} Server error: {} (status code: {:?})",
                            ticker_interval,
                            msg,
                            status_code
                        );
                    }
                    errors::ConnectorError::NetworkError(msg) => {
                        log::error!(
                            "{} Network error: Check your internet connection. {}",
                            ticker_interval,
                            msg
                        );
                    }
                    errors::ConnectorError::NotFoundError(msg) => {
                        log::error!("{} Resource not found. {}", ticker_interval, msg);
                    }
                    connection_error::BadRequestError(msg) => {
                        log::error!(
                            "{} Bad request (unknown symbol?): {}",
                            ticker_interval,
                            msg
                        );
                    }
                    other => {
                        log::error!("Unexpected ConnectionError variant: {:?}", other);
                    }
                }
                Err(
                    anyhow::Error::new(BNKlineError::ConnectionFailed(conn_err.to_string()))
                        .context(format!("Binance API call failed for {}", ticker_interval)),
                )
            } else {
                Err(
                    anyhow::Error::new(BNKlineError::ConnectionFailed(e.to_string())).context(
                        format!("Unexpected error during API call for {}", ticker_interval),
                    ),
                )
            }
        }
    }
}

/// Page backwards from the newest kline until `start_ms` is covered (or the
/// listing date is reached), then drop anything older than `start_ms`.
pub async fn load_klines(
    ticker_interval: &TickerInterval,
    start_ms: Option<i64>,
) -> Result<Vec<BNKline>, anyhow::Error> {
    let rest_client = configure_binance_client().await?;

    let limit_klines_returned = BINANCE.limits.klines_limit;
    let mut end_time: Option<i64> = None;
    let mut all_klines: Vec<BNKline> = Vec::new();
    let mut pages: u32 = 0;

    loop {
        let interval =
            try_interval_from_ms(ticker_interval.interval_ms).map_err(anyhow::Error::msg)?;
        let params = KlinesParams::builder(ticker_interval.name().to_string(), interval)
            .limit(limit_klines_returned) // If not passed in, 500 is used as `limit`
            .end_time(end_time)
            .build()?;

        let (rate_limits, new_klines) =
            fetch_binance_klines_with_limits(&rest_client, params, ticker_interval).await?;

        handle_rate_limits(
            &rate_limits,
            ticker_interval,
            BINANCE.limits.kline_call_weight,
            BINANCE.limits.weight_limit_minute,
        )
        .await;

        let page = convert_klines(new_klines).map_err(|e| {
            anyhow::Error::new(e).context(format!("{} convert_klines failed", ticker_interval))
        })?;
        pages += 1;
        if DEBUG_FLAGS.print_fetch_pages {
            log::info!(
                "{} page {}: {} klines",
                ticker_interval,
                pages,
                page.len()
            );
        }

        end_time = process_new_klines(
            page,
            limit_klines_returned as usize,
            start_ms,
            &mut all_klines,
        );
        if end_time.is_none() {
            break;
        }
        if pages >= BINANCE.limits.max_pages {
            log::warn!(
                "{} stopped after {} pages; older history is not loaded",
                ticker_interval,
                pages
            );
            break;
        }
    }

    if let Some(start) = start_ms {
        all_klines.retain(|kline| kline.open_timestamp_ms >= start);
    }

    if has_duplicate_kline_open_time(&all_klines) {
        bail!(
            "has_duplicate_kline_open_time() failed for {} so bailing load_klines()!",
            ticker_interval
        );
    }
    Ok(all_klines)
}

fn has_duplicate_kline_open_time(klines: &[BNKline]) -> bool {
    // Checks whether kline.open_time is duplicated anywhere in the `klines` slice
    let mut seen_ids = HashSet::new();
    klines
        .iter()
        .any(|kline| !seen_ids.insert(kline.open_timestamp_ms))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(open_ms: i64, prices: [&str; 5]) -> Vec<KlinesItemInner> {
        let mut items = vec![KlinesItemInner::Integer(open_ms)];
        items.extend(
            prices
                .iter()
                .map(|p| KlinesItemInner::String((*p).to_string())),
        );
        items
    }

    fn kline(open_ms: i64) -> BNKline {
        BNKline {
            open_timestamp_ms: open_ms,
            open_price: Some(10.0),
            high_price: Some(12.0),
            low_price: Some(9.0),
            close_price: Some(11.0),
            base_asset_volume: Some(3.0),
        }
    }

    #[test]
    fn converts_raw_kline_items() {
        let converted = BNKline::try_from(raw(60_000, ["1.5", "2.0", "1.0", "1.75", "42"])).unwrap();
        assert_eq!(converted.open_timestamp_ms, 60_000);
        assert_eq!(converted.high_price, Some(2.0));
        assert_eq!(converted.base_asset_volume, Some(42.0));

        let garbled = BNKline::try_from(raw(0, ["x", "2.0", "1.0", "1.75", "42"])).unwrap();
        assert_eq!(garbled.open_price, None);

        assert!(matches!(
            BNKline::try_from(Vec::new()),
            Err(BNKlineError::InvalidLength)
        ));
        assert!(matches!(
            BNKline::try_from(vec![KlinesItemInner::String("0".into())]),
            Err(BNKlineError::InvalidType(_))
        ));
    }

    #[test]
    fn missing_price_is_a_malformed_bar() {
        let mut broken = kline(2);
        broken.low_price = None;
        let result = klines_to_bars(&[kline(1), broken]);
        assert!(matches!(
            result,
            Err(ChartError::MalformedBar {
                index: 1,
                timestamp_ms: 2,
                ..
            })
        ));

        let bars = klines_to_bars(&[kline(1)]).unwrap();
        assert_eq!(bars[0].volume, Some(3.0));
    }

    #[test]
    fn pages_are_prepended_and_overlap_dropped() {
        let mut all = Vec::new();
        // Newest page: full, does not reach start yet
        let next = process_new_klines((10..13).map(kline).collect(), 3, Some(5), &mut all);
        assert_eq!(next, Some(10));
        // Older page repeats open time 10 at its end
        let next = process_new_klines((8..11).map(kline).collect(), 3, Some(5), &mut all);
        assert_eq!(next, Some(8));
        let opens: Vec<i64> = all.iter().map(|k| k.open_timestamp_ms).collect();
        assert_eq!(opens, vec![8, 9, 10, 11, 12]);
        assert!(!has_duplicate_kline_open_time(&all));
    }

    #[test]
    fn paging_stops_at_start_short_page_or_empty_page() {
        let mut all = Vec::new();
        assert_eq!(
            process_new_klines((4..7).map(kline).collect(), 3, Some(5), &mut all),
            None
        );

        let mut all = Vec::new();
        assert_eq!(
            process_new_klines((8..10).map(kline).collect(), 3, None, &mut all),
            None
        );

        let mut all = vec![kline(8)];
        assert_eq!(process_new_klines(Vec::new(), 3, None, &mut all), None);
        assert_eq!(process_new_klines(vec![kline(8)], 3, None, &mut all), None);
        assert_eq!(all.len(), 1);
    }

    #[test]
    fn unsupported_interval_is_rejected() {
        assert!(try_interval_from_ms(TimeUtils::MS_IN_D).is_ok());
        assert!(try_interval_from_ms(7).is_err());
    }
}
