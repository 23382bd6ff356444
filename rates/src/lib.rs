//! Exchange-rate lookup for WalletKit.
//!
//! Latest rates come from `xrates/latest/{currency}/index.json`. Historical
//! rates use a two-tier bucket scheme: an hour bucket keyed by minute, and a
//! day bucket holding one aggregate price. Minute-level data may not exist
//! for a given moment, but a daily aggregate almost always does, so the
//! resolver trades precision for availability.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use chrono::{DateTime, Timelike, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;
use walletkit_api::{ApiClient, ApiError, ApiResult, Method};

/// A resolved (or unresolved) price point.
///
/// `value` is absent when no data exists for the requested slot at any
/// granularity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateSample {
    /// Coin code, e.g. "BTC"
    pub coin_code: String,
    /// Fiat currency code, e.g. "USD"
    pub currency_code: String,
    /// Requested moment as a unix timestamp (seconds, UTC)
    pub timestamp: u64,
    /// The resolved price, when any tier had data
    pub value: Option<Decimal>,
}

/// Client for the exchange-rate API.
#[derive(Debug, Clone)]
pub struct RateClient {
    api: ApiClient,
}

impl RateClient {
    /// Creates a rate client over the given API client
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Fetches the latest price map for a fiat currency.
    ///
    /// Entries whose price string does not parse as a decimal are dropped.
    pub async fn latest_rates(&self, currency: &str) -> ApiResult<HashMap<String, Decimal>> {
        let raw: HashMap<String, String> = self
            .api
            .fetch(
                Method::GET,
                &format!("xrates/latest/{currency}/index.json"),
                None,
            )
            .await?;
        Ok(raw
            .into_iter()
            .filter_map(|(coin, price)| Decimal::from_str(&price).ok().map(|p| (coin, p)))
            .collect())
    }

    /// Resolves a historical price via tiered granularity lookup.
    ///
    /// Tries the hour bucket first: a map from minute key to price string.
    /// When the requested minute is present and parses, its value is
    /// returned without consulting the day bucket. Otherwise the day bucket
    /// (one aggregate price string) is fetched. Every failure along the way
    /// collapses to `None`.
    pub async fn resolve_rate(
        &self,
        coin: &str,
        currency: &str,
        timestamp: u64,
    ) -> Option<Decimal> {
        let moment = DateTime::<Utc>::from_timestamp(i64::try_from(timestamp).ok()?, 0)?;

        if let Some(value) = self.hour_rate(coin, currency, &moment).await {
            return Some(value);
        }
        self.day_rate(coin, currency, &moment).await
    }

    /// Resolves a historical price and wraps it as a [`RateSample`]
    pub async fn rate_sample(&self, coin: &str, currency: &str, timestamp: u64) -> RateSample {
        RateSample {
            coin_code: coin.to_string(),
            currency_code: currency.to_string(),
            timestamp,
            value: self.resolve_rate(coin, currency, timestamp).await,
        }
    }

    async fn hour_rate(&self, coin: &str, currency: &str, moment: &DateTime<Utc>) -> Option<Decimal> {
        let path = format!(
            "xrates/historical/{coin}/{currency}/{}/index.json",
            hour_key(moment)
        );
        let bucket: HashMap<String, String> = match self
            .api
            .fetch(Method::GET, &path, None)
            .await
        {
            Ok(bucket) => bucket,
            Err(err) => {
                log_miss("hour", coin, currency, &err);
                return None;
            }
        };

        // The backend keys minutes without zero-padding; accept both forms.
        let minute = moment.minute();
        let price = bucket
            .get(&minute.to_string())
            .or_else(|| bucket.get(&format!("{minute:02}")))?;
        Decimal::from_str(price).ok()
    }

    async fn day_rate(&self, coin: &str, currency: &str, moment: &DateTime<Utc>) -> Option<Decimal> {
        let path = format!(
            "xrates/historical/{coin}/{currency}/{}/index.json",
            day_key(moment)
        );
        let price: String = match self.api.fetch(Method::GET, &path, None).await {
            Ok(price) => price,
            Err(err) => {
                log_miss("day", coin, currency, &err);
                return None;
            }
        };
        Decimal::from_str(&price).ok()
    }
}

fn log_miss(tier: &str, coin: &str, currency: &str, err: &ApiError) {
    tracing::debug!(tier, coin, currency, %err, "historical rate bucket unavailable");
}

/// `yyyy/MM/dd/HH` bucket key in UTC
fn hour_key(moment: &DateTime<Utc>) -> String {
    moment.format("%Y/%m/%d/%H").to_string()
}

/// `yyyy/MM/dd` bucket key in UTC
fn day_key(moment: &DateTime<Utc>) -> String {
    moment.format("%Y/%m/%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn moment(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn test_hour_key_format() {
        assert_eq!(hour_key(&moment(2024, 5, 3, 7, 17)), "2024/05/03/07");
    }

    #[test]
    fn test_day_key_format() {
        assert_eq!(day_key(&moment(2024, 5, 3, 7, 17)), "2024/05/03");
    }

    #[test]
    fn test_keys_are_utc_midnight_safe() {
        assert_eq!(hour_key(&moment(2023, 12, 31, 23, 59)), "2023/12/31/23");
        assert_eq!(day_key(&moment(2024, 1, 1, 0, 0)), "2024/01/01");
    }
}
