pub mod feed;
pub mod rates;

use crate::api::{Api, Transform};
use crate::error::{AnalysisError, CalcError};
use crate::schema::common::{Clock, FixedClock, SystemClock};
use chrono::{DateTime, Utc};
use feed::{FeedConfig, RawFeedPayload};
use rates::{compute_five_day_rates, StockDataPoint};
use reqwest::Client as HttpClient;

/// Quote history provider backed by Sohu's `hisHq` endpoint.
///
/// Holds no state between calls; every `etl()` is an independent fetch then calculation.
#[derive(Debug, Clone)]
pub struct Sohu<C = SystemClock> {
    pub config: FeedConfig,
    clock: C,
}

impl Sohu<SystemClock> {
    pub fn new(config: FeedConfig) -> Self {
        Self {
            config,
            clock: SystemClock,
        }
    }
}

impl<C: Clock> Sohu<C> {
    pub fn with_clock(config: FeedConfig, clock: C) -> Self {
        Self { config, clock }
    }
}

impl<C> Transform<RawFeedPayload, Vec<StockDataPoint>> for Sohu<C> {
    fn transform(raw: RawFeedPayload) -> Result<Vec<StockDataPoint>, CalcError> {
        compute_five_day_rates(&raw)
    }
}

impl<C: Clock> Api<RawFeedPayload, Vec<StockDataPoint>> for Sohu<C> {}

/// Fetch the window ending at `now`, then derive the five-day rates from it.
pub async fn get_analysis(
    http_client: &HttpClient,
    config: FeedConfig,
    now: DateTime<Utc>,
) -> Result<Vec<StockDataPoint>, AnalysisError> {
    Sohu::with_clock(config, FixedClock(now))
        .etl(http_client)
        .await
}
