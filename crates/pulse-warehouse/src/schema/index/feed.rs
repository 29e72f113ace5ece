use super::Sohu;
use crate::api::Http;
use crate::error::FetchError;
use crate::schema::common::{compact_date, Clock, FeedZone};
use async_trait::async_trait;
use chrono::{DateTime, Days, NaiveDate, Utc};
use pulse_util::Util;
use reqwest::Client as HttpClient;
use tracing::{debug, error, trace};

///////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Daily quote history from Sohu, for a single index
//
///////////////////////////////////////////////////////////////////////////////////////////////////////

/// The feed body, exactly as the upstream sent it.
pub type RawFeedPayload = String;

/// Calendar days covered by one fetch, ending today.
pub const LOOKBACK_DAYS: u64 = 180;

pub const SOHU_HISHQ_URL: &str = "https://q.stock.sohu.com/hisHq";

/// Shanghai Composite Index.
pub const SHANGHAI_COMPOSITE: &str = "zs_000001";

#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub endpoint: String,
    pub code: String,
    pub zone: FeedZone,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            endpoint: SOHU_HISHQ_URL.to_string(),
            code: SHANGHAI_COMPOSITE.to_string(),
            zone: FeedZone::Named(chrono_tz::Asia::Shanghai),
        }
    }
}

/// `[start, end]` of a fetch, both inclusive calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookbackWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl LookbackWindow {
    pub fn ending(today: NaiveDate) -> Self {
        Self {
            start: today
                .checked_sub_days(Days::new(LOOKBACK_DAYS))
                .unwrap_or(NaiveDate::MIN),
            end: today,
        }
    }

    /// The window ending on `now`'s date in `zone`.
    pub fn at(now: DateTime<Utc>, zone: &FeedZone) -> Self {
        Self::ending(zone.today(now))
    }
}

// -------------------------------------------------------------------------------------------------

/// GET the raw quote history for the trailing window ending at `now`.
///
/// One request, no retries; the body is returned unparsed.
pub async fn fetch_recent_history(
    http_client: &HttpClient,
    config: &FeedConfig,
    now: DateTime<Utc>,
) -> Result<RawFeedPayload, FetchError> {
    let window = LookbackWindow::at(now, &config.zone);
    let start = compact_date(window.start);
    let end = compact_date(window.end);
    debug!(
        code = %config.code,
        zone = ?config.zone,
        %now,
        "requesting quote history from {start} to {end}"
    );

    let query = [
        ("code", config.code.as_str()),
        ("start", start.as_str()),
        ("end", end.as_str()),
        ("stat", "1"),
        ("order", "D"),
        ("period", "d"),
    ];

    let payload = http_client
        .get_text(&config.endpoint, &query)
        .await
        .map_err(|e| {
            error!("[{}] quote history fetch failed: {e}", config.code);
            FetchError::from(e)
        })?;
    trace!("[{}] quote history fetched: {} bytes", config.code, payload.len());

    Ok(payload)
}

#[async_trait]
impl<C: Clock> Http<RawFeedPayload> for Sohu<C> {
    async fn fetch(&self, http_client: &HttpClient) -> Result<RawFeedPayload, FetchError> {
        fetch_recent_history(http_client, &self.config, self.clock.now()).await
    }
}
