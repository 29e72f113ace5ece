use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use tracing::warn;

/// Zone of the exchange the default feed describes.
pub const DEFAULT_ZONE: &str = "Asia/Shanghai";

/// Source of "now"; injected so the fetch window can be pinned in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always answers with the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// The timezone in which "today" is resolved.
///
/// `Local` is the fallback for a zone name that cannot be resolved; it is kept as its own variant
/// (rather than quietly becoming UTC) so callers can see which one they got.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedZone {
    Named(Tz),
    Local,
}

impl FeedZone {
    /// Resolve an IANA zone name, e.g. `Asia/Shanghai`, falling back to the process-local zone.
    pub fn resolve(name: &str) -> Self {
        match name.parse::<Tz>() {
            Ok(tz) => Self::Named(tz),
            Err(e) => {
                warn!("timezone {name:?} unavailable ({e}); falling back to local time");
                Self::Local
            }
        }
    }

    /// The calendar date of `now` in this zone.
    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        match self {
            Self::Named(tz) => now.with_timezone(tz).date_naive(),
            Self::Local => now.with_timezone(&chrono::Local).date_naive(),
        }
    }
}

/// Convert a `NaiveDate` to the compact form used in query strings, e.g.,
///             `2024-07-01`        -> `20240701`
pub fn compact_date(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}
