pub mod api;
pub mod error;
pub mod schema;

pub use crate::error::{AnalysisError, CalcError, FetchError};
pub use crate::schema::common::{Clock, FeedZone, FixedClock, SystemClock};
pub use crate::schema::index::{
    feed::{fetch_recent_history, FeedConfig, LookbackWindow, RawFeedPayload},
    rates::{
        compute_five_day_rates, compute_five_day_rates_json, series_to_json, DailyObservation,
        StockDataPoint,
    },
    get_analysis, Sohu,
};
