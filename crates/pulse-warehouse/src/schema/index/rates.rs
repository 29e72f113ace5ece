use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, error, trace};

use crate::error::CalcError;

///////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Five-day rate of change, for volume & turnover
//
///////////////////////////////////////////////////////////////////////////////////////////////////////

/// How many trading days back each rate compares against.
pub const RATE_OFFSET: usize = 5;

/// Records shorter than this are dropped.
pub const MIN_RECORD_LEN: usize = 9;

/// Upstream's "no data" marker.
pub const NO_DATA: &str = "-";

const HQ_FIELD: &str = "hq";
const DATE_POS: usize = 0;
const VOLUME_POS: usize = 7;
const TURNOVER_POS: usize = 8;

/// One trading day, projected out of a loosely-typed `hq` record.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyObservation {
    pub date: String,
    pub volume: f64,
    pub turnover: f64,
    /// Position of the record within the `hq` list as delivered (newest-first).
    pub feed_index: usize,
}

/// Output row, serialized with the field names the presentation layer reads, i.e.,
/// ```json
/// {
///     "date": "2024-07-01",
///     "volume": 30150000.0,
///     "turnover": 27110000.0,
///     "fiveDayVolumeRate": 12.5,
///     "fiveDayTurnoverRate": -3.1
/// }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StockDataPoint {
    pub date: String,
    pub volume: f64,
    pub turnover: f64,
    pub five_day_volume_rate: f64,
    pub five_day_turnover_rate: f64,
}

// -------------------------------------------------------------------------------------------------

/// Parse a raw `hisHq` payload and derive the five-day rates, oldest day first.
pub fn compute_five_day_rates(payload: &str) -> Result<Vec<StockDataPoint>, CalcError> {
    let mut days = parse_observations(payload)?;

    // the feed is newest-first
    days.reverse();

    let points = derive_rates(&days);
    debug!("derived five-day rates for {} days", points.len());
    Ok(points)
}

/// [`compute_five_day_rates`], serialized as a JSON array.
pub fn compute_five_day_rates_json(payload: &str) -> Result<String, CalcError> {
    let points = compute_five_day_rates(payload)?;
    series_to_json(&points, false)
}

/// Serialize a derived series as a JSON array, optionally pretty-printed.
pub fn series_to_json(points: &[StockDataPoint], pretty: bool) -> Result<String, CalcError> {
    let json = if pretty {
        serde_json::to_string_pretty(points)
    } else {
        serde_json::to_string(points)
    };
    json.map_err(|e| {
        error!("failed to serialize five-day rates: {e}");
        CalcError::Serialize(e)
    })
}

/// Percentage change from `prior` to `current`; a zero `prior` gives `0.0`.
pub fn rate(current: f64, prior: f64) -> f64 {
    if prior != 0.0 {
        (current - prior) / prior * 100.0
    } else {
        0.0
    }
}

fn parse_observations(payload: &str) -> Result<Vec<DailyObservation>, CalcError> {
    let sections: Vec<Map<String, Value>> = serde_json::from_str(payload).map_err(|e| {
        error!("failed to parse quote history payload: {e}");
        CalcError::Parse(e)
    })?;

    let first = sections.first().ok_or(CalcError::EmptyData("stock"))?;
    let records = match first.get(HQ_FIELD) {
        Some(Value::Array(records)) => records,
        Some(other) => return Err(CalcError::Schema(type_name(other))),
        None => return Err(CalcError::Schema("missing")),
    };
    if records.is_empty() {
        return Err(CalcError::EmptyData(HQ_FIELD));
    }

    let days = records
        .iter()
        .enumerate()
        .filter_map(|(i, record)| observation(i, record))
        .collect::<Vec<_>>();
    trace!(
        kept = days.len(),
        dropped = records.len() - days.len(),
        "projected hq records"
    );

    Ok(days)
}

/// `None` for anything that isn't a list of at least [`MIN_RECORD_LEN`] values.
fn observation(feed_index: usize, record: &Value) -> Option<DailyObservation> {
    let fields = record.as_array().filter(|f| f.len() >= MIN_RECORD_LEN)?;
    Some(DailyObservation {
        date: fields[DATE_POS].as_str().unwrap_or_default().to_string(),
        volume: de_quantity(&fields[VOLUME_POS]),
        turnover: de_quantity(&fields[TURNOVER_POS]),
        feed_index,
    })
}

/// Numeric strings -> `f64`, e.g.,
///             `"301500.5"`        -> `301500.5`
///
/// The `-` sentinel, non-numeric or non-finite strings (`"NaN"`, `"inf"`, `"1e400"`) and
/// non-strings all read as `0.0`.
fn de_quantity(value: &Value) -> f64 {
    match value {
        Value::String(s) if s != NO_DATA => s
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .unwrap_or(0.0),
        _ => 0.0,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// `days` must already be oldest-first.
fn derive_rates(days: &[DailyObservation]) -> Vec<StockDataPoint> {
    days.iter()
        .enumerate()
        .map(|(i, day)| {
            let (volume_rate, turnover_rate) = match i.checked_sub(RATE_OFFSET) {
                Some(j) => {
                    let prior = &days[j];
                    let volume_rate = rate(day.volume, prior.volume);
                    let turnover_rate = rate(day.turnover, prior.turnover);
                    trace!(
                        day = i,
                        date = %day.date,
                        prior_date = %prior.date,
                        volume = day.volume,
                        prior_volume = prior.volume,
                        turnover = day.turnover,
                        prior_turnover = prior.turnover,
                        volume_rate,
                        turnover_rate,
                        "five-day rate"
                    );
                    (volume_rate, turnover_rate)
                }
                None => {
                    trace!(day = i, date = %day.date, "insufficient history; rates zeroed");
                    (0.0, 0.0)
                }
            };

            StockDataPoint {
                date: day.date.clone(),
                volume: day.volume,
                turnover: day.turnover,
                five_day_volume_rate: volume_rate,
                five_day_turnover_rate: turnover_rate,
            }
        })
        .collect()
}
