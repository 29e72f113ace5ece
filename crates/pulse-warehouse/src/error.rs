use pulse_util::HttpError;
use thiserror::Error;

/// Failures of the feed fetch stage.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport failure, or the upstream answered with a non-success status.
    #[error("network error: {0}")]
    Network(#[source] HttpError),

    /// The response body could not be read in full.
    #[error("read error: {0}")]
    Read(#[source] HttpError),
}

impl From<HttpError> for FetchError {
    fn from(e: HttpError) -> Self {
        match e {
            HttpError::Body(_) => Self::Read(e),
            HttpError::Request(_) | HttpError::Status { .. } => Self::Network(e),
        }
    }
}

/// Failures of the rate calculation stage.
#[derive(Error, Debug)]
pub enum CalcError {
    /// The payload is not a JSON array of objects.
    #[error("failed to parse payload: {0}")]
    Parse(#[source] serde_json::Error),

    /// The `hq` field is missing or holds something other than a list.
    #[error("unexpected hq data type: {0}")]
    Schema(&'static str),

    /// Either the top-level list or the `hq` list is empty.
    #[error("no {0} data available")]
    EmptyData(&'static str),

    #[error("failed to serialize result: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Either stage of the analysis failing, labelled with the stage.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("calculation failed: {0}")]
    Calculation(#[from] CalcError),
}
