use crate::error::{AnalysisError, CalcError, FetchError};
use async_trait::async_trait;
use reqwest::Client as HttpClient;
use std::fmt::Debug;
use tracing::error;

/// Fetch-and-derive framework.
///
/// Each provider is split in two parts, so that the network side can be swapped or stubbed without
/// touching the maths;
///
/// 1. [`Http`] - the procedure for fetching the raw data type `T` from some HTTP endpoint.
/// 2. [`Transform`] - the procedure for turning the raw `T` into the derived output `O`.
#[async_trait]
pub trait Api<T, O>: Http<T> + Transform<T, O>
where
    T: Debug + Send + Sync + 'static,
    O: Send + 'static,
{
    /// Shortcut method for the whole process: fetch, then transform the untouched result.
    async fn etl(&self, http_client: &HttpClient) -> Result<O, AnalysisError> {
        let raw = <Self as Http<T>>::fetch(self, http_client)
            .await
            .map_err(|e| {
                error!("fetch stage failed: {e}");
                e
            })?;

        let output = <Self as Transform<T, O>>::transform(raw).map_err(|e| {
            error!("calculation stage failed: {e}");
            e
        })?;

        Ok(output)
    }
}

/// API to the HTTP endpoint data type `T`; how is the data **extracted**?
#[async_trait]
pub trait Http<T>
where
    T: Debug + Send + Sync,
{
    /// How the data type `T` is fetched from some HTTP endpoint.
    async fn fetch(&self, http_client: &HttpClient) -> Result<T, FetchError>;
}

/// How is the raw data type `T` **transformed** into `O`?
pub trait Transform<T, O> {
    /// Consumes the raw data; nothing of `T` outlives the call.
    fn transform(raw: T) -> Result<O, CalcError>;
}
