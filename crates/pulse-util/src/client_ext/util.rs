use reqwest::{Client, StatusCode};
use std::future::Future;
use thiserror::Error;
use tracing::{error, trace};

/// Failures of a single GET request, split by the stage at which they happened.
#[derive(Error, Debug)]
pub enum HttpError {
    /// The request never produced a response (DNS, connect, TLS, ...).
    #[error("request error: {0}")]
    Request(#[source] reqwest::Error),

    /// The server answered, but not with a 2xx.
    #[error("unexpected status {status} from {url}")]
    Status { status: StatusCode, url: String },

    /// The response head arrived but the body could not be read to the end.
    #[error("body error: {0}")]
    Body(#[source] reqwest::Error),
}

/// Build the shared HTTP client, optionally with a custom `User-Agent`.
pub fn build_client(user_agent: Option<&str>) -> reqwest::Result<Client> {
    let mut builder = reqwest::ClientBuilder::new();
    if let Some(agent) = user_agent {
        builder = builder.user_agent(agent);
    }
    builder.build()
}

pub trait ClientUtilExt {
    fn get_text(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> impl Future<Output = Result<String, HttpError>> + Send;
}

impl ClientUtilExt for Client {
    /// GET `url` with the `query` pairs appended, and return the whole body as text.
    ///
    /// Non-success statuses are errors; the body is never partially returned.
    async fn get_text(&self, url: &str, query: &[(&str, &str)]) -> Result<String, HttpError> {
        let client = self;

        trace!("GET {url} {query:?}");
        let response = client.get(url).query(query).send().await.map_err(|e| {
            error!("failed fetching response from {url}: {e}");
            HttpError::Request(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let url = response.url().to_string();
            error!("{url} responded with {status}");
            return Err(HttpError::Status { status, url });
        }

        let body = response.text().await.map_err(|e| {
            error!("failed reading response body from {url}: {e}");
            HttpError::Body(e)
        })?;
        trace!("{} bytes read from {url}", body.len());

        Ok(body)
    }
}
