use crate::error::DataError;
use reqwest::{Method, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use std::{borrow::Cow, fmt, time::Duration};
use tracing::debug;

/// Timeout applied to every request issued by a [`RestClient`].
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Http REST request that can be executed by a [`RestClient`].
pub trait RestRequest {
    /// Expected response type if the request was successful.
    type Response: DeserializeOwned;

    /// Serialisable query parameters type - use unit struct () if not required for this request.
    type QueryParams: Serialize;

    /// Path to the resource, appended to the [`RestClient`] base URL.
    fn path(&self) -> Cow<'static, str>;

    /// Http [`Method`] of this request.
    fn method() -> Method {
        Method::GET
    }

    /// Optional query parameters for this request.
    fn query_params(&self) -> Option<&Self::QueryParams> {
        None
    }
}

/// Configurable REST client capable of executing authenticated [`RestRequest`]s.
///
/// Every request carries an `Authorization: Bearer <token>` header.
#[derive(Clone)]
pub struct RestClient {
    pub http_client: reqwest::Client,
    pub base_url: String,
    bearer_token: String,
}

impl fmt::Debug for RestClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestClient")
            .field("base_url", &self.base_url)
            .field("bearer_token", &"<redacted>")
            .finish()
    }
}

impl RestClient {
    /// Construct a new [`RestClient`] with the default [`REQUEST_TIMEOUT`].
    pub fn new(base_url: impl Into<String>, bearer_token: impl Into<String>) -> Result<Self, DataError> {
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http_client,
            base_url: base_url.into(),
            bearer_token: bearer_token.into(),
        })
    }

    /// Execute the provided [`RestRequest`].
    ///
    /// A non-success status is returned as [`DataError::Http`], connection and body read
    /// failures as [`DataError::Transport`].
    pub async fn execute<Request>(&self, request: Request) -> Result<Request::Response, DataError>
    where
        Request: RestRequest,
    {
        let url = format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            request.path()
        );

        let mut builder = self
            .http_client
            .request(Request::method(), url)
            .bearer_auth(&self.bearer_token);

        if let Some(query_params) = request.query_params() {
            builder = builder.query(query_params);
        }

        let response = builder.send().await?;
        let status = response.status();
        let payload = response.bytes().await?;

        debug!(%status, bytes = payload.len(), "received REST response");

        parse_response(status, &payload)
    }
}

/// Deserialise a response payload, classifying any non-success status as [`DataError::Http`].
pub fn parse_response<Response>(status: StatusCode, payload: &[u8]) -> Result<Response, DataError>
where
    Response: DeserializeOwned,
{
    if status.is_success() {
        serde_json::from_slice(payload).map_err(DataError::from)
    } else {
        Err(DataError::Http {
            status,
            body: String::from_utf8_lossy(payload).into_owned(),
        })
    }
}
