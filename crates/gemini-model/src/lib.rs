//! A model provider for the Gemini `generateContent` API.

#[macro_use]
extern crate tracing;

mod config;
mod proto;

use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::sync::Arc;

use devflow_model::{
    ErrorKind, ModelProvider, ModelProviderError, ModelReply, ModelRequest,
};
use mime::Mime;
use reqwest::{Client, StatusCode, header};

pub use config::{
    DEFAULT_BASE_URL, DEFAULT_MODEL, GeminiConfig, GeminiConfigBuilder,
};
use proto::GenerateContentResponse;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Error type for [`GeminiProvider`].
#[derive(Debug)]
pub struct Error {
    message: String,
    kind: ErrorKind,
}

impl Error {
    fn new(message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    fn with_causes(err: &dyn StdError, kind: ErrorKind) -> Self {
        Self::new(describe(err), kind)
    }

    fn from_status(status: StatusCode, body: &str) -> Self {
        let kind = if status == StatusCode::TOO_MANY_REQUESTS {
            ErrorKind::RateLimitExceeded
        } else {
            ErrorKind::Other
        };
        Self::new(format!("HTTP {status}: {}", body.trim()), kind)
    }

    /// Returns the error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Formats `err` followed by every error in its source chain.
fn describe(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for Error {}

impl ModelProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// Gemini model provider.
#[derive(Clone, Debug)]
pub struct GeminiProvider {
    client: Client,
    config: Arc<GeminiConfig>,
}

impl GeminiProvider {
    /// Creates a new `GeminiProvider` with the given configuration.
    #[inline]
    pub fn new(config: GeminiConfig) -> Self {
        Self::with_client(config, Client::new())
    }

    /// Creates a new `GeminiProvider` that sends requests through `client`.
    ///
    /// Use this to share a connection pool or to set transport options
    /// such as timeouts and proxies.
    #[inline]
    pub fn with_client(config: GeminiConfig, client: Client) -> Self {
        Self {
            client,
            config: Arc::new(config),
        }
    }
}

impl ModelProvider for GeminiProvider {
    type Error = Error;

    fn send_request(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<ModelReply, Self::Error>> + Send + 'static
    {
        let gemini_req = proto::create_request(req);
        let resp_fut = self
            .client
            .post(self.config.generate_content_url())
            .header(API_KEY_HEADER, &self.config.api_key)
            .header(header::ACCEPT, "application/json")
            .json(&gemini_req)
            .send();

        async move {
            let resp = resp_fut
                .await
                .map_err(|err| Error::with_causes(&err, ErrorKind::Other))?;

            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                return Err(Error::from_status(status, &body));
            }

            let content_type = resp
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(ToOwned::to_owned);
            let is_valid_content_type = content_type
                .as_deref()
                .and_then(|v| v.parse().ok())
                .map(|m: Mime| m.subtype().as_str() == "json")
                .unwrap_or(false);
            if !is_valid_content_type {
                return Err(Error::new(
                    format!("Unexpected content type: {content_type:?}"),
                    ErrorKind::Other,
                ));
            }

            let body = resp
                .text()
                .await
                .map_err(|err| Error::with_causes(&err, ErrorKind::Other))?;
            trace!("got response body: {body}");
            let gemini_resp: GenerateContentResponse =
                serde_json::from_str(&body).map_err(|err| {
                    Error::with_causes(&err, ErrorKind::Other)
                })?;

            Ok(proto::create_reply(gemini_resp))
        }
    }
}
