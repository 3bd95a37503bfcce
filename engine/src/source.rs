//! Fetching the external model text.

use std::future::Future;
use std::pin::Pin;

use reqwest::header::CACHE_CONTROL;
use thiserror::Error;
use tracing::debug;
use url::Url;

const USER_AGENT: &str = concat!("trinity/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The server answered with a non-success status.
    #[error(
        "HTTP {status}{} fetching model",
        .reason.as_deref().map(|r| format!(" {r}")).unwrap_or_default()
    )]
    Status { status: u16, reason: Option<String> },
    #[error("failed to fetch model: {0}")]
    Network(String),
}

pub type FetchFut<'a> = Pin<Box<dyn Future<Output = Result<String, FetchError>> + Send + 'a>>;

/// Where model text comes from.
pub trait ModelSource: Send + Sync {
    fn fetch_text<'a>(&'a self, url: &'a Url) -> FetchFut<'a>;
}

/// Fetches models over HTTP, bypassing caches.
#[derive(Debug, Clone)]
pub struct HttpModelSource {
    client: reqwest::Client,
}

impl HttpModelSource {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|err| {
                tracing::warn!("Falling back to default HTTP client: {err}");
                reqwest::Client::new()
            });
        Self { client }
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .header(CACHE_CONTROL, "no-store")
            .send()
            .await
            .map_err(|err| FetchError::Network(err.to_string()))?;

        let status = response.status();
        debug!(%url, status = status.as_u16(), "Model fetch answered");
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().map(str::to_string),
            });
        }

        response
            .text()
            .await
            .map_err(|err| FetchError::Network(err.to_string()))
    }
}

impl Default for HttpModelSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelSource for HttpModelSource {
    fn fetch_text<'a>(&'a self, url: &'a Url) -> FetchFut<'a> {
        Box::pin(self.fetch(url))
    }
}

#[cfg(test)]
mod tests {
    use url::Url;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::{FetchError, HttpModelSource, ModelSource};

    #[test]
    fn status_error_names_code_and_reason() {
        let err = FetchError::Status {
            status: 404,
            reason: Some("Not Found".to_string()),
        };
        assert_eq!(err.to_string(), "HTTP 404 Not Found fetching model");

        let bare = FetchError::Status {
            status: 599,
            reason: None,
        };
        assert_eq!(bare.to_string(), "HTTP 599 fetching model");
    }

    #[tokio::test]
    async fn fetch_sends_no_store_and_returns_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/trinity_formal_model.py"))
            .and(header("cache-control", "no-store"))
            .respond_with(ResponseTemplate::new(200).set_body_string("print('hi')\n"))
            .expect(1)
            .mount(&server)
            .await;
        let url = Url::parse(&format!("{}/trinity_formal_model.py", server.uri())).expect("url");

        let text = HttpModelSource::new()
            .fetch_text(&url)
            .await
            .expect("fetch");

        assert_eq!(text, "print('hi')\n");
        server.verify().await;
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        let url = Url::parse(&format!("{}/model.py", server.uri())).expect("url");

        let err = HttpModelSource::new()
            .fetch_text(&url)
            .await
            .expect_err("503");

        assert_eq!(
            err,
            FetchError::Status {
                status: 503,
                reason: Some("Service Unavailable".to_string()),
            }
        );
    }
}
