//! HTTP transport to the upstream AQI API.

use crate::config::UpstreamConfig;
use crate::error::{AqiError, AqiResult};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Form payload posted to the upstream API.
///
/// `data` is either a raw location string or a JSON-encoded object,
/// depending on the tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamRequest {
    pub tool: String,
    pub data: String,
}

impl UpstreamRequest {
    pub fn new(tool: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            data: data.into(),
        }
    }
}

/// Seam for the single outbound call made per tool invocation.
#[async_trait::async_trait]
pub trait AqiApi: Send + Sync {
    /// Send one request and return the raw response body.
    async fn call(&self, request: &UpstreamRequest) -> AqiResult<String>;
}

/// Upstream client over HTTP.
///
/// One attempt per call, bounded by the configured timeout. Any response
/// that arrives is returned verbatim whatever its status; redirects are
/// not followed.
#[derive(Debug, Clone)]
pub struct HttpAqiApi {
    client: Client,
    endpoint: Url,
    timeout: Duration,
}

impl HttpAqiApi {
    pub fn new(config: &UpstreamConfig) -> AqiResult<Self> {
        let timeout = config.timeout();
        let client = Client::builder()
            .user_agent(concat!("taiwan-aqi-mcp/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            timeout,
        })
    }

    fn map_transport_error(&self, error: reqwest::Error) -> AqiError {
        if error.is_timeout() {
            AqiError::Timeout(self.timeout)
        } else {
            AqiError::Upstream(error)
        }
    }
}

#[async_trait::async_trait]
impl AqiApi for HttpAqiApi {
    async fn call(&self, request: &UpstreamRequest) -> AqiResult<String> {
        debug!(url = %self.endpoint, tool = %request.tool, "POST upstream request");

        let response = self
            .client
            .post(self.endpoint.clone())
            .form(request)
            .send()
            .await
            .map_err(|e| {
                warn!(tool = %request.tool, error = %e, "Upstream call failed");
                self.map_transport_error(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            // Passed through unchanged; the body is the tool result.
            warn!(tool = %request.tool, status = status.as_u16(), "Upstream returned non-success status");
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        debug!(tool = %request.tool, bytes = body.len(), "Upstream response received");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    fn create_config(endpoint: &str, timeout: Duration) -> UpstreamConfig {
        UpstreamConfig {
            endpoint: Url::parse(endpoint).unwrap(),
            timeout_ms: timeout.as_millis() as u64,
        }
    }

    fn form_fields(request: &Request) -> Vec<(String, String)> {
        url::form_urlencoded::parse(&request.body)
            .into_owned()
            .collect()
    }

    #[tokio::test]
    async fn test_posts_form_fields() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api.php"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"aqi":42}"#))
            .expect(1)
            .mount(&server)
            .await;

        let api = HttpAqiApi::new(&create_config(
            &format!("{}/api.php", server.uri()),
            Duration::from_secs(5),
        ))
        .unwrap();

        let body = api
            .call(&UpstreamRequest::new("aqi-query", "台北"))
            .await
            .unwrap();
        assert_eq!(body, r#"{"aqi":42}"#);

        let received = server.received_requests().await.unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(
            form_fields(&received[0]),
            vec![
                ("tool".to_string(), "aqi-query".to_string()),
                ("data".to_string(), "台北".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_json_data_field_survives_form_encoding() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let api = HttpAqiApi::new(&create_config(&server.uri(), Duration::from_secs(5))).unwrap();
        let data = r#"{"location":"台中","date":"2024-05-01"}"#;
        api.call(&UpstreamRequest::new("aqi-query-daily", data))
            .await
            .unwrap();

        let received = server.received_requests().await.unwrap();
        let fields = form_fields(&received[0]);
        assert_eq!(fields[1], ("data".to_string(), data.to_string()));
    }

    #[tokio::test]
    async fn test_non_success_status_passes_through() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
            .mount(&server)
            .await;

        let api = HttpAqiApi::new(&create_config(&server.uri(), Duration::from_secs(5))).unwrap();
        let body = api
            .call(&UpstreamRequest::new("aqi-health-guidance", ""))
            .await
            .unwrap();

        assert_eq!(body, "upstream exploded");
    }

    #[tokio::test]
    async fn test_redirect_is_not_followed() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api.php"))
            .respond_with(
                ResponseTemplate::new(302)
                    .insert_header("Location", "/moved")
                    .set_body_string("redirect body"),
            )
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/moved"))
            .respond_with(ResponseTemplate::new(200).set_body_string("followed body"))
            .expect(0)
            .mount(&server)
            .await;

        let api = HttpAqiApi::new(&create_config(
            &format!("{}/api.php", server.uri()),
            Duration::from_secs(5),
        ))
        .unwrap();
        let body = api
            .call(&UpstreamRequest::new("aqi-query", "台北"))
            .await
            .unwrap();

        assert_eq!(body, "redirect body");
        let received = server.received_requests().await.unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].url.path(), "/api.php");
    }

    #[tokio::test]
    async fn test_empty_body_is_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let api = HttpAqiApi::new(&create_config(&server.uri(), Duration::from_secs(5))).unwrap();
        let body = api
            .call(&UpstreamRequest::new("aqi-query", "台南"))
            .await
            .unwrap();

        assert_eq!(body, "");
    }

    #[tokio::test]
    async fn test_timeout_is_not_retried() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("too late")
                    .set_delay(Duration::from_secs(2)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let api =
            HttpAqiApi::new(&create_config(&server.uri(), Duration::from_millis(200))).unwrap();
        let err = api
            .call(&UpstreamRequest::new("aqi-query", "台北"))
            .await
            .unwrap_err();

        assert!(err.is_upstream_error());
        assert!(matches!(err, AqiError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_connection_failure() {
        // Bind then drop a listener so the port is closed.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let api = HttpAqiApi::new(&create_config(
            &format!("http://{}/api.php", addr),
            Duration::from_secs(5),
        ))
        .unwrap();
        let err = api
            .call(&UpstreamRequest::new("aqi-query", "台北"))
            .await
            .unwrap_err();

        assert!(err.is_upstream_error());
        assert!(err.to_string().starts_with("Upstream call failed"));
    }
}
