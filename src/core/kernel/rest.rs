use crate::core::config::{BinanceConfig, ConfigError};
use crate::core::errors::BinanceError;
use crate::core::kernel::request::{HttpMethod, PreparedRequest};
use async_trait::async_trait;
use reqwest::{Client, Method};
use serde_json::Value;
use std::time::Duration;
use tracing::{instrument, trace};

/// Header carrying the API key on signed requests.
pub const API_KEY_HEADER: &str = "X-MBX-APIKEY";

const USER_AGENT: &str = concat!("binance-rest/", env!("CARGO_PKG_VERSION"));

/// Raw HTTP outcome as seen on the wire.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Transport contract: deliver the prepared bytes exactly, report status
/// and body.
///
/// Implementations may fail only with `BinanceError::Transport`; HTTP-level
/// and exchange-level failures are classified afterwards from the response.
/// The URL (and therefore the signed query string) must be sent unmodified,
/// since the signature covers those literal bytes.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: &PreparedRequest) -> Result<HttpResponse, BinanceError>;
}

/// reqwest-backed transport.
///
/// One instance holds one connection pool, reused across calls for the
/// lifetime of the owning client. A single attempt is made per call; there
/// is no retry or backoff here.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(config: &BinanceConfig) -> Result<Self, BinanceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(USER_AGENT)
            .danger_accept_invalid_certs(!config.verify_tls)
            .build()
            .map_err(|e| {
                ConfigError::InvalidConfiguration(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self { client })
    }
}

impl std::fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport").finish_non_exhaustive()
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    #[instrument(skip(self, request), fields(method = request.method.as_str(), url = %request.url))]
    async fn send(&self, request: &PreparedRequest) -> Result<HttpResponse, BinanceError> {
        let method = match request.method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Delete => Method::DELETE,
        };

        let mut http_request = self.client.request(method, &request.url);

        if let Some(api_key) = &request.api_key {
            http_request = http_request.header(API_KEY_HEADER, api_key);
        }

        if let Some(body) = &request.body {
            http_request = http_request
                .header("Content-Type", "application/x-www-form-urlencoded")
                .body(body.clone());
        }

        let response = http_request
            .send()
            .await
            .map_err(|e| BinanceError::Transport(format!("request failed: {e}")))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| BinanceError::Transport(format!("failed to read response body: {e}")))?;

        trace!(status, "response body: {}", body);

        Ok(HttpResponse { status, body })
    }
}

/// Decide what a (status, body) pair means.
///
/// Ordering matters: non-200 responses are surfaced verbatim without JSON
/// parsing, a 200 body must decode to an object or array, and a `code`
/// field inside a 200 response is an in-band exchange rejection.
pub fn classify_response(response: &HttpResponse) -> Result<Value, BinanceError> {
    if response.status != 200 {
        return Err(BinanceError::Http {
            status: response.status,
            body: response.body.clone(),
        });
    }

    let value: Value = match serde_json::from_str(&response.body) {
        Ok(value) => value,
        Err(_) => {
            return Err(BinanceError::Decode {
                body: response.body.clone(),
            })
        }
    };

    if !value.is_object() && !value.is_array() {
        return Err(BinanceError::Decode {
            body: response.body.clone(),
        });
    }

    if let Some(code) = value.get("code") {
        let code = code.as_i64().unwrap_or_default();
        let message = value
            .get("msg")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        return Err(BinanceError::Exchange { code, message });
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            body: body.to_string(),
        }
    }

    #[test]
    fn classifies_success_object() {
        let value = classify_response(&response(
            200,
            r#"{"balances":[{"asset":"BTC","free":"1.0","locked":"0.0"}]}"#,
        ))
        .unwrap();
        assert_eq!(value["balances"][0]["asset"], json!("BTC"));
    }

    #[test]
    fn classifies_success_array() {
        let value = classify_response(&response(200, r#"[{"symbol":"ZECBTC"}]"#)).unwrap();
        assert!(value.is_array());
    }

    #[test]
    fn non_200_is_an_http_failure_with_verbatim_body() {
        let err = classify_response(&response(429, "rate limit exceeded")).unwrap_err();
        match err {
            BinanceError::Http { status, body } => {
                assert_eq!(status, 429);
                assert_eq!(body, "rate limit exceeded");
            }
            other => panic!("expected Http, got {other:?}"),
        }
    }

    #[test]
    fn embedded_error_code_is_an_exchange_error() {
        let err = classify_response(&response(
            200,
            r#"{"code":-1013,"msg":"Filter failure: LOT_SIZE"}"#,
        ))
        .unwrap_err();
        match err {
            BinanceError::Exchange { code, message } => {
                assert_eq!(code, -1013);
                assert_eq!(message, "Filter failure: LOT_SIZE");
            }
            other => panic!("expected Exchange, got {other:?}"),
        }
    }

    #[test]
    fn unparseable_body_is_a_decode_failure() {
        let err = classify_response(&response(200, "not json")).unwrap_err();
        assert!(matches!(err, BinanceError::Decode { body } if body == "not json"));
    }

    #[test]
    fn scalar_json_is_a_decode_failure() {
        assert!(matches!(
            classify_response(&response(200, "42")),
            Err(BinanceError::Decode { .. })
        ));
        assert!(matches!(
            classify_response(&response(200, "\"ok\"")),
            Err(BinanceError::Decode { .. })
        ));
        assert!(matches!(
            classify_response(&response(200, "null")),
            Err(BinanceError::Decode { .. })
        ));
    }

    #[test]
    fn empty_object_is_success() {
        // Successful test orders come back as `{}`.
        let value = classify_response(&response(200, "{}")).unwrap();
        assert_eq!(value, json!({}));
    }

    #[test]
    fn non_200_json_error_body_is_still_http_failure() {
        // A 400 with a JSON error payload stays at the HTTP layer; the body
        // is not parsed there.
        let err = classify_response(&response(400, r#"{"code":-1102,"msg":"param missing"}"#))
            .unwrap_err();
        assert!(matches!(err, BinanceError::Http { status: 400, .. }));
    }
}
