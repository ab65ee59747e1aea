use crate::core::errors::BinanceError;
use crate::core::kernel::signer::{current_timestamp_ms, RequestSigner};
use std::fmt::Write as _;

/// HTTP methods the exchange API accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl HttpMethod {
    /// Case-insensitive parse. Anything else fails with `UnsupportedMethod`
    /// before any I/O is attempted; there is no silent fallback to GET.
    pub fn parse(method: &str) -> Result<Self, BinanceError> {
        match method.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "DELETE" => Ok(Self::Delete),
            _ => Err(BinanceError::UnsupportedMethod(method.to_string())),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }
}

/// Insertion-ordered parameter list.
///
/// The signature covers the literal serialized query string, so parameters
/// must re-serialize byte-for-byte in the order they were supplied. A hash
/// map would not guarantee that.
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter, fluent style.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(key, value);
        self
    }

    /// Append a parameter only when a value is present.
    #[must_use]
    pub fn optional_param(
        mut self,
        key: impl Into<String>,
        value: Option<impl Into<String>>,
    ) -> Self {
        if let Some(value) = value {
            self.push(key, value);
        }
        self
    }

    /// Append a parameter in place.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Form-encode in insertion order: `&`-joined `key=value` with
    /// percent-encoded values.
    #[must_use]
    pub fn encode(&self) -> String {
        self.pairs
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A fully assembled request, ready to hand to the transport.
///
/// `url` already carries the complete query string; for signed requests that
/// includes `recvWindow`, `timestamp` and the trailing `signature`.
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub method: HttpMethod,
    pub url: String,
    /// The query string as placed in the URL.
    pub query: String,
    /// Form-encoded body, present for POST. Carries the parameter map
    /// without `timestamp`/`signature`; those travel only in the URL.
    pub body: Option<String>,
    /// `X-MBX-APIKEY` header value, present only for signed requests.
    pub api_key: Option<String>,
}

/// Turns (method, endpoint, params) triples into `PreparedRequest`s.
///
/// Borrowed from the owning client per call; holds no state of its own.
#[derive(Debug, Clone, Copy)]
pub struct RequestBuilder<'a> {
    base_url: &'a str,
    api_version: &'a str,
    recv_window_ms: u64,
    signer: Option<&'a RequestSigner>,
}

impl<'a> RequestBuilder<'a> {
    pub fn new(
        base_url: &'a str,
        api_version: &'a str,
        recv_window_ms: u64,
        signer: Option<&'a RequestSigner>,
    ) -> Self {
        Self {
            base_url,
            api_version,
            recv_window_ms,
            signer,
        }
    }

    /// Build a request. For signed requests the query string is extended
    /// with `recvWindow` (when absent), `timestamp`, and a trailing
    /// `signature` computed over everything before it.
    pub fn build(
        &self,
        method: &str,
        endpoint: &str,
        params: QueryParams,
        signed: bool,
    ) -> Result<PreparedRequest, BinanceError> {
        let method = HttpMethod::parse(method)?;
        if signed {
            self.assemble_signed(method, endpoint, params, current_timestamp_ms()?)
        } else {
            let query = params.encode();
            let body = (method == HttpMethod::Post && !query.is_empty()).then(|| query.clone());
            Ok(self.assemble(method, endpoint, query, body, None))
        }
    }

    fn assemble_signed(
        &self,
        method: HttpMethod,
        endpoint: &str,
        mut params: QueryParams,
        timestamp_ms: u64,
    ) -> Result<PreparedRequest, BinanceError> {
        let signer = self.signer.ok_or_else(|| {
            BinanceError::Auth("signed request requires API credentials".to_string())
        })?;

        if !params.contains_key("recvWindow") {
            params.push("recvWindow", self.recv_window_ms.to_string());
        }

        // The POST body carries the parameter map as-is; timestamp and
        // signature travel only in the URL query string.
        let encoded_params = params.encode();

        let mut query = encoded_params.clone();
        if query.is_empty() {
            let _ = write!(query, "timestamp={timestamp_ms}");
        } else {
            let _ = write!(query, "&timestamp={timestamp_ms}");
        }

        let signature = signer.signature(&query)?;
        let _ = write!(query, "&signature={signature}");

        let body = (method == HttpMethod::Post).then_some(encoded_params);
        Ok(self.assemble(
            method,
            endpoint,
            query,
            body,
            Some(signer.api_key().to_string()),
        ))
    }

    fn assemble(
        &self,
        method: HttpMethod,
        endpoint: &str,
        query: String,
        body: Option<String>,
        api_key: Option<String>,
    ) -> PreparedRequest {
        let endpoint_url = format!("{}/{}/{}", self.base_url, self.api_version, endpoint);
        let url = if query.is_empty() {
            endpoint_url
        } else {
            format!("{endpoint_url}?{query}")
        };

        PreparedRequest {
            method,
            url,
            query,
            body,
            api_key,
        }
    }
}
