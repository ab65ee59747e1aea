use crate::core::errors::BinanceError;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, Secret};
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};

type HmacSha256 = Hmac<Sha256>;

/// HMAC-SHA256 signer holding the API credentials for one client instance.
///
/// The secret key never leaves this struct; it is only fed into the MAC.
/// The API key is exposed solely as the `X-MBX-APIKEY` header value.
pub struct RequestSigner {
    api_key: Secret<String>,
    secret_key: Secret<String>,
}

impl RequestSigner {
    pub fn new(api_key: String, secret_key: String) -> Self {
        Self {
            api_key: Secret::new(api_key),
            secret_key: Secret::new(secret_key),
        }
    }

    /// Header value for authenticated requests.
    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Lowercase hex HMAC-SHA256 over the exact bytes of `payload`.
    ///
    /// `payload` must be the literal query string as it will appear on the
    /// wire; the exchange recomputes the MAC over those bytes.
    pub fn signature(&self, payload: &str) -> Result<String, BinanceError> {
        let mut mac = HmacSha256::new_from_slice(self.secret_key.expose_secret().as_bytes())
            .map_err(|e| BinanceError::Auth(format!("failed to create HMAC: {e}")))?;
        mac.update(payload.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }
}

impl std::fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestSigner").finish_non_exhaustive()
    }
}

/// Current time as integer milliseconds since the Unix epoch.
#[allow(clippy::cast_possible_truncation)]
pub fn current_timestamp_ms() -> Result<u64, BinanceError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_millis() as u64)
        .map_err(|e| BinanceError::Other(format!("system time error: {e}")))
}
