use crate::core::config::BinanceConfig;
use crate::core::errors::BinanceError;
use crate::core::kernel::{
    classify_response, HttpTransport, QueryParams, ReqwestTransport, RequestBuilder, RequestSigner,
};
use crate::core::types::{AssetBalance, BookTicker, OrderSide};
use serde_json::Value;
use std::collections::HashMap;
use tracing::instrument;

/// Client for the exchange's spot REST API.
///
/// Owns the credentials, configuration and transport for its lifetime; each
/// call builds a fresh request, performs exactly one round-trip and
/// classifies the response. The client makes no provision for coordinating
/// concurrent calls: treat one instance as a single logical session and
/// serialize calls through it, or construct one client per task.
///
/// Generic over the transport so tests can substitute a recording spy for
/// the network.
pub struct BinanceClient<T = ReqwestTransport> {
    config: BinanceConfig,
    signer: Option<RequestSigner>,
    transport: T,
}

impl BinanceClient<ReqwestTransport> {
    /// Create a client backed by a reqwest transport.
    pub fn new(config: BinanceConfig) -> Result<Self, BinanceError> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::with_transport(config, transport))
    }

    /// Create a client from `BINANCE_*` environment variables.
    pub fn from_env() -> Result<Self, BinanceError> {
        Self::new(BinanceConfig::from_env()?)
    }
}

impl<T: HttpTransport> BinanceClient<T> {
    /// Create a client over an explicit transport.
    pub fn with_transport(config: BinanceConfig, transport: T) -> Self {
        let signer = config.has_credentials().then(|| {
            RequestSigner::new(config.api_key().to_string(), config.secret_key().to_string())
        });

        Self {
            config,
            signer,
            transport,
        }
    }

    pub fn config(&self) -> &BinanceConfig {
        &self.config
    }

    /// Issue a public call. No credentials or signature are attached.
    #[instrument(skip(self, params), fields(endpoint = %endpoint))]
    pub async fn query_public(
        &self,
        method: &str,
        endpoint: &str,
        params: QueryParams,
    ) -> Result<Value, BinanceError> {
        self.dispatch(method, endpoint, params, false).await
    }

    /// Issue a signed call. Injects `recvWindow` when the caller did not
    /// supply one, then appends `timestamp` and `signature`.
    #[instrument(skip(self, params), fields(endpoint = %endpoint))]
    pub async fn query_private(
        &self,
        method: &str,
        endpoint: &str,
        params: QueryParams,
    ) -> Result<Value, BinanceError> {
        self.dispatch(method, endpoint, params, true).await
    }

    async fn dispatch(
        &self,
        method: &str,
        endpoint: &str,
        params: QueryParams,
        signed: bool,
    ) -> Result<Value, BinanceError> {
        let builder = RequestBuilder::new(
            self.config.rest_base_url(),
            &self.config.api_version,
            self.config.recv_window_ms,
            self.signer.as_ref(),
        );
        let request = builder.build(method, endpoint, params, signed)?;
        let response = self.transport.send(&request).await?;
        classify_response(&response)
    }

    /// Account information, returned as the exchange sends it.
    #[instrument(skip(self))]
    pub async fn account(&self) -> Result<Value, BinanceError> {
        self.query_private("GET", "account", QueryParams::new())
            .await
    }

    /// Account balances keyed by asset symbol.
    #[instrument(skip(self))]
    pub async fn balance(&self) -> Result<HashMap<String, AssetBalance>, BinanceError> {
        let account = self.account().await?;
        let entries = account
            .get("balances")
            .and_then(Value::as_array)
            .ok_or_else(|| BinanceError::MissingField("balances".to_string()))?;

        let mut output = HashMap::with_capacity(entries.len());
        for entry in entries {
            output.insert(
                string_field(entry, "asset")?,
                AssetBalance {
                    free: string_field(entry, "free")?,
                    locked: string_field(entry, "locked")?,
                },
            );
        }

        Ok(output)
    }

    /// Last trade price for one symbol, as a decimal string.
    #[instrument(skip(self), fields(symbol = %symbol))]
    pub async fn price(&self, symbol: &str) -> Result<String, BinanceError> {
        let params = QueryParams::new().param("symbol", symbol);
        let ticker = self.query_public("GET", "ticker/price", params).await?;
        string_field(&ticker, "price")
    }

    /// Last trade price for every listed symbol, keyed by symbol.
    #[instrument(skip(self))]
    pub async fn prices(&self) -> Result<HashMap<String, String>, BinanceError> {
        let tickers = self
            .query_public("GET", "ticker/price", QueryParams::new())
            .await?;

        let mut output = HashMap::new();
        for ticker in expect_array(&tickers)? {
            output.insert(string_field(ticker, "symbol")?, string_field(ticker, "price")?);
        }

        Ok(output)
    }

    /// Best bid/ask for every listed symbol, keyed by symbol.
    #[instrument(skip(self))]
    pub async fn markets(&self) -> Result<HashMap<String, BookTicker>, BinanceError> {
        let tickers = self
            .query_public("GET", "ticker/bookTicker", QueryParams::new())
            .await?;

        let mut output = HashMap::new();
        for ticker in expect_array(&tickers)? {
            output.insert(
                string_field(ticker, "symbol")?,
                BookTicker {
                    bid_price: string_field(ticker, "bidPrice")?,
                    bid_qty: string_field(ticker, "bidQty")?,
                    ask_price: string_field(ticker, "askPrice")?,
                    ask_qty: string_field(ticker, "askQty")?,
                },
            );
        }

        Ok(output)
    }

    /// Place a market buy order. With `test` set, the order is validated by
    /// the exchange but not executed, and a successful response is `{}`.
    #[instrument(skip(self), fields(symbol = %symbol, quantity = %quantity, test = test))]
    pub async fn buy_market(
        &self,
        symbol: &str,
        quantity: &str,
        test: bool,
    ) -> Result<Value, BinanceError> {
        self.market_order(OrderSide::Buy, symbol, quantity, test)
            .await
    }

    /// Place a market sell order. See [`Self::buy_market`] for `test`.
    #[instrument(skip(self), fields(symbol = %symbol, quantity = %quantity, test = test))]
    pub async fn sell_market(
        &self,
        symbol: &str,
        quantity: &str,
        test: bool,
    ) -> Result<Value, BinanceError> {
        self.market_order(OrderSide::Sell, symbol, quantity, test)
            .await
    }

    async fn market_order(
        &self,
        side: OrderSide,
        symbol: &str,
        quantity: &str,
        test: bool,
    ) -> Result<Value, BinanceError> {
        let endpoint = if test { "order/test" } else { "order" };

        // Field order is part of the signed byte stream.
        let params = QueryParams::new()
            .param("side", side.as_str())
            .param("symbol", symbol)
            .param("type", "MARKET")
            .param("quantity", quantity);

        self.query_private("POST", endpoint, params).await
    }
}

fn string_field(value: &Value, key: &str) -> Result<String, BinanceError> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| BinanceError::MissingField(key.to_string()))
}

fn expect_array(value: &Value) -> Result<&Vec<Value>, BinanceError> {
    value.as_array().ok_or_else(|| BinanceError::Decode {
        body: value.to_string(),
    })
}
