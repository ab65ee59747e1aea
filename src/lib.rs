//! Client for the Binance spot REST trading API.
//!
//! Public market-data endpoints need no credentials; private endpoints are
//! authenticated with an HMAC-SHA256 signature computed over the literal
//! query-string bytes, time-bounded by `recvWindow`. Every failure is
//! surfaced as one [`BinanceError`] variant, keeping transport, HTTP,
//! decode and exchange-level rejections distinct.
//!
//! ```no_run
//! use binance_rest::{BinanceClient, BinanceConfig};
//!
//! # async fn example() -> Result<(), binance_rest::BinanceError> {
//! let client = BinanceClient::new(BinanceConfig::read_only())?;
//! let price = client.price("ZECBTC").await?;
//! println!("ZECBTC last price: {price}");
//! # Ok(())
//! # }
//! ```
pub mod binance;
pub mod core;

pub use binance::BinanceClient;
pub use core::config::BinanceConfig;
pub use core::errors::BinanceError;
pub use core::kernel::QueryParams;
pub use core::types::{AssetBalance, BookTicker, OrderSide};
