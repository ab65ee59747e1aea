//! Transport kernel: request construction, signing, and response
//! classification.
//!
//! The kernel contains no endpoint knowledge. It is organized around three
//! pieces:
//!
//! - [`request`]: turns a (method, endpoint, params) triple into a
//!   [`PreparedRequest`], appending `recvWindow`, `timestamp` and the HMAC
//!   `signature` for signed calls.
//! - [`signer`]: HMAC-SHA256 over the literal query-string bytes.
//! - [`rest`]: the [`HttpTransport`] trait with its reqwest implementation,
//!   and [`classify_response`], which separates transport, HTTP, decode and
//!   exchange failures into distinct error kinds.
//!
//! Everything is trait-based where a seam is useful: endpoint code takes any
//! `HttpTransport`, which is how the test suite substitutes a recording spy
//! for the network.

pub mod request;
pub mod rest;
pub mod signer;

pub use request::{HttpMethod, PreparedRequest, QueryParams, RequestBuilder};
pub use rest::{classify_response, HttpResponse, HttpTransport, ReqwestTransport, API_KEY_HEADER};
pub use signer::{current_timestamp_ms, RequestSigner};
