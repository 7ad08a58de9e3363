//! Synchronous client for the postcodes.io UK postcode API.
//!
//! # Overview
//! Maps each library call onto one postcodes.io endpoint and decodes the
//! `{"status", "result"}` envelope into typed records: postcode validation,
//! postcode and outward-code lookups, random postcodes, free-text and
//! bulk queries, nearest-neighbour and reverse-geocode searches,
//! autocomplete, and terminated postcodes.
//!
//! # Design
//! - `PostcodeClient` is stateless. It holds a `base_url` and an injected
//!   `Transport`; production code uses `UreqTransport`, tests script one.
//! - Each operation is also split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so a host can run the I/O itself.
//! - "Not found" is operation-specific: lookups return
//!   `ApiError::NotFound`, `validate` returns `false`, list queries return
//!   `None`. An empty list and a `null` result stay distinct.
//! - No retries, caching or internal logging of failures. Dispatch and
//!   response status are traced at `debug` level through `tracing`.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use client::PostcodeClient;
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
pub use transport::UreqTransport;
pub use types::{BulkLookupResult, OutwardCode, Postcode, PostcodeCodes, TerminatedPostcode};
