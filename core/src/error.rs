//! Error types for the postcodes.io client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because single-entity lookups must
//! tell "no such postcode" apart from "the service misbehaved." Any other
//! non-2xx status, whether reported by the transport or echoed inside the
//! JSON envelope, lands in `HttpError` with the status and raw body.
//!
//! A `false` validation result and a `null` query result are *not* errors;
//! they come back as `Ok(false)` and `Ok(None)` respectively.

use thiserror::Error;

use crate::http::TransportError;

/// Errors returned by `PostcodeClient` build, parse and one-shot methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The service returned 404 or a null result for a single-entity lookup.
    #[error("resource not found")]
    NotFound,

    /// The service returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The configured base URL cannot be used to build request URLs.
    #[error("invalid base URL: {0}")]
    InvalidUrl(String),

    /// The transport failed before a response was received. The original
    /// error is kept as the source.
    #[error("transport failed: {0}")]
    Transport(#[source] TransportError),
}
