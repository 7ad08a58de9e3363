//! Request builder, response parser and one-shot client for postcodes.io.
//!
//! # Design
//! `PostcodeClient` holds a `base_url` and a transport and carries no
//! mutable state between calls. Every operation comes in three parts:
//! `build_*` produces an `HttpRequest`, `parse_*` consumes an
//! `HttpResponse`, and the un-prefixed method runs both around a single
//! `Transport::execute`. Hosts that want to own the I/O can call the
//! `build_*`/`parse_*` pair directly.
//!
//! Responses are read through the `{"status", "result"}` envelope rather
//! than the transport status alone, because the service reports some
//! failures only inside the body. Absence is operation-specific:
//! single-entity lookups turn a 404 or `null` result into
//! `ApiError::NotFound`, `validate` turns it into `false`, and list lookups
//! return `None`.
//! Path parameters that URL normalization would drop (`""`, `.`, `..`) are
//! treated the same way before anything is sent.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::config::{ClientConfig, DEFAULT_BASE_URL};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::transport::UreqTransport;
use crate::types::{BulkLookupRequest, BulkLookupResult, OutwardCode, Postcode, TerminatedPostcode};

/// Stateless client for the postcodes.io API.
#[derive(Debug, Clone)]
pub struct PostcodeClient<T = UreqTransport> {
    base_url: String,
    transport: T,
}

impl PostcodeClient<UreqTransport> {
    /// Production client talking HTTPS through ureq.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.base_url, UreqTransport::new(config))
    }
}

impl Default for PostcodeClient<UreqTransport> {
    fn default() -> Self {
        Self::from_config(&ClientConfig::default())
    }
}

impl<T> PostcodeClient<T> {
    pub fn new(base_url: &str, transport: T) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
        }
    }

    /// Client for the production endpoint using the given transport.
    pub fn with_transport(transport: T) -> Self {
        Self::new(DEFAULT_BASE_URL, transport)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn build_validate(&self, postcode: &str) -> Result<HttpRequest, ApiError> {
        self.get(&["postcodes", path_param(postcode)?, "validate"], &[])
    }

    pub fn build_get_postcode(&self, postcode: &str) -> Result<HttpRequest, ApiError> {
        self.get(&["postcodes", path_param(postcode)?], &[])
    }

    pub fn build_get_outward_code(&self, outcode: &str) -> Result<HttpRequest, ApiError> {
        self.get(&["outcodes", path_param(outcode)?], &[])
    }

    pub fn build_get_random_postcode(&self) -> Result<HttpRequest, ApiError> {
        self.get(&["random", "postcodes"], &[])
    }

    pub fn build_query(&self, postcode: &str) -> Result<HttpRequest, ApiError> {
        self.get(&["postcodes"], &[("q", postcode.to_string())])
    }

    pub fn build_get_terminated_postcode(&self, postcode: &str) -> Result<HttpRequest, ApiError> {
        self.get(&["terminated_postcodes", path_param(postcode)?], &[])
    }

    pub fn build_bulk_lookup(&self, postcodes: &[&str]) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(&BulkLookupRequest { postcodes })
            .map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: self.endpoint(&["postcodes"], &[])?.into(),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    pub fn build_nearest_postcodes(&self, postcode: &str) -> Result<HttpRequest, ApiError> {
        self.get(&["postcodes", path_param(postcode)?, "nearest"], &[])
    }

    pub fn build_reverse_geocode(
        &self,
        longitude: f64,
        latitude: f64,
    ) -> Result<HttpRequest, ApiError> {
        self.get(
            &["postcodes"],
            &[("lon", longitude.to_string()), ("lat", latitude.to_string())],
        )
    }

    pub fn build_autocomplete(&self, partial: &str) -> Result<HttpRequest, ApiError> {
        self.get(&["postcodes", path_param(partial)?, "autocomplete"], &[])
    }

    pub fn build_nearest_outward_codes(&self, outcode: &str) -> Result<HttpRequest, ApiError> {
        self.get(&["outcodes", path_param(outcode)?, "nearest"], &[])
    }

    /// A 404 or a `false`/`null`/missing result all mean "not a postcode".
    pub fn parse_validate(&self, response: HttpResponse) -> Result<bool, ApiError> {
        match decode_result::<bool>(&response) {
            Ok(valid) => Ok(valid.unwrap_or(false)),
            Err(ApiError::NotFound) => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub fn parse_get_postcode(&self, response: HttpResponse) -> Result<Postcode, ApiError> {
        decode_result(&response)?.ok_or(ApiError::NotFound)
    }

    pub fn parse_get_outward_code(&self, response: HttpResponse) -> Result<OutwardCode, ApiError> {
        decode_result(&response)?.ok_or(ApiError::NotFound)
    }

    pub fn parse_get_random_postcode(&self, response: HttpResponse) -> Result<Postcode, ApiError> {
        decode_result(&response)?.ok_or(ApiError::NotFound)
    }

    /// `None` when the service answers with a `null` result; the service
    /// never sends an empty array for "no matches".
    pub fn parse_query(&self, response: HttpResponse) -> Result<Option<Vec<Postcode>>, ApiError> {
        decode_result(&response)
    }

    pub fn parse_get_terminated_postcode(
        &self,
        response: HttpResponse,
    ) -> Result<TerminatedPostcode, ApiError> {
        decode_result(&response)?.ok_or(ApiError::NotFound)
    }

    pub fn parse_bulk_lookup(
        &self,
        response: HttpResponse,
    ) -> Result<Vec<BulkLookupResult>, ApiError> {
        Ok(decode_result(&response)?.unwrap_or_default())
    }

    pub fn parse_nearest_postcodes(
        &self,
        response: HttpResponse,
    ) -> Result<Option<Vec<Postcode>>, ApiError> {
        decode_result(&response)
    }

    pub fn parse_reverse_geocode(
        &self,
        response: HttpResponse,
    ) -> Result<Option<Vec<Postcode>>, ApiError> {
        decode_result(&response)
    }

    pub fn parse_autocomplete(
        &self,
        response: HttpResponse,
    ) -> Result<Option<Vec<String>>, ApiError> {
        decode_result(&response)
    }

    pub fn parse_nearest_outward_codes(
        &self,
        response: HttpResponse,
    ) -> Result<Option<Vec<OutwardCode>>, ApiError> {
        decode_result(&response)
    }

    fn get(&self, segments: &[&str], query: &[(&str, String)]) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method: HttpMethod::Get,
            url: self.endpoint(segments, query)?.into(),
            headers: Vec::new(),
            body: None,
        })
    }

    /// Append percent-encoded path segments and form-encoded query pairs to
    /// the base URL.
    fn endpoint(&self, segments: &[&str], query: &[(&str, String)]) -> Result<Url, ApiError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(format!("{} cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }
}

impl<T: Transport> PostcodeClient<T> {
    pub fn validate(&self, postcode: &str) -> Result<bool, ApiError> {
        let request = match self.build_validate(postcode) {
            Ok(request) => request,
            Err(ApiError::NotFound) => return Ok(false),
            Err(e) => return Err(e),
        };
        let response = self.send(request)?;
        self.parse_validate(response)
    }

    pub fn get_postcode(&self, postcode: &str) -> Result<Postcode, ApiError> {
        let response = self.send(self.build_get_postcode(postcode)?)?;
        self.parse_get_postcode(response)
    }

    pub fn get_outward_code(&self, outcode: &str) -> Result<OutwardCode, ApiError> {
        let response = self.send(self.build_get_outward_code(outcode)?)?;
        self.parse_get_outward_code(response)
    }

    pub fn get_random_postcode(&self) -> Result<Postcode, ApiError> {
        let response = self.send(self.build_get_random_postcode()?)?;
        self.parse_get_random_postcode(response)
    }

    pub fn query(&self, postcode: &str) -> Result<Option<Vec<Postcode>>, ApiError> {
        let response = self.send(self.build_query(postcode)?)?;
        self.parse_query(response)
    }

    pub fn get_terminated_postcode(&self, postcode: &str) -> Result<TerminatedPostcode, ApiError> {
        let response = self.send(self.build_get_terminated_postcode(postcode)?)?;
        self.parse_get_terminated_postcode(response)
    }

    pub fn bulk_lookup(&self, postcodes: &[&str]) -> Result<Vec<BulkLookupResult>, ApiError> {
        let response = self.send(self.build_bulk_lookup(postcodes)?)?;
        self.parse_bulk_lookup(response)
    }

    pub fn nearest_postcodes(&self, postcode: &str) -> Result<Option<Vec<Postcode>>, ApiError> {
        let response = self.send(self.build_nearest_postcodes(postcode)?)?;
        self.parse_nearest_postcodes(response)
    }

    pub fn reverse_geocode(
        &self,
        longitude: f64,
        latitude: f64,
    ) -> Result<Option<Vec<Postcode>>, ApiError> {
        let response = self.send(self.build_reverse_geocode(longitude, latitude)?)?;
        self.parse_reverse_geocode(response)
    }

    pub fn autocomplete(&self, partial: &str) -> Result<Option<Vec<String>>, ApiError> {
        let request = match self.build_autocomplete(partial) {
            Ok(request) => request,
            Err(ApiError::NotFound) => return Ok(None),
            Err(e) => return Err(e),
        };
        let response = self.send(request)?;
        self.parse_autocomplete(response)
    }

    pub fn nearest_outward_codes(
        &self,
        outcode: &str,
    ) -> Result<Option<Vec<OutwardCode>>, ApiError> {
        let response = self.send(self.build_nearest_outward_codes(outcode)?)?;
        self.parse_nearest_outward_codes(response)
    }

    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = ?request.method, url = %request.url, "sending postcodes.io request");
        let response = self.transport.execute(&request).map_err(ApiError::Transport)?;
        debug!(status = response.status, "received postcodes.io response");
        Ok(response)
    }
}

/// Path parameters that cannot name a resource. URL normalization drops
/// `.` and `..` segments (and their `%2e` spellings), which would send the
/// request to a different endpoint, so they are answered as missing before
/// any request is built.
fn path_param(value: &str) -> Result<&str, ApiError> {
    match value {
        "" | "." | ".." => Err(ApiError::NotFound),
        _ => Ok(value),
    }
}

/// The `{"status", "result"}` wrapper around every response body. Mocked
/// services may send `result` alone.
#[derive(Deserialize)]
struct Envelope<T> {
    status: Option<u16>,
    result: Option<T>,
    error: Option<String>,
}

/// Check the transport status, then the envelope status, and hand back the
/// `result` payload (`None` when null or absent).
fn decode_result<T: DeserializeOwned>(response: &HttpResponse) -> Result<Option<T>, ApiError> {
    check_status(response.status, || response.body.clone())?;
    let envelope: Envelope<T> = serde_json::from_str(&response.body)
        .map_err(|e| ApiError::DeserializationError(e.to_string()))?;
    if let Some(status) = envelope.status {
        check_status(status, || envelope.error.clone().unwrap_or_else(|| response.body.clone()))?;
    }
    Ok(envelope.result)
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(status: u16, body: impl FnOnce() -> String) -> Result<(), ApiError> {
    if (200..300).contains(&status) {
        return Ok(());
    }
    if status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError { status, body: body() })
}
