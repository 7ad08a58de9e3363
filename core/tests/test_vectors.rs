//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results or error kinds. Expected records are decoded
//! into the client's own types before comparing, so absent optional fields
//! compare as `None`.

use postcodes_core::{
    ApiError, HttpMethod, HttpRequest, HttpResponse, OutwardCode, Postcode, PostcodeClient,
    TerminatedPostcode,
};

const BASE_URL: &str = "http://localhost:3000";

/// Build/parse need no transport; the vectors supply the responses.
fn client() -> PostcodeClient<()> {
    PostcodeClient::new(BASE_URL, ())
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        other => panic!("unknown method: {other}"),
    }
}

fn assert_request(name: &str, req: &HttpRequest, expected: &serde_json::Value) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.url, format!("{BASE_URL}{}", expected["path"].as_str().unwrap()), "{name}: url");
    assert!(req.body.is_none(), "{name}: body should be None");
}

fn simulated_response(case: &serde_json::Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse::new(
        sim["status"].as_u64().unwrap() as u16,
        sim["body"].as_str().unwrap(),
    )
}

fn assert_error_kind(name: &str, err: ApiError, expected: &str) {
    let matched = match expected {
        "NotFound" => matches!(err, ApiError::NotFound),
        "HttpError" => matches!(err, ApiError::HttpError { .. }),
        "DeserializationError" => matches!(err, ApiError::DeserializationError(_)),
        other => panic!("{name}: unknown expected_error: {other}"),
    };
    assert!(matched, "{name}: expected {expected}, got {err:?}");
}

// ---------------------------------------------------------------------------
// Validate
// ---------------------------------------------------------------------------

#[test]
fn validate_test_vectors() {
    let raw = include_str!("../../test-vectors/validate.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input = case["input"].as_str().unwrap();

        let req = c.build_validate(input).unwrap();
        assert_request(name, &req, &case["expected_request"]);

        let valid = c.parse_validate(simulated_response(case)).unwrap();
        assert_eq!(valid, case["expected_result"].as_bool().unwrap(), "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// Single-entity lookups
// ---------------------------------------------------------------------------

#[test]
fn lookup_test_vectors() {
    let raw = include_str!("../../test-vectors/lookups.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input = case["input"].as_str().unwrap_or_default();
        let expected = case["expected_result"].clone();
        let response = simulated_response(case);

        // Each arm yields Ok(()) after comparing, or the parse error.
        let (req, outcome) = match case["operation"].as_str().unwrap() {
            "get_postcode" => {
                let req = c.build_get_postcode(input).unwrap();
                let outcome = c.parse_get_postcode(response).map(|found| {
                    let expected: Postcode = serde_json::from_value(expected).unwrap();
                    assert_eq!(found, expected, "{name}: parsed result");
                });
                (req, outcome)
            }
            "get_outward_code" => {
                let req = c.build_get_outward_code(input).unwrap();
                let outcome = c.parse_get_outward_code(response).map(|found| {
                    let expected: OutwardCode = serde_json::from_value(expected).unwrap();
                    assert_eq!(found, expected, "{name}: parsed result");
                });
                (req, outcome)
            }
            "get_random_postcode" => {
                let req = c.build_get_random_postcode().unwrap();
                let outcome = c.parse_get_random_postcode(response).map(|found| {
                    let expected: Postcode = serde_json::from_value(expected).unwrap();
                    assert_eq!(found, expected, "{name}: parsed result");
                });
                (req, outcome)
            }
            "get_terminated_postcode" => {
                let req = c.build_get_terminated_postcode(input).unwrap();
                let outcome = c.parse_get_terminated_postcode(response).map(|found| {
                    let expected: TerminatedPostcode = serde_json::from_value(expected).unwrap();
                    assert_eq!(found, expected, "{name}: parsed result");
                });
                (req, outcome)
            }
            other => panic!("{name}: unknown operation: {other}"),
        };

        assert_request(name, &req, &case["expected_request"]);
        match (case.get("expected_error"), outcome) {
            (Some(expected_error), Err(err)) => {
                assert_error_kind(name, err, expected_error.as_str().unwrap());
            }
            (Some(_), Ok(())) => panic!("{name}: expected an error"),
            (None, Err(err)) => panic!("{name}: unexpected error {err:?}"),
            (None, Ok(())) => {}
        }
    }
}

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

#[test]
fn query_test_vectors() {
    let raw = include_str!("../../test-vectors/query.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input = case["input"].as_str().unwrap();

        let req = c.build_query(input).unwrap();
        assert_request(name, &req, &case["expected_request"]);

        let matches = c.parse_query(simulated_response(case)).unwrap();
        let expected: Option<Vec<Postcode>> =
            serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(matches, expected, "{name}: parsed result");
    }
}
