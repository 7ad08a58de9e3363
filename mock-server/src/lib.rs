//! In-memory stand-in for the postcodes.io API.
//!
//! Serves a small fixed dataset with the same routes and
//! `{"status", "result"}` envelopes as the real service, so clients can be
//! exercised over real HTTP without network access.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

/// Degrees of longitude/latitude within which a point counts as "near".
const NEAR_DEGREES: f64 = 0.02;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Postcode {
    pub postcode: String,
    pub outcode: String,
    pub incode: String,
    pub quality: i64,
    pub eastings: i64,
    pub northings: i64,
    pub country: String,
    pub longitude: f64,
    pub latitude: f64,
    pub admin_district: Option<String>,
    pub admin_ward: Option<String>,
    pub parliamentary_constituency: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OutwardCode {
    pub outcode: String,
    pub longitude: f64,
    pub latitude: f64,
    pub eastings: i64,
    pub northings: i64,
    pub admin_district: Vec<String>,
    pub country: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TerminatedPostcode {
    pub postcode: String,
    pub year_terminated: u16,
    pub month_terminated: u8,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BulkLookupResult {
    pub query: String,
    pub result: Option<Postcode>,
}

/// Successful response body. `result` is serialized as `null` when absent.
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub status: u16,
    pub result: Option<T>,
}

impl<T> Envelope<T> {
    fn ok(result: Option<T>) -> Json<Self> {
        Json(Self { status: 200, result })
    }
}

/// Error response body, sent with the matching HTTP status.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub status: u16,
    pub error: String,
}

#[derive(Debug)]
pub struct Failure {
    status: StatusCode,
    message: &'static str,
}

impl Failure {
    fn not_found(message: &'static str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message,
        }
    }

    fn bad_request(message: &'static str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message,
        }
    }
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            status: self.status.as_u16(),
            error: self.message.to_string(),
        };
        (self.status, Json(body)).into_response()
    }
}

type Reply<T> = Result<Json<Envelope<T>>, Failure>;

#[derive(Debug, Deserialize)]
pub struct PostcodeQuery {
    pub q: Option<String>,
    pub lon: Option<f64>,
    pub lat: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct BulkLookupRequest {
    pub postcodes: Vec<String>,
}

/// The fixed records the server answers from.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub postcodes: Vec<Postcode>,
    pub outcodes: Vec<OutwardCode>,
    pub terminated: Vec<TerminatedPostcode>,
}

impl Dataset {
    pub fn sample() -> Self {
        fn postcode(
            postcode: &str,
            (eastings, northings): (i64, i64),
            (longitude, latitude): (f64, f64),
            [district, ward, constituency]: [&str; 3],
        ) -> Postcode {
            let (outcode, incode) = postcode.split_once(' ').unwrap_or((postcode, ""));
            Postcode {
                postcode: postcode.to_string(),
                outcode: outcode.to_string(),
                incode: incode.to_string(),
                quality: 1,
                eastings,
                northings,
                country: "England".to_string(),
                longitude,
                latitude,
                admin_district: Some(district.to_string()),
                admin_ward: Some(ward.to_string()),
                parliamentary_constituency: Some(constituency.to_string()),
            }
        }

        Self {
            postcodes: vec![
                postcode(
                    "N11 1QZ",
                    (528946, 192408),
                    (-0.141159, 51.614064),
                    ["Barnet", "Brunswick Park", "Southgate and Wood Green"],
                ),
                postcode(
                    "N11 1RA",
                    (529120, 192530),
                    (-0.138611, 51.615118),
                    ["Barnet", "Brunswick Park", "Southgate and Wood Green"],
                ),
                postcode(
                    "SW1A 1AA",
                    (529090, 179645),
                    (-0.141588, 51.501009),
                    ["Westminster", "St James's", "Cities of London and Westminster"],
                ),
            ],
            outcodes: vec![
                OutwardCode {
                    outcode: "N11".to_string(),
                    longitude: -0.139734,
                    latitude: 51.615326,
                    eastings: 529031,
                    northings: 192551,
                    admin_district: vec![
                        "Barnet".to_string(),
                        "Enfield".to_string(),
                        "Haringey".to_string(),
                    ],
                    country: vec!["England".to_string()],
                },
                OutwardCode {
                    outcode: "N10".to_string(),
                    longitude: -0.144913,
                    latitude: 51.593118,
                    eastings: 528738,
                    northings: 190070,
                    admin_district: vec!["Barnet".to_string(), "Haringey".to_string()],
                    country: vec!["England".to_string()],
                },
                OutwardCode {
                    outcode: "SW1A".to_string(),
                    longitude: -0.135934,
                    latitude: 51.503337,
                    eastings: 529475,
                    northings: 179917,
                    admin_district: vec!["Westminster".to_string()],
                    country: vec!["England".to_string()],
                },
            ],
            terminated: vec![TerminatedPostcode {
                postcode: "AB1 0AA".to_string(),
                year_terminated: 1996,
                month_terminated: 6,
                longitude: Some(-2.242851),
                latitude: Some(57.101474),
            }],
        }
    }

    fn postcode(&self, raw: &str) -> Option<&Postcode> {
        let key = normalize(raw);
        self.postcodes.iter().find(|p| normalize(&p.postcode) == key)
    }

    fn outcode(&self, raw: &str) -> Option<&OutwardCode> {
        let key = normalize(raw);
        self.outcodes.iter().find(|o| o.outcode == key)
    }

    fn postcodes_with_prefix(&self, raw: &str) -> Vec<Postcode> {
        let prefix = normalize(raw);
        self.postcodes
            .iter()
            .filter(|p| normalize(&p.postcode).starts_with(&prefix))
            .cloned()
            .collect()
    }

    fn postcodes_near(&self, longitude: f64, latitude: f64) -> Vec<Postcode> {
        let mut near: Vec<(f64, &Postcode)> = self
            .postcodes
            .iter()
            .map(|p| (distance(longitude, latitude, p.longitude, p.latitude), p))
            .filter(|(d, _)| *d <= NEAR_DEGREES)
            .collect();
        near.sort_by(|a, b| a.0.total_cmp(&b.0));
        near.into_iter().map(|(_, p)| p.clone()).collect()
    }

    fn outcodes_near(&self, longitude: f64, latitude: f64) -> Vec<OutwardCode> {
        let mut near: Vec<(f64, &OutwardCode)> = self
            .outcodes
            .iter()
            .map(|o| (distance(longitude, latitude, o.longitude, o.latitude), o))
            .filter(|(d, _)| *d <= NEAR_DEGREES * 2.0)
            .collect();
        near.sort_by(|a, b| a.0.total_cmp(&b.0));
        near.into_iter().map(|(_, o)| o.clone()).collect()
    }
}

pub type Db = Arc<Dataset>;

pub fn app() -> Router {
    app_with(Dataset::sample())
}

pub fn app_with(dataset: Dataset) -> Router {
    let db: Db = Arc::new(dataset);
    Router::new()
        .route("/postcodes", get(query_postcodes).post(bulk_lookup))
        .route("/postcodes/{postcode}", get(get_postcode))
        .route("/postcodes/{postcode}/validate", get(validate))
        .route("/postcodes/{postcode}/nearest", get(nearest_postcodes))
        .route("/postcodes/{postcode}/autocomplete", get(autocomplete))
        .route("/outcodes/{outcode}", get(get_outcode))
        .route("/outcodes/{outcode}/nearest", get(nearest_outcodes))
        .route("/random/postcodes", get(random_postcode))
        .route("/terminated_postcodes/{postcode}", get(get_terminated))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn validate(State(db): State<Db>, Path(postcode): Path<String>) -> Json<Envelope<bool>> {
    Envelope::ok(Some(db.postcode(&postcode).is_some()))
}

async fn get_postcode(State(db): State<Db>, Path(postcode): Path<String>) -> Reply<Postcode> {
    let found = db.postcode(&postcode).ok_or(Failure::not_found("Postcode not found"))?;
    Ok(Envelope::ok(Some(found.clone())))
}

async fn query_postcodes(
    State(db): State<Db>,
    Query(params): Query<PostcodeQuery>,
) -> Reply<Vec<Postcode>> {
    let matches = match params {
        PostcodeQuery { q: Some(q), .. } => db.postcodes_with_prefix(&q),
        PostcodeQuery {
            lon: Some(lon),
            lat: Some(lat),
            ..
        } => db.postcodes_near(lon, lat),
        _ => return Err(Failure::bad_request("No postcode query submitted")),
    };
    Ok(Envelope::ok(non_empty(matches)))
}

async fn bulk_lookup(
    State(db): State<Db>,
    Json(input): Json<BulkLookupRequest>,
) -> Json<Envelope<Vec<BulkLookupResult>>> {
    let results = input
        .postcodes
        .into_iter()
        .map(|query| {
            let result = db.postcode(&query).cloned();
            BulkLookupResult { query, result }
        })
        .collect();
    Envelope::ok(Some(results))
}

async fn nearest_postcodes(
    State(db): State<Db>,
    Path(postcode): Path<String>,
) -> Reply<Vec<Postcode>> {
    let origin = db
        .postcode(&postcode)
        .ok_or(Failure::not_found("Postcode not found"))?;
    Ok(Envelope::ok(non_empty(db.postcodes_near(origin.longitude, origin.latitude))))
}

async fn autocomplete(
    State(db): State<Db>,
    Path(partial): Path<String>,
) -> Json<Envelope<Vec<String>>> {
    let suggestions = db
        .postcodes_with_prefix(&partial)
        .into_iter()
        .map(|p| p.postcode)
        .collect();
    Envelope::ok(non_empty(suggestions))
}

async fn get_outcode(State(db): State<Db>, Path(outcode): Path<String>) -> Reply<OutwardCode> {
    let found = db.outcode(&outcode).ok_or(Failure::not_found("Outcode not found"))?;
    Ok(Envelope::ok(Some(found.clone())))
}

async fn nearest_outcodes(
    State(db): State<Db>,
    Path(outcode): Path<String>,
) -> Reply<Vec<OutwardCode>> {
    let origin = db
        .outcode(&outcode)
        .ok_or(Failure::not_found("Outcode not found"))?;
    Ok(Envelope::ok(non_empty(db.outcodes_near(origin.longitude, origin.latitude))))
}

async fn random_postcode(State(db): State<Db>) -> Json<Envelope<Postcode>> {
    Envelope::ok(db.postcodes.first().cloned())
}

async fn get_terminated(
    State(db): State<Db>,
    Path(postcode): Path<String>,
) -> Reply<TerminatedPostcode> {
    let key = normalize(&postcode);
    let found = db
        .terminated
        .iter()
        .find(|t| normalize(&t.postcode) == key)
        .ok_or(Failure::not_found("Terminated postcode not found"))?;
    Ok(Envelope::ok(Some(found.clone())))
}

/// Uppercase with whitespace removed, so `n111qz` matches `N11 1QZ`.
fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

fn distance(lon_a: f64, lat_a: f64, lon_b: f64, lat_b: f64) -> f64 {
    (lon_a - lon_b).hypot(lat_a - lat_b)
}

/// The real service answers "no matches" with `null`, never `[]`.
fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}
