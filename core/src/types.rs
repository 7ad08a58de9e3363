//! Typed records decoded from the `result` field of postcodes.io responses.
//!
//! # Design
//! Only the identifying field of each record is required. Everything else
//! the API can omit or publish as `null` is an `Option` (or an empty `Vec`
//! for list-valued outward-code fields), so partial payloads still decode
//! while a payload with the wrong shape is rejected. Unknown fields are
//! ignored.

use serde::{Deserialize, Serialize};

/// Details of a live postcode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Postcode {
    pub postcode: String,
    pub quality: Option<i64>,
    pub eastings: Option<i64>,
    pub northings: Option<i64>,
    pub country: Option<String>,
    pub nhs_ha: Option<String>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub european_electoral_region: Option<String>,
    pub primary_care_trust: Option<String>,
    pub region: Option<String>,
    pub lsoa: Option<String>,
    pub msoa: Option<String>,
    pub incode: Option<String>,
    pub outcode: Option<String>,
    pub parliamentary_constituency: Option<String>,
    pub admin_district: Option<String>,
    pub parish: Option<String>,
    pub admin_county: Option<String>,
    pub admin_ward: Option<String>,
    pub ced: Option<String>,
    pub ccg: Option<String>,
    pub nuts: Option<String>,
    pub codes: Option<PostcodeCodes>,
}

/// GSS identifiers for the administrative areas a postcode falls in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostcodeCodes {
    pub admin_district: Option<String>,
    pub admin_county: Option<String>,
    pub admin_ward: Option<String>,
    pub parish: Option<String>,
    pub parliamentary_constituency: Option<String>,
    pub ccg: Option<String>,
    pub ccg_id: Option<String>,
    pub ced: Option<String>,
    pub nuts: Option<String>,
    pub lsoa: Option<String>,
    pub msoa: Option<String>,
    pub lau2: Option<String>,
}

/// Details of an outward code (the district part of a postcode, e.g. `N11`).
///
/// Area fields are lists because one outward code can span several
/// districts, wards and constituencies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutwardCode {
    pub outcode: String,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub northings: Option<i64>,
    pub eastings: Option<i64>,
    #[serde(default)]
    pub admin_district: Vec<String>,
    #[serde(default)]
    pub admin_county: Vec<String>,
    #[serde(default)]
    pub admin_ward: Vec<String>,
    #[serde(default)]
    pub parish: Vec<String>,
    #[serde(default)]
    pub parliamentary_constituency: Vec<String>,
    #[serde(default)]
    pub country: Vec<String>,
}

/// A retired postcode with the date it was terminated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerminatedPostcode {
    pub postcode: String,
    pub year_terminated: u16,
    pub month_terminated: u8,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
}

/// One entry of a bulk lookup: the postcode as sent and its match, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkLookupResult {
    pub query: String,
    pub result: Option<Postcode>,
}

/// Request payload for a bulk lookup.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct BulkLookupRequest<'a> {
    pub postcodes: &'a [&'a str],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn postcode_decodes_from_identifier_alone() {
        let postcode: Postcode = serde_json::from_str(r#"{"postcode":"N11 1QZ"}"#).unwrap();
        assert_eq!(postcode.postcode, "N11 1QZ");
        assert!(postcode.longitude.is_none());
        assert!(postcode.codes.is_none());
    }

    #[test]
    fn postcode_decodes_full_payload_and_ignores_unknown_fields() {
        let json = r#"{
            "postcode": "N11 1QZ",
            "quality": 1,
            "eastings": 528946,
            "northings": 192408,
            "country": "England",
            "nhs_ha": "London",
            "longitude": -0.141159,
            "latitude": 51.614064,
            "parliamentary_constituency": "Southgate and Wood Green",
            "admin_district": "Barnet",
            "parish": null,
            "admin_ward": "Brunswick Park",
            "ccg": "NHS North Central London",
            "codes": {"admin_district": "E09000003", "parish": "E43000194"},
            "date_of_introduction": "198001"
        }"#;
        let postcode: Postcode = serde_json::from_str(json).unwrap();
        assert_eq!(postcode.quality, Some(1));
        assert_eq!(postcode.eastings, Some(528946));
        assert_eq!(postcode.latitude, Some(51.614064));
        assert_eq!(postcode.admin_district.as_deref(), Some("Barnet"));
        assert!(postcode.parish.is_none());
        let codes = postcode.codes.unwrap();
        assert_eq!(codes.admin_district.as_deref(), Some("E09000003"));
        assert!(codes.ccg.is_none());
    }

    #[test]
    fn postcode_rejects_missing_identifier() {
        let result: Result<Postcode, _> = serde_json::from_str(r#"{"quality":1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn postcode_rejects_wrongly_typed_field() {
        let result: Result<Postcode, _> =
            serde_json::from_str(r#"{"postcode":"N11 1QZ","eastings":"far"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn outward_code_lists_default_to_empty() {
        let outcode: OutwardCode = serde_json::from_str(r#"{"outcode":"N11"}"#).unwrap();
        assert_eq!(outcode.outcode, "N11");
        assert!(outcode.admin_district.is_empty());
        assert!(outcode.country.is_empty());
    }

    #[test]
    fn outward_code_keeps_list_order() {
        let outcode: OutwardCode = serde_json::from_str(
            r#"{"outcode":"N11","admin_district":["Barnet","Enfield","Haringey"]}"#,
        )
        .unwrap();
        assert_eq!(outcode.admin_district, vec!["Barnet", "Enfield", "Haringey"]);
    }

    #[test]
    fn terminated_postcode_requires_termination_date() {
        let result: Result<TerminatedPostcode, _> =
            serde_json::from_str(r#"{"postcode":"AB1 0AA"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn terminated_postcode_allows_null_coordinates() {
        let terminated: TerminatedPostcode = serde_json::from_str(
            r#"{"postcode":"AB1 0AA","year_terminated":1996,"month_terminated":6,
                "longitude":null,"latitude":null}"#,
        )
        .unwrap();
        assert_eq!(terminated.year_terminated, 1996);
        assert!(terminated.longitude.is_none());
    }

    #[test]
    fn bulk_request_serializes_postcode_list() {
        let postcodes = ["N11 1QZ", "AB1 0AA"];
        let body = serde_json::to_value(BulkLookupRequest { postcodes: &postcodes }).unwrap();
        assert_eq!(body, serde_json::json!({"postcodes": ["N11 1QZ", "AB1 0AA"]}));
    }
}
