//! Wire types for the horoscope HTTP surface

use std::collections::BTreeMap;

use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use zodica_core::{Horoscope, Sign};

/// Query parameters for `GET /v1/horoscope` and `DELETE /v1/horoscope/cache`
#[derive(Debug, Deserialize)]
pub struct HoroscopeQuery {
    pub sign: Option<String>,
    /// Defaults to `daily` when absent
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// IANA timezone name; invalid values fall back to UTC
    pub timezone: Option<String>,
}

/// Query parameters for `POST /v1/horoscopes/batch`
#[derive(Debug, Deserialize)]
pub struct BatchQuery {
    pub timezone: Option<String>,
}

/// Successful `GET /v1/horoscope` body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoroscopeResponse {
    pub success: bool,
    pub cached: bool,
    pub batch_generated: bool,
    pub timezone_aware: bool,
    pub timezone: String,
    pub local_date: Date,
    pub data: Horoscope,
}

/// `POST /v1/horoscopes/batch` body
///
/// Always 200: partial failures ride along in `failed` rather than
/// failing the run.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResponse {
    pub success: bool,
    pub date: Date,
    pub timezone: String,
    pub generated: Vec<Sign>,
    pub failed: BTreeMap<Sign, String>,
}

/// `DELETE /v1/horoscope/cache` body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurgeResponse {
    pub success: bool,
    pub removed: bool,
}
