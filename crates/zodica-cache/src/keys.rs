use std::collections::BTreeMap;

use jiff::civil::Date;
use serde_json::Value;
use zodica_core::{HoroscopeKind, Sign};

/// Key domain for horoscope content
pub const HOROSCOPE_DOMAIN: &str = "horoscope";

/// Build a canonical cache key from a domain and parameter map
///
/// Parameters render as `key=value` pairs joined with `&`, ordered
/// lexicographically by key (the `BTreeMap` carries the ordering). Array
/// values join their rendered elements with `,`; nested objects fall back
/// to their JSON text. The same logical parameters always produce
/// byte-identical keys, regardless of how callers assembled them.
pub fn build_key(domain: &str, params: &BTreeMap<&str, Value>) -> String {
    let pairs: Vec<String> = params
        .iter()
        .map(|(name, value)| format!("{name}={}", render(value)))
        .collect();
    format!("{domain}:{}", pairs.join("&"))
}

fn render(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(render).collect::<Vec<_>>().join(","),
        other => other.to_string(),
    }
}

/// Cache key for one horoscope record
///
/// Always includes `sign`, `date`, and `type`, so daily, weekly, and
/// monthly content for the same sign and date never collide. The date is
/// the requester-local calendar date on the timezone-aware daily path and
/// the UTC date everywhere else.
pub fn horoscope_key(sign: Sign, kind: HoroscopeKind, date: Date) -> String {
    let params = BTreeMap::from([
        ("sign", Value::from(sign.as_str())),
        ("date", Value::from(date.to_string())),
        ("type", Value::from(kind.as_str())),
    ]);
    build_key(HOROSCOPE_DOMAIN, &params)
}

/// Cache key for one sign's daily horoscope on `date`
pub fn daily_key(sign: Sign, date: Date) -> String {
    horoscope_key(sign, HoroscopeKind::Daily, date)
}
