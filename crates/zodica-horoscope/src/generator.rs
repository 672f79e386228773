//! Single-shot horoscope generation
//!
//! Wraps the completion client with prompt construction, strict
//! parse-then-validate handling of the model output, and the repair pass
//! that enforces the record invariants. Either a complete, repaired
//! record comes out or the call fails; nothing partial escapes.

use std::collections::BTreeSet;
use std::sync::Arc;

use jiff::civil::Date;
use serde::Deserialize;
use zodica_core::{Horoscope, HoroscopeKind, QUOTE_AUTHORS, Sign, match_quote_author};

use crate::client::CompletionClient;
use crate::error::HoroscopeError;
use crate::prompt;

/// Generates one horoscope record per call
#[derive(Clone)]
pub struct Generator {
    client: Arc<dyn CompletionClient>,
}

impl Generator {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    /// Generate a complete horoscope for one sign
    ///
    /// # Errors
    ///
    /// Returns `GenerationFailed` if the upstream call fails, the response
    /// is not JSON-shaped, or any required field is missing or blank
    pub async fn generate(&self, sign: Sign, kind: HoroscopeKind, date: Date) -> Result<Horoscope, HoroscopeError> {
        let prompt = prompt::build_prompt(sign, kind, date);
        let completion = self.client.complete(&prompt).await?;

        let raw = parse_response(&completion)?;
        Ok(repair(raw, sign, kind, date))
    }
}

/// Model output before validation and repair
///
/// Unknown fields are ignored; `luckyNumber` tolerates both numeric and
/// quoted values since models oscillate between the two.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawHoroscope {
    #[serde(default)]
    message: String,
    #[serde(default)]
    best_match: String,
    #[serde(default)]
    inspirational_quote: String,
    #[serde(default)]
    quote_author: String,
    #[serde(default)]
    peaceful_thought: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    lucky_number: Option<u32>,
    #[serde(default)]
    lucky_color: Option<String>,
}

/// Extract and validate the JSON object in the completion text
fn parse_response(completion: &str) -> Result<RawHoroscope, HoroscopeError> {
    let json = extract_json_object(completion)
        .ok_or_else(|| HoroscopeError::GenerationFailed("no JSON object in completion".to_owned()))?;

    let raw: RawHoroscope = serde_json::from_str(json)
        .map_err(|e| HoroscopeError::GenerationFailed(format!("malformed completion JSON: {e}")))?;

    for (field, value) in [
        ("message", &raw.message),
        ("bestMatch", &raw.best_match),
        ("inspirationalQuote", &raw.inspirational_quote),
        ("quoteAuthor", &raw.quote_author),
    ] {
        if value.trim().is_empty() {
            return Err(HoroscopeError::GenerationFailed(format!(
                "completion is missing required field '{field}'"
            )));
        }
    }

    Ok(raw)
}

/// Locate the JSON object inside completion text
///
/// Models routinely wrap the object in prose or markdown fences; the
/// outermost brace pair is the payload.
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Apply the record invariants to a successfully parsed response
fn repair(raw: RawHoroscope, sign: Sign, kind: HoroscopeKind, date: Date) -> Horoscope {
    let quote_author = match match_quote_author(&raw.quote_author) {
        Some(canonical) => canonical.to_owned(),
        None => {
            let fallback = random_author();
            tracing::debug!(
                sign = %sign,
                raw_author = %raw.quote_author,
                fallback,
                "quote author outside allow-list, substituting"
            );
            fallback.to_owned()
        }
    };

    Horoscope {
        sign,
        kind,
        date,
        message: raw.message.trim().to_owned(),
        best_match: repair_best_match(&raw.best_match, sign),
        inspirational_quote: raw.inspirational_quote.trim().to_owned(),
        quote_author,
        peaceful_thought: raw.peaceful_thought.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty()),
        lucky_number: raw.lucky_number,
        lucky_color: raw.lucky_color.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty()),
    }
}

/// Normalize the compatibility list
///
/// Lowercases and de-duplicates the comma-split tokens, drops the sign
/// itself, force-includes the hand-authored Libra/Aquarius pairing, and
/// re-sorts alphabetically.
fn repair_best_match(raw: &str, sign: Sign) -> String {
    let mut tokens: BTreeSet<String> = raw
        .split(',')
        .map(|token| token.trim().to_lowercase())
        .filter(|token| !token.is_empty() && token != sign.as_str())
        .collect();

    if let Some(partner) = sign.forced_match() {
        tokens.insert(partner.as_str().to_owned());
    }

    tokens.into_iter().collect::<Vec<_>>().join(", ")
}

fn random_author() -> &'static str {
    use rand::seq::IndexedRandom;

    QUOTE_AUTHORS
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or(QUOTE_AUTHORS[0])
}

/// Accept `7`, `"7"`, or null for the lucky number
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(u32),
        Text(String),
    }

    let value: Option<NumberOrString> = Option::deserialize(deserializer)?;
    Ok(match value {
        Some(NumberOrString::Number(n)) => Some(n),
        Some(NumberOrString::Text(s)) => s.trim().parse().ok(),
        None => None,
    })
}
