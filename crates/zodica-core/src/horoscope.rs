use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::sign::Sign;

/// Content horizon for a horoscope
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum HoroscopeKind {
    Daily,
    Weekly,
    Monthly,
}

impl HoroscopeKind {
    /// Canonical lowercase identifier without allocating
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

/// One generated horoscope, as served to clients and stored in the cache
///
/// Field names follow the camelCase wire shape the web frontend consumes.
/// `peacefulThought`, `luckyNumber`, and `luckyColor` appeared in later
/// prompt revisions; older cached records omit them, so they stay optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Horoscope {
    pub sign: Sign,
    #[serde(rename = "type")]
    pub kind: HoroscopeKind,
    /// Calendar date the record applies to (requester-local for
    /// timezone-aware daily content, UTC otherwise)
    pub date: Date,
    pub message: String,
    /// Comma-separated compatible signs, alphabetical, never the sign itself
    pub best_match: String,
    pub inspirational_quote: String,
    /// Always one of [`crate::QUOTE_AUTHORS`] after repair
    pub quote_author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peaceful_thought: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lucky_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lucky_color: Option<String>,
}

impl Horoscope {
    /// Whether every required field carries content
    ///
    /// The optional extras never participate; a record with only the four
    /// core fields is complete.
    pub fn is_complete(&self) -> bool {
        !(self.message.trim().is_empty()
            || self.best_match.trim().is_empty()
            || self.inspirational_quote.trim().is_empty()
            || self.quote_author.trim().is_empty())
    }

    /// Iterate the individual `bestMatch` entries
    pub fn best_match_signs(&self) -> impl Iterator<Item = &str> {
        self.best_match
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use jiff::civil::date;

    use super::*;

    fn sample() -> Horoscope {
        Horoscope {
            sign: Sign::Leo,
            kind: HoroscopeKind::Daily,
            date: date(2026, 3, 14),
            message: "A bold day for creative work.".into(),
            best_match: "aries, gemini, sagittarius".into(),
            inspirational_quote: "The obstacle is the way.".into(),
            quote_author: "Marcus Aurelius".into(),
            peaceful_thought: None,
            lucky_number: None,
            lucky_color: None,
        }
    }

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!(HoroscopeKind::from_str("daily").unwrap(), HoroscopeKind::Daily);
        assert_eq!(HoroscopeKind::from_str("Weekly").unwrap(), HoroscopeKind::Weekly);
        assert!(HoroscopeKind::from_str("yearly").is_err());
    }

    #[test]
    fn complete_record_passes() {
        assert!(sample().is_complete());
    }

    #[test]
    fn blank_required_field_fails_completeness() {
        let mut record = sample();
        record.quote_author = "   ".into();
        assert!(!record.is_complete());

        let mut record = sample();
        record.message = String::new();
        assert!(!record.is_complete());
    }

    #[test]
    fn wire_shape_is_camel_case_with_extras_omitted() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["sign"], "leo");
        assert_eq!(json["type"], "daily");
        assert_eq!(json["date"], "2026-03-14");
        assert!(json.get("bestMatch").is_some());
        assert!(json.get("inspirationalQuote").is_some());
        assert!(json.get("quoteAuthor").is_some());
        assert!(json.get("peacefulThought").is_none());
        assert!(json.get("luckyNumber").is_none());
    }

    #[test]
    fn deserializes_records_with_and_without_extras() {
        let bare = serde_json::to_string(&sample()).unwrap();
        let parsed: Horoscope = serde_json::from_str(&bare).unwrap();
        assert_eq!(parsed, sample());

        let enriched = serde_json::json!({
            "sign": "libra",
            "type": "weekly",
            "date": "2026-03-09",
            "message": "Balance returns.",
            "bestMatch": "aquarius, gemini",
            "inspirationalQuote": "Knowing others is intelligence.",
            "quoteAuthor": "Lao Tzu",
            "peacefulThought": "Still water reflects the sky.",
            "luckyNumber": 7,
            "luckyColor": "teal"
        });
        let parsed: Horoscope = serde_json::from_value(enriched).unwrap();
        assert_eq!(parsed.lucky_number, Some(7));
        assert_eq!(parsed.peaceful_thought.as_deref(), Some("Still water reflects the sky."));
    }

    #[test]
    fn best_match_signs_trims_tokens() {
        let record = sample();
        let tokens: Vec<&str> = record.best_match_signs().collect();
        assert_eq!(tokens, vec!["aries", "gemini", "sagittarius"]);
    }
}
