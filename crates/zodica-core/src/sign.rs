use serde::{Deserialize, Serialize};

/// The twelve zodiac signs, in calendar order
///
/// The lowercase name is the canonical identifier everywhere: URLs, cache
/// keys, and JSON payloads. Parsing is case-insensitive so `Aries` and
/// `ARIES` resolve to the same variant.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Sign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl Sign {
    /// Canonical lowercase identifier without allocating
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Aries => "aries",
            Self::Taurus => "taurus",
            Self::Gemini => "gemini",
            Self::Cancer => "cancer",
            Self::Leo => "leo",
            Self::Virgo => "virgo",
            Self::Libra => "libra",
            Self::Scorpio => "scorpio",
            Self::Sagittarius => "sagittarius",
            Self::Capricorn => "capricorn",
            Self::Aquarius => "aquarius",
            Self::Pisces => "pisces",
        }
    }

    /// The partner sign whose `bestMatch` list must always carry this one
    ///
    /// Libra and Aquarius are hand-paired regardless of what the generator
    /// produces; every other sign has no forced pairing.
    pub const fn forced_match(self) -> Option<Self> {
        match self {
            Self::Libra => Some(Self::Aquarius),
            Self::Aquarius => Some(Self::Libra),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn twelve_signs_in_calendar_order() {
        let all: Vec<Sign> = Sign::iter().collect();
        assert_eq!(all.len(), 12);
        assert_eq!(all.first(), Some(&Sign::Aries));
        assert_eq!(all.last(), Some(&Sign::Pisces));
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!(Sign::from_str("aries").unwrap(), Sign::Aries);
        assert_eq!(Sign::from_str("Aries").unwrap(), Sign::Aries);
        assert_eq!(Sign::from_str("SCORPIO").unwrap(), Sign::Scorpio);
    }

    #[test]
    fn rejects_unknown_sign() {
        assert!(Sign::from_str("ophiuchus").is_err());
        assert!(Sign::from_str("").is_err());
    }

    #[test]
    fn display_matches_canonical_identifier() {
        for sign in Sign::iter() {
            assert_eq!(sign.to_string(), sign.as_str());
        }
    }

    #[test]
    fn serializes_as_lowercase_string() {
        let json = serde_json::to_string(&Sign::Sagittarius).unwrap();
        assert_eq!(json, "\"sagittarius\"");
        let back: Sign = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Sign::Sagittarius);
    }

    #[test]
    fn forced_match_is_symmetric_and_exclusive() {
        assert_eq!(Sign::Libra.forced_match(), Some(Sign::Aquarius));
        assert_eq!(Sign::Aquarius.forced_match(), Some(Sign::Libra));
        for sign in Sign::iter().filter(|s| !matches!(s, Sign::Libra | Sign::Aquarius)) {
            assert_eq!(sign.forced_match(), None);
        }
    }
}
