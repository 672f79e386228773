//! Prompt construction for horoscope generation

use jiff::civil::Date;
use zodica_core::{HoroscopeKind, QUOTE_AUTHORS, Sign};

/// Human wording for each content horizon
const fn horizon(kind: HoroscopeKind) -> &'static str {
    match kind {
        HoroscopeKind::Daily => "today",
        HoroscopeKind::Weekly => "this week",
        HoroscopeKind::Monthly => "this month",
    }
}

/// Build the generation prompt for one sign
///
/// Deterministic for a given `(sign, kind, date)` triple: the model sees
/// the same instructions on every retry, variation comes from sampling.
pub fn build_prompt(sign: Sign, kind: HoroscopeKind, date: Date) -> String {
    let authors = QUOTE_AUTHORS.join(", ");
    format!(
        "You are an astrologer writing a {kind} horoscope for {sign} for {horizon}, {date}.\n\
         Respond with a single JSON object and nothing else, using exactly these fields:\n\
         - \"message\": 2-3 sentences of warm, specific guidance for {sign}\n\
         - \"bestMatch\": a comma-separated list of 3 or 4 other zodiac signs (lowercase) \
           that pair well with {sign} {horizon}; never include {sign} itself\n\
         - \"inspirationalQuote\": a short quote, under 150 characters\n\
         - \"quoteAuthor\": who said it, chosen from: {authors}\n\
         - \"peacefulThought\": one calming sentence\n\
         - \"luckyNumber\": an integer from 1 to 99\n\
         - \"luckyColor\": a single color name",
        kind = kind.as_str(),
        sign = sign.as_str(),
        horizon = horizon(kind),
    )
}
