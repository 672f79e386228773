/// Quote attribution allow-list
///
/// Every served quote is credited to one of these voices. The generator
/// repairs anything else to an allow-listed author, so downstream display
/// code can rely on the exact spellings here.
pub const QUOTE_AUTHORS: [&str; 14] = [
    "Marcus Aurelius",
    "Seneca",
    "Epictetus",
    "Confucius",
    "Lao Tzu",
    "Socrates",
    "Plato",
    "Aristotle",
    "Rumi",
    "Buddha",
    "Heraclitus",
    "Pythagoras",
    "Cicero",
    "Epicurus",
];

/// Match a raw attribution against the allow-list
///
/// Case-insensitive substring match in either direction, so "emperor
/// marcus aurelius" and "MARCUS AURELIUS" both canonicalize to
/// "Marcus Aurelius". Returns `None` for blank or unrecognized input;
/// callers then pick a random allow-listed author instead.
pub fn match_quote_author(raw: &str) -> Option<&'static str> {
    let needle = raw.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    QUOTE_AUTHORS.iter().copied().find(|author| {
        let canonical = author.to_lowercase();
        canonical.contains(&needle) || needle.contains(&canonical)
    })
}
