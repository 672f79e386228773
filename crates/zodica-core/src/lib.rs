//! Domain model for the zodica horoscope service
//!
//! Houses the zodiac sign and content-kind enums, the horoscope record
//! shape shared by the API and the cache, the quote-attribution allow-list,
//! and timezone-to-local-date resolution.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod authors;
pub mod error;
pub mod horoscope;
pub mod sign;
pub mod timezone;

pub use authors::{QUOTE_AUTHORS, match_quote_author};
pub use error::HttpError;
pub use horoscope::{Horoscope, HoroscopeKind};
pub use sign::Sign;
