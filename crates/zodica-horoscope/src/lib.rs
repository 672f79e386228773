//! Horoscope content generation and serving
//!
//! The heart of zodica: an OpenAI-compatible completion client behind a
//! trait, a single-shot generator with strict parse/validate/repair
//! handling, a batch coordinator that spreads quote attributions across
//! the twelve signs, and the request path that ties them to the cache.

#![allow(clippy::must_use_candidate)]

mod batch;
mod client;
mod error;
mod generator;
mod handler;
mod prompt;
mod service;
mod types;

pub use batch::BatchOutcome;
pub use client::{CompletionClient, OpenAiCompatClient};
pub use error::HoroscopeError;
pub use generator::Generator;
pub use handler::horoscope_router;
pub use service::{HoroscopeReply, HoroscopeService};
