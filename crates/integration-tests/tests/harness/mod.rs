//! Shared test harness: mock completion backend, config builder, server wrapper

#![allow(dead_code)]

pub mod config;
pub mod mock_llm;
pub mod server;
