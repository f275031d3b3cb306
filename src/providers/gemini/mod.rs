//! Gemini Provider Module
//!
//! Text generation used by the advice engine.
//!
//! API Documentation: https://ai.google.dev/api/generate-content

mod client;
mod models;

pub use client::GeminiClient;
