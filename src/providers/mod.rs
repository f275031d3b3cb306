//! Remote AI Provider Integration Module
//!
//! The try-on pipeline talks to two kinds of remote provider, each behind a
//! capability trait so the engine can fall back to a local strategy.
//!
//! # Architecture
//!
//! ```text
//!   ┌────────────────────┐        ┌──────────────────┐
//!   │ SynthesisBackend   │        │ LanguageModel    │
//!   └─────────┬──────────┘        └────────┬─────────┘
//!             │                            │
//!   ┌─────────┴──────────┐        ┌────────┴─────────┐
//!   │ RemoteSynthesis    │        │ GeminiClient     │
//!   │ Client (IDM-VTON)  │        │                  │
//!   └────────────────────┘        └──────────────────┘
//! ```

pub mod traits;
pub mod http_client;
pub mod synthesis;
pub mod gemini;

// Re-export commonly used types
pub use traits::{
    LanguageModel,
    ProviderResult,
    SynthesisBackend,
};
pub use synthesis::RemoteSynthesisClient;
pub use gemini::GeminiClient;
