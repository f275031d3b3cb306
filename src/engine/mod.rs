//! Try-on engine
//!
//! This module contains the core try-on logic including:
//! - Image wire codec (base64 / data-URI <-> pixel buffers)
//! - Request normalization with lenient optional fields
//! - Remote composition with local blend fallback
//! - Styling advice and response assembly

pub mod codec;
pub mod normalizer;
pub mod blend;
pub mod compositor;
pub mod advice;
pub mod assembler;
pub mod pipeline;

pub use codec::{CodecError, PixelBuffer};
pub use assembler::TryOnResponse;
pub use pipeline::TryOnPipeline;
