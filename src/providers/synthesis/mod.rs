//! Remote Synthesis Provider Module
//!
//! Integration with the hosted virtual try-on model (IDM-VTON on a
//! Hugging Face Space) that composites a garment onto a person image.

mod client;
mod models;
mod shapes;

pub use client::RemoteSynthesisClient;
