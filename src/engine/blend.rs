//! Local blend fallback
//!
//! Used when the synthesis provider cannot produce a result. The clothing
//! image is stretched to the person image's exact size (aspect ratio is not
//! preserved) and alpha-blended on top with a fixed weight.

use image::imageops::{self, FilterType};
use rayon::prelude::*;

use super::codec::{PixelBuffer, CANONICAL_ORDER};

/// Weight of the clothing image in the blend; the person gets the rest
pub const CLOTHING_WEIGHT: f32 = 0.7;

/// Blend `clothing` over `person`
///
/// Pure and deterministic: the same inputs always produce byte-identical
/// output. The result has the person image's dimensions.
pub fn blend(person: &PixelBuffer, clothing: &PixelBuffer) -> PixelBuffer {
    let (width, height) = person.dimensions();

    let resized;
    let clothing_pixels = if clothing.dimensions() == (width, height) {
        clothing.pixels()
    } else {
        resized = imageops::resize(clothing.pixels(), width, height, FilterType::Lanczos3);
        &resized
    };

    let row_len = width as usize * PixelBuffer::CHANNELS as usize;
    let person_weight = 1.0 - CLOTHING_WEIGHT;
    let mut out = vec![0u8; row_len * height as usize];

    // Rows are independent, process them in parallel
    out.par_chunks_mut(row_len)
        .zip(person.pixels().as_raw().par_chunks(row_len))
        .zip(clothing_pixels.as_raw().par_chunks(row_len))
        .for_each(|((dst, base), overlay)| {
            for ((d, &p), &c) in dst.iter_mut().zip(base).zip(overlay) {
                let mixed = p as f32 * person_weight + c as f32 * CLOTHING_WEIGHT;
                *d = mixed.round().clamp(0.0, 255.0) as u8;
            }
        });

    // Sizes match by construction
    PixelBuffer::from_raw(width, height, out, CANONICAL_ORDER)
        .unwrap_or_else(|| person.clone())
}
