//! Wire codec for images
//!
//! Images travel as base64 strings, optionally behind a data-URI prefix.
//! Decoding normalizes every input to 8-bit RGB; encoding always produces
//! raw base64 PNG without a prefix, so callers add their own and never end
//! up with a doubled one.

use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD};
use base64::Engine;
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder, RgbImage};
use thiserror::Error;
use tracing::debug;

/// Marker that precedes the payload in a data URI
const BASE64_MARKER: &str = "base64,";

/// Image codec errors
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("No image data")]
    Empty,
    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("Failed to decode image: {0}")]
    Image(#[from] image::ImageError),
    #[error("Image has zero size ({width}x{height})")]
    ZeroSized { width: u32, height: u32 },
}

/// Pixel channel ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelOrder {
    Rgb,
    Bgr,
}

/// Ordering every internal operation assumes
pub const CANONICAL_ORDER: ChannelOrder = ChannelOrder::Rgb;

/// Decoded image in canonical channel order (8-bit RGB, no alpha)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pixels: RgbImage,
}

impl PixelBuffer {
    pub const CHANNELS: u8 = 3;

    /// Wrap an RGB image
    pub fn from_rgb(pixels: RgbImage) -> Self {
        PixelBuffer { pixels }
    }

    /// Build from interleaved 8-bit samples in the given order
    ///
    /// Returns `None` when `data` does not hold exactly `width * height * 3`
    /// samples.
    pub fn from_raw(width: u32, height: u32, mut data: Vec<u8>, order: ChannelOrder) -> Option<Self> {
        if order == ChannelOrder::Bgr {
            for px in data.chunks_exact_mut(3) {
                px.swap(0, 2);
            }
        }
        RgbImage::from_raw(width, height, data).map(Self::from_rgb)
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn channels(&self) -> u8 {
        Self::CHANNELS
    }

    pub fn channel_order(&self) -> ChannelOrder {
        CANONICAL_ORDER
    }

    pub fn pixels(&self) -> &RgbImage {
        &self.pixels
    }
}

/// Strip a data-URI prefix if present, returning the bare payload
pub fn strip_data_uri(value: &str) -> &str {
    let value = value.trim();
    match value.find(BASE64_MARKER) {
        Some(idx) => &value[idx + BASE64_MARKER.len()..],
        None => value,
    }
}

/// Prefix a raw base64 PNG payload for providers that want data URIs
pub fn to_data_uri(raw: &str) -> String {
    format!("data:image/png;base64,{}", raw)
}

/// Decode a wire value (raw or data-URI base64) into a pixel buffer
pub fn decode(wire: &str) -> Result<PixelBuffer, CodecError> {
    let payload: String = strip_data_uri(wire)
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    if payload.is_empty() {
        return Err(CodecError::Empty);
    }

    let bytes = match STANDARD.decode(&payload) {
        Ok(bytes) => bytes,
        Err(_) => STANDARD_NO_PAD.decode(payload.trim_end_matches('='))?,
    };

    let image = image::load_from_memory(&bytes)?;
    let (width, height) = (image.width(), image.height());
    if width == 0 || height == 0 {
        return Err(CodecError::ZeroSized { width, height });
    }

    debug!(
        width = width,
        height = height,
        source_color = ?image.color(),
        "Decoded image to canonical RGB"
    );

    Ok(PixelBuffer::from_rgb(image.to_rgb8()))
}

/// Encode a pixel buffer as raw base64 PNG (no data-URI prefix)
pub fn encode(buffer: &PixelBuffer) -> Result<String, CodecError> {
    let png = encode_png(buffer)?;
    Ok(STANDARD.encode(png))
}

/// Encode to PNG bytes; lossless so a decode/encode round trip is stable
fn encode_png(buffer: &PixelBuffer) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::new();
    let (width, height) = buffer.dimensions();
    PngEncoder::new(&mut out).write_image(
        buffer.pixels().as_raw(),
        width,
        height,
        ColorType::Rgb8,
    )?;
    Ok(out)
}
