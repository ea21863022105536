//! Windows BMP decoder.
//!
//! Produces a [`Bitmap`] whose pixel buffer holds the file's pixels in
//! top-down row order with scanline padding removed. Palettes are read into a
//! [`crate::ColorTable`]; indexed pixels stay packed.

mod decode;
mod utils;

pub use decode::BmpHeader;

use crate::bitmap::Bitmap;
use crate::error::GrobError;
use crate::limits::Limits;

/// Decode a BMP file held in memory.
///
/// Returns [`GrobError::InvalidMagic`] for anything that is not a BMP so the
/// caller can fall back to raw handling.
pub fn decode(data: &[u8]) -> Result<Bitmap, GrobError> {
    decode::decode_bitmap(data, None)
}

/// Decode with resource limits checked before the pixel buffer is allocated.
pub fn decode_with_limits(data: &[u8], limits: &Limits) -> Result<Bitmap, GrobError> {
    decode::decode_bitmap(data, Some(limits))
}

/// Parse only the file and info headers.
pub fn probe(data: &[u8]) -> Result<BmpHeader, GrobError> {
    decode::parse_header(data)
}

/// Whether `data` starts with the BMP magic bytes.
pub fn is_bmp(data: &[u8]) -> bool {
    data.starts_with(b"BM")
}
