//! # grob
//!
//! Turns Windows BMP images and arbitrary binary files into HP Prime PPL
//! source: a `DIMGROB_P` call for direct-color images, a `LOCAL` list for
//! indexed images and raw data.
//!
//! ## Pipeline
//!
//! file bytes → [`bmp::decode`] (or [`Bitmap::raw`] when the magic bytes
//! don't match) → [`list::serialize`] → [`program::emit`] → [`output::save`].
//!
//! ## Supported input
//!
//! - Uncompressed BMP at 1, 4, 8, 16, 24 and 32 bits per pixel, top-down or
//!   bottom-up, with BITMAPINFOHEADER or any later info header.
//! - Anything else is emitted byte for byte.
//!
//! ## Non-Goals
//!
//! - RLE or other compressed BMPs
//! - Color space conversion
//!
//! ## Usage
//!
//! ```
//! use grob::{Bitmap, GrobError, ProgramOptions, bmp, program};
//!
//! let data: &[u8] = &[1, 2, 3, 4, 5, 6, 7, 8];
//! let bitmap = match bmp::decode(data) {
//!     Ok(bitmap) => bitmap,
//!     Err(GrobError::InvalidMagic) => Bitmap::raw(data.to_vec()),
//!     Err(e) => return Err(e),
//! };
//! let text = program::emit(&bitmap, &ProgramOptions::default().with_name("blob"))?;
//! assert_eq!(text, "LOCAL blob:={#0807060504030201:64h\n};\n");
//! # Ok::<(), GrobError>(())
//! ```

#![forbid(unsafe_code)]

mod bitmap;
mod error;
mod limits;

pub mod bmp;
pub mod endian;
pub mod list;
pub mod output;
pub mod palette;
pub mod program;

pub use bitmap::{Bitmap, pixel_data_len, row_bytes};
pub use error::GrobError;
pub use limits::Limits;
pub use list::{Alignment, ListFormat, ListOptions};
pub use palette::ColorTable;
pub use program::ProgramOptions;
pub use rgb::RGBA8;

/// Decode `data` as a BMP, or wrap it as a raw blob when it isn't one.
pub fn load(data: Vec<u8>) -> Result<Bitmap, GrobError> {
    load_with_limits(data, &Limits::default())
}

/// [`load`] with resource limits applied to BMP input.
///
/// Raw blobs are never limited; their size is the file size.
pub fn load_with_limits(data: Vec<u8>, limits: &Limits) -> Result<Bitmap, GrobError> {
    match bmp::decode_with_limits(&data, limits) {
        Err(GrobError::InvalidMagic) => {
            log::debug!("no BMP magic, treating {} bytes as raw data", data.len());
            Ok(Bitmap::raw(data))
        }
        other => other,
    }
}
