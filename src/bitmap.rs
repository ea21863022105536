use crate::list::ListFormat;
use crate::palette::ColorTable;

/// Bytes one row occupies in a [`Bitmap`] pixel buffer (no padding).
///
/// 24-bit rows are widened to 4 bytes per pixel on decode, so 24 and 32
/// share a row size. Returns `None` on overflow or for depths without a
/// pixel layout.
pub fn row_bytes(width: usize, bit_depth: u8) -> Option<usize> {
    match bit_depth {
        1 | 4 | 8 => width.checked_mul(usize::from(bit_depth))?.checked_add(7).map(|b| b / 8),
        16 => width.checked_mul(2),
        24 | 32 => width.checked_mul(4),
        _ => None,
    }
}

/// Exact pixel buffer length for the given geometry.
pub fn pixel_data_len(width: u16, height: u16, bit_depth: u8) -> Option<usize> {
    row_bytes(usize::from(width), bit_depth)?.checked_mul(usize::from(height))
}

/// A decoded image or an opaque byte blob.
///
/// Pixel rows are top-down and unpadded. `bit_depth == 0` marks a raw blob
/// with no geometry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    width: u16,
    height: u16,
    bit_depth: u8,
    palette: ColorTable,
    pixels: Vec<u8>,
}

impl Bitmap {
    /// Wrap decoded pixel rows.
    ///
    /// The buffer length is the one [`pixel_data_len`] derives; the decoder is
    /// the only producer.
    pub(crate) fn from_pixels(
        width: u16,
        height: u16,
        bit_depth: u8,
        palette: ColorTable,
        pixels: Vec<u8>,
    ) -> Self {
        debug_assert_eq!(
            Some(pixels.len()),
            pixel_data_len(width, height, bit_depth)
        );
        Self {
            width,
            height,
            bit_depth,
            palette,
            pixels,
        }
    }

    /// Treat `bytes` as an opaque blob.
    pub fn raw(bytes: Vec<u8>) -> Self {
        Self {
            width: 0,
            height: 0,
            bit_depth: 0,
            palette: ColorTable::new(),
            pixels: bytes,
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Bits per pixel as stored in the file; 0 for raw blobs.
    pub fn bit_depth(&self) -> u8 {
        self.bit_depth
    }

    pub fn palette(&self) -> &ColorTable {
        &self.palette
    }

    /// Replace the palette of an indexed image.
    pub fn set_palette(&mut self, palette: ColorTable) {
        self.palette = palette;
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Length of the pixel buffer, derived from the geometry.
    pub fn pixel_data_len(&self) -> usize {
        if self.is_raw() {
            return self.pixels.len();
        }
        pixel_data_len(self.width, self.height, self.bit_depth).unwrap_or(self.pixels.len())
    }

    pub fn is_raw(&self) -> bool {
        self.bit_depth == 0
    }

    /// Palette-index pixels (1, 4 or 8 bits).
    pub fn is_indexed(&self) -> bool {
        matches!(self.bit_depth, 1 | 4 | 8)
    }

    /// Direct-color pixels that map onto a graphics object.
    pub fn is_direct_color(&self) -> bool {
        matches!(self.bit_depth, 16 | 24 | 32)
    }

    /// How the pixel buffer is chunked when serialized.
    pub fn format(&self) -> ListFormat {
        ListFormat::for_bit_depth(self.bit_depth)
    }
}
