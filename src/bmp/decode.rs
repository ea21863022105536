//! BMP header parsing and scanline extraction.
//!
//! Uncompressed (BI_RGB / BI_BITFIELDS) images at 1, 4, 8, 16, 24 and 32
//! bits per pixel. Pixels are copied out verbatim: no palette expansion and
//! no channel swizzle, only padding removal, row reordering and the 24 to
//! 32 bit widening.

use super::utils::{padded_stride, widen_bgr};
use crate::bitmap::{Bitmap, row_bytes};
use crate::endian::{self, Endian, Word};
use crate::error::GrobError;
use crate::limits::Limits;
use crate::palette::ColorTable;
use rgb::RGBA8;

/// BITMAPFILEHEADER (14) + BITMAPINFOHEADER (40).
pub(crate) const HEADER_LEN: usize = 54;
const FILE_HEADER_LEN: usize = 14;
const INFO_HEADER_LEN: u32 = 40;

const BI_RGB: u32 = 0;
const BI_BITFIELDS: u32 = 3;

// ── Cursor for reading from &[u8] ───────────────────────────────────

struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], GrobError> {
        let end = self.pos.checked_add(n).ok_or(GrobError::TruncatedFile {
            needed: usize::MAX,
            actual: self.data.len(),
        })?;
        let bytes = self.data.get(self.pos..end).ok_or(GrobError::TruncatedFile {
            needed: end,
            actual: self.data.len(),
        })?;
        self.pos = end;
        Ok(bytes)
    }

    fn le<T: Word>(&mut self) -> Result<T, GrobError> {
        let bytes = self.take(T::SIZE)?;
        Ok(endian::to_host(T::from_host_bytes(bytes), Endian::Little))
    }
}

// ── Header ──────────────────────────────────────────────────────────

/// File header and BITMAPINFOHEADER fields, in host byte order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BmpHeader {
    pub file_size: u32,
    pub reserved: u32,
    pub data_offset: u32,
    pub header_size: u32,
    pub width: i32,
    /// Negative means rows are stored top-down.
    pub height: i32,
    pub planes: u16,
    pub bit_count: u16,
    pub compression: u32,
    pub image_size: u32,
    pub x_pels_per_meter: i32,
    pub y_pels_per_meter: i32,
    pub colors_used: u32,
    pub colors_important: u32,
}

impl BmpHeader {
    pub fn top_down(&self) -> bool {
        self.height < 0
    }
}

/// Read the fixed 54-byte header.
///
/// Anything not starting with `BM` is [`GrobError::InvalidMagic`], including
/// inputs shorter than two bytes.
pub(crate) fn parse_header(data: &[u8]) -> Result<BmpHeader, GrobError> {
    if data.get(..2) != Some(b"BM".as_slice()) {
        return Err(GrobError::InvalidMagic);
    }
    if data.len() < HEADER_LEN {
        return Err(GrobError::TruncatedFile {
            needed: HEADER_LEN,
            actual: data.len(),
        });
    }

    let mut c = Cursor::new(data);
    c.take(2)?;
    Ok(BmpHeader {
        file_size: c.le()?,
        reserved: c.le()?,
        data_offset: c.le()?,
        header_size: c.le()?,
        width: c.le()?,
        height: c.le()?,
        planes: c.le()?,
        bit_count: c.le()?,
        compression: c.le()?,
        image_size: c.le()?,
        x_pels_per_meter: c.le()?,
        y_pels_per_meter: c.le()?,
        colors_used: c.le()?,
        colors_important: c.le()?,
    })
}

/// Checked geometry derived from a header.
struct Geometry {
    width: u16,
    height: u16,
    bit_depth: u8,
    /// Padded bytes per scanline in the file.
    stride: usize,
    /// Unpadded bytes per row in the output buffer.
    out_row: usize,
}

fn validate(header: &BmpHeader) -> Result<Geometry, GrobError> {
    if header.header_size < INFO_HEADER_LEN {
        return Err(GrobError::InvalidHeader(format!(
            "info header size {} is smaller than {INFO_HEADER_LEN}",
            header.header_size
        )));
    }
    if header.planes != 1 {
        return Err(GrobError::InvalidHeader(format!(
            "BMP planes field is {}, expected 1",
            header.planes
        )));
    }

    let width = header.width.unsigned_abs();
    let height = header.height.unsigned_abs();
    if width == 0 {
        return Err(GrobError::InvalidHeader("BMP width is zero".into()));
    }
    if height == 0 {
        return Err(GrobError::InvalidHeader("BMP height is zero".into()));
    }
    let too_large = GrobError::DimensionsTooLarge { width, height };
    let (Ok(w16), Ok(h16)) = (u16::try_from(width), u16::try_from(height)) else {
        return Err(too_large);
    };

    let bits = header.bit_count;
    let bit_depth = match bits {
        1 | 4 | 8 | 16 | 24 | 32 => bits as u8,
        other => return Err(GrobError::UnsupportedBitDepth(other)),
    };

    match (header.compression, bit_depth) {
        (BI_RGB, _) | (BI_BITFIELDS, 16 | 32) => {}
        (other, _) => return Err(GrobError::UnsupportedCompression(other)),
    }

    let stride = padded_stride(width as usize, bits).ok_or(GrobError::DimensionsTooLarge {
        width,
        height,
    })?;
    let out_row = row_bytes(width as usize, bit_depth).ok_or(GrobError::DimensionsTooLarge {
        width,
        height,
    })?;

    Ok(Geometry {
        width: w16,
        height: h16,
        bit_depth,
        stride,
        out_row,
    })
}

// ── Palette ─────────────────────────────────────────────────────────

/// Read the B,G,R,reserved quads that follow the info header.
///
/// The reserved byte is stored inverted as alpha, so a zero reserved byte
/// (the usual case) becomes an opaque entry.
fn read_palette(data: &[u8], header: &BmpHeader) -> Result<ColorTable, GrobError> {
    let max_colors = 1u32 << header.bit_count;
    let count = match header.colors_used {
        0 => max_colors,
        n if n <= max_colors => n,
        n => {
            return Err(GrobError::InvalidHeader(format!(
                "BMP palette count ({n}) exceeds max for {}-bit depth ({max_colors})",
                header.bit_count
            )));
        }
    };

    let palette_offset = usize::try_from(header.header_size)
        .ok()
        .and_then(|size| size.checked_add(FILE_HEADER_LEN))
        .ok_or(GrobError::TruncatedFile {
            needed: usize::MAX,
            actual: data.len(),
        })?;
    let mut c = Cursor::new(data);
    c.take(palette_offset)?;
    let quads = c.take(count as usize * 4)?;

    let mut table = ColorTable::new();
    for (index, quad) in quads.chunks_exact(4).enumerate() {
        let [b, g, r, reserved] = [quad[0], quad[1], quad[2], quad[3]];
        table.set_entry(index, RGBA8::new(r, g, b, 255 - reserved))?;
    }
    Ok(table)
}

// ── Pixels ──────────────────────────────────────────────────────────

/// Parse headers, palette and pixel rows into a [`Bitmap`].
pub(crate) fn decode_bitmap(data: &[u8], limits: Option<&Limits>) -> Result<Bitmap, GrobError> {
    let header = parse_header(data)?;
    let geo = validate(&header)?;
    log::debug!(
        "BMP {}x{} {}bpp, {}, compression {}, data at {}",
        geo.width,
        geo.height,
        geo.bit_depth,
        if header.top_down() { "top-down" } else { "bottom-up" },
        header.compression,
        header.data_offset
    );

    let rows = usize::from(geo.height);
    let total = geo.out_row * rows;
    if let Some(limits) = limits {
        limits.check(geo.width, geo.height)?;
        limits.check_memory(total)?;
    }

    let palette = if geo.bit_depth <= 8 {
        read_palette(data, &header)?
    } else {
        ColorTable::new()
    };

    let required = geo
        .stride
        .checked_mul(rows)
        .ok_or(GrobError::DimensionsTooLarge {
            width: u32::from(geo.width),
            height: u32::from(geo.height),
        })?;
    let declared = match header.image_size as usize {
        0 => required,
        n if n < required => {
            return Err(GrobError::InvalidHeader(format!(
                "BMP image data size ({n}) is smaller than {rows} rows of {} bytes",
                geo.stride
            )));
        }
        n => {
            if n > required {
                log::debug!("BMP declares {n} image bytes, using {required}");
            }
            n
        }
    };

    let mut c = Cursor::new(data);
    c.take(header.data_offset as usize)?;
    let image = c.take(declared)?;

    let mut pixels = Vec::new();
    pixels
        .try_reserve_exact(total)
        .map_err(|_| GrobError::AllocationFailure(total))?;

    for out_row in 0..rows {
        let src_row = if header.top_down() {
            out_row
        } else {
            rows - 1 - out_row
        };
        let line = &image[src_row * geo.stride..][..geo.stride];
        if geo.bit_depth == 24 {
            widen_bgr(&line[..usize::from(geo.width) * 3], &mut pixels);
        } else {
            pixels.extend_from_slice(&line[..geo.out_row]);
        }
    }

    Ok(Bitmap::from_pixels(
        geo.width,
        geo.height,
        geo.bit_depth,
        palette,
        pixels,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(width: i32, height: i32, bits: u16, image_size: u32) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(b"BM");
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&[0u8; 4]);
        out.extend_from_slice(&(HEADER_LEN as u32).to_le_bytes());
        out.extend_from_slice(&40u32.to_le_bytes());
        out.extend_from_slice(&width.to_le_bytes());
        out.extend_from_slice(&height.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&bits.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&image_size.to_le_bytes());
        out.extend_from_slice(&2835i32.to_le_bytes());
        out.extend_from_slice(&2835i32.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out
    }

    #[test]
    fn parses_every_field() {
        let data = header(3, -2, 32, 24);
        let h = parse_header(&data).unwrap();
        assert_eq!(h.data_offset, 54);
        assert_eq!(h.header_size, 40);
        assert_eq!(h.width, 3);
        assert_eq!(h.height, -2);
        assert!(h.top_down());
        assert_eq!(h.bit_count, 32);
        assert_eq!(h.image_size, 24);
        assert_eq!(h.x_pels_per_meter, 2835);
    }

    #[test]
    fn short_inputs_never_panic() {
        assert!(matches!(parse_header(b""), Err(GrobError::InvalidMagic)));
        assert!(matches!(parse_header(b"B"), Err(GrobError::InvalidMagic)));
        assert!(matches!(
            parse_header(b"BM\x00\x00"),
            Err(GrobError::TruncatedFile {
                needed: 54,
                actual: 4
            })
        ));
    }

    #[test]
    fn rejects_wrong_magic() {
        let mut data = header(1, 1, 32, 0);
        data[1] = b'A';
        assert!(matches!(parse_header(&data), Err(GrobError::InvalidMagic)));
    }

    #[test]
    fn rejects_unsupported_depth() {
        let data = header(1, 1, 2, 0);
        assert!(matches!(
            decode_bitmap(&data, None),
            Err(GrobError::UnsupportedBitDepth(2))
        ));
    }

    #[test]
    fn rejects_rle() {
        let mut data = header(1, 1, 8, 0);
        data[30..34].copy_from_slice(&1u32.to_le_bytes());
        assert!(matches!(
            decode_bitmap(&data, None),
            Err(GrobError::UnsupportedCompression(1))
        ));
    }

    #[test]
    fn rejects_oversized_width() {
        let data = header(70_000, 1, 32, 0);
        assert!(matches!(
            decode_bitmap(&data, None),
            Err(GrobError::DimensionsTooLarge { width: 70_000, .. })
        ));
    }

    #[test]
    fn missing_pixels_are_truncation() {
        let mut data = header(2, 2, 32, 0);
        data.extend_from_slice(&[0u8; 12]);
        assert!(matches!(
            decode_bitmap(&data, None),
            Err(GrobError::TruncatedFile {
                needed: 70,
                actual: 66
            })
        ));
    }

    #[test]
    fn declared_size_smaller_than_rows_is_invalid() {
        let mut data = header(2, 2, 32, 8);
        data.extend_from_slice(&[0u8; 16]);
        assert!(matches!(
            decode_bitmap(&data, None),
            Err(GrobError::InvalidHeader(_))
        ));
    }

    #[test]
    fn palette_count_above_depth_is_invalid() {
        let mut data = header(1, 1, 1, 0);
        data[46..50].copy_from_slice(&3u32.to_le_bytes());
        assert!(matches!(
            decode_bitmap(&data, None),
            Err(GrobError::InvalidHeader(_))
        ));
    }

    #[test]
    fn rejects_core_header() {
        let mut data = header(1, 1, 32, 0);
        data[14..18].copy_from_slice(&12u32.to_le_bytes());
        data.extend_from_slice(&[0u8; 4]);
        assert!(matches!(
            decode_bitmap(&data, None),
            Err(GrobError::InvalidHeader(msg)) if msg.contains("12")
        ));
    }

    #[test]
    fn rejects_two_planes() {
        let mut data = header(1, 1, 32, 0);
        data[26..28].copy_from_slice(&2u16.to_le_bytes());
        data.extend_from_slice(&[0u8; 4]);
        assert!(matches!(
            decode_bitmap(&data, None),
            Err(GrobError::InvalidHeader(msg)) if msg.contains("planes")
        ));
    }

    #[test]
    fn palette_follows_a_v5_header() {
        const V5_HEADER_LEN: u32 = 124;
        let mut data = header(2, 1, 8, 0);
        let data_offset = FILE_HEADER_LEN as u32 + V5_HEADER_LEN + 2 * 4;
        data[10..14].copy_from_slice(&data_offset.to_le_bytes());
        data[14..18].copy_from_slice(&V5_HEADER_LEN.to_le_bytes());
        data[46..50].copy_from_slice(&2u32.to_le_bytes());
        // masks, color space and ICC fields beyond BITMAPINFOHEADER
        data.extend_from_slice(&[0xAB; (V5_HEADER_LEN - INFO_HEADER_LEN) as usize]);
        data.extend_from_slice(&[0x10, 0x20, 0x30, 0x00, 0x40, 0x50, 0x60, 0x00]);
        data.extend_from_slice(&[0x01, 0x00, 0xEE, 0xEE]);
        assert_eq!(data.len(), data_offset as usize + 4);

        let bmp = decode_bitmap(&data, None).unwrap();
        assert_eq!(bmp.palette().len(), 2);
        assert_eq!(bmp.palette().entry(0), Some(RGBA8::new(0x30, 0x20, 0x10, 0xFF)));
        assert_eq!(bmp.palette().entry(1), Some(RGBA8::new(0x60, 0x50, 0x40, 0xFF)));
        assert_eq!(bmp.pixels(), &[0x01, 0x00]);
    }

    #[test]
    fn huge_header_size_is_truncation() {
        let mut data = header(1, 1, 8, 0);
        data[14..18].copy_from_slice(&u32::MAX.to_le_bytes());
        assert!(matches!(
            decode_bitmap(&data, None),
            Err(GrobError::TruncatedFile { .. })
        ));
    }
}
