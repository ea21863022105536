//! In-memory BMP fixtures.

#![allow(dead_code)]

/// Builds uncompressed BMP files with a BITMAPINFOHEADER.
pub struct BmpBuilder {
    width: u32,
    height: u32,
    bits: u16,
    palette: Vec<[u8; 4]>,
    colors_used: u32,
    top_down: bool,
    declare_size: bool,
    pad_byte: u8,
}

impl BmpBuilder {
    pub fn new(width: u32, height: u32, bits: u16) -> Self {
        Self {
            width,
            height,
            bits,
            palette: Vec::new(),
            colors_used: 0,
            top_down: false,
            declare_size: true,
            pad_byte: 0xEE,
        }
    }

    /// Store rows top-down (negative height).
    pub fn top_down(mut self) -> Self {
        self.top_down = true;
        self
    }

    /// B,G,R,reserved quads.
    pub fn palette(mut self, entries: &[[u8; 4]]) -> Self {
        self.palette = entries.to_vec();
        self.colors_used = entries.len() as u32;
        self
    }

    /// Leave `biSizeImage` at zero.
    pub fn undeclared_size(mut self) -> Self {
        self.declare_size = false;
        self
    }

    pub fn stride(&self) -> usize {
        (self.width as usize * self.bits as usize).div_ceil(32) * 4
    }

    /// Encode `rows`, given top-down, each exactly
    /// `ceil(width * bits / 8)` bytes in file pixel format.
    pub fn encode(&self, rows: &[Vec<u8>]) -> Vec<u8> {
        assert_eq!(rows.len(), self.height as usize);
        let stride = self.stride();
        let data_offset = 54 + self.palette.len() * 4;
        let image_size = stride * rows.len();
        let file_size = data_offset + image_size;

        let mut out = Vec::with_capacity(file_size);
        // File header (14 bytes)
        out.extend_from_slice(b"BM");
        out.extend_from_slice(&(file_size as u32).to_le_bytes());
        out.extend_from_slice(&[0u8; 4]);
        out.extend_from_slice(&(data_offset as u32).to_le_bytes());

        // BITMAPINFOHEADER (40 bytes)
        let height = if self.top_down {
            -(self.height as i32)
        } else {
            self.height as i32
        };
        out.extend_from_slice(&40u32.to_le_bytes());
        out.extend_from_slice(&(self.width as i32).to_le_bytes());
        out.extend_from_slice(&height.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&self.bits.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        let declared = if self.declare_size { image_size as u32 } else { 0 };
        out.extend_from_slice(&declared.to_le_bytes());
        out.extend_from_slice(&2835u32.to_le_bytes());
        out.extend_from_slice(&2835u32.to_le_bytes());
        out.extend_from_slice(&self.colors_used.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());

        for quad in &self.palette {
            out.extend_from_slice(quad);
        }

        let ordered: Vec<&Vec<u8>> = if self.top_down {
            rows.iter().collect()
        } else {
            rows.iter().rev().collect()
        };
        for row in ordered {
            out.extend_from_slice(row);
            out.extend(std::iter::repeat_n(self.pad_byte, stride - row.len()));
        }
        out
    }
}

/// Pack 32-bit BGRA pixel values (`0xAARRGGBB`) into a file row.
pub fn row32(pixels: &[u32]) -> Vec<u8> {
    pixels.iter().flat_map(|p| p.to_le_bytes()).collect()
}

/// Pull the 64-bit words back out of a list literal.
pub fn parse_words(text: &str) -> Vec<u64> {
    let start = text.find('{').expect("no opening brace") + 1;
    let end = text.rfind('}').expect("no closing brace");
    text[start..end]
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| t.ends_with(":64h"))
        .map(|t| {
            let hex = t.trim_start_matches('#').trim_end_matches(":64h");
            assert_eq!(hex.len(), 16, "token {t} is not 16 hex digits");
            u64::from_str_radix(hex, 16).expect("bad hex token")
        })
        .collect()
}

/// Little-endian bytes of the words, i.e. the serialized buffer.
pub fn words_to_bytes(words: &[u64]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_le_bytes()).collect()
}

pub fn noise(len: usize, seed: u32) -> Vec<u8> {
    let mut state = seed | 1;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            state as u8
        })
        .collect()
}
