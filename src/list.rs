//! PPL list literals of 64-bit hex words.
//!
//! A buffer is cut into 8-byte chunks, each read as a little-endian `u64`
//! and written as `#XXXXXXXXXXXXXXXX:64h`. Tokens are comma separated and a
//! newline follows every `columns`-th token and the last one:
//!
//! ```text
//! {#0807060504030201:64h,#100F0E0D0C0B0A09:64h
//! }
//! ```

use crate::endian::{self, Endian, Word};
use crate::error::GrobError;

/// Tokens per line for raw blobs.
pub const DEFAULT_COLUMNS: usize = 8;

/// Longest list the calculator accepts; longer lists fail at runtime with
/// error 38 (insufficient memory).
pub const PPL_LIST_LIMIT: usize = 10_000;

const WORD_BYTES: usize = 8;

/// How a pixel buffer maps onto 64-bit words.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListFormat {
    /// Opaque bytes, including packed palette indices.
    Binary,
    /// 16-bit pixels, four per word.
    HighColor,
    /// 32-bit pixels (24-bit widened), two per word.
    TrueColor,
}

impl ListFormat {
    pub fn for_bit_depth(bit_depth: u8) -> Self {
        match bit_depth {
            16 => Self::HighColor,
            24 | 32 => Self::TrueColor,
            _ => Self::Binary,
        }
    }

    /// Pixels carried by one 64-bit token, `None` for binary data.
    pub fn pixels_per_word(self) -> Option<usize> {
        match self {
            Self::Binary => None,
            Self::HighColor => Some(4),
            Self::TrueColor => Some(2),
        }
    }

    /// Columns that put one pixel row on each line.
    pub fn columns_for_width(self, width: u16) -> usize {
        match self.pixels_per_word() {
            Some(per_word) => (usize::from(width) / per_word).max(1),
            None => DEFAULT_COLUMNS,
        }
    }
}

/// What to do with a trailing chunk shorter than 8 bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Alignment {
    /// Fill the last word with zero bytes.
    #[default]
    ZeroPad,
    /// Fail with [`GrobError::MisalignedInput`].
    Reject,
}

/// Serializer settings. Tokens are rendered identically for every
/// [`ListFormat`]; the format only picks `columns` for images, see
/// [`ListFormat::columns_for_width`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListOptions {
    pub columns: usize,
    pub alignment: Alignment,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
            alignment: Alignment::ZeroPad,
        }
    }
}

impl ListOptions {
    pub fn with_columns(mut self, columns: usize) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }
}

/// Read `bytes` as consecutive little-endian 64-bit words.
pub fn words(bytes: &[u8], alignment: Alignment) -> Result<Vec<u64>, GrobError> {
    let chunks = bytes.chunks_exact(WORD_BYTES);
    let tail = chunks.remainder();
    if !tail.is_empty() && alignment == Alignment::Reject {
        return Err(GrobError::MisalignedInput { len: bytes.len() });
    }

    let mut out = Vec::with_capacity(bytes.len().div_ceil(WORD_BYTES));
    out.extend(chunks.map(le_word));
    if !tail.is_empty() {
        let mut last = [0u8; WORD_BYTES];
        last[..tail.len()].copy_from_slice(tail);
        out.push(le_word(&last));
    }
    Ok(out)
}

fn le_word(chunk: &[u8]) -> u64 {
    endian::to_host(u64::from_host_bytes(chunk), Endian::Little)
}

/// Render one word as a PPL integer literal.
pub fn token(word: u64) -> String {
    format!("#{word:016X}:64h")
}

/// Tokens with separators and line breaks, without the enclosing braces.
///
/// The result is empty for empty input and otherwise ends with a newline.
pub fn serialize_body(bytes: &[u8], options: &ListOptions) -> Result<String, GrobError> {
    if options.columns == 0 {
        return Err(GrobError::ZeroColumns);
    }
    let words = words(bytes, options.alignment)?;
    if words.len() > PPL_LIST_LIMIT {
        log::warn!(
            "list has {} elements, the calculator only accepts {PPL_LIST_LIMIT}",
            words.len()
        );
    }
    log::debug!(
        "serializing {} bytes as {} words, {} per line",
        bytes.len(),
        words.len(),
        options.columns
    );

    // "#" + 16 digits + ":64h" + separator
    let mut out = String::with_capacity(words.len() * 22);
    let count = words.len();
    for (i, word) in words.into_iter().enumerate() {
        let n = i + 1;
        out.push_str(&token(word));
        if n < count {
            out.push(',');
        }
        if n % options.columns == 0 || n == count {
            out.push('\n');
        }
    }
    Ok(out)
}

/// The complete brace-delimited list literal.
pub fn serialize(bytes: &[u8], options: &ListOptions) -> Result<String, GrobError> {
    let body = serialize_body(bytes, options)?;
    let mut out = String::with_capacity(body.len() + 2);
    out.push('{');
    out.push_str(&body);
    out.push('}');
    Ok(out)
}
