//! Indexed color table of up to 256 RGBA entries.
//!
//! Colors are held as [`RGBA8`] in canonical R,G,B,A order; file byte order
//! only matters inside [`ColorTable::from_act_bytes`].

use std::path::Path;

use rgb::RGBA8;

use crate::endian::{self, Endian, Word};
use crate::error::GrobError;

/// Maximum number of entries in a color table.
pub const MAX_COLORS: usize = 256;

/// Fill value for slots skipped by [`ColorTable::set_entry`].
pub const OPAQUE_WHITE: RGBA8 = RGBA8::new(0xFF, 0xFF, 0xFF, 0xFF);

const EMPTY: RGBA8 = RGBA8::new(0, 0, 0, 0);

/// Size of an Adobe color table (`.act`): 256 RGB triples, then the
/// big-endian `defined` and `transparency` counts.
const ACT_LEN: usize = MAX_COLORS * 3 + 4;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorTable {
    colors: [RGBA8; MAX_COLORS],
    defined: usize,
    transparency: i16,
}

impl Default for ColorTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorTable {
    /// An empty table.
    pub fn new() -> Self {
        Self {
            colors: [EMPTY; MAX_COLORS],
            defined: 0,
            transparency: -1,
        }
    }

    /// Load an Adobe color table file.
    ///
    /// Short or malformed files are rejected as a whole; nothing partially
    /// read is ever returned.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, GrobError> {
        let bytes = std::fs::read(path.as_ref())?;
        let table = Self::from_act_bytes(&bytes)?;
        log::debug!(
            "loaded {} colors from {}",
            table.len(),
            path.as_ref().display()
        );
        Ok(table)
    }

    /// Parse the fixed 772-byte Adobe color table layout.
    pub fn from_act_bytes(bytes: &[u8]) -> Result<Self, GrobError> {
        if bytes.len() < ACT_LEN {
            return Err(GrobError::TruncatedFile {
                needed: ACT_LEN,
                actual: bytes.len(),
            });
        }
        let trailer_field = |at: usize| {
            let at = MAX_COLORS * 3 + at;
            endian::to_host(i16::from_host_bytes(&bytes[at..at + 2]), Endian::Big)
        };
        let defined = trailer_field(0);
        let transparency = trailer_field(2);

        let defined = usize::try_from(defined)
            .ok()
            .filter(|&d| d <= MAX_COLORS)
            .ok_or_else(|| {
                GrobError::InvalidHeader(format!("color table defines {defined} colors"))
            })?;

        let mut table = Self::new();
        for (slot, rgb) in table
            .colors
            .iter_mut()
            .zip(bytes.chunks_exact(3))
            .take(defined)
        {
            *slot = RGBA8::new(rgb[0], rgb[1], rgb[2], 0xFF);
        }
        table.defined = defined;
        table.transparency = transparency;
        Ok(table)
    }

    /// Number of populated entries.
    pub fn len(&self) -> usize {
        self.defined
    }

    pub fn is_empty(&self) -> bool {
        self.defined == 0
    }

    /// Populated entries, in index order.
    pub fn colors(&self) -> &[RGBA8] {
        &self.colors[..self.defined]
    }

    /// Entry at `index`, if populated.
    pub fn entry(&self, index: usize) -> Option<RGBA8> {
        self.colors().get(index).copied()
    }

    /// Transparent index as stored in the table file; `-1` when none.
    pub fn transparency(&self) -> i16 {
        self.transparency
    }

    /// Store `color` at `index`.
    ///
    /// Writing past the populated range fills the skipped slots with
    /// [`OPAQUE_WHITE`] and grows the table to `index + 1`.
    pub fn set_entry(&mut self, index: usize, color: RGBA8) -> Result<(), GrobError> {
        if index >= MAX_COLORS {
            return Err(GrobError::IndexOutOfRange(index));
        }
        self.colors[index] = color;
        if index < self.defined {
            return Ok(());
        }
        self.colors[self.defined..index].fill(OPAQUE_WHITE);
        self.defined = index + 1;
        Ok(())
    }

    /// Remove the entry at `index`, shifting later entries down by one.
    ///
    /// The table always shrinks by one entry unless it is already empty. An
    /// `index` past the populated range shifts nothing and drops the last
    /// entry.
    pub fn remove_entry(&mut self, index: usize) -> Result<(), GrobError> {
        if index >= MAX_COLORS {
            return Err(GrobError::IndexOutOfRange(index));
        }
        if self.defined == 0 {
            return Ok(());
        }
        if index < self.defined {
            self.colors.copy_within(index + 1..self.defined, index);
        }
        self.defined -= 1;
        self.colors[self.defined] = EMPTY;
        Ok(())
    }
}

/// Pack a color as `0xRRGGBBAA`.
pub fn rgba_to_u32(color: RGBA8) -> u32 {
    u32::from_be_bytes([color.r, color.g, color.b, color.a])
}
