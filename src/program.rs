//! Wraps a serialized list in a PPL statement.
//!
//! Direct-color images become a graphics object:
//!
//! ```text
//! DIMGROB_P(G1,2,2,{
//! #FF00FF00FFFF0000:64h,
//! #FFFFFFFFFF0000FF:64h
//! });
//! ```
//!
//! Indexed images become a local list that carries depth, size and palette
//! ahead of the packed indices, and anything else becomes a plain local list.

use rgb::RGBA8;

use crate::bitmap::Bitmap;
use crate::error::GrobError;
use crate::list::{self, Alignment, ListOptions};
use crate::palette::rgba_to_u32;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProgramOptions {
    /// Variable name for `LOCAL` framing.
    pub name: String,
    /// Graphics object slot, `G1`..`G9`.
    pub grob: u8,
    /// Wrap the program in `#PPL` / `#END`.
    pub pplus: bool,
    /// Tokens per line. `None` puts one pixel row per line for direct-color
    /// images and uses [`list::DEFAULT_COLUMNS`] otherwise.
    pub columns: Option<usize>,
    pub alignment: Alignment,
}

impl Default for ProgramOptions {
    fn default() -> Self {
        Self {
            name: "data".into(),
            grob: 1,
            pplus: false,
            columns: None,
            alignment: Alignment::ZeroPad,
        }
    }
}

impl ProgramOptions {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_grob(mut self, grob: u8) -> Self {
        self.grob = grob;
        self
    }

    pub fn with_pplus(mut self, pplus: bool) -> Self {
        self.pplus = pplus;
        self
    }

    pub fn with_columns(mut self, columns: usize) -> Self {
        self.columns = Some(columns);
        self
    }

    fn list_options(&self, bitmap: &Bitmap) -> ListOptions {
        let columns = match self.columns {
            Some(columns) => columns,
            None if bitmap.is_direct_color() => {
                bitmap.format().columns_for_width(bitmap.width())
            }
            None => list::DEFAULT_COLUMNS,
        };
        ListOptions::default()
            .with_columns(columns)
            .with_alignment(self.alignment)
    }
}

/// A palette entry as PPL expects it: `0xAARRGGBB` with alpha inverted,
/// so 0 is opaque.
pub fn ppl_color(color: RGBA8) -> u32 {
    let rgba = rgba_to_u32(color);
    ((255 - (rgba & 0xFF)) << 24) | (rgba >> 8)
}

/// Produce the PPL source for `bitmap`.
pub fn emit(bitmap: &Bitmap, options: &ProgramOptions) -> Result<String, GrobError> {
    let list_options = options.list_options(bitmap);
    let mut out = String::new();
    if options.pplus {
        out.push_str("#PPL\n");
    }

    if bitmap.is_direct_color() {
        if !(1..=9).contains(&options.grob) {
            return Err(GrobError::InvalidGrob(options.grob));
        }
        log::debug!("framing {}bpp image as DIMGROB_P", bitmap.bit_depth());
        let body = list::serialize_body(bitmap.pixels(), &list_options)?;
        out.push_str(&format!(
            "DIMGROB_P(G{},{},{},{{\n{body}}});\n",
            options.grob,
            bitmap.width(),
            bitmap.height()
        ));
    } else if bitmap.is_indexed() {
        log::debug!("framing {}bpp indexed image as LOCAL", bitmap.bit_depth());
        let palette = bitmap.palette();
        out.push_str(&format!(
            "LOCAL {}:={{\n{},{},{},{},\n",
            options.name,
            bitmap.bit_depth(),
            bitmap.width(),
            bitmap.height(),
            palette.len()
        ));
        for &color in palette.colors() {
            out.push_str(&format!("#{:08X}:32h,", ppl_color(color)));
        }
        out.push('\n');
        out.push_str(&list::serialize_body(bitmap.pixels(), &list_options)?);
        out.push_str("};\n");
    } else {
        let literal = list::serialize(bitmap.pixels(), &list_options)?;
        out.push_str(&format!("LOCAL {}:={literal};\n", options.name));
    }

    if options.pplus {
        out.push_str("#END\n");
    }
    Ok(out)
}
