//! Text encodings for saved programs.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use crate::error::GrobError;

/// Extension the calculator's connectivity kit expects for programs.
pub const PROGRAM_EXTENSION: &str = "hpprgm";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Encoding {
    /// BOM, then UTF-16 little-endian code units.
    Utf16Le,
    Utf8,
}

impl Encoding {
    /// UTF-16LE for `.hpprgm` files, UTF-8 for everything else.
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case(PROGRAM_EXTENSION) => Self::Utf16Le,
            _ => Self::Utf8,
        }
    }
}

/// Encode `text` for saving, dropping every carriage return.
pub fn encode(text: &str, encoding: Encoding) -> Vec<u8> {
    let text = text.chars().filter(|&c| c != '\r');
    match encoding {
        Encoding::Utf8 => text.collect::<String>().into_bytes(),
        Encoding::Utf16Le => {
            let mut out = vec![0xFF, 0xFE];
            let mut units = [0u16; 2];
            for c in text {
                for unit in c.encode_utf16(&mut units) {
                    out.extend_from_slice(&unit.to_le_bytes());
                }
            }
            out
        }
    }
}

/// Write `text` to `path` in the encoding its extension calls for.
///
/// The text goes to a sibling temporary file first, which is then renamed
/// over `path`. A failed save leaves an existing `path` untouched and no
/// temporary file behind.
pub fn save(path: &Path, text: &str) -> Result<(), GrobError> {
    let bytes = encode(text, Encoding::for_path(path));
    let staging = staging_path(path);
    let written = std::fs::write(&staging, &bytes).and_then(|()| std::fs::rename(&staging, path));
    if let Err(source) = written {
        let _ = std::fs::remove_file(&staging);
        return Err(GrobError::OutputWriteFailure {
            path: path.to_path_buf(),
            source,
        });
    }
    log::info!("wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

/// `dir/.name.grob-tmp` next to `path`.
fn staging_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(path.file_name().unwrap_or_else(|| OsStr::new("out")));
    name.push(".grob-tmp");
    path.with_file_name(name)
}
