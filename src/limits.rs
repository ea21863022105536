use crate::error::GrobError;

/// Bounds on what a BMP may ask the decoder to allocate.
///
/// Every bound is optional and unset by default. The decoder checks them
/// after the header is parsed and before the pixel buffer is reserved, so an
/// oversized image is rejected without touching its pixel data.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Limits {
    pub max_width: Option<u16>,
    pub max_height: Option<u16>,
    /// Maximum `width * height`.
    pub max_pixels: Option<u64>,
    /// Maximum size of the decoded pixel buffer, after padding removal and
    /// 24-bit widening.
    pub max_memory_bytes: Option<u64>,
}

impl Limits {
    /// Reject images wider than `width` or taller than `height`.
    pub fn with_max_dimensions(mut self, width: u16, height: u16) -> Self {
        self.max_width = Some(width);
        self.max_height = Some(height);
        self
    }

    pub fn with_max_pixels(mut self, max: u64) -> Self {
        self.max_pixels = Some(max);
        self
    }

    pub fn with_max_memory_bytes(mut self, max: u64) -> Self {
        self.max_memory_bytes = Some(max);
        self
    }

    /// Check image geometry.
    pub(crate) fn check(&self, width: u16, height: u16) -> Result<(), GrobError> {
        within("width", u64::from(width), self.max_width.map(u64::from))?;
        within("height", u64::from(height), self.max_height.map(u64::from))?;
        within(
            "pixel count",
            u64::from(width) * u64::from(height),
            self.max_pixels,
        )
    }

    /// Check the decoded buffer size.
    pub(crate) fn check_memory(&self, bytes: usize) -> Result<(), GrobError> {
        within("pixel buffer bytes", bytes as u64, self.max_memory_bytes)
    }
}

fn within(what: &str, value: u64, max: Option<u64>) -> Result<(), GrobError> {
    match max {
        Some(max) if value > max => Err(GrobError::LimitExceeded(format!(
            "{what} {value} exceeds limit {max}"
        ))),
        _ => Ok(()),
    }
}
