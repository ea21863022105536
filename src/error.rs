use std::path::PathBuf;

/// Errors from BMP decoding, list serialization and program emission.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum GrobError {
    #[error("file '{}' not found", .0.display())]
    FileNotFound(PathBuf),

    /// Not a BMP. The pipeline treats this as "raw blob", not as a failure.
    #[error("missing BM magic bytes")]
    InvalidMagic,

    #[error("invalid header: {0}")]
    InvalidHeader(String),

    #[error("truncated file: need {needed} bytes, got {actual}")]
    TruncatedFile { needed: usize, actual: usize },

    #[error("unsupported bit depth: {0}")]
    UnsupportedBitDepth(u16),

    #[error("unsupported BMP compression scheme: {0}")]
    UnsupportedCompression(u32),

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("input length {len} is not a multiple of 8 bytes")]
    MisalignedInput { len: usize },

    #[error("column count must be at least 1")]
    ZeroColumns,

    #[error("color table index {0} out of range 0..=255")]
    IndexOutOfRange(usize),

    #[error("graphic object G{0} out of range G1..G9")]
    InvalidGrob(u8),

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("failed to allocate {0} bytes")]
    AllocationFailure(usize),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to write '{}': {source}", path.display())]
    OutputWriteFailure {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl GrobError {
    /// Process exit status for this error.
    ///
    /// Input problems exit with 1, output problems with 2, everything that
    /// went wrong in between with 3.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::FileNotFound(_) | Self::Io(_) => 1,
            Self::OutputWriteFailure { .. } => 2,
            _ => 3,
        }
    }
}
