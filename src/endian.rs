//! Byte-order normalization for fixed-width integers.
//!
//! BMP headers and pixel words are little-endian, Adobe color tables are
//! big-endian. Every multi-byte field goes through [`to_host`] once, at the
//! point it leaves the file buffer, so no caller ever sees file byte order.

/// Byte order of a file field or of the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endian {
    Little,
    Big,
}

impl Endian {
    /// Byte order of the machine running this code.
    pub const NATIVE: Endian = if cfg!(target_endian = "big") {
        Endian::Big
    } else {
        Endian::Little
    };
}

/// Fixed-width integers whose byte order can be reversed.
pub trait Word: Copy {
    /// Width in bytes.
    const SIZE: usize;

    /// Reverse the byte order.
    fn swap(self) -> Self;

    /// Reinterpret exactly `SIZE` bytes in host order.
    ///
    /// Callers guarantee `bytes.len() == SIZE`.
    fn from_host_bytes(bytes: &[u8]) -> Self;
}

macro_rules! impl_word {
    ($($t:ty),*) => {$(
        impl Word for $t {
            const SIZE: usize = core::mem::size_of::<$t>();

            #[inline]
            fn swap(self) -> Self {
                self.swap_bytes()
            }

            #[inline]
            fn from_host_bytes(bytes: &[u8]) -> Self {
                let mut buf = [0u8; core::mem::size_of::<$t>()];
                buf.copy_from_slice(bytes);
                <$t>::from_ne_bytes(buf)
            }
        }
    )*};
}

impl_word!(u16, i16, u32, i32, u64, i64);

/// Reverse the byte order of `value`.
#[inline]
pub fn swap_bytes<T: Word>(value: T) -> T {
    value.swap()
}

/// Convert a value stored in `source` order into the order of `host`.
///
/// Exposed with an explicit host so both orderings can be exercised on
/// any machine; production code goes through [`to_host`].
#[inline]
pub fn normalize<T: Word>(value: T, source: Endian, host: Endian) -> T {
    if source == host { value } else { value.swap() }
}

/// Convert a value stored in `source` order into native order.
#[inline]
pub fn to_host<T: Word>(value: T, source: Endian) -> T {
    normalize(value, source, Endian::NATIVE)
}

/// Read a `T` from the first `T::SIZE` bytes of `bytes`, stored in `source` order.
///
/// Returns `None` when `bytes` is too short.
#[inline]
pub fn read<T: Word>(bytes: &[u8], source: Endian) -> Option<T> {
    let raw = bytes.get(..T::SIZE)?;
    Some(to_host(T::from_host_bytes(raw), source))
}
