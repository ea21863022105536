//! Scanline geometry helpers.

/// Bytes per scanline in the file: `width * bits` rounded up to a 4-byte boundary.
pub(crate) fn padded_stride(width: usize, bits: u16) -> Option<usize> {
    width
        .checked_mul(usize::from(bits))?
        .checked_add(31)
        .map(|b| b / 32 * 4)
}

/// Widen a row of B,G,R triples to B,G,R,0xFF quads.
///
/// Appends `src.len() / 3 * 4` bytes to `out`.
pub(crate) fn widen_bgr(src: &[u8], out: &mut Vec<u8>) {
    for px in src.chunks_exact(3) {
        out.extend_from_slice(&[px[0], px[1], px[2], 0xFF]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stride_rounds_to_four() {
        assert_eq!(padded_stride(1, 24), Some(4));
        assert_eq!(padded_stride(3, 24), Some(12));
        assert_eq!(padded_stride(5, 8), Some(8));
        assert_eq!(padded_stride(9, 1), Some(4));
        assert_eq!(padded_stride(33, 1), Some(8));
        assert_eq!(padded_stride(3, 4), Some(4));
        assert_eq!(padded_stride(3, 16), Some(8));
        assert_eq!(padded_stride(usize::MAX, 32), None);
    }

    #[test]
    fn widen_adds_opaque_alpha() {
        let mut out = Vec::new();
        widen_bgr(&[1, 2, 3, 4, 5, 6], &mut out);
        assert_eq!(out, [1, 2, 3, 0xFF, 4, 5, 6, 0xFF]);
    }
}
