//! Codepoint constants and UTF-16 helpers

/// The largest valid codepoint.
pub const MAX_CODEPOINT: u32 = 0x10FFFF;

/// One past the largest codepoint; used as the sentinel in change-point tables.
pub const CODEPOINT_LIMIT: u32 = 0x110000;

/// Codepoint fields in packed entries keep the low 24 bits; the kind or
/// value lives in the high byte.
pub const CODEPOINT_MASK: u32 = 0x00FF_FFFF;

/// `true` if `cp` is in `[0, 0x110000)`.
#[inline]
pub const fn is_valid(cp: u32) -> bool {
    cp < CODEPOINT_LIMIT
}

/// The number of UTF-16 code units needed to encode `cp`.
#[inline]
pub const fn utf16_len(cp: u32) -> usize {
    if cp <= 0xFFFF {
        1
    } else {
        2
    }
}

/// Encode a sequence of codepoints as UTF-16 code units.
///
/// Codepoints above the BMP become surrogate pairs.
pub fn encode_utf16(codepoints: &[u32]) -> Vec<u16> {
    let mut out = Vec::with_capacity(codepoints.len());
    for &cp in codepoints {
        if cp <= 0xFFFF {
            out.push(cp as u16);
        } else {
            let ofs = cp - 0x10000;
            out.push(0xD800 | ((ofs >> 10) & 0x3FF) as u16);
            out.push(0xDC00 | (ofs & 0x3FF) as u16);
        }
    }
    out
}

/// Decode UTF-16 code units, stopping at the first NUL.
///
/// This is the inverse of [`encode_utf16`] for zero-padded or
/// zero-terminated data.
pub fn decode_utf16(units: &[u16]) -> Vec<u32> {
    let mut out = Vec::new();
    let mut iter = units.iter().copied();
    while let Some(cu0) = iter.next() {
        if cu0 == 0 {
            break;
        }
        if (0xD800..=0xDBFF).contains(&cu0) {
            let Some(cu1) = iter.next() else {
                break;
            };
            out.push(0x10000 + (((cu0 as u32 & 0x3FF) << 10) | (cu1 as u32 & 0x3FF)));
        } else {
            out.push(cu0 as u32);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bmp_and_supplementary() {
        let cps = [0x41, 0xFFFF, 0x10000, 0x1F600, 0x10FFFF];
        let units = encode_utf16(&cps);
        assert_eq!(
            units,
            [0x41, 0xFFFF, 0xD800, 0xDC00, 0xD83D, 0xDE00, 0xDBFF, 0xDFFF]
        );
        assert_eq!(decode_utf16(&units), cps);
    }

    #[test]
    fn decode_stops_at_nul() {
        assert_eq!(decode_utf16(&[0x53, 0x53, 0, 0]), [0x53, 0x53]);
        assert!(decode_utf16(&[]).is_empty());
    }

    #[test]
    fn lengths() {
        assert_eq!(utf16_len(0xFFFF), 1);
        assert_eq!(utf16_len(0x10000), 2);
        assert!(is_valid(MAX_CODEPOINT));
        assert!(!is_valid(CODEPOINT_LIMIT));
    }
}
