//! Display-column arithmetic for raw document bytes.
//!
//! Columns count terminal cells, not bytes: a tab rounds up to the next
//! multiple of [`TAB_WIDTH`], a UTF-8 continuation byte (top bits `10`)
//! occupies no cell of its own, and every other byte occupies one cell.

/// Tab stops are fixed at four cells.
pub const TAB_WIDTH: usize = 4;

/// True for UTF-8 continuation bytes (`0b10xx_xxxx`).
#[inline]
pub fn is_continuation(byte: u8) -> bool {
    byte & 0xC0 == 0x80
}

/// Column after placing `byte` at column `col`.
#[inline]
pub fn advance(col: usize, byte: u8) -> usize {
    if byte == b'\t' {
        (col / TAB_WIDTH + 1) * TAB_WIDTH
    } else if is_continuation(byte) {
        col
    } else {
        col + 1
    }
}

/// Display column at the end of `bytes`, scanned from a line start.
/// Callers guarantee the slice contains no newline.
pub fn scan(bytes: &[u8]) -> usize {
    bytes.iter().fold(0, |col, &b| advance(col, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_rounds_to_next_stop() {
        assert_eq!(advance(0, b'\t'), 4);
        assert_eq!(advance(3, b'\t'), 4);
        assert_eq!(advance(4, b'\t'), 8);
        assert_eq!(advance(5, b'\t'), 8);
    }

    #[test]
    fn continuation_bytes_are_zero_width() {
        // "é" is 0xC3 0xA9: one cell for the lead byte, none for the tail.
        assert_eq!(scan("é".as_bytes()), 1);
        assert_eq!(scan("aéb".as_bytes()), 3);
    }

    #[test]
    fn mixed_tabs_and_text() {
        assert_eq!(scan(b"ab\tc"), 5);
        assert_eq!(scan(b"\t\t"), 8);
        assert_eq!(scan(b""), 0);
    }
}
