//! OSC 52 clipboard escape sequences.
//!
//! Copy pushes the yanked bytes into the system clipboard through the
//! terminal; the request sequence asks the terminal to send the clipboard
//! back (terminals that honor it deliver the content as a paste).

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Sequence that sets the system clipboard to `bytes`.
pub fn copy_sequence(bytes: &[u8]) -> String {
    let encoded = STANDARD.encode(bytes);
    format!("\x1b]52;c;{encoded}\x1b\\")
}

/// Sequence that queries the system clipboard.
pub fn request_sequence() -> &'static str {
    "\x1b]52;c;?\x1b\\"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_encodes_base64() {
        assert_eq!(copy_sequence(b"hi"), "\x1b]52;c;aGk=\x1b\\");
    }

    #[test]
    fn copy_of_nothing_is_still_well_formed() {
        assert_eq!(copy_sequence(b""), "\x1b]52;c;\x1b\\");
    }

    #[test]
    fn request_targets_the_c_selection() {
        assert!(request_sequence().starts_with("\x1b]52;c;?"));
    }
}
