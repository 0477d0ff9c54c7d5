//! Encoding detection and transcoding.
//!
//! Implements BOM sniffing per XML 1.0 Appendix F, bridging to
//! `encoding_rs` for character encoding conversion. Detection is
//! deliberately minimal: a BOM selects UTF-8 or UTF-16, anything else is
//! treated as UTF-8. Undecodable sequences are replaced rather than
//! rejected, in keeping with the crate's tolerance contract.

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};

/// Detects the encoding of an XML byte stream by inspecting the byte-order
/// mark. Returns the encoding and the number of BOM bytes to skip.
///
/// - `EF BB BF` → UTF-8
/// - `FE FF`    → UTF-16 BE
/// - `FF FE`    → UTF-16 LE
/// - no BOM     → UTF-8 (the XML default)
#[must_use]
pub fn detect_encoding(bytes: &[u8]) -> (&'static Encoding, usize) {
    if bytes.starts_with(&[0xEF, 0xBB, 0xBF]) {
        (UTF_8, 3)
    } else if bytes.starts_with(&[0xFE, 0xFF]) {
        (UTF_16BE, 2)
    } else if bytes.starts_with(&[0xFF, 0xFE]) {
        (UTF_16LE, 2)
    } else {
        (UTF_8, 0)
    }
}

/// Transcodes an XML byte stream to a UTF-8 string, sniffing the encoding
/// from the BOM. Malformed sequences decode to the replacement character.
#[must_use]
pub fn decode_to_utf8(bytes: &[u8]) -> String {
    let (encoding, bom_len) = detect_encoding(bytes);
    let (text, _) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
    text.into_owned()
}
