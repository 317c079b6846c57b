//! Byte-array externalization for the encrypted payload (§4.8): uppercase
//! hex by default, base64 as the accepted alternative. Both the `hex` and
//! `base64` crates decode to exactly `len(input)/2` (hex) or the implied
//! byte count (base64) — unlike a big-integer conversion, there is no sign
//! byte to strip, so leading zero bytes round-trip by construction as long
//! as the crate's plain byte-oriented decode functions are used rather than
//! anything that interprets the payload numerically.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use crate::error::CoreError;

/// The wire encoding used for an encrypted payload's bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    #[default]
    Hex,
    Base64,
}

pub fn encode(bytes: &[u8], encoding: Encoding) -> String {
    match encoding {
        Encoding::Hex => hex::encode_upper(bytes),
        Encoding::Base64 => BASE64.encode(bytes),
    }
}

pub fn decode(text: &str, encoding: Encoding, row_id: &str) -> Result<Vec<u8>, CoreError> {
    let decode_error = |reason: String| CoreError::EncodingError { row_id: row_id.to_string(), reason };
    match encoding {
        Encoding::Hex => hex::decode(text).map_err(|err| decode_error(err.to_string())),
        Encoding::Base64 => BASE64.decode(text).map_err(|err| decode_error(err.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip_preserves_leading_zero_bytes() {
        let bytes = [0u8, 0u8, 1u8, 255u8];
        let encoded = encode(&bytes, Encoding::Hex);
        assert_eq!(encoded, "000001FF");
        let decoded = decode(&encoded, Encoding::Hex, "row-1").unwrap();
        assert_eq!(decoded, bytes);
        assert_eq!(decoded.len(), encoded.len() / 2);
    }

    #[test]
    fn base64_round_trips() {
        let bytes = [0u8, 0u8, 9u8, 200u8];
        let encoded = encode(&bytes, Encoding::Base64);
        let decoded = decode(&encoded, Encoding::Base64, "row-1").unwrap();
        assert_eq!(decoded, bytes);
    }

    #[test]
    fn invalid_hex_is_an_encoding_error() {
        let result = decode("not-hex!!", Encoding::Hex, "row-2");
        assert!(matches!(result, Err(CoreError::EncodingError { row_id, .. }) if row_id == "row-2"));
    }
}
