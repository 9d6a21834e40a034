//! Base64 to hex decoder for password fields
//!
//! Passwords in a dump are stored as standard-alphabet base64, sometimes
//! with one or both `=` padding characters dropped. Downstream tools want
//! them as lowercase hex, so the decoder goes straight from base64 text to
//! hex digits without materializing the raw bytes.

use crate::error::Base64Error;

/// First byte covered by the decode table (`+`)
const TABLE_OFFSET: u8 = b'+';
/// Table covers `+` through `z`
const TABLE_LEN: usize = 80;

const INVALID: u8 = 0xff;
/// Reserved entry for `=`, only accepted as trailing padding
const PADDING: u8 = 0xfe;

const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

const fn build_decode_table() -> [u8; TABLE_LEN] {
    let mut table = [INVALID; TABLE_LEN];
    let mut i = 0;
    while i < ALPHABET.len() {
        table[(ALPHABET[i] - TABLE_OFFSET) as usize] = i as u8;
        i += 1;
    }
    table[(b'=' - TABLE_OFFSET) as usize] = PADDING;
    table
}

const DECODE_TABLE: [u8; TABLE_LEN] = build_decode_table();

/// Decode base64 `input` and append the result to `out` as lowercase hex.
///
/// Returns the number of hex characters appended (two per decoded byte).
/// On error `out` is restored to its previous length.
pub fn base64_to_hex(input: &[u8], out: &mut Vec<u8>) -> Result<usize, Base64Error> {
    let start = out.len();
    match decode_groups(input, out) {
        Ok(()) => Ok(out.len() - start),
        Err(err) => {
            out.truncate(start);
            Err(err)
        }
    }
}

/// Decode base64 `input` into a lowercase hex string
pub fn decode_to_hex(input: &[u8]) -> Result<String, Base64Error> {
    let mut out = Vec::with_capacity(input.len() / 4 * 6 + 4);
    base64_to_hex(input, &mut out)?;
    Ok(out.into_iter().map(char::from).collect())
}

/// Strip up to two trailing `=`
fn strip_padding(input: &[u8]) -> &[u8] {
    let mut data = input;
    for _ in 0..2 {
        match data.split_last() {
            Some((b'=', rest)) => data = rest,
            _ => break,
        }
    }
    data
}

fn sextet(byte: u8, position: usize) -> Result<u8, Base64Error> {
    let index = byte.wrapping_sub(TABLE_OFFSET) as usize;
    match DECODE_TABLE.get(index) {
        Some(&value) if value < 64 => Ok(value),
        _ => Err(Base64Error::InvalidByte { byte, position }),
    }
}

fn push_hex(out: &mut Vec<u8>, byte: u8) {
    out.push(HEX_DIGITS[(byte >> 4) as usize]);
    out.push(HEX_DIGITS[(byte & 0x0f) as usize]);
}

fn decode_groups(input: &[u8], out: &mut Vec<u8>) -> Result<(), Base64Error> {
    if input.is_empty() {
        return Ok(());
    }

    let data = strip_padding(input);
    if data.is_empty() {
        return Err(Base64Error::Empty);
    }
    if data.len() % 4 == 1 {
        return Err(Base64Error::InvalidLength { len: data.len() });
    }

    out.reserve(data.len() / 4 * 6 + 4);

    // The length check above guarantees every group has at least two bytes
    for (group_index, group) in data.chunks(4).enumerate() {
        let pos = group_index * 4;

        let c1 = sextet(group[0], pos)?;
        let c2 = sextet(group[1], pos + 1)?;
        push_hex(out, (c1 << 2) | (c2 >> 4));

        let Some(&b3) = group.get(2) else {
            if c2 & 0x0f != 0 {
                return Err(Base64Error::NonZeroPadding);
            }
            break;
        };
        let c3 = sextet(b3, pos + 2)?;
        push_hex(out, (c2 << 4) | (c3 >> 2));

        let Some(&b4) = group.get(3) else {
            if c3 & 0x03 != 0 {
                return Err(Base64Error::NonZeroPadding);
            }
            break;
        };
        let c4 = sextet(b4, pos + 3)?;
        push_hex(out, (c3 << 6) | c4);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;

    fn to_hex(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }

    #[test]
    fn test_decode_hello() {
        assert_eq!(decode_to_hex(b"aGVsbG8=").unwrap(), "68656c6c6f");
        assert_eq!(decode_to_hex(b"aGVsbG8").unwrap(), "68656c6c6f");
    }

    #[test]
    fn test_decode_matches_reference_encoder() {
        let padded = base64::engine::general_purpose::STANDARD;
        let unpadded = base64::engine::general_purpose::STANDARD_NO_PAD;

        for len in 0..48 {
            let raw: Vec<u8> = (0..len).map(|i| (i * 37 + len * 11) as u8 ^ 0xa5).collect();
            let expected = to_hex(&raw);

            let encoded = padded.encode(&raw);
            assert_eq!(decode_to_hex(encoded.as_bytes()).unwrap(), expected, "padded {}", encoded);

            let encoded = unpadded.encode(&raw);
            assert_eq!(decode_to_hex(encoded.as_bytes()).unwrap(), expected, "unpadded {}", encoded);
        }
    }

    #[test]
    fn test_decode_all_alphabet_bytes() {
        let raw: Vec<u8> = (0..=255u8).collect();
        let encoded = base64::engine::general_purpose::STANDARD.encode(&raw);
        assert!(encoded.contains('+'));
        assert!(encoded.contains('/'));
        assert_eq!(decode_to_hex(encoded.as_bytes()).unwrap(), to_hex(&raw));
    }

    #[test]
    fn test_hex_length_returned() {
        let mut out = b"prefix".to_vec();
        let n = base64_to_hex(b"EQ==", &mut out).unwrap();
        assert_eq!(n, 2);
        assert_eq!(out, b"prefix11");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(decode_to_hex(b"").unwrap(), "");
    }

    #[test]
    fn test_padding_only_fails() {
        assert_eq!(decode_to_hex(b"="), Err(Base64Error::Empty));
        assert_eq!(decode_to_hex(b"=="), Err(Base64Error::Empty));
    }

    #[test]
    fn test_invalid_length() {
        assert_eq!(decode_to_hex(b"a"), Err(Base64Error::InvalidLength { len: 1 }));
        assert_eq!(decode_to_hex(b"aGVsb"), Err(Base64Error::InvalidLength { len: 5 }));
        // Only two '=' are stripped
        assert_eq!(decode_to_hex(b"aGVs==="), Err(Base64Error::InvalidLength { len: 5 }));
    }

    #[test]
    fn test_invalid_bytes() {
        assert_eq!(
            decode_to_hex(b"aG-s"),
            Err(Base64Error::InvalidByte { byte: b'-', position: 2 })
        );
        // Below the table
        assert!(matches!(decode_to_hex(b"a Vs"), Err(Base64Error::InvalidByte { byte: b' ', .. })));
        // Above the table
        assert!(matches!(decode_to_hex(b"aG{s"), Err(Base64Error::InvalidByte { byte: b'{', .. })));
        // Non-ASCII
        assert!(matches!(decode_to_hex(&[b'a', 0xc3, b'V', b's']), Err(Base64Error::InvalidByte { .. })));
    }

    #[test]
    fn test_padding_mid_stream_fails() {
        assert_eq!(
            decode_to_hex(b"aG=sbG8="),
            Err(Base64Error::InvalidByte { byte: b'=', position: 2 })
        );
    }

    #[test]
    fn test_non_zero_padding_bits() {
        // "EQ" is 0x11 with zero low bits, "ER" sets one of the unused bits
        assert_eq!(decode_to_hex(b"EQ==").unwrap(), "11");
        assert_eq!(decode_to_hex(b"ER=="), Err(Base64Error::NonZeroPadding));
        // Three-character group: "aGU" is fine, "aGV" leaves bits behind
        assert_eq!(decode_to_hex(b"aGU=").unwrap(), "6865");
        assert_eq!(decode_to_hex(b"aGV="), Err(Base64Error::NonZeroPadding));
    }

    #[test]
    fn test_failure_leaves_buffer_untouched() {
        let mut out = b"keep".to_vec();
        assert!(base64_to_hex(b"aGVsbG8gd29ybGQ*", &mut out).is_err());
        assert_eq!(out, b"keep");
    }
}
