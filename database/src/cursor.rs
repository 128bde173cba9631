use thiserror::Error;
use utxo_indexer_ledger::ids::OutputId;

/// Length of a pagination cursor: 8 hex digits of unix-second `created_at`
/// followed by the 68 hex digits of the output id.
pub const CURSOR_LENGTH: usize = 76;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CursorError {
    #[error("invalid cursor length: {0}")]
    InvalidLength(usize),
    #[error("invalid cursor encoding")]
    InvalidEncoding,
}

/// Encodes a `(created_at, output_id)` pair into the externally visible
/// lower-case cursor form. Lexicographic order of encoded cursors matches
/// the order of the underlying pairs.
pub fn encode_cursor(created_at: u32, output_id: &[u8; OutputId::LENGTH]) -> String {
    format!("{:08x}{}", created_at, hex::encode(output_id))
}

/// Decodes a cursor back into its `(created_at, output_id)` pair. Accepts
/// either case.
pub fn decode_cursor(cursor: &str) -> Result<(u32, [u8; OutputId::LENGTH]), CursorError> {
    if cursor.len() != CURSOR_LENGTH {
        return Err(CursorError::InvalidLength(cursor.len()));
    }
    let created_at =
        u32::from_str_radix(&cursor[..8], 16).map_err(|_| CursorError::InvalidEncoding)?;
    let bytes = hex::decode(&cursor[8..]).map_err(|_| CursorError::InvalidEncoding)?;
    let output_id = bytes.try_into().map_err(|_| CursorError::InvalidEncoding)?;
    Ok((created_at, output_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_is_76_lowercase_hex() {
        let cursor = encode_cursor(1700000000, &[0xAAu8; OutputId::LENGTH]);
        assert_eq!(cursor.len(), CURSOR_LENGTH);
        assert!(cursor.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert!(cursor.starts_with("6553f100"));
    }

    #[test]
    fn decode_inverts_encode() {
        let output_id = {
            let mut id = [0u8; OutputId::LENGTH];
            for (i, b) in id.iter_mut().enumerate() {
                *b = i as u8;
            }
            id
        };
        let cursor = encode_cursor(42, &output_id);
        assert_eq!(decode_cursor(&cursor).unwrap(), (42, output_id));
        assert_eq!(decode_cursor(&cursor.to_uppercase()).unwrap(), (42, output_id));
    }

    #[test]
    fn decode_rejects_bad_input() {
        assert_eq!(decode_cursor("abc"), Err(CursorError::InvalidLength(3)));
        let mut cursor = encode_cursor(1, &[0u8; OutputId::LENGTH]);
        cursor.replace_range(0..1, "x");
        assert_eq!(decode_cursor(&cursor), Err(CursorError::InvalidEncoding));
    }

    #[test]
    fn encoding_preserves_pair_order() {
        let pairs = [
            (1u32, [0u8; OutputId::LENGTH]),
            (1, [1u8; OutputId::LENGTH]),
            (2, [0u8; OutputId::LENGTH]),
            (0x10000, [0xFFu8; OutputId::LENGTH]),
            (u32::MAX, [0u8; OutputId::LENGTH]),
        ];
        for a in &pairs {
            for b in &pairs {
                let lhs = encode_cursor(a.0, &a.1);
                let rhs = encode_cursor(b.0, &b.1);
                assert_eq!(lhs.cmp(&rhs), a.cmp(b), "{lhs} vs {rhs}");
            }
        }
    }
}
