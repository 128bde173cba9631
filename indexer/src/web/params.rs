use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::error::IndexerError;
use utxo_indexer_database::cursor::CURSOR_LENGTH;
use utxo_indexer_ledger::address::Address;
use utxo_indexer_ledger::protocol::{MAX_NATIVE_TOKENS_PER_OUTPUT, MAX_TAG_LENGTH};

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound,
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message).into_response(),
            ApiError::NotFound => {
                (StatusCode::NOT_FOUND, "record not found".to_string()).into_response()
            }
            ApiError::Internal(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
            }
        }
    }
}

impl From<IndexerError> for ApiError {
    fn from(error: IndexerError) -> Self {
        match &error {
            IndexerError::InvalidParameter(_) => ApiError::BadRequest(error.to_string()),
            _ => ApiError::Internal(error.to_string()),
        }
    }
}

/// Parses a bech32 address query parameter and checks it belongs to the
/// configured network.
pub(crate) fn parse_address(value: &str, hrp: &str) -> Result<Address, ApiError> {
    let (parsed_hrp, address) = Address::from_bech32(value)
        .map_err(|e| ApiError::BadRequest(format!("invalid address '{value}': {e}")))?;
    if parsed_hrp != hrp {
        return Err(ApiError::BadRequest(format!(
            "invalid address '{value}': wrong network prefix '{parsed_hrp}'"
        )));
    }
    Ok(address)
}

pub(crate) fn parse_tag(value: &str) -> Result<Vec<u8>, ApiError> {
    let tag = hex::decode(value.strip_prefix("0x").unwrap_or(value))
        .map_err(|_| ApiError::BadRequest(format!("invalid tag '{value}': expected hex")))?;
    if tag.is_empty() || tag.len() > MAX_TAG_LENGTH {
        return Err(ApiError::BadRequest(format!("invalid tag '{value}': wrong length")));
    }
    Ok(tag)
}

pub(crate) fn check_token_count(value: u32) -> Result<u32, ApiError> {
    if value > MAX_NATIVE_TOKENS_PER_OUTPUT {
        return Err(ApiError::BadRequest(format!(
            "invalid native token count {value}, maximum is {MAX_NATIVE_TOKENS_PER_OUTPUT}"
        )));
    }
    Ok(value)
}

/// Splits a `cursor.pageSize` query parameter on the final dot. The first
/// component must be the 76-character cursor, the second a decimal page
/// size, which is clamped to the configured maximum.
pub(crate) fn parse_cursor(value: &str, max_page_size: u32) -> Result<(String, u32), ApiError> {
    let invalid = || ApiError::BadRequest(format!("query parameter cursor '{value}' has wrong format"));
    let (cursor, page_size) = value.rsplit_once('.').ok_or_else(&invalid)?;
    if cursor.len() != CURSOR_LENGTH {
        return Err(invalid());
    }
    let page_size: u32 = page_size.parse().map_err(|_| invalid())?;
    Ok((cursor.to_string(), page_size.min(max_page_size)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor() -> String {
        format!("{:08x}{}", 1u32, "ab".repeat(34))
    }

    #[test]
    fn cursor_with_page_size_parses_and_clamps() {
        let value = format!("{}.100", cursor());
        assert!(matches!(parse_cursor(&value, 1000), Ok((c, 100)) if c == cursor()));
        let value = format!("{}.5000", cursor());
        assert!(matches!(parse_cursor(&value, 1000), Ok((_, 1000))));
    }

    #[test]
    fn cursor_without_page_size_is_rejected() {
        assert!(matches!(parse_cursor(&cursor(), 1000), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn cursor_with_wrong_length_is_rejected() {
        let value = format!("{}.100", &cursor()[1..]);
        assert!(matches!(parse_cursor(&value, 1000), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn cursor_with_non_numeric_page_size_is_rejected() {
        let value = format!("{}.ten", cursor());
        assert!(matches!(parse_cursor(&value, 1000), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn tag_accepts_prefixed_hex() {
        assert_eq!(parse_tag("0xabcd").unwrap(), vec![0xab, 0xcd]);
        assert!(matches!(parse_tag("zz"), Err(ApiError::BadRequest(_))));
        assert!(matches!(parse_tag(""), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn token_count_is_bounded() {
        assert_eq!(check_token_count(64).unwrap(), 64);
        assert!(matches!(check_token_count(65), Err(ApiError::BadRequest(_))));
    }
}
