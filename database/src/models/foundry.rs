use crate::models::types::{AddressBytes, OutputIdBytes};

/// Indexed row for a foundry output.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Foundry {
    pub foundry_id: Vec<u8>,
    pub output_id: OutputIdBytes,
    pub native_token_count: i32,
    pub alias_address: AddressBytes,
    pub created_at: i64,
}
