use crate::models::types::{AddressBytes, OutputIdBytes};

/// Indexed row for an alias output.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Alias {
    pub alias_id: Vec<u8>,
    pub output_id: OutputIdBytes,
    pub native_token_count: i32,
    pub state_controller: AddressBytes,
    pub governor: AddressBytes,
    pub issuer: Option<AddressBytes>,
    pub sender: Option<AddressBytes>,
    pub created_at: i64,
}
