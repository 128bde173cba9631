use crate::models::types::{AddressBytes, OutputIdBytes};

/// Indexed row for an nft output. The nft id is primary, the output id is
/// unique within the table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Nft {
    pub nft_id: Vec<u8>,
    pub output_id: OutputIdBytes,
    pub native_token_count: i32,
    pub issuer: Option<AddressBytes>,
    pub sender: Option<AddressBytes>,
    pub tag: Option<Vec<u8>>,
    pub address: AddressBytes,
    pub storage_deposit_return: Option<i64>,
    pub storage_deposit_return_address: Option<AddressBytes>,
    pub timelock_time: Option<i64>,
    pub expiration_time: Option<i64>,
    pub expiration_return_address: Option<AddressBytes>,
    pub created_at: i64,
}
