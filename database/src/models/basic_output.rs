use crate::models::types::{AddressBytes, OutputIdBytes};

/// Indexed row for a basic output. Optional unlock-condition fields come in
/// pairs: the time and its return address are either both set or both absent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BasicOutput {
    pub output_id: OutputIdBytes,
    pub native_token_count: i32,
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
