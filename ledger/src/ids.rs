use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// Blake2b with a 256-bit digest, the protocol hash for natural-id derivation.
type Blake2b256 = Blake2b<U32>;

#[derive(Debug, Error)]
pub enum IdError {
    #[error("invalid id length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("invalid hex encoding: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

fn strip_hex_prefix(hex: &str) -> &str {
    hex.strip_prefix("0x").unwrap_or(hex)
}

/// Identifier of an output on the ledger: 32-byte transaction id plus a
/// 16-bit output index, 34 bytes in total.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct OutputId([u8; 34]);

impl OutputId {
    pub const LENGTH: usize = 34;

    pub fn as_bytes(&self) -> &[u8; Self::LENGTH] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, IdError> {
        bytes
            .try_into()
            .map(OutputId)
            .map_err(|_| IdError::InvalidLength { expected: Self::LENGTH, actual: bytes.len() })
    }

    pub fn from_hex(hex: &str) -> Result<Self, IdError> {
        Self::from_bytes(&hex::decode(strip_hex_prefix(hex))?)
    }
}

impl From<[u8; OutputId::LENGTH]> for OutputId {
    fn from(bytes: [u8; OutputId::LENGTH]) -> Self {
        OutputId(bytes)
    }
}

impl Display for OutputId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// Identifier of an alias. The null id marks an alias output in its very
/// first state transition; it resolves to the hash of the creating output id.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct AliasId([u8; 32]);

impl AliasId {
    pub const LENGTH: usize = 32;

    pub fn null() -> Self {
        Self::default()
    }

    pub fn is_null(&self) -> bool {
        self.0 == [0u8; Self::LENGTH]
    }

    pub fn from_output_id(output_id: &OutputId) -> Self {
        AliasId(Blake2b256::digest(output_id.as_bytes()).into())
    }

    pub fn as_bytes(&self) -> &[u8; Self::LENGTH] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, IdError> {
        bytes
            .try_into()
            .map(AliasId)
            .map_err(|_| IdError::InvalidLength { expected: Self::LENGTH, actual: bytes.len() })
    }

    pub fn from_hex(hex: &str) -> Result<Self, IdError> {
        Self::from_bytes(&hex::decode(strip_hex_prefix(hex))?)
    }
}

impl From<[u8; AliasId::LENGTH]> for AliasId {
    fn from(bytes: [u8; AliasId::LENGTH]) -> Self {
        AliasId(bytes)
    }
}

impl Display for AliasId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// Identifier of an NFT, hashed from the creating output id when minted.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct NftId([u8; 32]);

impl NftId {
    pub const LENGTH: usize = 32;

    pub fn null() -> Self {
        Self::default()
    }

    pub fn is_null(&self) -> bool {
        self.0 == [0u8; Self::LENGTH]
    }

    pub fn from_output_id(output_id: &OutputId) -> Self {
        NftId(Blake2b256::digest(output_id.as_bytes()).into())
    }

    pub fn as_bytes(&self) -> &[u8; Self::LENGTH] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, IdError> {
        bytes
            .try_into()
            .map(NftId)
            .map_err(|_| IdError::InvalidLength { expected: Self::LENGTH, actual: bytes.len() })
    }

    pub fn from_hex(hex: &str) -> Result<Self, IdError> {
        Self::from_bytes(&hex::decode(strip_hex_prefix(hex))?)
    }
}

impl From<[u8; NftId::LENGTH]> for NftId {
    fn from(bytes: [u8; NftId::LENGTH]) -> Self {
        NftId(bytes)
    }
}

impl Display for NftId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// Identifier of a foundry: the serialized controlling alias address, the
/// foundry serial number (little-endian) and the token-scheme kind.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct FoundryId([u8; 38]);

impl FoundryId {
    pub const LENGTH: usize = 38;

    pub fn build(alias_id: &AliasId, serial_number: u32, token_scheme_kind: u8) -> Self {
        let mut bytes = [0u8; Self::LENGTH];
        bytes[0] = crate::address::ALIAS_ADDRESS_KIND;
        bytes[1..33].copy_from_slice(alias_id.as_bytes());
        bytes[33..37].copy_from_slice(&serial_number.to_le_bytes());
        bytes[37] = token_scheme_kind;
        FoundryId(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; Self::LENGTH] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, IdError> {
        bytes
            .try_into()
            .map(FoundryId)
            .map_err(|_| IdError::InvalidLength { expected: Self::LENGTH, actual: bytes.len() })
    }

    pub fn from_hex(hex: &str) -> Result<Self, IdError> {
        Self::from_bytes(&hex::decode(strip_hex_prefix(hex))?)
    }
}

impl From<[u8; FoundryId::LENGTH]> for FoundryId {
    fn from(bytes: [u8; FoundryId::LENGTH]) -> Self {
        FoundryId(bytes)
    }
}

impl Display for FoundryId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// A native token is identified by the foundry that minted it.
pub type TokenId = FoundryId;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_id_hex_round_trip() {
        let id = OutputId::from([0xabu8; OutputId::LENGTH]);
        assert_eq!(id.to_hex().len(), 2 + 2 * OutputId::LENGTH);
        assert_eq!(OutputId::from_hex(&id.to_hex()).unwrap(), id);
    }

    #[test]
    fn output_id_rejects_wrong_length() {
        assert!(matches!(
            OutputId::from_bytes(&[0u8; 33]),
            Err(IdError::InvalidLength { expected: 34, actual: 33 })
        ));
    }

    #[test]
    fn null_ids_resolve_from_output_id() {
        let output_id = OutputId::from([7u8; OutputId::LENGTH]);
        assert!(NftId::null().is_null());
        let nft_id = NftId::from_output_id(&output_id);
        assert!(!nft_id.is_null());
        // Alias and nft ids share the derivation, so the digests agree.
        assert_eq!(nft_id.as_bytes(), AliasId::from_output_id(&output_id).as_bytes());
    }

    #[test]
    fn foundry_id_layout() {
        let alias_id = AliasId::from([0x11u8; AliasId::LENGTH]);
        let id = FoundryId::build(&alias_id, 0x01020304, 0);
        let bytes = id.as_bytes();
        assert_eq!(bytes[0], crate::address::ALIAS_ADDRESS_KIND);
        assert_eq!(&bytes[1..33], alias_id.as_bytes());
        assert_eq!(&bytes[33..37], &[0x04, 0x03, 0x02, 0x01]);
        assert_eq!(bytes[37], 0);
    }
}
