use crate::ids::{AliasId, NftId};
use bech32::{FromBase32, ToBase32, Variant};
use std::fmt::{Display, Formatter};
use thiserror::Error;

pub const ED25519_ADDRESS_KIND: u8 = 0;
pub const ALIAS_ADDRESS_KIND: u8 = 8;
pub const NFT_ADDRESS_KIND: u8 = 16;

#[derive(Debug, Error)]
pub enum AddressError {
    #[error("invalid address length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("unknown address kind: {0}")]
    UnknownKind(u8),
    #[error("invalid bech32 encoding: {0}")]
    Bech32(#[from] bech32::Error),
}

/// An address on the ledger. The canonical binary form is a kind byte
/// followed by the 32-byte address body, 33 bytes in total.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Address {
    Ed25519([u8; 32]),
    Alias(AliasId),
    Nft(NftId),
}

impl Address {
    pub const SERIALIZED_LENGTH: usize = 33;

    pub fn kind(&self) -> u8 {
        match self {
            Address::Ed25519(_) => ED25519_ADDRESS_KIND,
            Address::Alias(_) => ALIAS_ADDRESS_KIND,
            Address::Nft(_) => NFT_ADDRESS_KIND,
        }
    }

    pub fn is_alias(&self) -> bool {
        matches!(self, Address::Alias(_))
    }

    /// Canonical binary serialization: kind byte plus the address body.
    pub fn serialized(&self) -> [u8; Self::SERIALIZED_LENGTH] {
        let mut bytes = [0u8; Self::SERIALIZED_LENGTH];
        bytes[0] = self.kind();
        match self {
            Address::Ed25519(body) => bytes[1..].copy_from_slice(body),
            Address::Alias(alias_id) => bytes[1..].copy_from_slice(alias_id.as_bytes()),
            Address::Nft(nft_id) => bytes[1..].copy_from_slice(nft_id.as_bytes()),
        }
        bytes
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.serialized().to_vec()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AddressError> {
        if bytes.len() != Self::SERIALIZED_LENGTH {
            return Err(AddressError::InvalidLength {
                expected: Self::SERIALIZED_LENGTH,
                actual: bytes.len(),
            });
        }
        let mut body = [0u8; 32];
        body.copy_from_slice(&bytes[1..]);
        match bytes[0] {
            ED25519_ADDRESS_KIND => Ok(Address::Ed25519(body)),
            ALIAS_ADDRESS_KIND => Ok(Address::Alias(body.into())),
            NFT_ADDRESS_KIND => Ok(Address::Nft(body.into())),
            kind => Err(AddressError::UnknownKind(kind)),
        }
    }

    pub fn to_bech32(&self, hrp: &str) -> Result<String, AddressError> {
        Ok(bech32::encode(hrp, self.serialized().to_base32(), Variant::Bech32)?)
    }

    /// Decodes a bech32 address, returning the human-readable part alongside
    /// so callers can check it against the configured network.
    pub fn from_bech32(encoded: &str) -> Result<(String, Self), AddressError> {
        let (hrp, data, _variant) = bech32::decode(encoded)?;
        let bytes = Vec::<u8>::from_base32(&data)?;
        Ok((hrp, Self::from_bytes(&bytes)?))
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode(self.serialized()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialized_form_round_trips() {
        let addresses = [
            Address::Ed25519([0x42u8; 32]),
            Address::Alias(AliasId::from([0x43u8; 32])),
            Address::Nft(NftId::from([0x44u8; 32])),
        ];
        for address in addresses {
            let bytes = address.serialized();
            assert_eq!(bytes.len(), Address::SERIALIZED_LENGTH);
            assert_eq!(bytes[0], address.kind());
            assert_eq!(Address::from_bytes(&bytes).unwrap(), address);
        }
    }

    #[test]
    fn rejects_unknown_kind() {
        let mut bytes = [0u8; Address::SERIALIZED_LENGTH];
        bytes[0] = 99;
        assert!(matches!(Address::from_bytes(&bytes), Err(AddressError::UnknownKind(99))));
    }

    #[test]
    fn bech32_round_trips_with_hrp() {
        let address = Address::Ed25519([7u8; 32]);
        let encoded = address.to_bech32("smr").unwrap();
        assert!(encoded.starts_with("smr1"));
        let (hrp, decoded) = Address::from_bech32(&encoded).unwrap();
        assert_eq!(hrp, "smr");
        assert_eq!(decoded, address);
    }
}
