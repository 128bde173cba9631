/// Raw binary form of a 34-byte output identifier.
pub type OutputIdBytes = Vec<u8>;

/// Raw binary form of a serialized 33-byte address.
pub type AddressBytes = Vec<u8>;
