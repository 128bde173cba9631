/// The protocol caps the number of distinct native tokens a single output
/// can carry.
pub const MAX_NATIVE_TOKENS_PER_OUTPUT: u32 = 64;

/// Maximum length of a tag feature in bytes.
pub const MAX_TAG_LENGTH: usize = 64;

/// The subset of network protocol parameters the indexer cares about.
#[derive(Clone, Debug)]
pub struct ProtocolParameters {
    pub version: u8,
    pub network_name: String,
    pub bech32_hrp: String,
}
