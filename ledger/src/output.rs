use crate::address::Address;
use crate::ids::{AliasId, NftId, TokenId};

/// A quantity of a token minted by a foundry, carried alongside the base
/// currency of an output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NativeToken {
    pub token_id: TokenId,
    pub amount: u128,
}

/// A predicate that must hold before an output can be spent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UnlockCondition {
    Address(Address),
    StorageDepositReturn { return_address: Address, amount: u64 },
    Timelock { unix_time: u32 },
    Expiration { return_address: Address, unix_time: u32 },
    StateControllerAddress(Address),
    GovernorAddress(Address),
    ImmutableAliasAddress(Address),
}

/// Metadata attached to an output. Immutable features are folded into the
/// same list; the distinction does not matter for indexing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Feature {
    Sender(Address),
    Issuer(Address),
    Tag(Vec<u8>),
    Metadata(Vec<u8>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenScheme {
    Simple { minted: u128, melted: u128, maximum: u128 },
}

impl TokenScheme {
    pub fn kind(&self) -> u8 {
        match self {
            TokenScheme::Simple { .. } => 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BasicOutput {
    pub amount: u64,
    pub native_tokens: Vec<NativeToken>,
    pub unlock_conditions: Vec<UnlockCondition>,
    pub features: Vec<Feature>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AliasOutput {
    pub amount: u64,
    pub native_tokens: Vec<NativeToken>,
    /// Null while the alias output sits in its very first state transition.
    pub alias_id: AliasId,
    pub state_index: u32,
    pub foundry_counter: u32,
    pub unlock_conditions: Vec<UnlockCondition>,
    pub features: Vec<Feature>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NftOutput {
    pub amount: u64,
    pub native_tokens: Vec<NativeToken>,
    /// Null while the nft output sits in the transaction that minted it.
    pub nft_id: NftId,
    pub unlock_conditions: Vec<UnlockCondition>,
    pub features: Vec<Feature>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FoundryOutput {
    pub amount: u64,
    pub native_tokens: Vec<NativeToken>,
    pub serial_number: u32,
    pub token_scheme: TokenScheme,
    pub unlock_conditions: Vec<UnlockCondition>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreasuryOutput {
    pub amount: u64,
}

/// The closed family of output kinds found on the ledger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Output {
    Basic(BasicOutput),
    Alias(AliasOutput),
    Nft(NftOutput),
    Foundry(FoundryOutput),
    Treasury(TreasuryOutput),
}

impl Output {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Output::Basic(_) => "basic",
            Output::Alias(_) => "alias",
            Output::Nft(_) => "nft",
            Output::Foundry(_) => "foundry",
            Output::Treasury(_) => "treasury",
        }
    }
}
