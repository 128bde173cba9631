use thiserror::Error;

use utxo_indexer_database::models::alias::Alias;
use utxo_indexer_database::models::basic_output::BasicOutput;
use utxo_indexer_database::models::foundry::Foundry;
use utxo_indexer_database::models::nft::Nft;
use utxo_indexer_ledger::address::Address;
use utxo_indexer_ledger::ids::{AliasId, FoundryId, NftId, OutputId};
use utxo_indexer_ledger::output::{Feature, Output, UnlockCondition};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MappingError {
    #[error("unsupported output kind: {0}")]
    UnsupportedOutputKind(&'static str),
    #[error("{kind} output without {condition} unlock condition")]
    MissingUnlockCondition { kind: &'static str, condition: &'static str },
}

/// A projected row, tagged with the table it belongs to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputRow {
    Basic(BasicOutput),
    Nft(Nft),
    Alias(Alias),
    Foundry(Foundry),
}

#[derive(Default)]
struct ConditionColumns {
    address: Option<Vec<u8>>,
    storage_deposit_return: Option<i64>,
    storage_deposit_return_address: Option<Vec<u8>>,
    timelock_time: Option<i64>,
    expiration_time: Option<i64>,
    expiration_return_address: Option<Vec<u8>>,
    state_controller: Option<Vec<u8>>,
    governor: Option<Vec<u8>>,
    immutable_alias: Option<AliasId>,
}

#[derive(Default)]
struct FeatureColumns {
    sender: Option<Vec<u8>>,
    issuer: Option<Vec<u8>>,
    tag: Option<Vec<u8>>,
}

fn flatten_unlock_conditions(conditions: &[UnlockCondition]) -> ConditionColumns {
    let mut columns = ConditionColumns::default();
    for condition in conditions {
        match condition {
            UnlockCondition::Address(address) => columns.address = Some(address.to_vec()),
            UnlockCondition::StorageDepositReturn { return_address, amount } => {
                columns.storage_deposit_return = Some(*amount as i64);
                columns.storage_deposit_return_address = Some(return_address.to_vec());
            }
            UnlockCondition::Timelock { unix_time } => {
                columns.timelock_time = Some(i64::from(*unix_time));
            }
            UnlockCondition::Expiration { return_address, unix_time } => {
                columns.expiration_time = Some(i64::from(*unix_time));
                columns.expiration_return_address = Some(return_address.to_vec());
            }
            UnlockCondition::StateControllerAddress(address) => {
                columns.state_controller = Some(address.to_vec());
            }
            UnlockCondition::GovernorAddress(address) => {
                columns.governor = Some(address.to_vec());
            }
            UnlockCondition::ImmutableAliasAddress(Address::Alias(alias_id)) => {
                columns.immutable_alias = Some(*alias_id);
            }
            UnlockCondition::ImmutableAliasAddress(_) => {}
        }
    }
    columns
}

fn flatten_features(features: &[Feature]) -> FeatureColumns {
    let mut columns = FeatureColumns::default();
    for feature in features {
        match feature {
            Feature::Sender(address) => columns.sender = Some(address.to_vec()),
            Feature::Issuer(address) => columns.issuer = Some(address.to_vec()),
            Feature::Tag(tag) => columns.tag = Some(tag.clone()),
            Feature::Metadata(_) => {}
        }
    }
    columns
}

/// Projects a ledger output plus its booking timestamp into the row for its
/// table. Pure; treasury outputs are rejected, everything else maps to
/// exactly one row.
pub fn map_output(
    output_id: &OutputId,
    output: &Output,
    booked_at: u32,
) -> Result<OutputRow, MappingError> {
    match output {
        Output::Basic(basic) => {
            let conditions = flatten_unlock_conditions(&basic.unlock_conditions);
            let features = flatten_features(&basic.features);
            Ok(OutputRow::Basic(BasicOutput {
                output_id: output_id.to_vec(),
                native_token_count: basic.native_tokens.len() as i32,
                sender: features.sender,
                tag: features.tag,
                address: conditions.address.ok_or(MappingError::MissingUnlockCondition {
                    kind: "basic",
                    condition: "address",
                })?,
                storage_deposit_return: conditions.storage_deposit_return,
                storage_deposit_return_address: conditions.storage_deposit_return_address,
                timelock_time: conditions.timelock_time,
                expiration_time: conditions.expiration_time,
                expiration_return_address: conditions.expiration_return_address,
                created_at: i64::from(booked_at),
            }))
        }
        Output::Nft(nft) => {
            let conditions = flatten_unlock_conditions(&nft.unlock_conditions);
            let features = flatten_features(&nft.features);
            // A null id marks the minting output; the id is the hash of the
            // output id from then on.
            let nft_id =
                if nft.nft_id.is_null() { NftId::from_output_id(output_id) } else { nft.nft_id };
            Ok(OutputRow::Nft(Nft {
                nft_id: nft_id.to_vec(),
                output_id: output_id.to_vec(),
                native_token_count: nft.native_tokens.len() as i32,
                issuer: features.issuer,
                sender: features.sender,
                tag: features.tag,
                address: conditions.address.ok_or(MappingError::MissingUnlockCondition {
                    kind: "nft",
                    condition: "address",
                })?,
                storage_deposit_return: conditions.storage_deposit_return,
                storage_deposit_return_address: conditions.storage_deposit_return_address,
                timelock_time: conditions.timelock_time,
                expiration_time: conditions.expiration_time,
                expiration_return_address: conditions.expiration_return_address,
                created_at: i64::from(booked_at),
            }))
        }
        Output::Alias(alias) => {
            let conditions = flatten_unlock_conditions(&alias.unlock_conditions);
            let features = flatten_features(&alias.features);
            let alias_id = if alias.alias_id.is_null() {
                AliasId::from_output_id(output_id)
            } else {
                alias.alias_id
            };
            Ok(OutputRow::Alias(Alias {
                alias_id: alias_id.to_vec(),
                output_id: output_id.to_vec(),
                native_token_count: alias.native_tokens.len() as i32,
                state_controller: conditions.state_controller.ok_or(
                    MappingError::MissingUnlockCondition {
                        kind: "alias",
                        condition: "state controller address",
                    },
                )?,
                governor: conditions.governor.ok_or(MappingError::MissingUnlockCondition {
                    kind: "alias",
                    condition: "governor address",
                })?,
                issuer: features.issuer,
                sender: features.sender,
                created_at: i64::from(booked_at),
            }))
        }
        Output::Foundry(foundry) => {
            let conditions = flatten_unlock_conditions(&foundry.unlock_conditions);
            let alias_id =
                conditions.immutable_alias.ok_or(MappingError::MissingUnlockCondition {
                    kind: "foundry",
                    condition: "immutable alias address",
                })?;
            let foundry_id =
                FoundryId::build(&alias_id, foundry.serial_number, foundry.token_scheme.kind());
            Ok(OutputRow::Foundry(Foundry {
                foundry_id: foundry_id.to_vec(),
                output_id: output_id.to_vec(),
                native_token_count: foundry.native_tokens.len() as i32,
                alias_address: Address::Alias(alias_id).to_vec(),
                created_at: i64::from(booked_at),
            }))
        }
        Output::Treasury(_) => Err(MappingError::UnsupportedOutputKind(output.kind_name())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use utxo_indexer_ledger::ids::TokenId;
    use utxo_indexer_ledger::output::{
        AliasOutput, FoundryOutput, NativeToken, NftOutput, TokenScheme, TreasuryOutput,
    };

    fn output_id() -> OutputId {
        OutputId::from([0xAAu8; OutputId::LENGTH])
    }

    fn native_token() -> NativeToken {
        NativeToken { token_id: TokenId::from([1u8; TokenId::LENGTH]), amount: 10 }
    }

    #[test]
    fn basic_output_flattens_all_conditions() {
        let owner = Address::Ed25519([1u8; 32]);
        let return_address = Address::Ed25519([2u8; 32]);
        let sender = Address::Ed25519([3u8; 32]);
        let output = Output::Basic(utxo_indexer_ledger::output::BasicOutput {
            amount: 1_000_000,
            native_tokens: vec![native_token(), native_token()],
            unlock_conditions: vec![
                UnlockCondition::Address(owner),
                UnlockCondition::StorageDepositReturn { return_address, amount: 500 },
                UnlockCondition::Timelock { unix_time: 1000 },
                UnlockCondition::Expiration { return_address, unix_time: 2000 },
            ],
            features: vec![Feature::Sender(sender), Feature::Tag(b"tag".to_vec())],
        });
        let row = match map_output(&output_id(), &output, 1700000000).unwrap() {
            OutputRow::Basic(row) => row,
            row => panic!("wrong row kind: {row:?}"),
        };
        assert_eq!(row.output_id, output_id().to_vec());
        assert_eq!(row.native_token_count, 2);
        assert_eq!(row.address, owner.to_vec());
        assert_eq!(row.sender, Some(sender.to_vec()));
        assert_eq!(row.tag, Some(b"tag".to_vec()));
        assert_eq!(row.storage_deposit_return, Some(500));
        assert_eq!(row.storage_deposit_return_address, Some(return_address.to_vec()));
        assert_eq!(row.timelock_time, Some(1000));
        assert_eq!(row.expiration_time, Some(2000));
        assert_eq!(row.expiration_return_address, Some(return_address.to_vec()));
        assert_eq!(row.created_at, 1700000000);
    }

    #[test]
    fn basic_output_without_address_is_rejected() {
        let output = Output::Basic(utxo_indexer_ledger::output::BasicOutput {
            amount: 1,
            native_tokens: vec![],
            unlock_conditions: vec![],
            features: vec![],
        });
        assert_eq!(
            map_output(&output_id(), &output, 0),
            Err(MappingError::MissingUnlockCondition { kind: "basic", condition: "address" })
        );
    }

    #[test]
    fn minting_nft_resolves_null_id() {
        let output = Output::Nft(NftOutput {
            amount: 1,
            native_tokens: vec![],
            nft_id: NftId::null(),
            unlock_conditions: vec![UnlockCondition::Address(Address::Ed25519([9u8; 32]))],
            features: vec![Feature::Issuer(Address::Ed25519([8u8; 32]))],
        });
        let row = match map_output(&output_id(), &output, 5).unwrap() {
            OutputRow::Nft(row) => row,
            row => panic!("wrong row kind: {row:?}"),
        };
        assert_eq!(row.nft_id, NftId::from_output_id(&output_id()).to_vec());
        assert_eq!(row.issuer, Some(Address::Ed25519([8u8; 32]).to_vec()));
    }

    #[test]
    fn transferred_nft_keeps_its_id() {
        let nft_id = NftId::from([0x77u8; NftId::LENGTH]);
        let output = Output::Nft(NftOutput {
            amount: 1,
            native_tokens: vec![],
            nft_id,
            unlock_conditions: vec![UnlockCondition::Address(Address::Ed25519([9u8; 32]))],
            features: vec![],
        });
        let row = match map_output(&output_id(), &output, 5).unwrap() {
            OutputRow::Nft(row) => row,
            row => panic!("wrong row kind: {row:?}"),
        };
        assert_eq!(row.nft_id, nft_id.to_vec());
    }

    #[test]
    fn alias_output_maps_controllers() {
        let state_controller = Address::Ed25519([4u8; 32]);
        let governor = Address::Ed25519([5u8; 32]);
        let output = Output::Alias(AliasOutput {
            amount: 1,
            native_tokens: vec![native_token()],
            alias_id: AliasId::null(),
            state_index: 0,
            foundry_counter: 0,
            unlock_conditions: vec![
                UnlockCondition::StateControllerAddress(state_controller),
                UnlockCondition::GovernorAddress(governor),
            ],
            features: vec![],
        });
        let row = match map_output(&output_id(), &output, 7).unwrap() {
            OutputRow::Alias(row) => row,
            row => panic!("wrong row kind: {row:?}"),
        };
        assert_eq!(row.alias_id, AliasId::from_output_id(&output_id()).to_vec());
        assert_eq!(row.state_controller, state_controller.to_vec());
        assert_eq!(row.governor, governor.to_vec());
        assert_eq!(row.native_token_count, 1);
    }

    #[test]
    fn foundry_output_derives_its_id() {
        let alias_id = AliasId::from([0x21u8; AliasId::LENGTH]);
        let output = Output::Foundry(FoundryOutput {
            amount: 1,
            native_tokens: vec![],
            serial_number: 3,
            token_scheme: TokenScheme::Simple { minted: 0, melted: 0, maximum: 100 },
            unlock_conditions: vec![UnlockCondition::ImmutableAliasAddress(Address::Alias(
                alias_id,
            ))],
        });
        let row = match map_output(&output_id(), &output, 9).unwrap() {
            OutputRow::Foundry(row) => row,
            row => panic!("wrong row kind: {row:?}"),
        };
        assert_eq!(row.foundry_id, FoundryId::build(&alias_id, 3, 0).to_vec());
        assert_eq!(row.alias_address, Address::Alias(alias_id).to_vec());
    }

    #[test]
    fn treasury_output_is_rejected() {
        let output = Output::Treasury(TreasuryOutput { amount: 1 });
        assert_eq!(
            map_output(&output_id(), &output, 0),
            Err(MappingError::UnsupportedOutputKind("treasury"))
        );
    }
}
