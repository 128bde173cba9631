use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::{sleep, timeout};

use utxo_indexer::error::IndexerError;
use utxo_indexer::import::ImportConfig;
use utxo_indexer::indexer::Indexer;
use utxo_indexer::query::basic::BasicOutputFilter;
use utxo_indexer::query::foundry::FoundryFilter;
use utxo_indexer::query::nft::NftFilter;
use utxo_indexer_database::client::IndexerDbClient;
use utxo_indexer_database::cursor::encode_cursor;
use utxo_indexer_database::models::basic_output::BasicOutput as BasicOutputRow;
use utxo_indexer_database::models::nft::Nft as NftRow;
use utxo_indexer_database::models::status::Status;
use utxo_indexer_ledger::address::Address;
use utxo_indexer_ledger::ids::{AliasId, FoundryId, NftId, OutputId};
use utxo_indexer_ledger::output::{
    AliasOutput, BasicOutput, Feature, FoundryOutput, NativeToken, NftOutput, Output, TokenScheme,
    UnlockCondition,
};
use utxo_indexer_ledger::protocol::ProtocolParameters;

async fn setup() -> (IndexerDbClient, Indexer) {
    let database = IndexerDbClient::new_with_args("sqlite::memory:", 1)
        .await
        .expect("sqlite connection failed");
    database.create_schema().await.expect("schema failed");
    database.init_status("testnet-1").await.expect("status init failed");
    (database.clone(), Indexer::new(database))
}

fn protocol_params() -> ProtocolParameters {
    ProtocolParameters { version: 2, network_name: "testnet-1".to_string(), bech32_hrp: "rms".to_string() }
}

fn output_id(n: u8) -> OutputId {
    OutputId::from([n; OutputId::LENGTH])
}

fn numbered_output_id(n: u32) -> OutputId {
    let mut bytes = [0u8; OutputId::LENGTH];
    bytes[..4].copy_from_slice(&n.to_be_bytes());
    OutputId::from(bytes)
}

fn basic_row(created_at: i64, id: &OutputId) -> BasicOutputRow {
    BasicOutputRow {
        output_id: id.to_vec(),
        address: Address::Ed25519([0u8; 32]).to_vec(),
        created_at,
        ..Default::default()
    }
}

fn owned_basic_output() -> Output {
    Output::Basic(BasicOutput {
        amount: 1_000_000,
        native_tokens: vec![],
        unlock_conditions: vec![UnlockCondition::Address(Address::Ed25519([1u8; 32]))],
        features: vec![],
    })
}

#[tokio::test]
async fn nft_lookup_by_id_after_finalize() {
    let (_database, indexer) = setup().await;
    let run = Arc::new(AtomicBool::new(true));
    let import = indexer.import_transaction(run, &ImportConfig::default());

    let nft = Output::Nft(NftOutput {
        amount: 1,
        native_tokens: vec![],
        nft_id: NftId::from([0x01u8; NftId::LENGTH]),
        unlock_conditions: vec![UnlockCondition::Address(Address::Ed25519([9u8; 32]))],
        features: vec![],
    });
    import.add_output(&output_id(0xAA), &nft, 1700000000).await.unwrap();
    import.finalize(42, &protocol_params(), 1).await.unwrap();

    let result = indexer.nft_output(&NftId::from([0x01u8; NftId::LENGTH])).await.unwrap();
    assert_eq!(result.output_ids, vec![output_id(0xAA)]);
    assert_eq!(result.ledger_index, 42);
    assert_eq!(result.page_size, 0);
    assert!(result.cursor.is_none());
}

#[tokio::test]
async fn unknown_nft_id_yields_empty_result() {
    let (database, indexer) = setup().await;
    database
        .upsert_status(&Status {
            ledger_index: 3,
            protocol_version: 2,
            network_name: "testnet-1".to_string(),
            database_version: 1,
        })
        .await
        .unwrap();
    let result = indexer.nft_output(&NftId::from([0xEEu8; NftId::LENGTH])).await.unwrap();
    assert!(result.output_ids.is_empty());
    assert_eq!(result.ledger_index, 3);
}

#[tokio::test]
async fn pagination_resumes_inclusively_from_the_last_returned_row() {
    let (database, indexer) = setup().await;
    let (a, b, c) = (output_id(0x0A), output_id(0x0B), output_id(0x0C));
    database
        .insert_basic_outputs(&[basic_row(1, &a), basic_row(1, &b), basic_row(2, &c)])
        .await
        .unwrap();
    database
        .upsert_status(&Status {
            ledger_index: 42,
            protocol_version: 2,
            network_name: "testnet-1".to_string(),
            database_version: 1,
        })
        .await
        .unwrap();

    let mut filter = BasicOutputFilter { page_size: 2, ..Default::default() };
    let first = indexer.basic_outputs_with_filters(&filter).await.unwrap();
    assert_eq!(first.output_ids, vec![a, b]);
    assert_eq!(first.ledger_index, 42);
    // The cursor names the last returned row; the inclusive comparison shows
    // it again at the top of the next page.
    let cursor = first.cursor.clone().expect("expected a next cursor");
    assert_eq!(cursor, encode_cursor(1, b.as_bytes()));

    filter.cursor = Some(cursor);
    let second = indexer.basic_outputs_with_filters(&filter).await.unwrap();
    assert_eq!(second.output_ids, vec![b, c]);
    assert!(second.cursor.is_none());
}

#[tokio::test]
async fn pages_concatenate_to_the_unpaginated_result() {
    let (database, indexer) = setup().await;
    let mut rows = vec![];
    for n in 0..25u32 {
        // Bunch the timestamps so several rows share one created_at.
        rows.push(basic_row(i64::from(n / 4), &numbered_output_id(n)));
    }
    database.insert_basic_outputs(&rows).await.unwrap();
    database
        .upsert_status(&Status {
            ledger_index: 1,
            protocol_version: 2,
            network_name: "testnet-1".to_string(),
            database_version: 1,
        })
        .await
        .unwrap();

    let unpaginated =
        indexer.basic_outputs_with_filters(&BasicOutputFilter::default()).await.unwrap();
    assert_eq!(unpaginated.output_ids.len(), 25);

    let mut filter = BasicOutputFilter { page_size: 4, ..Default::default() };
    let mut collected: Vec<OutputId> = vec![];
    loop {
        let page = indexer.basic_outputs_with_filters(&filter).await.unwrap();
        // The cursor row repeats at the top of every follow-up page.
        let skip = usize::from(filter.cursor.is_some());
        if skip == 1 {
            assert_eq!(page.output_ids.first(), collected.last());
        }
        collected.extend(page.output_ids.into_iter().skip(skip));
        match page.cursor {
            Some(cursor) => filter.cursor = Some(cursor),
            None => break,
        }
    }
    assert_eq!(collected, unpaginated.output_ids);
}

#[tokio::test]
async fn nft_filters_are_conjoined() {
    let (database, indexer) = setup().await;
    let issuer = Address::Ed25519([7u8; 32]);
    let other_issuer = Address::Ed25519([8u8; 32]);
    let expiring = |n: u8, expiration: Option<i64>, issuer: &Address| NftRow {
        nft_id: NftId::from([n; NftId::LENGTH]).to_vec(),
        output_id: output_id(n).to_vec(),
        address: Address::Ed25519([0u8; 32]).to_vec(),
        issuer: Some(issuer.to_vec()),
        expiration_time: expiration,
        expiration_return_address: expiration.map(|_| Address::Ed25519([1u8; 32]).to_vec()),
        created_at: 100,
        ..Default::default()
    };
    database
        .insert_nfts(&[
            expiring(1, Some(1500), &issuer),
            expiring(2, Some(900), &issuer),
            expiring(3, None, &issuer),
            expiring(4, Some(2000), &other_issuer),
        ])
        .await
        .unwrap();
    database
        .upsert_status(&Status {
            ledger_index: 10,
            protocol_version: 2,
            network_name: "testnet-1".to_string(),
            database_version: 1,
        })
        .await
        .unwrap();

    let filter = NftFilter {
        has_expiration: Some(true),
        issuer: Some(issuer),
        expires_after: Some(1000),
        ..Default::default()
    };
    let result = indexer.nft_outputs_with_filters(&filter).await.unwrap();
    assert_eq!(result.output_ids, vec![output_id(1)]);
    assert_eq!(result.ledger_index, 10);
}

#[tokio::test]
async fn foundry_filter_requires_an_alias_address() {
    let (_database, indexer) = setup().await;
    let filter = FoundryFilter {
        alias_address: Some(Address::Ed25519([1u8; 32])),
        ..Default::default()
    };
    let result = indexer.foundry_outputs_with_filters(&filter).await;
    assert!(matches!(result, Err(IndexerError::InvalidParameter(_))));
}

#[tokio::test]
async fn empty_result_still_reports_the_ledger_index() {
    let (database, indexer) = setup().await;
    database
        .upsert_status(&Status {
            ledger_index: 7,
            protocol_version: 2,
            network_name: "testnet-1".to_string(),
            database_version: 1,
        })
        .await
        .unwrap();
    let filter = BasicOutputFilter {
        sender: Some(Address::Ed25519([0x55u8; 32])),
        ..Default::default()
    };
    let result = indexer.basic_outputs_with_filters(&filter).await.unwrap();
    assert!(result.output_ids.is_empty());
    assert_eq!(result.ledger_index, 7);
}

#[tokio::test]
async fn invalid_cursor_length_is_rejected() {
    let (_database, indexer) = setup().await;
    let filter = BasicOutputFilter {
        page_size: 10,
        cursor: Some("abcdef".to_string()),
        ..Default::default()
    };
    let result = indexer.basic_outputs_with_filters(&filter).await;
    assert!(matches!(result, Err(IndexerError::InvalidParameter(_))));
}

#[tokio::test]
async fn finalize_publishes_rows_and_index_atomically() {
    let (_database, indexer) = setup().await;
    let run = Arc::new(AtomicBool::new(true));
    let import = indexer.import_transaction(run, &ImportConfig::default());

    for n in 0..10 {
        import.add_output(&numbered_output_id(n), &owned_basic_output(), 50).await.unwrap();
    }
    sleep(Duration::from_millis(300)).await;

    // Rows sit in the pipeline and the status row is untouched until
    // finalize runs.
    let before = indexer.basic_outputs_with_filters(&BasicOutputFilter::default()).await.unwrap();
    assert_eq!(before.ledger_index, 0);
    assert!(indexer.status().await.unwrap().ledger_index == 0);

    import.finalize(9, &protocol_params(), 1).await.unwrap();

    let after = indexer.basic_outputs_with_filters(&BasicOutputFilter::default()).await.unwrap();
    assert_eq!(after.output_ids.len(), 10);
    assert_eq!(after.ledger_index, 9);
    let status = indexer.status().await.unwrap();
    assert_eq!(status.ledger_index, 9);
    assert_eq!(status.protocol_version, 2);
    assert_eq!(status.network_name, "testnet-1");
    assert_eq!(status.database_version, 1);
}

#[tokio::test]
async fn all_four_kinds_drain_on_finalize() {
    let (_database, indexer) = setup().await;
    let run = Arc::new(AtomicBool::new(true));
    let import = indexer.import_transaction(run, &ImportConfig::default());

    let alias_id = AliasId::from([0x31u8; AliasId::LENGTH]);
    import.add_output(&output_id(1), &owned_basic_output(), 10).await.unwrap();
    import
        .add_output(
            &output_id(2),
            &Output::Nft(NftOutput {
                amount: 1,
                native_tokens: vec![NativeToken {
                    token_id: FoundryId::build(&alias_id, 1, 0),
                    amount: 5,
                }],
                nft_id: NftId::null(),
                unlock_conditions: vec![UnlockCondition::Address(Address::Ed25519([2u8; 32]))],
                features: vec![Feature::Sender(Address::Ed25519([3u8; 32]))],
            }),
            11,
        )
        .await
        .unwrap();
    import
        .add_output(
            &output_id(3),
            &Output::Alias(AliasOutput {
                amount: 1,
                native_tokens: vec![],
                alias_id,
                state_index: 1,
                foundry_counter: 1,
                unlock_conditions: vec![
                    UnlockCondition::StateControllerAddress(Address::Ed25519([4u8; 32])),
                    UnlockCondition::GovernorAddress(Address::Ed25519([5u8; 32])),
                ],
                features: vec![],
            }),
            12,
        )
        .await
        .unwrap();
    import
        .add_output(
            &output_id(4),
            &Output::Foundry(FoundryOutput {
                amount: 1,
                native_tokens: vec![],
                serial_number: 1,
                token_scheme: TokenScheme::Simple { minted: 0, melted: 0, maximum: 10 },
                unlock_conditions: vec![UnlockCondition::ImmutableAliasAddress(Address::Alias(
                    alias_id,
                ))],
            }),
            13,
        )
        .await
        .unwrap();

    import.finalize(5, &protocol_params(), 1).await.unwrap();

    let alias = indexer.alias_output(&alias_id).await.unwrap();
    assert_eq!(alias.output_ids, vec![output_id(3)]);
    assert_eq!(alias.ledger_index, 5);
    let nft = indexer.nft_output(&NftId::from_output_id(&output_id(2))).await.unwrap();
    assert_eq!(nft.output_ids, vec![output_id(2)]);
    let foundry = indexer.foundry_output(&FoundryId::build(&alias_id, 1, 0)).await.unwrap();
    assert_eq!(foundry.output_ids, vec![output_id(4)]);
    let basic = indexer.basic_outputs_with_filters(&BasicOutputFilter::default()).await.unwrap();
    assert_eq!(basic.output_ids, vec![output_id(1)]);
}

#[tokio::test]
async fn full_input_queue_blocks_the_enqueue() {
    let (_database, indexer) = setup().await;
    let run = Arc::new(AtomicBool::new(true));
    // No batcher workers: nothing drains the input queue.
    let config = ImportConfig {
        batcher_workers: 0,
        inserter_workers: 0,
        input_queue_size: 2,
        ..Default::default()
    };
    let import = indexer.import_transaction(run, &config);

    import.add_output(&numbered_output_id(0), &owned_basic_output(), 1).await.unwrap();
    import.add_output(&numbered_output_id(1), &owned_basic_output(), 1).await.unwrap();
    let blocked =
        timeout(Duration::from_millis(200), import.add_output(&numbered_output_id(2), &owned_basic_output(), 1))
            .await;
    assert!(blocked.is_err(), "enqueue on a full input queue must wait");
}

#[tokio::test]
async fn tiny_queues_lose_no_rows() {
    let (_database, indexer) = setup().await;
    let run = Arc::new(AtomicBool::new(true));
    let config = ImportConfig {
        batch_size: 7,
        batcher_workers: 1,
        inserter_workers: 1,
        input_queue_size: 16,
        batch_queue_size: 2,
    };
    let import = indexer.import_transaction(run, &config);

    const ROWS: u32 = 1000;
    for n in 0..ROWS {
        import.add_output(&numbered_output_id(n), &owned_basic_output(), 1).await.unwrap();
    }
    import.finalize(1, &protocol_params(), 1).await.unwrap();

    let result = indexer.basic_outputs_with_filters(&BasicOutputFilter::default()).await.unwrap();
    assert_eq!(result.output_ids.len(), ROWS as usize);
}
