use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::DateTime;
use futures_util::future::BoxFuture;
use log::info;
use tokio::sync::{mpsc, Mutex};
use tokio::task;
use tokio::task::JoinHandle;
use tokio::time::timeout;

use utxo_indexer_database::client::IndexerDbClient;
use utxo_indexer_database::models::alias::Alias;
use utxo_indexer_database::models::basic_output::BasicOutput;
use utxo_indexer_database::models::foundry::Foundry;
use utxo_indexer_database::models::nft::Nft;
use utxo_indexer_database::models::status::Status;
use utxo_indexer_ledger::ids::OutputId;
use utxo_indexer_ledger::output::Output;
use utxo_indexer_ledger::protocol::ProtocolParameters;
use utxo_indexer_mapping::mapper::{map_output, MappingError, OutputRow};

const RECV_POLL_INTERVAL: Duration = Duration::from_millis(100);
const ROWS_PER_RATE_LOG: u64 = 100_000;

/// Bulk-import tunables, one set shared by the four per-kind pipelines.
#[derive(Clone, Debug)]
pub struct ImportConfig {
    pub batch_size: usize,
    pub batcher_workers: usize,
    pub inserter_workers: usize,
    pub input_queue_size: usize,
    pub batch_queue_size: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        ImportConfig {
            batch_size: 1000,
            batcher_workers: 2,
            inserter_workers: 2,
            input_queue_size: 1_000_000,
            batch_queue_size: 1000,
        }
    }
}

/// A row kind the import pipeline can batch and insert.
pub trait ImportRow: Sized + Send + Sync + 'static {
    const KEY: &'static str;

    fn created_at(&self) -> i64;

    /// Writes the rows in one database transaction.
    fn insert_batch<'a>(
        database: &'a IndexerDbClient,
        rows: &'a [Self],
    ) -> BoxFuture<'a, Result<u64, sqlx::Error>>;
}

impl ImportRow for BasicOutput {
    const KEY: &'static str = "basic_outputs";

    fn created_at(&self) -> i64 {
        self.created_at
    }

    fn insert_batch<'a>(
        database: &'a IndexerDbClient,
        rows: &'a [Self],
    ) -> BoxFuture<'a, Result<u64, sqlx::Error>> {
        Box::pin(database.insert_basic_outputs(rows))
    }
}

impl ImportRow for Nft {
    const KEY: &'static str = "nfts";

    fn created_at(&self) -> i64 {
        self.created_at
    }

    fn insert_batch<'a>(
        database: &'a IndexerDbClient,
        rows: &'a [Self],
    ) -> BoxFuture<'a, Result<u64, sqlx::Error>> {
        Box::pin(database.insert_nfts(rows))
    }
}

impl ImportRow for Alias {
    const KEY: &'static str = "aliases";

    fn created_at(&self) -> i64 {
        self.created_at
    }

    fn insert_batch<'a>(
        database: &'a IndexerDbClient,
        rows: &'a [Self],
    ) -> BoxFuture<'a, Result<u64, sqlx::Error>> {
        Box::pin(database.insert_aliases(rows))
    }
}

impl ImportRow for Foundry {
    const KEY: &'static str = "foundries";

    fn created_at(&self) -> i64 {
        self.created_at
    }

    fn insert_batch<'a>(
        database: &'a IndexerDbClient,
        rows: &'a [Self],
    ) -> BoxFuture<'a, Result<u64, sqlx::Error>> {
        Box::pin(database.insert_foundries(rows))
    }
}

/// Producer/consumer pipeline for one row kind: a bounded input channel
/// feeding batcher workers, a bounded batch channel feeding inserter
/// workers. Inserters own their transactions, one per batch.
pub struct ImportPipeline<T: ImportRow> {
    input: mpsc::Sender<T>,
    // The receiving sides must outlive the workers so that enqueueing keeps
    // blocking (instead of failing) even with zero workers configured.
    _input_rx: Arc<Mutex<mpsc::Receiver<T>>>,
    _batches_rx: Arc<Mutex<mpsc::Receiver<Vec<T>>>>,
    batchers: Vec<JoinHandle<()>>,
    inserters: Vec<JoinHandle<()>>,
}

impl<T: ImportRow> ImportPipeline<T> {
    pub fn start(database: IndexerDbClient, run: Arc<AtomicBool>, config: &ImportConfig) -> Self {
        let (input, input_rx) = mpsc::channel::<T>(config.input_queue_size);
        let input_rx = Arc::new(Mutex::new(input_rx));
        let (batches_tx, batches_rx) = mpsc::channel::<Vec<T>>(config.batch_queue_size);
        let batches_rx = Arc::new(Mutex::new(batches_rx));
        // The batch sender lives only in the batcher workers; once they all
        // end the channel closes and the inserters drain out.
        let batchers = (0..config.batcher_workers)
            .map(|n| {
                task::spawn(batcher_worker(
                    format!("batcher-{}-{}", T::KEY, n),
                    run.clone(),
                    input_rx.clone(),
                    batches_tx.clone(),
                    config.batch_size,
                ))
            })
            .collect();
        drop(batches_tx);
        let inserters = (0..config.inserter_workers)
            .map(|n| {
                task::spawn(inserter_worker::<T>(
                    format!("inserter-{}-{}", T::KEY, n),
                    run.clone(),
                    database.clone(),
                    batches_rx.clone(),
                ))
            })
            .collect();
        ImportPipeline { input, _input_rx: input_rx, _batches_rx: batches_rx, batchers, inserters }
    }

    /// Waits while the input queue is full; rows are never dropped.
    pub async fn enqueue(&self, row: T) {
        if self.input.send(row).await.is_err() {
            panic!("Enqueue on a closed {} import pipeline", T::KEY);
        }
    }

    /// Closes the input, waits for the batchers to flush and for the
    /// inserters to drain the remaining batches.
    pub async fn close_and_wait(self) {
        drop(self.input);
        for worker in self.batchers {
            worker.await.expect("Batcher worker failed");
        }
        for worker in self.inserters {
            worker.await.expect("Inserter worker failed");
        }
    }
}

async fn batcher_worker<T: ImportRow>(
    name: String,
    run: Arc<AtomicBool>,
    input: Arc<Mutex<mpsc::Receiver<T>>>,
    output: mpsc::Sender<Vec<T>>,
    batch_size: usize,
) {
    info!("[{name}] started");
    let mut batch = Vec::with_capacity(batch_size);
    loop {
        if !run.load(Ordering::Relaxed) {
            // Cancelled: exit at the channel boundary without draining.
            break;
        }
        let received = {
            let mut input = input.lock().await;
            timeout(RECV_POLL_INTERVAL, input.recv()).await
        };
        match received {
            Ok(Some(row)) => {
                batch.push(row);
                if batch.len() >= batch_size {
                    let full = std::mem::replace(&mut batch, Vec::with_capacity(batch_size));
                    if output.send(full).await.is_err() {
                        break;
                    }
                }
            }
            Ok(None) => {
                // Input closed: flush the partial batch and terminate.
                if !batch.is_empty() {
                    let _ = output.send(std::mem::take(&mut batch)).await;
                }
                break;
            }
            Err(_) => continue,
        }
    }
    info!("[{name}] ended");
}

async fn inserter_worker<T: ImportRow>(
    name: String,
    run: Arc<AtomicBool>,
    database: IndexerDbClient,
    batches: Arc<Mutex<mpsc::Receiver<Vec<T>>>>,
) {
    info!("[{name}] started");
    let start_time = Instant::now();
    let mut count: u64 = 0;
    let mut rate_logs: u64 = 0;
    loop {
        if !run.load(Ordering::Relaxed) {
            break;
        }
        let received = {
            let mut batches = batches.lock().await;
            timeout(RECV_POLL_INTERVAL, batches.recv()).await
        };
        match received {
            Ok(Some(batch)) => {
                T::insert_batch(&database, &batch)
                    .await
                    .unwrap_or_else(|e| panic!("Insert {} FAILED: {e}", T::KEY));
                count += batch.len() as u64;
                if count / ROWS_PER_RATE_LOG > rate_logs {
                    rate_logs = count / ROWS_PER_RATE_LOG;
                    let rate = count as f64 / start_time.elapsed().as_secs_f64();
                    let last_created = batch
                        .last()
                        .and_then(|row| DateTime::from_timestamp(row.created_at(), 0))
                        .map(|datetime| datetime.to_string())
                        .unwrap_or_default();
                    info!("[{name}] committed {count} {} ({rate:.2} rows/s). Last created: {last_created}", T::KEY);
                }
            }
            Ok(None) => break,
            Err(_) => continue,
        }
    }
    info!("[{name}] ended");
}

/// Rehydrates the index from a ledger snapshot. Rows are projected, routed
/// to their kind's pipeline and become visible to queries atomically when
/// `finalize` records the new ledger index.
pub struct ImportTransaction {
    database: IndexerDbClient,
    basic: ImportPipeline<BasicOutput>,
    nft: ImportPipeline<Nft>,
    alias: ImportPipeline<Alias>,
    foundry: ImportPipeline<Foundry>,
}

impl ImportTransaction {
    pub fn new(database: IndexerDbClient, run: Arc<AtomicBool>, config: &ImportConfig) -> Self {
        ImportTransaction {
            basic: ImportPipeline::start(database.clone(), run.clone(), config),
            nft: ImportPipeline::start(database.clone(), run.clone(), config),
            alias: ImportPipeline::start(database.clone(), run.clone(), config),
            foundry: ImportPipeline::start(database.clone(), run, config),
            database,
        }
    }

    /// Projects one output and enqueues the row. Waits when the input queue
    /// of the kind is full.
    pub async fn add_output(
        &self,
        output_id: &OutputId,
        output: &Output,
        booked_at: u32,
    ) -> Result<(), MappingError> {
        match map_output(output_id, output, booked_at)? {
            OutputRow::Basic(row) => self.basic.enqueue(row).await,
            OutputRow::Nft(row) => self.nft.enqueue(row).await,
            OutputRow::Alias(row) => self.alias.enqueue(row).await,
            OutputRow::Foundry(row) => self.foundry.enqueue(row).await,
        }
        Ok(())
    }

    /// Drains the pipelines kind by kind, then upserts the status row. No
    /// query observes the new ledger index before this returns.
    pub async fn finalize(
        self,
        ledger_index: u32,
        protocol_params: &ProtocolParameters,
        database_version: u32,
    ) -> Result<(), sqlx::Error> {
        self.basic.close_and_wait().await;
        self.nft.close_and_wait().await;
        self.alias.close_and_wait().await;
        self.foundry.close_and_wait().await;

        info!("Finished insertion, updating ledger index to {ledger_index}");

        self.database
            .upsert_status(&Status {
                ledger_index,
                protocol_version: protocol_params.version,
                network_name: protocol_params.network_name.clone(),
                database_version,
            })
            .await?;
        Ok(())
    }
}
