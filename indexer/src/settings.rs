use crate::import::ImportConfig;
use utxo_indexer_cli::cli_args::CliArgs;

#[derive(Clone)]
pub struct Settings {
    pub cli_args: CliArgs,
}

impl Settings {
    pub fn import_config(&self) -> ImportConfig {
        ImportConfig {
            batch_size: self.cli_args.import_batch_size,
            batcher_workers: self.cli_args.import_batcher_workers,
            inserter_workers: self.cli_args.import_inserter_workers,
            input_queue_size: self.cli_args.import_input_queue_size,
            batch_queue_size: self.cli_args.import_batch_queue_size,
        }
    }
}
