pub mod error;
pub mod import;
pub mod indexer;
pub mod query;
pub mod settings;
pub mod signal;
pub mod web;
