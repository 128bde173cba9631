pub mod client;
pub mod cursor;
pub mod models;
pub mod query;
