pub mod endpoint;
pub mod model;
pub mod params;
pub mod web_server;
