pub mod query_client;
pub mod tracker_service;

pub use query_client::*;
pub use tracker_service::*;
