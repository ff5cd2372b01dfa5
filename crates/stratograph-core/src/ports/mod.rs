//! Port definitions (trait interfaces implemented by adapter crates)
//!
//! - [`query_transport`] - submitting query documents to the platform
//! - [`graph_store`] - buffering and persisting collected graph data

pub mod graph_store;
pub mod query_transport;

pub use graph_store::{GraphDataClient, GraphDataCollector};
pub use query_transport::QueryTransport;
