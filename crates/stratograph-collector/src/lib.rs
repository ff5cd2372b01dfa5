//! Stratograph Collector - graph data buffering and local persistence
//!
//! A collection run produces entities and relationships faster than it
//! should talk to the network, so work functions append into an in-memory
//! collector and flush to an on-disk, type-indexed cache between phases.
//! Later phases read earlier phases' data back by type without any database.
//!
//! ## Modules
//!
//! - [`layout`] - cache directory layout and flush file naming
//! - [`memory`] - the append-only in-memory collector
//! - [`local`] - the file-backed graph data client (flush + list by type)

pub mod layout;
pub mod local;
pub mod memory;

pub use layout::CacheLayout;
pub use local::LocalGraphDataClient;
pub use memory::MemoryCollector;
