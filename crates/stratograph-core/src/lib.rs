//! Stratograph Core - domain types and port definitions
//!
//! This crate contains the I/O-free core shared by the rest of the workspace:
//! - **Domain types** - `Entity`, `Relationship`, `SyncJob`, `SyncJobOptions`,
//!   property values and validated identifier newtypes
//! - **Configuration** - typed client configuration with environment and YAML
//!   loading
//! - **Port definitions** - traits for adapters: `QueryTransport`,
//!   `GraphDataCollector`, `GraphDataClient`
//!
//! # Architecture
//!
//! The domain module contains pure data types and validation with no external
//! dependencies beyond serde. Ports define trait interfaces that the client,
//! collector and pipeline crates implement or consume.

pub mod config;
pub mod domain;
pub mod ports;
