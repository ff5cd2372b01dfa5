//! Domain model for the Stratograph platform
//!
//! Graph objects (entities and relationships), sync job records, validated
//! identifier newtypes and the domain error taxonomy.

pub mod errors;
pub mod graph_object;
pub mod newtypes;
pub mod sync_job;

pub use errors::DomainError;
pub use graph_object::{
    ClassLabels, Entity, EndpointRefs, ObjectDeletion, PropertyValue, Relationship,
};
pub use newtypes::{RunId, SyncJobId};
pub use sync_job::{SyncJob, SyncJobOptions, SyncJobSource, SyncJobStatus, SyncMode};
