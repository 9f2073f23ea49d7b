//! Service layer
//!
//! `LinkService` is the facade the transport layer consumes; the delete
//! pipeline worker runs behind it as one long-lived background task.

mod delete_pipeline;
mod link_service;

pub use link_service::{
    AddResult, BatchAddItem, BatchAddOutcome, BatchAddResult, LinkService,
};
