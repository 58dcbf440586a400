//! Core types shared by the relix error and logging facilities
//!
//! - **Correlation**: `RunId` tagging one harness run end to end
//! - **Schema constants**: canonical field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::RunId;
