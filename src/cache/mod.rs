//! Status cache module
//!
//! This module persists the last observed indexing status of every page of a
//! site and decides whether a cached status can still be trusted.

mod policy;
mod record;
mod store;

pub use policy::{should_recheck, RecheckPolicy};
pub use record::StatusRecord;
pub use store::{load, save, StatusCache, StatusMap};
