//! Integration tests for GSC-Reindex
//!
//! The HTTP collaborators are exercised against wiremock servers; the run
//! pipeline is exercised end-to-end with in-memory collaborators.

mod gsc_tests;
mod pipeline_tests;
