//! State module describing what Search Console reports about a page
//!
//! # Components
//!
//! - `status`: the indexing status vocabulary and the indexable set
//! - `StatusBuckets`: pages grouped by their resolved status

mod buckets;
pub mod status;

// Re-export main types
pub use buckets::StatusBuckets;
pub use status::{emoji_for_status, is_indexable, INDEXABLE_STATUSES};
