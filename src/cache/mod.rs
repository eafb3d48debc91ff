//! Cache Module
//!
//! Bounded key-value cache whose index is a splay tree, with
//! least-recently-used eviction.
//!
//! The tree and its nodes are internal. Callers only reach entries through
//! [`SplayCache`], so links, keys and arena handles cannot be rewritten from
//! outside the crate:
//!
//! ```compile_fail
//! use splay_cache::cache::SplayTree;
//! ```
//!
//! ```compile_fail
//! use splay_cache::cache::{Node, NodeId};
//! ```

mod node;
mod recency;
mod stats;
mod store;
mod tree;


// Re-export public types
pub(crate) use node::{Node, NodeId};
pub use recency::RecencyClock;
pub use stats::CacheStats;
pub use store::SplayCache;
pub(crate) use tree::SplayTree;
pub use tree::Iter;
