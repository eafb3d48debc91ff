//! Splay Cache - A bounded key-value cache indexed by a splay tree
//!
//! Recently touched keys sit near the root of the index, and the entry with
//! the oldest access is evicted once the capacity is reached.

pub mod cache;
pub mod config;
pub mod error;
pub mod menu;
pub mod shared;
pub mod tasks;

pub use cache::{CacheStats, SplayCache};
pub use config::Config;
pub use error::{CacheError, Result};
pub use shared::SharedCache;
pub use tasks::spawn_demo_writers;
