//! Background Tasks Module
//!
//! Tasks that drive a shared cache concurrently.
//!
//! # Tasks
//! - Demo writers: two tasks inserting into one cache at the same time

mod demo;

pub use demo::{spawn_demo_writers, DEMO_BATCH};
