//! Shared infrastructure utilities for Trinity.
//!
//! - **`atomic_write`**: Crash-safe file persistence (temp + rename), used to
//!   materialize downloaded runtime scripts so a half-written file is never
//!   handed to an interpreter.

pub mod atomic_write;

pub use atomic_write::{FileSync, WriteOptions, atomic_write, atomic_write_with_options};
