//! Mock filesystem implementations for testing.
//!
//! This module provides `MockFs` and pre-built scenarios for testing
//! collectors without requiring actual cgroup v2 or `/proc/pressure` access.

mod filesystem;
pub mod scenarios;

pub use filesystem::{MockFs, MockReader};
