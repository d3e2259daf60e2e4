//! Pressure stall information collection.
//!
//! This module reads PSI from cgroup v2 `*.pressure` files and from the
//! system-wide `/proc/pressure/*` files.

mod collector;
pub mod parser;

pub use collector::PressureCollector;
pub use parser::{PressureFile, decode_window, parse_pressure};
