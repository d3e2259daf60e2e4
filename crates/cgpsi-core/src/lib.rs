//! cgpsi-core - Pressure Stall Information reader library.
//!
//! This library parses the PSI files exposed by cgroup v2 and `/proc/pressure`
//! into typed records. It is shared by:
//! - `cgpsi` - one-shot command-line reader
//! - any caller that schedules its own reads through [`collector::PressureCollector`]

pub mod collector;
pub mod error;
pub mod model;

pub use error::{PsiError, Result};
pub use model::{PressureKind, PressureRecord, PressureStats, PressureWindow};
