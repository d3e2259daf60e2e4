//! Pressure collection for Linux.
//!
//! This module reads Pressure Stall Information from cgroup v2 directories
//! and from `/proc/pressure`, with support for mocking in tests.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │              PressureCollector                │
//! │  - <cgroup>/{cpu,memory,io}.pressure          │
//! │  - /proc/pressure/{cpu,memory,io}             │
//! │                      │                        │
//! │       ┌──────────────▼──────────────┐         │
//! │       │ parse_pressure (lines)      │         │
//! │       │   └─ decode_window (fields) │         │
//! │       └──────────────┬──────────────┘         │
//! │                      │                        │
//! │               ┌──────▼──────┐                 │
//! │               │  FileSystem │ (trait)         │
//! │               └──────┬──────┘                 │
//! └──────────────────────┼────────────────────────┘
//!                        │
//!          ┌─────────────┼─────────────┐
//!   ┌──────▼──────┐ ┌────▼────────┐ ┌──▼──────────┐
//!   │   RealFs    │ │   MockFs    │ │  Scenarios  │
//!   │ (Linux)     │ │ (Testing)   │ │ (Fixtures)  │
//!   └─────────────┘ └─────────────┘ └─────────────┘
//! ```
//!
//! # Usage
//!
//! ## Production (Linux)
//!
//! ```ignore
//! use cgpsi_core::collector::{PressureCollector, RealFs};
//!
//! let collector = PressureCollector::cgroup(RealFs::new(), "/sys/fs/cgroup");
//! let stats = collector.collect().unwrap();
//! ```
//!
//! ## Testing (with MockFs)
//!
//! ```
//! use cgpsi_core::collector::{MockFs, PressureCollector};
//!
//! let fs = MockFs::typical_cgroup("/sys/fs/cgroup");
//! let collector = PressureCollector::cgroup(fs, "/sys/fs/cgroup");
//! let stats = collector.collect().unwrap();
//! assert!(stats.memory.is_some());
//! ```

pub mod mock;
pub mod pressure;
pub mod traits;

pub use mock::MockFs;
pub use pressure::PressureCollector;
pub use traits::{FileSystem, RealFs};
