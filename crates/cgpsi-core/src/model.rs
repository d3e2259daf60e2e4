//! Pressure Stall Information data model.
//!
//! PSI reports how much wall time tasks spent waiting for a resource.
//! Available on kernels 4.20+, per cgroup on cgroup v2 hierarchies.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Averages and cumulative total for one severity line of a pressure file.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct PressureWindow {
    /// Percentage of time stalled (10-second average).
    /// Source: `avg10=` field.
    pub avg10: f64,

    /// Percentage of time stalled (60-second average).
    /// Source: `avg60=` field.
    pub avg60: f64,

    /// Percentage of time stalled (300-second average).
    /// Source: `avg300=` field.
    pub avg300: f64,

    /// Total stall time in microseconds. Monotonic.
    /// Source: `total=` field.
    pub total: u64,
}

/// Contents of one pressure file.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct PressureRecord {
    /// At least one task was stalled. Source: `some` line.
    pub some: PressureWindow,

    /// All non-idle tasks were stalled at the same time. Source: `full` line.
    /// Reported as zeros for CPU at the system level.
    pub full: PressureWindow,
}

/// Resource domain a pressure file belongs to.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PressureKind {
    Cpu,
    Memory,
    Io,
}

impl PressureKind {
    pub const ALL: [PressureKind; 3] = [PressureKind::Cpu, PressureKind::Memory, PressureKind::Io];

    /// Short resource name, as used under `/proc/pressure/`.
    pub fn as_str(self) -> &'static str {
        match self {
            PressureKind::Cpu => "cpu",
            PressureKind::Memory => "memory",
            PressureKind::Io => "io",
        }
    }

    /// File name inside a cgroup v2 directory.
    pub fn cgroup_file_name(self) -> &'static str {
        match self {
            PressureKind::Cpu => "cpu.pressure",
            PressureKind::Memory => "memory.pressure",
            PressureKind::Io => "io.pressure",
        }
    }

    /// Maps a cgroup pressure file name to its resource domain.
    pub fn from_file_name(name: &str) -> Option<Self> {
        match name {
            "cpu.pressure" => Some(PressureKind::Cpu),
            "memory.pressure" => Some(PressureKind::Memory),
            "io.pressure" => Some(PressureKind::Io),
            _ => None,
        }
    }
}

impl fmt::Display for PressureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Pressure for all resource domains of one cgroup (or of the whole system).
///
/// A `None` slot means the file was not read, or PSI is not available for
/// that resource.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct PressureStats {
    pub cpu: Option<PressureRecord>,
    pub memory: Option<PressureRecord>,
    pub io: Option<PressureRecord>,
}

impl PressureStats {
    pub fn get(&self, kind: PressureKind) -> Option<&PressureRecord> {
        match kind {
            PressureKind::Cpu => self.cpu.as_ref(),
            PressureKind::Memory => self.memory.as_ref(),
            PressureKind::Io => self.io.as_ref(),
        }
    }

    pub fn set(&mut self, kind: PressureKind, record: Option<PressureRecord>) {
        *self.slot(kind) = record;
    }

    /// Record for `kind`, created zeroed if the slot is empty.
    pub fn record_mut(&mut self, kind: PressureKind) -> &mut PressureRecord {
        self.slot(kind).get_or_insert_with(PressureRecord::default)
    }

    fn slot(&mut self, kind: PressureKind) -> &mut Option<PressureRecord> {
        match kind {
            PressureKind::Cpu => &mut self.cpu,
            PressureKind::Memory => &mut self.memory,
            PressureKind::Io => &mut self.io,
        }
    }
}
