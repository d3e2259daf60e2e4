//! Pre-built mock filesystem scenarios for testing.
//!
//! These scenarios provide realistic cgroup v2 and `/proc/pressure` states
//! for testing various kernel configurations.

use std::io;
use std::path::Path;

use super::filesystem::MockFs;

/// Default cgroup v2 mount point.
pub const CGROUP_ROOT: &str = "/sys/fs/cgroup";

/// Idle CPU: kernels before 5.13 print only the `some` line here.
pub const CPU_PRESSURE_IDLE: &str = "some avg10=0.00 avg60=0.00 avg300=0.00 total=0\n";

pub const MEMORY_PRESSURE: &str = "\
some avg10=0.00 avg60=0.00 avg300=0.00 total=0
full avg10=1.50 avg60=2.75 avg300=3.10 total=12345
";

pub const IO_PRESSURE: &str = "\
some avg10=4.21 avg60=3.87 avg300=2.05 total=987654321
full avg10=3.90 avg60=3.12 avg300=1.74 total=876543210
";

pub const CPU_PRESSURE_LOADED: &str = "\
some avg10=72.40 avg60=65.13 avg300=40.02 total=5543219876
full avg10=0.00 avg60=0.00 avg300=0.00 total=0
";

impl MockFs {
    /// Creates a cgroup directory with all three pressure files.
    pub fn typical_cgroup(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        let mut fs = Self::new();
        fs.add_file(dir.join("cgroup.controllers"), "cpu io memory pids\n");
        fs.add_file(dir.join("cpu.pressure"), CPU_PRESSURE_IDLE);
        fs.add_file(dir.join("memory.pressure"), MEMORY_PRESSURE);
        fs.add_file(dir.join("io.pressure"), IO_PRESSURE);
        fs
    }

    /// Creates system-wide pressure files under `<proc>/pressure`.
    pub fn typical_system(proc_path: impl AsRef<Path>) -> Self {
        let dir = proc_path.as_ref().join("pressure");
        let mut fs = Self::new();
        fs.add_file(dir.join("cpu"), CPU_PRESSURE_LOADED);
        fs.add_file(dir.join("memory"), MEMORY_PRESSURE);
        fs.add_file(dir.join("io"), IO_PRESSURE);
        fs
    }

    /// Kernel without `CONFIG_PSI`: the cgroup exists but has no pressure files.
    pub fn without_psi(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        let mut fs = Self::new();
        fs.add_file(dir.join("cgroup.controllers"), "cpu io memory pids\n");
        fs.add_file(dir.join("cpu.stat"), "usage_usec 5000000\n");
        fs
    }

    /// PSI compiled in but disabled at boot: files exist, reads fail with ENOTSUP.
    pub fn psi_disabled(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        let mut fs = Self::new();
        for name in ["cpu.pressure", "memory.pressure", "io.pressure"] {
            fs.add_failing_file(dir.join(name), "", io::ErrorKind::Unsupported);
        }
        fs
    }
}
