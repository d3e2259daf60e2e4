//! PSI collector for cgroup v2 directories and `/proc/pressure`.

use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::collector::traits::FileSystem;
use crate::error::{PsiError, Result};
use crate::model::{PressureKind, PressureRecord, PressureStats};

use super::parser::{self, PressureFile};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    /// `<cgroup>/cpu.pressure`
    Cgroup,
    /// `<proc>/pressure/cpu`
    System,
}

/// Collector for pressure stall information.
///
/// Reads the cpu, memory and io pressure files of one cgroup v2 directory,
/// or the system-wide files under `/proc/pressure`.
pub struct PressureCollector<F: FileSystem> {
    fs: F,
    dir: PathBuf,
    layout: Layout,
}

impl<F: FileSystem> PressureCollector<F> {
    /// Creates a collector for a cgroup v2 directory.
    ///
    /// # Arguments
    /// * `fs` - Filesystem implementation
    /// * `cgroup_path` - Path to cgroup directory (e.g., "/sys/fs/cgroup")
    pub fn cgroup(fs: F, cgroup_path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            dir: cgroup_path.into(),
            layout: Layout::Cgroup,
        }
    }

    /// Creates a collector for system-wide pressure.
    ///
    /// # Arguments
    /// * `fs` - Filesystem implementation
    /// * `proc_path` - Path to the proc filesystem (e.g., "/proc")
    pub fn system(fs: F, proc_path: impl AsRef<Path>) -> Self {
        Self {
            fs,
            dir: proc_path.as_ref().join("pressure"),
            layout: Layout::System,
        }
    }

    /// Directory the pressure files are read from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file(&self, kind: PressureKind) -> PressureFile<'_> {
        match self.layout {
            Layout::Cgroup => PressureFile::cgroup(&self.dir, kind),
            Layout::System => PressureFile::system(&self.dir, kind),
        }
    }

    fn kind_for(&self, name: &str) -> Option<PressureKind> {
        match self.layout {
            Layout::Cgroup => PressureKind::from_file_name(name),
            Layout::System => PressureKind::ALL.into_iter().find(|k| k.as_str() == name),
        }
    }

    /// True if at least one pressure file is present.
    pub fn is_available(&self) -> bool {
        PressureKind::ALL
            .into_iter()
            .any(|kind| self.fs.exists(&self.dir.join(self.file(kind).name)))
    }

    /// Parses the pressure file `file_name` into `target`.
    ///
    /// The slot is chosen from the file name before anything is opened, so an
    /// unknown name is an error rather than a read whose results are dropped.
    /// Parsing writes into `target` as it goes; on error the record may be
    /// partially updated.
    pub fn stat(&self, file_name: &str, target: Option<&mut PressureStats>) -> Result<()> {
        let Some(target) = target else {
            return Err(PsiError::invalid_argument("pressure stats target is None"));
        };
        let kind = self
            .kind_for(file_name)
            .ok_or_else(|| PsiError::unknown_file(file_name))?;

        let file = self.file(kind);
        let reader = self
            .fs
            .open(file.dir, file.name)
            .map_err(|e| PsiError::open(file.dir, file.name, e))?;

        parser::parse_pressure(BufReader::new(reader), file, Some(target))
    }

    /// Reads one resource's pressure file.
    ///
    /// Returns `None` when PSI is not available for this resource: the file
    /// is missing (kernel < 4.20 or built without `CONFIG_PSI`) or the kernel
    /// rejects the read with `ENOTSUP` (PSI disabled at boot).
    pub fn read(&self, kind: PressureKind) -> Result<Option<PressureRecord>> {
        let file = self.file(kind);

        let reader = match self.fs.open(file.dir, file.name) {
            Ok(reader) => reader,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %file.dir.display(), file = file.name, "pressure file not present");
                return Ok(None);
            }
            Err(e) => return Err(PsiError::open(file.dir, file.name, e)),
        };

        let mut scratch = PressureStats::default();
        match parser::parse_pressure(BufReader::new(reader), file, Some(&mut scratch)) {
            Ok(()) => {}
            Err(e) if e.is_unsupported() => {
                debug!(path = %file.dir.display(), file = file.name, "pressure accounting disabled");
                return Ok(None);
            }
            Err(e) => return Err(e),
        }

        // A readable file without any some/full line still reports zeros
        Ok(Some(scratch.get(kind).copied().unwrap_or_default()))
    }

    /// Collects all available pressure records.
    ///
    /// Stops at the first file that fails to open or parse.
    pub fn collect(&self) -> Result<PressureStats> {
        let mut stats = PressureStats::default();
        for kind in PressureKind::ALL {
            stats.set(kind, self.read(kind)?);
        }
        Ok(stats)
    }
}
