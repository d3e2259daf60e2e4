//! Abstractions for resource file access to enable testing and mocking.
//!
//! The `FileSystem` trait lets the collector open pressure files from the real
//! cgroup and `/proc` hierarchies on Linux, or from an in-memory mock in tests.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Abstraction for opening resource files.
pub trait FileSystem: Send + Sync {
    /// Byte stream returned by [`FileSystem::open`].
    type Reader: Read;

    /// Opens `file` inside `dir` for reading.
    ///
    /// # Arguments
    /// * `dir` - Directory holding the file (e.g. a cgroup directory)
    /// * `file` - File name relative to `dir`
    ///
    /// # Returns
    /// A readable stream positioned at offset 0, or the I/O error from opening.
    fn open(&self, dir: &Path, file: &str) -> io::Result<Self::Reader>;

    /// Checks if a path exists.
    fn exists(&self, path: &Path) -> bool;
}

/// Real filesystem implementation that delegates to `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl RealFs {
    /// Creates a new `RealFs` instance.
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for RealFs {
    type Reader = File;

    fn open(&self, dir: &Path, file: &str) -> io::Result<File> {
        File::open(dir.join(file))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}
