//! In-memory mock filesystem for testing collectors without real cgroups.
//!
//! This module provides `MockFs` which simulates resource files in memory,
//! including files whose stream breaks partway through a read.

use crate::collector::traits::FileSystem;
use std::collections::{HashMap, HashSet};
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
enum MockEntry {
    /// Readable file: bytes served first, then an optional error instead of EOF.
    File {
        content: Vec<u8>,
        read_error: Option<io::ErrorKind>,
    },
    /// File that exists but cannot be opened.
    Unopenable(io::ErrorKind),
}

/// In-memory filesystem for testing.
#[derive(Debug, Clone, Default)]
pub struct MockFs {
    /// Map from path to file entry.
    files: HashMap<PathBuf, MockEntry>,
    /// Set of directories (for `exists` on directories).
    directories: HashSet<PathBuf>,
}

impl MockFs {
    /// Creates a new empty mock filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file with the given content.
    ///
    /// Parent directories are automatically created.
    pub fn add_file(&mut self, path: impl AsRef<Path>, content: impl Into<String>) {
        self.insert(
            path.as_ref(),
            MockEntry::File {
                content: content.into().into_bytes(),
                read_error: None,
            },
        );
    }

    /// Adds a file with raw bytes, which need not be valid UTF-8.
    pub fn add_bytes(&mut self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        self.insert(
            path.as_ref(),
            MockEntry::File {
                content: content.into(),
                read_error: None,
            },
        );
    }

    /// Adds a file whose reader yields `prefix` and then fails with `kind`.
    pub fn add_failing_file(
        &mut self,
        path: impl AsRef<Path>,
        prefix: impl Into<String>,
        kind: io::ErrorKind,
    ) {
        self.insert(
            path.as_ref(),
            MockEntry::File {
                content: prefix.into().into_bytes(),
                read_error: Some(kind),
            },
        );
    }

    /// Adds a file that exists but fails to open with `kind`.
    pub fn add_unopenable_file(&mut self, path: impl AsRef<Path>, kind: io::ErrorKind) {
        self.insert(path.as_ref(), MockEntry::Unopenable(kind));
    }

    /// Adds an empty directory.
    pub fn add_dir(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        self.directories.insert(path.to_path_buf());
        self.add_parents(path);
    }

    fn insert(&mut self, path: &Path, entry: MockEntry) {
        self.add_parents(path);
        self.files.insert(path.to_path_buf(), entry);
    }

    fn add_parents(&mut self, path: &Path) {
        let mut parent = path.parent();
        while let Some(p) = parent {
            if !p.as_os_str().is_empty() {
                self.directories.insert(p.to_path_buf());
            }
            parent = p.parent();
        }
    }
}

/// Reader handed out by [`MockFs::open`].
#[derive(Debug)]
pub struct MockReader {
    data: Cursor<Vec<u8>>,
    read_error: Option<io::ErrorKind>,
}

impl Read for MockReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.data.read(buf)?;
        if n == 0 && !buf.is_empty() {
            if let Some(kind) = self.read_error {
                return Err(io::Error::new(kind, "mock read failure"));
            }
        }
        Ok(n)
    }
}

impl FileSystem for MockFs {
    type Reader = MockReader;

    fn open(&self, dir: &Path, file: &str) -> io::Result<MockReader> {
        let path = dir.join(file);
        match self.files.get(&path) {
            Some(MockEntry::File {
                content,
                read_error,
            }) => Ok(MockReader {
                data: Cursor::new(content.clone()),
                read_error: *read_error,
            }),
            Some(MockEntry::Unopenable(kind)) => Err(io::Error::new(
                *kind,
                format!("cannot open: {:?}", path),
            )),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("file not found: {:?}", path),
            )),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path) || self.directories.contains(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_all(fs: &MockFs, dir: &str, file: &str) -> io::Result<String> {
        let mut out = String::new();
        fs.open(Path::new(dir), file)?.read_to_string(&mut out)?;
        Ok(out)
    }

    #[test]
    fn test_mock_fs_add_file() {
        let mut fs = MockFs::new();
        fs.add_file("/sys/fs/cgroup/cpu.pressure", "some avg10=0.00\n");

        assert!(fs.exists(Path::new("/sys/fs/cgroup/cpu.pressure")));
        assert!(fs.exists(Path::new("/sys/fs/cgroup")));
        assert!(fs.exists(Path::new("/sys")));

        let content = read_all(&fs, "/sys/fs/cgroup", "cpu.pressure").unwrap();
        assert_eq!(content, "some avg10=0.00\n");
    }

    #[test]
    fn test_mock_fs_add_dir() {
        let mut fs = MockFs::new();
        fs.add_dir("/sys/fs/cgroup/empty.slice");
        assert!(fs.exists(Path::new("/sys/fs/cgroup/empty.slice")));
        assert!(!fs.exists(Path::new("/sys/fs/cgroup/empty.slice/cpu.pressure")));
    }

    #[test]
    fn test_mock_fs_failing_file() {
        let mut fs = MockFs::new();
        fs.add_failing_file("/proc/pressure/io", "some ", io::ErrorKind::Unsupported);

        let mut reader = fs.open(Path::new("/proc/pressure"), "io").unwrap();
        let mut buf = [0u8; 16];
        assert_eq!(reader.read(&mut buf).unwrap(), 5);
        let err = reader.read(&mut buf).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Unsupported);
    }

    #[test]
    fn test_mock_fs_unopenable_file() {
        let mut fs = MockFs::new();
        fs.add_unopenable_file("/sys/fs/cgroup/io.pressure", io::ErrorKind::PermissionDenied);

        assert!(fs.exists(Path::new("/sys/fs/cgroup/io.pressure")));
        let err = read_all(&fs, "/sys/fs/cgroup", "io.pressure").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
    }

    #[test]
    fn test_mock_fs_not_found() {
        let fs = MockFs::new();
        let err = read_all(&fs, "/nonexistent", "cpu.pressure").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
