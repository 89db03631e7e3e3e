//! In-memory recording output store

use super::{OutputStore, StoreEntry, Walk};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// A call made against a [`MemoryStore`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StoreOp {
    CreateDirAll(PathBuf),
    Create(PathBuf),
    Append(PathBuf),
    WriteAll(PathBuf),
    ReadAll(PathBuf),
    WalkFiles(PathBuf),
}

impl StoreOp {
    pub fn path(&self) -> &Path {
        match self {
            StoreOp::CreateDirAll(p)
            | StoreOp::Create(p)
            | StoreOp::Append(p)
            | StoreOp::WriteAll(p)
            | StoreOp::ReadAll(p)
            | StoreOp::WalkFiles(p) => p,
        }
    }
}

/// Output store keeping the whole tree in memory
///
/// Every call is recorded, and individual calls can be made to fail with
/// [`fail_on`](MemoryStore::fail_on). Like a real filesystem, files can only
/// be created inside existing directories.
#[derive(Debug, Default)]
pub struct MemoryStore {
    files: BTreeMap<PathBuf, Vec<u8>>,
    dirs: BTreeSet<PathBuf>,
    ops: Vec<StoreOp>,
    failures: HashSet<StoreOp>,
}

struct MemoryWriter<'a> {
    buf: &'a mut Vec<u8>,
}

impl Write for MemoryWriter<'_> {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the given call fail with a permission error
    pub fn fail_on(&mut self, op: StoreOp) {
        self.failures.insert(op);
    }

    /// Calls received so far, in order
    pub fn ops(&self) -> &[StoreOp] {
        &self.ops
    }

    pub fn file(&self, path: impl AsRef<Path>) -> Option<&[u8]> {
        self.files.get(path.as_ref()).map(Vec::as_slice)
    }

    /// File content as UTF-8, for assertions
    pub fn file_str(&self, path: impl AsRef<Path>) -> Option<&str> {
        self.file(path).and_then(|b| std::str::from_utf8(b).ok())
    }

    pub fn has_dir(&self, path: impl AsRef<Path>) -> bool {
        self.dirs.contains(path.as_ref())
    }

    /// All file paths, sorted
    pub fn file_paths(&self) -> impl Iterator<Item = &Path> {
        self.files.keys().map(PathBuf::as_path)
    }

    /// Snapshot of every file and its content
    pub fn files(&self) -> &BTreeMap<PathBuf, Vec<u8>> {
        &self.files
    }

    /// Seed a file (and its parent directories) without recording a call
    pub fn insert_file(&mut self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) {
        let path = path.into();
        if let Some(parent) = path.parent() {
            self.insert_dirs(parent);
        }
        self.files.insert(path, contents.into());
    }

    fn insert_dirs(&mut self, path: &Path) {
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            self.dirs.insert(ancestor.to_path_buf());
        }
    }

    fn record(&mut self, op: StoreOp) -> io::Result<()> {
        let failing = self.failures.contains(&op);
        let path = op.path().display().to_string();
        self.ops.push(op);
        if failing {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("injected failure for {}", path),
            ));
        }
        Ok(())
    }

    fn check_parent(&self, path: &Path) -> io::Result<()> {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && !self.dirs.contains(parent) => {
                Err(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("parent directory {} does not exist", parent.display()),
                ))
            }
            _ => Ok(()),
        }
    }

    fn check_not_dir(&self, path: &Path) -> io::Result<()> {
        if self.dirs.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!("{} is a directory", path.display()),
            ));
        }
        Ok(())
    }
}

impl OutputStore for MemoryStore {
    fn create_dir_all(&mut self, path: &Path) -> io::Result<()> {
        self.record(StoreOp::CreateDirAll(path.to_path_buf()))?;
        if self.files.contains_key(path) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{} exists and is a file", path.display()),
            ));
        }
        self.insert_dirs(path);
        Ok(())
    }

    fn create(&mut self, path: &Path) -> io::Result<Box<dyn Write + '_>> {
        self.record(StoreOp::Create(path.to_path_buf()))?;
        self.check_parent(path)?;
        self.check_not_dir(path)?;
        let buf = self.files.entry(path.to_path_buf()).or_default();
        buf.clear();
        Ok(Box::new(MemoryWriter { buf }))
    }

    fn append(&mut self, path: &Path) -> io::Result<Box<dyn Write + '_>> {
        self.record(StoreOp::Append(path.to_path_buf()))?;
        self.check_parent(path)?;
        self.check_not_dir(path)?;
        let buf = self.files.entry(path.to_path_buf()).or_default();
        Ok(Box::new(MemoryWriter { buf }))
    }

    fn write_all(&mut self, path: &Path, contents: &[u8]) -> io::Result<()> {
        self.record(StoreOp::WriteAll(path.to_path_buf()))?;
        self.check_parent(path)?;
        self.check_not_dir(path)?;
        self.files.insert(path.to_path_buf(), contents.to_vec());
        Ok(())
    }

    fn read_all(&self, path: &Path) -> io::Result<Vec<u8>> {
        // Reads are not recorded: the store is borrowed immutably
        if self.failures.contains(&StoreOp::ReadAll(path.to_path_buf())) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("injected failure for {}", path.display()),
            ));
        }
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} not found", path.display()),
            )
        })
    }

    fn walk_files(&self, root: &Path) -> io::Result<Walk> {
        if self.failures.contains(&StoreOp::WalkFiles(root.to_path_buf())) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("injected failure for {}", root.display()),
            ));
        }
        if !self.dirs.contains(root) && !self.files.contains_key(root) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} not found", root.display()),
            ));
        }

        let mut entries: Vec<StoreEntry> = self
            .dirs
            .iter()
            .filter(|d| d.starts_with(root))
            .map(|d| StoreEntry {
                path: d.clone(),
                is_dir: true,
                is_symlink: false,
            })
            .chain(
                self.files
                    .keys()
                    .filter(|f| f.starts_with(root))
                    .map(|f| StoreEntry {
                        path: f.clone(),
                        is_dir: false,
                        is_symlink: false,
                    }),
            )
            .collect();
        entries.sort_by(|a, b| a.path.cmp(&b.path));

        Ok(Box::new(entries.into_iter().map(Ok)))
    }
}
