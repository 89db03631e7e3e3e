//! Output store abstraction
//!
//! The generator only touches the output tree through [`OutputStore`], so the
//! same orchestration runs against the real filesystem ([`FsStore`]) and the
//! in-memory recording store used in tests ([`MemoryStore`]).

pub mod fs;
pub mod memory;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub use fs::FsStore;
pub use memory::{MemoryStore, StoreOp};

/// One entry produced by [`OutputStore::walk_files`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreEntry {
    pub path: PathBuf,
    pub is_dir: bool,
    /// The entry is a link itself; its target may lie outside the walked root
    pub is_symlink: bool,
}

/// Lazy, single-pass walk over an output tree
pub type Walk = Box<dyn Iterator<Item = io::Result<StoreEntry>>>;

/// File and directory sink for a generation run
///
/// Write handles returned by [`create`](OutputStore::create) and
/// [`append`](OutputStore::append) are closed when dropped.
pub trait OutputStore {
    /// Create a directory and all missing parents
    fn create_dir_all(&mut self, path: &Path) -> io::Result<()>;

    /// Create a file, truncating it if it already exists
    fn create(&mut self, path: &Path) -> io::Result<Box<dyn Write + '_>>;

    /// Open a file for appending, creating it if missing
    fn append(&mut self, path: &Path) -> io::Result<Box<dyn Write + '_>>;

    /// Replace the whole content of a file
    ///
    /// Existing files keep their permission bits.
    fn write_all(&mut self, path: &Path, contents: &[u8]) -> io::Result<()>;

    fn read_all(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Every entry under `root` (root included), in a stable order
    fn walk_files(&self, root: &Path) -> io::Result<Walk>;
}
