//! Filesystem-backed output store

use super::{OutputStore, StoreEntry, Walk};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use walkdir::WalkDir;

/// Output store writing to the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStore;

impl FsStore {
    pub fn new() -> Self {
        Self
    }
}

impl OutputStore for FsStore {
    fn create_dir_all(&mut self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn create(&mut self, path: &Path) -> io::Result<Box<dyn Write + '_>> {
        Ok(Box::new(fs::File::create(path)?))
    }

    fn append(&mut self, path: &Path) -> io::Result<Box<dyn Write + '_>> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Box::new(file))
    }

    fn write_all(&mut self, path: &Path, contents: &[u8]) -> io::Result<()> {
        // Truncating in place keeps the inode and its mode bits
        fs::write(path, contents)
    }

    fn read_all(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    fn walk_files(&self, root: &Path) -> io::Result<Walk> {
        let walk = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .map(|entry| -> io::Result<StoreEntry> {
                let entry = entry.map_err(io::Error::from)?;
                let file_type = entry.file_type();
                Ok(StoreEntry {
                    is_dir: file_type.is_dir(),
                    is_symlink: file_type.is_symlink(),
                    path: entry.into_path(),
                })
            });
        Ok(Box::new(walk))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::TempDir;

    #[test]
    fn test_create_truncates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        let mut store = FsStore::new();

        store.create(&path).unwrap().write_all(b"first line").unwrap();
        store.create(&path).unwrap().write_all(b"second").unwrap();

        assert_eq!(store.read_all(&path).unwrap(), b"second");
    }

    #[test]
    fn test_append_creates_then_appends() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        let mut store = FsStore::new();

        store.append(&path).unwrap().write_all(b"a").unwrap();
        store.append(&path).unwrap().write_all(b"b").unwrap();

        let mut content = String::new();
        fs::File::open(&path)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "ab");
    }

    #[test]
    fn test_walk_is_sorted_and_flags_dirs() {
        let dir = TempDir::new().unwrap();
        let mut store = FsStore::new();
        store
            .create_dir_all(&dir.path().join("templates/tests"))
            .unwrap();
        store
            .write_all(&dir.path().join("values.yaml"), b"x")
            .unwrap();
        store
            .write_all(&dir.path().join("Chart.yaml"), b"x")
            .unwrap();

        let entries: Vec<_> = store
            .walk_files(dir.path())
            .unwrap()
            .collect::<io::Result<_>>()
            .unwrap();

        let rel: Vec<_> = entries
            .iter()
            .map(|e| {
                (
                    e.path.strip_prefix(dir.path()).unwrap().to_path_buf(),
                    e.is_dir,
                )
            })
            .collect();
        assert_eq!(
            rel,
            vec![
                (Path::new("").to_path_buf(), true),
                (Path::new("Chart.yaml").to_path_buf(), false),
                (Path::new("templates").to_path_buf(), true),
                (Path::new("templates/tests").to_path_buf(), true),
                (Path::new("values.yaml").to_path_buf(), false),
            ]
        );
    }

    #[test]
    fn test_walk_missing_root_errors() {
        let dir = TempDir::new().unwrap();
        let store = FsStore::new();
        let mut walk = store.walk_files(&dir.path().join("missing")).unwrap();
        assert!(walk.next().unwrap().is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_flags_symlinks() {
        use std::os::unix::fs::symlink;

        let dir = TempDir::new().unwrap();
        let root = dir.path().join("chart");
        let mut store = FsStore::new();
        store.create_dir_all(&root).unwrap();
        store.write_all(&dir.path().join("target.txt"), b"x").unwrap();
        store.write_all(&root.join("Chart.yaml"), b"x").unwrap();
        symlink(dir.path().join("target.txt"), root.join("link.txt")).unwrap();

        let entries: Vec<_> = store
            .walk_files(&root)
            .unwrap()
            .collect::<io::Result<_>>()
            .unwrap();

        let link = entries
            .iter()
            .find(|e| e.path.ends_with("link.txt"))
            .unwrap();
        assert!(link.is_symlink);
        assert!(!link.is_dir);
        let chart = entries
            .iter()
            .find(|e| e.path.ends_with("Chart.yaml"))
            .unwrap();
        assert!(!chart.is_symlink);
    }

    #[cfg(unix)]
    #[test]
    fn test_write_all_preserves_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hook.sh");
        let mut store = FsStore::new();
        store.write_all(&path, b"echo example").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o750)).unwrap();

        store.write_all(&path, b"echo web-app").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o750);
    }
}
