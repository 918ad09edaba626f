use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Write a file atomically, through a temporary file
///
/// Data is written to a sibling file with a `.tmp` suffix, renamed to the final path on
/// [GuardedFile::persist()]. If the guard is dropped before that, the temporary file is removed
/// and the final path is left untouched.
///
/// Parent directory is created if needed.
pub struct GuardedFile<P: AsRef<Path>> {
    // Closed (set to `None`) before the rename
    file: Option<File>,
    path: P,
}

impl<P: AsRef<Path>> GuardedFile<P> {
    /// Create the temporary file
    pub fn create(path: P) -> io::Result<Self> {
        if let Some(dirname) = path.as_ref().parent() {
            if !dirname.as_os_str().is_empty() {
                fs::create_dir_all(dirname)?;
            }
        }

        let file = OpenOptions::new()
            .write(true).create(true).truncate(true)
            .open(Self::build_tmp_path(path.as_ref()))?;
        Ok(Self { file: Some(file), path })
    }

    /// Flush and close the temporary file, move it to its final path
    pub fn persist(mut self) -> io::Result<()> {
        if let Some(file) = self.file.take() {
            file.sync_all()?;
        }
        fs::rename(Self::build_tmp_path(self.path.as_ref()), self.path.as_ref())
    }

    /// Create a file, fill it using a closure, persist it on success
    ///
    /// ```
    /// use std::io::Write;
    /// use eternal_utils::GuardedFile;
    ///
    /// let dir = tempfile::tempdir().unwrap();
    /// let path = dir.path().join("out.txt");
    /// GuardedFile::for_scope(&path, |file| file.write_all(b"content")).unwrap();
    /// assert_eq!(std::fs::read(&path).unwrap(), b"content");
    /// ```
    pub fn for_scope<T, F>(path: P, f: F) -> io::Result<T>
    where F: FnOnce(&mut Self) -> io::Result<T> {
        let mut guard = Self::create(path)?;
        let result = f(&mut guard)?;
        guard.persist()?;
        Ok(result)
    }

    fn file_mut(&mut self) -> io::Result<&mut File> {
        self.file.as_mut().ok_or_else(|| io::Error::new(io::ErrorKind::Other, "guarded file already closed"))
    }

    fn build_tmp_path(path: &Path) -> PathBuf {
        let mut s = path.as_os_str().to_owned();
        s.push(".tmp");
        s.into()
    }
}

impl<P: AsRef<Path>> Write for GuardedFile<P> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file_mut()?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file_mut()?.flush()
    }
}

impl<P: AsRef<Path>> Drop for GuardedFile<P> {
    fn drop(&mut self) {
        // Close before removing, needed on Windows
        drop(self.file.take());
        let _ = fs::remove_file(Self::build_tmp_path(self.path.as_ref()));  // ignore errors
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dropped_guard_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("file.bin");
        {
            let mut guard = GuardedFile::create(&path).unwrap();
            guard.write_all(b"partial").unwrap();
        }
        assert!(!path.exists());
        assert!(!dir.path().join("sub").join("file.bin.tmp").exists());
    }

    #[test]
    fn failed_scope_keeps_previous_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("file.bin");
        fs::write(&path, b"old").unwrap();
        let result: io::Result<()> = GuardedFile::for_scope(&path, |file| {
            file.write_all(b"new")?;
            Err(io::Error::new(io::ErrorKind::InvalidData, "abort"))
        });
        assert!(result.is_err());
        assert_eq!(fs::read(&path).unwrap(), b"old");
    }

    #[test]
    fn persist_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("file.bin");
        fs::write(&path, b"old").unwrap();
        let mut guard = GuardedFile::create(&path).unwrap();
        guard.write_all(b"new").unwrap();
        guard.persist().unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"new");
    }
}
