use super::key::CacheKeyGenerator;
use crate::error::{Result, SwsError};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Flat-directory cache storage: one file per key, file content is the raw body
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Create a storage rooted at `dir`. The directory is created lazily on first write.
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the entry file for `key`
    pub fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    /// Read an entry. A missing file is `Ok(None)`.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.entry_path(key)) {
            Ok(body) => Ok(Some(body)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SwsError::Io(e)),
        }
    }

    /// Write an entry, overwriting any previous content
    pub fn put(&self, key: &str, body: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;

        let path = self.entry_path(key);
        let is_new_file = !path.exists();
        fs::write(&path, body)?;

        // Private-tier bodies carry grades and identifiers
        if is_new_file {
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                let permissions = fs::Permissions::from_mode(0o600);
                fs::set_permissions(&path, permissions).map_err(|e| {
                    SwsError::Config(format!("Failed to set cache file permissions: {}", e))
                })?;
            }
        }

        Ok(())
    }

    /// Remove an entry, returning whether it existed
    pub fn remove(&self, key: &str) -> Result<bool> {
        match fs::remove_file(self.entry_path(key)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(SwsError::Io(e)),
        }
    }

    /// Remove every entry, returning how many were deleted
    pub fn clear(&self) -> Result<u64> {
        let mut removed = 0;
        for path in self.entry_files()? {
            fs::remove_file(path)?;
            removed += 1;
        }
        Ok(removed)
    }

    pub fn count_entries(&self) -> Result<u64> {
        Ok(self.entry_files()?.len() as u64)
    }

    pub fn get_total_size(&self) -> Result<u64> {
        let mut total = 0;
        for path in self.entry_files()? {
            total += fs::metadata(path)?.len();
        }
        Ok(total)
    }

    /// Files named like cache keys; anything else in the directory is left alone
    fn entry_files(&self) -> Result<Vec<PathBuf>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(SwsError::Io(e)),
        };

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry?;
            let is_entry = entry
                .file_name()
                .to_str()
                .is_some_and(CacheKeyGenerator::is_valid_key);
            if is_entry && entry.file_type()?.is_file() {
                files.push(entry.path());
            }
        }
        Ok(files)
    }
}
