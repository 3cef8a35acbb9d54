//! File system abstraction layer
//!
//! Import resolution and package header scanning only ever list directories
//! and read source files. Both go through [`FileSystemTrait`] so tests can run
//! against an in-memory tree or a mock.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Trait for file system operations
#[cfg_attr(test, mockall::automock)]
pub trait FileSystemTrait: Clone + Send + Sync {
    /// Check if a directory exists
    fn is_dir(&self, path: &Path) -> bool;

    /// Read file contents as bytes
    fn read(&self, path: &Path) -> Result<Vec<u8>, std::io::Error>;

    /// Regular files directly inside `dir`, in no particular order
    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>, std::io::Error>;
}

// ============================================================================
// Real File System Implementation
// ============================================================================

/// Real file system implementation using std::fs and walkdir
#[derive(Debug, Clone)]
pub struct RealFileSystem;

impl FileSystemTrait for RealFileSystem {
    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>, std::io::Error> {
        std::fs::read(path)
    }

    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>, std::io::Error> {
        // Surface a missing or unreadable directory instead of an empty listing
        std::fs::metadata(dir)?;

        let mut files = Vec::new();
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Failed to access directory entry: {}", e);
                    continue;
                }
            };
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }
}

// ============================================================================
// Test File System Implementation
// ============================================================================


#[cfg(test)]
pub use test_filesystem::TestFileSystem;

// MockFileSystemTrait Clone implementation for dependency injection patterns
#[cfg(test)]
impl Clone for MockFileSystemTrait {
    fn clone(&self) -> Self {
        MockFileSystemTrait::new()
    }
}
