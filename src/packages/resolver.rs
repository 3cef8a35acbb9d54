//! Import resolution
//!
//! Maps an import path to the directory holding the package and the source
//! files that belong to it. Relative imports (`./x`, `../x`) resolve against
//! the importing directory; everything else is looked up under an ordered
//! list of source roots.

use std::env;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::packages::{FileSystemTrait, PackageError, scan_header};

/// A package located on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPackage {
    /// Declared package name
    pub name: String,
    pub import_path: String,
    pub dir: PathBuf,
    /// Source files of the package, sorted by file name
    pub files: Vec<PathBuf>,
}

/// Locates a package's files from an import path
#[cfg_attr(test, mockall::automock)]
pub trait ImportResolver {
    fn import(&self, import_path: &str, src_dir: &Path) -> Result<BuildPackage, PackageError>;
}

/// Ordered source roots searched for non-relative import paths
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPaths {
    roots: Vec<PathBuf>,
}

impl SearchPaths {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    /// `$GOROOT/src` followed by `<entry>/src` for each `GOPATH` entry
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut roots = Vec::new();
        if let Some(goroot) = lookup("GOROOT").filter(|value| !value.is_empty()) {
            roots.push(PathBuf::from(goroot).join("src"));
        }
        if let Some(gopath) = lookup("GOPATH") {
            roots.extend(
                env::split_paths(&gopath)
                    .filter(|entry| !entry.as_os_str().is_empty())
                    .map(|entry| entry.join("src")),
            );
        }
        Self { roots }
    }

    /// Replace the roots when `overrides` is non-empty
    pub fn with_overrides(self, overrides: Vec<PathBuf>) -> Self {
        if overrides.is_empty() {
            self
        } else {
            Self { roots: overrides }
        }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }
}

fn is_relative_import(import_path: &str) -> bool {
    import_path == "."
        || import_path == ".."
        || import_path.starts_with("./")
        || import_path.starts_with("../")
}

/// Whether a directory entry is a buildable, non-test source file
fn is_source_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
        return false;
    };
    name.ends_with(".go")
        && !name.ends_with("_test.go")
        && !name.starts_with('.')
        && !name.starts_with('_')
}

/// Import resolver over a directory tree
#[derive(Debug, Clone)]
pub struct DirImportResolver<F: FileSystemTrait> {
    fs: F,
    search_paths: SearchPaths,
}

impl<F: FileSystemTrait> DirImportResolver<F> {
    pub fn new(fs: F, search_paths: SearchPaths) -> Self {
        Self { fs, search_paths }
    }

    fn find_dir(&self, import_path: &str, src_dir: &Path) -> Result<PathBuf, PackageError> {
        if is_relative_import(import_path) {
            let dir = src_dir.join(import_path);
            if self.fs.is_dir(&dir) {
                return Ok(dir);
            }
            return Err(PackageError::ImportNotFound {
                import_path: import_path.to_string(),
                searched: src_dir.display().to_string(),
            });
        }

        for root in self.search_paths.roots() {
            let dir = root.join(import_path);
            if self.fs.is_dir(&dir) {
                return Ok(dir);
            }
        }
        Err(PackageError::ImportNotFound {
            import_path: import_path.to_string(),
            searched: self
                .search_paths
                .roots()
                .iter()
                .map(|root| root.display().to_string())
                .collect::<Vec<_>>()
                .join(", "),
        })
    }
}

impl<F: FileSystemTrait> ImportResolver for DirImportResolver<F> {
    fn import(&self, import_path: &str, src_dir: &Path) -> Result<BuildPackage, PackageError> {
        let dir = self.find_dir(import_path, src_dir)?;

        let mut files: Vec<PathBuf> = self
            .fs
            .list_files(&dir)?
            .into_iter()
            .filter(|path| is_source_file(path))
            .collect();
        files.sort();

        let mut names: Vec<String> = Vec::new();
        let mut package_files = Vec::new();
        for file in files {
            let source = match self.fs.read(&file) {
                Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
                Err(e) => {
                    warn!("Skipping unreadable source file {}: {}", file.display(), e);
                    continue;
                }
            };
            let header = scan_header(&file, &source)?;
            // Documentation-only files may sit beside any package
            if header.name == "documentation" {
                continue;
            }
            if !names.contains(&header.name) {
                names.push(header.name.clone());
            }
            if names[0] == header.name {
                package_files.push(file);
            }
        }

        if names.len() > 1 {
            return Err(PackageError::MultiplePackages { dir, names });
        }
        let Some(name) = names.pop() else {
            return Err(PackageError::NoSourceFiles { dir });
        };

        debug!(
            "Resolved import \"{}\" to {} ({} files, package {})",
            import_path,
            dir.display(),
            package_files.len(),
            name
        );
        Ok(BuildPackage {
            name,
            import_path: import_path.to_string(),
            dir,
            files: package_files,
        })
    }
}
