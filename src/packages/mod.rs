//! Package location and package-level documentation
//!
//! Finds a package's source files from an import path and reads the package
//! comment without parsing any declarations.

pub mod error;
pub mod file_system;
pub mod header;
pub mod package_doc;
pub mod resolver;

pub use error::PackageError;
pub use file_system::{FileSystemTrait, RealFileSystem};
pub use header::{PackageHeader, scan_header};
pub use package_doc::package_doc;
pub use resolver::{BuildPackage, DirImportResolver, ImportResolver, SearchPaths};
