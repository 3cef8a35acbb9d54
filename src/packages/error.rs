use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PackageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot find package \"{import_path}\" in any of: {searched}")]
    ImportNotFound {
        import_path: String,
        searched: String,
    },

    #[error("No source files in {}", dir.display())]
    NoSourceFiles { dir: PathBuf },

    #[error("Found packages {names:?} in {}", dir.display())]
    MultiplePackages { dir: PathBuf, names: Vec<String> },

    #[error("Failed to parse {}: {reason}", file.display())]
    Parse { file: PathBuf, reason: String },

    #[error("No documentation found for {name}")]
    NoDocumentation { name: String },
}
