use thiserror::Error;

use crate::packages::PackageError;

#[derive(Debug, Error)]
pub enum DocError {
    #[error("No symbol is bound to the identifier at {position}")]
    UnknownIdentifier { position: String },

    #[error("Cannot locate the declaration of {name}")]
    Unresolvable { name: String },

    #[error("No documentation found for {name}")]
    NotFound { name: String },

    #[error("Package {import_path}: {source}")]
    Package {
        import_path: String,
        #[source]
        source: PackageError,
    },
}
