//! Type-checked program model
//!
//! Symbols, the read-only program interface the documentation pipeline
//! consumes, and a serializable in-memory implementation of it.

pub mod provider;
pub mod snapshot;
pub mod symbol;

pub use provider::TypeCheckedProgram;
pub use snapshot::{ProgramSnapshot, SnapshotError, SymbolId};
pub use symbol::{ConstValue, PackageRef, Symbol, SymbolKind};
