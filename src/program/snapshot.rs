//! In-memory type-checked program
//!
//! [`ProgramSnapshot`] holds everything the documentation pipeline reads from
//! a type checker: syntax trees per package, the symbol arena and the
//! definition/use tables. Snapshots are plain data and load from JSON, which
//! is how the command-line tool receives a program produced by an external
//! toolchain.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::program::{PackageRef, Symbol, TypeCheckedProgram};
use crate::syntax::{File, FileSet, Pos, Position};

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Identifier at {ident} is bound to unknown symbol #{symbol}")]
    DanglingBinding { ident: Pos, symbol: usize },
}

/// Index into the snapshot's symbol arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolId(pub usize);

/// Identifier occurrence bound to a symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    pub ident: Pos,
    pub symbol: SymbolId,
}

/// Parsed files of one package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageSyntax {
    pub package: PackageRef,
    pub files: Vec<File>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgramSnapshot {
    pub file_set: FileSet,
    #[serde(default)]
    packages: Vec<PackageSyntax>,
    #[serde(default)]
    symbols: Vec<Symbol>,
    #[serde(default)]
    defs: Vec<Binding>,
    #[serde(default)]
    uses: Vec<Binding>,
    #[serde(default)]
    builtin: Option<File>,
    #[serde(skip)]
    def_index: HashMap<Pos, SymbolId>,
    #[serde(skip)]
    use_index: HashMap<Pos, SymbolId>,
}

impl ProgramSnapshot {
    pub fn new(file_set: FileSet) -> Self {
        Self {
            file_set,
            ..Default::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let mut snapshot: ProgramSnapshot = serde_json::from_str(json)?;
        snapshot.rebuild_index()?;
        debug!(
            "Loaded program snapshot: {} packages, {} symbols, {} definitions, {} uses",
            snapshot.packages.len(),
            snapshot.symbols.len(),
            snapshot.defs.len(),
            snapshot.uses.len()
        );
        Ok(snapshot)
    }

    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Add a parsed file to `package`, creating the package entry on first use
    pub fn add_file(&mut self, package: PackageRef, file: File) {
        match self.packages.iter_mut().find(|p| p.package == package) {
            Some(existing) => existing.files.push(file),
            None => self.packages.push(PackageSyntax {
                package,
                files: vec![file],
            }),
        }
    }

    pub fn add_symbol(&mut self, symbol: Symbol) -> SymbolId {
        self.symbols.push(symbol);
        SymbolId(self.symbols.len() - 1)
    }

    /// Record that the identifier at `ident` defines `symbol`
    pub fn define(&mut self, ident: Pos, symbol: SymbolId) {
        self.defs.push(Binding { ident, symbol });
        self.def_index.insert(ident, symbol);
    }

    /// Record that the identifier at `ident` refers to `symbol`
    pub fn record_use(&mut self, ident: Pos, symbol: SymbolId) {
        self.uses.push(Binding { ident, symbol });
        self.use_index.insert(ident, symbol);
    }

    pub fn set_builtin(&mut self, file: File) {
        self.builtin = Some(file);
    }

    pub fn symbol(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.0)
    }

    /// Global position of a byte offset within a registered file
    pub fn pos_for(&self, path: &Path, offset: usize) -> Option<Pos> {
        let file = self.file_set.file_by_name(path)?;
        (offset <= file.size as usize).then(|| file.pos(offset))
    }

    fn rebuild_index(&mut self) -> Result<(), SnapshotError> {
        self.def_index.clear();
        self.use_index.clear();
        for (bindings, index) in [
            (&self.defs, &mut self.def_index),
            (&self.uses, &mut self.use_index),
        ] {
            for binding in bindings {
                if binding.symbol.0 >= self.symbols.len() {
                    return Err(SnapshotError::DanglingBinding {
                        ident: binding.ident,
                        symbol: binding.symbol.0,
                    });
                }
                index.insert(binding.ident, binding.symbol);
            }
        }
        Ok(())
    }
}

impl TypeCheckedProgram for ProgramSnapshot {
    fn definition(&self, ident: Pos) -> Option<&Symbol> {
        self.def_index.get(&ident).and_then(|id| self.symbol(*id))
    }

    fn use_of(&self, ident: Pos) -> Option<&Symbol> {
        self.use_index.get(&ident).and_then(|id| self.symbol(*id))
    }

    fn syntax_file(&self, package: &PackageRef, pos: Pos) -> Option<&File> {
        self.packages
            .iter()
            .find(|p| &p.package == package)?
            .files
            .iter()
            .find(|file| file.file_start <= pos && pos <= file.file_end)
    }

    fn position(&self, pos: Pos) -> Option<Position> {
        self.file_set.position(pos)
    }

    fn builtin_unit(&self) -> Option<&File> {
        self.builtin.as_ref()
    }
}
