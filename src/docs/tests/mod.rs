//! End-to-end lookups through [`DocEngine`] over in-memory programs


use std::path::PathBuf;

use crate::docs::DocEngine;
use crate::packages::file_system::TestFileSystem;
use crate::packages::{DirImportResolver, SearchPaths};
use crate::program::{PackageRef, ProgramSnapshot, Symbol, SymbolId};
use crate::syntax::Pos;

#[cfg(feature = "test-logging")]
crate::setup_test_logging!();

pub(super) const GOROOT_SRC: &str = "/goroot/src";

pub(super) type TestEngine = DocEngine<DirImportResolver<TestFileSystem>, TestFileSystem>;

pub(super) fn demo() -> PackageRef {
    PackageRef::new("example.com/demo", "demo")
}

/// Engine resolving imports in `fs` under [`GOROOT_SRC`]
pub(super) fn engine_over(fs: &TestFileSystem) -> TestEngine {
    let resolver =
        DirImportResolver::new(fs.clone(), SearchPaths::new(vec![PathBuf::from(GOROOT_SRC)]));
    DocEngine::new(resolver, fs.clone())
}

pub(super) fn engine() -> TestEngine {
    engine_over(&TestFileSystem::new())
}

/// Register `symbol` and bind it to the identifier at `ident`
pub(super) fn define(program: &mut ProgramSnapshot, ident: Pos, symbol: Symbol) -> SymbolId {
    let id = program.add_symbol(symbol);
    program.define(ident, id);
    id
}
