//! Documentation lookup orchestration
//!
//! [`DocEngine`] ties the stages together. An identifier is resolved to a
//! symbol; import names branch to package documentation, builtins to the
//! builtin catalogue, and everything else goes through declaration lookup,
//! rendering and documentation extraction on the symbol's own syntax tree.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{Level, debug};

use crate::docs::builtin::find_builtin;
use crate::docs::{Doc, DocError, Resolution, extract_doc, locate, render, resolve};
use crate::log_timing;
use crate::packages::{FileSystemTrait, ImportResolver};
use crate::program::{Symbol, TypeCheckedProgram};
use crate::syntax::{AncestorPath, DeclPrinter, Pos, SourcePrinter};

/// Package name reported for predeclared identifiers
pub const BUILTIN_PACKAGE: &str = "builtin";

/// Resolves identifiers and import paths to documentation records
///
/// The engine holds no per-query state; the program passed to
/// [`DocEngine::ident_doc`] is only read.
#[derive(Debug, Clone)]
pub struct DocEngine<R, F, D = SourcePrinter> {
    resolver: R,
    fs: F,
    printer: D,
}

impl<R, F> DocEngine<R, F, SourcePrinter>
where
    R: ImportResolver,
    F: FileSystemTrait,
{
    pub fn new(resolver: R, fs: F) -> Self {
        Self::with_printer(resolver, fs, SourcePrinter)
    }
}

impl<R, F, D> DocEngine<R, F, D>
where
    R: ImportResolver,
    F: FileSystemTrait,
    D: DeclPrinter,
{
    pub fn with_printer(resolver: R, fs: F, printer: D) -> Self {
        Self {
            resolver,
            fs,
            printer,
        }
    }

    /// Documentation for the identifier starting at `ident`
    pub fn ident_doc<P>(&self, program: &P, ident: Pos) -> Result<Doc, DocError>
    where
        P: TypeCheckedProgram + ?Sized,
    {
        let start = Instant::now();
        let result = match resolve(program, ident)? {
            Resolution::Package { import_path } => {
                let src_dir = source_dir(program, ident);
                self.package_doc(&import_path, &src_dir)
            }
            Resolution::Symbol(symbol) if symbol.is_builtin() => self.builtin_doc(program, symbol),
            Resolution::Symbol(symbol) => self.declared_doc(program, symbol),
        };
        log_timing!(Level::DEBUG, "ident_doc", start.elapsed());
        result
    }

    /// Package-level documentation for `import_path`, resolved from `src_dir`
    pub fn package_doc(&self, import_path: &str, src_dir: &Path) -> Result<Doc, DocError> {
        let start = Instant::now();
        let result = crate::packages::package_doc(&self.resolver, &self.fs, import_path, src_dir)
            .map_err(|source| DocError::Package {
                import_path: import_path.to_string(),
                source,
            });
        log_timing!(Level::DEBUG, "package_doc", start.elapsed());
        result
    }

    fn declared_doc<P>(&self, program: &P, symbol: &Symbol) -> Result<Doc, DocError>
    where
        P: TypeCheckedProgram + ?Sized,
    {
        let unresolvable = || DocError::Unresolvable {
            name: symbol.name.clone(),
        };
        let package = symbol.package.as_ref().ok_or_else(unresolvable)?;
        let file = program
            .syntax_file(package, symbol.pos)
            .ok_or_else(unresolvable)?;

        let path = AncestorPath::enclosing(file, symbol.pos);
        let node = locate(&path).ok_or_else(unresolvable)?;
        debug!("{} is declared by a {}", symbol.name, node.kind_name());

        Ok(Doc {
            name: symbol.name.clone(),
            import_path: package.path.clone(),
            package: package.name.clone(),
            decl: render(&self.printer, node, symbol),
            doc: extract_doc(&path, symbol),
            pos: position_string(program, symbol.pos),
        })
    }

    fn builtin_doc<P>(&self, program: &P, symbol: &Symbol) -> Result<Doc, DocError>
    where
        P: TypeCheckedProgram + ?Sized,
    {
        debug!("{} is predeclared, searching the builtin unit", symbol.name);
        let not_found = || DocError::NotFound {
            name: symbol.name.clone(),
        };
        let unit = program.builtin_unit().ok_or_else(not_found)?;
        let (doc, decl) = find_builtin(&self.printer, unit, symbol).ok_or_else(not_found)?;

        Ok(Doc {
            name: symbol.name.clone(),
            import_path: String::new(),
            package: BUILTIN_PACKAGE.to_string(),
            decl: if decl.is_empty() {
                symbol.to_string()
            } else {
                decl
            },
            doc,
            pos: position_string(program, symbol.pos),
        })
    }
}

fn position_string<P>(program: &P, pos: Pos) -> String
where
    P: TypeCheckedProgram + ?Sized,
{
    if !pos.is_valid() {
        return String::new();
    }
    program
        .position(pos)
        .map(|position| position.to_string())
        .unwrap_or_default()
}

/// Directory of the file holding `ident`, used to resolve relative imports
fn source_dir<P>(program: &P, ident: Pos) -> PathBuf
where
    P: TypeCheckedProgram + ?Sized,
{
    program
        .position(ident)
        .and_then(|position| position.filename.parent().map(Path::to_path_buf))
        .unwrap_or_default()
}
