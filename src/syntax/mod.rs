//! Syntax tree contract
//!
//! Trees are built by an external parser; this module defines their shape,
//! how positions map back to source locations, how to walk from a position
//! up to the file root, and how declarations are printed back to text.

pub mod ast;
pub mod path;
pub mod position;
pub mod printer;

pub use ast::{CommentGroup, Decl, Expr, Field, File, FuncDecl, GenDecl, Ident, Spec};
pub use path::{AncestorPath, Node};
pub use position::{FileSet, Pos, Position};
pub use printer::{DeclPrinter, PrintError, SourcePrinter};

#[cfg(test)]
pub use printer::MockDeclPrinter;
