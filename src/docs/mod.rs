//! Identifier documentation
//!
//! The pipeline behind a hover: resolve an identifier to its symbol, find
//! the declaration that introduces it, render that declaration without
//! documentation or bodies, and pick the comment that documents it.
//! Predeclared names are looked up in the builtin unit and import names in
//! the imported package.

pub mod builtin;
pub mod engine;
pub mod error;
pub mod extract;
pub mod locator;
pub mod record;
pub mod render;
pub mod resolver;
pub mod text;

#[cfg(test)]
mod tests;

pub use builtin::{BuiltinCatalogue, find_builtin};
pub use engine::{BUILTIN_PACKAGE, DocEngine};
pub use error::DocError;
pub use extract::extract_doc;
pub use locator::{DeclNode, locate};
pub use record::{Doc, UNDOCUMENTED};
pub use render::render;
pub use resolver::{Resolution, resolve};
