//! Hover documentation for identifiers in type-checked Go programs
//!
//! Given a program that has already been parsed and type checked, find the
//! declaration text and documentation comment of the symbol an identifier
//! refers to. See [`docs::DocEngine`] for the entry point.

pub mod docs;
pub mod logging;
pub mod packages;
pub mod program;
pub mod syntax;

#[cfg(test)]
mod test_utils;
