//! Declaration rendering
//!
//! Every rendering works on a sanitized copy of the declaration: the shared
//! tree is never modified. Shapes the printer is not asked to handle, and
//! any printer failure, fall back to the symbol's own textual form.

use tracing::warn;

use crate::docs::DeclNode;
use crate::program::Symbol;
use crate::syntax::ast::{DeclToken, GenDecl, Spec, TypeSpec, ValueSpec};
use crate::syntax::{Decl, DeclPrinter, Pos};

/// Canonical declaration text for `node`, documentation and bodies removed
pub fn render<P>(printer: &P, node: DeclNode<'_>, symbol: &Symbol) -> String
where
    P: DeclPrinter + ?Sized,
{
    let sanitized = match node {
        DeclNode::Func(func) => {
            let mut copy = func.clone();
            copy.doc = None;
            copy.body = None;
            Decl::Func(copy)
        }
        // Interface methods are fields too; printing them from syntax
        // would look different from real functions.
        DeclNode::Field(_) => return symbol.to_string(),
        DeclNode::TypeSpec(spec) => Decl::Gen(standalone_type(spec)),
        DeclNode::Group(decl) => Decl::Gen(single_spec_group(decl, symbol.pos)),
        DeclNode::ValueSpec(_) | DeclNode::Other(_) => return symbol.to_string(),
    };

    match printer.print_decl(&sanitized) {
        Ok(text) => text,
        Err(e) => {
            warn!(
                "Rendering {} {} failed, using symbol form: {}",
                node.kind_name(),
                symbol.name,
                e
            );
            symbol.to_string()
        }
    }
}

/// `type` declaration holding only `spec`
fn standalone_type(spec: &TypeSpec) -> GenDecl {
    let mut copy = spec.clone();
    copy.doc = None;
    GenDecl {
        doc: None,
        tok_pos: Pos::NONE,
        tok: DeclToken::Type,
        lparen: Pos::NONE,
        specs: vec![Spec::Type(copy)],
        rparen: Pos::NONE,
    }
}

fn find_type_spec(decl: &GenDecl, pos: Pos) -> Option<&TypeSpec> {
    decl.specs.iter().find_map(|spec| match spec {
        Spec::Type(spec) if spec.name.pos == pos => Some(spec),
        _ => None,
    })
}

fn find_value_spec(decl: &GenDecl, pos: Pos) -> Option<&ValueSpec> {
    decl.specs.iter().find_map(|spec| match spec {
        Spec::Value(spec) if spec.names.iter().any(|name| name.pos == pos) => Some(spec),
        _ => None,
    })
}

/// Copy of a type or value group reduced to the spec declaring `pos`,
/// without parentheses; other groups are copied as they are
fn single_spec_group(decl: &GenDecl, pos: Pos) -> GenDecl {
    let mut copy = GenDecl {
        doc: None,
        ..decl.clone()
    };
    match decl.specs.first() {
        Some(Spec::Type(_)) => {
            if let Some(spec) = find_type_spec(decl, pos) {
                copy.specs = vec![Spec::Type(TypeSpec {
                    doc: None,
                    ..spec.clone()
                })];
            }
            copy.lparen = Pos::NONE;
            copy.rparen = Pos::NONE;
        }
        Some(Spec::Value(_)) => {
            if let Some(spec) = find_value_spec(decl, pos) {
                copy.specs = vec![Spec::Value(ValueSpec {
                    doc: None,
                    ..spec.clone()
                })];
            }
            copy.lparen = Pos::NONE;
            copy.rparen = Pos::NONE;
        }
        Some(Spec::Import(_)) | None => {}
    }
    copy
}
