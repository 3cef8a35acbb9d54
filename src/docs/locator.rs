//! Declaration lookup along an ancestor path

use crate::syntax::ast::{Field, FuncDecl, GenDecl, TypeSpec, ValueSpec};
use crate::syntax::{AncestorPath, Node};

/// Node shapes the documentation pipeline treats differently
#[derive(Debug, Clone, Copy)]
pub enum DeclNode<'a> {
    Func(&'a FuncDecl),
    Field(&'a Field),
    TypeSpec(&'a TypeSpec),
    ValueSpec(&'a ValueSpec),
    Group(&'a GenDecl),
    Other(Node<'a>),
}

impl<'a> DeclNode<'a> {
    /// Classify a path node; identifiers are transparent and yield `None`
    pub fn classify(node: Node<'a>) -> Option<Self> {
        Some(match node {
            Node::Ident(_) => return None,
            Node::FuncDecl(func) => DeclNode::Func(func),
            Node::Field(field) => DeclNode::Field(field),
            Node::TypeSpec(spec) => DeclNode::TypeSpec(spec),
            Node::ValueSpec(spec) => DeclNode::ValueSpec(spec),
            Node::GenDecl(decl) => DeclNode::Group(decl),
            other => DeclNode::Other(other),
        })
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            DeclNode::Func(_) => "function",
            DeclNode::Field(_) => "field",
            DeclNode::TypeSpec(_) => "type spec",
            DeclNode::ValueSpec(_) => "value spec",
            DeclNode::Group(_) => "grouped declaration",
            DeclNode::Other(node) => node.kind_name(),
        }
    }
}

/// Innermost node above the identifiers of `path`
///
/// This is the declaration introducing the identifier when there is one,
/// and otherwise the statement or expression that binds it (a local
/// assignment, for instance). `None` only when the path holds nothing but
/// identifiers, which happens when it is empty.
pub fn locate<'a>(path: &AncestorPath<'a>) -> Option<DeclNode<'a>> {
    path.iter().find_map(DeclNode::classify)
}
