//! Documentation extraction
//!
//! Walks the same ancestor path as the locator, innermost first, and picks
//! the comment that documents the symbol:
//!
//! - a function's leading comment is final;
//! - a field uses its leading comment, else its trailing one, and never
//!   inherits from the enclosing type;
//! - type and value specs use their own leading or trailing comment and
//!   otherwise inherit from the enclosing group;
//! - a group supplies its leading comment.
//!
//! Constants always get a final `Constant Value: <literal>` line.

use crate::docs::DeclNode;
use crate::program::Symbol;
use crate::syntax::AncestorPath;
use crate::syntax::ast::{CommentGroup, comment_text};

/// Documentation text for `symbol`, possibly empty
pub fn extract_doc(path: &AncestorPath<'_>, symbol: &Symbol) -> String {
    for node in path.iter() {
        let Some(node) = DeclNode::classify(node) else {
            continue;
        };
        match node {
            DeclNode::Func(func) => return comment_text(func.doc.as_ref()),
            DeclNode::Field(field) => {
                return comment_text(field.doc.as_ref().or(field.comment.as_ref()));
            }
            DeclNode::TypeSpec(spec) => {
                if let Some(group) = own_comment(spec.doc.as_ref(), spec.comment.as_ref()) {
                    return group.text();
                }
            }
            DeclNode::ValueSpec(spec) => {
                if let Some(group) = own_comment(spec.doc.as_ref(), spec.comment.as_ref()) {
                    return with_constant_value(group.text(), symbol);
                }
            }
            DeclNode::Group(decl) => {
                return with_constant_value(comment_text(decl.doc.as_ref()), symbol);
            }
            DeclNode::Other(_) => return String::new(),
        }
    }
    String::new()
}

fn own_comment<'a>(
    doc: Option<&'a CommentGroup>,
    comment: Option<&'a CommentGroup>,
) -> Option<&'a CommentGroup> {
    doc.or(comment)
}

/// Append the constant's exact value as a final line
fn with_constant_value(doc: String, symbol: &Symbol) -> String {
    let Some(value) = symbol.const_value() else {
        return doc;
    };
    let line = format!("Constant Value: {}", value.exact_string());
    if doc.is_empty() {
        line
    } else {
        format!("{doc}\n{line}")
    }
}
