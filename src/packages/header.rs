//! Package clause scanning
//!
//! Reads a source file only up to its package clause: the comments before it
//! and the declared package name. Everything after the clause is ignored, so
//! files with syntax errors further down still yield a header.

use std::path::Path;

use crate::packages::PackageError;
use crate::syntax::Pos;
use crate::syntax::ast::{Comment, CommentGroup};

/// What a file says about its package before any declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageHeader {
    pub name: String,
    /// Comment group ending on the line directly above `package`
    pub doc: Option<CommentGroup>,
}

struct RawComment {
    text: String,
    start_line: usize,
    end_line: usize,
}

pub fn scan_header(file: &Path, source: &str) -> Result<PackageHeader, PackageError> {
    let parse_error = |reason: String| PackageError::Parse {
        file: file.to_path_buf(),
        reason,
    };

    let bytes = source.as_bytes();
    let mut comments: Vec<RawComment> = Vec::new();
    let mut line = 1;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                line += 1;
                i += 1;
            }
            b if b.is_ascii_whitespace() => i += 1,
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                let end = source[i..].find('\n').map_or(bytes.len(), |rel| i + rel);
                comments.push(RawComment {
                    text: source[i..end].to_string(),
                    start_line: line,
                    end_line: line,
                });
                i = end;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                let end = source[i + 2..]
                    .find("*/")
                    .map(|rel| i + 2 + rel + 2)
                    .ok_or_else(|| parse_error(format!("comment not terminated (line {line})")))?;
                let text = &source[i..end];
                let start_line = line;
                line += text.matches('\n').count();
                comments.push(RawComment {
                    text: text.to_string(),
                    start_line,
                    end_line: line,
                });
                i = end;
            }
            _ => {
                let name = package_name(&source[i..]).ok_or_else(|| {
                    let found: String = source[i..].chars().take(16).collect();
                    parse_error(format!("expected 'package', found {found:?} (line {line})"))
                })?;
                return Ok(PackageHeader {
                    name: name.to_string(),
                    doc: lead_comment(comments, line),
                });
            }
        }
    }

    Err(parse_error("expected 'package', found EOF".to_string()))
}

/// Name from a `package name` clause at the start of `rest`
fn package_name(rest: &str) -> Option<&str> {
    let after = rest.strip_prefix("package")?;
    let name = after.trim_start_matches([' ', '\t']);
    if name.len() == after.len() {
        return None;
    }
    let len = name
        .char_indices()
        .find(|(_, c)| !(c.is_alphanumeric() || *c == '_'))
        .map_or(name.len(), |(index, _)| index);
    let name = &name[..len];
    (!name.is_empty() && !name.starts_with(|c: char| c.is_ascii_digit())).then_some(name)
}

/// Group the scanned comments and keep the group that ends right above the
/// package clause
fn lead_comment(comments: Vec<RawComment>, package_line: usize) -> Option<CommentGroup> {
    let mut groups: Vec<(usize, Vec<Comment>)> = Vec::new();
    for comment in comments {
        let entry = Comment {
            slash: Pos::NONE,
            text: comment.text,
        };
        match groups.last_mut() {
            Some((end_line, list)) if comment.start_line <= *end_line + 1 => {
                list.push(entry);
                *end_line = comment.end_line;
            }
            _ => groups.push((comment.end_line, vec![entry])),
        }
    }
    groups
        .pop()
        .filter(|(end_line, _)| end_line + 1 == package_line)
        .map(|(_, list)| CommentGroup::new(list))
}
