//! Documentation records
//!
//! [`Doc`] is the single output of every lookup. It serializes with the short
//! field names editor integrations expect and prints as the text block shown
//! in a hover or on a terminal.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::docs::text::{LINE_WIDTH, PRE_INDENT, to_text};

/// Shown in place of empty documentation
pub const UNDOCUMENTED: &str = "Undocumented.";

/// Documentation for one identifier or package
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doc {
    /// Simple name of the identifier
    pub name: String,
    /// Import path of the owning package; empty for builtins
    #[serde(rename = "import")]
    pub import_path: String,
    /// Short name of the owning package
    #[serde(rename = "pkg")]
    pub package: String,
    /// Declaration source without documentation or body
    pub decl: String,
    /// Documentation text; may be empty
    pub doc: String,
    /// `file:line:column` of the definition; empty without a source position
    pub pos: String,
}

impl Doc {
    /// Documentation text with the placeholder substituted for empty text
    pub fn doc_or_placeholder(&self) -> &str {
        if self.doc.is_empty() {
            UNDOCUMENTED
        } else {
            &self.doc
        }
    }

    /// Editor hover: the declaration as a fenced code block followed by the
    /// documentation
    pub fn to_hover(&self) -> lsp_types::Hover {
        let mut value = String::new();
        if !self.import_path.is_empty() {
            value.push_str(&format!("import \"{}\"\n\n", self.import_path));
        }
        value.push_str(&format!("```go\n{}\n```\n\n", self.decl));
        value.push_str(self.doc_or_placeholder());

        lsp_types::Hover {
            contents: lsp_types::HoverContents::Markup(lsp_types::MarkupContent {
                kind: lsp_types::MarkupKind::Markdown,
                value,
            }),
            range: None,
        }
    }
}

impl fmt::Display for Doc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.import_path.is_empty() {
            write!(f, "import \"{}\"\n\n", self.import_path)?;
        }
        write!(f, "{}\n\n", self.decl)?;
        f.write_str(&to_text(self.doc_or_placeholder(), "", PRE_INDENT, LINE_WIDTH))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn retries() -> Doc {
        Doc {
            name: "MaxRetries".to_string(),
            import_path: "example.com/demo".to_string(),
            package: "demo".to_string(),
            decl: "const demo.MaxRetries untyped int".to_string(),
            doc: "Max retry count.\nConstant Value: 5".to_string(),
            pos: "/src/demo/retry.go:5:2".to_string(),
        }
    }

    #[test]
    fn test_text_presentation() {
        assert_eq!(
            retries().to_string(),
            "import \"example.com/demo\"\n\nconst demo.MaxRetries untyped int\n\nMax retry count. Constant Value: 5\n"
        );
    }

    #[test]
    fn test_empty_doc_renders_placeholder_without_mutation() {
        let doc = Doc {
            name: "len".to_string(),
            package: "builtin".to_string(),
            decl: "func len(v Type) int".to_string(),
            ..Default::default()
        };
        assert_eq!(doc.to_string(), "func len(v Type) int\n\nUndocumented.\n");
        assert!(doc.doc.is_empty());
    }

    #[test]
    fn test_wire_field_names() {
        let value = serde_json::to_value(retries()).unwrap();
        let keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        for key in ["name", "import", "pkg", "decl", "doc", "pos"] {
            assert!(keys.contains(&key), "missing {key}");
        }
        assert_eq!(value["import"], "example.com/demo");

        let back: Doc = serde_json::from_value(value).unwrap();
        assert_eq!(back, retries());
    }

    #[test]
    fn test_hover_markdown() {
        let hover = retries().to_hover();
        let lsp_types::HoverContents::Markup(markup) = hover.contents else {
            panic!("expected markup hover");
        };
        assert_eq!(markup.kind, lsp_types::MarkupKind::Markdown);
        assert!(markup.value.contains("```go\nconst demo.MaxRetries untyped int\n```"));
        assert!(markup.value.ends_with("Constant Value: 5"));
    }
}
