//! Resolved symbols
//!
//! A [`Symbol`] is what the type checker bound a name to: its kind, its
//! defining position and the package that owns it. Symbols without a
//! package are predeclared builtins.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::syntax::Pos;

/// A package as seen by the type checker
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageRef {
    /// Import path, e.g. `net/http`
    pub path: String,
    /// Declared package name, e.g. `http`
    pub name: String,
}

impl PackageRef {
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
        }
    }
}

/// Exact value of a constant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ConstValue {
    Bool(bool),
    Int(#[serde(with = "exact_int")] i128),
    Float(f64),
    String(String),
    Rune(char),
}

impl ConstValue {
    /// Literal form of the value as it would be written in source
    pub fn exact_string(&self) -> String {
        match self {
            ConstValue::Bool(value) => value.to_string(),
            ConstValue::Int(value) => value.to_string(),
            ConstValue::Float(value) => {
                let text = value.to_string();
                if value.is_finite() && !text.contains(['.', 'e', 'E']) {
                    format!("{text}.0")
                } else {
                    text
                }
            }
            ConstValue::String(value) => quote(value, '"'),
            ConstValue::Rune(value) => quote(&value.to_string(), '\''),
        }
    }
}

/// Integer constants travel as numbers when they fit in 64 bits and as
/// decimal strings otherwise. Tagged and flattened data is buffered by serde
/// without `i128` support.
mod exact_int {
    use std::fmt;

    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &i128, serializer: S) -> Result<S::Ok, S::Error> {
        if let Ok(value) = i64::try_from(*value) {
            serializer.serialize_i64(value)
        } else if let Ok(value) = u64::try_from(*value) {
            serializer.serialize_u64(value)
        } else {
            serializer.collect_str(value)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i128, D::Error> {
        deserializer.deserialize_any(ExactIntVisitor)
    }

    struct ExactIntVisitor;

    impl Visitor<'_> for ExactIntVisitor {
        type Value = i128;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an integer or a decimal integer string")
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<i128, E> {
            Ok(value.into())
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<i128, E> {
            Ok(value.into())
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<i128, E> {
            value
                .parse()
                .map_err(|_| E::invalid_value(de::Unexpected::Str(value), &self))
        }
    }
}

fn quote(value: &str, delimiter: char) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push(delimiter);
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c == delimiter => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push(delimiter);
    out
}

/// What kind of entity a symbol names, with the type information needed to
/// print it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SymbolKind {
    Func {
        /// Receiver type for methods, e.g. `*demo.Buffer`
        #[serde(default, skip_serializing_if = "Option::is_none")]
        recv: Option<String>,
        /// Parameters and results, e.g. `(p []byte) (n int, err error)`
        signature: String,
    },
    TypeName {
        underlying: String,
    },
    Const {
        ty: String,
        value: ConstValue,
    },
    Var {
        ty: String,
        #[serde(default)]
        is_field: bool,
        /// Embedded field introduced by naming its type
        #[serde(default)]
        anonymous: bool,
    },
    /// Import bound in a file scope, possibly under a local alias
    PkgName {
        imported: PackageRef,
    },
    /// Predeclared function such as `len` or `append`
    Builtin,
    Nil,
}

impl SymbolKind {
    pub fn is_const(&self) -> bool {
        matches!(self, SymbolKind::Const { .. })
    }
}

/// A name as resolved by the type checker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symbol {
    pub name: String,
    #[serde(flatten)]
    pub kind: SymbolKind,
    /// Defining position; `Pos::NONE` for predeclared names
    #[serde(default)]
    pub pos: Pos,
    /// Owning package; `None` for predeclared names
    #[serde(default)]
    pub package: Option<PackageRef>,
    /// Declared at package scope (printed qualified with the package name)
    #[serde(default)]
    pub package_level: bool,
}

impl Symbol {
    pub fn new(name: impl Into<String>, kind: SymbolKind, pos: Pos) -> Self {
        Self {
            name: name.into(),
            kind,
            pos,
            package: None,
            package_level: false,
        }
    }

    /// Attach the symbol to a package scope
    pub fn in_package(mut self, package: PackageRef) -> Self {
        self.package = Some(package);
        self.package_level = true;
        self
    }

    /// Attach the symbol to a package without making it package-level
    /// (fields, methods, locals)
    pub fn local_to(mut self, package: PackageRef) -> Self {
        self.package = Some(package);
        self.package_level = false;
        self
    }

    pub fn is_builtin(&self) -> bool {
        self.package.is_none()
    }

    /// Const value, when the symbol is a constant
    pub fn const_value(&self) -> Option<&ConstValue> {
        match &self.kind {
            SymbolKind::Const { value, .. } => Some(value),
            _ => None,
        }
    }

    fn write_name(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.package {
            Some(package) if self.package_level => write!(f, "{}.{}", package.name, self.name),
            _ => f.write_str(&self.name),
        }
    }
}

/// Default textual identity of a symbol, used whenever its declaration
/// cannot be rendered from syntax
impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            SymbolKind::Func { recv, signature } => {
                f.write_str("func ")?;
                if let Some(recv) = recv {
                    write!(f, "({recv}).")?;
                    f.write_str(&self.name)?;
                } else {
                    self.write_name(f)?;
                }
                f.write_str(signature)
            }
            SymbolKind::TypeName { underlying } => {
                f.write_str("type ")?;
                self.write_name(f)?;
                write!(f, " {underlying}")
            }
            SymbolKind::Const { ty, .. } => {
                f.write_str("const ")?;
                self.write_name(f)?;
                write!(f, " {ty}")
            }
            SymbolKind::Var { ty, is_field, .. } => {
                f.write_str(if *is_field { "field " } else { "var " })?;
                self.write_name(f)?;
                write!(f, " {ty}")
            }
            SymbolKind::PkgName { imported } => {
                write!(f, "package {}", self.name)?;
                if imported.name != self.name {
                    write!(f, " ({:?})", imported.path)?;
                }
                Ok(())
            }
            SymbolKind::Builtin => write!(f, "builtin {}", self.name),
            SymbolKind::Nil => f.write_str("nil"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo() -> PackageRef {
        PackageRef::new("example.com/demo", "demo")
    }

    #[test]
    fn test_package_level_symbols_are_qualified() {
        let func = Symbol::new(
            "Run",
            SymbolKind::Func {
                recv: None,
                signature: "(ctx Context) error".to_string(),
            },
            Pos(12),
        )
        .in_package(demo());
        assert_eq!(func.to_string(), "func demo.Run(ctx Context) error");

        let constant = Symbol::new(
            "MaxRetries",
            SymbolKind::Const {
                ty: "untyped int".to_string(),
                value: ConstValue::Int(5),
            },
            Pos(30),
        )
        .in_package(demo());
        assert_eq!(constant.to_string(), "const demo.MaxRetries untyped int");
        assert!(constant.kind.is_const());
    }

    #[test]
    fn test_fields_and_methods_are_not_qualified() {
        let field = Symbol::new(
            "X",
            SymbolKind::Var {
                ty: "int".to_string(),
                is_field: true,
                anonymous: false,
            },
            Pos(40),
        )
        .local_to(demo());
        assert_eq!(field.to_string(), "field X int");

        let method = Symbol::new(
            "Len",
            SymbolKind::Func {
                recv: Some("*demo.Buffer".to_string()),
                signature: "() int".to_string(),
            },
            Pos(50),
        )
        .local_to(demo());
        assert_eq!(method.to_string(), "func (*demo.Buffer).Len() int");
    }

    #[test]
    fn test_package_alias_shows_import_path() {
        let alias = Symbol::new(
            "str",
            SymbolKind::PkgName {
                imported: PackageRef::new("strings", "strings"),
            },
            Pos(8),
        )
        .local_to(demo());
        assert_eq!(alias.to_string(), "package str (\"strings\")");

        let plain = Symbol::new(
            "strings",
            SymbolKind::PkgName {
                imported: PackageRef::new("strings", "strings"),
            },
            Pos(8),
        );
        assert_eq!(plain.to_string(), "package strings");
    }

    #[test]
    fn test_builtins_have_no_package() {
        let len = Symbol::new("len", SymbolKind::Builtin, Pos::NONE);
        assert!(len.is_builtin());
        assert_eq!(len.to_string(), "builtin len");
        assert_eq!(Symbol::new("nil", SymbolKind::Nil, Pos::NONE).to_string(), "nil");
    }

    #[test]
    fn test_exact_strings() {
        assert_eq!(ConstValue::Int(-42).exact_string(), "-42");
        assert_eq!(ConstValue::Bool(true).exact_string(), "true");
        assert_eq!(ConstValue::Float(2.5).exact_string(), "2.5");
        assert_eq!(ConstValue::Float(3.0).exact_string(), "3.0");
        assert_eq!(
            ConstValue::String("say \"hi\"\n".to_string()).exact_string(),
            "\"say \\\"hi\\\"\\n\""
        );
        assert_eq!(ConstValue::Rune('x').exact_string(), "'x'");
    }

    #[test]
    fn test_symbol_json_shape() {
        let json = r#"{
            "name": "Timeout",
            "kind": "const",
            "ty": "time.Duration",
            "value": {"kind": "int", "value": 30},
            "pos": 17,
            "package": {"path": "example.com/demo", "name": "demo"},
            "package_level": true
        }"#;
        let symbol: Symbol = serde_json::from_str(json).unwrap();
        assert_eq!(symbol.const_value(), Some(&ConstValue::Int(30)));
        assert_eq!(symbol.pos, Pos(17));
        assert_eq!(symbol.to_string(), "const demo.Timeout time.Duration");
    }

    #[test]
    fn test_wide_integer_constants_survive_json() {
        for value in [5, -1, i128::from(u64::MAX), i128::from(u64::MAX) + 1, i128::MIN] {
            let symbol = Symbol::new(
                "Big",
                SymbolKind::Const {
                    ty: "untyped int".to_string(),
                    value: ConstValue::Int(value),
                },
                Pos(4),
            )
            .in_package(demo());
            let json = serde_json::to_string(&symbol).unwrap();
            let reloaded: Symbol = serde_json::from_str(&json).unwrap();
            assert_eq!(reloaded.const_value(), Some(&ConstValue::Int(value)), "{json}");
        }

        let json = r#"{"name": "Huge", "kind": "const", "ty": "untyped int",
            "value": {"kind": "int", "value": "-170141183460469231731687303715884105728"}}"#;
        let symbol: Symbol = serde_json::from_str(json).unwrap();
        assert_eq!(symbol.const_value(), Some(&ConstValue::Int(i128::MIN)));
    }
}
