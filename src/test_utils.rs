//! Test utilities and global setup
//!
//! Provides test logging configuration and an in-memory source fixture that
//! builds syntax trees with positions computed from real source text.

/// Test logging utilities
#[cfg(all(test, feature = "test-logging"))]
pub mod logging {
    use std::sync::Once;
    use tracing_subscriber::{EnvFilter, fmt};

    static INIT: Once = Once::new();

    /// Initialize test logging globally - safe to call multiple times
    ///
    /// Respects `RUST_LOG` (default: `debug`) and writes through the test
    /// writer so output is captured per test.
    ///
    /// ```bash
    /// RUST_LOG=hoverdoc::docs=trace cargo test --features test-logging
    /// ```
    pub fn init() {
        INIT.call_once(|| {
            let env_filter =
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

            fmt()
                .with_env_filter(env_filter)
                .with_test_writer()
                .with_target(true)
                .compact()
                .try_init()
                .ok();
        });
    }
}

/// Auto-initialize test logging for every test in the invoking module
#[cfg(all(test, feature = "test-logging"))]
#[macro_export]
macro_rules! setup_test_logging {
    () => {
        #[ctor::ctor]
        fn init_test_logging() {
            $crate::test_utils::logging::init();
        }
    };
}

/// Syntax tree fixtures
///
/// Trees are assembled by hand, but every node position is looked up in the
/// fixture's source text, so position-driven code (ancestor paths, position
/// strings, group spec matching) sees exactly what a parser would produce.
/// Lookups ignore text inside `//` comments and respect word boundaries.
#[cfg(test)]
pub mod fixture {
    use std::path::{Path, PathBuf};

    use crate::syntax::ast::{
        BasicLit, BlockStmt, Comment, CommentGroup, Decl, DeclToken, Expr, Field, FieldList, File,
        FuncDecl, FuncType, GenDecl, Ident, ImportSpec, LitKind, Spec, TypeSpec, ValueSpec,
    };
    use crate::syntax::{FileSet, Pos};

    pub struct SourceFixture {
        name: PathBuf,
        source: String,
        base: u32,
        file_set: FileSet,
    }

    fn is_word(b: u8) -> bool {
        b.is_ascii_alphanumeric() || b == b'_'
    }

    fn lit_kind(text: &str) -> Option<LitKind> {
        match text.bytes().next()? {
            b'0'..=b'9' if text.contains('.') => Some(LitKind::Float),
            b'0'..=b'9' => Some(LitKind::Int),
            b'"' | b'`' => Some(LitKind::String),
            b'\'' => Some(LitKind::Char),
            _ => None,
        }
    }

    impl SourceFixture {
        /// Fixture registered with its own fresh file set
        pub fn new(name: &str, source: &str) -> Self {
            let mut file_set = FileSet::new();
            Self::new_in(&mut file_set, name, source)
        }

        /// Fixture registered with a shared file set, for multi-file programs
        pub fn new_in(file_set: &mut FileSet, name: &str, source: &str) -> Self {
            let base = file_set.add_file(name, source);
            Self {
                name: PathBuf::from(name),
                source: source.to_string(),
                base,
                file_set: file_set.clone(),
            }
        }

        /// File set as of this fixture's registration
        pub fn file_set(&self) -> FileSet {
            self.file_set.clone()
        }

        pub fn name(&self) -> &Path {
            &self.name
        }

        pub fn at(&self, offset: usize) -> Pos {
            Pos(self.base + offset as u32)
        }

        fn offset(&self, pos: Pos) -> usize {
            (pos.0 - self.base) as usize
        }

        // ------------------------------------------------------------------
        // Text search
        // ------------------------------------------------------------------

        fn in_comment(&self, offset: usize) -> bool {
            let line_start = self.source[..offset].rfind('\n').map_or(0, |i| i + 1);
            self.source[line_start..offset].contains("//")
        }

        fn code_offsets(&self, needle: &str) -> Vec<usize> {
            let bytes = self.source.as_bytes();
            let word_start = needle.bytes().next().is_some_and(is_word);
            let word_end = needle.bytes().last().is_some_and(is_word);
            self.source
                .match_indices(needle)
                .map(|(offset, _)| offset)
                .filter(|&offset| {
                    let end = offset + needle.len();
                    !(word_start && offset > 0 && is_word(bytes[offset - 1]))
                        && !(word_end && end < bytes.len() && is_word(bytes[end]))
                        && !self.in_comment(offset)
                })
                .collect()
        }

        /// Byte offset of the `nth` code occurrence of `needle`
        pub fn find(&self, needle: &str, nth: usize) -> usize {
            self.code_offsets(needle)
                .get(nth)
                .copied()
                .unwrap_or_else(|| {
                    panic!("`{needle}` #{nth} not found in {}", self.name.display())
                })
        }

        fn find_from(&self, from: usize, needle: &str) -> usize {
            self.code_offsets(needle)
                .into_iter()
                .find(|&offset| offset >= from)
                .unwrap_or_else(|| panic!("`{needle}` not found after offset {from}"))
        }

        fn rfind_before(&self, before: usize, needle: &str) -> usize {
            self.code_offsets(needle)
                .into_iter()
                .rfind(|&offset| offset < before)
                .unwrap_or_else(|| panic!("`{needle}` not found before offset {before}"))
        }

        fn skip_space(&self, from: usize) -> usize {
            let rest = &self.source[from..];
            from + (rest.len() - rest.trim_start().len())
        }

        fn matching(&self, open: usize) -> usize {
            let bytes = self.source.as_bytes();
            let (opener, closer) = match bytes[open] {
                b'(' => (b'(', b')'),
                b'{' => (b'{', b'}'),
                b'[' => (b'[', b']'),
                other => panic!("no bracket at offset {open}: {:?}", other as char),
            };
            let mut depth = 0usize;
            for (offset, b) in bytes.iter().enumerate().skip(open) {
                if *b == opener {
                    depth += 1;
                } else if *b == closer {
                    depth -= 1;
                    if depth == 0 {
                        return offset;
                    }
                }
            }
            panic!("unbalanced bracket at offset {open}")
        }

        /// Position of the `nth` code occurrence of `needle`
        pub fn pos(&self, needle: &str, nth: usize) -> Pos {
            self.at(self.find(needle, nth))
        }

        /// Position of the first code occurrence of `needle` after `anchor`
        pub fn pos_after(&self, anchor: Pos, needle: &str) -> Pos {
            self.at(self.find_from(self.offset(anchor) + 1, needle))
        }

        // ------------------------------------------------------------------
        // Leaves
        // ------------------------------------------------------------------

        pub fn ident(&self, name: &str, nth: usize) -> Ident {
            Ident::new(self.pos(name, nth), name)
        }

        pub fn ident_expr(&self, name: &str, nth: usize) -> Expr {
            Expr::Ident(self.ident(name, nth))
        }

        pub fn lit(&self, value: &str, nth: usize) -> BasicLit {
            BasicLit {
                pos: self.pos(value, nth),
                kind: lit_kind(value).unwrap_or_else(|| panic!("`{value}` is not a literal")),
                value: value.to_string(),
            }
        }

        /// Type expression such as `int`, `*Buffer`, `[]byte` or `io.Reader`
        pub fn type_at(&self, text: &str, nth: usize) -> Expr {
            self.type_expr(self.find(text, nth), text)
        }

        fn type_expr(&self, offset: usize, text: &str) -> Expr {
            if let Some(rest) = text.strip_prefix('*') {
                return Expr::Star {
                    star: self.at(offset),
                    x: Box::new(self.type_expr(offset + 1, rest)),
                };
            }
            if let Some(rest) = text.strip_prefix("[]") {
                return Expr::Array {
                    lbrack: self.at(offset),
                    len: None,
                    elt: Box::new(self.type_expr(offset + 2, rest)),
                };
            }
            if let Some(rest) = text.strip_prefix("...") {
                return Expr::Ellipsis {
                    pos: self.at(offset),
                    elt: Some(Box::new(self.type_expr(offset + 3, rest))),
                };
            }
            if let Some((package, name)) = text.split_once('.') {
                return Expr::Selector {
                    x: Box::new(Expr::Ident(Ident::new(self.at(offset), package))),
                    sel: Ident::new(self.at(offset + package.len() + 1), name),
                };
            }
            Expr::Ident(Ident::new(self.at(offset), text))
        }

        fn value_expr(&self, offset: usize, text: &str) -> Expr {
            if let Some(kind) = lit_kind(text) {
                return Expr::BasicLit(BasicLit {
                    pos: self.at(offset),
                    kind,
                    value: text.to_string(),
                });
            }
            if let [x, op, y] = text.split(' ').collect::<Vec<_>>()[..] {
                let op_offset = offset + x.len() + 1;
                return Expr::Binary {
                    x: Box::new(self.value_expr(offset, x)),
                    op_pos: self.at(op_offset),
                    op: op.to_string(),
                    y: Box::new(self.value_expr(op_offset + op.len() + 1, y)),
                };
            }
            Expr::Ident(Ident::new(self.at(offset), text))
        }

        /// Comment group made of the given full comment lines (`// ...`)
        pub fn doc(&self, lines: &[&str]) -> Option<CommentGroup> {
            let mut from = 0;
            let list = lines
                .iter()
                .map(|line| {
                    let offset = self.source[from..]
                        .find(line)
                        .map(|i| i + from)
                        .unwrap_or_else(|| panic!("comment `{line}` not found"));
                    from = offset + line.len();
                    Comment {
                        slash: self.at(offset),
                        text: line.to_string(),
                    }
                })
                .collect();
            Some(CommentGroup::new(list))
        }

        // ------------------------------------------------------------------
        // Files and declarations
        // ------------------------------------------------------------------

        pub fn file(&self, decls: Vec<Decl>) -> File {
            let package = self.find("package", 0);
            let name_offset = self.skip_space(package + "package".len());
            let name_len = self.source[name_offset..]
                .bytes()
                .take_while(|b| is_word(*b))
                .count();
            File {
                doc: None,
                file_start: self.at(0),
                package: self.at(package),
                name: Ident::new(
                    self.at(name_offset),
                    &self.source[name_offset..name_offset + name_len],
                ),
                decls,
                comments: Vec::new(),
                file_end: self.at(self.source.len()),
            }
        }

        pub fn file_with_doc(&self, doc: Option<CommentGroup>, decls: Vec<Decl>) -> File {
            let mut file = self.file(decls);
            file.comments.extend(doc.clone());
            file.doc = doc;
            file
        }

        /// Declaration introduced by the keyword preceding the first spec,
        /// parenthesized when the keyword is followed by `(`
        pub fn gen_decl(
            &self,
            tok: DeclToken,
            doc: Option<CommentGroup>,
            specs: Vec<Spec>,
        ) -> GenDecl {
            let first = specs
                .first()
                .map(Spec::pos)
                .unwrap_or_else(|| panic!("{} declaration without specs", tok.keyword()));
            let tok_offset = self.rfind_before(self.offset(first), tok.keyword());
            let after = self.skip_space(tok_offset + tok.keyword().len());
            let (lparen, rparen) = if self.source.as_bytes()[after] == b'(' {
                (self.at(after), self.at(self.matching(after)))
            } else {
                (Pos::NONE, Pos::NONE)
            };
            GenDecl {
                doc,
                tok_pos: self.at(tok_offset),
                tok,
                lparen,
                specs,
                rparen,
            }
        }

        pub fn const_group(&self, doc: Option<CommentGroup>, specs: Vec<ValueSpec>) -> GenDecl {
            self.gen_decl(
                DeclToken::Const,
                doc,
                specs.into_iter().map(Spec::Value).collect(),
            )
        }

        pub fn var_group(&self, doc: Option<CommentGroup>, specs: Vec<ValueSpec>) -> GenDecl {
            self.gen_decl(
                DeclToken::Var,
                doc,
                specs.into_iter().map(Spec::Value).collect(),
            )
        }

        pub fn type_decl(&self, doc: Option<CommentGroup>, spec: TypeSpec) -> GenDecl {
            self.gen_decl(DeclToken::Type, doc, vec![Spec::Type(spec)])
        }

        pub fn type_group(&self, doc: Option<CommentGroup>, specs: Vec<TypeSpec>) -> GenDecl {
            self.gen_decl(
                DeclToken::Type,
                doc,
                specs.into_iter().map(Spec::Type).collect(),
            )
        }

        pub fn import_decl(&self, specs: Vec<ImportSpec>) -> GenDecl {
            self.gen_decl(
                DeclToken::Import,
                None,
                specs.into_iter().map(Spec::Import).collect(),
            )
        }

        pub fn import_spec(&self, alias: Option<&str>, path: &str) -> ImportSpec {
            let quoted = format!("\"{path}\"");
            ImportSpec {
                doc: None,
                name: alias.map(|alias| self.ident(alias, 0)),
                path: BasicLit {
                    pos: self.pos(&quoted, 0),
                    kind: LitKind::String,
                    value: quoted,
                },
                comment: None,
            }
        }

        /// `name = value` spec without a declared type
        pub fn value_spec(&self, name: &str, value: &str) -> ValueSpec {
            self.values_spec(&[name], None, &[value])
        }

        /// Value spec with names, an optional type and values, each located
        /// after the previous part
        pub fn values_spec(&self, names: &[&str], ty: Option<&str>, values: &[&str]) -> ValueSpec {
            let names: Vec<Ident> = names.iter().map(|name| self.ident(name, 0)).collect();
            let mut cursor = names.last().map_or(0, |name| self.offset(name.end()));
            let ty = ty.map(|ty| {
                let offset = self.find_from(cursor, ty);
                cursor = offset + ty.len();
                self.type_expr(offset, ty)
            });
            let values = values
                .iter()
                .map(|value| {
                    let offset = self.find_from(cursor, value);
                    cursor = offset + value.len();
                    self.value_expr(offset, value)
                })
                .collect();
            ValueSpec {
                doc: None,
                names,
                ty,
                values,
                comment: None,
            }
        }

        /// Named field (or parameter); an empty `names` makes it embedded
        pub fn field(&self, names: &[&str], ty: Expr) -> Field {
            Field {
                doc: None,
                names: names.iter().map(|name| self.ident(name, 0)).collect(),
                ty,
                tag: None,
                comment: None,
            }
        }

        pub fn embedded_field(&self, ty: Expr) -> Field {
            self.field(&[], ty)
        }

        pub fn type_spec(&self, name: &str, ty: Expr) -> TypeSpec {
            TypeSpec {
                doc: None,
                name: self.ident(name, 0),
                type_params: None,
                assign: Pos::NONE,
                ty,
                comment: None,
            }
        }

        pub fn struct_type_spec(&self, name: &str, fields: Vec<Field>) -> TypeSpec {
            let name = self.ident(name, 0);
            let keyword = self.find_from(self.offset(name.end()), "struct");
            let fields = self.braced_fields(keyword, fields);
            TypeSpec {
                doc: None,
                name,
                type_params: None,
                assign: Pos::NONE,
                ty: Expr::Struct {
                    struct_pos: self.at(keyword),
                    fields,
                },
                comment: None,
            }
        }

        pub fn interface_type_spec(&self, name: &str, methods: Vec<Field>) -> TypeSpec {
            let name = self.ident(name, 0);
            let keyword = self.find_from(self.offset(name.end()), "interface");
            let methods = self.braced_fields(keyword, methods);
            TypeSpec {
                doc: None,
                name,
                type_params: None,
                assign: Pos::NONE,
                ty: Expr::Interface {
                    interface: self.at(keyword),
                    methods,
                },
                comment: None,
            }
        }

        fn braced_fields(&self, keyword: usize, list: Vec<Field>) -> FieldList {
            let open = self.find_from(keyword, "{");
            FieldList {
                opening: self.at(open),
                list,
                closing: self.at(self.matching(open)),
            }
        }

        /// Interface method `Name(params) results`
        pub fn method_field(&self, name: &str) -> Field {
            let name = self.ident(name, 0);
            let open = self.find_from(self.offset(name.end()), "(");
            let close = self.matching(open);
            Field {
                doc: None,
                names: vec![name],
                ty: Expr::Func(FuncType {
                    func: Pos::NONE,
                    type_params: None,
                    params: self.paren_fields(open, close),
                    results: self.results_after(close),
                }),
                tag: None,
                comment: None,
            }
        }

        /// Function or method declaration; receiver, parameters and results
        /// are read from the source text
        pub fn func_decl(&self, doc: Option<CommentGroup>, name: &str, with_body: bool) -> FuncDecl {
            let name = self.ident(name, 0);
            let name_offset = self.offset(name.pos);
            let func = self.rfind_before(name_offset, "func");
            let recv = self.source[func + 4..name_offset]
                .find('(')
                .map(|rel| {
                    let open = func + 4 + rel;
                    self.paren_fields(open, self.matching(open))
                });
            let open = self.find_from(self.offset(name.end()), "(");
            let close = self.matching(open);
            let results = self.results_after(close);
            let body = with_body.then(|| {
                let lbrace = self.find_from(close, "{");
                BlockStmt {
                    lbrace: self.at(lbrace),
                    list: Vec::new(),
                    rbrace: self.at(self.matching(lbrace)),
                }
            });
            FuncDecl {
                doc,
                recv,
                name,
                ty: FuncType {
                    func: self.at(func),
                    type_params: None,
                    params: self.paren_fields(open, close),
                    results,
                },
                body,
            }
        }

        fn paren_fields(&self, open: usize, close: usize) -> FieldList {
            let mut list = Vec::new();
            let mut offset = open + 1;
            for piece in self.source[open + 1..close].split(',') {
                let start = offset + (piece.len() - piece.trim_start().len());
                offset += piece.len() + 1;
                let text = piece.trim();
                if text.is_empty() {
                    continue;
                }
                let field = match text.split_once(' ') {
                    Some((name, ty)) => {
                        let ty = ty.trim_start();
                        let ty_offset = start + text.len() - ty.len();
                        Field {
                            doc: None,
                            names: vec![Ident::new(self.at(start), name)],
                            ty: self.type_expr(ty_offset, ty),
                            tag: None,
                            comment: None,
                        }
                    }
                    None => self.embedded_field(self.type_expr(start, text)),
                };
                list.push(field);
            }
            FieldList {
                opening: self.at(open),
                list,
                closing: self.at(close),
            }
        }

        fn results_after(&self, close: usize) -> Option<FieldList> {
            let rest = &self.source[close + 1..];
            let text = &rest[..rest.find(['{', '\n']).unwrap_or(rest.len())];
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return None;
            }
            let start = close + 1 + (text.len() - text.trim_start().len());
            if trimmed.starts_with('(') {
                return Some(self.paren_fields(start, self.matching(start)));
            }
            Some(FieldList {
                opening: Pos::NONE,
                list: vec![self.embedded_field(self.type_expr(start, trimmed))],
                closing: Pos::NONE,
            })
        }
    }
}
