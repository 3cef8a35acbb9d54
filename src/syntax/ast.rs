//! Declaration-level syntax tree
//!
//! The tree is produced by an external parser and owned by the compilation
//! unit it belongs to. Nothing in this crate mutates a tree in place: code
//! that needs a modified node (the declaration renderer) clones it first.
//!
//! The node set covers what documentation lookup needs to see: every
//! declaration shape, type expressions, the expressions that appear in value
//! specs, and the handful of statements that introduce local names.

use serde::{Deserialize, Serialize};

use crate::syntax::position::Pos;

// ============================================================================
// Comments
// ============================================================================

/// A single `//` or `/* */` comment, markers included
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub slash: Pos,
    pub text: String,
}

/// A sequence of comments with no other tokens and no empty lines between
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentGroup {
    pub list: Vec<Comment>,
}

impl CommentGroup {
    pub fn new(list: Vec<Comment>) -> Self {
        Self { list }
    }

    /// Text of the comment group with comment markers removed
    ///
    /// Leading and trailing blank lines are dropped and interior runs of
    /// blank lines collapse into one. Tool directives (`//go:...`,
    /// `//line ...`) are not part of the text. The result has no trailing
    /// newline.
    pub fn text(&self) -> String {
        let mut lines: Vec<String> = Vec::new();
        for comment in &self.list {
            let raw = comment.text.as_str();
            if let Some(body) = raw.strip_prefix("//") {
                if is_directive(body) {
                    continue;
                }
                lines.push(body.strip_prefix(' ').unwrap_or(body).to_string());
            } else if let Some(body) = raw.strip_prefix("/*") {
                let body = body.strip_suffix("*/").unwrap_or(body);
                lines.extend(body.split('\n').map(str::to_string));
            } else {
                lines.push(raw.to_string());
            }
        }

        let mut out: Vec<String> = Vec::with_capacity(lines.len());
        for line in lines {
            let line = line.trim_end().to_string();
            let previous_blank = out.last().is_some_and(|last| last.is_empty());
            if !line.is_empty() || (!out.is_empty() && !previous_blank) {
                out.push(line);
            }
        }
        while out.last().is_some_and(|last| last.is_empty()) {
            out.pop();
        }
        out.join("\n")
    }
}

fn is_directive(body: &str) -> bool {
    if body.starts_with("line ") {
        return true;
    }
    // `//go:generate`, `//lint:ignore` style: lowercase word, colon, no space
    match body.split_once(':') {
        Some((word, rest)) => {
            !word.is_empty()
                && word.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
                && rest.starts_with(|c: char| c.is_ascii_alphabetic())
        }
        None => false,
    }
}

/// Text of an optional comment group, empty when absent
pub fn comment_text(group: Option<&CommentGroup>) -> String {
    group.map(CommentGroup::text).unwrap_or_default()
}

// ============================================================================
// Leaves
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ident {
    pub pos: Pos,
    pub name: String,
}

impl Ident {
    pub fn new(pos: Pos, name: impl Into<String>) -> Self {
        Self {
            pos,
            name: name.into(),
        }
    }

    pub fn end(&self) -> Pos {
        self.pos.advance(self.name.len())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LitKind {
    Int,
    Float,
    Imag,
    Char,
    String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicLit {
    pub pos: Pos,
    pub kind: LitKind,
    /// Literal as written in source, quotes included
    pub value: String,
}

impl BasicLit {
    pub fn end(&self) -> Pos {
        self.pos.advance(self.value.len())
    }
}

/// Placeholder for source the parser could not make sense of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadNode {
    pub from: Pos,
    pub to: Pos,
}

// ============================================================================
// File and declarations
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    pub doc: Option<CommentGroup>,
    pub file_start: Pos,
    pub package: Pos,
    pub name: Ident,
    pub decls: Vec<Decl>,
    #[serde(default)]
    pub comments: Vec<CommentGroup>,
    pub file_end: Pos,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum Decl {
    Func(FuncDecl),
    Gen(GenDecl),
    Bad(BadNode),
}

impl Decl {
    pub fn pos(&self) -> Pos {
        match self {
            Decl::Func(func) => func.pos(),
            Decl::Gen(decl) => decl.tok_pos,
            Decl::Bad(bad) => bad.from,
        }
    }

    pub fn end(&self) -> Pos {
        match self {
            Decl::Func(func) => func.end(),
            Decl::Gen(decl) => decl.end(),
            Decl::Bad(bad) => bad.to,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuncDecl {
    pub doc: Option<CommentGroup>,
    pub recv: Option<FieldList>,
    pub name: Ident,
    pub ty: FuncType,
    pub body: Option<BlockStmt>,
}

impl FuncDecl {
    pub fn pos(&self) -> Pos {
        self.ty.pos()
    }

    pub fn end(&self) -> Pos {
        match &self.body {
            Some(body) => body.end(),
            None => self.ty.end(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclToken {
    Import,
    Const,
    Type,
    Var,
}

impl DeclToken {
    pub fn keyword(self) -> &'static str {
        match self {
            DeclToken::Import => "import",
            DeclToken::Const => "const",
            DeclToken::Type => "type",
            DeclToken::Var => "var",
        }
    }
}

/// `import`, `const`, `type` or `var` declaration, parenthesized or not
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenDecl {
    pub doc: Option<CommentGroup>,
    pub tok_pos: Pos,
    pub tok: DeclToken,
    /// `Pos::NONE` when the declaration is not parenthesized
    pub lparen: Pos,
    pub specs: Vec<Spec>,
    pub rparen: Pos,
}

impl GenDecl {
    pub fn is_grouped(&self) -> bool {
        self.lparen.is_valid()
    }

    pub fn end(&self) -> Pos {
        if self.rparen.is_valid() {
            return self.rparen.advance(1);
        }
        self.specs
            .last()
            .map(Spec::end)
            .unwrap_or_else(|| self.tok_pos.advance(self.tok.keyword().len()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum Spec {
    Import(ImportSpec),
    Value(ValueSpec),
    Type(TypeSpec),
}

impl Spec {
    pub fn pos(&self) -> Pos {
        match self {
            Spec::Import(spec) => spec.pos(),
            Spec::Value(spec) => spec.pos(),
            Spec::Type(spec) => spec.name.pos,
        }
    }

    pub fn end(&self) -> Pos {
        match self {
            Spec::Import(spec) => spec.path.end(),
            Spec::Value(spec) => spec.end(),
            Spec::Type(spec) => spec.ty.end(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSpec {
    pub doc: Option<CommentGroup>,
    pub name: Option<Ident>,
    pub path: BasicLit,
    pub comment: Option<CommentGroup>,
}

impl ImportSpec {
    pub fn pos(&self) -> Pos {
        self.name.as_ref().map_or(self.path.pos, |name| name.pos)
    }

    /// Import path with the surrounding quotes removed
    pub fn import_path(&self) -> &str {
        let value = self.path.value.as_str();
        value
            .strip_prefix(['"', '`'])
            .and_then(|rest| rest.strip_suffix(['"', '`']))
            .unwrap_or(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueSpec {
    pub doc: Option<CommentGroup>,
    pub names: Vec<Ident>,
    pub ty: Option<Expr>,
    pub values: Vec<Expr>,
    pub comment: Option<CommentGroup>,
}

impl ValueSpec {
    pub fn pos(&self) -> Pos {
        self.names.first().map_or(Pos::NONE, |name| name.pos)
    }

    pub fn end(&self) -> Pos {
        if let Some(value) = self.values.last() {
            return value.end();
        }
        if let Some(ty) = &self.ty {
            return ty.end();
        }
        self.names.last().map_or(Pos::NONE, Ident::end)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSpec {
    pub doc: Option<CommentGroup>,
    pub name: Ident,
    pub type_params: Option<FieldList>,
    /// Position of `=` for alias declarations, `Pos::NONE` otherwise
    pub assign: Pos,
    pub ty: Expr,
    pub comment: Option<CommentGroup>,
}

// ============================================================================
// Fields
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldList {
    pub opening: Pos,
    pub list: Vec<Field>,
    pub closing: Pos,
}

impl FieldList {
    pub fn pos(&self) -> Pos {
        if self.opening.is_valid() {
            return self.opening;
        }
        self.list.first().map_or(Pos::NONE, Field::pos)
    }

    pub fn end(&self) -> Pos {
        if self.closing.is_valid() {
            return self.closing.advance(1);
        }
        self.list.last().map_or(Pos::NONE, Field::end)
    }

    /// Number of declared entries, counting each name of a multi-name field
    pub fn num_fields(&self) -> usize {
        self.list.iter().map(|field| field.names.len().max(1)).sum()
    }
}

/// Struct field, interface method, parameter or result
///
/// A field without names is an embedded (anonymous) field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub doc: Option<CommentGroup>,
    pub names: Vec<Ident>,
    pub ty: Expr,
    pub tag: Option<BasicLit>,
    pub comment: Option<CommentGroup>,
}

impl Field {
    pub fn pos(&self) -> Pos {
        self.names.first().map_or_else(|| self.ty.pos(), |name| name.pos)
    }

    pub fn end(&self) -> Pos {
        match &self.tag {
            Some(tag) => tag.end(),
            None => self.ty.end(),
        }
    }
}

// ============================================================================
// Expressions and types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuncType {
    /// Position of the `func` keyword; `Pos::NONE` for interface methods
    pub func: Pos,
    pub type_params: Option<FieldList>,
    pub params: FieldList,
    pub results: Option<FieldList>,
}

impl FuncType {
    pub fn pos(&self) -> Pos {
        if self.func.is_valid() {
            self.func
        } else {
            self.params.pos()
        }
    }

    pub fn end(&self) -> Pos {
        match &self.results {
            Some(results) => results.end(),
            None => self.params.end(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum Expr {
    Ident(Ident),
    BasicLit(BasicLit),
    Ellipsis {
        pos: Pos,
        elt: Option<Box<Expr>>,
    },
    Paren {
        lparen: Pos,
        x: Box<Expr>,
        rparen: Pos,
    },
    Selector {
        x: Box<Expr>,
        sel: Ident,
    },
    Index {
        x: Box<Expr>,
        lbrack: Pos,
        indices: Vec<Expr>,
        rbrack: Pos,
    },
    Call {
        fun: Box<Expr>,
        lparen: Pos,
        args: Vec<Expr>,
        rparen: Pos,
    },
    Star {
        star: Pos,
        x: Box<Expr>,
    },
    Unary {
        op_pos: Pos,
        op: String,
        x: Box<Expr>,
    },
    Binary {
        x: Box<Expr>,
        op_pos: Pos,
        op: String,
        y: Box<Expr>,
    },
    CompositeLit {
        ty: Option<Box<Expr>>,
        lbrace: Pos,
        elts: Vec<Expr>,
        rbrace: Pos,
    },
    KeyValue {
        key: Box<Expr>,
        colon: Pos,
        value: Box<Expr>,
    },
    Array {
        lbrack: Pos,
        len: Option<Box<Expr>>,
        elt: Box<Expr>,
    },
    Struct {
        struct_pos: Pos,
        fields: FieldList,
    },
    Func(FuncType),
    Interface {
        interface: Pos,
        methods: FieldList,
    },
    Map {
        map: Pos,
        key: Box<Expr>,
        value: Box<Expr>,
    },
    Chan {
        begin: Pos,
        dir: ChanDir,
        value: Box<Expr>,
    },
    Bad(BadNode),
}

impl Expr {
    pub fn pos(&self) -> Pos {
        match self {
            Expr::Ident(ident) => ident.pos,
            Expr::BasicLit(lit) => lit.pos,
            Expr::Ellipsis { pos, .. } => *pos,
            Expr::Paren { lparen, .. } => *lparen,
            Expr::Selector { x, .. } => x.pos(),
            Expr::Index { x, .. } => x.pos(),
            Expr::Call { fun, .. } => fun.pos(),
            Expr::Star { star, .. } => *star,
            Expr::Unary { op_pos, .. } => *op_pos,
            Expr::Binary { x, .. } => x.pos(),
            Expr::CompositeLit { ty, lbrace, .. } => {
                ty.as_ref().map_or(*lbrace, |ty| ty.pos())
            }
            Expr::KeyValue { key, .. } => key.pos(),
            Expr::Array { lbrack, .. } => *lbrack,
            Expr::Struct { struct_pos, .. } => *struct_pos,
            Expr::Func(func) => func.pos(),
            Expr::Interface { interface, .. } => *interface,
            Expr::Map { map, .. } => *map,
            Expr::Chan { begin, .. } => *begin,
            Expr::Bad(bad) => bad.from,
        }
    }

    pub fn end(&self) -> Pos {
        match self {
            Expr::Ident(ident) => ident.end(),
            Expr::BasicLit(lit) => lit.end(),
            Expr::Ellipsis { pos, elt } => elt.as_ref().map_or(pos.advance(3), |elt| elt.end()),
            Expr::Paren { rparen, .. } => rparen.advance(1),
            Expr::Selector { sel, .. } => sel.end(),
            Expr::Index { rbrack, .. } => rbrack.advance(1),
            Expr::Call { rparen, .. } => rparen.advance(1),
            Expr::Star { x, .. } | Expr::Unary { x, .. } => x.end(),
            Expr::Binary { y, .. } => y.end(),
            Expr::CompositeLit { rbrace, .. } => rbrace.advance(1),
            Expr::KeyValue { value, .. } => value.end(),
            Expr::Array { elt, .. } => elt.end(),
            Expr::Struct { fields, .. } => fields.end(),
            Expr::Func(func) => func.end(),
            Expr::Interface { methods, .. } => methods.end(),
            Expr::Map { value, .. } | Expr::Chan { value, .. } => value.end(),
            Expr::Bad(bad) => bad.to,
        }
    }

    /// Name of the type this expression denotes, looking through pointers
    /// and slices; `None` for qualified or composite types
    pub fn base_type_name(&self) -> Option<&str> {
        match self {
            Expr::Ident(ident) => Some(ident.name.as_str()),
            Expr::Star { x, .. } | Expr::Paren { x, .. } => x.base_type_name(),
            Expr::Array { elt, .. } => elt.base_type_name(),
            Expr::Index { x, .. } => x.base_type_name(),
            _ => None,
        }
    }
}

// ============================================================================
// Statements
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockStmt {
    pub lbrace: Pos,
    pub list: Vec<Stmt>,
    pub rbrace: Pos,
}

impl BlockStmt {
    pub fn end(&self) -> Pos {
        self.rbrace.advance(1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum Stmt {
    Decl(GenDecl),
    Assign {
        lhs: Vec<Expr>,
        tok_pos: Pos,
        /// `=`, `:=`, `+=`, ...
        tok: String,
        rhs: Vec<Expr>,
    },
    Expr {
        x: Expr,
    },
    Return {
        ret: Pos,
        results: Vec<Expr>,
    },
    Block(BlockStmt),
}

impl Stmt {
    pub fn pos(&self) -> Pos {
        match self {
            Stmt::Decl(decl) => decl.tok_pos,
            Stmt::Assign { lhs, tok_pos, .. } => lhs.first().map_or(*tok_pos, Expr::pos),
            Stmt::Expr { x } => x.pos(),
            Stmt::Return { ret, .. } => *ret,
            Stmt::Block(block) => block.lbrace,
        }
    }

    pub fn end(&self) -> Pos {
        match self {
            Stmt::Decl(decl) => decl.end(),
            Stmt::Assign { rhs, tok_pos, tok, .. } => {
                rhs.last().map_or(tok_pos.advance(tok.len()), Expr::end)
            }
            Stmt::Expr { x } => x.end(),
            Stmt::Return { ret, results } => results.last().map_or(ret.advance(6), Expr::end),
            Stmt::Block(block) => block.end(),
        }
    }
}
