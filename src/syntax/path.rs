//! Ancestor paths through a syntax tree
//!
//! [`Node`] is a borrowed view over every syntax node shape, giving uniform
//! access to spans and children. [`AncestorPath`] is the chain of nodes
//! enclosing a position, innermost first, ending at the file root. Walking it
//! is restartable: every consumer calls [`AncestorPath::iter`] and gets a
//! fresh outward walk over the same nodes.

use crate::syntax::ast::{
    BadNode, BasicLit, BlockStmt, Decl, Expr, Field, FieldList, File, FuncDecl, FuncType, GenDecl,
    Ident, ImportSpec, Spec, Stmt, TypeSpec, ValueSpec,
};
use crate::syntax::position::Pos;

/// Borrowed view of one syntax node
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    File(&'a File),
    FuncDecl(&'a FuncDecl),
    GenDecl(&'a GenDecl),
    ImportSpec(&'a ImportSpec),
    ValueSpec(&'a ValueSpec),
    TypeSpec(&'a TypeSpec),
    FieldList(&'a FieldList),
    Field(&'a Field),
    FuncType(&'a FuncType),
    Ident(&'a Ident),
    BasicLit(&'a BasicLit),
    Expr(&'a Expr),
    Block(&'a BlockStmt),
    Stmt(&'a Stmt),
    Bad(&'a BadNode),
}

impl<'a> Node<'a> {
    fn from_decl(decl: &'a Decl) -> Self {
        match decl {
            Decl::Func(func) => Node::FuncDecl(func),
            Decl::Gen(decl) => Node::GenDecl(decl),
            Decl::Bad(bad) => Node::Bad(bad),
        }
    }

    fn from_spec(spec: &'a Spec) -> Self {
        match spec {
            Spec::Import(spec) => Node::ImportSpec(spec),
            Spec::Value(spec) => Node::ValueSpec(spec),
            Spec::Type(spec) => Node::TypeSpec(spec),
        }
    }

    fn from_expr(expr: &'a Expr) -> Self {
        match expr {
            Expr::Ident(ident) => Node::Ident(ident),
            Expr::BasicLit(lit) => Node::BasicLit(lit),
            Expr::Func(func) => Node::FuncType(func),
            Expr::Bad(bad) => Node::Bad(bad),
            other => Node::Expr(other),
        }
    }

    fn from_stmt(stmt: &'a Stmt) -> Self {
        match stmt {
            Stmt::Block(block) => Node::Block(block),
            other => Node::Stmt(other),
        }
    }

    /// Short node kind name, used in log output
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::File(_) => "File",
            Node::FuncDecl(_) => "FuncDecl",
            Node::GenDecl(_) => "GenDecl",
            Node::ImportSpec(_) => "ImportSpec",
            Node::ValueSpec(_) => "ValueSpec",
            Node::TypeSpec(_) => "TypeSpec",
            Node::FieldList(_) => "FieldList",
            Node::Field(_) => "Field",
            Node::FuncType(_) => "FuncType",
            Node::Ident(_) => "Ident",
            Node::BasicLit(_) => "BasicLit",
            Node::Expr(_) => "Expr",
            Node::Block(_) => "BlockStmt",
            Node::Stmt(_) => "Stmt",
            Node::Bad(_) => "Bad",
        }
    }

    pub fn pos(&self) -> Pos {
        match self {
            Node::File(file) => file.file_start,
            Node::FuncDecl(func) => func.pos(),
            Node::GenDecl(decl) => decl.tok_pos,
            Node::ImportSpec(spec) => spec.pos(),
            Node::ValueSpec(spec) => spec.pos(),
            Node::TypeSpec(spec) => spec.name.pos,
            Node::FieldList(list) => list.pos(),
            Node::Field(field) => field.pos(),
            Node::FuncType(func) => func.pos(),
            Node::Ident(ident) => ident.pos,
            Node::BasicLit(lit) => lit.pos,
            Node::Expr(expr) => expr.pos(),
            Node::Block(block) => block.lbrace,
            Node::Stmt(stmt) => stmt.pos(),
            Node::Bad(bad) => bad.from,
        }
    }

    pub fn end(&self) -> Pos {
        match self {
            Node::File(file) => file.file_end,
            Node::FuncDecl(func) => func.end(),
            Node::GenDecl(decl) => decl.end(),
            Node::ImportSpec(spec) => spec.path.end(),
            Node::ValueSpec(spec) => spec.end(),
            Node::TypeSpec(spec) => spec.ty.end(),
            Node::FieldList(list) => list.end(),
            Node::Field(field) => field.end(),
            Node::FuncType(func) => func.end(),
            Node::Ident(ident) => ident.end(),
            Node::BasicLit(lit) => lit.end(),
            Node::Expr(expr) => expr.end(),
            Node::Block(block) => block.end(),
            Node::Stmt(stmt) => stmt.end(),
            Node::Bad(bad) => bad.to,
        }
    }

    pub fn contains(&self, pos: Pos) -> bool {
        self.pos() <= pos && pos < self.end()
    }

    /// Direct children in source order
    pub fn children(&self) -> Vec<Node<'a>> {
        let mut out = Vec::new();
        match *self {
            Node::File(file) => {
                out.push(Node::Ident(&file.name));
                out.extend(file.decls.iter().map(Node::from_decl));
            }
            Node::FuncDecl(func) => {
                if let Some(recv) = &func.recv {
                    out.push(Node::FieldList(recv));
                }
                out.push(Node::Ident(&func.name));
                out.push(Node::FuncType(&func.ty));
                if let Some(body) = &func.body {
                    out.push(Node::Block(body));
                }
            }
            Node::GenDecl(decl) => out.extend(decl.specs.iter().map(Node::from_spec)),
            Node::ImportSpec(spec) => {
                if let Some(name) = &spec.name {
                    out.push(Node::Ident(name));
                }
                out.push(Node::BasicLit(&spec.path));
            }
            Node::ValueSpec(spec) => {
                out.extend(spec.names.iter().map(Node::Ident));
                if let Some(ty) = &spec.ty {
                    out.push(Node::from_expr(ty));
                }
                out.extend(spec.values.iter().map(Node::from_expr));
            }
            Node::TypeSpec(spec) => {
                out.push(Node::Ident(&spec.name));
                if let Some(params) = &spec.type_params {
                    out.push(Node::FieldList(params));
                }
                out.push(Node::from_expr(&spec.ty));
            }
            Node::FieldList(list) => out.extend(list.list.iter().map(Node::Field)),
            Node::Field(field) => {
                out.extend(field.names.iter().map(Node::Ident));
                out.push(Node::from_expr(&field.ty));
                if let Some(tag) = &field.tag {
                    out.push(Node::BasicLit(tag));
                }
            }
            Node::FuncType(func) => {
                if let Some(params) = &func.type_params {
                    out.push(Node::FieldList(params));
                }
                out.push(Node::FieldList(&func.params));
                if let Some(results) = &func.results {
                    out.push(Node::FieldList(results));
                }
            }
            Node::Expr(expr) => expr_children(expr, &mut out),
            Node::Block(block) => out.extend(block.list.iter().map(Node::from_stmt)),
            Node::Stmt(stmt) => match stmt {
                Stmt::Decl(decl) => out.push(Node::GenDecl(decl)),
                Stmt::Assign { lhs, rhs, .. } => {
                    out.extend(lhs.iter().map(Node::from_expr));
                    out.extend(rhs.iter().map(Node::from_expr));
                }
                Stmt::Expr { x } => out.push(Node::from_expr(x)),
                Stmt::Return { results, .. } => out.extend(results.iter().map(Node::from_expr)),
                Stmt::Block(block) => out.push(Node::Block(block)),
            },
            Node::Ident(_) | Node::BasicLit(_) | Node::Bad(_) => {}
        }
        out
    }
}

fn expr_children<'a>(expr: &'a Expr, out: &mut Vec<Node<'a>>) {
    match expr {
        Expr::Ellipsis { elt, .. } => out.extend(elt.as_deref().map(Node::from_expr)),
        Expr::Paren { x, .. } | Expr::Star { x, .. } | Expr::Unary { x, .. } => {
            out.push(Node::from_expr(x))
        }
        Expr::Selector { x, sel } => {
            out.push(Node::from_expr(x));
            out.push(Node::Ident(sel));
        }
        Expr::Index { x, indices, .. } => {
            out.push(Node::from_expr(x));
            out.extend(indices.iter().map(Node::from_expr));
        }
        Expr::Call { fun, args, .. } => {
            out.push(Node::from_expr(fun));
            out.extend(args.iter().map(Node::from_expr));
        }
        Expr::Binary { x, y, .. } => {
            out.push(Node::from_expr(x));
            out.push(Node::from_expr(y));
        }
        Expr::CompositeLit { ty, elts, .. } => {
            out.extend(ty.as_deref().map(Node::from_expr));
            out.extend(elts.iter().map(Node::from_expr));
        }
        Expr::KeyValue { key, value, .. } => {
            out.push(Node::from_expr(key));
            out.push(Node::from_expr(value));
        }
        Expr::Array { len, elt, .. } => {
            out.extend(len.as_deref().map(Node::from_expr));
            out.push(Node::from_expr(elt));
        }
        Expr::Struct { fields, .. } => out.push(Node::FieldList(fields)),
        Expr::Interface { methods, .. } => out.push(Node::FieldList(methods)),
        Expr::Map { key, value, .. } => {
            out.push(Node::from_expr(key));
            out.push(Node::from_expr(value));
        }
        Expr::Chan { value, .. } => out.push(Node::from_expr(value)),
        // Leaves are surfaced as their own node kinds by `Node::from_expr`.
        Expr::Ident(_) | Expr::BasicLit(_) | Expr::Func(_) | Expr::Bad(_) => {}
    }
}

/// Nodes enclosing a position, innermost first, file root last
#[derive(Debug, Clone)]
pub struct AncestorPath<'a> {
    nodes: Vec<Node<'a>>,
}

impl<'a> AncestorPath<'a> {
    /// Path from the smallest node enclosing `pos` up to `file`
    ///
    /// Empty when `pos` lies outside the file.
    pub fn enclosing(file: &'a File, pos: Pos) -> Self {
        let mut nodes = Vec::new();
        let mut current = Node::File(file);
        if !pos.is_valid() || !current.contains(pos) {
            return Self { nodes };
        }
        loop {
            nodes.push(current);
            match current
                .children()
                .into_iter()
                .find(|child| child.contains(pos))
            {
                Some(child) => current = child,
                None => break,
            }
        }
        nodes.reverse();
        Self { nodes }
    }

    /// Fresh outward walk, innermost node first
    pub fn iter(&self) -> impl Iterator<Item = Node<'a>> + '_ {
        self.nodes.iter().copied()
    }

    pub fn innermost(&self) -> Option<Node<'a>> {
        self.nodes.first().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }
}
