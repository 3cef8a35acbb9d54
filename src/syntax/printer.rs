//! Declaration pretty-printing
//!
//! [`DeclPrinter`] is the rendering contract the documentation pipeline
//! consumes: turn a (sanitized) declaration back into source text, or fail.
//! [`SourcePrinter`] is the default implementation, producing gofmt-style
//! text with tab indentation. Like a printer handed a bare node instead of a
//! whole file, it never prints comments.

use crate::syntax::ast::{
    BlockStmt, ChanDir, Decl, Expr, Field, FieldList, FuncDecl, FuncType, GenDecl, Spec, Stmt,
};
use crate::syntax::position::Pos;

#[derive(Debug, thiserror::Error)]
pub enum PrintError {
    #[error("Cannot print malformed source between {from} and {to}")]
    BadNode { from: Pos, to: Pos },

    #[error("Empty {what}")]
    Empty { what: &'static str },
}

/// Renders a declaration back into source text
#[cfg_attr(test, mockall::automock)]
pub trait DeclPrinter: Send + Sync {
    fn print_decl(&self, decl: &Decl) -> Result<String, PrintError>;
}

/// gofmt-style printer for declarations
#[derive(Debug, Clone, Copy, Default)]
pub struct SourcePrinter;

impl DeclPrinter for SourcePrinter {
    fn print_decl(&self, decl: &Decl) -> Result<String, PrintError> {
        let mut writer = Writer::default();
        writer.decl(decl)?;
        Ok(writer.out)
    }
}

#[derive(Default)]
struct Writer {
    out: String,
    indent: usize,
}

impl Writer {
    fn push(&mut self, text: &str) {
        self.out.push_str(text);
    }

    fn newline(&mut self) {
        self.out.push('\n');
        for _ in 0..self.indent {
            self.out.push('\t');
        }
    }

    fn decl(&mut self, decl: &Decl) -> Result<(), PrintError> {
        match decl {
            Decl::Func(func) => self.func_decl(func),
            Decl::Gen(decl) => self.gen_decl(decl),
            Decl::Bad(bad) => Err(PrintError::BadNode {
                from: bad.from,
                to: bad.to,
            }),
        }
    }

    fn func_decl(&mut self, func: &FuncDecl) -> Result<(), PrintError> {
        self.push("func ");
        if let Some(recv) = &func.recv {
            self.field_list(recv, "(", ")")?;
            self.push(" ");
        }
        self.push(&func.name.name);
        self.signature(&func.ty)?;
        if let Some(body) = &func.body {
            self.push(" ");
            self.block(body)?;
        }
        Ok(())
    }

    fn gen_decl(&mut self, decl: &GenDecl) -> Result<(), PrintError> {
        self.push(decl.tok.keyword());
        self.push(" ");
        if !decl.is_grouped() && decl.specs.len() == 1 {
            return self.spec(&decl.specs[0]);
        }
        self.push("(");
        self.indent += 1;
        for spec in &decl.specs {
            self.newline();
            self.spec(spec)?;
        }
        self.indent -= 1;
        if !decl.specs.is_empty() {
            self.newline();
        }
        self.push(")");
        Ok(())
    }

    fn spec(&mut self, spec: &Spec) -> Result<(), PrintError> {
        match spec {
            Spec::Import(spec) => {
                if let Some(name) = &spec.name {
                    self.push(&name.name);
                    self.push(" ");
                }
                self.push(&spec.path.value);
            }
            Spec::Value(spec) => {
                if spec.names.is_empty() {
                    return Err(PrintError::Empty { what: "value spec" });
                }
                self.names(spec.names.iter().map(|name| name.name.as_str()));
                if let Some(ty) = &spec.ty {
                    self.push(" ");
                    self.expr(ty)?;
                }
                if !spec.values.is_empty() {
                    self.push(" = ");
                    self.expr_list(&spec.values)?;
                }
            }
            Spec::Type(spec) => {
                self.push(&spec.name.name);
                if let Some(params) = &spec.type_params {
                    self.field_list(params, "[", "]")?;
                }
                self.push(if spec.assign.is_valid() { " = " } else { " " });
                self.expr(&spec.ty)?;
            }
        }
        Ok(())
    }

    fn names<'n>(&mut self, names: impl Iterator<Item = &'n str>) {
        for (i, name) in names.enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.push(name);
        }
    }

    /// Parameters and results of a function, without the `func` keyword
    fn signature(&mut self, func: &FuncType) -> Result<(), PrintError> {
        if let Some(params) = &func.type_params {
            self.field_list(params, "[", "]")?;
        }
        self.field_list(&func.params, "(", ")")?;
        if let Some(results) = &func.results {
            match results.list.as_slice() {
                [] => {}
                [single] if single.names.is_empty() => {
                    self.push(" ");
                    self.expr(&single.ty)?;
                }
                _ => {
                    self.push(" ");
                    self.field_list(results, "(", ")")?;
                }
            }
        }
        Ok(())
    }

    /// Inline field list: parameters, results, receivers, type parameters
    fn field_list(&mut self, list: &FieldList, open: &str, close: &str) -> Result<(), PrintError> {
        self.push(open);
        for (i, field) in list.list.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            if !field.names.is_empty() {
                self.names(field.names.iter().map(|name| name.name.as_str()));
                self.push(" ");
            }
            self.expr(&field.ty)?;
        }
        self.push(close);
        Ok(())
    }

    /// Struct fields or interface elements, one per line, field types and
    /// tags lined up in columns the way gofmt does
    fn member_list(&mut self, keyword: &str, list: &FieldList) -> Result<(), PrintError> {
        self.push(keyword);
        if list.list.is_empty() {
            self.push("{}");
            return Ok(());
        }
        self.push(" {");
        self.indent += 1;
        let members = list
            .list
            .iter()
            .map(|field| self.member(field))
            .collect::<Result<Vec<_>, _>>()?;
        for (member, (name_width, type_width)) in members.iter().zip(column_widths(&members)) {
            self.newline();
            member.write(self, name_width, type_width);
        }
        self.indent -= 1;
        self.newline();
        self.push("}");
        Ok(())
    }

    /// Print a member into its cells, nested types indented as in place
    fn member(&self, field: &Field) -> Result<Member, PrintError> {
        let mut cell = Writer {
            out: String::new(),
            indent: self.indent,
        };
        let mut name = None;
        if !field.names.is_empty() {
            cell.names(field.names.iter().map(|name| name.name.as_str()));
            // interface method: name directly followed by its signature
            if let Expr::Func(func) = &field.ty
                && !func.func.is_valid()
            {
                cell.signature(func)?;
                return Ok(Member {
                    name: None,
                    ty: cell.out,
                    tag: None,
                });
            }
            name = Some(std::mem::take(&mut cell.out));
        }
        cell.expr(&field.ty)?;
        Ok(Member {
            name,
            ty: cell.out,
            tag: field.tag.as_ref().map(|tag| tag.value.clone()),
        })
    }

    fn expr_list(&mut self, exprs: &[Expr]) -> Result<(), PrintError> {
        for (i, expr) in exprs.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.expr(expr)?;
        }
        Ok(())
    }

    fn expr(&mut self, expr: &Expr) -> Result<(), PrintError> {
        match expr {
            Expr::Ident(ident) => self.push(&ident.name),
            Expr::BasicLit(lit) => self.push(&lit.value),
            Expr::Ellipsis { elt, .. } => {
                self.push("...");
                if let Some(elt) = elt {
                    self.expr(elt)?;
                }
            }
            Expr::Paren { x, .. } => {
                self.push("(");
                self.expr(x)?;
                self.push(")");
            }
            Expr::Selector { x, sel } => {
                self.expr(x)?;
                self.push(".");
                self.push(&sel.name);
            }
            Expr::Index { x, indices, .. } => {
                self.expr(x)?;
                self.push("[");
                self.expr_list(indices)?;
                self.push("]");
            }
            Expr::Call { fun, args, .. } => {
                self.expr(fun)?;
                self.push("(");
                self.expr_list(args)?;
                self.push(")");
            }
            Expr::Star { x, .. } => {
                self.push("*");
                self.expr(x)?;
            }
            Expr::Unary { op, x, .. } => {
                self.push(op);
                self.expr(x)?;
            }
            Expr::Binary { x, op, y, .. } => {
                self.expr(x)?;
                self.push(" ");
                self.push(op);
                self.push(" ");
                self.expr(y)?;
            }
            Expr::CompositeLit { ty, elts, .. } => {
                if let Some(ty) = ty {
                    self.expr(ty)?;
                }
                self.push("{");
                self.expr_list(elts)?;
                self.push("}");
            }
            Expr::KeyValue { key, value, .. } => {
                self.expr(key)?;
                self.push(": ");
                self.expr(value)?;
            }
            Expr::Array { len, elt, .. } => {
                self.push("[");
                if let Some(len) = len {
                    self.expr(len)?;
                }
                self.push("]");
                self.expr(elt)?;
            }
            Expr::Struct { fields, .. } => self.member_list("struct", fields)?,
            Expr::Func(func) => {
                self.push("func");
                self.signature(func)?;
            }
            Expr::Interface { methods, .. } => self.member_list("interface", methods)?,
            Expr::Map { key, value, .. } => {
                self.push("map[");
                self.expr(key)?;
                self.push("]");
                self.expr(value)?;
            }
            Expr::Chan { dir, value, .. } => {
                self.push(match dir {
                    ChanDir::Both => "chan ",
                    ChanDir::Send => "chan<- ",
                    ChanDir::Recv => "<-chan ",
                });
                self.expr(value)?;
            }
            Expr::Bad(bad) => {
                return Err(PrintError::BadNode {
                    from: bad.from,
                    to: bad.to,
                });
            }
        }
        Ok(())
    }

    fn block(&mut self, block: &BlockStmt) -> Result<(), PrintError> {
        if block.list.is_empty() {
            self.push("{}");
            return Ok(());
        }
        self.push("{");
        self.indent += 1;
        for stmt in &block.list {
            self.newline();
            self.stmt(stmt)?;
        }
        self.indent -= 1;
        self.newline();
        self.push("}");
        Ok(())
    }

    fn stmt(&mut self, stmt: &Stmt) -> Result<(), PrintError> {
        match stmt {
            Stmt::Decl(decl) => self.gen_decl(decl),
            Stmt::Assign { lhs, tok, rhs, .. } => {
                self.expr_list(lhs)?;
                self.push(" ");
                self.push(tok);
                self.push(" ");
                self.expr_list(rhs)
            }
            Stmt::Expr { x } => self.expr(x),
            Stmt::Return { results, .. } => {
                self.push("return");
                if !results.is_empty() {
                    self.push(" ");
                    self.expr_list(results)?;
                }
                Ok(())
            }
            Stmt::Block(block) => self.block(block),
        }
    }
}

/// A struct field or interface element split into aligned columns
struct Member {
    /// Field names; `None` for embedded types and interface methods
    name: Option<String>,
    ty: String,
    tag: Option<String>,
}

impl Member {
    fn write(&self, out: &mut Writer, name_width: usize, type_width: usize) {
        if let Some(name) = &self.name {
            out.push(name);
            pad(out, name_width.saturating_sub(width(name)) + 1);
        }
        out.push(&self.ty);
        if let Some(tag) = &self.tag {
            pad(out, type_width.saturating_sub(width(&self.ty)) + 1);
            out.push(tag);
        }
    }
}

fn pad(out: &mut Writer, spaces: usize) {
    for _ in 0..spaces {
        out.push(" ");
    }
}

/// Display width of the last line of `text`
fn width(text: &str) -> usize {
    text.rsplit('\n').next().map_or(0, |line| line.chars().count())
}

/// Name and type column widths for every member
///
/// Names align across a run of consecutive named fields. An embedded type or
/// an interface method ends the run, and so does a field whose type spans
/// several lines (after taking part in it). Types align across consecutive
/// tagged fields of one run.
fn column_widths(members: &[Member]) -> Vec<(usize, usize)> {
    let mut widths = vec![(0, 0); members.len()];
    let mut start = 0;
    while start < members.len() {
        let mut end = start;
        while end < members.len() && members[end].name.is_some() {
            end += 1;
            if members[end - 1].ty.contains('\n') {
                break;
            }
        }
        if end == start {
            start += 1;
            continue;
        }

        let run = &members[start..end];
        let name_width = run
            .iter()
            .filter_map(|member| member.name.as_deref())
            .map(width)
            .max()
            .unwrap_or(0);
        let mut tagged = start;
        while tagged < end {
            let mut stop = tagged;
            while stop < end && members[stop].tag.is_some() {
                stop += 1;
            }
            let type_width = members[tagged..stop]
                .iter()
                .map(|member| width(&member.ty))
                .max()
                .unwrap_or(0);
            for entry in &mut widths[tagged..stop] {
                entry.1 = type_width;
            }
            tagged = stop.max(tagged + 1);
        }
        for entry in &mut widths[start..end] {
            entry.0 = name_width;
        }
        start = end;
    }
    widths
}
