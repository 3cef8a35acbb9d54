//! Predeclared names
//!
//! Builtins have no owning package, so their documentation comes from the
//! parsed unit that declares them (`builtin.go` in a Go distribution). The
//! catalogue indexes that unit the way a documentation tool would: values
//! and factory functions are attached to the type they produce, and every
//! function, constant and variable stays searchable whether or not it was
//! attached to a type.

use tracing::debug;

use crate::docs::{DeclNode, render};
use crate::program::Symbol;
use crate::syntax::ast::{DeclToken, Expr, FuncDecl, GenDecl, Spec, TypeSpec, comment_text};
use crate::syntax::{Decl, DeclPrinter, File};

/// A type declared by the builtin unit, with the declarations attached to it
#[derive(Debug)]
pub struct BuiltinType<'a> {
    pub spec: &'a TypeSpec,
    pub doc: String,
    /// Functions returning the type
    pub funcs: Vec<&'a FuncDecl>,
    pub consts: Vec<&'a GenDecl>,
    pub vars: Vec<&'a GenDecl>,
    /// Methods declared on the type; recorded but never searched
    pub methods: Vec<&'a FuncDecl>,
}

impl BuiltinType<'_> {
    pub fn name(&self) -> &str {
        &self.spec.name.name
    }
}

/// First declaration matching a name, by search bucket
#[derive(Debug, Clone, Copy)]
pub enum BuiltinEntry<'a, 'c> {
    Func(&'a FuncDecl),
    Const(&'a GenDecl),
    Var(&'a GenDecl),
    Type(&'c BuiltinType<'a>),
}

/// Index over the builtin unit's declarations
#[derive(Debug, Default)]
pub struct BuiltinCatalogue<'a> {
    funcs: Vec<&'a FuncDecl>,
    consts: Vec<&'a GenDecl>,
    vars: Vec<&'a GenDecl>,
    types: Vec<BuiltinType<'a>>,
}

impl<'a> BuiltinCatalogue<'a> {
    pub fn new(unit: &'a File) -> Self {
        let mut catalogue = Self::default();

        for decl in &unit.decls {
            if let Decl::Gen(decl) = decl
                && decl.tok == DeclToken::Type
            {
                let group_doc = (decl.specs.len() == 1).then(|| comment_text(decl.doc.as_ref()));
                for spec in &decl.specs {
                    if let Spec::Type(spec) = spec {
                        let own = comment_text(spec.doc.as_ref());
                        let doc = if own.is_empty() {
                            group_doc.clone().unwrap_or_default()
                        } else {
                            own
                        };
                        catalogue.types.push(BuiltinType {
                            spec,
                            doc,
                            funcs: Vec::new(),
                            consts: Vec::new(),
                            vars: Vec::new(),
                            methods: Vec::new(),
                        });
                    }
                }
            }
        }

        for decl in &unit.decls {
            match decl {
                Decl::Func(func) => catalogue.add_func(func),
                Decl::Gen(decl) if decl.tok == DeclToken::Const || decl.tok == DeclToken::Var => {
                    catalogue.add_values(decl)
                }
                _ => {}
            }
        }

        debug!(
            "Builtin catalogue: {} funcs, {} consts, {} vars, {} types",
            catalogue.funcs.len(),
            catalogue.consts.len(),
            catalogue.vars.len(),
            catalogue.types.len()
        );
        catalogue
    }

    fn type_index(&self, name: &str) -> Option<usize> {
        self.types.iter().position(|ty| ty.name() == name)
    }

    fn add_func(&mut self, func: &'a FuncDecl) {
        if let Some(recv) = &func.recv {
            let receiver = recv.list.first().and_then(|field| field.ty.base_type_name());
            if let Some(index) = receiver.and_then(|name| self.type_index(name)) {
                self.types[index].methods.push(func);
            }
            return;
        }

        let produced = match func.ty.results.as_ref().map(|results| results.list.as_slice()) {
            Some([only]) if only.names.len() <= 1 => only.ty.base_type_name(),
            _ => None,
        };
        match produced.and_then(|name| self.type_index(name)) {
            Some(index) => self.types[index].funcs.push(func),
            None => self.funcs.push(func),
        }
    }

    fn add_values(&mut self, decl: &'a GenDecl) {
        let is_const = decl.tok == DeclToken::Const;
        match (value_type(decl).and_then(|name| self.type_index(name)), is_const) {
            (Some(index), true) => self.types[index].consts.push(decl),
            (Some(index), false) => self.types[index].vars.push(decl),
            (None, true) => self.consts.push(decl),
            (None, false) => self.vars.push(decl),
        }
    }

    pub fn types(&self) -> &[BuiltinType<'a>] {
        &self.types
    }

    fn all_funcs(&self) -> impl Iterator<Item = &'a FuncDecl> + '_ {
        self.funcs
            .iter()
            .copied()
            .chain(self.types.iter().flat_map(|ty| ty.funcs.iter().copied()))
    }

    fn all_consts(&self) -> impl Iterator<Item = &'a GenDecl> + '_ {
        self.consts
            .iter()
            .copied()
            .chain(self.types.iter().flat_map(|ty| ty.consts.iter().copied()))
    }

    fn all_vars(&self) -> impl Iterator<Item = &'a GenDecl> + '_ {
        self.vars
            .iter()
            .copied()
            .chain(self.types.iter().flat_map(|ty| ty.vars.iter().copied()))
    }

    /// First entry named `name`, searching functions, then constants, then
    /// variables, then types
    pub fn find(&self, name: &str) -> Option<BuiltinEntry<'a, '_>> {
        if let Some(func) = self.all_funcs().find(|func| func.name.name == name) {
            return Some(BuiltinEntry::Func(func));
        }
        if let Some(decl) = self.all_consts().find(|decl| binds(decl, name)) {
            return Some(BuiltinEntry::Const(decl));
        }
        if let Some(decl) = self.all_vars().find(|decl| binds(decl, name)) {
            return Some(BuiltinEntry::Var(decl));
        }
        self.types
            .iter()
            .find(|ty| ty.name() == name)
            .map(BuiltinEntry::Type)
    }
}

/// Whether any value spec of `decl` declares `name`
fn binds(decl: &GenDecl, name: &str) -> bool {
    decl.specs.iter().any(|spec| match spec {
        Spec::Value(spec) => spec.names.iter().any(|ident| ident.name == name),
        _ => false,
    })
}

/// The single type every spec of a value group is declared with
///
/// A constant spec with neither type nor values repeats the previous spec's
/// type (the implicit repetition of `iota` blocks).
fn value_type(decl: &GenDecl) -> Option<&str> {
    let mut shared: Option<&str> = None;
    let mut previous: Option<&Expr> = None;
    for spec in &decl.specs {
        let Spec::Value(spec) = spec else {
            return None;
        };
        let ty = match &spec.ty {
            Some(ty) => Some(ty),
            None if decl.tok == DeclToken::Const && spec.values.is_empty() => previous,
            None => None,
        };
        previous = ty;
        let name = ty?.base_type_name()?;
        match shared {
            Some(seen) if seen != name => return None,
            _ => shared = Some(name),
        }
    }
    shared
}

/// Documentation and declaration text for the builtin named like `symbol`
///
/// Values come back without declaration text; the caller decides how to
/// present them.
pub fn find_builtin<P>(printer: &P, unit: &File, symbol: &Symbol) -> Option<(String, String)>
where
    P: DeclPrinter + ?Sized,
{
    let catalogue = BuiltinCatalogue::new(unit);
    let found = match catalogue.find(&symbol.name)? {
        BuiltinEntry::Func(func) => (
            comment_text(func.doc.as_ref()),
            render(printer, DeclNode::Func(func), symbol),
        ),
        BuiltinEntry::Const(decl) | BuiltinEntry::Var(decl) => {
            (comment_text(decl.doc.as_ref()), String::new())
        }
        BuiltinEntry::Type(ty) => (
            ty.doc.clone(),
            render(printer, DeclNode::TypeSpec(ty.spec), symbol),
        ),
    };
    Some(found)
}
