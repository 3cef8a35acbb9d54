use crate::program::{PackageRef, Symbol};
use crate::syntax::{File, Pos, Position};

/// Read-only view of a type-checked program
///
/// The documentation pipeline never type checks anything itself. It asks the
/// program what an identifier is bound to, where that binding's syntax lives
/// and how to print positions. Identifiers are addressed by the position of
/// their first byte, which is unique per identifier occurrence.
pub trait TypeCheckedProgram {
    /// Symbol introduced by the identifier at `ident` (definition site)
    fn definition(&self, ident: Pos) -> Option<&Symbol>;

    /// Symbol referred to by the identifier at `ident` (use site)
    ///
    /// For an embedded field's type name this is the embedded type, while
    /// [`TypeCheckedProgram::definition`] yields the synthetic field.
    fn use_of(&self, ident: Pos) -> Option<&Symbol>;

    /// Syntax tree of the file of `package` that contains `pos`
    fn syntax_file(&self, package: &PackageRef, pos: Pos) -> Option<&File>;

    /// Human-readable location of `pos`
    fn position(&self, pos: Pos) -> Option<Position>;

    /// The parsed unit declaring the predeclared names, when available
    fn builtin_unit(&self) -> Option<&File>;

    /// Symbol bound to the identifier at `ident`, definition site first
    fn symbol_of(&self, ident: Pos) -> Option<&Symbol> {
        self.definition(ident).or_else(|| self.use_of(ident))
    }
}
