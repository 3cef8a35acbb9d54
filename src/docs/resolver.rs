use tracing::debug;

use crate::docs::DocError;
use crate::program::{Symbol, SymbolKind, TypeCheckedProgram};
use crate::syntax::Pos;

/// What an identifier resolves to for documentation purposes
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<'p> {
    Symbol(&'p Symbol),
    /// An import name, documented by the imported package itself
    Package { import_path: String },
}

/// Resolve the identifier at `ident` to the symbol whose declaration
/// documents it
///
/// Embedded fields resolve to the embedded type rather than the synthetic
/// field, and import names (aliased or not) resolve to the package they
/// import.
pub fn resolve<P>(program: &P, ident: Pos) -> Result<Resolution<'_>, DocError>
where
    P: TypeCheckedProgram + ?Sized,
{
    let Some(mut symbol) = program.symbol_of(ident) else {
        let position = program
            .position(ident)
            .map_or_else(|| ident.to_string(), |position| position.to_string());
        return Err(DocError::UnknownIdentifier { position });
    };

    if let SymbolKind::Var {
        anonymous: true, ..
    } = symbol.kind
    {
        match program.use_of(ident) {
            Some(embedded) => {
                debug!("Embedded field {} resolves to {}", symbol.name, embedded);
                symbol = embedded;
            }
            None => debug!("Embedded field {} has no recorded use", symbol.name),
        }
    }

    if let SymbolKind::PkgName { imported } = &symbol.kind {
        debug!("Import name {} refers to \"{}\"", symbol.name, imported.path);
        return Ok(Resolution::Package {
            import_path: imported.path.clone(),
        });
    }

    Ok(Resolution::Symbol(symbol))
}
