use std::path::Path;

use tracing::debug;

use crate::docs::Doc;
use crate::packages::{FileSystemTrait, ImportResolver, PackageError, scan_header};

/// Package-level documentation record for `import_path`
///
/// Only package clauses and the comments above them are read. Package
/// comments from several files are joined in file name order, separated by
/// a blank line.
pub fn package_doc<R, F>(
    resolver: &R,
    fs: &F,
    import_path: &str,
    src_dir: &Path,
) -> Result<Doc, PackageError>
where
    R: ImportResolver + ?Sized,
    F: FileSystemTrait,
{
    let package = resolver.import(import_path, src_dir)?;

    let mut files = package.files.clone();
    files.sort();

    let mut matched = false;
    let mut paragraphs: Vec<String> = Vec::new();
    for file in &files {
        let bytes = fs.read(file)?;
        let header = scan_header(file, &String::from_utf8_lossy(&bytes))?;
        if header.name != package.name {
            debug!(
                "Ignoring {} (package {}, expected {})",
                file.display(),
                header.name,
                package.name
            );
            continue;
        }
        matched = true;
        if let Some(text) = header.doc.map(|doc| doc.text()).filter(|text| !text.is_empty()) {
            paragraphs.push(text);
        }
    }

    if !matched {
        return Err(PackageError::NoDocumentation { name: package.name });
    }

    Ok(Doc {
        name: package.name.clone(),
        import_path: import_path.to_string(),
        package: package.name.clone(),
        decl: format!("package {}", package.name),
        doc: paragraphs.join("\n\n"),
        pos: String::new(),
    })
}
