//! Source positions
//!
//! Every syntax node carries a [`Pos`], a global offset into a [`FileSet`].
//! Each file registered with the set owns a contiguous range of offsets
//! starting at its base, so a single `Pos` identifies both the file and the
//! byte offset inside it. `Pos(0)` is reserved for "no position".

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Global source offset; `Pos::NONE` marks nodes and symbols without a source position
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Pos(pub u32);

impl Pos {
    pub const NONE: Pos = Pos(0);

    pub fn is_valid(self) -> bool {
        self.0 != 0
    }

    /// Position `len` bytes after this one; invalid positions stay invalid
    pub fn advance(self, len: usize) -> Pos {
        if !self.is_valid() {
            return self;
        }
        Pos(self.0.saturating_add(len as u32))
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "@{}", self.0)
        } else {
            f.write_str("-")
        }
    }
}

/// Human-readable location of a [`Pos`] (1-based line and column)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub filename: PathBuf,
    pub line: u32,
    pub column: u32,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.filename.as_os_str().is_empty() {
            write!(f, "{}:{}", self.line, self.column)
        } else {
            write!(f, "{}:{}:{}", self.filename.display(), self.line, self.column)
        }
    }
}

/// A file registered with a [`FileSet`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    pub name: PathBuf,
    pub base: u32,
    pub size: u32,
    /// Byte offsets (relative to the file start) of every line start
    lines: Vec<u32>,
}

impl SourceFile {
    fn new(name: PathBuf, base: u32, text: &str) -> Self {
        let mut lines = vec![0];
        lines.extend(
            text.bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i as u32 + 1),
        );
        Self {
            name,
            base,
            size: text.len() as u32,
            lines,
        }
    }

    /// Whether `pos` falls inside this file (the end-of-file offset included)
    pub fn contains(&self, pos: Pos) -> bool {
        pos.0 >= self.base && pos.0 <= self.base + self.size
    }

    /// Global position of a byte offset inside this file
    pub fn pos(&self, offset: usize) -> Pos {
        Pos(self.base + offset as u32)
    }

    pub fn position(&self, pos: Pos) -> Option<Position> {
        if !pos.is_valid() || !self.contains(pos) {
            return None;
        }
        let offset = pos.0 - self.base;
        // Line tables from a snapshot may be empty or not start at zero
        let line_index = match self.lines.binary_search(&offset) {
            Ok(index) => index,
            Err(index) => index.checked_sub(1)?,
        };
        Some(Position {
            filename: self.name.clone(),
            line: line_index as u32 + 1,
            column: offset - self.lines[line_index] + 1,
        })
    }
}

/// Registry of source files sharing one global offset space
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSet {
    files: Vec<SourceFile>,
}

impl FileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file and return the base offset assigned to it
    pub fn add_file(&mut self, name: impl Into<PathBuf>, text: &str) -> u32 {
        // Offsets start at 1 so that Pos(0) never names a real byte.
        let base = self
            .files
            .last()
            .map(|file| file.base + file.size + 1)
            .unwrap_or(1);
        self.files.push(SourceFile::new(name.into(), base, text));
        base
    }

    pub fn file(&self, pos: Pos) -> Option<&SourceFile> {
        if !pos.is_valid() {
            return None;
        }
        self.files.iter().find(|file| file.contains(pos))
    }

    pub fn file_by_name(&self, name: &Path) -> Option<&SourceFile> {
        self.files.iter().find(|file| file.name == name)
    }

    pub fn position(&self, pos: Pos) -> Option<Position> {
        self.file(pos)?.position(pos)
    }

    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }
}
