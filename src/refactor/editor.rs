//! Single-file editing

use crate::error::{Error, Result};
use crate::fix::{self, Edit};
use std::fs;
use std::path::{Path, PathBuf};

/// Holds the text fixes were computed against and writes the edited result
pub struct FileEditor {
    path: PathBuf,
    original: String,
}

impl FileEditor {
    pub fn open(path: &Path) -> Result<Self> {
        let original = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Ok(Self {
            path: path.to_path_buf(),
            original,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    /// The file content after applying `edits`
    pub fn preview(&self, edits: &[Edit]) -> Result<String> {
        fix::apply_edits(&self.original, edits)
    }

    /// Apply `edits` and write the file, returning whether it changed
    pub fn apply(&self, edits: &[Edit]) -> Result<bool> {
        let edited = self.preview(edits)?;
        if edited == self.original {
            return Ok(false);
        }
        fs::write(&self.path, edited).map_err(|e| Error::io(&self.path, e))?;
        Ok(true)
    }

    /// 1-based line of a byte offset in the original text
    pub fn line_of(&self, offset: usize) -> usize {
        let end = offset.min(self.original.len());
        self.original.as_bytes()[..end]
            .iter()
            .filter(|&&b| b == b'\n')
            .count()
            + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::Span;
    use tempfile::TempDir;

    #[test]
    fn test_apply_writes_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("A.java");
        fs::write(&path, "int x = 1;\nint y = 2;\n").unwrap();

        let editor = FileEditor::open(&path).unwrap();
        let changed = editor.apply(&[Edit::delete(Span::new(0, 11))]).unwrap();
        assert!(changed);
        assert_eq!(fs::read_to_string(&path).unwrap(), "int y = 2;\n");
    }

    #[test]
    fn test_preview_leaves_file_alone() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("A.java");
        fs::write(&path, "int x = 1;\n").unwrap();

        let editor = FileEditor::open(&path).unwrap();
        let preview = editor.preview(&[Edit::replace(Span::new(4, 5), "y")]).unwrap();
        assert_eq!(preview, "int y = 1;\n");
        assert_eq!(fs::read_to_string(&path).unwrap(), "int x = 1;\n");
    }

    #[test]
    fn test_line_of() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("A.java");
        fs::write(&path, "a\nb\nc\n").unwrap();
        let editor = FileEditor::open(&path).unwrap();
        assert_eq!(editor.line_of(0), 1);
        assert_eq!(editor.line_of(2), 2);
        assert_eq!(editor.line_of(4), 3);
    }
}
