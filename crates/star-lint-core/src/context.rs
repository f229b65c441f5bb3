//! Context types for rule execution.

use std::path::{Path, PathBuf};

use crate::utils::paths::base_file_name;

/// Context provided to rules for the SQL source being linted.
///
/// `path` is `None` when the host lints a bare string without a file name.
#[derive(Debug, Clone)]
pub struct FileContext<'a> {
    /// Path to the file, if known.
    pub path: Option<&'a Path>,
    /// SQL source text.
    pub content: &'a str,
    /// Path relative to the project root (empty when unknown).
    pub relative_path: PathBuf,
}

impl<'a> FileContext<'a> {
    /// Creates a context for a file on disk.
    #[must_use]
    pub fn new(path: &'a Path, content: &'a str, root: &Path) -> Self {
        let relative_path = path
            .strip_prefix(root)
            .map_or_else(|_| path.to_path_buf(), Path::to_path_buf);

        Self {
            path: Some(path),
            content,
            relative_path,
        }
    }

    /// Creates a context for SQL text with an optional file name.
    ///
    /// An empty name is treated the same as no name.
    #[must_use]
    pub fn for_string(content: &'a str, fname: Option<&'a str>) -> Self {
        let path = fname.filter(|f| !f.is_empty()).map(Path::new);
        Self {
            path,
            content,
            relative_path: path.map(Path::to_path_buf).unwrap_or_default(),
        }
    }

    /// Returns the base file name, or `""` when the file is unknown.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.path.map_or("", base_file_name)
    }

    /// Calculates byte offset for a given line and column.
    ///
    /// # Arguments
    ///
    /// * `line` - 1-indexed line number
    /// * `column` - 1-indexed column number (in characters)
    ///
    /// # Returns
    ///
    /// Byte offset from the start of the file, or 0 if out of bounds.
    #[must_use]
    pub fn offset_for(&self, line: usize, column: usize) -> usize {
        if line == 0 {
            return 0;
        }

        let mut offset = 0;
        for (i, line_content) in self.content.split_inclusive('\n').enumerate() {
            if i + 1 == line {
                let within = line_content
                    .char_indices()
                    .nth(column.saturating_sub(1))
                    .map_or(line_content.len(), |(idx, _)| idx);
                return offset + within;
            }
            offset += line_content.len();
        }

        offset
    }
}
