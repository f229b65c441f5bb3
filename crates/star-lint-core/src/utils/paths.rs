//! Path utilities shared by the analyzer and rules.

use std::path::Path;

/// Returns the last component of `path`, or `""` if it has none.
///
/// `models/staging/stg_users.sql` becomes `stg_users.sql`. Paths that end in
/// `..` or are a bare root have no file name.
#[must_use]
pub fn base_file_name(path: &Path) -> &str {
    path.file_name().and_then(|n| n.to_str()).unwrap_or("")
}

/// Returns true if `path` has a `.sql` extension (case-insensitive).
#[must_use]
pub fn is_sql_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("sql"))
}
