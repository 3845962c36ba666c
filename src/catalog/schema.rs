//! Column metadata for secat
//!
//! This module defines column specifications, the header declaration lines
//! written for them, and the renaming applied when names collide.

use super::types::{ColumnType, PrintFormat};
use serde::{Deserialize, Serialize};

/// Prefix added to a column name that is already taken
pub const RENAME_PREFIX: &str = "c_";

/// Names of catalog accessors; no column is registered under them.
pub const RESERVED_NAMES: &[&str] = &["header", "row", "rows", "line", "len", "iter"];

/// Column definition in a catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Column name
    pub name: String,
    /// Column position (1-indexed)
    pub index: usize,
    /// Storage type
    pub column_type: ColumnType,
    /// Print format used when writing
    pub format: PrintFormat,
    /// Free-text comment from the header declaration
    pub comment: String,
}

impl ColumnSpec {
    /// Create a new column spec; the storage type follows the format
    pub fn new(name: impl Into<String>, index: usize, format: PrintFormat) -> Self {
        Self {
            name: name.into(),
            index,
            column_type: format.column_type(),
            format,
            comment: String::new(),
        }
    }

    /// Set the storage type
    pub fn column_type(mut self, column_type: ColumnType) -> Self {
        self.column_type = column_type;
        self
    }

    /// Set the comment
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Header line declaring this column, without a trailing newline
    pub fn declaration(&self, marker: char, upper_case: bool) -> String {
        let name = if upper_case {
            self.name.to_uppercase()
        } else {
            self.name.clone()
        };
        let line = format!("{} {:>3} {:<15} {}", marker, self.index, name, self.comment);
        line.trim_end().to_string()
    }
}

/// A column registered under a different name than the header gave it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rename {
    /// Column position (1-indexed)
    pub index: usize,
    /// Name from the header
    pub from: String,
    /// Name the column was registered under
    pub to: String,
}

/// Check whether a name is reserved for catalog accessors
pub fn is_reserved(name: &str) -> bool {
    RESERVED_NAMES.contains(&name)
}

/// Prefix `name` with [`RENAME_PREFIX`] until `taken` no longer holds
pub fn free_name(name: &str, taken: impl Fn(&str) -> bool) -> String {
    let mut candidate = name.to_string();
    while is_reserved(&candidate) || taken(&candidate) {
        candidate = format!("{}{}", RENAME_PREFIX, candidate);
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_creation() {
        let spec = ColumnSpec::new("mag_auto", 3, PrintFormat::Fixed { width: 7, precision: 3 })
            .comment("Kron-like magnitude [mag]");

        assert_eq!(spec.column_type, ColumnType::Float);
        assert_eq!(
            spec.declaration('#', true),
            "#   3 MAG_AUTO        Kron-like magnitude [mag]"
        );

        let bare = ColumnSpec::new("Id", 12, PrintFormat::Int { width: 4 });
        assert_eq!(bare.declaration('#', false), "#  12 Id");
    }

    #[test]
    fn test_free_name() {
        let taken = ["flux", "c_flux"];
        assert_eq!(free_name("mag", |n| taken.contains(&n)), "mag");
        assert_eq!(free_name("flux", |n| taken.contains(&n)), "c_c_flux");
        assert_eq!(free_name("header", |_| false), "c_header");
    }
}
