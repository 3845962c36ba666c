//! secat - SExtractor-style catalog reader and writer
//!
//! This library reads whitespace-delimited catalogs with `# <n> <NAME>`
//! column headers:
//! - Header parsing, including unnamed vector columns
//! - Column type and print format inference from a sample of rows
//! - Typed column storage with append, edit and remove
//! - Write-back with per-column formats
//! - SExtractor configuration files

pub mod catalog;
pub mod config;
pub mod error;

pub use catalog::{Catalog, ColumnData, ColumnSpec, ColumnType, PrintFormat, ReadOptions};
pub use error::{Error, Result};

/// Read a catalog file with default options
pub fn load(path: impl AsRef<std::path::Path>) -> Result<Catalog> {
    Catalog::load(path)
}
