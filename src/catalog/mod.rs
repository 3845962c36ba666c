//! Catalog module
//!
//! This module contains the header parser, type inference, column storage
//! and the catalog itself.

pub mod catalog;
pub mod column;
pub mod header;
pub mod infer;
pub mod options;
pub mod schema;
pub mod types;

pub use catalog::Catalog;
pub use column::{ColumnData, ColumnSliceMut, RawRow, Value};
pub use header::{HeaderColumn, HeaderLayout};
pub use infer::{infer, Inferred, DEFAULT_SAMPLE_SIZE};
pub use options::ReadOptions;
pub use schema::{ColumnSpec, Rename};
pub use types::{ColumnType, PrintFormat};
