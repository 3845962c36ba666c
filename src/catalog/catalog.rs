//! SExtractor-style catalog
//!
//! A catalog owns an ordered set of named, typed columns of equal length,
//! plus the header text it was read with. Catalogs are loaded once, edited
//! in memory and written back; they are not meant to be shared between
//! threads without external locking.

use super::column::{materialize, ColumnData, ColumnSliceMut, Value};
use super::header::HeaderLayout;
use super::infer::{infer, sample_rows};
use super::options::ReadOptions;
use super::schema::{free_name, is_reserved, ColumnSpec, Rename};
use super::types::{ColumnType, PrintFormat};
use crate::error::{Error, Result};
use indexmap::IndexMap;
use std::borrow::Cow;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::ops::Range;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
struct Column {
    spec: ColumnSpec,
    data: ColumnData,
}

/// In-memory catalog
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    /// Columns by name, in index order
    columns: IndexMap<String, Column>,
    /// Row count shared by every column
    rows: usize,
    /// Header as read, plus declarations of appended columns
    header: String,
    /// Set once a column is removed; the header is then rebuilt on output
    header_stale: bool,
    comment_marker: char,
    preserve_case: bool,
    renames: Vec<Rename>,
}

impl Catalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self {
            columns: IndexMap::new(),
            rows: 0,
            header: String::new(),
            header_stale: false,
            comment_marker: '#',
            preserve_case: false,
            renames: Vec::new(),
        }
    }

    /// Read a catalog file with default options
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_with(path, &ReadOptions::default())
    }

    /// Read a catalog file
    pub fn load_with(path: impl AsRef<Path>, options: &ReadOptions) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        debug!(path = %path.display(), bytes = text.len(), "reading catalog");
        Self::parse_with(&text, options)
    }

    /// Parse catalog text
    pub fn parse_with(text: &str, options: &ReadOptions) -> Result<Self> {
        Self::from_lines(text.lines(), options)
    }

    /// Build a catalog from a sequence of lines
    pub fn from_lines<I, S>(lines: I, options: &ReadOptions) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let lines: Vec<S> = lines.into_iter().collect();
        let layout = HeaderLayout::parse(lines.iter().map(|l| l.as_ref()), options)?;
        Self::from_layout(layout, options)
    }

    fn from_layout(layout: HeaderLayout<'_>, options: &ReadOptions) -> Result<Self> {
        let HeaderLayout {
            columns,
            rows,
            header_text,
        } = layout;

        let mut catalog = Self {
            rows: rows.len(),
            header: header_text,
            comment_marker: options.comment_marker,
            preserve_case: options.preserve_case,
            ..Self::new()
        };

        for declared in columns {
            let position = declared.index - 1;
            let samples = sample_rows(rows.len(), options.sample_size)
                .filter_map(|r| rows[r].get(position).copied());
            let inferred = infer(samples);
            let data = materialize(&rows, declared.index, &declared.name, inferred.column_type)?;

            let name = free_name(&declared.name, |n| catalog.columns.contains_key(n));
            if name != declared.name {
                warn!(
                    column = declared.index,
                    from = %declared.name,
                    to = %name,
                    "column renamed to avoid a name conflict"
                );
                catalog.renames.push(Rename {
                    index: declared.index,
                    from: declared.name.clone(),
                    to: name.clone(),
                });
            }

            let spec = ColumnSpec::new(name.clone(), declared.index, inferred.format)
                .column_type(inferred.column_type)
                .comment(declared.comment);
            catalog.columns.insert(name, Column { spec, data });
        }

        debug!(
            rows = catalog.rows,
            columns = catalog.columns.len(),
            renamed = catalog.renames.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows
    }

    /// True when the catalog has no rows
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Column names in index order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.keys().map(String::as_str).collect()
    }

    /// Column specs in index order
    pub fn column_specs(&self) -> impl Iterator<Item = &ColumnSpec> {
        self.columns.values().map(|c| &c.spec)
    }

    pub fn column_spec(&self, name: &str) -> Result<&ColumnSpec> {
        self.column(name).map(|c| &c.spec)
    }

    /// Get a column's values
    pub fn get_column(&self, name: &str) -> Result<&ColumnData> {
        self.column(name).map(|c| &c.data)
    }

    /// Edit a column's values in place
    pub fn column_mut(&mut self, name: &str) -> Result<ColumnSliceMut<'_>> {
        self.columns
            .get_mut(name)
            .map(|c| c.data.as_mut_slice())
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))
    }

    /// Get one cell
    pub fn value(&self, name: &str, row: usize) -> Result<Value<'_>> {
        self.check_row(row)?;
        let column = self.column(name)?;
        column.data.get(row).ok_or(Error::RowOutOfRange {
            row,
            rows: self.rows,
        })
    }

    /// Change a column's print format
    pub fn set_format(&mut self, name: &str, format: PrintFormat) -> Result<()> {
        let column = self
            .columns
            .get_mut(name)
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))?;
        column.spec.format = format;
        Ok(())
    }

    /// Columns renamed at load because their header name was taken
    pub fn renames(&self) -> &[Rename] {
        &self.renames
    }

    /// Row indices, `0..row_count()`
    pub fn iter(&self) -> Range<usize> {
        0..self.rows
    }

    /// Format one data row, newline-terminated
    ///
    /// Fails with [`Error::InvalidValue`] when a string cell contains
    /// whitespace.
    pub fn row(&self, row: usize) -> Result<String> {
        self.check_row(row)?;
        let mut fields = Vec::with_capacity(self.columns.len());
        for (name, column) in &self.columns {
            match column.data.get(row) {
                Some(Value::Str(s)) if s.contains(char::is_whitespace) => {
                    return Err(Error::InvalidValue {
                        name: name.clone(),
                        row,
                        value: s.to_string(),
                    });
                }
                Some(value) => fields.push(column.spec.format.render(&value)),
                None => fields.push(String::new()),
            }
        }
        let mut line = fields.join(" ");
        line.push('\n');
        Ok(line)
    }

    /// Header text to write: the header as read, or a rebuilt one once
    /// columns have been removed
    pub fn header(&self) -> Cow<'_, str> {
        if self.header_stale {
            Cow::Owned(self.build_header())
        } else {
            Cow::Borrowed(&self.header)
        }
    }

    /// Rebuild the header from the current columns
    pub fn build_header(&self) -> String {
        self.column_specs()
            .map(|spec| spec.declaration(self.comment_marker, !self.preserve_case) + "\n")
            .collect()
    }

    /// Append a column, with its print format given as printf text
    pub fn append_column(
        &mut self,
        name: &str,
        values: impl Into<ColumnData>,
        format: &str,
        comment: &str,
    ) -> Result<()> {
        let format: PrintFormat = format.parse()?;
        self.append_formatted_column(name, values, format, comment)
    }

    /// Append a column
    ///
    /// The values must have one entry per row. A catalog with no columns
    /// takes its row count from the first column appended. The name is
    /// lower-cased unless the catalog preserves case, matching what a
    /// reload of the written file would produce.
    pub fn append_formatted_column(
        &mut self,
        name: &str,
        values: impl Into<ColumnData>,
        format: PrintFormat,
        comment: &str,
    ) -> Result<()> {
        let data = values.into();
        let name = self.column_name(name)?;
        let name = name.as_str();
        if self.columns.contains_key(name) || is_reserved(name) {
            return Err(Error::ColumnAlreadyExists(name.to_string()));
        }
        if !self.columns.is_empty() && data.len() != self.rows {
            return Err(Error::ColumnLengthMismatch {
                name: name.to_string(),
                expected: self.rows,
                found: data.len(),
            });
        }
        if let Some((row, value)) = data.whitespace_cell() {
            return Err(Error::InvalidValue {
                name: name.to_string(),
                row,
                value: value.to_string(),
            });
        }
        if self.columns.is_empty() {
            self.rows = data.len();
        }

        let spec = ColumnSpec::new(name, self.columns.len() + 1, format)
            .column_type(data.column_type())
            .comment(comment);
        if !self.header_stale {
            self.header
                .push_str(&spec.declaration(self.comment_marker, !self.preserve_case));
            self.header.push('\n');
        }
        debug!(column = spec.index, name, format = %spec.format, "column appended");
        self.columns.insert(name.to_string(), Column { spec, data });
        Ok(())
    }

    /// Append a column of zeros (or `INDEF` strings) to fill in later
    pub fn append_empty_column(
        &mut self,
        name: &str,
        column_type: ColumnType,
        comment: &str,
    ) -> Result<()> {
        let data = ColumnData::zeros(column_type, self.rows);
        self.append_formatted_column(name, data, PrintFormat::default_for(column_type), comment)
    }

    /// Remove a column; later columns move down one index
    pub fn remove_column(&mut self, name: &str) -> Result<ColumnData> {
        let (position, _, removed) = self
            .columns
            .shift_remove_full(name)
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))?;
        for column in self.columns.values_mut().skip(position) {
            column.spec.index -= 1;
        }
        self.header_stale = true;
        Ok(removed.data)
    }

    /// Write the header and every row to `out`
    pub fn write_to<W: Write>(&self, mut out: W) -> Result<()> {
        out.write_all(self.header().as_bytes())?;
        for row in self.iter() {
            out.write_all(self.row(row)?.as_bytes())?;
        }
        out.flush()?;
        Ok(())
    }

    /// Write the catalog to a file
    ///
    /// An existing file is only replaced when `overwrite` is set; otherwise
    /// nothing is written and [`Error::DestinationExists`] is returned.
    pub fn write(&self, path: impl AsRef<Path>, overwrite: bool) -> Result<()> {
        let path = path.as_ref();
        let file = if overwrite {
            File::create(path)?
        } else {
            OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(path)
                .map_err(|e| match e.kind() {
                    io::ErrorKind::AlreadyExists => Error::DestinationExists(path.to_path_buf()),
                    _ => Error::IoError(e),
                })?
        };
        self.write_to(BufWriter::new(file))?;
        info!(path = %path.display(), rows = self.rows, columns = self.columns.len(), "catalog written");
        Ok(())
    }

    /// Name an appended column will be stored under
    fn column_name(&self, name: &str) -> Result<String> {
        if name.is_empty() || name.contains(char::is_whitespace) {
            return Err(Error::InvalidColumnName(name.to_string()));
        }
        Ok(if self.preserve_case {
            name.to_string()
        } else {
            name.to_lowercase()
        })
    }

    fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .get(name)
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))
    }

    fn check_row(&self, row: usize) -> Result<()> {
        if row < self.rows {
            Ok(())
        } else {
            Err(Error::RowOutOfRange {
                row,
                rows: self.rows,
            })
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for Catalog {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_with(s, &ReadOptions::default())
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = usize;
    type IntoIter = Range<usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
