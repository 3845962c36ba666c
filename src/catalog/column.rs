//! Column storage for secat
//!
//! This module defines the typed arrays that hold catalog data, and the
//! materializer that turns raw row tokens into them.

use super::options::INDEF;
use super::types::ColumnType;
use crate::error::{Error, Result};
use std::fmt;

/// Whitespace-separated tokens of one data line
pub type RawRow<'a> = Vec<&'a str>;

/// A single cell, borrowed from a column
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    Str(&'a str),
    Int(i64),
    Float(f64),
}

impl Value<'_> {
    /// Numeric view of the value, if it has one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(x) => Some(*x),
            Value::Str(_) => None,
        }
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "{}", s),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
        }
    }
}

/// A homogeneous, typed column
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Str(Vec<String>),
    Int(Vec<i64>),
    Float(Vec<f64>),
}

impl ColumnData {
    /// Column of `len` zero (or `INDEF`) values
    pub fn zeros(column_type: ColumnType, len: usize) -> Self {
        match column_type {
            ColumnType::Str => ColumnData::Str(vec![INDEF.to_string(); len]),
            ColumnType::Int => ColumnData::Int(vec![0; len]),
            ColumnType::Float => ColumnData::Float(vec![0.0; len]),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnData::Str(v) => v.len(),
            ColumnData::Int(v) => v.len(),
            ColumnData::Float(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            ColumnData::Str(_) => ColumnType::Str,
            ColumnData::Int(_) => ColumnType::Int,
            ColumnData::Float(_) => ColumnType::Float,
        }
    }

    /// Get the value at `row`
    pub fn get(&self, row: usize) -> Option<Value<'_>> {
        match self {
            ColumnData::Str(v) => v.get(row).map(|s| Value::Str(s)),
            ColumnData::Int(v) => v.get(row).map(|i| Value::Int(*i)),
            ColumnData::Float(v) => v.get(row).map(|x| Value::Float(*x)),
        }
    }

    pub fn as_str(&self) -> Option<&[String]> {
        match self {
            ColumnData::Str(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<&[i64]> {
        match self {
            ColumnData::Int(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<&[f64]> {
        match self {
            ColumnData::Float(v) => Some(v),
            _ => None,
        }
    }

    /// First string cell that would split into several tokens on output
    pub fn whitespace_cell(&self) -> Option<(usize, &str)> {
        match self {
            ColumnData::Str(v) => v
                .iter()
                .position(|s| s.contains(char::is_whitespace))
                .map(|row| (row, v[row].as_str())),
            _ => None,
        }
    }

    /// Mutable view that cannot change the column length
    pub fn as_mut_slice(&mut self) -> ColumnSliceMut<'_> {
        match self {
            ColumnData::Str(v) => ColumnSliceMut::Str(v),
            ColumnData::Int(v) => ColumnSliceMut::Int(v),
            ColumnData::Float(v) => ColumnSliceMut::Float(v),
        }
    }
}

impl From<Vec<String>> for ColumnData {
    fn from(values: Vec<String>) -> Self {
        ColumnData::Str(values)
    }
}

impl From<Vec<&str>> for ColumnData {
    fn from(values: Vec<&str>) -> Self {
        ColumnData::Str(values.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<i64>> for ColumnData {
    fn from(values: Vec<i64>) -> Self {
        ColumnData::Int(values)
    }
}

impl From<Vec<f64>> for ColumnData {
    fn from(values: Vec<f64>) -> Self {
        ColumnData::Float(values)
    }
}

/// Length-preserving mutable access to a column
#[derive(Debug)]
pub enum ColumnSliceMut<'a> {
    Str(&'a mut [String]),
    Int(&'a mut [i64]),
    Float(&'a mut [f64]),
}

/// Convert one column of raw rows into a typed array
///
/// `column` is 1-based. The storage type normally comes from sampling, so a
/// token outside the sample may still fail to convert; that is reported as
/// [`Error::ParseError`] with the offending row rather than coerced.
pub fn materialize(
    rows: &[RawRow<'_>],
    column: usize,
    name: &str,
    column_type: ColumnType,
) -> Result<ColumnData> {
    let cell = |row: usize| cell_at(rows, row, column);
    let parse_error = |row: usize, value: &str| Error::ParseError {
        row,
        column,
        name: name.to_string(),
        value: value.to_string(),
        expected: column_type.to_string(),
    };

    match column_type {
        ColumnType::Str => (0..rows.len())
            .map(|row| cell(row).map(str::to_string))
            .collect::<Result<Vec<_>>>()
            .map(ColumnData::Str),
        ColumnType::Int => (0..rows.len())
            .map(|row| {
                let token = cell(row)?;
                token.parse::<i64>().map_err(|_| parse_error(row, token))
            })
            .collect::<Result<Vec<_>>>()
            .map(ColumnData::Int),
        ColumnType::Float => (0..rows.len())
            .map(|row| {
                let token = cell(row)?;
                token.parse::<f64>().map_err(|_| parse_error(row, token))
            })
            .collect::<Result<Vec<_>>>()
            .map(ColumnData::Float),
    }
}

fn cell_at<'a>(rows: &[RawRow<'a>], row: usize, column: usize) -> Result<&'a str> {
    rows[row]
        .get(column - 1)
        .copied()
        .ok_or(Error::MissingField { row, column })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(text: &str) -> Vec<RawRow<'_>> {
        text.lines().map(|l| l.split_whitespace().collect()).collect()
    }

    #[test]
    fn test_materialize_each_type() {
        let raw = rows("1 2.5 a\n2 3.0 b\n3 -1e3 c");

        let ints = materialize(&raw, 1, "id", ColumnType::Int).unwrap();
        assert_eq!(ints.as_int().unwrap(), &[1, 2, 3]);

        let floats = materialize(&raw, 2, "flux", ColumnType::Float).unwrap();
        assert_eq!(floats.as_float().unwrap(), &[2.5, 3.0, -1000.0]);

        let strings = materialize(&raw, 3, "tag", ColumnType::Str).unwrap();
        assert_eq!(strings.as_str().unwrap(), &["a", "b", "c"]);
    }

    #[test]
    fn test_materialize_reports_offending_row() {
        let raw = rows("1\n2\n2.5\n4");
        match materialize(&raw, 1, "id", ColumnType::Int) {
            Err(Error::ParseError { row, column, name, value, .. }) => {
                assert_eq!(row, 2);
                assert_eq!(column, 1);
                assert_eq!(name, "id");
                assert_eq!(value, "2.5");
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_materialize_short_row() {
        let raw = rows("1 2\n3");
        assert!(matches!(
            materialize(&raw, 2, "b", ColumnType::Int),
            Err(Error::MissingField { row: 1, column: 2 })
        ));
    }

    #[test]
    fn test_zeros_and_mutation() {
        let mut col = ColumnData::zeros(ColumnType::Float, 3);
        assert_eq!(col.len(), 3);
        if let ColumnSliceMut::Float(values) = col.as_mut_slice() {
            values[1] = 4.5;
        }
        assert_eq!(col.get(1), Some(Value::Float(4.5)));
        assert_eq!(col.get(3), None);

        let labels = ColumnData::zeros(ColumnType::Str, 2);
        assert_eq!(labels.as_str().unwrap(), &["INDEF", "INDEF"]);
    }

    #[test]
    fn test_whitespace_cell() {
        let labels = ColumnData::from(vec!["star", "", "red giant", "x\ty"]);
        assert_eq!(labels.whitespace_cell(), Some((2, "red giant")));
        assert_eq!(ColumnData::from(vec!["a", ""]).whitespace_cell(), None);
        assert_eq!(ColumnData::Int(vec![1, 2]).whitespace_cell(), None);
    }
}
