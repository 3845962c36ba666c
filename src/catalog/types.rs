//! Column types and print formats for secat
//!
//! A column is stored as one of three concrete types. Its print format is a
//! small typed subset of printf conversions, parsed from and displayed as
//! the usual `%8.3f` text.

use super::column::Value;
use super::options::INDEF;
use crate::error::{Error, Result};
use nom::{
    character::complete::{char, digit1, one_of},
    combinator::{all_consuming, map_res, opt},
    sequence::preceded,
    IResult,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default precision for `%f` and `%e` when none is given
pub const DEFAULT_PRECISION: usize = 6;

/// Storage type of a materialized column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Raw text tokens
    Str,
    /// 64-bit signed integers
    Int,
    /// 64-bit floating point
    Float,
}

impl ColumnType {
    /// Check if this type is numeric
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Int | ColumnType::Float)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Str => write!(f, "string"),
            ColumnType::Int => write!(f, "int"),
            ColumnType::Float => write!(f, "float"),
        }
    }
}

/// Print format of a column
///
/// `width` is a minimum field width; values are right-aligned inside it and
/// never truncated. A width of 0 means no padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "conversion", rename_all = "lowercase")]
pub enum PrintFormat {
    /// `%Ws`
    Str { width: usize },
    /// `%Wd`
    Int { width: usize },
    /// `%W.Pf`
    Fixed { width: usize, precision: usize },
    /// `%W.Pe`, C-style exponent with sign and at least two digits
    Exp { width: usize, precision: usize },
}

impl PrintFormat {
    /// Format used for columns created without an explicit format
    pub fn default_for(column_type: ColumnType) -> Self {
        match column_type {
            ColumnType::Str => PrintFormat::Str { width: 0 },
            ColumnType::Int => PrintFormat::Int { width: 0 },
            ColumnType::Float => PrintFormat::Fixed {
                width: 0,
                precision: DEFAULT_PRECISION,
            },
        }
    }

    /// Storage type this format naturally prints
    ///
    /// Exponential notation is a rendering detail of float columns.
    pub fn column_type(&self) -> ColumnType {
        match self {
            PrintFormat::Str { .. } => ColumnType::Str,
            PrintFormat::Int { .. } => ColumnType::Int,
            PrintFormat::Fixed { .. } | PrintFormat::Exp { .. } => ColumnType::Float,
        }
    }

    /// Minimum field width
    pub fn width(&self) -> usize {
        match self {
            PrintFormat::Str { width }
            | PrintFormat::Int { width }
            | PrintFormat::Fixed { width, .. }
            | PrintFormat::Exp { width, .. } => *width,
        }
    }

    /// Digits after the decimal point, for float formats
    pub fn precision(&self) -> Option<usize> {
        match self {
            PrintFormat::Fixed { precision, .. } | PrintFormat::Exp { precision, .. } => {
                Some(*precision)
            }
            _ => None,
        }
    }

    /// Render one value through this format
    ///
    /// An empty string renders as `INDEF` so the field stays one token.
    pub fn render(&self, value: &Value<'_>) -> String {
        let width = self.width();
        match (self, value) {
            (_, Value::Str("")) => format!("{:>width$}", INDEF),
            (_, Value::Str(s)) => format!("{:>width$}", s),
            (PrintFormat::Str { .. }, v) => format!("{:>width$}", v.to_string()),
            (PrintFormat::Int { .. }, Value::Int(i)) => format!("{:>width$}", i),
            (PrintFormat::Int { .. }, Value::Float(x)) => {
                if x.is_finite() {
                    format!("{:>width$}", x.trunc() as i64)
                } else {
                    format!("{:>width$}", x)
                }
            }
            (PrintFormat::Fixed { precision, .. }, v) => {
                let x = v.as_f64().unwrap_or(f64::NAN);
                format!("{:>width$.prec$}", x, prec = *precision)
            }
            (PrintFormat::Exp { precision, .. }, v) => {
                let x = v.as_f64().unwrap_or(f64::NAN);
                format!("{:>width$}", format_exponential(x, *precision))
            }
        }
    }
}

/// Format a float the way C's `%.Pe` does (`1.50e+03`)
fn format_exponential(value: f64, precision: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let raw = format!("{:.*e}", precision, value);
    match raw.split_once('e') {
        Some((mantissa, exponent)) => {
            let exponent: i32 = exponent.parse().unwrap_or(0);
            let sign = if exponent < 0 { '-' } else { '+' };
            format!("{}e{}{:02}", mantissa, sign, exponent.abs())
        }
        None => raw,
    }
}

fn number(input: &str) -> IResult<&str, usize> {
    map_res(digit1, |s: &str| s.parse::<usize>())(input)
}

/// `%[width][.precision]conversion`
fn format_spec(input: &str) -> IResult<&str, (Option<usize>, Option<usize>, char)> {
    let (input, _) = char('%')(input)?;
    let (input, width) = opt(number)(input)?;
    let (input, precision) = opt(preceded(char('.'), number))(input)?;
    let (input, conversion) = one_of("sdife")(input)?;
    Ok((input, (width, precision, conversion)))
}

impl FromStr for PrintFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (_, (width, precision, conversion)) = all_consuming(format_spec)(s.trim())
            .map_err(|_| Error::InvalidFormat(s.to_string()))?;
        let width = width.unwrap_or(0);
        let precision = precision.unwrap_or(DEFAULT_PRECISION);
        Ok(match conversion {
            's' => PrintFormat::Str { width },
            'd' | 'i' => PrintFormat::Int { width },
            'f' => PrintFormat::Fixed { width, precision },
            _ => PrintFormat::Exp { width, precision },
        })
    }
}

impl fmt::Display for PrintFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%")?;
        if self.width() > 0 {
            write!(f, "{}", self.width())?;
        }
        match self {
            PrintFormat::Str { .. } => write!(f, "s"),
            PrintFormat::Int { .. } => write!(f, "d"),
            PrintFormat::Fixed { precision, .. } => write!(f, ".{}f", precision),
            PrintFormat::Exp { precision, .. } => write!(f, ".{}e", precision),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_formats() {
        assert_eq!("%10s".parse::<PrintFormat>().unwrap(), PrintFormat::Str { width: 10 });
        assert_eq!("%5d".parse::<PrintFormat>().unwrap(), PrintFormat::Int { width: 5 });
        assert_eq!("%i".parse::<PrintFormat>().unwrap(), PrintFormat::Int { width: 0 });
        assert_eq!(
            "%8.3f".parse::<PrintFormat>().unwrap(),
            PrintFormat::Fixed { width: 8, precision: 3 }
        );
        assert_eq!(
            "%.2e".parse::<PrintFormat>().unwrap(),
            PrintFormat::Exp { width: 0, precision: 2 }
        );
        assert_eq!(
            "%f".parse::<PrintFormat>().unwrap(),
            PrintFormat::Fixed { width: 0, precision: DEFAULT_PRECISION }
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!("8.3f".parse::<PrintFormat>(), Err(Error::InvalidFormat(_))));
        assert!(matches!("%8.3x".parse::<PrintFormat>(), Err(Error::InvalidFormat(_))));
        assert!(matches!("%8.3f trailing".parse::<PrintFormat>(), Err(Error::InvalidFormat(_))));
    }

    #[test]
    fn test_display_matches_printf_text() {
        for text in ["%10s", "%5d", "%8.3f", "%11.4e", "%s", "%.6f"] {
            let fmt: PrintFormat = text.parse().unwrap();
            assert_eq!(fmt.to_string(), text);
        }
    }

    #[test]
    fn test_render_values() {
        let fixed = PrintFormat::Fixed { width: 7, precision: 2 };
        assert_eq!(fixed.render(&Value::Float(3.14159)), "   3.14");
        assert_eq!(fixed.render(&Value::Int(2)), "   2.00");

        let int = PrintFormat::Int { width: 4 };
        assert_eq!(int.render(&Value::Int(42)), "  42");
        assert_eq!(int.render(&Value::Float(-2.7)), "  -2");

        let string = PrintFormat::Str { width: 6 };
        assert_eq!(string.render(&Value::Str("abc")), "   abc");
        assert_eq!(string.render(&Value::Str("")), " INDEF");
    }

    #[test]
    fn test_render_exponential_like_c() {
        let exp = PrintFormat::Exp { width: 10, precision: 2 };
        assert_eq!(exp.render(&Value::Float(1500.0)), "  1.50e+03");
        assert_eq!(exp.render(&Value::Float(-0.00025)), " -2.50e-04");
        assert_eq!(format_exponential(1.0e120, 1), "1.0e+120");
    }

    #[test]
    fn test_format_column_type() {
        assert_eq!(PrintFormat::Exp { width: 9, precision: 2 }.column_type(), ColumnType::Float);
        assert_eq!(PrintFormat::default_for(ColumnType::Int).to_string(), "%d");
        assert_eq!(PrintFormat::default_for(ColumnType::Float).to_string(), "%.6f");
    }
}
