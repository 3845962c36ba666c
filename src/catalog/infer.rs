//! Column type inference
//!
//! Every sampled token is summarized on its own, and summaries are combined
//! with [`Summary::join`]. The join keeps the least specific kind seen
//! (string > exponential > float > int) and the widest widths, so the
//! result does not depend on sample order.

use super::types::{ColumnType, PrintFormat};
use std::iter::StepBy;
use std::ops::Range;

/// Default number of rows inspected per column
pub const DEFAULT_SAMPLE_SIZE: usize = 100;

/// How specific a token is. Ordered so that `max` is the join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Kind {
    #[default]
    Int,
    Float,
    Exp,
    Str,
}

/// Running summary of a column sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub kind: Kind,
    /// Longest token of any kind
    pub text_width: usize,
    /// Longest integer token, sign included
    pub int_width: usize,
    /// Longest integer part (before the decimal point) of a finite number
    pub int_digits: usize,
    /// Most digits after the decimal point
    pub precision: usize,
    /// Longest finite non-integer token
    pub float_width: usize,
}

impl Summary {
    /// Summarize a single token
    pub fn of(token: &str) -> Self {
        let len = token.chars().count();
        let mut summary = Summary {
            text_width: len,
            ..Summary::default()
        };

        if token.parse::<i64>().is_ok() {
            summary.int_width = len;
            summary.int_digits = len;
            return summary;
        }

        match token.parse::<f64>() {
            Err(_) => summary.kind = Kind::Str,
            // nan/inf: float, but no width bookkeeping
            Ok(x) if !x.is_finite() => summary.kind = Kind::Float,
            Ok(_) => {
                let (mantissa, kind) = match token.find(|c: char| c == 'e' || c == 'E') {
                    Some(pos) => (&token[..pos], Kind::Exp),
                    None => (token, Kind::Float),
                };
                let (int_part, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
                summary.kind = kind;
                summary.int_digits = int_part.len();
                summary.precision = fraction.len();
                summary.float_width = len;
            }
        }
        summary
    }

    /// Combine two summaries
    pub fn join(self, other: Self) -> Self {
        Summary {
            kind: self.kind.max(other.kind),
            text_width: self.text_width.max(other.text_width),
            int_width: self.int_width.max(other.int_width),
            int_digits: self.int_digits.max(other.int_digits),
            precision: self.precision.max(other.precision),
            float_width: self.float_width.max(other.float_width),
        }
    }

    /// Print format implied by the summary
    pub fn format(&self) -> PrintFormat {
        let fixed_width = |precision: usize| (self.int_digits + 1 + precision).max(self.float_width);
        match self.kind {
            Kind::Str => PrintFormat::Str {
                width: self.text_width,
            },
            Kind::Int => PrintFormat::Int {
                width: self.int_width,
            },
            // at least one decimal so `1.` does not read back as an int
            Kind::Float => {
                let precision = self.precision.max(1);
                PrintFormat::Fixed {
                    width: fixed_width(precision),
                    precision,
                }
            }
            // room for the `e+NN` suffix
            Kind::Exp => PrintFormat::Exp {
                width: fixed_width(self.precision) + 2,
                precision: self.precision,
            },
        }
    }
}

/// Result of inferring one column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Inferred {
    pub format: PrintFormat,
    /// Storage type; exponential columns are stored as floats
    pub column_type: ColumnType,
}

/// Infer the storage type and print format of a sample of tokens
pub fn infer<'a, I>(samples: I) -> Inferred
where
    I: IntoIterator<Item = &'a str>,
{
    let summary = samples
        .into_iter()
        .map(Summary::of)
        .fold(Summary::default(), Summary::join);
    let format = summary.format();
    Inferred {
        format,
        column_type: format.column_type(),
    }
}

/// Evenly spaced row indices covering `total` rows
///
/// Yields roughly `sample_size` rows (never fewer). `None` or zero samples
/// every row.
pub fn sample_rows(total: usize, sample_size: Option<usize>) -> StepBy<Range<usize>> {
    let step = match sample_size {
        Some(n) if n > 0 => (total / n).max(1),
        _ => 1,
    };
    (0..total).step_by(step)
}
