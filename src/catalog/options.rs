//! Read options for secat
//!
//! Controls how catalog text is split into header and data, and how column
//! names and types are derived.

use super::column::RawRow;
use super::infer::DEFAULT_SAMPLE_SIZE;

/// Token written by IRAF tools for undefined values
pub const INDEF: &str = "INDEF";

/// Catalog read configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOptions {
    /// Keep column names as written instead of lower-casing them
    pub preserve_case: bool,
    /// Rows inspected per column for type inference; `None` checks all rows
    pub sample_size: Option<usize>,
    /// Marker that starts header and comment lines
    pub comment_marker: char,
    /// Field separator; `None` splits on any run of whitespace
    pub field_separator: Option<char>,
    /// Replacement for `INDEF` tokens, e.g. `"NaN"`
    pub indef: Option<String>,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            preserve_case: false,
            sample_size: Some(DEFAULT_SAMPLE_SIZE),
            comment_marker: '#',
            field_separator: None,
            indef: None,
        }
    }
}

impl ReadOptions {
    /// Create read options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set case preservation for column names
    pub fn preserve_case(mut self, preserve_case: bool) -> Self {
        self.preserve_case = preserve_case;
        self
    }

    /// Set the number of rows sampled for type inference
    pub fn sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = Some(sample_size);
        self
    }

    /// Inspect every row during type inference
    pub fn check_all_rows(mut self) -> Self {
        self.sample_size = None;
        self
    }

    /// Set the comment marker
    pub fn comment_marker(mut self, marker: char) -> Self {
        self.comment_marker = marker;
        self
    }

    /// Set the field separator
    pub fn field_separator(mut self, separator: char) -> Self {
        self.field_separator = Some(separator);
        self
    }

    /// Set the replacement for `INDEF` tokens
    pub fn indef(mut self, replacement: impl Into<String>) -> Self {
        self.indef = Some(replacement.into());
        self
    }

    /// Check whether a line belongs to the header
    pub fn is_comment(&self, line: &str) -> bool {
        line.trim_start().starts_with(self.comment_marker)
    }

    /// Split a data line into tokens
    ///
    /// With a field separator, tokens are trimmed and a blank line yields no
    /// tokens.
    pub fn tokenize<'a>(&'a self, line: &'a str) -> RawRow<'a> {
        let tokens: RawRow<'a> = match self.field_separator {
            None => line.split_whitespace().collect(),
            Some(_) if line.trim().is_empty() => Vec::new(),
            Some(sep) => line.split(sep).map(str::trim).collect(),
        };
        match self.indef.as_deref() {
            Some(replacement) => tokens
                .into_iter()
                .map(|t| if t == INDEF { replacement } else { t })
                .collect(),
            None => tokens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ReadOptions::new();
        assert!(!options.preserve_case);
        assert_eq!(options.sample_size, Some(DEFAULT_SAMPLE_SIZE));
        assert_eq!(options.comment_marker, '#');
    }

    #[test]
    fn test_tokenize_whitespace_and_separator() {
        let options = ReadOptions::new();
        assert_eq!(options.tokenize("  1   2.5\tfoo \n"), vec!["1", "2.5", "foo"]);
        assert!(options.tokenize("   ").is_empty());

        let options = ReadOptions::new().field_separator(',');
        assert_eq!(options.tokenize("1, 2.5 ,foo"), vec!["1", "2.5", "foo"]);
        assert!(options.tokenize("  ").is_empty());
    }

    #[test]
    fn test_indef_replacement() {
        let options = ReadOptions::new().indef("NaN");
        assert_eq!(options.tokenize("1 INDEF 3"), vec!["1", "NaN", "3"]);
        assert_eq!(ReadOptions::new().tokenize("INDEF"), vec!["INDEF"]);
    }

    #[test]
    fn test_is_comment() {
        let options = ReadOptions::new().comment_marker('!');
        assert!(options.is_comment("  ! note"));
        assert!(!options.is_comment("# not for this marker"));
    }
}
