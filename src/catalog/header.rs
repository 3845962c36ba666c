//! Catalog header parsing
//!
//! SExtractor writes one declaration per column:
//!
//! ```text
//! #   1 NUMBER          Running object number
//! #   2 FLUX_APER       Flux vector within fixed circular aperture(s)  [count]
//! #   5 MAG_AUTO        Kron-like elliptical aperture magnitude        [mag]
//! ```
//!
//! Vector-valued parameters are declared once, at their first column. The
//! skipped columns are named after the previous declaration with a numeric
//! suffix (`flux_aper`, `flux_aper_1`, `flux_aper_2`), and columns past the
//! last declaration are named the same way from the last declared name.

use super::column::RawRow;
use super::options::ReadOptions;
use crate::error::{Error, Result};
use nom::{
    bytes::complete::take_till1,
    character::complete::{digit1, space0, space1},
    combinator::map_res,
    IResult,
};
use tracing::debug;

/// One column as named by the header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderColumn {
    /// 1-based column index
    pub index: usize,
    pub name: String,
    /// Free text after the name on the declaration line
    pub comment: String,
    /// False for names synthesized from a vector declaration
    pub declared: bool,
}

/// Parsed layout of a catalog: named columns plus tokenized data rows
#[derive(Debug, Clone)]
pub struct HeaderLayout<'a> {
    /// Columns in index order, indices 1..=column_count
    pub columns: Vec<HeaderColumn>,
    /// Data rows, blank and comment lines removed
    pub rows: Vec<RawRow<'a>>,
    /// Header and comment lines, verbatim
    pub header_text: String,
}

impl<'a> HeaderLayout<'a> {
    /// Split catalog lines into header and data
    pub fn parse<I>(lines: I, options: &'a ReadOptions) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut columns: Vec<HeaderColumn> = Vec::new();
        let mut rows = Vec::new();
        let mut header_text = String::new();

        for (number, line) in lines.into_iter().enumerate() {
            let line = line.trim_end_matches(|c: char| c == '\n' || c == '\r');
            if options.is_comment(line) {
                header_text.push_str(line);
                header_text.push('\n');

                let body = &line.trim_start()[options.comment_marker.len_utf8()..];
                if let Ok((comment, (index, name))) = declaration(body) {
                    let last = columns.last().map_or(0, |c| c.index);
                    if index <= last {
                        return Err(Error::InvalidHeader {
                            line: number + 1,
                            reason: if index == 0 {
                                "column numbers start at 1".to_string()
                            } else {
                                format!("column {} declared after column {}", index, last)
                            },
                        });
                    }
                    extend_vector(&mut columns, index - 1);

                    let name = if options.preserve_case {
                        name.to_string()
                    } else {
                        name.to_lowercase()
                    };
                    columns.push(HeaderColumn {
                        index,
                        name,
                        comment: comment.trim().to_string(),
                        declared: true,
                    });
                }
                continue;
            }

            let row = options.tokenize(line);
            if !row.is_empty() {
                rows.push(row);
            }
        }

        // The first data row fixes the total column count
        if let Some(first) = rows.first() {
            extend_vector(&mut columns, first.len());
        } else {
            debug!(columns = columns.len(), "catalog has no data rows");
        }

        Ok(Self {
            columns,
            rows,
            header_text,
        })
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// True when no data rows were found
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column index for a name
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().find(|c| c.name == name).map(|c| c.index)
    }
}

/// Append synthesized columns until `columns` reaches index `upto`
fn extend_vector(columns: &mut Vec<HeaderColumn>, upto: usize) {
    let stem = columns
        .iter()
        .rev()
        .find(|c| c.declared)
        .map(|c| (c.name.clone(), c.index));
    while columns.len() < upto {
        let index = columns.len() + 1;
        let name = match &stem {
            Some((stem, at)) => format!("{}_{}", stem, index - at),
            None => format!("col_{}", index),
        };
        columns.push(HeaderColumn {
            index,
            name,
            comment: String::new(),
            declared: false,
        });
    }
}

/// `<index> <name> [comment]`, after the comment marker
fn declaration(input: &str) -> IResult<&str, (usize, &str)> {
    let (input, _) = space0(input)?;
    let (input, index) = map_res(digit1, |s: &str| s.parse::<usize>())(input)?;
    let (input, _) = space1(input)?;
    let (input, name) = take_till1(|c: char| c.is_whitespace())(input)?;
    Ok((input, (index, name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<HeaderLayout<'_>> {
        static OPTIONS: std::sync::OnceLock<ReadOptions> = std::sync::OnceLock::new();
        HeaderLayout::parse(text.lines(), OPTIONS.get_or_init(ReadOptions::new))
    }

    fn names(layout: &HeaderLayout<'_>) -> Vec<String> {
        layout.columns.iter().map(|c| c.name.clone()).collect()
    }

    #[test]
    fn test_declarations() {
        let layout = parse(
            "#   1 NUMBER     Running object number\n\
             #   2 MAG_AUTO   Kron-like magnitude  [mag]\n\
             1 21.5\n\
             2 22.25\n",
        )
        .unwrap();

        assert_eq!(names(&layout), vec!["number", "mag_auto"]);
        assert_eq!(layout.columns[1].comment, "Kron-like magnitude  [mag]");
        assert_eq!(layout.rows.len(), 2);
        assert_eq!(layout.index_of("mag_auto"), Some(2));
    }

    #[test]
    fn test_vector_expansion() {
        let mut text = String::from("# 1 NUMBER\n# 2 FLUX_APER\n# 5 MAG_AUTO\n");
        text.push_str("1 0.1 0.2 0.3 20.0\n");
        let layout = parse(&text).unwrap();

        assert_eq!(
            names(&layout),
            vec!["number", "flux_aper", "flux_aper_1", "flux_aper_2", "mag_auto"]
        );
        assert!(!layout.columns[2].declared);
        assert_eq!(layout.columns[3].index, 4);
    }

    #[test]
    fn test_trailing_vector() {
        let layout = parse("# 1 ID\n# 2 FLUX_RADIUS\n7 1.0 2.0 3.0\n").unwrap();
        assert_eq!(
            names(&layout),
            vec!["id", "flux_radius", "flux_radius_1", "flux_radius_2"]
        );
        assert_eq!(layout.column_count(), 4);
    }

    #[test]
    fn test_comment_lines_are_kept_in_header() {
        let text = "# SExtractor 2.25.0\n#\n# 1 ID\n#2 X_IMAGE\n\n1 10.5\n";
        let layout = parse(text).unwrap();
        assert_eq!(names(&layout), vec!["id", "x_image"]);
        assert_eq!(layout.header_text, "# SExtractor 2.25.0\n#\n# 1 ID\n#2 X_IMAGE\n");
        assert_eq!(layout.rows, vec![vec!["1", "10.5"]]);
    }

    #[test]
    fn test_preserve_case() {
        let options = ReadOptions::new().preserve_case(true);
        let layout = HeaderLayout::parse("# 1 Mag_Auto\n# 3 FluxErr\n".lines(), &options).unwrap();
        assert_eq!(names(&layout), vec!["Mag_Auto", "Mag_Auto_1", "FluxErr"]);
    }

    #[test]
    fn test_no_data_rows() {
        let layout = parse("# 1 ID\n# 2 MAG\n").unwrap();
        assert!(layout.is_empty());
        assert_eq!(layout.column_count(), 2);

        let layout = parse("").unwrap();
        assert!(layout.is_empty());
        assert_eq!(layout.column_count(), 0);
    }

    #[test]
    fn test_headerless_columns() {
        let layout = parse("1 2 3\n4 5 6\n").unwrap();
        assert_eq!(names(&layout), vec!["col_1", "col_2", "col_3"]);
    }

    #[test]
    fn test_out_of_order_declaration() {
        let err = parse("# 2 A\n# 1 B\n").unwrap_err();
        assert!(matches!(err, Error::InvalidHeader { line: 2, .. }));

        let err = parse("# 0 A\n").unwrap_err();
        assert!(matches!(err, Error::InvalidHeader { line: 1, .. }));
    }
}
