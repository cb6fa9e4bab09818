//! Plain-text fill fixtures.
//!
//! Whitespace-separated numeric rows, one fill per line: `x w` for
//! 1-D histograms, `x y w` for 2-D. Blank lines and lines starting
//! with `#` are skipped.

use std::fs;
use std::path::Path;

use crate::error::{FixtureError, Result};

/// Read `(x, weight)` fill rows from a text file.
pub fn read_fills_1d(path: impl AsRef<Path>) -> Result<Vec<(f64, f64)>> {
    let text = fs::read_to_string(path)?;
    let rows = numeric_rows(&text, 2)?;
    Ok(rows.into_iter().map(|r| (r[0], r[1])).collect())
}

/// Read `(x, y, weight)` fill rows from a text file.
pub fn read_fills_2d(path: impl AsRef<Path>) -> Result<Vec<(f64, f64, f64)>> {
    let text = fs::read_to_string(path)?;
    let rows = numeric_rows(&text, 3)?;
    Ok(rows.into_iter().map(|r| (r[0], r[1], r[2])).collect())
}

fn numeric_rows(text: &str, cols: usize) -> Result<Vec<Vec<f64>>> {
    let mut rows = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != cols {
            return Err(FixtureError::FixtureParse {
                line: lineno + 1,
                reason: format!("expected {cols} columns, got {}", fields.len()),
            });
        }
        let mut row = Vec::with_capacity(cols);
        for field in fields {
            let v: f64 = field.parse().map_err(|_| FixtureError::FixtureParse {
                line: lineno + 1,
                reason: format!("not a number: '{field}'"),
            })?;
            row.push(v);
        }
        rows.push(row);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rows_skipping_comments_and_blanks() {
        let text = "# header\n\n0.5 1.0\n 1.5\t2.0 \n";
        let rows = numeric_rows(text, 2).unwrap();
        assert_eq!(rows, vec![vec![0.5, 1.0], vec![1.5, 2.0]]);
    }

    #[test]
    fn wrong_column_count_reports_line() {
        let err = numeric_rows("0.5 1.0\n0.5\n", 2).unwrap_err();
        assert!(matches!(err, FixtureError::FixtureParse { line: 2, .. }));
    }

    #[test]
    fn bad_number_reports_line() {
        let err = numeric_rows("0.5 oops\n", 2).unwrap_err();
        assert!(matches!(err, FixtureError::FixtureParse { line: 1, .. }));
    }
}
