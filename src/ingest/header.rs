//! Header row detection over a cleaned grid.

use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::cell::RawCell;

/// How the header row of an upload is located
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderPolicy {
    /// Row with the most non-empty cells, ties to the earliest row.
    ///
    /// A data row that is fuller than a sparse true header wins; this is a
    /// known limitation of the heuristic.
    #[default]
    MostPopulated,
    /// Like `MostPopulated`, but a winner made only of blank or placeholder
    /// cells is rejected in favour of the first row whose cells are more
    /// than half usable names, or row 0 when no row qualifies.
    Hardened,
}

/// Returns true when `cell` would make a placeholder column name.
pub(crate) fn is_placeholder(cell: &RawCell, placeholder: Option<&Regex>) -> bool {
    match cell.to_text() {
        None => true,
        Some(text) => placeholder.map(|re| re.is_match(&text)).unwrap_or(false),
    }
}

fn filled(row: &[&RawCell]) -> usize {
    row.iter().filter(|c| !c.is_empty()).count()
}

fn usable(row: &[&RawCell], placeholder: Option<&Regex>) -> usize {
    row.iter().filter(|c| !is_placeholder(c, placeholder)).count()
}

/// Picks the header row index in `rows` according to `policy`.
///
/// `rows` must not be empty.
pub(crate) fn detect_header_row(
    rows: &[Vec<&RawCell>],
    policy: HeaderPolicy,
    placeholder: Option<&Regex>,
) -> usize {
    let mut best = 0usize;
    let mut best_count = 0usize;
    for (i, row) in rows.iter().enumerate() {
        let count = filled(row);
        if count > best_count {
            best = i;
            best_count = count;
        }
    }

    if policy == HeaderPolicy::Hardened
        && rows[best].iter().all(|cell| is_placeholder(cell, placeholder))
    {
        let fallback = rows
            .iter()
            .position(|row| {
                !row.is_empty() && usable(row, placeholder) as f64 / row.len() as f64 > 0.5
            })
            .unwrap_or(0);
        debug!(
            "header row {} holds only placeholders, falling back to row {}",
            best, fallback
        );
        return fallback;
    }

    debug!("header row {} selected with {} filled cells", best, best_count);
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[Vec<RawCell>]) -> Vec<Vec<&RawCell>> {
        rows.iter().map(|r| r.iter().collect()).collect()
    }

    fn t(s: &str) -> RawCell {
        RawCell::Text(s.to_string())
    }

    #[test]
    fn test_ties_go_to_first_row() {
        let rows = vec![vec![t("a"), t("b")], vec![t("c"), t("d")]];
        assert_eq!(detect_header_row(&grid(&rows), HeaderPolicy::MostPopulated, None), 0);
    }

    #[test]
    fn test_hardened_rejects_placeholder_row() {
        let re = Regex::new("^Unnamed").unwrap();
        let rows = vec![
            vec![t("Unnamed: 0"), t("Unnamed: 1"), t("Unnamed: 2")],
            vec![t("Date"), t("Sales"), RawCell::Empty],
        ];
        let g = grid(&rows);
        assert_eq!(detect_header_row(&g, HeaderPolicy::MostPopulated, Some(&re)), 0);
        assert_eq!(detect_header_row(&g, HeaderPolicy::Hardened, Some(&re)), 1);
    }

    #[test]
    fn test_hardened_defaults_to_row_zero() {
        let re = Regex::new("^Unnamed").unwrap();
        let rows = vec![
            vec![t("Unnamed: 0"), t("Unnamed: 1"), t("x")],
            vec![t("Unnamed: 3"), t("Unnamed: 4"), RawCell::Empty],
        ];
        // row 0 has a real name so it is accepted as is
        assert_eq!(detect_header_row(&grid(&rows), HeaderPolicy::Hardened, Some(&re)), 0);

        let rows = vec![
            vec![t("Unnamed: 0"), t("Unnamed: 1")],
            vec![t("a"), RawCell::Empty],
        ];
        assert_eq!(detect_header_row(&grid(&rows), HeaderPolicy::Hardened, Some(&re)), 0);
    }
}
