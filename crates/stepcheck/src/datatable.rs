//! Check rows read from Gherkin data tables.
//!
//! Batch steps usually carry a table such as:
//!
//! ```text
//! | path          | operator | expected |
//! | order.status  | =        | Paid     |
//! | order.total   | >        | 10       |
//! ```
//!
//! The header is optional. A first row that does not name the operator
//! column is data, and the table is read positionally as path, operator,
//! expected.

use thiserror::Error;

use stepcheck_types::normalise_name;

use crate::batch::CheckRow;
use crate::spec::RawMatchSpec;
use crate::value::{BoolWords, TypedPath, parse_bool_word};

/// Errors raised while turning a table into [`CheckRow`]s.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum DataTableError {
    /// The header names the same column twice.
    #[error("data table header contains duplicate column '{column}'")]
    DuplicateHeader {
        /// Column role that was repeated.
        column: &'static str,
    },
    /// The header lacks a required column.
    #[error("data table header is missing column '{column}'")]
    MissingColumn {
        /// Column role that was not found.
        column: &'static str,
    },
    /// A row has the wrong number of cells.
    #[error("data table row {row_number} has {actual} cells but expected {expected}")]
    UnevenRow {
        /// 1-based index of the row, including any header.
        row_number: usize,
        /// Number of cells each row must have.
        expected: usize,
        /// Number of cells present.
        actual: usize,
    },
    /// A line of a pipe table is not enclosed in `|`.
    #[error("line {line_number} is not a table row: {line}")]
    MalformedLine {
        /// 1-based line number in the source text.
        line_number: usize,
        /// Offending line, trimmed.
        line: String,
    },
}

const PATH: &str = "path";
const OPERATOR: &str = "operator";
const EXPECTED: &str = "expected";

fn column_role(cell: &str) -> Option<&'static str> {
    match normalise_name(cell).as_str() {
        "path" | "field" | "element" | "variable" => Some(PATH),
        "operator" | "op" | "comparison" => Some(OPERATOR),
        "expected" | "spec" | "value" | "expectedvalue" => Some(EXPECTED),
        _ => None,
    }
}

/// Column positions of the three check roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderSpec {
    path: usize,
    operator: usize,
    expected: usize,
    width: usize,
}

impl HeaderSpec {
    /// Layout used for headerless tables.
    pub const POSITIONAL: Self = Self {
        path: 0,
        operator: 1,
        expected: 2,
        width: 3,
    };

    /// Interpret `row` as a header.
    ///
    /// A row is a header when one of its cells names the operator column;
    /// operator cells in data rows hold tokens such as `=` instead. Returns
    /// `Ok(None)` for any other row, meaning the table has no header.
    ///
    /// # Errors
    ///
    /// Returns [`DataTableError::DuplicateHeader`] when a role is named
    /// twice and [`DataTableError::MissingColumn`] when the header lacks the
    /// path or expected column.
    pub fn detect(row: &[String]) -> Result<Option<Self>, DataTableError> {
        let roles: Vec<_> = row.iter().map(|cell| column_role(cell)).collect();
        if !roles.contains(&Some(OPERATOR)) {
            return Ok(None);
        }
        let mut path = None;
        let mut operator = None;
        let mut expected = None;
        for (index, role) in roles.into_iter().enumerate() {
            let Some(role) = role else {
                continue;
            };
            let slot = match role {
                PATH => &mut path,
                OPERATOR => &mut operator,
                _ => &mut expected,
            };
            if slot.replace(index).is_some() {
                return Err(DataTableError::DuplicateHeader { column: role });
            }
        }
        let require = |slot: Option<usize>, column: &'static str| {
            slot.ok_or(DataTableError::MissingColumn { column })
        };
        Ok(Some(Self {
            path: require(path, PATH)?,
            operator: require(operator, OPERATOR)?,
            expected: require(expected, EXPECTED)?,
            width: row.len(),
        }))
    }

    /// Number of cells each data row must have.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    fn take(&self, row: &[String]) -> Option<CheckRow> {
        let cell = |index: usize| row.get(index).map(|value| value.trim());
        Some(CheckRow::new(
            TypedPath::parse(cell(self.path)?),
            cell(self.operator)?,
            RawMatchSpec::from(cell(self.expected)?),
        ))
    }
}

/// Convert table cells into check rows, detecting an optional header.
///
/// # Examples
///
/// ```
/// use stepcheck::datatable::parse_check_rows;
///
/// let table = vec![
///     vec!["path".to_string(), "operator".to_string(), "expected".to_string()],
///     vec!["status".to_string(), "=".to_string(), "Paid".to_string()],
/// ];
/// let rows = parse_check_rows(table).unwrap();
/// assert_eq!(rows.len(), 1);
/// assert_eq!(rows[0].path().path(), "status");
/// ```
///
/// # Errors
///
/// Returns [`DataTableError`] when the header is inconsistent or a row has
/// the wrong number of cells.
pub fn parse_check_rows(table: Vec<Vec<String>>) -> Result<Vec<CheckRow>, DataTableError> {
    let Some(first) = table.first() else {
        return Ok(Vec::new());
    };
    let (header, skip) = match HeaderSpec::detect(first)? {
        Some(header) => (header, 1),
        None => (HeaderSpec::POSITIONAL, 0),
    };
    let mut rows = Vec::with_capacity(table.len().saturating_sub(skip));
    for (index, row) in table.iter().enumerate().skip(skip) {
        let uneven = DataTableError::UnevenRow {
            row_number: index + 1,
            expected: header.width(),
            actual: row.len(),
        };
        if row.len() != header.width() {
            return Err(uneven);
        }
        rows.push(header.take(row).ok_or(uneven)?);
    }
    Ok(rows)
}

/// Split Gherkin pipe-table text into cells.
///
/// Blank lines and `#` comments are skipped. Inside a cell `\|` stands for a
/// literal pipe, `\\` for a backslash and `\n` for a newline.
///
/// # Errors
///
/// Returns [`DataTableError::MalformedLine`] for a line not enclosed in `|`.
pub fn parse_pipe_table(text: &str) -> Result<Vec<Vec<String>>, DataTableError> {
    let mut table = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let inner = line
            .strip_prefix('|')
            .and_then(|rest| rest.strip_suffix('|'))
            .ok_or_else(|| DataTableError::MalformedLine {
                line_number: index + 1,
                line: line.to_string(),
            })?;
        table.push(split_cells(inner));
    }
    Ok(table)
}

fn split_cells(inner: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some('|') => current.push('|'),
                Some('\\') => current.push('\\'),
                Some('n') => current.push('\n'),
                Some(other) => {
                    current.push('\\');
                    current.push(other);
                }
                None => current.push('\\'),
            },
            '|' => cells.push(std::mem::take(&mut current).trim().to_string()),
            other => current.push(other),
        }
    }
    cells.push(current.trim().to_string());
    cells
}

/// Parse a yes/no flag cell: `yes`, `y`, `true` or `1`, and `no`, `n`,
/// `false` or `0`, in any case.
///
/// # Examples
///
/// ```
/// use stepcheck::datatable::truthy_bool;
///
/// assert_eq!(truthy_bool(" Yes "), Ok(true));
/// assert_eq!(truthy_bool("n"), Ok(false));
/// assert!(truthy_bool("perhaps").is_err());
/// ```
///
/// # Errors
///
/// Returns [`TruthyBoolError`] when the input is not a recognised form.
pub fn truthy_bool(value: &str) -> Result<bool, TruthyBoolError> {
    parse_bool_word(value, BoolWords::Flag).ok_or_else(|| TruthyBoolError {
        value: value.trim().to_string(),
    })
}

/// Error returned when [`truthy_bool`] cannot classify a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognised boolean value '{value}' (expected yes/y/true/1 or no/n/false/0)")]
pub struct TruthyBoolError {
    value: String,
}
