//! Spreadsheet fixture loading.
//!
//! Test inputs (credentials, patient names, expected banner text) live in a
//! workbook maintained by test-data authors. Each sheet is a table whose first
//! non-empty row holds the column names.
//!
//! A load selects one table and a set of columns and returns one
//! [`RowRecord`] per data row, in sheet order. A requested column that the
//! sheet does not have yields `None` rather than an error; use
//! [`RowRecord::require`] when a value must be present.

use crate::result::{MedError, MedResult};
use calamine::{open_workbook_auto, Data, Reader};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// Header name given to an empty header cell
const EMPTY_HEADER: &str = "__EMPTY";

/// One data row projected onto the requested columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowRecord {
    /// Requested columns in request order, with their values
    values: Vec<(String, Option<String>)>,
    #[serde(skip)]
    file: PathBuf,
    #[serde(skip)]
    table: String,
}

impl RowRecord {
    /// Get a column value; `None` when the column or cell is absent
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(name, _)| name == column)
            .and_then(|(_, value)| value.as_deref())
    }

    /// Get a column value, failing when it is absent
    pub fn require(&self, column: &str) -> MedResult<&str> {
        self.get(column).ok_or_else(|| {
            MedError::data_not_found(
                &self.file,
                &self.table,
                format!("column {column:?} has no value in this row"),
            )
        })
    }

    /// Whether the record has the key (even with no value)
    #[must_use]
    pub fn contains_key(&self, column: &str) -> bool {
        self.values.iter().any(|(name, _)| name == column)
    }

    /// Column names in request order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(name, _)| name.as_str())
    }

    /// Number of keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the record has no keys
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Convert to a sorted map (absent values become JSON null)
    #[must_use]
    pub fn to_map(&self) -> BTreeMap<String, Option<String>> {
        self.values.iter().cloned().collect()
    }
}

/// Serializable view of a loaded table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureTable {
    /// Source file
    pub file: PathBuf,
    /// Table name
    pub table: String,
    /// Requested columns
    pub columns: Vec<String>,
    /// Projected rows
    pub rows: Vec<BTreeMap<String, Option<String>>>,
}

/// Load `columns` from table `table` of the workbook at `file`.
///
/// # Errors
///
/// Returns [`MedError::DataNotFound`] when the file does not exist, cannot be
/// decoded as a workbook, or has no table with that name.
pub fn load_table(
    file: impl AsRef<Path>,
    table: &str,
    columns: &[&str],
) -> MedResult<Vec<RowRecord>> {
    let file = file.as_ref();
    let rows = read_rows(file, table)?;
    let requested = dedup_columns(columns);

    let records: Vec<RowRecord> = rows
        .into_iter()
        .map(|mut row| RowRecord {
            values: requested
                .iter()
                .map(|column| ((*column).to_string(), row.remove(*column)))
                .collect(),
            file: file.to_path_buf(),
            table: table.to_string(),
        })
        .collect();

    tracing::debug!(
        file = %file.display(),
        table,
        rows = records.len(),
        "loaded fixture table"
    );
    Ok(records)
}

/// Load and return only the first data row.
///
/// # Errors
///
/// Same as [`load_table`], plus [`MedError::DataNotFound`] when the table has
/// no data rows.
pub fn first_row(file: impl AsRef<Path>, table: &str, columns: &[&str]) -> MedResult<RowRecord> {
    let file = file.as_ref();
    load_table(file, table, columns)?
        .into_iter()
        .next()
        .ok_or_else(|| MedError::data_not_found(file, table, "table has no data rows"))
}

/// Load a table into its serializable view.
pub fn load_fixture_table(
    file: impl AsRef<Path>,
    table: &str,
    columns: &[&str],
) -> MedResult<FixtureTable> {
    let file = file.as_ref();
    let rows = load_table(file, table, columns)?;
    Ok(FixtureTable {
        file: file.to_path_buf(),
        table: table.to_string(),
        columns: dedup_columns(columns)
            .into_iter()
            .map(str::to_string)
            .collect(),
        rows: rows.iter().map(RowRecord::to_map).collect(),
    })
}

/// List the table names of a workbook.
pub fn table_names(file: impl AsRef<Path>) -> MedResult<Vec<String>> {
    let file = file.as_ref();
    let workbook = open(file, "")?;
    Ok(workbook.sheet_names())
}

fn open(
    file: &Path,
    table: &str,
) -> MedResult<calamine::Sheets<std::io::BufReader<std::fs::File>>> {
    if !file.is_file() {
        return Err(MedError::data_not_found(file, table, "file does not exist"));
    }
    open_workbook_auto(file).map_err(|e| MedError::data_not_found(file, table, e.to_string()))
}

/// Decode every data row of a table into header -> value.
fn read_rows(file: &Path, table: &str) -> MedResult<Vec<HashMap<String, String>>> {
    let mut workbook = open(file, table)?;
    if !workbook.sheet_names().iter().any(|name| name == table) {
        return Err(MedError::data_not_found(file, table, "table does not exist"));
    }
    let range = workbook
        .worksheet_range(table)
        .map_err(|e| MedError::data_not_found(file, table, e.to_string()))?;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(Vec::new());
    };
    let headers = header_names(header_row);

    Ok(rows
        .filter(|row| row.iter().any(|cell| render_cell(cell).is_some()))
        .map(|row| {
            headers
                .iter()
                .zip(row.iter())
                .filter_map(|(header, cell)| render_cell(cell).map(|v| (header.clone(), v)))
                .collect()
        })
        .collect())
}

/// Requested columns with repeats removed, first occurrence wins.
fn dedup_columns<'a>(columns: &[&'a str]) -> Vec<&'a str> {
    let mut requested: Vec<&str> = Vec::with_capacity(columns.len());
    for column in columns {
        if !requested.contains(column) {
            requested.push(column);
        }
    }
    requested
}

/// Name header cells, numbering empty and repeated names.
fn header_names(row: &[Data]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    row.iter()
        .map(|cell| {
            let base = render_cell(cell).unwrap_or_else(|| EMPTY_HEADER.to_string());
            let count = seen.entry(base.clone()).or_insert(0);
            let name = if *count == 0 {
                base
            } else {
                format!("{base}_{count}")
            };
            *count += 1;
            name
        })
        .collect()
}

/// Render a cell as text; empty cells have no value.
fn render_cell(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
