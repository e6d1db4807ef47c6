use std::path::Path;

use calamine::{DataType, Reader, Xlsx, open_workbook};

use crate::error::{Result, ToolError};
use crate::merge::TaskRow;

const KIND_COLUMN: &str = "Type";
const NAME_COLUMN: &str = "Task name";
const ASSIGNED_COLUMN: &str = "Assigned to";
const DURATION_COLUMN: &str = "Duration";
const WBS_COLUMN: &str = "WBS";

/// Reads task rows from a spreadsheet export.
///
/// The export carries a title banner above the table, so the header row is
/// located by looking for the row containing the position-number column.
/// Cells below it map onto [`TaskRow`] fields, blank cells becoming
/// `None`; the merge step decides which absences matter.
pub fn read_rows(path: &Path) -> Result<Vec<TaskRow>> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let first_sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| ToolError::InvalidSheet("workbook has no worksheets".into()))?;
    let range = workbook
        .worksheet_range(&first_sheet)
        .ok_or_else(|| ToolError::InvalidSheet(format!("missing sheet '{first_sheet}'")))?
        .map_err(ToolError::from)?;
    parse_range(&range)
}

/// Parses task rows out of an already-loaded worksheet range. Split from
/// [`read_rows`] so the mapping logic can be exercised without a workbook
/// on disk.
pub fn parse_range(range: &calamine::Range<DataType>) -> Result<Vec<TaskRow>> {
    let mut rows_iter = range.rows();
    let header = loop {
        match rows_iter.next() {
            Some(row) if row_contains(row, WBS_COLUMN) => break row,
            Some(_) => continue,
            None => {
                return Err(ToolError::InvalidSheet(format!(
                    "no header row containing '{WBS_COLUMN}'"
                )));
            }
        }
    };

    let columns = ColumnMap::from_header(header)?;
    let mut rows = Vec::new();
    for row in rows_iter {
        if row
            .iter()
            .all(|cell| cell_to_string(Some(cell)).trim().is_empty())
        {
            continue;
        }
        rows.push(columns.parse_row(row));
    }

    Ok(rows)
}

fn row_contains(row: &[DataType], header: &str) -> bool {
    row.iter()
        .any(|cell| cell_to_string(Some(cell)).trim() == header)
}

struct ColumnMap {
    kind: usize,
    name: usize,
    assigned: Option<usize>,
    duration: usize,
    wbs: usize,
}

impl ColumnMap {
    fn from_header(header: &[DataType]) -> Result<Self> {
        let find = |name: &str| {
            header
                .iter()
                .position(|cell| cell_to_string(Some(cell)).trim() == name)
        };
        let require = |name: &'static str| {
            find(name).ok_or_else(|| ToolError::InvalidSheet(format!("missing column '{name}'")))
        };

        Ok(Self {
            kind: require(KIND_COLUMN)?,
            name: require(NAME_COLUMN)?,
            // Exports without any assignments omit the column entirely.
            assigned: find(ASSIGNED_COLUMN),
            duration: require(DURATION_COLUMN)?,
            wbs: require(WBS_COLUMN)?,
        })
    }

    fn parse_row(&self, row: &[DataType]) -> TaskRow {
        TaskRow {
            kind: text_at(row, self.kind),
            name: text_at(row, self.name),
            assigned: self.assigned.and_then(|idx| text_at(row, idx)),
            duration: number_at(row, self.duration),
            wbs: text_at(row, self.wbs),
        }
    }
}

fn text_at(row: &[DataType], idx: usize) -> Option<String> {
    let value = cell_to_string(row.get(idx));
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// Negative durations map to `None` so the merge step reports the row
// instead of silently clamping to zero effort.
fn number_at(row: &[DataType], idx: usize) -> Option<u32> {
    match row.get(idx) {
        Some(DataType::Float(value)) if *value >= 0.0 => Some(value.round() as u32),
        Some(DataType::Int(value)) => u32::try_from(*value).ok(),
        Some(DataType::String(value)) => value
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|parsed| *parsed >= 0.0)
            .map(|parsed| parsed.round() as u32),
        _ => None,
    }
}

fn cell_to_string(cell: Option<&DataType>) -> String {
    match cell {
        Some(DataType::String(value)) => value.clone(),
        Some(DataType::Float(value)) => value.to_string(),
        Some(DataType::Int(value)) => value.to_string(),
        Some(DataType::Bool(value)) => value.to_string(),
        Some(DataType::Empty) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
