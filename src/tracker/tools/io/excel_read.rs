use calamine::{DataType, Range, Reader, Xlsx};

use crate::tracker::tools::error::{Result, ToolError};
use crate::tracker::tools::io::comments::CommentMap;
use crate::tracker::tools::model::{ToolRow, TrackingCell};
use crate::tracker::tools::normalize::{merge_notes, normalize_status};

/// First data row of the legacy sheet layout (zero-based). The rows above it
/// hold the legend/header block of the old format and carry no data.
pub const LEGACY_DATA_START: u32 = 6;

// Legacy column positions (zero-based).
const LEGACY_PLATFORM: u32 = 0;
const LEGACY_GTM: u32 = 1;
const LEGACY_GA4: u32 = 2;
const LEGACY_DOCS: u32 = 3;
const LEGACY_MSA: u32 = 4;
const LEGACY_EXAMPLES: u32 = 5;
const LEGACY_WCS: u32 = 6;

/// Fetches a sheet that must exist in the workbook.
pub fn read_required_sheet<R: std::io::Read + std::io::Seek>(
    workbook: &mut Xlsx<R>,
    name: &str,
) -> Result<Range<DataType>> {
    let range_result = workbook
        .worksheet_range(name)
        .ok_or_else(|| ToolError::InvalidWorkbook(format!("missing sheet '{name}'")))?;
    let range = range_result.map_err(ToolError::from)?;
    Ok(range)
}

/// Extracts the canonical rows of one legacy category sheet.
///
/// Rows are read from [`LEGACY_DATA_START`] through the last populated row;
/// a row without a platform is dropped entirely. The three tracking columns
/// combine the cell value with any inline comment attached to the same
/// coordinate.
pub fn read_legacy_rows(range: &Range<DataType>, comments: &CommentMap) -> Vec<ToolRow> {
    let Some((end_row, _)) = range.end() else {
        return Vec::new();
    };

    let mut rows = Vec::new();
    for row in LEGACY_DATA_START..=end_row {
        let platform = cell_to_string(range.get_value((row, LEGACY_PLATFORM)));
        let platform = platform.trim();
        if platform.is_empty() {
            continue;
        }

        rows.push(ToolRow {
            platform: platform.to_string(),
            gtm: tracking_cell(range, comments, row, LEGACY_GTM),
            ga4: tracking_cell(range, comments, row, LEGACY_GA4),
            msa: tracking_cell(range, comments, row, LEGACY_MSA),
            docs_links: trimmed_cell(range, row, LEGACY_DOCS),
            example_sites: trimmed_cell(range, row, LEGACY_EXAMPLES),
            wcs_considerations: trimmed_cell(range, row, LEGACY_WCS),
            ops_notes: String::new(),
            sk_recommended: false,
        });
    }

    rows
}

fn tracking_cell(
    range: &Range<DataType>,
    comments: &CommentMap,
    row: u32,
    col: u32,
) -> TrackingCell {
    let raw = cell_to_string(range.get_value((row, col)));
    let comment = comments
        .get(&(row, col))
        .map(String::as_str)
        .unwrap_or_default();

    TrackingCell {
        status: normalize_status(&raw),
        notes: merge_notes(&raw, comment),
    }
}

fn trimmed_cell(range: &Range<DataType>, row: u32, col: u32) -> String {
    cell_to_string(range.get_value((row, col))).trim().to_string()
}

/// Column lookup for a canonical sheet, built from its header row.
pub struct HeaderIndex {
    columns: Vec<String>,
}

impl HeaderIndex {
    pub fn from_row(header_row: &[DataType]) -> Self {
        Self {
            columns: header_row
                .iter()
                .map(|cell| cell_to_string(Some(cell)))
                .collect(),
        }
    }

    /// Reads the named column from a data row. A header or cell that is
    /// missing resolves to the empty string, never an error.
    pub fn field(&self, row: &[DataType], header: &str) -> String {
        self.columns
            .iter()
            .position(|column| column == header)
            .and_then(|idx| row.get(idx))
            .map(|cell| cell_to_string(Some(cell)))
            .unwrap_or_default()
    }
}

pub fn cell_to_string(cell: Option<&DataType>) -> String {
    match cell {
        Some(DataType::String(value)) => value.clone(),
        Some(DataType::Float(value)) => value.to_string(),
        Some(DataType::Int(value)) => value.to_string(),
        Some(DataType::Bool(value)) => value.to_string(),
        Some(DataType::Empty) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
