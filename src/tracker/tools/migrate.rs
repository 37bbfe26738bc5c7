use std::path::Path;

use calamine::{Reader, Xlsx, open_workbook};
use tracing::{debug, info, instrument};

use crate::tracker::tools::error::Result;
use crate::tracker::tools::io::comments::{self, CommentMap};
use crate::tracker::tools::io::{excel_read, excel_write};
use crate::tracker::tools::model::{CategoryTable, WorkbookData, sanitize_sheet_title};

/// Outcome of a migration run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationSummary {
    pub sheets: usize,
    pub rows: usize,
}

/// Rewrites a legacy tracker workbook into the canonical column schema.
///
/// Every sheet of the source becomes a sheet of the output (sanitized title,
/// fixed 12-column header). Rows without a platform are dropped; everything
/// else is normalized and carried over in source order. The output file is
/// replaced wholesale.
#[instrument(
    level = "info",
    skip_all,
    fields(input = %input.display(), output = %output.display())
)]
pub fn migrate_workbook(input: &Path, output: &Path) -> Result<MigrationSummary> {
    let comments = comments::read_workbook_comments(input)?;
    let mut workbook: Xlsx<_> = open_workbook(input)?;

    let no_comments = CommentMap::new();
    let mut categories = Vec::new();
    for sheet_name in workbook.sheet_names().to_owned() {
        let range = excel_read::read_required_sheet(&mut workbook, &sheet_name)?;
        let sheet_comments = comments.get(&sheet_name).unwrap_or(&no_comments);
        let rows = excel_read::read_legacy_rows(&range, sheet_comments);
        debug!(sheet = %sheet_name, row_count = rows.len(), "sheet migrated");
        categories.push(CategoryTable {
            title: sanitize_sheet_title(&sheet_name),
            rows,
        });
    }

    let workbook_data = WorkbookData { categories };
    excel_write::write_workbook(output, &workbook_data)?;

    let summary = MigrationSummary {
        sheets: workbook_data.categories.len(),
        rows: workbook_data
            .categories
            .iter()
            .map(|category| category.rows.len())
            .sum(),
    };
    info!(sheets = summary.sheets, rows = summary.rows, "workbook migrated");
    Ok(summary)
}
