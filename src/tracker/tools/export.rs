use std::fs;
use std::path::Path;

use calamine::{DataType, Range, Reader, Xlsx, open_workbook};
use tracing::{debug, info, instrument, warn};

use crate::tracker::tools::error::Result;
use crate::tracker::tools::io::excel_read::HeaderIndex;
use crate::tracker::tools::model::{EXPORT_CATEGORIES, ToolRecord, TrackingField};
use crate::tracker::tools::normalize::{parse_recommended, split_links};

/// Outcome of an export run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSummary {
    pub records: usize,
    pub missing_categories: usize,
}

/// Flattens the canonical workbook into one ordered JSON array of records.
///
/// Categories are processed in [`EXPORT_CATEGORIES`] order; a category whose
/// sheet is absent is logged and skipped, all others still export. Within a
/// sheet, records keep row order.
#[instrument(
    level = "info",
    skip_all,
    fields(input = %input.display(), output = %output.display())
)]
pub fn export_workbook(input: &Path, output: &Path) -> Result<ExportSummary> {
    let mut workbook: Xlsx<_> = open_workbook(input)?;

    let mut records: Vec<ToolRecord> = Vec::new();
    let mut missing_categories = 0;
    for category in EXPORT_CATEGORIES {
        let Some(range_result) = workbook.worksheet_range(category) else {
            warn!(category, "sheet missing, skipping category");
            missing_categories += 1;
            continue;
        };
        let range = range_result?;
        let before = records.len();
        collect_category(category, &range, &mut records);
        debug!(category, record_count = records.len() - before, "category exported");
    }

    let json = serde_json::to_string_pretty(&records)?;
    fs::write(output, json)?;

    let summary = ExportSummary {
        records: records.len(),
        missing_categories,
    };
    info!(records = summary.records, "records exported");
    Ok(summary)
}

/// Appends the records of one category sheet. Row 1 is the header; fields are
/// resolved by header name and default to empty when absent.
fn collect_category(category: &str, range: &Range<DataType>, records: &mut Vec<ToolRecord>) {
    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return;
    };
    let headers = HeaderIndex::from_row(header_row);

    for row in rows {
        let platform = headers.field(row, "Platform/Tool");
        if platform.trim().is_empty() {
            continue;
        }

        records.push(ToolRecord {
            category: category.to_string(),
            platform,
            gtm_ads_trackable: tracking_field(&headers, row, "GTM Status", "GTM Notes"),
            ga4_trackable: tracking_field(&headers, row, "GA4 Status", "GA4 Notes"),
            msa_tracking: tracking_field(&headers, row, "MSA Status", "MSA Notes"),
            doc_links: split_links(&headers.field(row, "Docs Links")),
            example_sites: split_links(&headers.field(row, "Example Sites")),
            wcs_team_considerations: headers.field(row, "WCS Team Considerations"),
            ops_notes: headers.field(row, "Ops Notes"),
            sk_recommended: parse_recommended(&headers.field(row, "SK Recommended")),
        });
    }
}

fn tracking_field(
    headers: &HeaderIndex,
    row: &[DataType],
    status_header: &str,
    notes_header: &str,
) -> TrackingField {
    TrackingField {
        status: headers.field(row, status_header),
        notes: headers.field(row, notes_header),
    }
}
