use std::path::Path;

use rust_xlsxwriter::{Color, Format, FormatAlign, Workbook};

use crate::tracker::tools::error::Result;
use crate::tracker::tools::model::{CANONICAL_HEADERS, WorkbookData};

/// Solid fill color of each header cell, in canonical column order.
const HEADER_FILLS: [u32; 12] = [
    0x2563EB, // Platform/Tool
    0xDC2626, // GTM Status
    0xFECACA, // GTM Notes
    0x4338CA, // GA4 Status
    0xE0E7FF, // GA4 Notes
    0xB45309, // MSA Status
    0xFED7AA, // MSA Notes
    0x0F766E, // Docs Links
    0x99F6E4, // Example Sites
    0x6B7280, // WCS Team Considerations
    0x9CA3AF, // Ops Notes
    0x065F46, // SK Recommended
];

/// Free-text columns that wrap instead of overflowing their cells.
const WRAPPED_COLUMNS: [usize; 5] = [2, 4, 6, 9, 10];

const COLUMN_WIDTH: f64 = 28.0;

/// Writes the migrated workbook data to the given path.
pub fn write_workbook(path: &Path, workbook: &WorkbookData) -> Result<()> {
    let mut workbook_writer = Workbook::new();

    let wrap_format = Format::new()
        .set_text_wrap()
        .set_align(FormatAlign::Top)
        .set_align(FormatAlign::Left);

    for category in &workbook.categories {
        let worksheet = workbook_writer.add_worksheet();
        worksheet.set_name(&category.title)?;

        for (col_idx, header) in CANONICAL_HEADERS.iter().enumerate() {
            let header_format = Format::new()
                .set_bold()
                .set_font_color(Color::White)
                .set_background_color(Color::RGB(HEADER_FILLS[col_idx]))
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter);
            worksheet.write_string_with_format(0, col_idx as u16, *header, &header_format)?;
            worksheet.set_column_width(col_idx as u16, COLUMN_WIDTH)?;
        }
        worksheet.set_freeze_panes(1, 0)?;

        for (row_idx, row) in category.rows.iter().enumerate() {
            for (col_idx, cell) in row.to_cells().iter().enumerate() {
                let row_pos = (row_idx + 1) as u32;
                let col_pos = col_idx as u16;
                if WRAPPED_COLUMNS.contains(&col_idx) {
                    worksheet.write_string_with_format(row_pos, col_pos, cell.as_str(), &wrap_format)?;
                } else {
                    worksheet.write_string(row_pos, col_pos, cell.as_str())?;
                }
            }
        }
    }

    workbook_writer.save(path)?;
    Ok(())
}
