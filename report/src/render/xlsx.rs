//! XLSX output through `rust_xlsxwriter`.

use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Formula, Workbook, Worksheet};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

use super::{
    Alignment, Border, CellContent, CellStyle, GridSink, MergedRange, ReportGrid, StyledCell,
};
use crate::error::RenderResult;
use crate::models::format_number;

/// Collects a grid into a single worksheet.
pub struct XlsxSink {
    worksheet: Worksheet,
}

impl XlsxSink {
    pub fn new(sheet_name: &str) -> RenderResult<Self> {
        let mut worksheet = Worksheet::new();
        worksheet.set_name(sheet_name)?;
        Ok(Self { worksheet })
    }

    /// Serialize the workbook to XLSX bytes.
    pub fn finish(self) -> RenderResult<Vec<u8>> {
        let mut workbook = Workbook::new();
        workbook.push_worksheet(self.worksheet);
        Ok(workbook.save_to_buffer()?)
    }
}

impl GridSink for XlsxSink {
    fn write_cell(&mut self, row: u32, col: u16, cell: &StyledCell) -> RenderResult<()> {
        let format = convert_style_to_format(&cell.style);
        let sheet = &mut self.worksheet;

        match &cell.content {
            CellContent::Blank => {
                sheet.write_blank(row, col, &format)?;
            }
            CellContent::Text(s) => {
                sheet.write_string_with_format(row, col, s, &format)?;
            }
            CellContent::Number(n) => {
                sheet.write_number_with_format(row, col, *n, &format)?;
            }
            CellContent::Formula { formula, result } => {
                let formula = Formula::new(formula).set_result(format_number(*result));
                sheet.write_formula_with_format(row, col, formula, &format)?;
            }
        }
        Ok(())
    }

    fn merge(&mut self, range: &MergedRange) -> RenderResult<()> {
        let format = convert_style_to_format(&range.style);
        self.worksheet.merge_range(
            range.row,
            range.first_col,
            range.row,
            range.last_col,
            &range.text,
            &format,
        )?;
        Ok(())
    }
}

fn convert_style_to_format(style: &CellStyle) -> Format {
    let mut format = Format::new();

    if style.bold {
        format = format.set_bold();
    }

    if style.alignment == Alignment::CenterMiddle {
        format = format
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter);
    }

    if style.border == Border::Thin {
        format = format.set_border(FormatBorder::Thin);
    }

    if let Some(num_format) = style.number_format {
        format = format.set_num_format(num_format);
    }

    format
}

/// Render a grid into XLSX bytes.
pub fn grid_to_xlsx(grid: &ReportGrid) -> RenderResult<Vec<u8>> {
    let mut sink = XlsxSink::new(&grid.sheet_name)?;
    grid.write_to(&mut sink)?;
    sink.finish()
}

/// Write a grid to `path`.
///
/// The workbook goes to a uniquely named temp file in the target folder,
/// is synced, then persisted over `path`. A failed write leaves `path`
/// and its neighbours untouched.
pub fn save_xlsx(grid: &ReportGrid, path: &Path) -> RenderResult<()> {
    let bytes = grid_to_xlsx(grid)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(&bytes)?;
    tmp.as_file_mut().flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
