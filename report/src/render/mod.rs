//! Report rendering.
//!
//! [`render_table`] lays an [`OutputTable`] out as a [`ReportGrid`]: a list
//! of styled cells and merged ranges with zero-based coordinates. The grid
//! is then replayed into any [`GridSink`]; [`xlsx::XlsxSink`] produces the
//! workbook.
//!
//! ```text
//! row 0      │ Sr No │ Shop Name │ ... │ Total Sqft │ ... │   bold header
//! rows 1..=n │   1   │ Acme      │ ... │    12.00   │ ... │   data
//! row n+1    │ =COUNTA │      TOTAL (B..J)     │ =SUM │   │   total row
//! ```

pub mod xlsx;

use crate::error::RenderResult;
use crate::models::{
    FieldValue, OutputTable, OUTPUT_COLUMNS, SR_NO_COLUMN, TOTAL_LABEL_COLUMNS,
    TOTAL_SQFT_COLUMN, TWO_DECIMAL_COLUMNS,
};

/// Display format for the measurement columns.
pub const TWO_DECIMALS: &str = "0.00";

/// Label of the merged total cell.
pub const TOTAL_LABEL: &str = "TOTAL";

// =============================================================================
// Styles
// =============================================================================

/// Cell alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    General,
    /// Horizontally centered, vertically middle.
    CenterMiddle,
}

/// Cell border.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Border {
    #[default]
    None,
    Thin,
}

/// Presentation of one cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CellStyle {
    pub bold: bool,
    pub number_format: Option<&'static str>,
    pub alignment: Alignment,
    pub border: Border,
}

impl CellStyle {
    /// Centered with a thin border, the base style of every report cell.
    pub fn boxed() -> Self {
        Self {
            alignment: Alignment::CenterMiddle,
            border: Border::Thin,
            ..Self::default()
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn number_format(mut self, format: &'static str) -> Self {
        self.number_format = Some(format);
        self
    }
}

// =============================================================================
// Cells
// =============================================================================

/// What a cell holds.
#[derive(Debug, Clone, PartialEq)]
pub enum CellContent {
    Blank,
    Text(String),
    Number(f64),
    /// A live formula with its precomputed result.
    Formula { formula: String, result: f64 },
}

impl From<&FieldValue> for CellContent {
    fn from(value: &FieldValue) -> Self {
        match value {
            FieldValue::Empty => CellContent::Blank,
            FieldValue::Text(s) if s.is_empty() => CellContent::Blank,
            FieldValue::Text(s) => CellContent::Text(s.clone()),
            FieldValue::Number(n) => CellContent::Number(*n),
        }
    }
}

/// A value plus its presentation.
#[derive(Debug, Clone, PartialEq)]
pub struct StyledCell {
    pub content: CellContent,
    pub style: CellStyle,
}

impl StyledCell {
    pub fn new(content: CellContent, style: CellStyle) -> Self {
        Self { content, style }
    }
}

/// A horizontal merged range holding one text label.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedRange {
    pub row: u32,
    pub first_col: u16,
    pub last_col: u16,
    pub text: String,
    pub style: CellStyle,
}

// =============================================================================
// Grid
// =============================================================================

/// Destination for rendered cells.
pub trait GridSink {
    /// Write one cell; coordinates are zero-based.
    fn write_cell(&mut self, row: u32, col: u16, cell: &StyledCell) -> RenderResult<()>;

    /// Merge a horizontal range and write its label.
    fn merge(&mut self, range: &MergedRange) -> RenderResult<()>;
}

/// Declarative layout of one report sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportGrid {
    pub sheet_name: String,
    pub cells: Vec<(u32, u16, StyledCell)>,
    pub merges: Vec<MergedRange>,
}

impl ReportGrid {
    fn new(sheet_name: &str) -> Self {
        Self {
            sheet_name: sheet_name.to_string(),
            cells: Vec::new(),
            merges: Vec::new(),
        }
    }

    fn put(&mut self, row: u32, col: usize, content: CellContent, style: CellStyle) {
        self.cells
            .push((row, col as u16, StyledCell::new(content, style)));
    }

    /// Cell written at a position, if any.
    pub fn cell(&self, row: u32, col: u16) -> Option<&StyledCell> {
        self.cells
            .iter()
            .find(|(r, c, _)| *r == row && *c == col)
            .map(|(_, _, cell)| cell)
    }

    /// Number of rows spanned, header and total row included.
    pub fn row_count(&self) -> u32 {
        self.cells.iter().map(|(r, _, _)| r + 1).max().unwrap_or(0)
    }

    /// Replay every cell, then every merge, into a sink.
    pub fn write_to<S: GridSink>(&self, sink: &mut S) -> RenderResult<()> {
        for (row, col, cell) in &self.cells {
            sink.write_cell(*row, *col, cell)?;
        }
        for range in &self.merges {
            sink.merge(range)?;
        }
        Ok(())
    }
}

// =============================================================================
// Rendering
// =============================================================================

/// Spreadsheet column letter for a zero-based index.
pub fn column_letter(col: usize) -> String {
    let mut n = col + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Lay out a table as header, data rows and total row.
pub fn render_table(table: &OutputTable, sheet_name: &str) -> ReportGrid {
    let mut grid = ReportGrid::new(sheet_name);

    for (col, name) in OUTPUT_COLUMNS.iter().enumerate() {
        grid.put(0, col, CellContent::Text(name.to_string()), CellStyle::boxed().bold());
    }

    for (i, record) in table.records.iter().enumerate() {
        let row = i as u32 + 1;
        for (col, value) in record.cells().iter().enumerate() {
            let mut style = CellStyle::boxed();
            if TWO_DECIMAL_COLUMNS.contains(&OUTPUT_COLUMNS[col]) && value.as_number().is_some() {
                style = style.number_format(TWO_DECIMALS);
            }
            grid.put(row, col, value.into(), style);
        }
    }

    render_total_row(&mut grid, table);
    grid
}

fn render_total_row(grid: &mut ReportGrid, table: &OutputTable) {
    let total = &table.total;
    let row = total.data_rows as u32 + 1;
    // Spreadsheet rows are 1-based and row 1 is the header.
    let last_data_row = total.data_rows + 1;
    let (label_first, label_last) = TOTAL_LABEL_COLUMNS;

    let sr_no_content = if total.data_rows == 0 {
        CellContent::Number(0.0)
    } else {
        let letter = column_letter(SR_NO_COLUMN);
        CellContent::Formula {
            formula: format!("=COUNTA({letter}2:{letter}{last_data_row})"),
            result: total.run_count as f64,
        }
    };
    let sqft_content = if total.data_rows == 0 {
        CellContent::Number(0.0)
    } else {
        let letter = column_letter(TOTAL_SQFT_COLUMN);
        CellContent::Formula {
            formula: format!("=SUM({letter}2:{letter}{last_data_row})"),
            result: total.total_sqft,
        }
    };

    for col in 0..OUTPUT_COLUMNS.len() {
        if (label_first..=label_last).contains(&col) {
            continue;
        }
        match col {
            SR_NO_COLUMN => grid.put(row, col, sr_no_content.clone(), CellStyle::boxed()),
            TOTAL_SQFT_COLUMN => grid.put(
                row,
                col,
                sqft_content.clone(),
                CellStyle::boxed().bold().number_format(TWO_DECIMALS),
            ),
            _ => grid.put(row, col, CellContent::Blank, CellStyle::boxed()),
        }
    }

    grid.merges.push(MergedRange {
        row,
        first_col: label_first as u16,
        last_col: label_last as u16,
        text: TOTAL_LABEL.to_string(),
        style: CellStyle::boxed().bold(),
    });
}
