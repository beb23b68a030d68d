//! Spreadsheet and text exports of analysis results.
//!
//! Builders turn records into plain [`Sheet`] values; [`write_workbook`] is the
//! only place that talks to `rust_xlsxwriter`.

pub mod production;
pub mod standards;
pub mod summary;

use rust_xlsxwriter::{Color, Format, FormatPattern, Workbook};

pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const MAX_COLUMN_WIDTH: usize = 50;
const HEADER_FILL: u32 = 0xCCCCCC;

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    /// Length of the cell as displayed, in characters.
    pub fn display_len(&self) -> usize {
        match self {
            Cell::Text(s) => s.chars().count(),
            Cell::Number(n) => n.to_string().chars().count(),
            Cell::Empty => 0,
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<Option<i64>> for Cell {
    fn from(value: Option<i64>) -> Self {
        value.map(|n| Cell::Number(n as f64)).unwrap_or(Cell::Empty)
    }
}

impl From<u64> for Cell {
    fn from(value: u64) -> Self {
        Cell::Number(value as f64)
    }
}

impl From<usize> for Cell {
    fn from(value: usize) -> Self {
        Cell::Number(value as f64)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<Cell>>,
    /// Whether the first row is styled as a header.
    pub header: bool,
}

impl Sheet {
    pub fn new(name: impl Into<String>, header: &[&str]) -> Self {
        Self {
            name: name.into(),
            rows: vec![header.iter().map(|h| Cell::from(*h)).collect()],
            header: true,
        }
    }

    pub fn push(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    /// `min(longest cell + 2, 50)` for every column.
    pub fn column_widths(&self) -> Vec<usize> {
        let columns = self.rows.iter().map(|r| r.len()).max().unwrap_or(0);
        (0..columns)
            .map(|col| {
                let longest = self
                    .rows
                    .iter()
                    .filter_map(|row| row.get(col))
                    .map(Cell::display_len)
                    .max()
                    .unwrap_or(0);
                (longest + 2).min(MAX_COLUMN_WIDTH)
            })
            .collect()
    }
}

/// Renders sheets into `.xlsx` bytes.
pub fn write_workbook(sheets: &[Sheet]) -> anyhow::Result<Vec<u8>> {
    let mut workbook = Workbook::new();

    let header_format = Format::new()
        .set_bold()
        .set_pattern(FormatPattern::Solid)
        .set_background_color(Color::RGB(HEADER_FILL));

    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&sheet.name)?;

        for (r, row) in sheet.rows.iter().enumerate() {
            let row_num = r as u32;
            let styled = sheet.header && r == 0;
            for (c, cell) in row.iter().enumerate() {
                let col = c as u16;
                match (cell, styled) {
                    (Cell::Text(s), true) => worksheet.write_string_with_format(row_num, col, s, &header_format)?,
                    (Cell::Text(s), false) => worksheet.write_string(row_num, col, s)?,
                    (Cell::Number(n), true) => worksheet.write_number_with_format(row_num, col, *n, &header_format)?,
                    (Cell::Number(n), false) => worksheet.write_number(row_num, col, *n)?,
                    (Cell::Empty, true) => worksheet.write_blank(row_num, col, &header_format)?,
                    (Cell::Empty, false) => continue,
                };
            }
        }

        for (c, width) in sheet.column_widths().into_iter().enumerate() {
            worksheet.set_column_width(c as u16, width as f64)?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}

/// `<uploaded-filename>_<suffix>`, the name offered for a download.
pub fn download_name(uploaded: &str, suffix: &str) -> String {
    format!("{}_{}", uploaded, suffix)
}

/// Whether `filename` looks like one of the reports written by `download_name`.
pub fn is_report_name(filename: &str) -> bool {
    [standards::FILE_SUFFIX, production::FILE_SUFFIX, summary::FILE_SUFFIX]
        .iter()
        .any(|suffix| filename.ends_with(&format!("_{}", suffix)))
}
