//! Streaming access to the first worksheet of an XLSX workbook.
//!
//! Cells are pulled one at a time from calamine's XML cell reader and grouped
//! into rows, so only the current row is ever held in memory.

use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use calamine::{DataRef, Reader, Xlsx, XlsxError, open_workbook};
use chrono::Timelike;

use crate::{error::ConvertError, normalize::SparseRow};

type Source = BufReader<File>;

type RawCell = (u32, usize, Option<String>);

pub struct Workbook {
    path: PathBuf,
    inner: Xlsx<Source>,
    sheet: String,
}

impl Workbook {
    pub fn open(path: &Path) -> Result<Self, ConvertError> {
        let inner: Xlsx<Source> =
            open_workbook(path).map_err(|source| ConvertError::OpenInput {
                path: path.to_path_buf(),
                source,
            })?;
        let sheet = inner
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ConvertError::NoSheets(path.to_path_buf()))?;
        Ok(Self {
            path: path.to_path_buf(),
            inner,
            sheet,
        })
    }

    pub fn sheet_name(&self) -> &str {
        &self.sheet
    }

    /// Starts reading the first sheet. The returned iterator cannot be
    /// restarted; call `rows` again for a fresh pass.
    pub fn rows(&mut self) -> Result<SheetRows<'_>, ConvertError> {
        let Self { path, inner, sheet } = self;
        let mut cells = inner
            .worksheet_cells_reader(sheet)
            .map_err(|source| ConvertError::OpenInput {
                path: path.clone(),
                source,
            })?;
        let pull = move || {
            cells.next_cell().map(|cell| {
                cell.map(|cell| {
                    let (row, column) = cell.get_position();
                    (row, column as usize, cell_text(cell.get_value()))
                })
            })
        };
        Ok(SheetRows {
            path: path.as_path(),
            pull: Box::new(pull),
            lookahead: None,
            finished: false,
        })
    }
}

pub struct SheetRows<'a> {
    path: &'a Path,
    pull: Box<dyn FnMut() -> Result<Option<RawCell>, XlsxError> + 'a>,
    lookahead: Option<(u32, usize, String)>,
    finished: bool,
}

impl SheetRows<'_> {
    fn next_cell(&mut self) -> Result<Option<(u32, usize, String)>, ConvertError> {
        loop {
            let cell = (self.pull)().map_err(|source| ConvertError::ReadInput {
                path: self.path.to_path_buf(),
                source,
            })?;
            match cell {
                None => return Ok(None),
                Some((row, column, Some(text))) => return Ok(Some((row, column, text))),
                Some((_, _, None)) => {}
            }
        }
    }
}

impl Iterator for SheetRows<'_> {
    type Item = Result<SparseRow, ConvertError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let first = match self.lookahead.take() {
            Some(cell) => cell,
            None => match self.next_cell() {
                Ok(Some(cell)) => cell,
                Ok(None) => {
                    self.finished = true;
                    return None;
                }
                Err(err) => {
                    self.finished = true;
                    return Some(Err(err));
                }
            },
        };
        let (row, column, text) = first;
        let mut cells = vec![(column, text)];
        loop {
            match self.next_cell() {
                Ok(Some((next_row, column, text))) if next_row == row => {
                    cells.push((column, text));
                }
                Ok(Some(other)) => {
                    self.lookahead = Some(other);
                    break;
                }
                Ok(None) => {
                    self.finished = true;
                    break;
                }
                Err(err) => {
                    self.finished = true;
                    return Some(Err(err));
                }
            }
        }
        Some(Ok(cells))
    }
}

/// Renders a cell the way it reads in the spreadsheet. `None` for empty cells.
fn cell_text(value: &DataRef<'_>) -> Option<String> {
    let text = match value {
        DataRef::Empty => return None,
        DataRef::String(s) => s.clone(),
        DataRef::SharedString(s) => (*s).to_string(),
        DataRef::Int(i) => i.to_string(),
        DataRef::Float(f) => float_text(*f),
        DataRef::Bool(true) => "TRUE".to_string(),
        DataRef::Bool(false) => "FALSE".to_string(),
        DataRef::DateTime(dt) => match dt.as_datetime() {
            Some(stamp) if stamp.num_seconds_from_midnight() == 0 => {
                stamp.format("%Y-%m-%d").to_string()
            }
            Some(stamp) => stamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => dt.as_f64().to_string(),
        },
        DataRef::DateTimeIso(s) | DataRef::DurationIso(s) => s.clone(),
        DataRef::Error(err) => err.to_string(),
    };
    Some(text)
}

/// Plain decimal for everyday magnitudes, exponent form for the extremes.
fn float_text(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude >= 1e21 || (magnitude != 0.0 && magnitude < 1e-7) {
        format!("{value:e}")
    } else {
        value.to_string()
    }
}
