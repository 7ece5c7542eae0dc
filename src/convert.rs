//! The per-file conversion loop.
//!
//! Each input is opened, its first sheet streamed row by row, and every row
//! written before the next one is read. The first row is the header: it is
//! renamed through the mapping tables and fixes the minimum width of all data
//! rows. Files are handled one after another and the first error stops the
//! whole run.

use std::{io::Write, path::Path};

use log::{debug, info};

use crate::{
    config::Config,
    error::ConvertError,
    mapping::Mappings,
    normalize::{SparseRow, normalize},
    output::{Destination, resolve_destination},
    workbook::Workbook,
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FileSummary {
    /// Records written, header included.
    pub rows_written: usize,
    /// Width of the header row; `None` when headers are disabled.
    pub column_count: Option<usize>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub files: usize,
    pub rows_written: usize,
}

/// Rendering rules for the rows of one input file.
#[derive(Debug, Clone, Copy)]
pub struct RecordLayout<'a> {
    pub file_name: &'a str,
    pub headers: bool,
    pub mappings: &'a Mappings,
}

#[derive(Clone, Copy)]
enum Phase {
    Header,
    Data { min_len: usize },
}

pub fn convert_all(config: &Config) -> Result<RunSummary, ConvertError> {
    let mut run = RunSummary::default();
    for input in &config.inputs {
        let summary = convert_file(input, config)?;
        run.files += 1;
        run.rows_written += summary.rows_written;
    }
    Ok(run)
}

pub fn convert_file(input: &Path, config: &Config) -> Result<FileSummary, ConvertError> {
    let mut workbook = Workbook::open(input)?;
    let destination = resolve_destination(input, config);
    info!("Converting '{}' -> {}", input.display(), destination);
    debug!(
        "Reading sheet '{}' (charset {}, separator '{}')",
        workbook.sheet_name(),
        config.charset,
        config.separator as char
    );

    let mut writer = destination.open(config.separator, config.charset)?;
    let file_name = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let layout = RecordLayout {
        file_name: &file_name,
        headers: config.headers,
        mappings: &config.mappings,
    };
    let summary = layout.write_records(workbook.rows()?, &mut writer, &destination)?;
    info!(
        "Wrote {} record(s) to {}",
        summary.rows_written, destination
    );
    Ok(summary)
}

impl RecordLayout<'_> {
    /// Drains `rows` into `writer` and flushes it. Works on any row source,
    /// which keeps the loop independent of the workbook reader.
    pub fn write_records<I, W>(
        &self,
        rows: I,
        writer: &mut csv::Writer<W>,
        destination: &Destination,
    ) -> Result<FileSummary, ConvertError>
    where
        I: IntoIterator<Item = Result<SparseRow, ConvertError>>,
        W: Write,
    {
        let write_error = |source: csv::Error| ConvertError::Write {
            destination: destination.to_string(),
            source,
        };
        let mut summary = FileSummary::default();
        let mut phase = Phase::Header;
        for row in rows {
            let cells = row?;
            let record = match phase {
                Phase::Header => {
                    let mut record = normalize(cells, 0);
                    if !self.headers {
                        // the header line is read but not emitted
                        phase = Phase::Data { min_len: 0 };
                        continue;
                    }
                    for header in record.iter_mut() {
                        let renamed = self
                            .mappings
                            .resolve_header(self.file_name, header)
                            .to_string();
                        *header = renamed;
                    }
                    debug!("Header for '{}': {:?}", self.file_name, record);
                    summary.column_count = Some(record.len());
                    phase = Phase::Data {
                        min_len: record.len(),
                    };
                    record
                }
                Phase::Data { min_len } => normalize(cells, min_len),
            };
            if record.len() == 1 && record[0].is_empty() {
                // the csv crate quotes a lone empty field; emit a bare line instead
                writer
                    .flush()
                    .and_then(|()| writer.get_mut().write_all(b"\n"))
                    .map_err(|err| write_error(csv::Error::from(err)))?;
            } else {
                writer.write_record(&record).map_err(write_error)?;
            }
            summary.rows_written += 1;
        }
        writer
            .flush()
            .map_err(|err| write_error(csv::Error::from(err)))?;
        Ok(summary)
    }
}
