//! Output destination selection and CSV writer construction.

use std::{
    fmt,
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use csv::{QuoteStyle, Terminator};

use crate::{
    config::{Charset, Config},
    error::ConvertError,
    transcode::{DEFAULT_SUBSTITUTE, LegacyWriter},
};

pub const OUTPUT_EXTENSION: &str = "csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    File(PathBuf),
    Stdout,
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::File(path) => write!(f, "\"{}\"", path.display()),
            Destination::Stdout => f.write_str("standard output"),
        }
    }
}

/// Picks where the CSV for `input` goes: the fixed output file, a file named
/// after the input inside the output directory, or standard output.
pub fn resolve_destination(input: &Path, config: &Config) -> Destination {
    if let Some(file) = &config.output_file {
        return Destination::File(file.clone());
    }
    if let Some(dir) = &config.output_dir {
        let mut name = input.file_stem().unwrap_or(input.as_os_str()).to_os_string();
        name.push(".");
        name.push(OUTPUT_EXTENSION);
        return Destination::File(dir.join(name));
    }
    Destination::Stdout
}

impl Destination {
    pub fn open(
        &self,
        separator: u8,
        charset: Charset,
    ) -> Result<csv::Writer<Box<dyn Write>>, ConvertError> {
        let base: Box<dyn Write> = match self {
            Destination::File(path) => Box::new(BufWriter::new(File::create(path).map_err(
                |source| ConvertError::CreateOutput {
                    path: path.clone(),
                    source,
                },
            )?)),
            Destination::Stdout => Box::new(io::stdout().lock()),
        };
        let sink: Box<dyn Write> = match charset {
            Charset::Utf8 => base,
            Charset::Ansi => Box::new(LegacyWriter::new(base, DEFAULT_SUBSTITUTE)),
        };
        Ok(csv_writer(sink, separator))
    }
}

pub fn csv_writer<W: Write>(sink: W, separator: u8) -> csv::Writer<W> {
    let mut builder = csv::WriterBuilder::new();
    builder
        .delimiter(separator)
        .terminator(Terminator::Any(b'\n'))
        .quote_style(QuoteStyle::Necessary)
        .double_quote(true)
        .flexible(true);
    builder.from_writer(sink)
}
