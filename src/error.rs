//! Error types for configuration loading and file conversion.
//!
//! Every variant is fatal. The binary reports the message once and exits
//! with status 1; nothing here is retried.

use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid separator '{0}'; only \",\" and \";\" are supported")]
    InvalidSeparator(String),
    #[error("Invalid character set '{0}'; supported character sets are \"utf8\" and \"ansi\"")]
    InvalidCharset(String),
    #[error("Specifying both an output file and an output directory is not allowed")]
    ConflictingOutputs,
    #[error("Directory {0:?} does not exist")]
    OutputDirMissing(PathBuf),
    #[error("{0:?} is not a directory")]
    OutputDirNotDirectory(PathBuf),
    #[error("Cannot check directory {path:?}: {source}")]
    OutputDirUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("No input file specified")]
    NoInputFiles,
    #[error(
        "Multiple input files ({0}) cannot be written to a single output file or to standard output"
    )]
    MultipleInputsWithoutDir(usize),
    #[error("Invalid mapping specification '{0}', from=to expected")]
    InvalidMapping(String),
    #[error("\"{0}\" does not exist")]
    InputMissing(String),
    #[error("\"{0}\" does not match anything")]
    PatternUnmatched(String),
    #[error("Cannot analyze input \"{pattern}\": {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
    #[error("Cannot read mapping file {path:?}: {source}")]
    MapFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Cannot open Excel file {path:?}: {source}")]
    OpenInput {
        path: PathBuf,
        #[source]
        source: calamine::XlsxError,
    },
    #[error("Excel file {0:?} does not contain any sheet")]
    NoSheets(PathBuf),
    #[error("Error while reading {path:?}: {source}")]
    ReadInput {
        path: PathBuf,
        #[source]
        source: calamine::XlsxError,
    },
    #[error("Cannot create output file {path:?}: {source}")]
    CreateOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Error while writing to {destination}: {source}")]
    Write {
        destination: String,
        #[source]
        source: csv::Error,
    },
}
