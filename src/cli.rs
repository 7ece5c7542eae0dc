use std::{ffi::OsString, path::PathBuf};

use clap::Parser;

use crate::{config::Charset, error::ConfigError};

/// Long flags that may also be written with a single leading dash.
const LONG_FLAGS: &[&str] = &[
    "version",
    "help",
    "noheaders",
    "separator",
    "charset",
    "mapfile",
    "map",
    "out",
    "outdir",
];

#[derive(Debug, Parser)]
#[command(
    name = "xlsxtocsv",
    author,
    version,
    about = "Convert the first sheet of Excel files to CSV",
    long_about = None
)]
pub struct Cli {
    /// Do not generate a header line
    #[arg(long = "noheaders")]
    pub no_headers: bool,
    /// Field separator (',' or ';')
    #[arg(long, default_value = ",", value_parser = parse_separator)]
    pub separator: u8,
    /// CSV file character set encoding (utf8 or ansi)
    #[arg(long, default_value = "utf8", value_parser = parse_charset)]
    pub charset: Charset,
    /// Map file with mapping specifications
    #[arg(long = "mapfile")]
    pub map_file: Option<PathBuf>,
    /// Map an Excel column name to a CSV column name (from=to)
    #[arg(long = "map", action = clap::ArgAction::Append)]
    pub maps: Vec<String>,
    /// Output CSV file (stdout if omitted)
    #[arg(long = "out")]
    pub out: Option<PathBuf>,
    /// Output directory for CSV files
    #[arg(long = "outdir")]
    pub out_dir: Option<PathBuf>,
    /// Input files or glob patterns
    #[arg(value_name = "INPUT", required = true)]
    pub inputs: Vec<String>,
}

pub fn parse_separator(value: &str) -> Result<u8, ConfigError> {
    match value {
        "," => Ok(b','),
        ";" => Ok(b';'),
        other => Err(ConfigError::InvalidSeparator(other.to_string())),
    }
}

pub fn parse_charset(value: &str) -> Result<Charset, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "" | "utf8" | "utf-8" => Ok(Charset::Utf8),
        "ansi" => Ok(Charset::Ansi),
        _ => Err(ConfigError::InvalidCharset(value.to_string())),
    }
}

/// Rewrites `-flag` and `-flag=value` into their `--` form so the classic
/// single-dash spelling keeps working. Arguments after `--` are left alone.
pub fn preprocess_cli_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut processed = Vec::new();
    let mut passthrough = false;
    for arg in args {
        if passthrough {
            processed.push(arg);
            continue;
        }
        let Some(text) = arg.to_str() else {
            processed.push(arg);
            continue;
        };
        if text == "--" {
            passthrough = true;
            processed.push(arg);
            continue;
        }
        let rewritten = text
            .strip_prefix('-')
            .filter(|rest| !rest.starts_with('-'))
            .filter(|rest| {
                let name = rest.split_once('=').map_or(*rest, |(name, _)| name);
                LONG_FLAGS.contains(&name)
            })
            .map(|rest| OsString::from(format!("--{rest}")));
        processed.push(rewritten.unwrap_or(arg));
    }
    processed
}
