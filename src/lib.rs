pub mod cli;
pub mod config;
pub mod convert;
pub mod error;
pub mod mapping;
pub mod normalize;
pub mod output;
pub mod transcode;
pub mod workbook;

use std::{env, ffi::OsString, sync::OnceLock};

use anyhow::{Context, Result, anyhow};
use clap::{Parser, error::ErrorKind};
use log::{LevelFilter, debug, info};

use crate::{cli::Cli, config::Config};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("xlsxtocsv", LevelFilter::Warn);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    run_with_args(env::args_os())
}

pub fn run_with_args<I>(args: I) -> Result<()>
where
    I: IntoIterator<Item = OsString>,
{
    init_logging();
    let cli = match Cli::try_parse_from(cli::preprocess_cli_args(args)) {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.print().context("Writing usage information")?;
            return Ok(());
        }
        Err(err) => {
            let rendered = err.render().to_string();
            let message = rendered.trim_start_matches("error: ").trim_end();
            return Err(anyhow!("{message}"));
        }
    };
    debug!("Parsed command line: {cli:?}");

    let config = Config::from_cli(&cli)?;
    let summary = convert::convert_all(&config)?;
    info!(
        "Converted {} file(s), {} record(s) written",
        summary.files, summary.rows_written
    );
    Ok(())
}
