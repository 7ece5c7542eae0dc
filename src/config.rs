//! Run configuration built once from the command line.
//!
//! [`Config::from_cli`] validates the output target, expands the input
//! arguments, and loads header mappings. The resulting [`Config`] is read-only
//! for the rest of the run.

use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
};

use itertools::Itertools;
use log::debug;

use crate::{cli::Cli, error::ConfigError, mapping::Mappings};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Charset {
    #[default]
    Utf8,
    /// Windows-1252, with `?` for anything it cannot represent.
    Ansi,
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Charset::Utf8 => f.write_str("utf8"),
            Charset::Ansi => f.write_str("ansi"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub headers: bool,
    pub separator: u8,
    pub charset: Charset,
    pub mappings: Mappings,
    pub inputs: Vec<PathBuf>,
    pub output_file: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            headers: true,
            separator: b',',
            charset: Charset::Utf8,
            mappings: Mappings::new(),
            inputs: Vec::new(),
            output_file: None,
            output_dir: None,
        }
    }
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        if cli.out.is_some() && cli.out_dir.is_some() {
            return Err(ConfigError::ConflictingOutputs);
        }
        if let Some(dir) = &cli.out_dir {
            check_output_dir(dir)?;
        }

        let inputs = resolve_inputs(&cli.inputs)?;
        if inputs.is_empty() {
            return Err(ConfigError::NoInputFiles);
        }
        if inputs.len() > 1 && cli.out_dir.is_none() {
            return Err(ConfigError::MultipleInputsWithoutDir(inputs.len()));
        }

        let mut mappings = match &cli.map_file {
            Some(path) => Mappings::load(path)?,
            None => Mappings::new(),
        };
        for spec in &cli.maps {
            mappings.insert_assignment(spec)?;
        }
        debug!(
            "Loaded {} global and {} per-file mapping table(s)",
            mappings.global.len(),
            mappings.per_file.len()
        );

        Ok(Self {
            headers: !cli.no_headers,
            separator: cli.separator,
            charset: cli.charset,
            mappings,
            inputs,
            output_file: cli.out.clone(),
            output_dir: cli.out_dir.clone(),
        })
    }
}

fn check_output_dir(dir: &Path) -> Result<(), ConfigError> {
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(ConfigError::OutputDirNotDirectory(dir.to_path_buf())),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            Err(ConfigError::OutputDirMissing(dir.to_path_buf()))
        }
        Err(source) => Err(ConfigError::OutputDirUnreadable {
            path: dir.to_path_buf(),
            source,
        }),
    }
}

/// Expands literal paths and glob patterns into a sorted, de-duplicated list.
pub fn resolve_inputs(args: &[String]) -> Result<Vec<PathBuf>, ConfigError> {
    let mut inputs = Vec::new();
    for arg in args {
        let literal = Path::new(arg);
        if literal.is_file() {
            inputs.push(literal.to_path_buf());
            continue;
        }
        let paths = glob::glob(arg).map_err(|source| ConfigError::InvalidPattern {
            pattern: arg.clone(),
            source,
        })?;
        // entries that cannot be read are skipped, like a shell would
        let matches: Vec<PathBuf> = paths.filter_map(Result::ok).collect();
        if matches.is_empty() {
            return Err(if arg.contains(['*', '?', '[', ']']) {
                ConfigError::PatternUnmatched(arg.clone())
            } else {
                ConfigError::InputMissing(arg.clone())
            });
        }
        inputs.extend(matches);
    }
    Ok(inputs.into_iter().sorted().dedup().collect())
}
