//! Header rename tables.
//!
//! A mapping file is a list of `from = to` lines. Lines before the first
//! `[name]` section fill the global table; a section switches the target to
//! the table for the input file whose base name is `name`. Anything else is
//! ignored. There is no quoting, escaping, or comment syntax.
//!
//! Lookups check the file's own table first, then the global table, and fall
//! back to the header text itself.

use std::{
    collections::HashMap,
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
    sync::LazyLock,
};

use regex::Regex;

use crate::error::ConfigError;

pub type MappingTable = HashMap<String, String>;

static ASSIGNMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(.+?)\s*=\s*(.+)").expect("valid assignment pattern"));
static SECTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(.+)\]").expect("valid section pattern"));

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Mappings {
    pub global: MappingTable,
    pub per_file: HashMap<String, MappingTable>,
}

/// Parser position inside a mapping file: which table receives assignments.
enum Section {
    Global,
    File(String),
}

impl Mappings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path).map_err(|source| ConfigError::MapFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(BufReader::new(file)).map_err(|source| ConfigError::MapFile {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse<R: BufRead>(reader: R) -> io::Result<Self> {
        let mut mappings = Self::new();
        let mut section = Section::Global;
        for line in reader.lines() {
            let line = line?;
            let line = line.trim();
            if let Some(caps) = ASSIGNMENT.captures(line) {
                let table = match &section {
                    Section::Global => &mut mappings.global,
                    Section::File(name) => mappings.per_file.entry(name.clone()).or_default(),
                };
                table.insert(caps[1].to_string(), caps[2].to_string());
            } else if let Some(caps) = SECTION.captures(line) {
                let name = caps[1].to_string();
                mappings.per_file.entry(name.clone()).or_default();
                section = Section::File(name);
            }
        }
        Ok(mappings)
    }

    /// Adds a `from=to` command-line entry to the global table.
    pub fn insert_assignment(&mut self, spec: &str) -> Result<(), ConfigError> {
        let parts: Vec<&str> = spec.split('=').collect();
        let [from, to] = parts.as_slice() else {
            return Err(ConfigError::InvalidMapping(spec.to_string()));
        };
        self.global
            .insert(from.trim().to_string(), to.trim().to_string());
        Ok(())
    }

    pub fn resolve_header<'a>(&'a self, file_name: &str, header: &'a str) -> &'a str {
        self.per_file
            .get(file_name)
            .and_then(|table| table.get(header))
            .or_else(|| self.global.get(header))
            .map(String::as_str)
            .unwrap_or(header)
    }
}
