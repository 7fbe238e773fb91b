//! Hash2unicode Table Extraction
//!
//! The generated glyph table source contains an initializer list like
//!
//! ```text
//! static const struct { uint32_t hash; uint32_t codepoint; } hash2unicode {{
//!     {0x0014a5f3, 0x0041}, // A
//!     {0x0022b4b4, 0x00c6}, // AE
//! }};
//! ```
//!
//! Extraction starts after the first marker line and stops at the first
//! line that is not an entry. Lines are read as bytes; comments elsewhere
//! in the file need not be UTF-8.

use lazy_static::lazy_static;
use log::{debug, info, warn};
use regex::bytes::Regex;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;

lazy_static! {
    /// `hash2unicode {{` or `hash2unicode = {{` at the end of a line
    static ref MARKER: Regex = Regex::new(r"(?-u:\b)hash2unicode\s*(?:=\s*)?\{\{$").unwrap();
    static ref ENTRY: Regex = Regex::new(
        r"^\s*\{(0x[0-9A-Fa-f]{8}),\s*(0x[0-9A-Fa-f]{4})\}, //\s*(?-u:(.+?))\s*$"
    ).unwrap();
}

#[derive(Debug, Error)]
pub enum TableError {
    #[error("Failed to open {0}: {1}")]
    Open(PathBuf, #[source] std::io::Error),

    #[error("Failed to read line {1} of {0}: {2}")]
    Read(PathBuf, usize, #[source] std::io::Error),
}

/// Line that opens the hash2unicode initializer list
pub struct TableMarker;

impl TableMarker {
    pub const IDENTIFIER: &'static str = "hash2unicode";

    pub fn matches(line: &str) -> bool {
        Self::matches_bytes(line.as_bytes())
    }

    pub fn matches_bytes(line: &[u8]) -> bool {
        MARKER.is_match(line.trim_ascii_end())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashEntry {
    pub hash: u32,
    pub codepoint: u32,
    pub name: String,
}

impl HashEntry {
    pub fn new(hash: u32, name: impl Into<String>) -> Self {
        Self { hash, codepoint: 0, name: name.into() }
    }

    /// Parse `{0x........, 0x....}, // name`
    pub fn parse(line: &str) -> Option<Self> {
        Self::parse_bytes(line.as_bytes())
    }

    pub fn parse_bytes(line: &[u8]) -> Option<Self> {
        let caps = ENTRY.captures(line)?;
        let hash = parse_hex(&caps[1])?;
        let codepoint = parse_hex(&caps[2])?;
        // glyph names are ASCII
        let name = String::from_utf8_lossy(&caps[3]).into_owned();
        Some(Self { hash, codepoint, name })
    }

    /// Hash as the fixed-width literal used in generated code
    pub fn hash_literal(&self) -> String {
        format!("{:#010x}", self.hash)
    }
}

fn parse_hex(literal: &[u8]) -> Option<u32> {
    let digits = std::str::from_utf8(literal.strip_prefix(b"0x")?).ok()?;
    u32::from_str_radix(digits, 16).ok()
}

/// Entries of one table in source order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashTable {
    /// 1-based line of the marker, if one was found
    pub marker_line: Option<usize>,
    pub entries: Vec<HashEntry>,
}

impl HashTable {
    pub fn marker_found(&self) -> bool {
        self.marker_line.is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

enum ScanState {
    SeekingMarker,
    InTable,
    Done,
}

pub fn extract_entries(reader: impl BufRead) -> Result<HashTable, TableError> {
    extract_entries_named(reader, Path::new("<input>"))
}

fn extract_entries_named(mut reader: impl BufRead, origin: &Path) -> Result<HashTable, TableError> {
    let mut table = HashTable::default();
    let mut state = ScanState::SeekingMarker;
    let mut buf = Vec::new();
    let mut lineno = 0;

    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .map_err(|e| TableError::Read(origin.to_path_buf(), lineno + 1, e))?;
        if read == 0 {
            break;
        }
        lineno += 1;
        let line = buf.strip_suffix(b"\n").unwrap_or(&buf);
        let line = line.strip_suffix(b"\r").unwrap_or(line);

        match state {
            ScanState::SeekingMarker => {
                if TableMarker::matches_bytes(line) {
                    debug!("{}: table marker on line {}", origin.display(), lineno);
                    table.marker_line = Some(lineno);
                    state = ScanState::InTable;
                }
            }
            ScanState::InTable => match HashEntry::parse_bytes(line) {
                Some(entry) => table.entries.push(entry),
                None => state = ScanState::Done,
            },
            ScanState::Done => break,
        }
    }

    if table.marker_found() {
        info!("{}: extracted {} entries", origin.display(), table.len());
    } else {
        warn!(
            "{}: no `{} {{{{` marker found, emitting an empty table",
            origin.display(),
            TableMarker::IDENTIFIER
        );
    }
    Ok(table)
}

pub fn extract_from_path(path: &Path) -> Result<HashTable, TableError> {
    let file = File::open(path).map_err(|e| TableError::Open(path.to_path_buf(), e))?;
    extract_entries_named(BufReader::new(file), path)
}
