//! LaTeX Sanitizer - break markers for generated manual sources
//!
//! The LaTeX emitted for the manual runs words together at slashes and at
//! the `-{}` hyphen idiom. Each non-exempt line gets three rewrites, in
//! this order:
//!
//! 1. `word/` becomes `word\slash{}`
//! 2. `-{}-{}` becomes `\=/\=/`
//! 3. `-{}` after a non-alphanumeric character becomes `\=/`
//!
//! Lines containing `\def` or `\href` are exempt. Every line loses its
//! trailing ASCII whitespace.
//!
//! The manual may be written in any ASCII-compatible encoding (dblatex
//! defaults to Latin-1), so all of this works on bytes.

use lazy_static::lazy_static;
use log::{debug, info};
use regex::bytes::{NoExpand, Regex};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::config::SanitizerConfig;

lazy_static! {
    static ref EXEMPT: Regex = Regex::new(r"\\def|\\href").unwrap();
    static ref SLASH_AFTER_WORD: Regex = Regex::new(r"([a-zA-Z0-9]+)/").unwrap();
    static ref DOUBLE_HYPHEN_BRACE: Regex = Regex::new(r"-\{\}-\{\}").unwrap();
    static ref LONE_HYPHEN_BRACE: Regex = Regex::new(r"(?-u:([^a-zA-Z0-9]))-\{\}").unwrap();
}

#[derive(Debug, Error)]
pub enum LatexError {
    #[error("Failed to read {0}: {1}")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("Failed to remove rendered artifact {0}: {1}")]
    RemoveArtifact(PathBuf, #[source] std::io::Error),

    #[error("Failed to write temporary file for {0}: {1}")]
    Write(PathBuf, #[source] std::io::Error),

    #[error("Failed to replace {0}: {1}")]
    Persist(PathBuf, #[source] std::io::Error),
}

/// ASCII whitespace; other bytes such as 0xa0 are content
fn is_trailing_space(b: &u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
}

fn trim_end(line: &[u8]) -> &[u8] {
    let len = line.iter().rposition(|b| !is_trailing_space(b)).map_or(0, |i| i + 1);
    &line[..len]
}

/// One line of a LaTeX source, without its line terminator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatexLine {
    pub raw: Vec<u8>,
    exempt: bool,
}

impl LatexLine {
    pub fn new(raw: impl Into<Vec<u8>>) -> Self {
        let raw = raw.into();
        let exempt = EXEMPT.is_match(&raw);
        Self { raw, exempt }
    }

    /// `\def` and `\href` lines pass through untouched
    pub fn is_exempt(&self) -> bool {
        self.exempt
    }

    pub fn sanitized(&self) -> Vec<u8> {
        let line = trim_end(&self.raw);
        if self.exempt {
            return line.to_vec();
        }
        let line = SLASH_AFTER_WORD.replace_all(line, &b"${1}\\slash{}"[..]);
        let line = DOUBLE_HYPHEN_BRACE.replace_all(&line, NoExpand(&b"\\=/\\=/"[..]));
        let line = LONE_HYPHEN_BRACE.replace_all(&line, &b"${1}\\=/"[..]);
        line.into_owned()
    }
}

pub fn sanitize_line(line: &str) -> String {
    // rewrites only touch ASCII, so UTF-8 in means UTF-8 out
    String::from_utf8_lossy(&LatexLine::new(line).sanitized()).into_owned()
}

/// What a rewrite did, for logging and callers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanitizeSummary {
    pub lines: usize,
    pub exempt: usize,
    pub rewritten: usize,
    pub artifact_removed: bool,
}

fn sanitize_lines(text: &[u8], summary: &mut SanitizeSummary) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len() + text.len() / 16);
    for raw in text.split_inclusive(|&b| b == b'\n') {
        let line = LatexLine::new(raw);
        let sanitized = line.sanitized();
        summary.lines += 1;
        if line.is_exempt() {
            summary.exempt += 1;
        } else if sanitized != trim_end(raw) {
            summary.rewritten += 1;
        }
        out.extend_from_slice(&sanitized);
        out.push(b'\n');
    }
    out
}

/// Whole-document transform; every output line ends in `\n`
pub fn sanitize_bytes(text: &[u8]) -> Vec<u8> {
    sanitize_lines(text, &mut SanitizeSummary::default())
}

pub fn sanitize_text(text: &str) -> String {
    String::from_utf8_lossy(&sanitize_bytes(text.as_bytes())).into_owned()
}

/// Rendered artifact belonging to a LaTeX file (`manual.tex` -> `manual.pdf`)
pub fn artifact_path(latex_file: &Path, extension: &str) -> PathBuf {
    latex_file.with_extension(extension)
}

/// Rewrite `latex_file` in place.
///
/// The new content goes to a temporary file in the same directory which
/// then replaces the original. The original is untouched on every error
/// path and the temporary file never outlives this call.
pub fn sanitize_file(
    latex_file: &Path,
    config: &SanitizerConfig,
) -> Result<SanitizeSummary, LatexError> {
    let text = fs::read(latex_file)
        .map_err(|e| LatexError::Read(latex_file.to_path_buf(), e))?;
    let permissions = fs::metadata(latex_file)
        .map_err(|e| LatexError::Read(latex_file.to_path_buf(), e))?
        .permissions();

    let mut summary = SanitizeSummary::default();
    let artifact = artifact_path(latex_file, &config.artifact_extension);
    match fs::remove_file(&artifact) {
        Ok(()) => {
            debug!("removed {}", artifact.display());
            summary.artifact_removed = true;
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && !config.require_artifact => {
            debug!("no rendered artifact at {}", artifact.display());
        }
        Err(e) => return Err(LatexError::RemoveArtifact(artifact, e)),
    }

    let output = sanitize_lines(&text, &mut summary);

    let dir = match latex_file.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let write_err = |e| LatexError::Write(latex_file.to_path_buf(), e);
    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(&output).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    fs::set_permissions(tmp.path(), permissions).map_err(write_err)?;
    tmp.persist(latex_file)
        .map_err(|e| LatexError::Persist(latex_file.to_path_buf(), e.error))?;

    info!(
        "{}: {} lines, {} rewritten, {} exempt",
        latex_file.display(),
        summary.lines,
        summary.rewritten,
        summary.exempt
    );
    Ok(summary)
}

/// Status-returning entry point: 0 on success, 1 with a diagnostic otherwise
pub fn run(latex_file: &Path, config: &SanitizerConfig, diagnostics: &mut impl Write) -> i32 {
    match sanitize_file(latex_file, config) {
        Ok(_) => 0,
        Err(e) => {
            let _ = writeln!(diagnostics, "{}", e);
            1
        }
    }
}
