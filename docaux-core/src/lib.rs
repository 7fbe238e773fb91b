//! docaux - auxiliary build tools for the DVI-to-SVG manual and test suite
//!
//! Two independent tools share this crate:
//! - `tweak-latex` rewrites the generated LaTeX manual so slashes and
//!   hyphen idioms allow line breaks ([`latex`])
//! - `genhashcheck` turns the generated hash2unicode table into a C++
//!   program that re-checks hashes, order and uniqueness ([`table`],
//!   [`codegen`]), or runs the same checks in process ([`validation`])

pub mod cli;
pub mod config;
pub mod hashing;
pub mod latex;
pub mod table;
pub mod codegen;
pub mod validation;

pub use config::{ToolConfig, SanitizerConfig, GeneratorConfig, ConfigError};
pub use latex::{LatexLine, LatexError, SanitizeSummary, sanitize_bytes, sanitize_file, sanitize_line, sanitize_text};
pub use table::{HashEntry, HashTable, TableMarker, TableError, extract_entries, extract_from_path};
pub use codegen::{CheckProgram, Provenance};
pub use validation::{Validator, ValidationResult, TableRule, TableViolation, ViolationKind};
pub use hashing::{name_hash, sha256_hex, xxh32};
