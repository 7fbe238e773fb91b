//! Self-check program generation
//!
//! Renders a standalone C++ program that re-validates an extracted
//! hash2unicode table at its own runtime. The program links against
//! libxxhash and exits 1 on the first problem it finds.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::config::GeneratorConfig;
use crate::hashing::sha256_hex;
use crate::table::{HashEntry, HashTable};

/// Where a table came from, for the provenance comment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
    pub source: String,
    pub sha256: String,
}

impl Provenance {
    pub fn of_file(path: &Path) -> io::Result<Self> {
        let data = fs::read(path)?;
        Ok(Self {
            source: path.display().to_string(),
            sha256: sha256_hex(&data),
        })
    }
}

pub struct CheckProgram<'a> {
    entries: &'a [HashEntry],
    hash_header: &'a str,
    emit_provenance: bool,
    provenance: Option<Provenance>,
}

const PRELUDE: &str = "\
#include <iomanip>
#include <iostream>
#include <string>

using namespace std;

struct NameHash {
\tunsigned hash;
\tstring name;
} nameHashes[] = {
";

const MAIN: &str = r#"};

int main () {
	unsigned prev_hash=0;
	size_t size = sizeof(nameHashes)/sizeof(NameHash);
	if (size == 0) {
		cout << "hash table is empty\n";
		return 1;
	}
	for (unsigned i=0; i < size; i++) {
		const string &name = nameHashes[i].name;
		const unsigned hash = nameHashes[i].hash;
		if (XXH32(&name[0], name.length(), 0) != hash) {
			cout << "hash of '" << name << "' doesn't match\n";
			return 1;
		}
		if (hash < prev_hash) {
			cout << "misplaced hash value " << hex << setw(8) << setfill('0') << hash << "\n";
			return 1;
		}
		if (hash == prev_hash) {
			cout << "colliding hash values " << hex << setw(8) << setfill('0') << hash << "\n";
			return 1;
		}
		prev_hash = hash;
	}
	cout << "hash check passed\n";
	return 0;
}
"#;

impl<'a> CheckProgram<'a> {
    pub fn new(table: &'a HashTable, config: &'a GeneratorConfig) -> Self {
        Self {
            entries: &table.entries,
            hash_header: &config.hash_header,
            emit_provenance: config.provenance,
            provenance: None,
        }
    }

    /// Comment naming the source; ignored when the config disables provenance
    pub fn with_provenance(mut self, provenance: Option<Provenance>) -> Self {
        self.provenance = provenance;
        self
    }

    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        if let Some(p) = self.provenance.as_ref().filter(|_| self.emit_provenance) {
            writeln!(out, "// generated from {}", comment_safe(&p.source))?;
            writeln!(out, "// sha256 {}", p.sha256)?;
            writeln!(out)?;
        }
        writeln!(out, "#include <{}>", self.hash_header)?;
        out.write_all(PRELUDE.as_bytes())?;
        for entry in self.entries {
            writeln!(out, "\t{{{}, \"{}\"}},", entry.hash_literal(), c_escape(&entry.name))?;
        }
        out.write_all(MAIN.as_bytes())
    }

    pub fn to_source(&self) -> String {
        let mut buf = Vec::new();
        // writing into a Vec cannot fail
        let _ = self.render(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

/// Control characters would end or corrupt a `//` comment
fn comment_safe(s: &str) -> String {
    s.chars().map(|c| if c.is_control() { '?' } else { c }).collect()
}

/// Body of a C string literal
fn c_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            _ => out.push(c),
        }
    }
    out
}
