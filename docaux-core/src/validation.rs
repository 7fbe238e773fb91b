//! Table Validation - the self-check program's rules, in process
//!
//! Rules produce structured violations. The validator orders them the
//! way the generated program encounters them, so the first violation is
//! exactly what the program would print before exiting 1.

use serde::{Deserialize, Serialize};

use crate::hashing::name_hash;
use crate::table::HashEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    EmptyTable,
    HashMismatch,
    MisplacedHash,
    CollidingHash,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableViolation {
    pub kind: ViolationKind,
    /// Entry index; `None` for table-wide violations
    pub index: Option<usize>,
    pub name: Option<String>,
    pub hash: Option<u32>,
    pub message: String,
}

impl TableViolation {
    fn empty() -> Self {
        Self {
            kind: ViolationKind::EmptyTable,
            index: None,
            name: None,
            hash: None,
            message: "hash table is empty".to_string(),
        }
    }

    fn at(kind: ViolationKind, index: usize, entry: &HashEntry, message: String) -> Self {
        Self {
            kind,
            index: Some(index),
            name: Some(entry.name.clone()),
            hash: Some(entry.hash),
            message,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub entries: usize,
    pub violations: Vec<TableViolation>,
}

impl ValidationResult {
    /// The diagnostic the generated program would print
    pub fn first(&self) -> Option<&TableViolation> {
        self.violations.first()
    }

    /// Exit status of the generated program
    pub fn exit_code(&self) -> i32 {
        if self.valid { 0 } else { 1 }
    }

    /// Stdout line of the generated program
    pub fn message(&self) -> &str {
        self.first().map_or("hash check passed", |v| v.message.as_str())
    }
}

/// Validation rule trait - produces violations
pub trait TableRule {
    fn name(&self) -> &'static str;
    fn check(&self, entries: &[HashEntry]) -> Vec<TableViolation>;
}

// --- Concrete Rules ---

pub struct EmptyTableRule;

impl TableRule for EmptyTableRule {
    fn name(&self) -> &'static str { "empty_table" }

    fn check(&self, entries: &[HashEntry]) -> Vec<TableViolation> {
        if entries.is_empty() {
            vec![TableViolation::empty()]
        } else {
            vec![]
        }
    }
}

/// Stored hash must be the XXH32 of the name
pub struct NameHashRule;

impl TableRule for NameHashRule {
    fn name(&self) -> &'static str { "name_hash" }

    fn check(&self, entries: &[HashEntry]) -> Vec<TableViolation> {
        entries.iter().enumerate()
            .filter(|(_, e)| name_hash(&e.name) != e.hash)
            .map(|(i, e)| TableViolation::at(
                ViolationKind::HashMismatch,
                i,
                e,
                format!("hash of '{}' doesn't match", e.name),
            ))
            .collect()
    }
}

/// Hashes strictly ascending; the predecessor of the first entry is 0
pub struct OrderingRule;

impl TableRule for OrderingRule {
    fn name(&self) -> &'static str { "ordering" }

    fn check(&self, entries: &[HashEntry]) -> Vec<TableViolation> {
        let mut violations = vec![];
        let mut prev_hash = 0u32;
        for (i, e) in entries.iter().enumerate() {
            if e.hash < prev_hash {
                violations.push(TableViolation::at(
                    ViolationKind::MisplacedHash,
                    i,
                    e,
                    format!("misplaced hash value {:08x}", e.hash),
                ));
            } else if e.hash == prev_hash {
                violations.push(TableViolation::at(
                    ViolationKind::CollidingHash,
                    i,
                    e,
                    format!("colliding hash values {:08x}", e.hash),
                ));
            }
            prev_hash = e.hash;
        }
        violations
    }
}

/// Validator orchestrates rules
pub struct Validator {
    rules: Vec<Box<dyn TableRule>>,
}

impl Validator {
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(EmptyTableRule),
                Box::new(NameHashRule),
                Box::new(OrderingRule),
            ],
        }
    }

    pub fn validate(&self, entries: &[HashEntry]) -> ValidationResult {
        let mut violations = vec![];
        for rule in &self.rules {
            let found = rule.check(entries);
            if !found.is_empty() {
                log::debug!("rule {} reported {} violations", rule.name(), found.len());
            }
            violations.extend(found);
        }

        // program order: per entry, mismatch before misplaced before colliding
        violations.sort_by_key(|v| (v.index, v.kind));

        ValidationResult {
            valid: violations.is_empty(),
            entries: entries.len(),
            violations,
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALPHA: u32 = 0x540493c8;
    const BETA: u32 = 0x9c5df589;
    const GAMMA: u32 = 0xd9eba56d;

    fn entries(list: &[(u32, &str)]) -> Vec<HashEntry> {
        list.iter().map(|&(h, n)| HashEntry::new(h, n)).collect()
    }

    #[test]
    fn test_valid_table() {
        let result = Validator::new().validate(&entries(&[(ALPHA, "alpha"), (BETA, "beta"), (GAMMA, "gamma")]));
        assert!(result.valid);
        assert_eq!(result.exit_code(), 0);
        assert_eq!(result.message(), "hash check passed");
    }

    #[test]
    fn test_empty_table() {
        let result = Validator::new().validate(&[]);
        assert!(!result.valid);
        assert_eq!(result.first().unwrap().kind, ViolationKind::EmptyTable);
        assert_eq!(result.message(), "hash table is empty");
    }

    #[test]
    fn test_hash_mismatch() {
        let result = Validator::new().validate(&entries(&[(ALPHA, "alpha"), (BETA + 1, "beta")]));
        let first = result.first().unwrap();
        assert_eq!(first.kind, ViolationKind::HashMismatch);
        assert_eq!(first.index, Some(1));
        assert_eq!(first.message, "hash of 'beta' doesn't match");
    }

    #[test]
    fn test_misplaced_hash() {
        let result = Validator::new().validate(&entries(&[(BETA, "beta"), (ALPHA, "alpha")]));
        assert_eq!(result.exit_code(), 1);
        assert_eq!(result.violations.len(), 1);
        assert_eq!(result.first().unwrap().kind, ViolationKind::MisplacedHash);
        assert_eq!(result.message(), "misplaced hash value 540493c8");
    }

    #[test]
    fn test_colliding_hash() {
        let result = Validator::new().validate(&entries(&[(ALPHA, "alpha"), (ALPHA, "alpha")]));
        assert_eq!(result.first().unwrap().kind, ViolationKind::CollidingHash);
        assert_eq!(result.message(), "colliding hash values 540493c8");
    }

    #[test]
    fn test_mismatch_reported_before_ordering() {
        // second entry is both misplaced and wrongly hashed
        let result = Validator::new().validate(&entries(&[(BETA, "beta"), (0x00000010, "alpha")]));
        assert_eq!(result.violations.len(), 2);
        assert_eq!(result.violations[0].kind, ViolationKind::HashMismatch);
        assert_eq!(result.violations[1].kind, ViolationKind::MisplacedHash);
        assert_eq!(result.message(), "hash of 'alpha' doesn't match");
    }

    #[test]
    fn test_zero_hash_collides_with_start() {
        let violations = OrderingRule.check(&entries(&[(0, "x")]));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].message, "colliding hash values 00000000");
    }

    #[test]
    fn test_result_serializes() {
        let result = Validator::new().validate(&entries(&[(BETA, "beta"), (ALPHA, "alpha")]));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["valid"], false);
        assert_eq!(json["violations"][0]["kind"], "misplaced_hash");
        assert_eq!(json["violations"][0]["hash"], ALPHA);
    }
}
