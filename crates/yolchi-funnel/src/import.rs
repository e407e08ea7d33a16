// SPDX-FileCopyrightText: 2026 Yolchi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delimited contact list parsing.
//!
//! Malformed lines are skipped, never fatal. Duplicate normalized numbers
//! collapse to one entry that keeps the position of the first occurrence and
//! the message of the last.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::phone;

/// Header tokens; a first line containing any of them is skipped.
const HEADER_TOKENS: &[&str] = &["phone", "telefon", "raqam"];

static COLUMN_DELIMITER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,;\t]").expect("column delimiter pattern is valid"));

/// How each line is split into phone and message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum ImportMode {
    /// Phone taken from `column`; any other columns are ignored.
    PhoneOnly { column: usize },
    /// Phone is the first comma field, the rest of the line is the message.
    WithMessage,
}

impl Default for ImportMode {
    fn default() -> Self {
        ImportMode::PhoneOnly { column: 0 }
    }
}

/// One parsed contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactEntry {
    /// Normalized phone number.
    pub phone: String,
    pub message: String,
}

/// Result of parsing one upload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportOutcome {
    pub entries: Vec<ContactEntry>,
    /// Data lines without a usable phone.
    pub skipped: usize,
    /// Lines collapsed into an earlier entry.
    pub duplicates: usize,
}

impl ImportOutcome {
    pub fn phones(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.phone.clone()).collect()
    }
}

fn is_header(line: &str) -> bool {
    let lower = line.to_lowercase();
    HEADER_TOKENS.iter().any(|token| lower.contains(token))
}

/// Split a line into raw phone and message text.
fn split_line(line: &str, mode: ImportMode) -> (String, String) {
    match mode {
        ImportMode::PhoneOnly { column } => {
            let phone = COLUMN_DELIMITER
                .split(line)
                .nth(column)
                .map(str::trim)
                .unwrap_or_default();
            (phone.to_string(), String::new())
        }
        ImportMode::WithMessage if line.contains('"') => match line.split_once(',') {
            Some((phone, rest)) => {
                let phone = phone.replace('"', "");
                let rest = rest.strip_prefix('"').unwrap_or(rest);
                let rest = rest.strip_suffix('"').unwrap_or(rest);
                (phone.trim().to_string(), rest.trim().to_string())
            }
            None => (String::new(), String::new()),
        },
        ImportMode::WithMessage => match line.split_once(',') {
            Some((phone, rest)) => (phone.trim().to_string(), rest.trim().to_string()),
            None => (line.trim().to_string(), String::new()),
        },
    }
}

/// Parse an uploaded block of text into deduplicated contacts.
pub fn import_contacts(text: &str, mode: ImportMode) -> ImportOutcome {
    let lines: Vec<&str> = text
        .split('\n')
        .map(|l| l.trim_end_matches('\r'))
        .filter(|l| !l.trim().is_empty())
        .collect();
    let skip = usize::from(lines.first().is_some_and(|first| is_header(first)));

    let mut outcome = ImportOutcome::default();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for line in &lines[skip..] {
        let (raw, message) = split_line(line, mode);
        let normalized = phone::normalize(&raw);
        if raw.is_empty() || !phone::is_importable(&normalized) {
            outcome.skipped += 1;
            continue;
        }

        match positions.get(&normalized) {
            Some(&idx) => {
                outcome.entries[idx].message = message;
                outcome.duplicates += 1;
            }
            None => {
                positions.insert(normalized.clone(), outcome.entries.len());
                outcome.entries.push(ContactEntry {
                    phone: normalized,
                    message,
                });
            }
        }
    }

    debug!(
        entries = outcome.entries.len(),
        skipped = outcome.skipped,
        duplicates = outcome.duplicates,
        header = skip == 1,
        "contact list parsed"
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_message_wins_on_duplicates() {
        let outcome = import_contacts("901234567,hi\n998901234567,bye", ImportMode::WithMessage);
        assert_eq!(outcome.entries.len(), 1);
        assert_eq!(outcome.entries[0].phone, "998901234567");
        assert_eq!(outcome.entries[0].message, "bye");
        assert_eq!(outcome.duplicates, 1);
    }

    #[test]
    fn dedup_uses_full_normalized_string() {
        let text = "901111111\n998902222222\n901111111";
        let outcome = import_contacts(text, ImportMode::default());
        assert_eq!(outcome.phones(), vec!["998901111111", "998902222222"]);
    }

    #[test]
    fn header_line_is_skipped() {
        let outcome = import_contacts("Telefon raqam;Ism\n901234567;Aziz", ImportMode::default());
        assert_eq!(outcome.phones(), vec!["998901234567"]);

        let no_header = import_contacts("901234567\n907654321", ImportMode::default());
        assert_eq!(no_header.entries.len(), 2);
    }

    #[test]
    fn phone_column_is_selectable() {
        let text = "Aziz\t901234567\nBek;+998 90 765 43 21";
        let outcome = import_contacts(text, ImportMode::PhoneOnly { column: 1 });
        assert_eq!(outcome.phones(), vec!["998901234567", "998907654321"]);
    }

    #[test]
    fn short_and_empty_phones_are_dropped() {
        let text = "12345\n,message only\n901234567";
        let outcome = import_contacts(text, ImportMode::WithMessage);
        assert_eq!(outcome.entries.len(), 1);
        assert_eq!(outcome.skipped, 2);
    }

    #[test]
    fn quoted_lines_strip_quotes() {
        let text = "\"+998 90 123 45 67\",\"Salom, ertaga keling\"\r\n";
        let outcome = import_contacts(text, ImportMode::WithMessage);
        assert_eq!(outcome.entries[0].phone, "998901234567");
        assert_eq!(outcome.entries[0].message, "Salom, ertaga keling");
    }

    #[test]
    fn unquoted_message_keeps_later_commas() {
        let outcome = import_contacts("901234567,a,b,c", ImportMode::WithMessage);
        assert_eq!(outcome.entries[0].message, "a,b,c");
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert_eq!(import_contacts("", ImportMode::default()), ImportOutcome::default());
        assert_eq!(import_contacts("\n  \n", ImportMode::WithMessage).entries.len(), 0);
    }
}
