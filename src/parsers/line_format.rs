use std::collections::HashMap;

use crate::error::{DictError, Result};
use crate::model::dictionary::DictionaryFlavor;
use crate::model::entry::{EntryKey, EntryRecord, EntrySet};
use crate::services::encoding;

/// First line of dictionaries written for the Microsoft IME dictionary tool.
pub const IME_HEADER: &str = "!Microsoft IME Dictionary Tool";

/// Where the bytes being decoded came from. Clipboard payloads must yield
/// at least one record; dictionary files may be empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    File,
    Clipboard,
}

#[derive(Debug, Default)]
pub struct Decoded {
    pub entries: EntrySet,
    /// Non-blank data lines that did not produce a new record.
    pub skipped: usize,
    /// Whether a `!` marker line was present.
    pub had_header: bool,
}

impl Decoded {
    /// Flavor implied by the content alone.
    pub fn flavor(&self) -> DictionaryFlavor {
        if self.had_header {
            DictionaryFlavor::ImeTool
        } else {
            DictionaryFlavor::Standard
        }
    }
}

pub fn decode(bytes: &[u8], kind: SourceKind) -> Result<Decoded> {
    decode_str(&encoding::decode_text(bytes), kind)
}

/// Lenient line parser: `!` lines are markers, data lines need exactly three
/// tab-separated fields that pass record validation, anything else is
/// dropped. A repeated key keeps its first position and takes the later
/// part of speech.
pub fn decode_str(text: &str, kind: SourceKind) -> Result<Decoded> {
    let mut records: Vec<EntryRecord> = Vec::new();
    let mut index: HashMap<EntryKey, usize> = HashMap::new();
    let mut skipped = 0usize;
    let mut had_header = false;

    for (i, line) in text.lines().enumerate() {
        let ln = i + 1;
        let line = line.trim();

        if line.is_empty() {
            continue;
        }

        if line.starts_with('!') {
            had_header = true;
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        let [reading, surface, pos] = fields.as_slice() else {
            tracing::warn!(line = ln, fields = fields.len(), "dropping line with wrong field count");
            skipped += 1;
            continue;
        };

        let record = match EntryRecord::parse(reading, surface, pos) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(line = ln, error = %e, "dropping invalid line");
                skipped += 1;
                continue;
            }
        };

        match index.get(&record.key()) {
            Some(&at) => {
                tracing::warn!(line = ln, "duplicate entry, later part of speech wins");
                records[at] = record;
                skipped += 1;
            }
            None => {
                index.insert(record.key(), records.len());
                records.push(record);
            }
        }
    }

    if kind == SourceKind::Clipboard && records.is_empty() {
        return Err(DictError::Parse(format!(
            "none of the pasted lines is a reading<TAB>surface<TAB>part-of-speech entry ({skipped} rejected)"
        )));
    }

    Ok(Decoded {
        entries: EntrySet::from_unique(records),
        skipped,
        had_header,
    })
}

/// Serializes a dictionary file, UTF-8, one record per line.
pub fn encode(entries: &EntrySet, flavor: DictionaryFlavor) -> Vec<u8> {
    let mut out = String::new();
    if flavor.has_header() {
        out.push_str(IME_HEADER);
        out.push('\n');
    }
    out.push_str(&render_lines(entries));
    out.into_bytes()
}

/// `reading<TAB>surface<TAB>pos` lines without any header.
pub fn render_lines(entries: &EntrySet) -> String {
    let mut out = String::new();
    for e in entries {
        out.push_str(e.reading());
        out.push('\t');
        out.push_str(e.surface());
        out.push('\t');
        out.push_str(e.pos().label());
        out.push('\n');
    }
    out
}
