use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::{DictError, Result};

/// Maximum length, in characters, of a reading or surface form.
pub const MAX_FIELD_CHARS: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartOfSpeech {
    Noun,
    Verb,
    Adjective,
    Adverb,
    Adnominal,
    Conjunction,
    Interjection,
    Symbol,
    CustomNoun,
}

impl PartOfSpeech {
    pub const ALL: [PartOfSpeech; 9] = [
        PartOfSpeech::Noun,
        PartOfSpeech::Verb,
        PartOfSpeech::Adjective,
        PartOfSpeech::Adverb,
        PartOfSpeech::Adnominal,
        PartOfSpeech::Conjunction,
        PartOfSpeech::Interjection,
        PartOfSpeech::Symbol,
        PartOfSpeech::CustomNoun,
    ];

    /// Label written to dictionary files and exports.
    pub fn label(self) -> &'static str {
        match self {
            PartOfSpeech::Noun => "名詞",
            PartOfSpeech::Verb => "動詞",
            PartOfSpeech::Adjective => "形容詞",
            PartOfSpeech::Adverb => "副詞",
            PartOfSpeech::Adnominal => "連体詞",
            PartOfSpeech::Conjunction => "接続詞",
            PartOfSpeech::Interjection => "感動詞",
            PartOfSpeech::Symbol => "記号",
            PartOfSpeech::CustomNoun => "カスタム名詞",
        }
    }

    fn name(self) -> &'static str {
        match self {
            PartOfSpeech::Noun => "Noun",
            PartOfSpeech::Verb => "Verb",
            PartOfSpeech::Adjective => "Adjective",
            PartOfSpeech::Adverb => "Adverb",
            PartOfSpeech::Adnominal => "Adnominal",
            PartOfSpeech::Conjunction => "Conjunction",
            PartOfSpeech::Interjection => "Interjection",
            PartOfSpeech::Symbol => "Symbol",
            PartOfSpeech::CustomNoun => "CustomNoun",
        }
    }
}

impl FromStr for PartOfSpeech {
    type Err = DictError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        PartOfSpeech::ALL
            .into_iter()
            .find(|p| p.label() == s || p.name() == s)
            .ok_or_else(|| DictError::Validation(format!("unknown part of speech: {s:?}")))
    }
}

impl fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for PartOfSpeech {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// One dictionary line. Construction validates every field, so a value of
/// this type is always writable to any line-based target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct EntryRecord {
    reading: String,
    surface: String,
    pos: PartOfSpeech,
}

impl EntryRecord {
    pub fn new(reading: &str, surface: &str, pos: PartOfSpeech) -> Result<Self> {
        Ok(EntryRecord {
            reading: check_field("reading", reading)?,
            surface: check_field("surface", surface)?,
            pos,
        })
    }

    /// Builds a record from three raw text fields as they appear in a line.
    pub fn parse(reading: &str, surface: &str, pos: &str) -> Result<Self> {
        EntryRecord::new(reading, surface, pos.parse()?)
    }

    pub fn reading(&self) -> &str {
        &self.reading
    }

    pub fn surface(&self) -> &str {
        &self.surface
    }

    pub fn pos(&self) -> PartOfSpeech {
        self.pos
    }

    pub fn key(&self) -> EntryKey {
        (self.reading.clone(), self.surface.clone())
    }

    pub fn with_pos(&self, pos: PartOfSpeech) -> Self {
        EntryRecord { pos, ..self.clone() }
    }
}

fn check_field(name: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DictError::Validation(format!("{name} is empty")));
    }
    let len = value.chars().count();
    if len > MAX_FIELD_CHARS {
        return Err(DictError::Validation(format!(
            "{name} is {len} characters (max {MAX_FIELD_CHARS})"
        )));
    }
    if value.contains(['\t', '\n', '\r']) {
        return Err(DictError::Validation(format!(
            "{name} contains a tab or line break"
        )));
    }
    // a leading '!' marks a header line in the file format
    if name == "reading" && value.starts_with('!') {
        return Err(DictError::Validation(
            "reading cannot start with '!'".into(),
        ));
    }
    Ok(value.to_string())
}

/// Natural key of a record inside one dictionary: (reading, surface).
pub type EntryKey = (String, String);

/// Ordered records of one dictionary file, unique by [`EntryKey`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EntrySet {
    entries: Vec<EntryRecord>,
}

impl EntrySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EntryRecord> {
        self.entries.iter()
    }

    pub fn get(&self, index: usize) -> Option<&EntryRecord> {
        self.entries.get(index)
    }

    pub fn position(&self, reading: &str, surface: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.reading == reading && e.surface == surface)
    }

    /// Appends a record; a record with the same key is rejected.
    pub fn push(&mut self, record: EntryRecord) -> Result<()> {
        if self.position(&record.reading, &record.surface).is_some() {
            return Err(DictError::Validation(format!(
                "{} / {} is already in the dictionary",
                record.reading, record.surface
            )));
        }
        self.entries.push(record);
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<EntryRecord> {
        self.check_index(index)?;
        Ok(self.entries.remove(index))
    }

    /// Replaces the record at `index`, keeping its position.
    pub fn replace(&mut self, index: usize, record: EntryRecord) -> Result<EntryRecord> {
        self.check_index(index)?;
        if let Some(other) = self.position(&record.reading, &record.surface) {
            if other != index {
                return Err(DictError::Validation(format!(
                    "{} / {} is already in the dictionary",
                    record.reading, record.surface
                )));
            }
        }
        Ok(std::mem::replace(&mut self.entries[index], record))
    }

    pub fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.entries.len() {
            return Err(DictError::Index {
                index,
                len: self.entries.len(),
            });
        }
        Ok(())
    }

    pub(crate) fn from_unique(entries: Vec<EntryRecord>) -> Self {
        EntrySet { entries }
    }
}

impl<'a> IntoIterator for &'a EntrySet {
    type Item = &'a EntryRecord;
    type IntoIter = std::slice::Iter<'a, EntryRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl TryFrom<Vec<EntryRecord>> for EntrySet {
    type Error = DictError;

    fn try_from(records: Vec<EntryRecord>) -> Result<Self> {
        let mut set = EntrySet::new();
        for r in records {
            set.push(r)?;
        }
        Ok(set)
    }
}
