use std::str::FromStr;

use encoding_rs::{Encoding, SHIFT_JIS, UTF_8};
use serde::{Deserialize, Serialize};

use crate::error::{DictError, Result};
use crate::model::entry::{EntryRecord, EntrySet};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExportTarget {
    GoogleMozc,
    Msime,
    Atok,
    Skk,
}

impl ExportTarget {
    pub const ALL: [ExportTarget; 4] = [
        ExportTarget::GoogleMozc,
        ExportTarget::Msime,
        ExportTarget::Atok,
        ExportTarget::Skk,
    ];

    pub fn id(self) -> &'static str {
        match self {
            ExportTarget::GoogleMozc => "google_mozc",
            ExportTarget::Msime => "msime",
            ExportTarget::Atok => "atok",
            ExportTarget::Skk => "skk",
        }
    }

    /// Appended to the dictionary base name to form the export file name.
    pub fn suffix(self) -> &'static str {
        match self {
            ExportTarget::GoogleMozc => "_google_mozc.txt",
            ExportTarget::Msime => "_msime.txt",
            ExportTarget::Atok => "_atok.csv",
            ExportTarget::Skk => "_skk.dic",
        }
    }

    pub fn encoding(self) -> &'static Encoding {
        match self {
            ExportTarget::GoogleMozc | ExportTarget::Skk => UTF_8,
            ExportTarget::Msime | ExportTarget::Atok => SHIFT_JIS,
        }
    }

    pub fn file_name(self, base: &str) -> String {
        format!("{base}{}", self.suffix())
    }

    fn line(self, e: &EntryRecord) -> String {
        let (reading, surface, pos) = (e.reading(), e.surface(), e.pos().label());
        match self {
            ExportTarget::GoogleMozc => format!("{reading}\t{surface}\t{pos}\n"),
            ExportTarget::Msime => format!("{surface}\t{reading}\t{pos}\n"),
            ExportTarget::Atok => format!("{surface},{reading},{pos}\n"),
            ExportTarget::Skk => format!("{reading} /{surface}/\n"),
        }
    }

    /// First field character that would be read back as a column separator.
    fn separator_in(self, e: &EntryRecord) -> Option<char> {
        fn find(field: &str, reserved: &[char]) -> Option<char> {
            field.chars().find(|c| reserved.contains(c))
        }
        match self {
            // tab and line breaks never reach a record
            ExportTarget::GoogleMozc | ExportTarget::Msime => None,
            ExportTarget::Atok => find(e.surface(), &[',']).or_else(|| find(e.reading(), &[','])),
            // `;` opens an annotation inside the candidate list
            ExportTarget::Skk => find(e.reading(), &[' ', '\u{3000}'])
                .or_else(|| find(e.surface(), &['/', ';'])),
        }
    }
}

impl FromStr for ExportTarget {
    type Err = DictError;

    fn from_str(s: &str) -> Result<Self> {
        ExportTarget::ALL
            .into_iter()
            .find(|t| t.id() == s)
            .ok_or_else(|| DictError::Validation(format!("unknown export target: {s:?}")))
    }
}

#[derive(Debug)]
pub struct Exported {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub encoding: &'static Encoding,
}

/// Renders `entries` for `target`. Pure: nothing is written here.
pub fn encode(target: ExportTarget, base: &str, entries: &EntrySet) -> Result<Exported> {
    if entries.is_empty() {
        return Err(DictError::Precondition(
            "the dictionary has no entries to export".into(),
        ));
    }

    let encoding = target.encoding();
    let mut bytes = Vec::new();

    for (i, e) in entries.iter().enumerate() {
        if let Some(character) = target.separator_in(e) {
            return Err(DictError::UnencodableCharacter {
                target: target.id(),
                character,
                line: i + 1,
            });
        }
        let line = target.line(e);
        bytes.extend_from_slice(&encode_line(target, encoding, &line, i + 1)?);
    }

    Ok(Exported {
        bytes,
        file_name: target.file_name(base),
        encoding,
    })
}

fn encode_line(
    target: ExportTarget,
    encoding: &'static Encoding,
    line: &str,
    line_no: usize,
) -> Result<Vec<u8>> {
    if encoding == UTF_8 {
        return Ok(line.as_bytes().to_vec());
    }

    // encoding_rs substitutes numeric character references for unmappable
    // characters; report the first one instead
    let (bytes, _, had_errors) = encoding.encode(line);
    if !had_errors {
        return Ok(bytes.into_owned());
    }

    let character = line
        .chars()
        .find(|c| {
            let mut buf = [0u8; 4];
            encoding.encode(c.encode_utf8(&mut buf)).2
        })
        .unwrap_or(char::REPLACEMENT_CHARACTER);

    Err(DictError::UnencodableCharacter {
        target: target.id(),
        character,
        line: line_no,
    })
}
