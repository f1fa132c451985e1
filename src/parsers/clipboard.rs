use std::sync::LazyLock;

use regex::Regex;

use crate::error::Result;
use crate::model::entry::EntrySet;

use super::line_format::{self, SourceKind};

// "foo.txt" or "foo.txt）" as shown by the sharing dialog
static FILE_NAME_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<name>[^\t/\\]+\.txt)）?$").expect("valid regex"));

#[derive(Debug)]
pub struct Payload {
    /// Dictionary named by a leading file-name line, if any.
    pub target: Option<String>,
    pub entries: EntrySet,
    pub skipped: usize,
}

/// Renders shareable text; with `name`, the file name leads the block so the
/// receiver can recreate the same dictionary.
pub fn render(name: Option<&str>, entries: &EntrySet) -> String {
    let mut out = String::new();
    if let Some(name) = name {
        out.push_str(name);
        out.push('\n');
    }
    out.push_str(&line_format::render_lines(entries));
    out
}

pub fn parse(text: &str) -> Result<Payload> {
    let text = text.trim();

    let (target, body) = match text.split_once('\n') {
        Some((first, rest)) => match file_name(first) {
            Some(name) => (Some(name), rest),
            None => (None, text),
        },
        None => (None, text),
    };

    let decoded = line_format::decode_str(body, SourceKind::Clipboard)?;

    Ok(Payload {
        target,
        entries: decoded.entries,
        skipped: decoded.skipped,
    })
}

fn file_name(line: &str) -> Option<String> {
    FILE_NAME_LINE
        .captures(line.trim())
        .and_then(|caps| caps.name("name"))
        .map(|m| m.as_str().trim().to_string())
}
