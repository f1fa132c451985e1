use serde::{Deserialize, Serialize};

use super::entry::EntrySet;

/// Which consuming input method a dictionary file's on-disk form targets.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DictionaryFlavor {
    #[default]
    Standard,
    /// Written with the Microsoft IME dictionary tool header line.
    ImeTool,
}

impl DictionaryFlavor {
    pub fn has_header(self) -> bool {
        matches!(self, DictionaryFlavor::ImeTool)
    }
}

/// Per-dictionary metadata persisted next to the dictionary files.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct DictionaryMeta {
    #[serde(default)]
    pub flavor: DictionaryFlavor,
}

/// The dictionary currently resident in the store.
#[derive(Debug, Serialize, Clone)]
pub struct OpenDictionary {
    pub name: String,
    pub flavor: DictionaryFlavor,
    pub entries: EntrySet,
}

impl OpenDictionary {
    /// File name without extension, used as the base for export names.
    pub fn base_name(&self) -> &str {
        self.name
            .rsplit_once('.')
            .map(|(base, _)| base)
            .unwrap_or(&self.name)
    }
}
