use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::StoreConfig;
use crate::error::{DictError, Result};
use crate::model::dictionary::{DictionaryFlavor, DictionaryMeta, OpenDictionary};
use crate::model::entry::{EntryRecord, EntrySet};
use crate::parsers::clipboard;
use crate::parsers::line_format::{self, SourceKind};
use crate::services::export::{self, ExportTarget};
use crate::services::merge::{self, ImportMode};
use crate::services::sync::SyncGateway;

pub const DICTIONARY_EXT: &str = ".txt";
const META_FILE: &str = "dictionaries.json";

#[derive(Debug, Serialize)]
pub struct ImportReport {
    pub mode: ImportMode,
    pub target: String,
    pub imported: usize,
    pub skipped: usize,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct BackupReport {
    pub name: String,
    pub remote_id: String,
}

#[derive(Debug, Serialize)]
pub struct RestoreReport {
    pub name: String,
    pub entries: usize,
}

/// Owns the dictionary directory and the one resident dictionary.
///
/// Every mutation is written to disk before it becomes visible in memory;
/// if the write fails the resident set is left as it was.
pub struct DictionaryStore {
    config: StoreConfig,
    meta: BTreeMap<String, DictionaryMeta>,
    current: Option<OpenDictionary>,
}

impl DictionaryStore {
    pub fn open(config: StoreConfig) -> Result<Self> {
        if config.export_root == config.dictionary_root {
            return Err(DictError::Validation(
                "export directory must differ from the dictionary directory".into(),
            ));
        }

        for dir in [&config.dictionary_root, &config.export_root] {
            fs::create_dir_all(dir).map_err(|e| DictError::io("create", dir, e))?;
        }

        let meta = read_meta(&config.dictionary_root.join(META_FILE))?;

        Ok(DictionaryStore {
            config,
            meta,
            current: None,
        })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn current(&self) -> Option<&OpenDictionary> {
        self.current.as_ref()
    }

    pub fn list_dictionaries(&self) -> Result<Vec<String>> {
        let root = &self.config.dictionary_root;
        let entries = fs::read_dir(root).map_err(|e| DictError::io("list", root, e))?;

        let mut names: Vec<String> = entries
            .flatten()
            .filter(|e| e.path().is_file())
            .filter_map(|e| e.file_name().to_str().map(str::to_string))
            .filter(|n| n.ends_with(DICTIONARY_EXT))
            .collect();
        names.sort();
        Ok(names)
    }

    /// Makes `name` the resident dictionary, replacing any previous one.
    pub fn load(&mut self, name: &str) -> Result<&OpenDictionary> {
        let name = normalize_name(name)?;
        let path = self.path_of(&name);
        if !path.is_file() {
            return Err(DictError::NotFound(name));
        }

        let bytes = fs::read(&path).map_err(|e| DictError::io("read", &path, e))?;
        let decoded = line_format::decode(&bytes, SourceKind::File)?;
        if decoded.skipped > 0 {
            tracing::warn!(dictionary = %name, skipped = decoded.skipped, "some lines were not loaded");
        }

        let flavor = match self.meta.get(&name) {
            Some(m) => m.flavor,
            None => decoded.flavor(),
        };

        tracing::info!(dictionary = %name, entries = decoded.entries.len(), ?flavor, "dictionary loaded");

        Ok(&*self.current.insert(OpenDictionary {
            name,
            flavor,
            entries: decoded.entries,
        }))
    }

    pub fn close(&mut self) {
        self.current = None;
    }

    pub fn add_entry(&mut self, reading: &str, surface: &str, pos: &str) -> Result<&OpenDictionary> {
        let record = EntryRecord::parse(reading, surface, pos)?;
        let mut entries = self.selected()?.entries.clone();
        entries.push(record)?;
        self.commit(entries)
    }

    /// Take-out edit: removes the record at `index` (persisted) and hands its
    /// fields back. The caller re-submits them through [`Self::add_entry`];
    /// if it never does, the record is gone.
    pub fn edit_entry(&mut self, index: usize) -> Result<EntryRecord> {
        self.delete_entry(index)
    }

    /// In-place edit; the record keeps its position.
    pub fn update_entry(
        &mut self,
        index: usize,
        reading: &str,
        surface: &str,
        pos: &str,
    ) -> Result<&OpenDictionary> {
        let mut entries = self.selected()?.entries.clone();
        entries.check_index(index)?;
        let record = EntryRecord::parse(reading, surface, pos)?;
        entries.replace(index, record)?;
        self.commit(entries)
    }

    pub fn delete_entry(&mut self, index: usize) -> Result<EntryRecord> {
        let mut entries = self.selected()?.entries.clone();
        let removed = entries.remove(index)?;
        self.commit(entries)?;
        Ok(removed)
    }

    /// Creates an empty dictionary file; returns its normalized name.
    pub fn create_dictionary(&mut self, name: &str, flavor: DictionaryFlavor) -> Result<String> {
        let name = normalize_name(name)?;
        let path = self.path_of(&name);
        if path.exists() {
            return Err(DictError::AlreadyExists(name));
        }

        write_atomic(&path, &line_format::encode(&EntrySet::new(), flavor))?;
        self.meta.insert(name.clone(), DictionaryMeta { flavor });
        self.save_meta()?;

        tracing::info!(dictionary = %name, ?flavor, "dictionary created");
        Ok(name)
    }

    pub fn delete_dictionary(&mut self, name: &str) -> Result<()> {
        let name = normalize_name(name)?;
        let path = self.path_of(&name);
        if !path.is_file() {
            return Err(DictError::NotFound(name));
        }

        fs::remove_file(&path).map_err(|e| DictError::io("delete", &path, e))?;

        if self.meta.remove(&name).is_some() {
            self.save_meta()?;
        }
        if self.current.as_ref().is_some_and(|d| d.name == name) {
            self.current = None;
        }

        tracing::info!(dictionary = %name, "dictionary deleted");
        Ok(())
    }

    /// Writes the resident dictionary in `target`'s format into the export
    /// directory and returns the written path.
    pub fn export_as(&self, target: ExportTarget) -> Result<PathBuf> {
        let dict = self.selected()?;
        let out = export::encode(target, dict.base_name(), &dict.entries)?;

        let path = self.config.export_root.join(&out.file_name);
        write_atomic(&path, &out.bytes)?;

        tracing::info!(
            dictionary = %dict.name,
            target = target.id(),
            encoding = out.encoding.name(),
            path = %path.display(),
            "dictionary exported"
        );
        Ok(path)
    }

    /// Text for sharing by clipboard or QR code.
    pub fn clipboard_text(&self, include_name: bool) -> Result<String> {
        let dict = self.selected()?;
        if dict.entries.is_empty() {
            return Err(DictError::Precondition(
                "the dictionary has no entries to share".into(),
            ));
        }
        let name = include_name.then_some(dict.name.as_str());
        Ok(clipboard::render(name, &dict.entries))
    }

    /// Imports pasted text. A leading file-name line switches to that
    /// dictionary (creating it if needed) and replaces its contents;
    /// otherwise the records are merged into the resident dictionary.
    pub fn import_clipboard(&mut self, text: &str) -> Result<ImportReport> {
        let payload = clipboard::parse(text)?;
        let imported = payload.entries.len();

        let (mode, target) = match payload.target {
            Some(name) => {
                let name = normalize_name(&name)?;
                if !self.path_of(&name).is_file() {
                    self.create_dictionary(&name, DictionaryFlavor::Standard)?;
                }
                self.load(&name)?;
                self.commit(payload.entries)?;
                (ImportMode::Replace, name)
            }
            None => {
                let merged = merge::merge(&self.selected()?.entries, &payload.entries);
                let dict = self.commit(merged)?;
                (ImportMode::Merge, dict.name.clone())
            }
        };

        let total = self.selected()?.entries.len();
        tracing::info!(dictionary = %target, ?mode, imported, skipped = payload.skipped, total, "clipboard imported");

        Ok(ImportReport {
            mode,
            target,
            imported,
            skipped: payload.skipped,
            total,
        })
    }

    /// Uploads the resident dictionary's file, byte for byte.
    pub fn backup(&self, gateway: &dyn SyncGateway) -> Result<BackupReport> {
        let dict = self.selected()?;
        let path = self.path_of(&dict.name);
        let bytes = fs::read(&path).map_err(|e| DictError::io("read", &path, e))?;

        let remote_id = gateway.upload(&bytes, &dict.name)?;
        tracing::info!(dictionary = %dict.name, %remote_id, bytes = bytes.len(), "backup uploaded");

        Ok(BackupReport {
            name: dict.name.clone(),
            remote_id,
        })
    }

    /// Downloads `name` into the dictionary directory. An existing local file
    /// is only replaced when `overwrite` is set.
    pub fn restore(
        &mut self,
        gateway: &dyn SyncGateway,
        name: &str,
        overwrite: bool,
    ) -> Result<RestoreReport> {
        let name = normalize_name(name)?;
        let path = self.path_of(&name);
        if path.exists() && !overwrite {
            return Err(DictError::AlreadyExists(name));
        }

        let bytes = gateway.download(&name)?;
        let decoded = line_format::decode(&bytes, SourceKind::File)?;
        if decoded.entries.is_empty() && decoded.skipped > 0 {
            return Err(DictError::Parse(format!(
                "{name} from backup holds no readable entries"
            )));
        }

        write_atomic(&path, &bytes)?;
        tracing::info!(dictionary = %name, entries = decoded.entries.len(), "backup restored");

        if self.current.as_ref().is_some_and(|d| d.name == name) {
            self.load(&name)?;
        }

        Ok(RestoreReport {
            name,
            entries: decoded.entries.len(),
        })
    }

    fn selected(&self) -> Result<&OpenDictionary> {
        self.current
            .as_ref()
            .ok_or_else(|| DictError::Precondition("no dictionary is selected".into()))
    }

    fn commit(&mut self, entries: EntrySet) -> Result<&OpenDictionary> {
        let dict = self
            .current
            .as_mut()
            .ok_or_else(|| DictError::Precondition("no dictionary is selected".into()))?;

        let path = self.config.dictionary_root.join(&dict.name);
        write_atomic(&path, &line_format::encode(&entries, dict.flavor))?;
        tracing::debug!(dictionary = %dict.name, entries = entries.len(), "dictionary saved");

        dict.entries = entries;
        Ok(&*dict)
    }

    fn path_of(&self, name: &str) -> PathBuf {
        self.config.dictionary_root.join(name)
    }

    fn save_meta(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.meta)
            .map_err(|e| DictError::Validation(format!("failed to serialize metadata: {e}")))?;
        write_atomic(&self.config.dictionary_root.join(META_FILE), json.as_bytes())
    }
}

fn read_meta(path: &Path) -> Result<BTreeMap<String, DictionaryMeta>> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }

    let data = fs::read_to_string(path).map_err(|e| DictError::io("read", path, e))?;
    match serde_json::from_str(&data) {
        Ok(meta) => Ok(meta),
        Err(e) => {
            // flavors fall back to content detection
            tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable dictionary metadata");
            Ok(BTreeMap::new())
        }
    }
}

/// Appends the dictionary extension when missing and checks the result is
/// a plain file name.
pub fn normalize_name(name: &str) -> Result<String> {
    let name = name.trim();
    let name = if name.ends_with(DICTIONARY_EXT) {
        name.to_string()
    } else {
        format!("{name}{DICTIONARY_EXT}")
    };
    check_file_name(&name)?;
    Ok(name)
}

pub(crate) fn check_file_name(name: &str) -> Result<()> {
    let bad = name.is_empty()
        || name.starts_with('.')
        || name.contains(['/', '\\', '\0'])
        || Path::new(name).components().count() != 1;
    if bad {
        return Err(DictError::Validation(format!("not a plain file name: {name:?}")));
    }
    Ok(())
}

pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = tmp_path(path);

    if let Some(parent) = tmp.parent() {
        fs::create_dir_all(parent).map_err(|e| DictError::io("create", parent, e))?;
    }

    fs::write(&tmp, bytes).map_err(|e| DictError::io("write", &tmp, e))?;

    // rename replaces an existing target in one step
    fs::rename(&tmp, path).map_err(|e| DictError::io("rename", path, e))?;

    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut p = path.to_path_buf();
    let file_name = match path.file_name().and_then(|s| s.to_str()) {
        Some(n) => n.to_string(),
        None => "dictionary".to_string(),
    };
    p.set_file_name(format!("{file_name}.tmp"));
    p
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::entry::PartOfSpeech;
    use crate::services::sync::FolderGateway;
    use tempfile::TempDir;

    fn store() -> (TempDir, DictionaryStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = DictionaryStore::open(StoreConfig::under(dir.path())).unwrap();
        (dir, store)
    }

    fn with_dict(name: &str) -> (TempDir, DictionaryStore) {
        let (dir, mut store) = store();
        store.create_dictionary(name, DictionaryFlavor::Standard).unwrap();
        store.load(name).unwrap();
        (dir, store)
    }

    fn on_disk(store: &DictionaryStore, name: &str) -> String {
        fs::read_to_string(store.config().dictionary_root.join(name)).unwrap()
    }

    #[test]
    fn create_appends_extension_and_lists() {
        let (_dir, mut store) = store();
        assert_eq!(store.create_dictionary("words", DictionaryFlavor::Standard).unwrap(), "words.txt");
        store.create_dictionary("a.txt", DictionaryFlavor::ImeTool).unwrap();
        assert_eq!(store.list_dictionaries().unwrap(), vec!["a.txt", "words.txt"]);
    }

    #[test]
    fn create_existing_fails() {
        let (_dir, mut store) = store();
        store.create_dictionary("words", DictionaryFlavor::Standard).unwrap();
        assert!(matches!(
            store.create_dictionary("words.txt", DictionaryFlavor::Standard),
            Err(DictError::AlreadyExists(_))
        ));
    }

    #[test]
    fn create_rejects_paths() {
        let (_dir, mut store) = store();
        assert!(matches!(
            store.create_dictionary("../x", DictionaryFlavor::Standard),
            Err(DictError::Validation(_))
        ));
        assert!(store.create_dictionary("   ", DictionaryFlavor::Standard).is_err());
    }

    #[test]
    fn delete_missing_leaves_listing_unchanged() {
        let (_dir, mut store) = store();
        store.create_dictionary("keep", DictionaryFlavor::Standard).unwrap();
        let before = store.list_dictionaries().unwrap();
        assert!(matches!(store.delete_dictionary("x.txt"), Err(DictError::NotFound(_))));
        assert_eq!(store.list_dictionaries().unwrap(), before);
    }

    #[test]
    fn delete_selected_clears_resident() {
        let (_dir, mut store) = with_dict("a.txt");
        store.delete_dictionary("a.txt").unwrap();
        assert!(store.current().is_none());
        assert!(store.list_dictionaries().unwrap().is_empty());
    }

    #[test]
    fn add_persists_immediately() {
        let (_dir, mut store) = with_dict("a.txt");
        store.add_entry("ねこ", "猫", "名詞").unwrap();
        store.add_entry("はしる", "走る", "Verb").unwrap();
        assert_eq!(on_disk(&store, "a.txt"), "ねこ\t猫\t名詞\nはしる\t走る\t動詞\n");
    }

    #[test]
    fn add_validation() {
        let (_dir, mut store) = with_dict("a.txt");
        assert!(matches!(store.add_entry("", "x", "Noun"), Err(DictError::Validation(_))));
        assert!(matches!(store.add_entry("x", "", "Noun"), Err(DictError::Validation(_))));
        let long = "a".repeat(61);
        assert!(matches!(store.add_entry(&long, "x", "Noun"), Err(DictError::Validation(_))));
        assert!(matches!(store.add_entry("x", "y", "Pronoun"), Err(DictError::Validation(_))));
        assert_eq!(on_disk(&store, "a.txt"), "");
    }

    #[test]
    fn add_rejects_bang_reading_without_touching_disk() {
        let (_dir, mut store) = with_dict("a.txt");
        store.add_entry("ねこ", "猫", "名詞").unwrap();
        assert!(matches!(store.add_entry("!", "感嘆符", "記号"), Err(DictError::Validation(_))));

        let dict = store.load("a.txt").unwrap();
        assert_eq!(dict.entries.len(), 1);
        assert_eq!(dict.flavor, DictionaryFlavor::Standard);
        assert_eq!(on_disk(&store, "a.txt"), "ねこ\t猫\t名詞\n");
    }

    #[test]
    fn write_atomic_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        write_atomic(&path, b"old").unwrap();
        write_atomic(&path, b"new").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"new");
        assert!(!dir.path().join("a.txt.tmp").exists());
    }

    #[test]
    fn add_without_selection() {
        let (_dir, mut store) = store();
        assert!(matches!(store.add_entry("x", "y", "Noun"), Err(DictError::Precondition(_))));
    }

    #[test]
    fn take_out_edit_then_resubmit() {
        let (_dir, mut store) = with_dict("a.txt");
        store.add_entry("ねこ", "猫", "名詞").unwrap();
        store.add_entry("いぬ", "犬", "名詞").unwrap();

        let taken = store.edit_entry(0).unwrap();
        assert_eq!(taken.reading(), "ねこ");
        assert_eq!(on_disk(&store, "a.txt"), "いぬ\t犬\t名詞\n");

        store.add_entry(taken.reading(), "ネコ", "名詞").unwrap();
        assert_eq!(on_disk(&store, "a.txt"), "いぬ\t犬\t名詞\nねこ\tネコ\t名詞\n");
    }

    #[test]
    fn update_in_place() {
        let (_dir, mut store) = with_dict("a.txt");
        store.add_entry("ねこ", "猫", "名詞").unwrap();
        store.add_entry("いぬ", "犬", "名詞").unwrap();

        store.update_entry(0, "ねこ", "猫", "動詞").unwrap();
        assert_eq!(on_disk(&store, "a.txt"), "ねこ\t猫\t動詞\nいぬ\t犬\t名詞\n");

        // invalid values leave the record in place
        assert!(store.update_entry(0, "", "猫", "名詞").is_err());
        assert_eq!(store.current().unwrap().entries.len(), 2);
    }

    #[test]
    fn index_errors() {
        let (_dir, mut store) = with_dict("a.txt");
        store.add_entry("ねこ", "猫", "名詞").unwrap();
        assert!(matches!(store.delete_entry(1), Err(DictError::Index { index: 1, len: 1 })));
        assert!(matches!(store.edit_entry(5), Err(DictError::Index { .. })));
        assert!(matches!(store.update_entry(1, "a", "b", "名詞"), Err(DictError::Index { .. })));
        assert_eq!(store.current().unwrap().entries.len(), 1);
    }

    #[test]
    fn flavor_comes_from_metadata_not_name() {
        let (_dir, mut store) = store();
        store.create_dictionary("ime_words", DictionaryFlavor::Standard).unwrap();
        store.create_dictionary("plain", DictionaryFlavor::ImeTool).unwrap();

        store.load("ime_words").unwrap();
        store.add_entry("ねこ", "猫", "名詞").unwrap();
        assert_eq!(on_disk(&store, "ime_words.txt"), "ねこ\t猫\t名詞\n");

        store.load("plain").unwrap();
        store.add_entry("ねこ", "猫", "名詞").unwrap();
        assert_eq!(
            on_disk(&store, "plain.txt"),
            "!Microsoft IME Dictionary Tool\nねこ\t猫\t名詞\n"
        );
    }

    #[test]
    fn flavor_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut store = DictionaryStore::open(StoreConfig::under(dir.path())).unwrap();
            store.create_dictionary("plain", DictionaryFlavor::ImeTool).unwrap();
        }
        let mut store = DictionaryStore::open(StoreConfig::under(dir.path())).unwrap();
        assert_eq!(store.load("plain").unwrap().flavor, DictionaryFlavor::ImeTool);
    }

    #[test]
    fn unknown_file_flavor_from_header() {
        let (_dir, mut store) = store();
        let root = store.config().dictionary_root.clone();
        fs::write(root.join("dropped.txt"), "!Microsoft IME Dictionary Tool\nあい\t愛\t名詞\n").unwrap();
        let dict = store.load("dropped.txt").unwrap();
        assert_eq!(dict.flavor, DictionaryFlavor::ImeTool);
        assert_eq!(dict.entries.len(), 1);
    }

    #[test]
    fn export_skk_scenario() {
        let (_dir, mut store) = with_dict("mine.txt");
        store.add_entry("あい", "愛", "名詞").unwrap();
        store.add_entry("かな", "仮名", "名詞").unwrap();

        let path = store.export_as(ExportTarget::Skk).unwrap();
        assert_eq!(path, store.config().export_root.join("mine_skk.dic"));
        assert_eq!(fs::read_to_string(path).unwrap(), "あい /愛/\nかな /仮名/\n");
    }

    #[test]
    fn unencodable_export_writes_nothing() {
        let (_dir, mut store) = with_dict("mine.txt");
        store.add_entry("すし", "🍣", "名詞").unwrap();

        assert!(matches!(
            store.export_as(ExportTarget::Msime),
            Err(DictError::UnencodableCharacter { .. })
        ));
        let written = fs::read_dir(&store.config().export_root).unwrap().count();
        assert_eq!(written, 0);
    }

    #[test]
    fn export_preconditions() {
        let (_dir, mut store) = store();
        assert!(matches!(store.export_as(ExportTarget::Skk), Err(DictError::Precondition(_))));
        store.create_dictionary("empty", DictionaryFlavor::Standard).unwrap();
        store.load("empty").unwrap();
        assert!(matches!(store.export_as(ExportTarget::Atok), Err(DictError::Precondition(_))));
    }

    #[test]
    fn clipboard_replace_scenario() {
        let (_dir, mut store) = with_dict("current.txt");
        store.add_entry("ねこ", "猫", "動詞").unwrap();

        let report = store.import_clipboard("foo.txt\nねこ\t猫\t名詞\n").unwrap();
        assert_eq!(report.mode, ImportMode::Replace);
        assert_eq!(report.target, "foo.txt");

        let dict = store.current().unwrap();
        assert_eq!(dict.name, "foo.txt");
        let got: Vec<_> = dict.entries.iter().map(|e| (e.reading(), e.surface(), e.pos())).collect();
        assert_eq!(got, vec![("ねこ", "猫", PartOfSpeech::Noun)]);
        assert_eq!(on_disk(&store, "foo.txt"), "ねこ\t猫\t名詞\n");
        // the previously selected dictionary is untouched
        assert_eq!(on_disk(&store, "current.txt"), "ねこ\t猫\t動詞\n");
    }

    #[test]
    fn clipboard_merge_into_current() {
        let (_dir, mut store) = with_dict("a.txt");
        store.add_entry("ねこ", "猫", "動詞").unwrap();
        store.add_entry("いぬ", "犬", "名詞").unwrap();

        let report = store.import_clipboard("とり\t鳥\t名詞\nねこ\t猫\t名詞\nbad line\n").unwrap();
        assert_eq!(report.mode, ImportMode::Merge);
        assert_eq!(report.imported, 2);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.total, 3);
        assert_eq!(
            on_disk(&store, "a.txt"),
            "ねこ\t猫\t名詞\nいぬ\t犬\t名詞\nとり\t鳥\t名詞\n"
        );
    }

    #[test]
    fn clipboard_merge_needs_selection_and_data() {
        let (_dir, mut store) = store();
        assert!(matches!(
            store.import_clipboard("ねこ\t猫\t名詞"),
            Err(DictError::Precondition(_))
        ));
        assert!(matches!(store.import_clipboard("hello"), Err(DictError::Parse(_))));
    }

    #[test]
    fn clipboard_text_round_trips() {
        let (_dir, mut store) = with_dict("share.txt");
        store.add_entry("かな", "仮名", "名詞").unwrap();
        assert_eq!(store.clipboard_text(false).unwrap(), "かな\t仮名\t名詞\n");
        assert_eq!(store.clipboard_text(true).unwrap(), "share.txt\nかな\t仮名\t名詞\n");
    }

    #[test]
    fn backup_and_restore() {
        let (dir, mut store) = with_dict("a.txt");
        store.add_entry("ねこ", "猫", "名詞").unwrap();
        let gateway = FolderGateway::new(dir.path().join("backup")).unwrap();

        let report = store.backup(&gateway).unwrap();
        assert_eq!(report.name, "a.txt");

        store.add_entry("いぬ", "犬", "名詞").unwrap();

        assert!(matches!(
            store.restore(&gateway, "a.txt", false),
            Err(DictError::AlreadyExists(_))
        ));
        assert_eq!(store.current().unwrap().entries.len(), 2);

        let restored = store.restore(&gateway, "a.txt", true).unwrap();
        assert_eq!(restored.entries, 1);
        assert_eq!(store.current().unwrap().entries.len(), 1);
        assert_eq!(on_disk(&store, "a.txt"), "ねこ\t猫\t名詞\n");
    }

    #[test]
    fn restore_missing_remote() {
        let (dir, mut store) = store();
        let gateway = FolderGateway::new(dir.path().join("backup")).unwrap();
        assert!(matches!(
            store.restore(&gateway, "gone.txt", false),
            Err(DictError::NotFound(_))
        ));
    }

    #[test]
    fn export_root_must_differ() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = StoreConfig::under(dir.path());
        cfg.export_root = cfg.dictionary_root.clone();
        assert!(matches!(DictionaryStore::open(cfg), Err(DictError::Validation(_))));
    }
}
