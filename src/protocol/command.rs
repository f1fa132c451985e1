#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Ping,
    DictionaryList,
    DictionaryCreate,
    DictionaryDelete,
    DictionaryOpen,
    EntryAdd,
    EntryEdit,
    EntryUpdate,
    EntryDelete,
    Export,
    ClipboardExport,
    ClipboardImport,
    Backup,
    BackupList,
    Restore,
    DetectEncoding,
    Unknown,
}

impl From<&str> for Command {
    fn from(s: &str) -> Self {
        match s {
            "ping" => Command::Ping,
            "dictionary.list" => Command::DictionaryList,
            "dictionary.create" => Command::DictionaryCreate,
            "dictionary.delete" => Command::DictionaryDelete,
            "dictionary.open" => Command::DictionaryOpen,
            "entry.add" => Command::EntryAdd,
            "entry.edit" => Command::EntryEdit,
            "entry.update" => Command::EntryUpdate,
            "entry.delete" => Command::EntryDelete,
            "export" => Command::Export,
            "clipboard.export" => Command::ClipboardExport,
            "clipboard.import" => Command::ClipboardImport,
            "backup" => Command::Backup,
            "backup.list" => Command::BackupList,
            "restore" => Command::Restore,
            "encoding.detect" | "detect_encoding" => Command::DetectEncoding,
            _ => Command::Unknown,
        }
    }
}
