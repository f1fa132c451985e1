//! Core of a user dictionary manager for Japanese input methods: the entry
//! store, its line format, clipboard import/merge, exporters for Google/Mozc,
//! Microsoft IME, ATOK and SKK, and backup transports.

pub mod config;
pub mod error;
pub mod model;
pub mod parsers;
pub mod protocol;
pub mod services;

pub use config::StoreConfig;
pub use error::{DictError, Result};
pub use model::dictionary::{DictionaryFlavor, OpenDictionary};
pub use model::entry::{EntryRecord, EntrySet, PartOfSpeech};
pub use services::export::ExportTarget;
pub use services::store::DictionaryStore;
pub use services::sync::{FolderGateway, HttpGateway, SyncGateway};
