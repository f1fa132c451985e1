use std::env;
use std::path::{Path, PathBuf};

/// Directory layout handed to the store and the folder gateway.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Dictionary files (`*.txt`) and their metadata.
    pub dictionary_root: PathBuf,
    /// Files produced by exports. Never the dictionary root.
    pub export_root: PathBuf,
    /// Folder used by the local backup gateway.
    pub backup_root: PathBuf,
}

impl StoreConfig {
    /// Default layout under one base directory.
    pub fn under(base: impl AsRef<Path>) -> Self {
        let base = base.as_ref();
        StoreConfig {
            dictionary_root: base.join("dictionary"),
            export_root: base.join("saved_dictionaries"),
            backup_root: base.join("backup"),
        }
    }

    pub fn from_env() -> Self {
        let home = env::var("IME_DICT_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));
        let defaults = StoreConfig::under(&home);

        StoreConfig {
            dictionary_root: env_path("IME_DICT_DICTIONARY_DIR").unwrap_or(defaults.dictionary_root),
            export_root: env_path("IME_DICT_EXPORT_DIR").unwrap_or(defaults.export_root),
            backup_root: env_path("IME_DICT_BACKUP_DIR").unwrap_or(defaults.backup_root),
        }
    }
}

/// Remote backup endpoint; only used when both variables are set.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    pub base_url: String,
    pub token: String,
}

impl RemoteConfig {
    pub fn from_env() -> Option<Self> {
        let base_url = env::var("IME_DICT_REMOTE_URL").ok().filter(|v| !v.is_empty())?;
        let token = env::var("IME_DICT_REMOTE_TOKEN").ok().filter(|v| !v.is_empty())?;
        Some(RemoteConfig { base_url, token })
    }
}

fn env_path(key: &str) -> Option<PathBuf> {
    env::var(key).ok().filter(|v| !v.is_empty()).map(PathBuf::from)
}
