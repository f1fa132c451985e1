use std::io::{self, BufRead, Write};
use std::panic::AssertUnwindSafe;

use ime_dict_core::config::{RemoteConfig, StoreConfig};
use ime_dict_core::protocol::Session;
use ime_dict_core::services::sync::{FolderGateway, HttpGateway, StaticToken, SyncGateway};
use ime_dict_core::{DictionaryStore, Result};
use tracing_subscriber::EnvFilter;

fn main() {
    // stdout carries the protocol
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let mut session = match build_session() {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "failed to start");
            std::process::exit(1);
        }
    };

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => continue,
        };

        if line.trim().is_empty() {
            continue;
        }

        let result = std::panic::catch_unwind(AssertUnwindSafe(|| session.handle(&line)));

        let response = match result {
            Ok(resp) => resp,
            Err(_) => serde_json::json!({
                "status": "error",
                "message": "internal core error"
            })
            .to_string(),
        };

        if writeln!(stdout, "{response}").is_err() {
            break;
        }

        let _ = stdout.flush();
    }
}

fn build_session() -> Result<Session> {
    let config = StoreConfig::from_env();

    let gateway: Box<dyn SyncGateway> = match RemoteConfig::from_env() {
        Some(remote) => {
            tracing::info!(url = %remote.base_url, "backups go to remote store");
            Box::new(HttpGateway::new(&remote.base_url, Box::new(StaticToken(remote.token)))?)
        }
        None => Box::new(FolderGateway::new(&config.backup_root)?),
    };

    let store = DictionaryStore::open(config)?;
    tracing::info!(root = %store.config().dictionary_root.display(), "dictionary store ready");

    Ok(Session::new(store, gateway))
}
