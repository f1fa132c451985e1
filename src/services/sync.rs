use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::{StatusCode, Url};
use sha2::{Digest, Sha256};

use crate::error::{DictError, Result};
use crate::services::store::{check_file_name, write_atomic};

const TIMEOUT_SECS: u64 = 60;

/// Backup transport: whole-file blobs keyed by file name. One attempt per
/// call; retry policy belongs to the caller.
pub trait SyncGateway {
    /// Stores `bytes` under `name` and returns the remote id.
    fn upload(&self, bytes: &[u8], name: &str) -> Result<String>;

    /// Fails with [`DictError::NotFound`] when nothing is stored under `name`.
    fn download(&self, name: &str) -> Result<Vec<u8>>;

    fn list(&self) -> Result<Vec<String>>;
}

/// Backups as plain files in a folder, typically one a desktop sync client
/// mirrors to the cloud.
pub struct FolderGateway {
    root: PathBuf,
}

impl FolderGateway {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| DictError::io("create", &root, e))?;
        Ok(FolderGateway { root })
    }
}

impl SyncGateway for FolderGateway {
    fn upload(&self, bytes: &[u8], name: &str) -> Result<String> {
        check_file_name(name)?;
        write_atomic(&self.root.join(name), bytes)?;
        Ok(content_id(bytes))
    }

    fn download(&self, name: &str) -> Result<Vec<u8>> {
        check_file_name(name)?;
        let path = self.root.join(name);
        if !path.is_file() {
            return Err(DictError::NotFound(format!("{name} in backup folder")));
        }
        fs::read(&path).map_err(|e| DictError::io("read", path, e))
    }

    fn list(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.root).map_err(|e| DictError::io("list", &self.root, e))?;
        let mut names: Vec<String> = entries
            .flatten()
            .filter(|e| e.path().is_file())
            .filter_map(|e| e.file_name().to_str().map(str::to_string))
            .filter(|n| !n.ends_with(".tmp"))
            .collect();
        names.sort();
        Ok(names)
    }
}

fn content_id(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Supplies a bearer token. How it was obtained or refreshed is not the
/// gateway's business.
pub trait AccessToken {
    fn token(&self) -> Result<String>;
}

pub struct StaticToken(pub String);

impl AccessToken for StaticToken {
    fn token(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

/// Blob store over HTTP: `PUT`/`GET <base>/<name>`, `GET <base>` lists names.
/// The name is sent as a single percent-encoded path segment.
pub struct HttpGateway {
    client: Client,
    base_url: Url,
    auth: Box<dyn AccessToken>,
}

impl HttpGateway {
    pub fn new(base_url: &str, auth: Box<dyn AccessToken>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .build()
            .map_err(|e| gateway_err("connect", base_url, e.to_string()))?;

        let base_url = Url::parse(base_url)
            .map_err(|e| gateway_err("connect", base_url, e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(gateway_err("connect", base_url.as_str(), "not a hierarchical URL".into()));
        }

        Ok(HttpGateway { client, base_url, auth })
    }

    fn url(&self, name: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| gateway_err("connect", self.base_url.as_str(), "not a hierarchical URL".into()))?
            .pop_if_empty()
            .push(name);
        Ok(url)
    }
}

impl SyncGateway for HttpGateway {
    fn upload(&self, bytes: &[u8], name: &str) -> Result<String> {
        check_file_name(name)?;
        let resp = self
            .client
            .put(self.url(name)?)
            .bearer_auth(self.auth.token()?)
            .header(reqwest::header::CONTENT_TYPE, "text/plain")
            .body(bytes.to_vec())
            .send()
            .map_err(|e| gateway_err("upload", name, e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .map_err(|e| gateway_err("upload", name, e.to_string()))?;
        if !status.is_success() {
            return Err(gateway_err("upload", name, http_message(status, &text)));
        }

        let id = serde_json::from_str::<serde_json::Value>(&text)
            .ok()
            .and_then(|v| v.get("id").and_then(|id| id.as_str()).map(str::to_string))
            .unwrap_or_else(|| content_id(bytes));
        Ok(id)
    }

    fn download(&self, name: &str) -> Result<Vec<u8>> {
        check_file_name(name)?;
        let resp = self
            .client
            .get(self.url(name)?)
            .bearer_auth(self.auth.token()?)
            .send()
            .map_err(|e| gateway_err("download", name, e.to_string()))?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(DictError::NotFound(format!("{name} on remote")));
        }
        if !status.is_success() {
            let text = resp.text().unwrap_or_default();
            return Err(gateway_err("download", name, http_message(status, &text)));
        }

        resp.bytes()
            .map(|b| b.to_vec())
            .map_err(|e| gateway_err("download", name, e.to_string()))
    }

    fn list(&self) -> Result<Vec<String>> {
        let resp = self
            .client
            .get(self.base_url.clone())
            .bearer_auth(self.auth.token()?)
            .send()
            .map_err(|e| gateway_err("list", self.base_url.as_str(), e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().unwrap_or_default();
            return Err(gateway_err("list", self.base_url.as_str(), http_message(status, &text)));
        }

        resp.json::<Vec<String>>()
            .map_err(|e| gateway_err("list", self.base_url.as_str(), e.to_string()))
    }
}

fn gateway_err(op: &'static str, name: &str, message: String) -> DictError {
    DictError::Gateway {
        op,
        name: name.to_string(),
        message,
    }
}

fn http_message(status: StatusCode, body: &str) -> String {
    if let Ok(v) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(msg) = v
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
        {
            return format!("HTTP {}: {}", status.as_u16(), msg);
        }
        if let Some(msg) = v.get("message").and_then(|m| m.as_str()) {
            return format!("HTTP {}: {}", status.as_u16(), msg);
        }
    }

    let trimmed = body.trim();
    let snippet: String = trimmed.chars().take(400).collect();
    if snippet.len() < trimmed.len() {
        format!("HTTP {}: {}...", status.as_u16(), snippet)
    } else {
        format!("HTTP {}: {}", status.as_u16(), snippet)
    }
}
