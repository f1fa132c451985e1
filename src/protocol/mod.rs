use serde_json::{json, Value};

use crate::error::{DictError, Result};
use crate::model::dictionary::DictionaryFlavor;
use crate::services::encoding;
use crate::services::export::ExportTarget;
use crate::services::store::DictionaryStore;
use crate::services::sync::SyncGateway;

mod command;
use command::Command;

fn get_cmd(req: &Value) -> &str {
    req.get("cmd").and_then(|v| v.as_str()).unwrap_or("")
}

fn get_id(req: &Value) -> Value {
    req.get("id").cloned().unwrap_or(Value::Null)
}

fn get_payload(req: &Value) -> &Value {
    static EMPTY: Value = Value::Null;
    req.get("payload").unwrap_or(&EMPTY)
}

fn ok(id: Value, payload: Value) -> String {
    json!({
        "id": id,
        "status": "ok",
        "payload": payload
    })
    .to_string()
}

fn err(id: Value, e: &DictError) -> String {
    json!({
        "id": id,
        "status": "error",
        "kind": e.kind(),
        "message": e.to_string()
    })
    .to_string()
}

fn require_str<'a>(payload: &'a Value, key: &str) -> Result<&'a str> {
    payload
        .get(key)
        .and_then(|v| v.as_str())
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| DictError::Validation(format!("payload.{key} is required")))
}

fn opt_str<'a>(payload: &'a Value, key: &str) -> &'a str {
    payload.get(key).and_then(|v| v.as_str()).unwrap_or("")
}

fn opt_bool(payload: &Value, key: &str) -> bool {
    payload.get(key).and_then(|v| v.as_bool()).unwrap_or(false)
}

fn require_index(payload: &Value) -> Result<usize> {
    payload
        .get("index")
        .and_then(|v| v.as_u64())
        .and_then(|i| usize::try_from(i).ok())
        .ok_or_else(|| DictError::Validation("payload.index must be a non-negative integer".into()))
}

fn to_value<T: serde::Serialize>(v: &T) -> Value {
    serde_json::to_value(v).unwrap_or(Value::Null)
}

/// One front end's connection to the core: the store plus the backup
/// transport it was configured with.
pub struct Session {
    store: DictionaryStore,
    gateway: Box<dyn SyncGateway>,
}

impl Session {
    pub fn new(store: DictionaryStore, gateway: Box<dyn SyncGateway>) -> Self {
        Session { store, gateway }
    }

    /// Handles one request line and returns the response line.
    pub fn handle(&mut self, input: &str) -> String {
        let req: Value = match serde_json::from_str(input) {
            Ok(v) => v,
            Err(_) => {
                return json!({
                    "status": "error",
                    "message": "invalid json"
                })
                .to_string();
            }
        };

        let id = get_id(&req);
        let cmd_str = get_cmd(&req);
        let payload = get_payload(&req);

        tracing::debug!(cmd = cmd_str, "request");

        match self.dispatch(Command::from(cmd_str), payload) {
            Ok(v) => ok(id, v),
            Err(e) => {
                tracing::warn!(cmd = cmd_str, kind = e.kind(), error = %e, "request failed");
                err(id, &e)
            }
        }
    }

    fn dispatch(&mut self, cmd: Command, payload: &Value) -> Result<Value> {
        match cmd {
            Command::Ping => Ok(json!({ "message": "ime-dict-core alive" })),

            Command::DictionaryList => Ok(json!({
                "dictionaries": self.store.list_dictionaries()?,
                "dictionary": self.snapshot()
            })),

            Command::DictionaryCreate => {
                let name = require_str(payload, "name")?;
                let flavor = match payload.get("flavor") {
                    None | Some(Value::Null) => DictionaryFlavor::default(),
                    Some(v) => serde_json::from_value(v.clone()).map_err(|e| {
                        DictError::Validation(format!("invalid payload.flavor: {e}"))
                    })?,
                };
                let name = self.store.create_dictionary(name, flavor)?;
                Ok(json!({
                    "name": name,
                    "dictionaries": self.store.list_dictionaries()?
                }))
            }

            Command::DictionaryDelete => {
                let name = require_str(payload, "name")?;
                self.store.delete_dictionary(name)?;
                Ok(json!({
                    "dictionaries": self.store.list_dictionaries()?,
                    "dictionary": self.snapshot()
                }))
            }

            Command::DictionaryOpen => {
                let name = require_str(payload, "name")?;
                let dict = self.store.load(name)?;
                Ok(json!({ "dictionary": dict }))
            }

            Command::EntryAdd => {
                let dict = self.store.add_entry(
                    opt_str(payload, "reading"),
                    opt_str(payload, "surface"),
                    opt_str(payload, "pos"),
                )?;
                Ok(json!({ "dictionary": dict }))
            }

            Command::EntryEdit => {
                let index = require_index(payload)?;
                let taken = self.store.edit_entry(index)?;
                Ok(json!({ "entry": taken, "dictionary": self.snapshot() }))
            }

            Command::EntryUpdate => {
                let index = require_index(payload)?;
                let dict = self.store.update_entry(
                    index,
                    opt_str(payload, "reading"),
                    opt_str(payload, "surface"),
                    opt_str(payload, "pos"),
                )?;
                Ok(json!({ "dictionary": dict }))
            }

            Command::EntryDelete => {
                let index = require_index(payload)?;
                let removed = self.store.delete_entry(index)?;
                Ok(json!({ "entry": removed, "dictionary": self.snapshot() }))
            }

            Command::Export => {
                let target: ExportTarget = require_str(payload, "target")?.parse()?;
                let path = self.store.export_as(target)?;
                Ok(json!({ "path": path.to_string_lossy() }))
            }

            Command::ClipboardExport => {
                let text = self.store.clipboard_text(opt_bool(payload, "include_name"))?;
                Ok(json!({ "text": text }))
            }

            Command::ClipboardImport => {
                let report = self.store.import_clipboard(opt_str(payload, "text"))?;
                Ok(json!({ "report": report, "dictionary": self.snapshot() }))
            }

            Command::Backup => {
                let report = self.store.backup(self.gateway.as_ref())?;
                Ok(to_value(&report))
            }

            Command::BackupList => Ok(json!({ "backups": self.gateway.list()? })),

            Command::Restore => {
                let name = require_str(payload, "name")?;
                let overwrite = opt_bool(payload, "overwrite");
                let report = self.store.restore(self.gateway.as_ref(), name, overwrite)?;
                Ok(json!({
                    "report": report,
                    "dictionaries": self.store.list_dictionaries()?,
                    "dictionary": self.snapshot()
                }))
            }

            Command::DetectEncoding => {
                let path = std::path::PathBuf::from(require_str(payload, "path")?);
                Ok(to_value(&encoding::detect_from_file(&path)?))
            }

            Command::Unknown => Err(DictError::Validation("unknown command".into())),
        }
    }

    fn snapshot(&self) -> Value {
        self.store.current().map(to_value).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use crate::services::sync::FolderGateway;

    fn session() -> (tempfile::TempDir, Session) {
        let dir = tempfile::tempdir().unwrap();
        let cfg = StoreConfig::under(dir.path());
        let gateway = FolderGateway::new(&cfg.backup_root).unwrap();
        let store = DictionaryStore::open(cfg).unwrap();
        (dir, Session::new(store, Box::new(gateway)))
    }

    fn call(s: &mut Session, line: &str) -> Value {
        serde_json::from_str(&s.handle(line)).unwrap()
    }

    #[test]
    fn invalid_json() {
        let (_dir, mut s) = session();
        let v = call(&mut s, "{nope");
        assert_eq!(v["status"], "error");
        assert_eq!(v["message"], "invalid json");
    }

    #[test]
    fn unknown_command_echoes_id() {
        let (_dir, mut s) = session();
        let v = call(&mut s, r#"{"id":7,"cmd":"frobnicate"}"#);
        assert_eq!(v["id"], 7);
        assert_eq!(v["status"], "error");
    }

    #[test]
    fn errors_carry_kind() {
        let (_dir, mut s) = session();
        let v = call(&mut s, r#"{"id":1,"cmd":"dictionary.delete","payload":{"name":"x.txt"}}"#);
        assert_eq!(v["kind"], "not_found");

        let v = call(&mut s, r#"{"id":2,"cmd":"entry.delete","payload":{"index":0}}"#);
        assert_eq!(v["kind"], "precondition");
    }

    #[test]
    fn create_open_add() {
        let (_dir, mut s) = session();
        let v = call(&mut s, r#"{"id":1,"cmd":"dictionary.create","payload":{"name":"words","flavor":"ime_tool"}}"#);
        assert_eq!(v["payload"]["name"], "words.txt");

        call(&mut s, r#"{"id":2,"cmd":"dictionary.open","payload":{"name":"words.txt"}}"#);
        let v = call(
            &mut s,
            r#"{"id":3,"cmd":"entry.add","payload":{"reading":"ねこ","surface":"猫","pos":"名詞"}}"#,
        );
        assert_eq!(v["status"], "ok");
        assert_eq!(v["payload"]["dictionary"]["flavor"], "ime_tool");
        assert_eq!(v["payload"]["dictionary"]["entries"][0]["surface"], "猫");
    }

    #[test]
    fn bad_flavor_is_rejected() {
        let (_dir, mut s) = session();
        let v = call(&mut s, r#"{"cmd":"dictionary.create","payload":{"name":"w","flavor":"atok"}}"#);
        assert_eq!(v["kind"], "validation");
    }
}
