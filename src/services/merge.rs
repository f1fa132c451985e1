use std::collections::HashMap;

use serde::Serialize;

use crate::model::entry::{EntryKey, EntryRecord, EntrySet};

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ImportMode {
    /// Upsert incoming records into the existing set.
    Merge,
    /// Incoming records become the whole set.
    Replace,
}

/// Keyed upsert of `incoming` into `existing`.
///
/// Order: existing records keep their positions (taking the incoming part
/// of speech when the key overlaps), then keys new to `existing` follow in
/// incoming order.
pub fn merge(existing: &EntrySet, incoming: &EntrySet) -> EntrySet {
    let mut records: Vec<EntryRecord> = existing.iter().cloned().collect();
    let mut index: HashMap<EntryKey, usize> = records
        .iter()
        .enumerate()
        .map(|(i, e)| (e.key(), i))
        .collect();

    for e in incoming {
        match index.get(&e.key()) {
            Some(&at) => records[at] = records[at].with_pos(e.pos()),
            None => {
                index.insert(e.key(), records.len());
                records.push(e.clone());
            }
        }
    }

    EntrySet::from_unique(records)
}

pub fn apply(mode: ImportMode, existing: &EntrySet, incoming: &EntrySet) -> EntrySet {
    match mode {
        ImportMode::Merge => merge(existing, incoming),
        ImportMode::Replace => incoming.clone(),
    }
}
