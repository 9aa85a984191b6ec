// Copyright 2026 The PMO Lifecycle Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Persistence of editor graphs to a string key/value store.
//!
//! Documents carry a schema version. Older versions are migrated step by
//! step to [`SCHEMA_VERSION`] before the typed decode, and the decoded graph
//! is validated before it is trusted. Loading never fails outward:
//! [`load_or_template`] falls back to the template on any problem.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::common::{Error, ErrorCode, ErrorKind, Result};
use crate::editor::{Edge, FlowGraph, Node};
use crate::storage_err;

pub const SCHEMA_VERSION: &str = "2";

/// A string key/value store with the semantics of browser local storage.
pub trait Storage {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove_item(&mut self, key: &str) -> Result<()>;
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that rejects writes once keys plus values exceed `bytes`.
    pub fn with_quota(bytes: usize) -> Self {
        MemoryStorage {
            items: HashMap::new(),
            quota: Some(bytes),
        }
    }

    fn used_without(&self, key: &str) -> usize {
        self.items
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        if let Some(quota) = self.quota {
            let needed = self.used_without(key) + key.len() + value.len();
            if needed > quota {
                return storage_err!(
                    QuotaExceeded,
                    format!("{key}: {needed} bytes exceeds quota of {quota}")
                );
            }
        }
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        self.items.remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per key under a directory.
#[derive(Clone, Debug)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStorage { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
            && !key.starts_with('.');
        if !valid {
            return storage_err!(StorageIo, format!("invalid storage key '{key}'"));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

fn io_err(path: &Path, err: std::io::Error) -> Error {
    Error::new(
        ErrorKind::Storage,
        ErrorCode::StorageIo,
        Some(format!("{}: {err}", path.display())),
    )
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == IoErrorKind::NotFound => Ok(None),
            Err(err) => Err(io_err(&path, err)),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir).map_err(|err| io_err(&self.dir, err))?;
        // write then rename so a failed write leaves the old value intact
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(|err| io_err(&tmp, err))?;
        fs::rename(&tmp, &path).map_err(|err| io_err(&path, err))
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == IoErrorKind::NotFound => Ok(()),
            Err(err) => Err(io_err(&path, err)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedDocument {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub expanded_phases: Option<Vec<String>>,
    pub timestamp: u64,
    pub version: String,
}

impl PersistedDocument {
    pub fn from_graph(graph: &FlowGraph, timestamp: u64) -> Self {
        let graph = graph.detached();
        PersistedDocument {
            nodes: graph.nodes,
            edges: graph.edges,
            expanded_phases: (!graph.expanded_phases.is_empty()).then_some(graph.expanded_phases),
            timestamp,
            version: SCHEMA_VERSION.to_string(),
        }
    }

    pub fn into_graph(self) -> FlowGraph {
        FlowGraph {
            nodes: self.nodes,
            edges: self.edges,
            expanded_phases: self.expanded_phases.unwrap_or_default(),
        }
    }
}

type Migration = fn(&mut Value) -> Result<()>;

// (from version, step to the next version)
const MIGRATIONS: &[(&str, Migration)] = &[("1", migrate_v1)];

fn schema_err(details: String) -> Error {
    Error::new(ErrorKind::Storage, ErrorCode::SchemaMismatch, Some(details))
}

/// Version 1 kept node text under `data.text` and had no version field.
fn migrate_v1(doc: &mut Value) -> Result<()> {
    let Some(obj) = doc.as_object_mut() else {
        return Err(schema_err("document is not an object".to_string()));
    };
    if let Some(nodes) = obj.get_mut("nodes").and_then(Value::as_array_mut) {
        for node in nodes {
            let Some(data) = node.get_mut("data").and_then(Value::as_object_mut) else {
                continue;
            };
            if let Some(text) = data.remove("text")
                && !data.contains_key("label")
            {
                data.insert("label".to_string(), text);
            }
        }
    }
    obj.entry("timestamp").or_insert(Value::from(0u64));
    obj.insert("version".to_string(), Value::from("2"));
    Ok(())
}

fn document_version(doc: &Value) -> Result<String> {
    match doc.get("version") {
        None | Some(Value::Null) => Ok("1".to_string()),
        Some(Value::String(v)) => Ok(v.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(other) => Err(schema_err(format!("version has unexpected type: {other}"))),
    }
}

fn migrate(doc: &mut Value) -> Result<()> {
    let mut version = document_version(doc)?;
    while version != SCHEMA_VERSION {
        let Some((_, step)) = MIGRATIONS.iter().find(|(from, _)| *from == version) else {
            return storage_err!(UnsupportedVersion, format!("schema version '{version}'"));
        };
        step(doc)?;
        let next = document_version(doc)?;
        debug!(from = %version, to = %next, "migrated stored diagram");
        version = next;
    }
    Ok(())
}

/// Rejects graphs with blank or duplicate node ids, duplicate edge ids,
/// or edges whose endpoints don't exist.
pub fn validate_graph(graph: &FlowGraph) -> Result<()> {
    let mut node_ids: HashSet<&str> = HashSet::new();
    for node in &graph.nodes {
        if node.id.trim().is_empty() {
            return Err(schema_err("node with empty id".to_string()));
        }
        if !node_ids.insert(node.id.as_str()) {
            return storage_err!(DuplicateId, format!("node '{}'", node.id));
        }
    }
    let mut edge_ids: HashSet<&str> = HashSet::new();
    for edge in &graph.edges {
        if edge.id.trim().is_empty() {
            return Err(schema_err("edge with empty id".to_string()));
        }
        if !edge_ids.insert(edge.id.as_str()) {
            return storage_err!(DuplicateId, format!("edge '{}'", edge.id));
        }
        for end in [&edge.source, &edge.target] {
            if !node_ids.contains(end.as_str()) {
                return storage_err!(
                    DanglingEdge,
                    format!("edge '{}' references missing node '{end}'", edge.id)
                );
            }
        }
    }
    Ok(())
}

pub fn encode_document(graph: &FlowGraph, timestamp: u64) -> Result<String> {
    serde_json::to_string(&PersistedDocument::from_graph(graph, timestamp)).map_err(|err| {
        Error::new(
            ErrorKind::Storage,
            ErrorCode::JsonSerialization,
            Some(err.to_string()),
        )
    })
}

/// Parses, migrates and validates a stored document.
pub fn decode_document(raw: &str) -> Result<FlowGraph> {
    let mut value: Value = serde_json::from_str(raw)?;
    migrate(&mut value)?;
    let doc: PersistedDocument = serde_json::from_value(value)?;
    let graph = doc.into_graph();
    validate_graph(&graph)?;
    Ok(graph)
}

pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis() as u64)
}

pub fn save(storage: &mut dyn Storage, key: &str, graph: &FlowGraph, timestamp: u64) -> Result<()> {
    let encoded = encode_document(graph, timestamp)?;
    storage.set_item(key, &encoded)?;
    info!(
        key,
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        bytes = encoded.len(),
        "saved diagram"
    );
    Ok(())
}

/// `Ok(None)` when nothing is stored under `key`.
pub fn load(storage: &dyn Storage, key: &str) -> Result<Option<FlowGraph>> {
    match storage.get_item(key)? {
        Some(raw) => decode_document(&raw).map(Some),
        None => Ok(None),
    }
}

/// Where the graph returned by [`load_or_template`] came from.
#[derive(Debug)]
pub enum LoadSource {
    Stored,
    /// Nothing stored yet.
    Template,
    /// Something was stored but couldn't be used.
    Recovered(Error),
}

pub fn load_or_template(
    storage: &dyn Storage,
    key: &str,
    template: impl FnOnce() -> FlowGraph,
) -> (FlowGraph, LoadSource) {
    match load(storage, key) {
        Ok(Some(graph)) => (graph, LoadSource::Stored),
        Ok(None) => {
            debug!(key, "no stored diagram, using template");
            (template(), LoadSource::Template)
        }
        Err(err) => {
            warn!(key, error = %err, "stored diagram unusable, falling back to template");
            (template(), LoadSource::Recovered(err))
        }
    }
}
