// Copyright 2026 The PMO Lifecycle Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! The editable flow diagram: a node/edge graph with copy/paste,
//! debounced undo/redo and persistence to a key/value store.

mod history;
mod store;
mod template;

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::common::Result;
use crate::config::EditorConfig;
use crate::editor_err;

pub use history::History;
pub use store::{
    FileStorage, LoadSource, MemoryStorage, PersistedDocument, SCHEMA_VERSION, Storage,
    decode_document, encode_document, load, load_or_template, now_millis, save, validate_graph,
};
pub use template::template_graph;

/// Called with the element id and its new text after an edit.
pub type EditHook = Rc<dyn Fn(&str, &str)>;

const PASTE_OFFSET: f64 = 40.0;

fn is_false(val: &bool) -> bool {
    !*val
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Position { x, y }
    }

    /// JSON has no encoding for NaN or infinity, so only finite positions
    /// survive a save.
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

fn check_position(position: Position) -> Result<()> {
    if position.is_finite() {
        Ok(())
    } else {
        editor_err!(
            InvalidPosition,
            format!("({}, {}) is not a finite position", position.x, position.y)
        )
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Phase,
    Decision,
    Exception,
    #[default]
    Note,
}

impl std::str::FromStr for NodeType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "phase" => Ok(NodeType::Phase),
            "decision" => Ok(NodeType::Decision),
            "exception" => Ok(NodeType::Exception),
            "note" => Ok(NodeType::Note),
            _ => Err(format!("unknown node type '{s}'")),
        }
    }
}

/// Display fields of a node. `on_text_edit` exists only at run time and
/// never reaches the store.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    pub label: String,
    #[serde(default)]
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub phase_id: Option<String>,
    #[serde(skip_serializing_if = "is_false", default)]
    pub expanded: bool,
    #[serde(skip)]
    pub on_text_edit: Option<EditHook>,
}

// hooks are identity-less and excluded from comparison
impl PartialEq for NodeData {
    fn eq(&self, other: &Self) -> bool {
        self.label == other.label
            && self.content == other.content
            && self.color == other.color
            && self.phase_id == other.phase_id
            && self.expanded == other.expanded
    }
}

impl fmt::Debug for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeData")
            .field("label", &self.label)
            .field("content", &self.content)
            .field("color", &self.color)
            .field("phase_id", &self.phase_id)
            .field("expanded", &self.expanded)
            .field("on_text_edit", &self.on_text_edit.is_some())
            .finish()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    #[serde(rename = "type", default)]
    pub node_type: NodeType,
    pub position: Position,
    pub data: NodeData,
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct EdgeData {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub label: Option<String>,
    #[serde(skip)]
    pub on_label_edit: Option<EditHook>,
}

impl PartialEq for EdgeData {
    fn eq(&self, other: &Self) -> bool {
        self.label == other.label
    }
}

impl fmt::Debug for EdgeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EdgeData")
            .field("label", &self.label)
            .field("on_label_edit", &self.on_label_edit.is_some())
            .finish()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub data: EdgeData,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowGraph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub expanded_phases: Vec<String>,
}

impl FlowGraph {
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == id)
    }

    fn edge_mut(&mut self, id: &str) -> Option<&mut Edge> {
        self.edges.iter_mut().find(|e| e.id == id)
    }

    /// Hooks stripped from every node and edge.
    pub fn detached(&self) -> FlowGraph {
        let mut graph = self.clone();
        for node in &mut graph.nodes {
            node.data.on_text_edit = None;
        }
        for edge in &mut graph.edges {
            edge.data.on_label_edit = None;
        }
        graph
    }
}

/// Hooks the editor attaches to every node and edge it owns.
#[derive(Clone, Default)]
pub struct EditorHooks {
    pub node_text: Option<EditHook>,
    pub edge_label: Option<EditHook>,
}

impl EditorHooks {
    pub fn attach(&self, graph: &mut FlowGraph) {
        for node in &mut graph.nodes {
            node.data.on_text_edit = self.node_text.clone();
        }
        for edge in &mut graph.edges {
            edge.data.on_label_edit = self.edge_label.clone();
        }
    }
}

#[derive(Clone, Debug, Default)]
struct Clipboard {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    pastes: u32,
}

pub struct Editor {
    graph: FlowGraph,
    history: History<FlowGraph>,
    hooks: EditorHooks,
    clipboard: Option<Clipboard>,
    next_id: u64,
}

fn numeric_suffix(id: &str) -> Option<u64> {
    let digits: String = id
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit())
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    digits.parse().ok()
}

impl Editor {
    pub fn new(mut graph: FlowGraph, config: &EditorConfig, hooks: EditorHooks) -> Self {
        hooks.attach(&mut graph);
        let next_id = graph
            .nodes
            .iter()
            .map(|n| n.id.as_str())
            .chain(graph.edges.iter().map(|e| e.id.as_str()))
            .filter_map(numeric_suffix)
            .max()
            .map_or(1, |n| n.saturating_add(1));
        Editor {
            history: History::new(graph.detached(), config.history_limit, config.debounce()),
            graph,
            hooks,
            clipboard: None,
            next_id,
        }
    }

    pub fn graph(&self) -> &FlowGraph {
        &self.graph
    }

    pub fn history(&self) -> &History<FlowGraph> {
        &self.history
    }

    fn fresh_id(&mut self, prefix: &str) -> String {
        loop {
            let id = format!("{prefix}-{}", self.next_id);
            // at u64::MAX the id repeats and the existence check below
            // rejects it until a lower id frees up
            self.next_id = self.next_id.checked_add(1).unwrap_or(1);
            if self.graph.node(&id).is_none() && self.graph.edge(&id).is_none() {
                return id;
            }
        }
    }

    fn record(&mut self, now: Instant) {
        self.history.record(self.graph.detached(), now);
    }

    /// Commits a pending undo step once its debounce window has passed.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.history.tick(now)
    }

    pub fn add_node(
        &mut self,
        node_type: NodeType,
        label: &str,
        position: Position,
        now: Instant,
    ) -> Result<String> {
        check_position(position)?;
        let id = self.fresh_id("node");
        self.graph.nodes.push(Node {
            id: id.clone(),
            node_type,
            position,
            data: NodeData {
                label: label.to_string(),
                on_text_edit: self.hooks.node_text.clone(),
                ..Default::default()
            },
        });
        self.record(now);
        Ok(id)
    }

    /// Removes the node and every edge touching it.
    pub fn delete_node(&mut self, id: &str, now: Instant) -> Result<()> {
        let before = self.graph.nodes.len();
        self.graph.nodes.retain(|n| n.id != id);
        if self.graph.nodes.len() == before {
            return editor_err!(DoesNotExist, id.to_string());
        }
        self.graph.edges.retain(|e| e.source != id && e.target != id);
        self.record(now);
        Ok(())
    }

    pub fn move_node(&mut self, id: &str, position: Position, now: Instant) -> Result<()> {
        check_position(position)?;
        let Some(node) = self.graph.node_mut(id) else {
            return editor_err!(DoesNotExist, id.to_string());
        };
        node.position = position;
        self.record(now);
        Ok(())
    }

    pub fn set_node_label(&mut self, id: &str, label: &str, now: Instant) -> Result<()> {
        let Some(node) = self.graph.node_mut(id) else {
            return editor_err!(DoesNotExist, id.to_string());
        };
        node.data.label = label.to_string();
        if let Some(hook) = node.data.on_text_edit.clone() {
            hook(id, label);
        }
        self.record(now);
        Ok(())
    }

    pub fn set_node_content(&mut self, id: &str, content: &str, now: Instant) -> Result<()> {
        let Some(node) = self.graph.node_mut(id) else {
            return editor_err!(DoesNotExist, id.to_string());
        };
        node.data.content = content.to_string();
        if let Some(hook) = node.data.on_text_edit.clone() {
            hook(id, content);
        }
        self.record(now);
        Ok(())
    }

    pub fn connect(
        &mut self,
        source: &str,
        target: &str,
        label: Option<&str>,
        now: Instant,
    ) -> Result<String> {
        for end in [source, target] {
            if self.graph.node(end).is_none() {
                return editor_err!(DanglingEdge, format!("{source} -> {target}: no node '{end}'"));
            }
        }
        let id = self.fresh_id("edge");
        self.graph.edges.push(Edge {
            id: id.clone(),
            source: source.to_string(),
            target: target.to_string(),
            data: EdgeData {
                label: label.map(str::to_string),
                on_label_edit: self.hooks.edge_label.clone(),
            },
        });
        self.record(now);
        Ok(id)
    }

    pub fn delete_edge(&mut self, id: &str, now: Instant) -> Result<()> {
        let before = self.graph.edges.len();
        self.graph.edges.retain(|e| e.id != id);
        if self.graph.edges.len() == before {
            return editor_err!(DoesNotExist, id.to_string());
        }
        self.record(now);
        Ok(())
    }

    /// Sets or clears an edge label. An empty label clears it.
    pub fn set_edge_label(&mut self, id: &str, label: Option<&str>, now: Instant) -> Result<()> {
        let Some(edge) = self.graph.edge_mut(id) else {
            return editor_err!(DoesNotExist, id.to_string());
        };
        edge.data.label = label.filter(|l| !l.is_empty()).map(str::to_string);
        if let Some(hook) = edge.data.on_label_edit.clone() {
            hook(id, label.unwrap_or_default());
        }
        self.record(now);
        Ok(())
    }

    /// Copies the named nodes and the edges running between them. Unknown
    /// ids are skipped. Returns the number of nodes copied.
    pub fn copy(&mut self, ids: &[&str]) -> usize {
        let selected: HashSet<&str> = ids.iter().copied().collect();
        let nodes: Vec<Node> = self
            .graph
            .nodes
            .iter()
            .filter(|n| selected.contains(n.id.as_str()))
            .cloned()
            .collect();
        let edges: Vec<Edge> = self
            .graph
            .edges
            .iter()
            .filter(|e| selected.contains(e.source.as_str()) && selected.contains(e.target.as_str()))
            .cloned()
            .collect();
        let copied = nodes.len();
        self.clipboard = if copied == 0 {
            None
        } else {
            Some(Clipboard {
                nodes,
                edges,
                pastes: 0,
            })
        };
        copied
    }

    /// Inserts the clipboard with fresh ids, shifted so repeated pastes
    /// don't stack. Returns the new node ids.
    pub fn paste(&mut self, now: Instant) -> Vec<String> {
        let Some(mut clipboard) = self.clipboard.take() else {
            return vec![];
        };
        clipboard.pastes += 1;
        let shift = PASTE_OFFSET * f64::from(clipboard.pastes);

        let mut renamed: HashMap<String, String> = HashMap::new();
        let mut new_ids = Vec::with_capacity(clipboard.nodes.len());
        for node in &clipboard.nodes {
            let id = self.fresh_id("node");
            renamed.insert(node.id.clone(), id.clone());
            let mut copy = node.clone();
            copy.id = id.clone();
            let shifted = Position::new(node.position.x + shift, node.position.y + shift);
            if shifted.is_finite() {
                copy.position = shifted;
            }
            copy.data.on_text_edit = self.hooks.node_text.clone();
            self.graph.nodes.push(copy);
            new_ids.push(id);
        }
        for edge in &clipboard.edges {
            if let (Some(source), Some(target)) = (renamed.get(&edge.source), renamed.get(&edge.target)) {
                let id = self.fresh_id("edge");
                self.graph.edges.push(Edge {
                    id,
                    source: source.clone(),
                    target: target.clone(),
                    data: EdgeData {
                        label: edge.data.label.clone(),
                        on_label_edit: self.hooks.edge_label.clone(),
                    },
                });
            }
        }
        self.clipboard = Some(clipboard);
        self.record(now);
        new_ids
    }

    /// Flips whether a phase's detail panel is expanded. View state only,
    /// so it isn't an undo step.
    pub fn toggle_expanded(&mut self, phase_id: &str) -> bool {
        let expanded = &mut self.graph.expanded_phases;
        let now_expanded = if let Some(pos) = expanded.iter().position(|p| p == phase_id) {
            expanded.remove(pos);
            false
        } else {
            expanded.push(phase_id.to_string());
            true
        };
        for node in &mut self.graph.nodes {
            if node.data.phase_id.as_deref() == Some(phase_id) {
                node.data.expanded = now_expanded;
            }
        }
        now_expanded
    }

    fn restore(&mut self, mut snapshot: FlowGraph) {
        // expansion is view state and survives undo/redo
        let expanded = std::mem::take(&mut self.graph.expanded_phases);
        for node in &mut snapshot.nodes {
            node.data.expanded = node
                .data
                .phase_id
                .as_ref()
                .is_some_and(|p| expanded.contains(p));
        }
        snapshot.expanded_phases = expanded;
        self.hooks.attach(&mut snapshot);
        self.graph = snapshot;
    }

    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(snapshot) => {
                self.restore(snapshot);
                debug!(depth = self.history.undo_depth(), "undo");
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(snapshot) => {
                self.restore(snapshot);
                true
            }
            None => false,
        }
    }

    /// Replaces the whole graph, e.g. after loading or resetting. History
    /// starts over.
    pub fn replace_graph(&mut self, mut graph: FlowGraph) {
        self.hooks.attach(&mut graph);
        self.history.reset(graph.detached());
        self.graph = graph;
        self.clipboard = None;
    }
}
