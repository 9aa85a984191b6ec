// Copyright 2026 The PMO Lifecycle Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Editor sessions against the file-backed store: save/load round trips,
//! schema migration, fallback to the template and undo depth.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;
use std::time::{Duration, Instant};

use pmo_engine::editor::{
    self, Editor, EditorHooks, FileStorage, FlowGraph, LoadSource, MemoryStorage, NodeType,
    Position, SCHEMA_VERSION, Storage, template_graph,
};
use pmo_engine::{Catalog, EditorConfig, ErrorCode};

const KEY: &str = "pmo-flow-editor";

fn ids(graph: &FlowGraph) -> (BTreeSet<String>, BTreeSet<String>) {
    (
        graph.nodes.iter().map(|n| n.id.clone()).collect(),
        graph.edges.iter().map(|e| e.id.clone()).collect(),
    )
}

fn labels(graph: &FlowGraph) -> Vec<(String, String)> {
    graph
        .nodes
        .iter()
        .map(|n| (n.id.clone(), n.data.label.clone()))
        .collect()
}

fn template() -> FlowGraph {
    template_graph(Catalog::builtin())
}

/// Hooks that record every call as (id, text).
fn recording_hooks() -> (EditorHooks, Rc<RefCell<Vec<(String, String)>>>) {
    let calls: Rc<RefCell<Vec<(String, String)>>> = Rc::default();
    let sink = calls.clone();
    let hook: editor::EditHook =
        Rc::new(move |id: &str, text: &str| sink.borrow_mut().push((id.to_string(), text.to_string())));
    (
        EditorHooks {
            node_text: Some(hook.clone()),
            edge_label: Some(hook),
        },
        calls,
    )
}

#[test]
fn file_store_round_trip_preserves_ids_and_labels() {
    let dir = tempfile::tempdir().unwrap();
    let mut storage = FileStorage::new(dir.path());
    let config = EditorConfig::default();
    let now = Instant::now();

    let mut session = Editor::new(template(), &config, EditorHooks::default());
    let note = session
        .add_node(NodeType::Note, "Budget check", Position::new(300.0, 400.0), now)
        .unwrap();
    session.connect("phase-1", &note, Some("if funded"), now).unwrap();
    session.set_node_label("phase-0", "Intake & Triage", now).unwrap();
    editor::save(&mut storage, KEY, session.graph(), 1_700_000_000_000).unwrap();

    assert!(dir.path().join(format!("{KEY}.json")).exists());

    let loaded = editor::load(&storage, KEY).unwrap().unwrap();
    assert_eq!(ids(&loaded), ids(session.graph()));
    assert_eq!(labels(&loaded), labels(session.graph()));
    assert_eq!(&loaded, session.graph());
}

#[test]
fn hooks_are_stripped_on_save_and_reattached_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let mut storage = FileStorage::new(dir.path());
    let config = EditorConfig::default();
    let now = Instant::now();

    let (hooks, calls) = recording_hooks();
    let mut session = Editor::new(template(), &config, hooks.clone());
    assert!(session.graph().nodes.iter().all(|n| n.data.on_text_edit.is_some()));
    editor::save(&mut storage, KEY, session.graph(), 0).unwrap();

    let raw = storage.get_item(KEY).unwrap().unwrap();
    assert!(!raw.contains("onTextEdit"));
    assert!(!raw.contains("onLabelEdit"));
    assert!(raw.contains(&format!("\"version\":\"{SCHEMA_VERSION}\"")));

    let (loaded, source) = editor::load_or_template(&storage, KEY, template);
    assert!(matches!(source, LoadSource::Stored));
    assert!(loaded.nodes.iter().all(|n| n.data.on_text_edit.is_none()));

    session.replace_graph(loaded);
    session.set_node_label("phase-4", "Build", now).unwrap();
    let edge = session.graph().edges[0].id.clone();
    session.set_edge_label(&edge, Some("approved"), now).unwrap();
    assert_eq!(
        *calls.borrow(),
        vec![
            ("phase-4".to_string(), "Build".to_string()),
            (edge, "approved".to_string()),
        ]
    );
}

#[test]
fn rejected_non_finite_move_keeps_store_loadable() {
    let dir = tempfile::tempdir().unwrap();
    let mut storage = FileStorage::new(dir.path());
    let config = EditorConfig::default();
    let now = Instant::now();

    let mut session = Editor::new(template(), &config, EditorHooks::default());
    let err = session
        .move_node("phase-0", Position::new(f64::NAN, 0.0), now)
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidPosition);
    session.move_node("phase-0", Position::new(12.0, 34.0), now).unwrap();
    editor::save(&mut storage, KEY, session.graph(), 0).unwrap();

    let (loaded, source) = editor::load_or_template(&storage, KEY, template);
    assert!(matches!(source, LoadSource::Stored), "{source:?}");
    assert_eq!(&loaded, session.graph());
    assert_eq!(
        loaded.node("phase-0").unwrap().position,
        Position::new(12.0, 34.0)
    );
}

#[test]
fn version_one_document_is_migrated() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path());
    let v1 = r#"{
        "nodes": [
            {"id": "a", "type": "phase", "position": {"x": 0, "y": 0}, "data": {"text": "Discovery"}},
            {"id": "b", "position": {"x": 150, "y": 0}, "data": {"text": "Planning"}}
        ],
        "edges": [{"id": "e1", "source": "a", "target": "b"}]
    }"#;
    std::fs::write(dir.path().join(format!("{KEY}.json")), v1).unwrap();

    let graph = editor::load(&storage, KEY).unwrap().unwrap();
    assert_eq!(graph.nodes[0].data.label, "Discovery");
    assert_eq!(graph.nodes[1].node_type, NodeType::Note);
    assert_eq!(graph.edges[0].data.label, None);
}

#[test]
fn unusable_store_falls_back_to_template() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path());
    let path = dir.path().join(format!("{KEY}.json"));

    let (graph, source) = editor::load_or_template(&storage, KEY, template);
    assert!(matches!(source, LoadSource::Template));
    assert_eq!(graph, template());

    std::fs::write(&path, "{\"nodes\": [").unwrap();
    let (graph, source) = editor::load_or_template(&storage, KEY, template);
    assert_eq!(graph, template());
    match source {
        LoadSource::Recovered(err) => assert_eq!(err.code, ErrorCode::JsonDeserialization),
        other => panic!("expected a recovered load, got {other:?}"),
    }

    // an edge pointing at a missing node
    std::fs::write(
        &path,
        r#"{"nodes": [], "edges": [{"id": "e", "source": "x", "target": "y"}], "timestamp": 0, "version": "2"}"#,
    )
    .unwrap();
    let (_, source) = editor::load_or_template(&storage, KEY, template);
    match source {
        LoadSource::Recovered(err) => assert_eq!(err.code, ErrorCode::DanglingEdge),
        other => panic!("expected a recovered load, got {other:?}"),
    }

    std::fs::write(&path, r#"{"nodes": [], "edges": [], "timestamp": 0, "version": "7"}"#).unwrap();
    let (_, source) = editor::load_or_template(&storage, KEY, template);
    match source {
        LoadSource::Recovered(err) => assert_eq!(err.code, ErrorCode::UnsupportedVersion),
        other => panic!("expected a recovered load, got {other:?}"),
    }
}

#[test]
fn save_over_quota_surfaces_error() {
    let mut storage = MemoryStorage::with_quota(64);
    let err = editor::save(&mut storage, KEY, &template(), 0).unwrap_err();
    assert_eq!(err.code, ErrorCode::QuotaExceeded);
    assert!(storage.get_item(KEY).unwrap().is_none());
}

#[test]
fn n_edits_then_n_undos_restores_initial_graph() {
    let config = EditorConfig::default();
    let t0 = Instant::now();
    // one edit per second, each committed before the next
    let at = |step: u64| t0 + Duration::from_secs(step);
    let settle = |session: &mut Editor, step: u64| {
        assert!(session.tick(at(step) + config.debounce()));
    };
    let initial = template();
    let mut session = Editor::new(initial.clone(), &config, EditorHooks::default());

    session
        .add_node(NodeType::Decision, "Go?", Position::new(10.0, 10.0), at(1))
        .unwrap();
    settle(&mut session, 1);
    session.move_node("phase-2E", Position::new(5.0, 5.0), at(2)).unwrap();
    settle(&mut session, 2);
    session.set_node_label("phase-6", "Wrap-up", at(3)).unwrap();
    settle(&mut session, 3);
    session.delete_node("phase-3E", at(4)).unwrap();
    settle(&mut session, 4);
    session.connect("phase-0", "phase-6", Some("fast track"), at(5)).unwrap();
    settle(&mut session, 5);

    let edited = session.graph().clone();
    assert_ne!(edited, initial);
    assert_eq!(session.history().undo_depth(), 5);

    for _ in 0..5 {
        assert!(session.undo());
    }
    assert!(!session.undo());
    assert_eq!(session.graph(), &initial);

    for _ in 0..5 {
        assert!(session.redo());
    }
    assert_eq!(session.graph(), &edited);
}

#[test]
fn rapid_edits_collapse_into_one_undo_step() {
    let config = EditorConfig::default();
    let t0 = Instant::now();
    let initial = template();
    let mut session = Editor::new(initial.clone(), &config, EditorHooks::default());

    // a drag: many moves inside the debounce window
    for i in 0..20u64 {
        let now = t0 + Duration::from_millis(i * 16);
        session
            .move_node("phase-1", Position::new(i as f64, i as f64), now)
            .unwrap();
    }
    assert!(!session.tick(t0 + Duration::from_millis(19 * 16 + 100)));
    assert!(session.tick(t0 + Duration::from_millis(19 * 16 + 300)));
    assert_eq!(session.history().undo_depth(), 1);

    assert!(session.undo());
    assert_eq!(session.graph(), &initial);
}
