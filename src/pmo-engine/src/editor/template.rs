// Copyright 2026 The PMO Lifecycle Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use crate::catalog::Catalog;
use crate::config::LayoutConfig;
use crate::diagram::layout::layout_tracks;
use crate::editor::{Edge, EdgeData, FlowGraph, Node, NodeData, NodeType, Position};
use crate::lookup::lookup_phase;

const TEMPLATE_TRACK: &str = "enterprise";

fn node_id(phase_id: &str) -> String {
    format!("phase-{phase_id}")
}

/// The starting graph for a fresh editor: the Enterprise track laid out
/// left to right, one node per phase.
pub fn template_graph(catalog: &Catalog) -> FlowGraph {
    let Some(track) = catalog
        .get_track(TEMPLATE_TRACK)
        .or_else(|| catalog.tracks.first())
    else {
        return FlowGraph::default();
    };
    let layout = layout_tracks(std::slice::from_ref(track), &[], &LayoutConfig::default());

    let nodes = layout
        .nodes
        .iter()
        .filter_map(|placed| {
            let phase_id = placed.phase_id.as_deref()?;
            let record = lookup_phase(catalog, phase_id);
            Some(Node {
                id: node_id(phase_id),
                node_type: NodeType::Phase,
                position: Position::new(placed.center.x, placed.center.y),
                data: NodeData {
                    label: record.name,
                    content: record.description,
                    color: Some(record.gradient.token().to_string()),
                    phase_id: Some(phase_id.to_string()),
                    ..Default::default()
                },
            })
        })
        .collect();

    let edges = layout
        .links
        .iter()
        .map(|link| Edge {
            id: format!("e-{}-{}", link.from, link.to),
            source: node_id(&link.from),
            target: node_id(&link.to),
            data: EdgeData::default(),
        })
        .collect();

    FlowGraph {
        nodes,
        edges,
        expanded_phases: vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::validate_graph;

    #[test]
    fn test_template_follows_enterprise_track() {
        let graph = template_graph(Catalog::builtin());
        let ids: Vec<&str> = graph
            .nodes
            .iter()
            .filter_map(|n| n.data.phase_id.as_deref())
            .collect();
        assert_eq!(ids, vec!["0", "1", "2E", "3E", "4", "5", "6"]);
        assert_eq!(graph.edges.len(), 6);
        assert_eq!(graph.edges[0].source, "phase-0");
        assert_eq!(graph.edges[0].target, "phase-1");
        assert_eq!(graph.nodes[2].data.label, "Enterprise Planning");
        assert!(validate_graph(&graph).is_ok());
    }

    #[test]
    fn test_template_without_tracks() {
        let mut catalog = Catalog::builtin().clone();
        catalog.tracks.clear();
        assert_eq!(template_graph(&catalog), FlowGraph::default());
    }
}
