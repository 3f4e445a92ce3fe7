//! Граф связей гексов на `petgraph`: достижимость и глубина обхода в ширину.

use crate::hex::Hexagon;
use petgraph::algo::dijkstra;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Bfs;
use std::collections::HashMap;

/// Строит граф связей: узел `i` соответствует `hexagons[i]`, ребро — записи в `connections`.
/// Ссылки на несуществующие гексы пропускаются (их ловит валидатор).
pub fn build_hex_graph(hexagons: &[Hexagon]) -> DiGraph<usize, ()> {
    let mut graph = DiGraph::with_capacity(hexagons.len(), hexagons.len() * 3);
    let id_to_node: HashMap<&str, NodeIndex> = hexagons
        .iter()
        .enumerate()
        .map(|(i, hex)| (hex.id.as_str(), graph.add_node(i)))
        .collect();

    for (i, hex) in hexagons.iter().enumerate() {
        for conn in &hex.connections {
            if let Some(&target) = id_to_node.get(conn.as_str()) {
                graph.add_edge(NodeIndex::new(i), target, ());
            }
        }
    }
    graph
}

/// Сколько гексов достижимо обходом в ширину из `hexagons[0]` (включая его самого).
pub fn reachable_count(hexagons: &[Hexagon]) -> usize {
    if hexagons.is_empty() {
        return 0;
    }
    let graph = build_hex_graph(hexagons);
    let mut bfs = Bfs::new(&graph, NodeIndex::new(0));
    let mut count = 0;
    while bfs.next(&graph).is_some() {
        count += 1;
    }
    count
}

/// Гексы, недостижимые из `hexagons[0]`.
pub fn unreachable_ids(hexagons: &[Hexagon]) -> Vec<String> {
    if hexagons.is_empty() {
        return Vec::new();
    }
    let graph = build_hex_graph(hexagons);
    let mut bfs = Bfs::new(&graph, NodeIndex::new(0));
    while bfs.next(&graph).is_some() {}
    hexagons
        .iter()
        .enumerate()
        .filter(|&(i, _)| !bfs.discovered.contains(i))
        .map(|(_, hex)| hex.id.clone())
        .collect()
}

/// Глубина дерева обхода в ширину из `start`: наибольшее число шагов до достижимого гекса.
pub fn bfs_depth(hexagons: &[Hexagon], start: usize) -> usize {
    if start >= hexagons.len() {
        return 0;
    }
    let graph = build_hex_graph(hexagons);
    dijkstra(&graph, NodeIndex::new(start), None, |_| 1usize)
        .into_values()
        .max()
        .unwrap_or(0)
}
