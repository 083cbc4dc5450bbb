//! Text output of routes and cost fields.

use tilepath_core::{Point, TerrainMap};
use tilepath_paths::{CostGraph, Route};

use crate::config::RenderConfig;

/// The map with the route drawn over it. Start and end markers win over
/// the path marker.
pub fn overlay(map: &TerrainMap, route: &Route, style: &RenderConfig) -> String {
    let width = map.width();
    let mut cells: Vec<char> = map.iter().map(|(_, ch)| ch).collect();
    let mut mark = |p: Point, ch: char| {
        if map.contains(p) {
            cells[p.y as usize * width + p.x as usize] = ch;
        }
    };
    for &p in route.cells() {
        mark(p, style.path);
    }
    if let Some(p) = route.start() {
        mark(p, style.start);
    }
    if let Some(p) = route.end() {
        mark(p, style.end);
    }
    join_rows(&cells, width)
}

/// Accumulated cost of every cell, three columns each; `-1` if unreached.
pub fn cost_field(graph: &CostGraph) -> String {
    let mut out = String::new();
    for row in graph.nodes().chunks(graph.width()) {
        for node in row {
            match node.total() {
                Some(t) => out.push_str(&format!("{t:>2} ")),
                None => out.push_str("-1 "),
            }
        }
        out.push('\n');
    }
    out
}

fn join_rows(cells: &[char], width: usize) -> String {
    cells
        .chunks(width)
        .map(|r| r.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}
