//! Interactive tree chart assembly.
//!
//! Presentation-only terminal stage: derives draw coordinates from the tree
//! layout, builds a two-trace scatter figure (edge polylines underneath,
//! vertex markers with hover labels on top), and either opens it in the
//! default browser or writes a standalone HTML file.

use crate::error::RenderError;
use crate::tree::flatten::TreeIndex;
use plotly::color::Rgb;
use plotly::common::{Font, HoverInfo, Line, Marker, MarkerSymbol, Mode, Title};
use plotly::layout::{Axis, HoverMode, Layout, Margin};
use plotly::{Plot, Scatter};
use std::path::Path;

/// Per-vertex and per-edge draw coordinates.
///
/// The layout's y axis is reflected (`2*max_y - y`) so the root draws at the
/// top. Edge polylines carry a NaN break after each parent-child segment;
/// NaN serializes to the renderer's path-break sentinel.
#[derive(Debug, Clone)]
pub struct ChartCoords {
    pub node_x: Vec<f64>,
    pub node_y: Vec<f64>,
    pub edge_x: Vec<f64>,
    pub edge_y: Vec<f64>,
}

/// Derive draw coordinates from a tree and its layout positions.
pub fn chart_coords(tree: &TreeIndex, positions: &[(f64, f64)]) -> ChartCoords {
    let max_y = positions.iter().map(|&(_, y)| y).fold(0.0f64, f64::max);
    let flip = |y: f64| 2.0 * max_y - y;

    let node_x = positions.iter().map(|&(x, _)| x).collect();
    let node_y = positions.iter().map(|&(_, y)| flip(y)).collect();

    let mut edge_x = Vec::with_capacity(tree.edges.len() * 3);
    let mut edge_y = Vec::with_capacity(tree.edges.len() * 3);
    for &(parent, child) in &tree.edges {
        edge_x.extend([positions[parent].0, positions[child].0, f64::NAN]);
        edge_y.extend([flip(positions[parent].1), flip(positions[child].1), f64::NAN]);
    }

    ChartCoords {
        node_x,
        node_y,
        edge_x,
        edge_y,
    }
}

/// Assemble the figure.
pub fn build_figure(tree: &TreeIndex, positions: &[(f64, f64)], title: &str) -> Plot {
    let coords = chart_coords(tree, positions);
    let labels: Vec<String> = tree.records.iter().map(|r| r.label.clone()).collect();

    let edges = Scatter::new(coords.edge_x, coords.edge_y)
        .mode(Mode::Lines)
        .line(Line::new().color(Rgb::new(210, 210, 210)).width(1.0))
        .hover_info(HoverInfo::None);

    let nodes = Scatter::new(coords.node_x, coords.node_y)
        .mode(Mode::Markers)
        .marker(
            Marker::new()
                .symbol(MarkerSymbol::CircleDot)
                .size(18)
                .color(Rgb::new(0x61, 0x75, 0xc1))
                .line(Line::new().color(Rgb::new(50, 50, 50)).width(1.0)),
        )
        .text_array(labels)
        .hover_info(HoverInfo::Text)
        .opacity(0.8);

    let hidden_axis = || {
        Axis::new()
            .show_line(false)
            .zero_line(false)
            .show_grid(false)
            .show_tick_labels(false)
    };

    let layout = Layout::new()
        .title(Title::with_text(title))
        .font(Font::new().size(12))
        .show_legend(false)
        .x_axis(hidden_axis())
        .y_axis(hidden_axis())
        .margin(Margin::new().left(40).right(40).bottom(85).top(100))
        .hover_mode(HoverMode::Closest)
        .plot_background_color(Rgb::new(248, 248, 248));

    let mut plot = Plot::new();
    plot.add_trace(edges);
    plot.add_trace(nodes);
    plot.set_layout(layout);
    plot
}

/// Terminal side effect: write the chart to an HTML file, or open it in the
/// default browser when no path is given.
pub fn present(plot: &Plot, out: Option<&Path>) -> Result<(), RenderError> {
    match out {
        Some(path) => {
            std::fs::write(path, plot.to_html()).map_err(|source| RenderError::Write {
                path: path.to_path_buf(),
                source,
            })
        }
        None => {
            plot.show();
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::layout::layered_positions;
    use crate::tree::node::OrgNode;

    fn sample() -> (TreeIndex, Vec<(f64, f64)>) {
        let tree = TreeIndex::from_root(&OrgNode::branch(
            "Root",
            vec![
                OrgNode::branch("A", vec![OrgNode::leaf("x"), OrgNode::leaf("y")]),
                OrgNode::branch("B", vec![OrgNode::leaf("z")]),
            ],
        ));
        let positions = layered_positions(&tree);
        (tree, positions)
    }

    #[test]
    fn test_root_reflected_to_top() {
        let (tree, positions) = sample();
        let coords = chart_coords(&tree, &positions);
        // Leaves sit at depth 2 = max depth; after reflection the root's y
        // is the maximum and the leaves' is the minimum.
        let root_y = coords.node_y[0];
        assert_eq!(root_y, 4.0);
        assert!(coords.node_y.iter().all(|&y| y <= root_y));
        assert_eq!(coords.node_y[2], 2.0);
    }

    #[test]
    fn test_edge_polylines_in_edge_order() {
        let (tree, positions) = sample();
        let coords = chart_coords(&tree, &positions);

        assert_eq!(coords.edge_x.len(), tree.edges.len() * 3);
        assert_eq!(coords.edge_y.len(), tree.edges.len() * 3);
        for (i, &(parent, child)) in tree.edges.iter().enumerate() {
            assert_eq!(coords.edge_x[i * 3], positions[parent].0);
            assert_eq!(coords.edge_x[i * 3 + 1], positions[child].0);
            assert!(coords.edge_x[i * 3 + 2].is_nan());
            assert!(coords.edge_y[i * 3 + 2].is_nan());
        }
    }

    #[test]
    fn test_figure_has_two_traces() {
        let (tree, positions) = sample();
        let plot = build_figure(&tree, &positions, "test");
        let json: serde_json::Value = serde_json::from_str(&plot.to_json()).unwrap();
        assert_eq!(json["data"].as_array().unwrap().len(), 2);
        assert_eq!(json["layout"]["title"]["text"], "test");
    }

    #[test]
    fn test_present_writes_html() {
        let (tree, positions) = sample();
        let plot = build_figure(&tree, &positions, "дерево");

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tree.html");
        present(&plot, Some(&path)).unwrap();

        let html = std::fs::read_to_string(&path).unwrap();
        assert!(html.contains("plotly"));
    }
}
