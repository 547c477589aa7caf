//! Depth-first flattening of the hierarchy into an indexed graph.

use crate::tree::node::OrgNode;
use petgraph::graph::{DiGraph, NodeIndex};

/// One flattened node. Indices are assigned in pre-order visitation order,
/// are globally unique, and serve as the vertex identifiers; labels are
/// display text only and duplicates are never merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRecord {
    pub index: usize,
    pub label: String,
    pub depth: usize,
}

/// Flat view of a hierarchy: records in pre-order, a directed graph with one
/// vertex per record, and the parent->child edge list in insertion order.
#[derive(Debug, Default)]
pub struct TreeIndex {
    pub records: Vec<TreeRecord>,
    pub graph: DiGraph<String, ()>,
    pub edges: Vec<(usize, usize)>,
}

impl TreeIndex {
    /// Flatten a whole tree. The root becomes vertex 0 at depth 0 and the
    /// result is connected, with exactly `records.len() - 1` edges.
    pub fn from_root(root: &OrgNode) -> Self {
        Self::from_children(std::slice::from_ref(root))
    }

    /// Flatten a sibling sequence. The siblings land at depth 0 and each
    /// keeps its own subtree, so several siblings yield a forest.
    pub fn from_children(children: &[OrgNode]) -> Self {
        let mut index = Self::default();
        index.visit(children, None, 0);
        index
    }

    fn visit(&mut self, siblings: &[OrgNode], parent: Option<usize>, depth: usize) {
        for node in siblings {
            let number = self.records.len();
            self.records.push(TreeRecord {
                index: number,
                label: node.label().to_string(),
                depth,
            });
            let vertex = self.graph.add_node(node.label().to_string());
            debug_assert_eq!(vertex.index(), number);

            if let Some(parent) = parent {
                self.graph.add_edge(NodeIndex::new(parent), vertex, ());
                self.edges.push((parent, number));
            }

            if let OrgNode::Branch(_, children) = node {
                self.visit(children, Some(number), depth + 1);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
