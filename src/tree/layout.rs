//! Layered tidy tree layout.
//!
//! Reingold-Tilford style placement: a vertex's layer is its depth, leaves
//! take consecutive x slots in visitation order, and an inner vertex is
//! centered between its first and last child. Sibling order never changes,
//! so a tree topology draws without edge crossings.

use crate::tree::flatten::TreeIndex;

/// Compute a 2D position per vertex, indexed by record index. The y axis
/// grows downward from the root layer at 0; the renderer reflects it.
pub fn layered_positions(tree: &TreeIndex) -> Vec<(f64, f64)> {
    let n = tree.records.len();
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut has_parent = vec![false; n];
    for &(parent, child) in &tree.edges {
        children[parent].push(child);
        has_parent[child] = true;
    }

    let mut positions = vec![(0.0, 0.0); n];
    let mut next_slot = 0usize;
    for root in 0..n {
        if !has_parent[root] {
            place(root, &children, tree, &mut positions, &mut next_slot);
        }
    }
    positions
}

/// Place a subtree and return the subtree root's x coordinate.
fn place(
    node: usize,
    children: &[Vec<usize>],
    tree: &TreeIndex,
    positions: &mut [(f64, f64)],
    next_slot: &mut usize,
) -> f64 {
    let y = tree.records[node].depth as f64;
    let kids = &children[node];

    let x = if kids.is_empty() {
        let slot = *next_slot as f64;
        *next_slot += 1;
        slot
    } else {
        let mut first = 0.0;
        let mut last = 0.0;
        for (i, &child) in kids.iter().enumerate() {
            let child_x = place(child, children, tree, positions, next_slot);
            if i == 0 {
                first = child_x;
            }
            last = child_x;
        }
        (first + last) / 2.0
    };

    positions[node] = (x, y);
    x
}
