//! Helpers shared by the core integration suites.

use std::collections::{BTreeSet, HashMap};

use bkindex_core::{BkTree, NodeRef};

/// Checks the structural invariants of `tree`, returning the first violation.
pub fn check_invariants(tree: &BkTree) -> Result<(), String> {
    let metric = tree.metric();
    let mut seen = BTreeSet::new();
    let mut depths = HashMap::new();
    let mut stack: Vec<NodeRef<'_>> = vec![tree.root_node()];

    if tree.root_node().depth() != 0 {
        return Err("root depth must be 0".to_owned());
    }

    while let Some(node) = stack.pop() {
        if !seen.insert(node.label()) {
            return Err(format!("label `{}` appears twice", node.label()));
        }
        depths.insert(node.label(), node.depth());
        for (distance, child) in node.children() {
            let actual = metric.distance(node.label(), child.label());
            if actual != distance {
                return Err(format!(
                    "edge {} -> {} keyed {distance} but distance is {actual}",
                    node.label(),
                    child.label()
                ));
            }
            if child.depth() != node.depth() + 1 {
                return Err(format!("child `{}` has depth {}", child.label(), child.depth()));
            }
            stack.push(child);
        }
    }

    if seen.len() != tree.num_of_words() {
        return Err(format!(
            "{} nodes reachable but {} words indexed",
            seen.len(),
            tree.num_of_words()
        ));
    }
    if depths.values().copied().max() != Some(tree.tree_depth()) {
        return Err("tree depth does not equal the deepest node".to_owned());
    }
    Ok(())
}

/// Linear scan over every indexed word.
pub fn brute_force<'t>(tree: &'t BkTree, query: &str, max_distance: usize) -> BTreeSet<&'t str> {
    tree.words()
        .filter(|word| tree.metric().distance(query, word) <= max_distance)
        .collect()
}
