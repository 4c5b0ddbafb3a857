use crate::types::registry::TypeRegistry;

use super::ast::{Node, NodeWrapper};

/// Visits `node` and everything below it in pre-order, passing the depth along.
pub fn walk<'a, F>(node: &'a dyn Node, depth: usize, visitor: &mut F)
where
    F: FnMut(&'a dyn Node, usize),
{
    visitor(node, depth);
    for child in node.children() {
        walk(child, depth + 1, visitor);
    }
}

pub fn count_nodes(nodes: &[NodeWrapper]) -> usize {
    let mut count = 0;
    for node in nodes {
        walk(&**node, 0, &mut |_, _| count += 1);
    }
    count
}

/// Renders the tree one node per line, indented by depth, with resolved types.
pub fn dump(nodes: &[NodeWrapper], types: &TypeRegistry) -> String {
    let mut out = String::new();
    for node in nodes {
        walk(&**node, 0, &mut |node, depth| {
            out.push_str(&"  ".repeat(depth));
            out.push_str(&format!("{:?}", node.get_node_type()));
            if let Some(ty) = node.get_type() {
                out.push_str(&format!(": {}", types.get_name(ty)));
            }
            out.push('\n');
        });
    }
    out
}
