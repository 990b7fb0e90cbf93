//! Pure functions collecting the nodes along each XPath axis.
//!
//! Every collector returns nodes in axis order: document order for forward axes,
//! nearest-first for reverse axes. Positional predicates depend on it.

use crate::ast::Axis;
use crate::datasource::{DataSourceNode, NodeType};

/// Collects the nodes reachable from `node` along `axis`.
pub fn collect<'a, N: DataSourceNode<'a>>(axis: Axis, node: N) -> Vec<N> {
    let mut out = Vec::new();
    match axis {
        Axis::Child => out.extend(node.children()),
        Axis::Attribute => out.extend(node.attributes()),
        Axis::SelfAxis => out.push(node),
        Axis::Parent => out.extend(node.parent()),
        Axis::Descendant => collect_descendants(node, &mut out),
        Axis::DescendantOrSelf => {
            out.push(node);
            collect_descendants(node, &mut out);
        }
        Axis::Ancestor => collect_ancestors(node, &mut out),
        Axis::AncestorOrSelf => {
            out.push(node);
            collect_ancestors(node, &mut out);
        }
        Axis::FollowingSibling => collect_following_siblings(node, &mut out),
        Axis::PrecedingSibling => collect_preceding_siblings(node, &mut out),
        Axis::Following => collect_following(node, &mut out),
        Axis::Preceding => collect_preceding(node, &mut out),
    }
    out
}

/// Pre-order walk, so descendants come out in document order.
pub fn collect_descendants<'a, N: DataSourceNode<'a>>(node: N, out: &mut Vec<N>) {
    let mut stack: Vec<N> = node.children().collect();
    stack.reverse();
    while let Some(current) = stack.pop() {
        out.push(current);
        let first = stack.len();
        stack.extend(current.children());
        stack[first..].reverse();
    }
}

fn collect_ancestors<'a, N: DataSourceNode<'a>>(node: N, out: &mut Vec<N>) {
    let mut current = node.parent();
    while let Some(p) = current {
        out.push(p);
        current = p.parent();
    }
}

fn is_attribute<'a, N: DataSourceNode<'a>>(node: N) -> bool {
    node.node_type() == NodeType::Attribute
}

fn collect_following_siblings<'a, N: DataSourceNode<'a>>(node: N, out: &mut Vec<N>) {
    if is_attribute(node) {
        return;
    }
    if let Some(parent) = node.parent() {
        out.extend(parent.children().skip_while(|s| *s != node).skip(1));
    }
}

fn collect_preceding_siblings<'a, N: DataSourceNode<'a>>(node: N, out: &mut Vec<N>) {
    if is_attribute(node) {
        return;
    }
    if let Some(parent) = node.parent() {
        let mut siblings: Vec<N> = parent.children().take_while(|s| *s != node).collect();
        siblings.reverse();
        out.extend(siblings);
    }
}

fn collect_following<'a, N: DataSourceNode<'a>>(node: N, out: &mut Vec<N>) {
    let mut current = node;
    // The following nodes of an attribute start with its element's content.
    if is_attribute(node) {
        if let Some(owner) = node.parent() {
            collect_descendants(owner, out);
            current = owner;
        }
    }
    while let Some(parent) = current.parent() {
        for sibling in parent.children().skip_while(|s| *s != current).skip(1) {
            out.push(sibling);
            collect_descendants(sibling, out);
        }
        current = parent;
    }
}

fn collect_preceding<'a, N: DataSourceNode<'a>>(node: N, out: &mut Vec<N>) {
    let mut current = match (is_attribute(node), node.parent()) {
        (true, Some(owner)) => owner,
        _ => node,
    };
    while let Some(parent) = current.parent() {
        for sibling in parent.children().take_while(|s| *s != current) {
            out.push(sibling);
            collect_descendants(sibling, out);
        }
        current = parent;
    }
    // Ancestors never appear here, so sorting descending yields nearest-first.
    out.sort_unstable_by(|a, b| b.cmp(a));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasource::mock::create_test_tree;

    fn ids<'a>(nodes: Vec<crate::datasource::mock::MockNode<'a>>) -> Vec<usize> {
        nodes.into_iter().map(|n| n.id).collect()
    }

    #[test]
    fn test_collect_child() {
        let tree = create_test_tree();
        assert_eq!(ids(collect(Axis::Child, tree.node(1))), vec![2, 6, 7, 10, 11]);
        assert_eq!(ids(collect(Axis::Child, tree.node(5))), Vec::<usize>::new());
    }

    #[test]
    fn test_collect_descendant_in_document_order() {
        let tree = create_test_tree();
        assert_eq!(
            ids(collect(Axis::Descendant, tree.root())),
            vec![1, 2, 5, 6, 7, 9, 10, 11, 12]
        );
        assert_eq!(
            ids(collect(Axis::DescendantOrSelf, tree.node(7))),
            vec![7, 9]
        );
    }

    #[test]
    fn test_collect_attributes() {
        let tree = create_test_tree();
        assert_eq!(ids(collect(Axis::Attribute, tree.node(2))), vec![3, 4]);
        assert_eq!(ids(collect(Axis::Attribute, tree.node(5))), Vec::<usize>::new());
    }

    #[test]
    fn test_collect_ancestor_nearest_first() {
        let tree = create_test_tree();
        assert_eq!(ids(collect(Axis::Ancestor, tree.node(5))), vec![2, 1, 0]);
        assert_eq!(
            ids(collect(Axis::AncestorOrSelf, tree.node(8))),
            vec![8, 7, 1, 0]
        );
    }

    #[test]
    fn test_collect_siblings() {
        let tree = create_test_tree();
        assert_eq!(
            ids(collect(Axis::FollowingSibling, tree.node(2))),
            vec![6, 7, 10, 11]
        );
        assert_eq!(
            ids(collect(Axis::PrecedingSibling, tree.node(11))),
            vec![10, 7, 6, 2]
        );
        // Attributes have no siblings.
        assert!(collect(Axis::FollowingSibling, tree.node(3)).is_empty());
    }

    #[test]
    fn test_collect_following_and_preceding() {
        let tree = create_test_tree();
        assert_eq!(
            ids(collect(Axis::Following, tree.node(5))),
            vec![6, 7, 9, 10, 11, 12]
        );
        assert_eq!(ids(collect(Axis::Preceding, tree.node(7))), vec![6, 5, 2]);
        // From an attribute, following starts inside its owner element.
        assert_eq!(
            ids(collect(Axis::Following, tree.node(8))),
            vec![9, 10, 11, 12]
        );
    }
}
