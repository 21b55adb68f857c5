//! Scene walk
//!
//! Depth-first, document order. Hidden nodes prune their whole subtree, and
//! a node reachable from two selected roots is only visited once.

use std::collections::HashSet;

use crate::scene::{NodeId, SceneGraph};

/// A visible text layer waiting for its translation pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub node: NodeId,
    pub target: String,
    pub replace: bool,
}

pub struct SceneTraverser<'g> {
    graph: &'g dyn SceneGraph,
    visited: HashSet<NodeId>,
}

impl<'g> SceneTraverser<'g> {
    pub fn new(graph: &'g dyn SceneGraph) -> Self {
        Self {
            graph,
            visited: HashSet::new(),
        }
    }

    /// Walk `root` and hand every visible text layer to `on_leaf`.
    ///
    /// Returns the number of text layers found under this root. Visited nodes
    /// are remembered across calls on the same traverser.
    pub fn traverse(
        &mut self,
        root: &NodeId,
        target: &str,
        replace: bool,
        on_leaf: &mut dyn FnMut(WorkItem),
    ) -> usize {
        if !self.visited.insert(root.clone()) {
            return 0;
        }

        let Some(node) = self.graph.node(root) else {
            tracing::warn!("[Traverser] Node {} no longer exists; skipping", root);
            return 0;
        };

        if !node.visible {
            return 0;
        }

        if node.kind.is_container() {
            return node
                .children
                .iter()
                .map(|child| self.traverse(child, target, replace, on_leaf))
                .sum();
        }

        if node.kind.is_text() {
            on_leaf(WorkItem {
                node: node.id,
                target: target.to_string(),
                replace,
            });
            return 1;
        }

        0
    }

    /// Collect the work items of every root, in selection order.
    pub fn collect(&mut self, roots: &[NodeId], target: &str, replace: bool) -> Vec<WorkItem> {
        let mut items = Vec::new();
        for root in roots {
            self.traverse(root, target, replace, &mut |item| items.push(item));
        }
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::memory::MemorySceneGraph;
    use crate::scene::{FontName, NodeKind};

    fn font() -> FontName {
        FontName::new("Inter", "Regular")
    }

    #[test]
    fn test_visits_text_in_document_order() {
        let graph = MemorySceneGraph::new();
        let page = graph.page();
        let frame = graph.add_frame(&page, "Frame", (0.0, 0.0), (200.0, 200.0)).unwrap();
        let a = graph.add_text(&frame, "A", "one", font(), (0.0, 0.0)).unwrap();
        let group = graph
            .add_container(&frame, NodeKind::Group, "Group", (0.0, 0.0), (10.0, 10.0))
            .unwrap();
        let b = graph.add_text(&group, "B", "two", font(), (0.0, 0.0)).unwrap();
        graph.add_shape(&frame, NodeKind::Rectangle, "Box").unwrap();
        let c = graph.add_text(&frame, "C", "three", font(), (0.0, 0.0)).unwrap();

        let mut seen = Vec::new();
        let found = SceneTraverser::new(&graph).traverse(&frame, "ko", false, &mut |item| seen.push(item.node));

        assert_eq!(found, 3);
        assert_eq!(seen, vec![a, b, c]);
    }

    #[test]
    fn test_hidden_container_hides_visible_descendants() {
        let graph = MemorySceneGraph::new();
        let page = graph.page();
        let frame = graph.add_frame(&page, "Frame", (0.0, 0.0), (200.0, 200.0)).unwrap();
        let hidden = graph.add_frame(&frame, "Hidden", (0.0, 0.0), (100.0, 100.0)).unwrap();
        graph.add_text(&hidden, "Inside", "secret", font(), (0.0, 0.0)).unwrap();
        graph.set_visible(&hidden, false).unwrap();
        let shown = graph.add_text(&frame, "Shown", "hello", font(), (0.0, 0.0)).unwrap();

        let items = SceneTraverser::new(&graph).collect(&[frame], "ja", true);

        assert_eq!(
            items,
            vec![WorkItem {
                node: shown,
                target: "ja".to_string(),
                replace: true
            }]
        );
    }

    #[test]
    fn test_hidden_text_root() {
        let graph = MemorySceneGraph::new();
        let page = graph.page();
        let text = graph.add_text(&page, "T", "hello", font(), (0.0, 0.0)).unwrap();
        graph.set_visible(&text, false).unwrap();

        assert_eq!(SceneTraverser::new(&graph).traverse(&text, "ko", false, &mut |_| {}), 0);
    }

    #[test]
    fn test_overlapping_roots_visit_once() {
        let graph = MemorySceneGraph::new();
        let page = graph.page();
        let frame = graph.add_frame(&page, "Frame", (0.0, 0.0), (200.0, 200.0)).unwrap();
        let text = graph.add_text(&frame, "T", "hello", font(), (0.0, 0.0)).unwrap();

        let items = SceneTraverser::new(&graph).collect(&[frame, text.clone()], "ko", false);

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].node, text);
    }

    #[test]
    fn test_missing_root_is_skipped() {
        let graph = MemorySceneGraph::new();
        let ghost = NodeId::new("404:1");
        assert_eq!(SceneTraverser::new(&graph).traverse(&ghost, "ko", false, &mut |_| {}), 0);
    }
}
