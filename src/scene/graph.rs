//! Scene graph: insertion-ordered node collection with connection queries.
//!
//! Order matters: collection walks nodes in insertion order, which makes
//! destination folder allocation (and therefore the whole output tree)
//! deterministic across runs.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::node::Node;

/// Node graph keyed by UUID, preserving insertion order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneGraph {
    #[serde(default)]
    nodes: IndexMap<Uuid, Node>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self {
            nodes: IndexMap::new(),
        }
    }

    /// Insert a node at the end of the graph. Returns its UUID.
    pub fn add(&mut self, node: Node) -> Uuid {
        let uuid = node.uuid;
        self.nodes.insert(uuid, node);
        uuid
    }

    /// Insert a node at a specific position, shifting later nodes.
    pub fn insert_at(&mut self, index: usize, node: Node) -> Uuid {
        let uuid = node.uuid;
        self.nodes.shift_insert(index, uuid, node);
        uuid
    }

    /// Remove a node, preserving the order of the rest.
    pub fn remove(&mut self, uuid: Uuid) -> Option<Node> {
        self.nodes.shift_remove(&uuid)
    }

    pub fn get(&self, uuid: Uuid) -> Option<&Node> {
        self.nodes.get(&uuid)
    }

    pub fn get_mut(&mut self, uuid: Uuid) -> Option<&mut Node> {
        self.nodes.get_mut(&uuid)
    }

    /// Position of a node in the graph's order.
    pub fn index_of(&self, uuid: Uuid) -> Option<usize> {
        self.nodes.get_index_of(&uuid)
    }

    /// First node with the given name, if any.
    pub fn by_name(&self, name: &str) -> Option<&Node> {
        self.nodes.values().find(|n| n.name == name)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn nodes_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.nodes.values_mut()
    }

    /// Snapshot of node UUIDs, for loops that mutate the graph while walking.
    pub fn uuids(&self) -> Vec<Uuid> {
        self.nodes.keys().copied().collect()
    }

    /// Edges pointing at `target`: (downstream node uuid, input index).
    pub fn downstream_of(&self, target: Uuid) -> Vec<(Uuid, usize)> {
        let mut edges = Vec::new();
        for node in self.nodes.values() {
            for (index, input) in node.inputs.iter().enumerate() {
                if *input == Some(target) {
                    edges.push((node.uuid, index));
                }
            }
        }
        edges
    }

    /// Repoint every input referencing `from` to `to`. Returns edges rewired.
    pub fn rewire(&mut self, from: Uuid, to: Uuid) -> usize {
        let mut count = 0;
        for node in self.nodes.values_mut() {
            for input in node.inputs.iter_mut() {
                if *input == Some(from) {
                    *input = Some(to);
                    count += 1;
                }
            }
        }
        count
    }

    /// Visit every node depth-first, descending into group interiors.
    pub fn visit<F: FnMut(&Node)>(&self, f: &mut F) {
        for node in self.nodes.values() {
            if let Some(interior) = &node.interior {
                interior.visit(f);
            }
            f(node);
        }
    }

    /// Total node count including group interiors.
    pub fn count_recursive(&self) -> usize {
        let mut count = 0;
        self.visit(&mut |_| count += 1);
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::node::NodeKind;

    fn native(name: &str) -> Node {
        Node::new(name, NodeKind::Native("Blur".into()))
    }

    #[test]
    fn insertion_order_survives_remove_and_insert_at() {
        let mut graph = SceneGraph::new();
        let a = graph.add(native("A"));
        let b = graph.add(native("B"));
        let c = graph.add(native("C"));

        let idx = graph.index_of(b).unwrap();
        graph.remove(b);
        let replacement = graph.insert_at(idx, native("B2"));

        let order: Vec<Uuid> = graph.uuids();
        assert_eq!(order, vec![a, replacement, c]);
    }

    #[test]
    fn rewire_repoints_all_edges() {
        let mut graph = SceneGraph::new();
        let old = graph.add(native("Old"));
        let new = graph.add(native("New"));

        let mut down = native("Down");
        down.set_input(0, Some(old));
        down.set_input(1, Some(old));
        let down = graph.add(down);

        assert_eq!(graph.downstream_of(old).len(), 2);
        assert_eq!(graph.rewire(old, new), 2);
        assert_eq!(graph.downstream_of(old).len(), 0);
        assert_eq!(
            graph.downstream_of(new),
            vec![(down, 0), (down, 1)]
        );
    }

    #[test]
    fn visit_descends_into_interiors() {
        let mut interior = SceneGraph::new();
        interior.add(native("Inner1"));
        interior.add(native("Inner2"));

        let mut group = Node::new("Group1", NodeKind::Group);
        group.interior = Some(interior);

        let mut graph = SceneGraph::new();
        graph.add(group);
        graph.add(native("Top"));

        assert_eq!(graph.count_recursive(), 4);
    }
}
