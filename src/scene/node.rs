//! Node: one entry in the scene graph.
//!
//! A node is identified by UUID, carries its knobs, and references its
//! upstream nodes through an ordered input list (index = input arrow number).
//! Group nodes and gizmo definitions own an interior graph of their own.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::graph::SceneGraph;
use super::keys::{K_DISABLE, K_FILE, K_FIRST, K_LAST, K_RENDER};
use super::knobs::Knobs;

/// Node kind: native class, gizmo instance, or self-contained group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Built-in node class ("Read", "Blur", "Merge", ...)
    Native(String),
    /// Custom node backed by an external gizmo definition file
    Gizmo(String),
    /// Native group whose interior is carried inside the scene itself
    Group,
}

impl NodeKind {
    /// Class name as the host would display it.
    pub fn class(&self) -> &str {
        match self {
            NodeKind::Native(class) | NodeKind::Gizmo(class) => class,
            NodeKind::Group => "Group",
        }
    }
}

/// Single node in the scene graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub uuid: Uuid,
    pub name: String,
    pub kind: NodeKind,
    #[serde(default)]
    pub knobs: Knobs,
    /// Ordered upstream connections; None = unconnected input arrow.
    #[serde(default)]
    pub inputs: Vec<Option<Uuid>>,
    /// Interior graph for Group nodes (and gizmo definitions).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interior: Option<SceneGraph>,
}

impl Node {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.into(),
            kind,
            knobs: Knobs::new(),
            inputs: Vec::new(),
            interior: None,
        }
    }

    pub fn is_gizmo(&self) -> bool {
        matches!(self.kind, NodeKind::Gizmo(_))
    }

    pub fn is_disabled(&self) -> bool {
        self.knobs.get_bool_or(K_DISABLE, false)
    }

    /// Output writers carry a `Render` knob; their file path is where
    /// renders land, not footage to deliver.
    pub fn is_render_output(&self) -> bool {
        self.knobs.contains(K_RENDER)
    }

    /// Value of the `file` knob, if present and non-empty.
    pub fn file_knob(&self) -> Option<&str> {
        self.knobs.get_str(K_FILE).filter(|s| !s.is_empty())
    }

    /// Declared frame range (`first`/`last` knobs), if the node has one.
    pub fn frame_range(&self) -> Option<(i32, i32)> {
        match (self.knobs.get_i32(K_FIRST), self.knobs.get_i32(K_LAST)) {
            (Some(first), Some(last)) => Some((first, last)),
            _ => None,
        }
    }

    /// Connect input arrow `index` to `source`, growing the input list as needed.
    pub fn set_input(&mut self, index: usize, source: Option<Uuid>) {
        if self.inputs.len() <= index {
            self.inputs.resize(index + 1, None);
        }
        self.inputs[index] = source;
    }

    /// Number of connected (non-None) inputs.
    pub fn connected_inputs(&self) -> usize {
        self.inputs.iter().filter(|i| i.is_some()).count()
    }
}
