//! Scene model: knobs, nodes, graph, gizmo definitions.
//!
//! The scene is an owned, serializable copy of the host's graph. Loading a
//! scene file detaches the tool from any live application: collection and
//! flattening mutate this staged copy only, and the rewritten scene is
//! written to the destination. The original file is never touched.

pub mod gizmo;
pub mod graph;
pub mod keys;
pub mod knobs;
pub mod node;

pub use gizmo::{GizmoDef, GizmoLibrary};
pub use graph::SceneGraph;
pub use knobs::{KnobValue, Knobs};
pub use node::{Node, NodeKind};

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::report::CollectError;
use keys::{K_FIRST, K_LAST, K_ROOT_NAME};

/// Top-level scene: root knobs plus the node graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scene {
    /// Root knobs (scene path, frame range, fps).
    #[serde(default)]
    pub knobs: Knobs,

    /// Top-level node graph.
    #[serde(default)]
    pub graph: SceneGraph,
}

impl Scene {
    pub fn new(name: impl Into<String>) -> Self {
        let mut scene = Self::default();
        scene.knobs.set(K_ROOT_NAME, KnobValue::Str(name.into()));
        scene
    }

    /// Scene path as stored on the root (the host's `root.name`).
    pub fn name(&self) -> &str {
        self.knobs.get_str(K_ROOT_NAME).unwrap_or("")
    }

    /// Basename of the scene path, used when saving into the destination.
    pub fn file_name(&self) -> String {
        Path::new(self.name())
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "untitled.json".to_string())
    }

    /// Root frame range; (1, 1) when the scene declares none.
    pub fn frame_range(&self) -> (i32, i32) {
        let first = self.knobs.get_i32_or(K_FIRST, 1);
        let last = self.knobs.get_i32_or(K_LAST, first);
        (first, last)
    }

    /// Load a scene from a JSON file.
    ///
    /// The root `name` knob is set to the load path when the file itself
    /// does not carry one, so `file_name()` always resolves.
    pub fn from_json<P: AsRef<Path>>(path: P) -> Result<Self, CollectError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .map_err(|e| CollectError::Scene(format!("read {}: {}", path.display(), e)))?;

        let mut scene: Scene = serde_json::from_str(&json)
            .map_err(|e| CollectError::Scene(format!("parse {}: {}", path.display(), e)))?;

        if scene.knobs.get_str(K_ROOT_NAME).is_none_or(str::is_empty) {
            scene
                .knobs
                .set(K_ROOT_NAME, KnobValue::Str(path.to_string_lossy().into_owned()));
        }
        Ok(scene)
    }

    /// Serialize the scene to a JSON file.
    pub fn to_json<P: AsRef<Path>>(&self, path: P) -> Result<(), CollectError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| CollectError::Scene(format!("serialize scene: {}", e)))?;

        fs::write(path, json).map_err(|e| CollectError::DestinationWriteFailure {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_falls_back_when_unnamed() {
        let scene = Scene::default();
        assert_eq!(scene.file_name(), "untitled.json");

        let scene = Scene::new("/shows/abc/shot010_comp_v003.json");
        assert_eq!(scene.file_name(), "shot010_comp_v003.json");
    }

    #[test]
    fn frame_range_defaults_to_single_frame() {
        let scene = Scene::default();
        assert_eq!(scene.frame_range(), (1, 1));

        let mut scene = Scene::default();
        scene.knobs.set(K_FIRST, KnobValue::Int(1001));
        scene.knobs.set(K_LAST, KnobValue::Int(1010));
        assert_eq!(scene.frame_range(), (1001, 1010));
    }

    #[test]
    fn load_sets_root_name_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shot.json");

        let scene = Scene::default();
        scene.to_json(&path).unwrap();

        let loaded = Scene::from_json(&path).unwrap();
        assert_eq!(loaded.file_name(), "shot.json");
    }
}
