//! Gizmo definitions and the search-path library.
//!
//! A gizmo definition is the external file a gizmo instance depends on:
//! the user-facing knob defaults plus the interior node graph. Flattening
//! bakes that interior into a group so the definition file is no longer
//! needed on the receiving side.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::report::CollectError;

use super::graph::SceneGraph;
use super::knobs::Knobs;

/// Extension for gizmo definition files: `<class>.gizmo.json`.
pub const GIZMO_EXT: &str = "gizmo.json";

/// One gizmo definition, as stored in its definition file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GizmoDef {
    /// Class name instances refer to ("GradeMaster", "LensKit", ...)
    pub class: String,
    /// User-facing knob defaults
    #[serde(default)]
    pub knobs: Knobs,
    /// Input arrow count the gizmo exposes
    #[serde(default)]
    pub max_inputs: usize,
    /// Interior node network
    #[serde(default)]
    pub interior: SceneGraph,
}

/// Loads and caches gizmo definitions from a list of search directories.
pub struct GizmoLibrary {
    search_dirs: Vec<PathBuf>,
    cache: HashMap<String, GizmoDef>,
}

impl GizmoLibrary {
    pub fn new(search_dirs: Vec<PathBuf>) -> Self {
        Self {
            search_dirs,
            cache: HashMap::new(),
        }
    }

    /// Resolve the definition for `class`.
    ///
    /// `file_hint` is the instance's `gizmo_file` knob when present; it is
    /// tried as-is, then relative to each search directory. Without a hint
    /// the conventional `<class>.gizmo.json` name is searched.
    pub fn load(&mut self, class: &str, file_hint: Option<&str>) -> Result<&GizmoDef, CollectError> {
        if !self.cache.contains_key(class) {
            let path = self.find(class, file_hint).ok_or_else(|| {
                CollectError::GizmoDefinitionUnavailable {
                    class: class.to_string(),
                    reason: "definition file not found".to_string(),
                }
            })?;
            let def = read_def(class, &path)?;
            debug!("Loaded gizmo definition '{}' from {}", class, path.display());
            self.cache.insert(class.to_string(), def);
        }
        Ok(&self.cache[class])
    }

    fn find(&self, class: &str, file_hint: Option<&str>) -> Option<PathBuf> {
        if let Some(hint) = file_hint {
            let hinted = Path::new(hint);
            if hinted.is_file() {
                return Some(hinted.to_path_buf());
            }
            for dir in &self.search_dirs {
                let candidate = dir.join(hint);
                if candidate.is_file() {
                    return Some(candidate);
                }
            }
        }

        let conventional = format!("{}.{}", class, GIZMO_EXT);
        self.search_dirs
            .iter()
            .map(|dir| dir.join(&conventional))
            .find(|candidate| candidate.is_file())
    }
}

fn read_def(class: &str, path: &Path) -> Result<GizmoDef, CollectError> {
    let json = fs::read_to_string(path).map_err(|e| CollectError::GizmoDefinitionUnavailable {
        class: class.to_string(),
        reason: format!("read {}: {}", path.display(), e),
    })?;
    serde_json::from_str(&json).map_err(|e| CollectError::GizmoDefinitionUnavailable {
        class: class.to_string(),
        reason: format!("parse {}: {}", path.display(), e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::node::{Node, NodeKind};

    fn write_def(dir: &Path, class: &str) -> GizmoDef {
        let mut def = GizmoDef {
            class: class.to_string(),
            max_inputs: 1,
            ..Default::default()
        };
        def.interior.add(Node::new("Inner", NodeKind::Native("Blur".into())));

        let json = serde_json::to_string_pretty(&def).unwrap();
        fs::write(dir.join(format!("{}.{}", class, GIZMO_EXT)), json).unwrap();
        def
    }

    #[test]
    fn loads_by_conventional_name_and_caches() {
        let dir = tempfile::tempdir().unwrap();
        write_def(dir.path(), "LensKit");

        let mut library = GizmoLibrary::new(vec![dir.path().to_path_buf()]);
        let def = library.load("LensKit", None).unwrap();
        assert_eq!(def.class, "LensKit");
        assert_eq!(def.interior.len(), 1);

        // Removing the file must not matter once cached
        fs::remove_file(dir.path().join(format!("LensKit.{}", GIZMO_EXT))).unwrap();
        assert!(library.load("LensKit", None).is_ok());
    }

    #[test]
    fn hint_resolves_relative_to_search_dirs() {
        let dir = tempfile::tempdir().unwrap();
        write_def(dir.path(), "GradeMaster");

        let mut library = GizmoLibrary::new(vec![dir.path().to_path_buf()]);
        let hint = format!("GradeMaster.{}", GIZMO_EXT);
        assert!(library.load("GradeMaster", Some(&hint)).is_ok());
    }

    #[test]
    fn missing_definition_reports_class() {
        let dir = tempfile::tempdir().unwrap();
        let mut library = GizmoLibrary::new(vec![dir.path().to_path_buf()]);

        let err = library.load("Nonexistent", None).unwrap_err();
        match err {
            CollectError::GizmoDefinitionUnavailable { class, .. } => {
                assert_eq!(class, "Nonexistent");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
