//! Asset collection: copy referenced footage and rewrite file knobs.
//!
//! Walks every node (group interiors included), copies each resolved file
//! into `<dest>/footage/<node-name>/`, then points the node's `file` knob at
//! the new location relative to the saved scene. Missing sources are
//! recorded and skipped; destination write failures abort the run.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::progress::CopyProgress;
use crate::report::{CollectError, RunReport};
use crate::scene::keys::K_FILE;
use crate::scene::knobs::KnobValue;
use crate::scene::node::Node;
use crate::scene::{Scene, SceneGraph};
use crate::sequence::{FileRef, RefKind};

/// Footage subdirectory under the destination root.
pub const FOOTAGE_DIR: &str = "footage";

/// Copies footage for one destination root.
pub struct Collector {
    dest_root: PathBuf,
    footage_root: PathBuf,
    /// Times each node name has been allocated a folder, for disambiguation.
    folders: HashMap<String, usize>,
    progress: Option<CopyProgress>,
}

impl Collector {
    /// Prepare `<dest>/` and `<dest>/footage/`, creating them as needed.
    pub fn new(dest_root: impl Into<PathBuf>) -> Result<Self, CollectError> {
        let dest_root = dest_root.into();
        let footage_root = dest_root.join(FOOTAGE_DIR);
        fs::create_dir_all(&footage_root).map_err(|e| CollectError::DestinationWriteFailure {
            path: footage_root.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            dest_root,
            footage_root,
            folders: HashMap::new(),
            progress: None,
        })
    }

    pub fn with_progress(mut self, progress: CopyProgress) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Copy all referenced footage and rewrite the staged scene's file knobs.
    ///
    /// Best-effort per node/file; returns Err only on fatal destination
    /// failures, with whatever was copied so far left on disk.
    pub fn collect(&mut self, scene: &mut Scene, report: &mut RunReport) -> Result<(), CollectError> {
        let default_range = scene.frame_range();
        self.collect_graph(&mut scene.graph, default_range, report)?;
        if let Some(progress) = &self.progress {
            progress.finish();
        }
        Ok(())
    }

    fn collect_graph(
        &mut self,
        graph: &mut SceneGraph,
        default_range: (i32, i32),
        report: &mut RunReport,
    ) -> Result<(), CollectError> {
        for node in graph.nodes_mut() {
            report.nodes_visited += 1;
            if let Some(interior) = node.interior.as_mut() {
                self.collect_graph(interior, default_range, report)?;
            }
            self.collect_node(node, default_range, report)?;
        }
        Ok(())
    }

    fn collect_node(
        &mut self,
        node: &mut Node,
        default_range: (i32, i32),
        report: &mut RunReport,
    ) -> Result<(), CollectError> {
        if node.is_disabled() {
            debug!("Skipping disabled node '{}'", node.name);
            return Ok(());
        }
        if node.is_render_output() {
            debug!("Skipping render output node '{}'", node.name);
            return Ok(());
        }
        let Some(value) = node.file_knob() else {
            return Ok(());
        };

        let fref = FileRef::parse(value);
        let folder = self.folder_for(&node.name, report);
        let node_dir = self.footage_root.join(&folder);
        fs::create_dir_all(&node_dir).map_err(|e| CollectError::DestinationWriteFailure {
            path: node_dir.clone(),
            reason: e.to_string(),
        })?;

        match fref.kind() {
            RefKind::Single | RefKind::Video => {
                let dst = node_dir.join(fref.file_name());
                self.copy_one(fref.path(), &dst, report)?;
            }
            RefKind::Sequence { .. } => {
                let (first, last) = resolve_range(node, &fref, default_range);
                info!(
                    "Collecting sequence {} (frames {}~{})",
                    fref.file_name(),
                    first,
                    last
                );
                for src in fref.expand(first, last) {
                    let Some(name) = src.file_name() else { continue };
                    let dst = node_dir.join(name);
                    self.copy_one(&src, &dst, report)?;
                }
            }
        }

        // Point the staged scene at the collected copy, relative to the
        // scene file saved in the destination root. Padding token kept.
        let new_value = format!("{}/{}/{}", FOOTAGE_DIR, folder, fref.file_name());
        debug!("Node '{}' file knob -> {}", node.name, new_value);
        node.knobs.set(K_FILE, KnobValue::Str(new_value));
        Ok(())
    }

    /// Copy a single file; a missing source is recorded, not fatal.
    fn copy_one(&mut self, src: &Path, dst: &Path, report: &mut RunReport) -> Result<(), CollectError> {
        if !src.is_file() {
            report.record(CollectError::MissingSourceFile(src.to_path_buf()));
            return Ok(());
        }

        match fs::copy(src, dst) {
            Ok(bytes) => {
                debug!("[copy] {} -> {}", src.display(), dst.display());
                report.files_copied += 1;
                report.bytes_copied += bytes;
                if let Some(progress) = &self.progress {
                    let name = dst.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
                    progress.copied(&name);
                }
                Ok(())
            }
            Err(e) => Err(CollectError::DestinationWriteFailure {
                path: dst.to_path_buf(),
                reason: e.to_string(),
            }),
        }
    }

    /// Footage folder for a node name, disambiguated in first-encountered
    /// order: second "Read1" becomes "Read1_2", third "Read1_3", ...
    fn folder_for(&mut self, name: &str, report: &mut RunReport) -> String {
        let count = self.folders.entry(name.to_string()).or_insert(0);
        *count += 1;
        if *count == 1 {
            name.to_string()
        } else {
            let folder = format!("{}_{}", name, *count);
            report.record(CollectError::NameCollision {
                name: name.to_string(),
                folder: folder.clone(),
            });
            folder
        }
    }

    /// Write the rewritten scene into the destination root.
    pub fn finish(&self, scene: &Scene) -> Result<PathBuf, CollectError> {
        let out = self.dest_root.join(scene.file_name());
        scene.to_json(&out)?;
        info!("Saved collected scene to {}", out.display());
        Ok(out)
    }
}

/// Frame range for a sequence node: its own knobs, else a disk scan,
/// else the scene root range.
fn resolve_range(node: &Node, fref: &FileRef, default_range: (i32, i32)) -> (i32, i32) {
    node.frame_range()
        .or_else(|| fref.discover_range())
        .unwrap_or(default_range)
}

/// Number of file copies a collection run will attempt, for progress sizing.
pub fn planned_copies(scene: &Scene) -> usize {
    let default_range = scene.frame_range();
    let mut total = 0usize;
    scene.graph.visit(&mut |node| {
        if node.is_disabled() || node.is_render_output() {
            return;
        }
        let Some(value) = node.file_knob() else { return };
        let fref = FileRef::parse(value);
        total += match fref.kind() {
            RefKind::Single | RefKind::Video => 1,
            RefKind::Sequence { .. } => {
                let (first, last) = resolve_range(node, &fref, default_range);
                (last - first + 1).max(0) as usize
            }
        };
    });
    total
}
