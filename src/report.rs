//! Run-level error kinds and the end-of-run report.
//!
//! Per-file and per-node failures are collected, never thrown: a missing
//! frame or an unloadable gizmo must not abort the delivery. Only
//! destination write failures (disk full, permissions) are fatal, since
//! continuing past one would produce a silently incomplete delivery.

use std::path::PathBuf;

use log::warn;

/// Collection/flattening errors.
#[derive(Debug)]
pub enum CollectError {
    /// Referenced source file does not exist on disk
    MissingSourceFile(PathBuf),
    /// Gizmo definition could not be found or parsed
    GizmoDefinitionUnavailable { class: String, reason: String },
    /// Destination could not be written (fatal for the run)
    DestinationWriteFailure { path: PathBuf, reason: String },
    /// Two distinct nodes mapped to the same footage folder
    NameCollision { name: String, folder: String },
    /// Scene file could not be read or parsed
    Scene(String),
}

impl std::fmt::Display for CollectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CollectError::MissingSourceFile(path) => {
                write!(f, "missing source file: {}", path.display())
            }
            CollectError::GizmoDefinitionUnavailable { class, reason } => {
                write!(f, "gizmo definition unavailable for '{}': {}", class, reason)
            }
            CollectError::DestinationWriteFailure { path, reason } => {
                write!(f, "destination write failed: {}: {}", path.display(), reason)
            }
            CollectError::NameCollision { name, folder } => {
                write!(f, "node name '{}' already taken, routed to '{}'", name, folder)
            }
            CollectError::Scene(reason) => write!(f, "scene error: {}", reason),
        }
    }
}

impl std::error::Error for CollectError {}

impl CollectError {
    /// Fatal errors abort the remaining copy steps for the run.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            CollectError::DestinationWriteFailure { .. } | CollectError::Scene(_)
        )
    }
}

/// Accumulated counts and issues for one collection run.
#[derive(Debug, Default)]
pub struct RunReport {
    pub nodes_visited: usize,
    pub files_copied: usize,
    pub bytes_copied: u64,
    pub gizmos_flattened: usize,
    pub gizmos_skipped: usize,
    pub errors: Vec<CollectError>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a non-fatal issue; logged immediately, listed in the summary.
    pub fn record(&mut self, error: CollectError) {
        warn!("{}", error);
        self.errors.push(error);
    }

    pub fn missing_sources(&self) -> usize {
        self.errors
            .iter()
            .filter(|e| matches!(e, CollectError::MissingSourceFile(_)))
            .count()
    }

    pub fn name_collisions(&self) -> usize {
        self.errors
            .iter()
            .filter(|e| matches!(e, CollectError::NameCollision { .. }))
            .count()
    }

    pub fn has_issues(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Human-readable end-of-run summary, printed by the CLI.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        out.push_str("Collect summary\n");
        out.push_str(&format!("  nodes visited:    {}\n", self.nodes_visited));
        out.push_str(&format!(
            "  files copied:     {} ({} bytes)\n",
            self.files_copied, self.bytes_copied
        ));
        out.push_str(&format!("  gizmos flattened: {}\n", self.gizmos_flattened));
        out.push_str(&format!("  gizmos skipped:   {}\n", self.gizmos_skipped));
        out.push_str(&format!("  missing sources:  {}\n", self.missing_sources()));
        out.push_str(&format!("  name collisions:  {}\n", self.name_collisions()));

        if self.has_issues() {
            out.push_str("Issues:\n");
            for error in &self.errors {
                out.push_str(&format!("  - {}\n", error));
            }
        }
        out
    }
}
