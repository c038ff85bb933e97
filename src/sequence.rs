//! File reference classification and frame-sequence expansion.
//!
//! A `file` knob value is one of three things:
//! - a video container (always a single file, even with a frame range),
//! - a frame sequence (basename carries a padding token: `####`, `%04d`, `%d`),
//! - a plain single file.
//!
//! Padding tokens follow the conventions compositing hosts emit. The token
//! lives in the basename only; digits in directory names never count.

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

/// Extensions treated as video containers (copied whole, never expanded).
pub const VIDEO_EXTS: &[&str] = &[
    "mov", "avi", "mp4", "mpeg", "mpg", "r3d", "mxf", "mkv", "flv", "webm",
];

/// Padding token: printf style (%d, %04d) or hash style (####).
static PAD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(%0?\d*d|#+)").unwrap());

/// What a file knob value denotes.
#[derive(Debug, Clone, PartialEq)]
pub enum RefKind {
    Single,
    Video,
    Sequence { padding: usize },
}

/// Parsed file reference.
#[derive(Debug, Clone)]
pub struct FileRef {
    path: PathBuf,
    kind: RefKind,
}

impl FileRef {
    pub fn parse(value: &str) -> Self {
        let path = PathBuf::from(value);

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        if let Some(ext) = &ext {
            if VIDEO_EXTS.contains(&ext.as_str()) {
                return Self {
                    path,
                    kind: RefKind::Video,
                };
            }
        }

        let kind = match path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|name| PAD_RE.find(name))
        {
            Some(token) => RefKind::Sequence {
                padding: token_padding(token.as_str()),
            },
            None => RefKind::Single,
        };

        Self { path, kind }
    }

    pub fn kind(&self) -> &RefKind {
        &self.kind
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self.kind, RefKind::Sequence { .. })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Basename as written in the knob, padding token included.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Concrete path for one frame: the padding token replaced by the
    /// zero-padded frame number. Non-sequences return the path unchanged.
    pub fn frame_path(&self, frame: i32) -> PathBuf {
        match self.kind {
            RefKind::Sequence { padding } => {
                let name = self.file_name();
                let frame_str = format!("{:0width$}", frame, width = padding);
                let framed = PAD_RE.replace(&name, frame_str.as_str()).into_owned();
                self.path.with_file_name(framed)
            }
            _ => self.path.clone(),
        }
    }

    /// All concrete frame paths for an inclusive range.
    pub fn expand(&self, first: i32, last: i32) -> Vec<PathBuf> {
        (first..=last).map(|f| self.frame_path(f)).collect()
    }

    /// Scan the source directory for frames matching the pattern.
    ///
    /// Fallback for sequence nodes that declare no `first`/`last` knobs.
    /// Returns None when the reference is not a sequence or nothing matches.
    pub fn discover_range(&self) -> Option<(i32, i32)> {
        if !self.is_sequence() {
            return None;
        }

        let name = self.file_name();
        let token = PAD_RE.find(&name)?;
        let prefix = &name[..token.start()];
        let suffix = &name[token.end()..];

        let pattern = self
            .path
            .with_file_name(format!("{}*{}", prefix, suffix))
            .to_string_lossy()
            .into_owned();

        let mut range: Option<(i32, i32)> = None;
        for entry in glob::glob(&pattern).ok()?.flatten() {
            let Some(fname) = entry.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let Some(middle) = fname
                .strip_prefix(prefix)
                .and_then(|rest| rest.strip_suffix(suffix))
            else {
                continue;
            };
            let Ok(frame) = middle.parse::<i32>() else {
                continue;
            };
            range = Some(match range {
                Some((min, max)) => (min.min(frame), max.max(frame)),
                None => (frame, frame),
            });
        }
        range
    }
}

/// Padding width of a token: `####` = 4, `%04d` = 4, `%d` = 1.
fn token_padding(token: &str) -> usize {
    if let Some(inner) = token.strip_prefix('%').and_then(|t| t.strip_suffix('d')) {
        inner.parse::<usize>().unwrap_or(1)
    } else {
        token.len()
    }
}
