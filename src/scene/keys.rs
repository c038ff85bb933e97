//! Knob name constants for Knobs access.
//!
//! Avoid string typos, enable IDE autocomplete.
//! Usage: `node.knobs.get_i32(K_FIRST)`

// === File references ===
/// File path (may contain a frame padding token)
pub const K_FILE: &str = "file";
/// First frame of the node's range
pub const K_FIRST: &str = "first";
/// Last frame of the node's range
pub const K_LAST: &str = "last";

// === Node state ===
/// Disable flag - node is bypassed
pub const K_DISABLE: &str = "disable";
/// Render trigger - only output writer nodes carry this knob
pub const K_RENDER: &str = "Render";
/// Path to the gizmo definition backing a gizmo instance
pub const K_GIZMO_FILE: &str = "gizmo_file";
/// Free-form node label
pub const K_LABEL: &str = "label";

// === Graph cosmetics (carried over verbatim on flatten) ===
pub const K_XPOS: &str = "xpos";
pub const K_YPOS: &str = "ypos";
pub const K_TILE_COLOR: &str = "tile_color";
pub const K_HIDE_INPUT: &str = "hide_input";
pub const K_CACHED: &str = "cached";
pub const K_POSTAGE_STAMP: &str = "postage_stamp";
pub const K_DOPE_SHEET: &str = "dope_sheet";

// === Scene root ===
/// Scene file path, as the host would store it on the root
pub const K_ROOT_NAME: &str = "name";
/// Frames per second
pub const K_FPS: &str = "fps";
