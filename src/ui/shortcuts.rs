//! Keyboard shortcut constants for consistent documentation.

pub const QUIT: &str = "Esc/F10";
pub const EDIT_MODE: &str = "F2";
pub const THEME: &str = "F3";
pub const RETRY: &str = "Ctrl+R";
pub const OPEN_PROFILE: &str = "Enter";

// Navigation
pub const CURSOR: &str = "Up/Down";

// Edit mode
pub const TOGGLE_SELECT: &str = "Ctrl+X";
pub const TOGGLE_ALL: &str = "Ctrl+A";
pub const DUPLICATE: &str = "Ctrl+D";
pub const REMOVE: &str = "Delete";
