//! Rendering for diff results: missing in red, stale in yellow.

use owo_colors::OwoColorize;

/// Print a path the mirror is missing.
pub fn render_missing(path: &str, color: bool) {
    if color {
        println!("{}", path.red());
    } else {
        println!("{}", path);
    }
}

/// Print a path present only in the mirror.
pub fn render_stale(path: &str, color: bool) {
    if color {
        println!("{}", path.bright_yellow());
    } else {
        println!("{}", path);
    }
}
