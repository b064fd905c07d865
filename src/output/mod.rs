//! Output formatting for subnet trees.
//!
//! This module handles presenting rendered trees:
//! - [`terminal`] - Terminal output with colors

mod terminal;

pub use terminal::{colorize_tree_line, format_field, print_forest};
