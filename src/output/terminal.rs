//! Terminal output utilities.
//!
//! Provides formatting helpers for printing a subnet forest.

use crate::models::format_address;
use crate::processing::Forest;
use colored::{Color, Colorize};

const DEPTH_COLORS: [Color; 4] = [Color::Green, Color::Cyan, Color::Yellow, Color::Magenta];

/// Format a value as a quoted, right-aligned field.
///
/// # Arguments
/// * `value` - The value to format
/// * `width` - The minimum width of the field
///
/// # Returns
/// A quoted, right-aligned string
pub fn format_field<T: ToString>(value: T, width: usize) -> String {
    let value_str = value.to_string();
    let quoted = format!("\"{value_str}\"");
    let quoted_len = quoted.len();

    if quoted_len >= width {
        quoted
    } else {
        format!("{quoted:>width$}")
    }
}

/// Colour the CIDR of a `+--a.b.c.d/n` tree line by its depth.
pub fn colorize_tree_line(line: &str) -> String {
    let marker_len = line
        .char_indices()
        .find(|(_, c)| *c != '+' && *c != '-')
        .map_or(line.len(), |(i, _)| i);
    let (marker, cidr) = line.split_at(marker_len);
    let depth = marker.len().saturating_sub(1);
    let color = DEPTH_COLORS[depth % DEPTH_COLORS.len()];
    format!("{}{}", marker.dimmed(), cidr.color(color))
}

/// Print the forest to stdout, optionally with a per subnet listing and
/// binary dumps.
pub fn print_forest(forest: &Forest, listing: bool, dump: bool) {
    log::info!("#Start print_forest() roots={}", forest.len());

    for line in forest.tree_lines() {
        println!("{}", colorize_tree_line(&line));
    }

    if listing {
        println!(
            r#"          "cidr",        "netmask",      "broadcast", "description""#
        );
        let mut stack: Vec<_> = forest.roots().iter().rev().collect();
        while let Some(subnet) = stack.pop() {
            println!(
                "{},{},{},{}",
                format_field(subnet.cidr_text(), 20),
                format_field(format_address(subnet.netmask()), 17),
                format_field(format_address(subnet.broadcast_address()), 17),
                format_field(subnet.description(), 14),
            );
            stack.extend(subnet.children().iter().rev());
        }
    }

    if dump {
        println!("{}", "# Binary dump".on_blue());
        print!("{}", forest.dump_binary());
    }
}
