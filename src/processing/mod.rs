//! Subnet tree building logic.
//!
//! This module contains the orchestration above single subnets:
//! - [`forest`] - placing subnets into a forest of containment trees

mod forest;

// Re-export public types and functions
pub use forest::{read_entries, Forest, Inserted, SubnetEntry};
