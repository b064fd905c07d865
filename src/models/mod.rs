//! Domain models for the subnet tree.
//!
//! This module contains the core data structures and arithmetic:
//! - address/mask engine functions operating on `u32` addresses
//! - [`Subnet`] - one CIDR block owning its nested blocks

mod ipv4;
mod subnet;

// Re-export public types
pub use ipv4::{
    broadcast_address_of, dump_binary, format_address, netmask_of, network_address_of,
    parse_address, to_binary, validate_prefix, wildcard_of, IPV4, MAX_LENGTH,
};
pub use subnet::{Adopted, Subnet, TreeLines};
