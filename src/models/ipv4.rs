//! IPv4 address and netmask arithmetic.
//!
//! Pure conversions between dotted decimal text, `u32` values and the
//! netmask, wildcard and network address derived from a prefix length.
//! Octet order is fixed, most significant octet first.

use crate::error::SubnetError;
use itertools::Itertools;
use lazy_static::lazy_static;
use regex::Regex;

/// Maximum length for an IPv4 subnet mask (32 bits).
pub const MAX_LENGTH: u8 = 32;

/// The only IP version supported.
pub const IPV4: u8 = 4;

lazy_static! {
    static ref RE_V4: Regex =
        Regex::new(r"^(\d{1,3})\.(\d{1,3})\.(\d{1,3})\.(\d{1,3})$").expect("Invalid Regex?");
}

/// Parse dotted decimal text into its 32-bit value.
///
/// Exactly four groups of one to three digits are accepted and every group
/// must be in 0-255.
///
/// # Examples
/// ```
/// use subnet_tree::models::parse_address;
/// assert_eq!(parse_address("10.2.3.4").unwrap(), 167904004);
/// assert!(parse_address("256.1.1.1").is_err());
/// ```
pub fn parse_address(text: &str) -> Result<u32, SubnetError> {
    let invalid = || SubnetError::InvalidAddress(text.to_string());
    let caps = RE_V4.captures(text.trim()).ok_or_else(invalid)?;

    let mut value: u32 = 0;
    for group in caps.iter().skip(1) {
        let octet: u8 = group
            .ok_or_else(invalid)?
            .as_str()
            .parse()
            .map_err(|_| invalid())?;
        value = (value << 8) | u32::from(octet);
    }
    Ok(value)
}

/// Render a 32-bit value as dotted decimal without leading zeros.
pub fn format_address(value: u32) -> String {
    value.to_be_bytes().iter().join(".")
}

/// Reject prefix lengths outside 0-32.
pub fn validate_prefix(address: u32, prefix: u8) -> Result<u8, SubnetError> {
    if prefix > MAX_LENGTH {
        Err(SubnetError::InvalidPrefix {
            address: format_address(address),
            prefix,
        })
    } else {
        Ok(prefix)
    }
}

/// Netmask with `prefix` leading one bits.
///
/// `prefix` must already be validated; anything above 32 is clamped.
///
/// # Examples
/// ```
/// use subnet_tree::models::netmask_of;
/// assert_eq!(netmask_of(24), 0xFFFFFF00);
/// ```
pub fn netmask_of(prefix: u8) -> u32 {
    let right_len = MAX_LENGTH - prefix.min(MAX_LENGTH);
    let all_bits = u32::MAX as u64;
    ((all_bits >> right_len) << right_len) as u32
}

/// Wildcard (host) mask, the complement of [`netmask_of`].
pub fn wildcard_of(prefix: u8) -> u32 {
    !netmask_of(prefix)
}

/// Address with every host bit cleared.
pub fn network_address_of(address: u32, prefix: u8) -> u32 {
    address & netmask_of(prefix)
}

/// Address with every host bit set.
pub fn broadcast_address_of(address: u32, prefix: u8) -> u32 {
    network_address_of(address, prefix) | wildcard_of(prefix)
}

/// 32 character `0`/`1` rendering of a value.
pub fn to_binary(value: u32) -> String {
    format!("{value:032b}")
}

/// Four line diagnostic block for an address and prefix length.
pub fn dump_binary(address: u32, prefix: u8) -> String {
    format!(
        "Address: \t{}\nNetaddrs: \t{}\nNetmask: \t{}\nWildcard: \t{}\n",
        to_binary(address),
        to_binary(network_address_of(address, prefix)),
        to_binary(netmask_of(prefix)),
        to_binary(wildcard_of(prefix)),
    )
}
