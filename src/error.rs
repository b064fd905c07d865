//! Error types for subnet construction and mutation.

/// Every way a [`crate::Subnet`] can fail to be built or mutated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubnetError {
    #[error("Invalid IPv4 address: {0:?}. Expected four dot separated octets in 0-255")]
    InvalidAddress(String),

    #[error("Subnet {address}/{prefix} prefix length out of range 0-32")]
    InvalidPrefix { address: String, prefix: u8 },

    #[error("Subnet {cidr} requested with version {version}, only IPv4 is supported")]
    UnsupportedVersion { cidr: String, version: u8 },

    #[error("Invalid CIDR {0:?}. Expected address/prefix")]
    InvalidCidr(String),
}
