//! Subnet entity and containment tree.

use super::ipv4::{
    broadcast_address_of, dump_binary, format_address, netmask_of, network_address_of,
    parse_address, validate_prefix, wildcard_of, IPV4,
};
use crate::error::SubnetError;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// One CIDR block and the blocks nested inside it.
///
/// `address` is expected to be the network address under its own mask but this
/// is not enforced at construction. Only [`Subnet::set_mask`] changes the
/// address afterwards.
#[derive(Debug, Clone)]
pub struct Subnet {
    address: u32,
    prefix_length: u8,
    description: String,
    version: u8,
    children: Vec<Subnet>,
}

/// Outcome of [`Subnet::adopt`] when the candidate was accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adopted {
    /// Attached as a new leaf somewhere below this node.
    Attached,
    /// An equal subnet was already an immediate child of the accepting node.
    AlreadyPresent,
}

/// Where a candidate lands below a node.
///
/// `Attach` holds the child indices leading to the accepting node, deepest
/// first.
#[derive(Debug, PartialEq, Eq)]
enum Placement {
    Present,
    Attach(Vec<usize>),
}

impl Subnet {
    /// Create an IPv4 subnet from dotted decimal text and a prefix length.
    pub fn new(address: &str, prefix_length: u8, description: &str) -> Result<Subnet, SubnetError> {
        Subnet::with_version(address, prefix_length, description, IPV4)
    }

    /// Create a subnet for an explicit IP version. Anything but 4 is rejected.
    pub fn with_version(
        address: &str,
        prefix_length: u8,
        description: &str,
        version: u8,
    ) -> Result<Subnet, SubnetError> {
        if version != IPV4 {
            return Err(SubnetError::UnsupportedVersion {
                cidr: format!("{}/{}", address.trim(), prefix_length),
                version,
            });
        }
        let address = parse_address(address)?;
        let subnet = Subnet {
            address,
            prefix_length: validate_prefix(address, prefix_length)?,
            description: description.to_string(),
            version,
            children: Vec::new(),
        };
        subnet.validate(false)?;
        Ok(subnet)
    }

    pub fn address(&self) -> u32 {
        self.address
    }

    /// Dotted decimal form of the base address.
    pub fn address_text(&self) -> String {
        format_address(self.address)
    }

    pub fn prefix_length(&self) -> u8 {
        self.prefix_length
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    /// Immediate children in insertion order.
    pub fn children(&self) -> &[Subnet] {
        &self.children
    }

    pub fn netmask(&self) -> u32 {
        netmask_of(self.prefix_length)
    }

    pub fn wildcard(&self) -> u32 {
        wildcard_of(self.prefix_length)
    }

    pub fn network_address(&self) -> u32 {
        network_address_of(self.address, self.prefix_length)
    }

    pub fn broadcast_address(&self) -> u32 {
        broadcast_address_of(self.address, self.prefix_length)
    }

    /// Canonical `a.b.c.d/n` rendering.
    pub fn cidr_text(&self) -> String {
        format!("{}/{}", self.address_text(), self.prefix_length)
    }

    /// Four line binary view of address, network address, netmask and wildcard.
    pub fn dump_binary(&self) -> String {
        dump_binary(self.address, self.prefix_length)
    }

    /// Re-check version and prefix range, optionally through the whole subtree.
    pub fn validate(&self, check_children: bool) -> Result<(), SubnetError> {
        if self.version != IPV4 {
            return Err(SubnetError::UnsupportedVersion {
                cidr: self.cidr_text(),
                version: self.version,
            });
        }
        validate_prefix(self.address, self.prefix_length)?;
        if check_children {
            for child in &self.children {
                child.validate(true)?;
            }
        }
        Ok(())
    }

    /// Change the prefix length and move the address to the network address
    /// under the new mask.
    ///
    /// ```
    /// use subnet_tree::Subnet;
    /// let mut subnet = Subnet::new("10.2.3.0", 24, "").unwrap();
    /// subnet.set_mask(8).unwrap();
    /// assert_eq!(subnet.cidr_text(), "10.0.0.0/8");
    /// ```
    pub fn set_mask(&mut self, new_prefix_length: u8) -> Result<(), SubnetError> {
        let prefix_length = validate_prefix(self.address, new_prefix_length)?;
        if prefix_length > self.prefix_length {
            log::info!(
                "New mask /{} is tighter than /{} on {}, be aware.",
                prefix_length,
                self.prefix_length,
                self.cidr_text()
            );
        }
        let address = network_address_of(self.address, prefix_length);
        log::debug!(
            "set_mask() {} -> /{} netmask={:032b} address={:032b}",
            self.cidr_text(),
            prefix_length,
            netmask_of(prefix_length),
            address
        );
        self.prefix_length = prefix_length;
        self.address = address;
        self.validate(false)
    }

    /// Decide whether `candidate` belongs below this node, attaching it when
    /// `commit` is set.
    ///
    /// Returns `true` when the candidate is already an immediate child. A
    /// candidate that fits this node but none of its existing children is
    /// rejected rather than added next to them.
    pub fn can_be_child(&mut self, candidate: &Subnet, commit: bool) -> bool {
        match self.placement(candidate) {
            None => false,
            Some(Placement::Present) => true,
            Some(Placement::Attach(path)) => {
                if commit {
                    self.node_at_mut(&path).children.push(candidate.clone());
                }
                true
            }
        }
    }

    /// Committing form of [`Subnet::can_be_child`] that moves the candidate in.
    ///
    /// A rejected candidate is handed back unchanged.
    pub fn adopt(&mut self, candidate: Subnet) -> Result<Adopted, Subnet> {
        match self.placement(&candidate) {
            None => Err(candidate),
            Some(Placement::Present) => Ok(Adopted::AlreadyPresent),
            Some(Placement::Attach(path)) => {
                self.node_at_mut(&path).children.push(candidate);
                Ok(Adopted::Attached)
            }
        }
    }

    fn placement(&self, candidate: &Subnet) -> Option<Placement> {
        if self.children.contains(candidate) {
            return Some(Placement::Present);
        }
        if candidate.prefix_length <= self.prefix_length {
            return None;
        }
        // Candidate is tested against this node's mask, not its own.
        let mask = self.netmask();
        if self.address & mask != candidate.address & mask {
            return None;
        }
        if self.children.is_empty() {
            return Some(Placement::Attach(Vec::new()));
        }
        self.children
            .iter()
            .enumerate()
            .find_map(|(i, child)| match child.placement(candidate)? {
                Placement::Present => Some(Placement::Present),
                Placement::Attach(mut path) => {
                    path.push(i);
                    Some(Placement::Attach(path))
                }
            })
    }

    fn node_at_mut(&mut self, path: &[usize]) -> &mut Subnet {
        path.iter()
            .rev()
            .fold(self, |node, &i| &mut node.children[i])
    }

    /// Lines of the subtree rooted here, this node at `depth`.
    pub fn tree_lines(&self, depth: usize) -> TreeLines<'_> {
        TreeLines {
            stack: vec![(self, depth)],
        }
    }

    /// Render the subtree as text, one `+--a.b.c.d/n` line per node.
    pub fn print_tree(&self, depth: usize) -> String {
        self.tree_lines(depth).map(|line| line + "\n").collect()
    }
}

/// Depth first iterator over rendered tree lines.
///
/// Cloning yields an independent iterator that restarts from the same point.
#[derive(Debug, Clone)]
pub struct TreeLines<'a> {
    stack: Vec<(&'a Subnet, usize)>,
}

impl<'a> Iterator for TreeLines<'a> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let (node, depth) = self.stack.pop()?;
        self.stack
            .extend(node.children.iter().rev().map(|child| (child, depth + 1)));
        Some(format!("+{}{}", "-".repeat(depth), node))
    }
}

impl FromStr for Subnet {
    type Err = SubnetError;

    /// Parse `a.b.c.d/n`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (address, prefix) = s
            .trim()
            .split_once('/')
            .ok_or_else(|| SubnetError::InvalidCidr(s.to_string()))?;
        let prefix: u8 = prefix
            .trim()
            .parse()
            .map_err(|_| SubnetError::InvalidCidr(s.to_string()))?;
        Subnet::new(address, prefix, "")
    }
}

impl fmt::Display for Subnet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.address_text(), self.prefix_length)
    }
}

impl PartialEq for Subnet {
    fn eq(&self, other: &Subnet) -> bool {
        self.address == other.address && self.prefix_length == other.prefix_length
    }
}

impl Eq for Subnet {}

impl Hash for Subnet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.address.hash(state);
        self.prefix_length.hash(state);
    }
}

impl Serialize for Subnet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("Subnet", 3)?;
        state.serialize_field("cidr", &self.cidr_text())?;
        state.serialize_field("description", &self.description)?;
        state.serialize_field("children", &self.children)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subnet(cidr: &str) -> Subnet {
        cidr.parse().unwrap()
    }

    #[test]
    fn test_new() {
        let s = Subnet::new("192.168.0.2", 25, "lab").unwrap();
        assert_eq!(s.address(), 3232235522);
        assert_eq!(s.prefix_length(), 25);
        assert_eq!(s.description(), "lab");
        assert_eq!(s.version(), 4);
        assert!(s.children().is_empty());
        assert_eq!(s.cidr_text(), "192.168.0.2/25");
        assert_eq!(s.to_string(), "192.168.0.2/25");
    }

    #[test]
    fn test_new_does_not_normalise_address() {
        let s = Subnet::new("10.2.3.4", 8, "").unwrap();
        assert_eq!(s.address_text(), "10.2.3.4");
        assert_eq!(format_address(s.network_address()), "10.0.0.0");
        assert_eq!(format_address(s.broadcast_address()), "10.255.255.255");
        assert_eq!(s.netmask(), 0xFF000000);
        assert_eq!(s.wildcard(), 0x00FFFFFF);
    }

    #[test]
    fn test_new_rejects() {
        assert_eq!(
            Subnet::new("1.2.3.4", 33, ""),
            Err(SubnetError::InvalidPrefix {
                address: "1.2.3.4".to_string(),
                prefix: 33
            })
        );
        assert_eq!(
            Subnet::new("256.1.1.1", 24, ""),
            Err(SubnetError::InvalidAddress("256.1.1.1".to_string()))
        );
        assert_eq!(
            Subnet::with_version("10.0.0.0", 8, "", 6),
            Err(SubnetError::UnsupportedVersion {
                cidr: "10.0.0.0/8".to_string(),
                version: 6
            })
        );
    }

    #[test]
    fn test_from_str() {
        let s = subnet(" 10.1.1.0/28 ");
        assert_eq!(s.cidr_text(), "10.1.1.0/28");
        assert_eq!(
            "10.1.1.0".parse::<Subnet>(),
            Err(SubnetError::InvalidCidr("10.1.1.0".to_string()))
        );
        assert_eq!(
            "10.1.1.0/x".parse::<Subnet>(),
            Err(SubnetError::InvalidCidr("10.1.1.0/x".to_string()))
        );
        assert!(matches!(
            "10.1.1.0/40".parse::<Subnet>(),
            Err(SubnetError::InvalidPrefix { prefix: 40, .. })
        ));
    }

    #[test]
    fn test_set_mask() {
        let mut s = Subnet::new("131.242.34.44", 32, "").unwrap();
        s.set_mask(24).unwrap();
        assert_eq!(s.cidr_text(), "131.242.34.0/24");

        let mut s = Subnet::new("192.168.0.152", 32, "").unwrap();
        s.set_mask(24).unwrap();
        assert_eq!(s.cidr_text(), "192.168.0.0/24");

        let mut s = Subnet::new("10.2.3.0", 24, "").unwrap();
        s.set_mask(8).unwrap();
        assert_eq!(s.cidr_text(), "10.0.0.0/8");

        let mut s = Subnet::new("1.2.3.0", 24, "").unwrap();
        s.set_mask(32).unwrap();
        assert_eq!(s.cidr_text(), "1.2.3.0/32");
    }

    #[test]
    fn test_set_mask_out_of_range_leaves_subnet_untouched() {
        let mut s = Subnet::new("10.2.3.4", 32, "").unwrap();
        assert!(matches!(
            s.set_mask(33),
            Err(SubnetError::InvalidPrefix { prefix: 33, .. })
        ));
        assert_eq!(s.cidr_text(), "10.2.3.4/32");
    }

    #[test]
    fn test_validate_children() {
        let mut root = subnet("10.0.0.0/8");
        assert!(root.can_be_child(&subnet("10.1.0.0/16"), true));
        assert!(root.validate(true).is_ok());
    }

    #[test]
    fn test_can_be_child_without_commit() {
        let mut root = Subnet::new("0.0.0.0", 0, "").unwrap();
        assert!(root.can_be_child(&subnet("10.2.3.4/32"), false));
        assert!(root.can_be_child(&subnet("11.2.3.4/32"), false));
        assert!(root.children().is_empty());
    }

    #[test]
    fn test_can_be_child_commit_and_gap_rejection() {
        let mut root = Subnet::new("0.0.0.0", 0, "").unwrap();
        assert!(root.can_be_child(&subnet("10.2.3.4/32"), true));
        assert_eq!(root.children(), &[subnet("10.2.3.4/32")]);

        // Fits 0.0.0.0/0 but not the existing /32 child.
        assert!(!root.can_be_child(&subnet("11.2.3.4/32"), true));
        assert_eq!(root.children().len(), 1);
    }

    #[test]
    fn test_can_be_child_is_idempotent() {
        let mut root = subnet("10.0.0.0/8");
        let child = subnet("10.1.0.0/16");
        assert!(root.can_be_child(&child, true));
        assert!(root.can_be_child(&child, true));
        assert_eq!(root.children().len(), 1);
    }

    #[test]
    fn test_can_be_child_rejects_same_or_larger() {
        let mut root = subnet("10.0.0.0/16");
        assert!(!root.can_be_child(&subnet("10.0.0.0/16"), true));
        assert!(!root.can_be_child(&subnet("10.0.0.0/8"), true));
        assert!(!root.can_be_child(&subnet("11.0.0.0/24"), true));
        assert!(root.children().is_empty());
    }

    #[test]
    fn test_can_be_child_nests_deepest() {
        let mut root = subnet("10.0.0.0/8");
        assert!(root.can_be_child(&subnet("10.1.0.0/16"), true));
        assert!(root.can_be_child(&subnet("10.1.2.0/24"), true));
        assert!(root.can_be_child(&subnet("10.1.2.128/25"), true));
        assert_eq!(
            root.print_tree(0),
            "+10.0.0.0/8\n+-10.1.0.0/16\n+--10.1.2.0/24\n+---10.1.2.128/25\n"
        );
        // Present as an immediate child of the /24.
        assert!(root.can_be_child(&subnet("10.1.2.128/25"), true));
        assert_eq!(root.tree_lines(0).count(), 4);
    }

    #[test]
    fn test_adopt() {
        let mut root = subnet("192.168.0.0/16");
        assert_eq!(root.adopt(subnet("192.168.1.0/24")), Ok(Adopted::Attached));
        assert_eq!(
            root.adopt(subnet("192.168.1.0/24")),
            Ok(Adopted::AlreadyPresent)
        );
        let rejected = root.adopt(subnet("192.168.2.0/24")).unwrap_err();
        assert_eq!(rejected.cidr_text(), "192.168.2.0/24");
    }

    #[test]
    fn test_tree_lines_restartable() {
        let mut root = subnet("10.0.0.0/8");
        root.can_be_child(&subnet("10.1.0.0/16"), true);
        let lines = root.tree_lines(2);
        let first: Vec<String> = lines.clone().collect();
        let second: Vec<String> = lines.collect();
        assert_eq!(first, vec!["+--10.0.0.0/8", "+---10.1.0.0/16"]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_equality_ignores_description() {
        let a = Subnet::new("10.0.0.0", 8, "a").unwrap();
        let b = Subnet::new("10.0.0.0", 8, "b").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, subnet("10.0.0.0/9"));
    }

    #[test]
    fn test_serialize() {
        let mut root = Subnet::new("10.0.0.0", 8, "corp").unwrap();
        root.can_be_child(&subnet("10.1.0.0/16"), true);
        let json = serde_json::to_value(&root).unwrap();
        assert_eq!(json["cidr"], "10.0.0.0/8");
        assert_eq!(json["description"], "corp");
        assert_eq!(json["children"][0]["cidr"], "10.1.0.0/16");
    }
}
