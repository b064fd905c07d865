//! Building a forest of subnets by containment.
//!
//! Each new subnet is offered to the existing roots in insertion order. The
//! first root that accepts it keeps it, otherwise it becomes a new root.

use crate::error::SubnetError;
use crate::models::{Adopted, Subnet};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::path::Path;

/// One input record, a CIDR with an optional label.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SubnetEntry {
    /// CIDR text, e.g. "10.0.0.0/8".
    pub cidr: String,
    /// Free form label.
    #[serde(default)]
    pub description: String,
}

impl SubnetEntry {
    /// Build the [`Subnet`] this entry describes.
    pub fn to_subnet(&self) -> Result<Subnet, SubnetError> {
        let subnet: Subnet = self.cidr.parse()?;
        Subnet::new(
            &subnet.address_text(),
            subnet.prefix_length(),
            &self.description,
        )
    }
}

/// Where [`Forest::insert`] put a subnet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inserted {
    /// Claimed by the root at this index.
    Nested { root: usize },
    /// An equal subnet already sat at that spot below the root at this index.
    Duplicate { root: usize },
    /// Appended as a new root at this index.
    NewRoot { root: usize },
}

/// Ordered list of root subnets, each owning its subtree.
#[derive(Serialize, Debug, Default, Clone)]
pub struct Forest {
    roots: Vec<Subnet>,
}

impl Forest {
    pub fn new() -> Forest {
        Forest { roots: Vec::new() }
    }

    /// Insert subnets one after the other.
    pub fn from_subnets<I>(subnets: I) -> Forest
    where
        I: IntoIterator<Item = Subnet>,
    {
        let mut forest = Forest::new();
        for subnet in subnets {
            forest.insert(subnet);
        }
        forest
    }

    /// Build a forest from input records, failing on the first invalid one.
    pub fn from_entries(entries: &[SubnetEntry]) -> Result<Forest, SubnetError> {
        let subnets = entries
            .iter()
            .map(SubnetEntry::to_subnet)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Forest::from_subnets(subnets))
    }

    /// Place a subnet below the first root that accepts it, or add a new root.
    pub fn insert(&mut self, subnet: Subnet) -> Inserted {
        let mut candidate = subnet;
        for (i, root) in self.roots.iter_mut().enumerate() {
            match root.adopt(candidate) {
                Ok(Adopted::Attached) => {
                    log::debug!("Nested subnet under root {}", root);
                    return Inserted::Nested { root: i };
                }
                Ok(Adopted::AlreadyPresent) => {
                    log::debug!("Subnet already present under root {}", root);
                    return Inserted::Duplicate { root: i };
                }
                Err(rejected) => candidate = rejected,
            }
        }
        log::info!("New root subnet {}", candidate);
        self.roots.push(candidate);
        Inserted::NewRoot {
            root: self.roots.len() - 1,
        }
    }

    pub fn roots(&self) -> &[Subnet] {
        &self.roots
    }

    /// Number of roots.
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Lines of every tree, roots at depth 0.
    pub fn tree_lines(&self) -> impl Iterator<Item = String> + Clone + '_ {
        self.roots.iter().flat_map(|root| root.tree_lines(0))
    }

    /// Render every tree, roots at depth 0.
    pub fn print_tree(&self) -> String {
        self.roots.iter().map(|root| root.print_tree(0)).collect()
    }

    /// Binary dump of every subnet, depth first, each block headed by its CIDR.
    pub fn dump_binary(&self) -> String {
        let mut out = String::new();
        let mut stack: Vec<&Subnet> = self.roots.iter().rev().collect();
        while let Some(subnet) = stack.pop() {
            out.push_str(&format!("{}\n{}", subnet, subnet.dump_binary()));
            stack.extend(subnet.children().iter().rev());
        }
        out
    }
}

impl fmt::Display for Forest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.tree_lines() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Read subnet records from a JSON file holding a list of entries.
pub fn read_entries(path: &str) -> Result<Vec<SubnetEntry>, Box<dyn Error>> {
    if !Path::new(path).exists() {
        return Err(format!("Subnet file does not exist: {path}").into());
    }
    log::info!("Reading subnets from file: {path}");
    let json = std::fs::read_to_string(path)
        .map_err(|e| format!("Error reading subnet file {path}: {e}"))?;
    let entries: Vec<SubnetEntry> =
        serde_json::from_str(&json).map_err(|e| format!("Error parsing subnet JSON: {e}"))?;
    log::debug!("Read {} subnet entries", entries.len());
    Ok(entries)
}
