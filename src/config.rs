//! Command line and environment configuration.

use crate::processing::{read_entries, SubnetEntry};
use std::error::Error;
use std::path::Path;

/// Default log4rs configuration file.
pub const DEFAULT_LOG_CONFIG: &str = "log4rs.yml";

#[derive(clap::Parser, Debug)]
#[clap(author, version, about = "Arrange IPv4 subnets into a containment tree", long_about = None)]
pub struct Args {
    /// Subnets in CIDR notation, inserted after any read from --file
    pub cidrs: Vec<String>,

    /// JSON file holding a list of {"cidr", "description"} entries
    #[clap(short, long)]
    pub file: Option<String>,

    /// Print a listing of every subnet with netmask and broadcast address
    #[clap(short, long)]
    pub listing: bool,

    /// Print the binary address, network address, netmask and wildcard of every subnet
    #[clap(short, long)]
    pub dump: bool,

    /// Print the forest as JSON instead of a tree
    #[clap(short, long)]
    pub json: bool,

    /// Disable coloured output
    #[clap(long)]
    pub no_color: bool,

    /// log4rs configuration file
    #[clap(long, env = "SUBNET_TREE_LOG_CONFIG", default_value = DEFAULT_LOG_CONFIG)]
    pub log_config: String,
}

impl Args {
    /// Collect entries from the file first, then from the positional CIDRs.
    pub fn entries(&self) -> Result<Vec<SubnetEntry>, Box<dyn Error>> {
        let mut entries = match &self.file {
            Some(path) => read_entries(path)?,
            None => Vec::new(),
        };
        entries.extend(self.cidrs.iter().map(|cidr| SubnetEntry {
            cidr: cidr.clone(),
            description: String::new(),
        }));
        if entries.is_empty() {
            return Err("No subnets given. Pass CIDRs as arguments or use --file".into());
        }
        Ok(entries)
    }
}

/// Initialise log4rs from `path` when the file exists.
///
/// Returns false when no configuration was found and logging stays disabled.
pub fn init_logging(path: &str) -> Result<bool, Box<dyn Error>> {
    if !Path::new(path).exists() {
        return Ok(false);
    }
    log4rs::init_file(path, Default::default())
        .map_err(|e| format!("Error initializing log4rs from {path}: {e}"))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_args_entries() {
        let args = Args::parse_from([
            "subnet-tree",
            "--file",
            "src/tests/test_data/subnets_01.json",
            "10.9.0.0/16",
        ]);
        let entries = args.entries().expect("Error collecting entries");
        assert_eq!(entries.len(), 9);
        assert_eq!(entries[8].cidr, "10.9.0.0/16");
        assert!(entries[8].description.is_empty());
    }

    #[test]
    fn test_args_flags() {
        let args = Args::parse_from(["subnet-tree", "-d", "-j", "--no-color", "0.0.0.0/0"]);
        assert!(args.dump);
        assert!(args.json);
        assert!(args.no_color);
        assert!(!args.listing);
        assert_eq!(args.cidrs, vec!["0.0.0.0/0"]);
    }

    #[test]
    fn test_args_without_subnets() {
        let args = Args::parse_from(["subnet-tree"]);
        assert!(args.entries().is_err());
    }

    #[test]
    fn test_init_logging_missing_file() {
        assert!(!init_logging("does-not-exist.yml").unwrap());
    }
}
