// cargo watch -x 'fmt' -x 'test'

pub mod config;
pub mod error;
pub mod models;
pub mod output;
pub mod processing;

pub use error::SubnetError;
pub use models::{Adopted, Subnet, TreeLines};
pub use processing::{Forest, Inserted, SubnetEntry};

/// Build a forest from entries and check every subnet in it.
pub fn build_forest(entries: &[SubnetEntry]) -> Result<Forest, SubnetError> {
    let forest = Forest::from_entries(entries)?;
    for root in forest.roots() {
        root.validate(true)?;
    }
    log::info!(
        "Built forest of {} roots from {} entries",
        forest.len(),
        entries.len()
    );
    Ok(forest)
}
