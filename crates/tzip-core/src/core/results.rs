use std::sync::OnceLock;

use anyhow::anyhow;

use crate::TzipError;
use crate::types::{CompressionResult, Result};

/// Pre-sized table with one write-once slot per catalog index.
///
/// Workers fill disjoint slots concurrently; a second write to the same slot
/// is rejected instead of overwriting.
#[derive(Debug)]
pub struct ResultsTable {
    slots: Vec<OnceLock<CompressionResult>>,
}

impl ResultsTable {
    pub fn new(len: usize) -> Self {
        Self {
            slots: (0..len).map(|_| OnceLock::new()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn store(&self, index: usize, result: CompressionResult) -> Result<()> {
        let slot = self
            .slots
            .get(index)
            .ok_or_else(|| anyhow!("result index {index} outside table of {}", self.len()))?;
        slot.set(result)
            .map_err(|_| anyhow!("result slot {index} written twice"))?;
        Ok(())
    }

    pub fn is_filled(&self, index: usize) -> bool {
        self.slots.get(index).is_some_and(|slot| slot.get().is_some())
    }

    /// Consumes the table, yielding results in index order.
    ///
    /// Fails if any slot was never written.
    pub fn into_results(self) -> Result<Vec<CompressionResult>> {
        self.slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.into_inner()
                    .ok_or_else(|| TzipError::from(anyhow!("result slot {index} was never written")))
            })
            .collect()
    }
}
