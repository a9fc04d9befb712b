use serde::Serialize;

use super::{DemoBlock, GENESIS_PREVIOUS_HASH, MineOutcome};
use crate::error::{DemoError, DemoResult};

/// Editable chain of demo blocks. Each block shows its predecessor's hash;
/// editing a block re-links its successor so the broken signature is visible.
#[derive(Debug, Clone, Serialize)]
pub struct DemoChain {
    pub blocks: Vec<DemoBlock>,
    pub difficulty: u32,
}

impl DemoChain {
    /// Build `len` unmined blocks at heights `1..=len`.
    pub fn new(len: usize, difficulty: u32) -> Self {
        let mut chain = Self {
            blocks: Vec::with_capacity(len),
            difficulty,
        };
        for _ in 0..len {
            chain.push("");
        }
        chain
    }

    /// Append an unmined block linked to the current tip.
    pub fn push(&mut self, data: impl Into<String>) -> &DemoBlock {
        let height = self.blocks.len() as u64 + 1;
        let previous = self
            .blocks
            .last()
            .map(|b| b.hash().to_string())
            .unwrap_or_else(|| GENESIS_PREVIOUS_HASH.to_string());
        self.blocks.push(DemoBlock::new(height, data, previous));
        &self.blocks[self.blocks.len() - 1]
    }

    fn block_mut(&mut self, index: usize) -> DemoResult<&mut DemoBlock> {
        self.blocks
            .get_mut(index)
            .ok_or_else(|| DemoError::NotFound(format!("block #{index}")))
    }

    fn relink_after(&mut self, index: usize) {
        if let Some(hash) = self.blocks.get(index).map(|b| b.hash().to_string()) {
            if let Some(next) = self.blocks.get_mut(index + 1) {
                next.previous_hash = hash;
            }
        }
    }

    pub fn edit_data(&mut self, index: usize, data: impl Into<String>) -> DemoResult<()> {
        self.block_mut(index)?.set_data(data);
        self.relink_after(index);
        Ok(())
    }

    pub fn set_nonce(&mut self, index: usize, nonce: u64) -> DemoResult<()> {
        self.block_mut(index)?.set_nonce(nonce);
        self.relink_after(index);
        Ok(())
    }

    /// Height and data to search for block `index`, taken before the scan
    /// so the chain does not stay locked while mining.
    pub fn mining_input(&self, index: usize) -> DemoResult<(u64, String)> {
        self.blocks
            .get(index)
            .map(|b| (b.height, b.data.clone()))
            .ok_or_else(|| DemoError::NotFound(format!("block #{index}")))
    }

    /// Seal block `index` with a found nonce. `data` is what was searched;
    /// if the block was edited meanwhile the result no longer applies.
    /// A `NotFound` outcome leaves the block as it was.
    pub fn apply_mined(
        &mut self,
        index: usize,
        data: &str,
        outcome: &MineOutcome,
    ) -> DemoResult<()> {
        let block = self.block_mut(index)?;
        let MineOutcome::Found { nonce, .. } = outcome else {
            return Ok(());
        };
        if block.data != data {
            return Err(DemoError::Conflict(format!(
                "block #{index} changed while mining"
            )));
        }
        block.set_nonce(*nonce);
        self.relink_after(index);
        Ok(())
    }

    /// Per-block signed flag, in chain order.
    pub fn signed_states(&self) -> Vec<bool> {
        self.blocks
            .iter()
            .map(|b| b.is_signed(self.difficulty))
            .collect()
    }

    /// Validate linkage, hashes and difficulty for every block.
    pub fn is_valid_chain(&self) -> bool {
        let mut expected_prev = GENESIS_PREVIOUS_HASH;
        for block in &self.blocks {
            if block.previous_hash != expected_prev || !block.is_signed(self.difficulty) {
                return false;
            }
            expected_prev = block.hash();
        }
        true
    }
}
