//! Z-order operations on blocks.
//!
//! Each operation changes only the targeted block's `z_index`; siblings are
//! never renumbered. The scan is scoped to the block's page, since blocks
//! only ever render alongside same-page siblings. A block with no explicit
//! `z_index` reads as 1, and `send_to_back`/`move_backward` floor at 0 so
//! nothing renders behind the page background.

#[cfg(test)]
#[path = "layer_test.rs"]
mod layer_test;

use crate::doc::{Block, BlockId, DocStore};

impl DocStore {
    /// Place a block above every sibling on its page. Returns the new z, or
    /// `None` when the block does not exist.
    pub fn bring_to_front(&mut self, id: &BlockId) -> Option<i64> {
        let page = self.get(id)?.page;
        let top = self
            .blocks_on_page(page)
            .map(Block::effective_z)
            .max()
            .unwrap_or(0)
            .max(0);
        self.set_z(id, top + 1)
    }

    /// Place a block below every sibling on its page, floored at 0.
    pub fn send_to_back(&mut self, id: &BlockId) -> Option<i64> {
        let page = self.get(id)?.page;
        let bottom = self
            .blocks_on_page(page)
            .map(Block::effective_z)
            .min()
            .unwrap_or(0);
        self.set_z(id, (bottom - 1).max(0))
    }

    /// Raise a block one step.
    pub fn move_forward(&mut self, id: &BlockId) -> Option<i64> {
        let z = self.get(id)?.effective_z();
        self.set_z(id, z + 1)
    }

    /// Lower a block one step, floored at 0.
    pub fn move_backward(&mut self, id: &BlockId) -> Option<i64> {
        let z = self.get(id)?.effective_z();
        self.set_z(id, (z - 1).max(0))
    }

    fn set_z(&mut self, id: &BlockId, z: i64) -> Option<i64> {
        let block = self.blocks.iter_mut().find(|b| b.id == *id)?;
        block.z_index = Some(z);
        Some(z)
    }
}
