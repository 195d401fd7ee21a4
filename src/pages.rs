//! Page lifecycle: add, delete, and reorder pages.
//!
//! Pages are implicit: a page is exactly the set of blocks whose `page`
//! field matches its index, so these operations work by re-assigning block
//! page numbers. Every operation preserves the invariant that each block's
//! page stays within `[1, num_pages]`; invalid requests are rejected
//! silently (the UI prevents most of them, and the condition is recoverable
//! and purely local).

#[cfg(test)]
#[path = "pages_test.rs"]
mod pages_test;

use crate::doc::DocStore;

impl DocStore {
    /// Append a new empty page. Returns the new page count.
    pub fn add_page(&mut self) -> u32 {
        self.num_pages += 1;
        self.num_pages
    }

    /// Delete page `n`: its blocks are removed and every block on a later
    /// page shifts down by one. Rejected (no-op, `false`) when only one page
    /// remains or `n` is out of range.
    pub fn delete_page(&mut self, n: u32) -> bool {
        if self.num_pages <= 1 || n < 1 || n > self.num_pages {
            tracing::debug!(page = n, num_pages = self.num_pages, "page delete rejected");
            return false;
        }
        self.blocks.retain(|b| b.page != n);
        for block in &mut self.blocks {
            if block.page > n {
                block.page -= 1;
            }
        }
        self.num_pages -= 1;
        true
    }

    /// Swap the contents of pages `from` and `to`: a pure simultaneous
    /// swap, not a shift; the page count is unchanged. Rejected (no-op,
    /// `false`) when either index is out of range or they are equal.
    pub fn move_page(&mut self, from: u32, to: u32) -> bool {
        let out_of_range = |p: u32| p < 1 || p > self.num_pages;
        if from == to || out_of_range(from) || out_of_range(to) {
            tracing::debug!(from, to, num_pages = self.num_pages, "page move rejected");
            return false;
        }
        for block in &mut self.blocks {
            if block.page == from {
                block.page = to;
            } else if block.page == to {
                block.page = from;
            }
        }
        true
    }
}
