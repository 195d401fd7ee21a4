//! Hit-testing: which block, handle, or page is under a world-space point.
//!
//! The selected block's resize handles are checked before block bodies so a
//! handle that overlaps a neighbor still wins. Bodies are checked topmost
//! first (highest effective z, later insertion breaking ties), matching what
//! the user sees.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::{Camera, Point, page_at, page_origin};
use crate::consts::HANDLE_RADIUS_PX;
use crate::doc::{Block, BlockId, DocStore};
use crate::input::ResizeMode;
use crate::snap;

/// Which part of a block was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    Handle(ResizeMode),
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub block_id: BlockId,
    pub part: HitPart,
}

/// Where a move gesture may be dropped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DropTarget {
    /// Dropped onto another block; the move lands on that block's page.
    Block { id: BlockId, page: u32 },
    /// Dropped onto a page background.
    Page(u32),
}

impl DropTarget {
    /// The page a drop on this target lands on.
    #[must_use]
    pub fn page(&self) -> u32 {
        match self {
            Self::Block { page, .. } | Self::Page(page) => *page,
        }
    }
}

/// World-space bounding rectangle of a block: page origin plus page-local
/// position, extents from explicit size or the snap heuristic.
fn world_rect(block: &Block) -> (Point, f64, f64) {
    let origin = page_origin(block.page);
    let top_left = Point::new(origin.x + block.x, origin.y + block.y);
    (top_left, snap::width_of(block), snap::height_of(block))
}

fn rect_contains(top_left: Point, w: f64, h: f64, pt: Point) -> bool {
    pt.x >= top_left.x && pt.x <= top_left.x + w && pt.y >= top_left.y && pt.y <= top_left.y + h
}

fn near(a: Point, b: Point, radius: f64) -> bool {
    (a.x - b.x).abs() <= radius && (a.y - b.y).abs() <= radius
}

/// Test which block (if any) is under `world_pt`, checking the selected
/// block's resize handles first.
#[must_use]
pub fn hit_test(world_pt: Point, doc: &DocStore, camera: &Camera, selected_id: Option<BlockId>) -> Option<Hit> {
    if let Some(id) = selected_id {
        if let Some(block) = doc.get(&id) {
            if let Some(part) = handle_at(world_pt, block, camera) {
                return Some(Hit { block_id: id, part });
            }
        }
    }
    body_at(world_pt, doc, None).map(|id| Hit { block_id: id, part: HitPart::Body })
}

/// Resize handle of `block` under `world_pt`, if any. Handles sit at the
/// right-edge middle (width), bottom-edge middle (height), and bottom-right
/// corner (both axes); the hit slop is constant in screen pixels.
fn handle_at(world_pt: Point, block: &Block, camera: &Camera) -> Option<HitPart> {
    let (top_left, w, h) = world_rect(block);
    let radius = camera.screen_dist_to_world(HANDLE_RADIUS_PX);
    let corner = Point::new(top_left.x + w, top_left.y + h);
    let right_mid = Point::new(top_left.x + w, top_left.y + h / 2.0);
    let bottom_mid = Point::new(top_left.x + w / 2.0, top_left.y + h);
    if near(world_pt, corner, radius) {
        return Some(HitPart::Handle(ResizeMode::Corner));
    }
    if near(world_pt, right_mid, radius) {
        return Some(HitPart::Handle(ResizeMode::Width));
    }
    if near(world_pt, bottom_mid, radius) {
        return Some(HitPart::Handle(ResizeMode::Height));
    }
    None
}

/// Topmost block whose body contains `world_pt`, excluding `exclude`.
fn body_at(world_pt: Point, doc: &DocStore, exclude: Option<BlockId>) -> Option<BlockId> {
    doc.blocks()
        .iter()
        .enumerate()
        .filter(|(_, b)| Some(b.id) != exclude)
        .filter(|(_, b)| {
            let (top_left, w, h) = world_rect(b);
            rect_contains(top_left, w, h, world_pt)
        })
        .max_by_key(|(index, b)| (b.effective_z(), *index))
        .map(|(_, b)| b.id)
}

/// Resolve where a move gesture dropped at `world_pt` would land: the block
/// under the pointer (its page), else the page background, else nothing.
/// `exclude` is the block being moved, which must not catch its own drop.
#[must_use]
pub fn drop_target(world_pt: Point, doc: &DocStore, exclude: Option<BlockId>) -> Option<DropTarget> {
    if let Some(id) = body_at(world_pt, doc, exclude) {
        if let Some(block) = doc.get(&id) {
            return Some(DropTarget::Block { id, page: block.page });
        }
    }
    page_at(world_pt, doc.num_pages()).map(DropTarget::Page)
}
