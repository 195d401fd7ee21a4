//! Smart-guide snapping and the grid fallback.
//!
//! While a block is being moved, the engine asks this module for an adjusted
//! drag delta on every pointer move. Each axis resolves independently: the
//! moving block's left/right/center (or top/bottom/center) is tested against
//! the same features of every other block on the same page, in collection
//! order, with a fixed pair priority. The first pair within the snap
//! threshold wins the axis, emits one guide line, and pins the delta so the
//! features align exactly. An axis with no match falls back to the 20-unit
//! grid.
//!
//! Ties between equally close candidates resolve to whichever the scan finds
//! first. That tie-break is arbitrary, but it keeps guides stable while the
//! pointer moves within the threshold.

#[cfg(test)]
#[path = "snap_test.rs"]
mod snap_test;

use crate::consts::{
    GRID_STEP, SNAP_EXTENT_FIGURE, SNAP_EXTENT_IMAGE, SNAP_EXTENT_TEXT, SNAP_THRESHOLD,
};
use crate::doc::{Block, BlockKind};

/// Orientation of a guide line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuideOrientation {
    /// A vertical line at a fixed x; produced by X-axis matches.
    Vertical,
    /// A horizontal line at a fixed y; produced by Y-axis matches.
    Horizontal,
}

/// A transient alignment line rendered while a drag is in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Guide {
    pub orientation: GuideOrientation,
    /// Page-local coordinate of the line (x for vertical, y for horizontal).
    pub position: f64,
    /// Page the guide belongs to.
    pub page: u32,
}

/// Result of snapping one pointer-move: the adjusted delta plus the guides
/// to render. At most one guide per axis.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapResult {
    pub dx: f64,
    pub dy: f64,
    pub guides: Vec<Guide>,
}

/// Extent assumed for a block with no explicit size, used only by the snap
/// heuristic.
fn heuristic_extent(kind: BlockKind) -> f64 {
    match kind {
        BlockKind::Image => SNAP_EXTENT_IMAGE,
        BlockKind::Figure => SNAP_EXTENT_FIGURE,
        BlockKind::Text
        | BlockKind::Date
        | BlockKind::Signature
        | BlockKind::Table
        | BlockKind::Separator
        | BlockKind::Unknown => SNAP_EXTENT_TEXT,
    }
}

/// Width assumed for snapping and hit-testing: explicit `w`, else heuristic.
pub(crate) fn width_of(block: &Block) -> f64 {
    block.w.unwrap_or_else(|| heuristic_extent(block.kind))
}

/// Height assumed for snapping and hit-testing: explicit `h`, else heuristic.
pub(crate) fn height_of(block: &Block) -> f64 {
    block.h.unwrap_or_else(|| heuristic_extent(block.kind))
}

/// Snap a raw delta to the nearest grid line on both axes.
#[must_use]
pub fn snap_to_grid(raw_dx: f64, raw_dy: f64) -> SnapResult {
    SnapResult {
        dx: (raw_dx / GRID_STEP).round() * GRID_STEP,
        dy: (raw_dy / GRID_STEP).round() * GRID_STEP,
        guides: Vec::new(),
    }
}

/// One axis of a block: leading edge, trailing edge, center.
struct AxisSpan {
    lead: f64,
    trail: f64,
    center: f64,
}

impl AxisSpan {
    fn new(lead: f64, extent: f64) -> Self {
        Self { lead, trail: lead + extent, center: lead + extent / 2.0 }
    }
}

/// A resolved axis: the delta that aligns the features exactly and the
/// coordinate the guide is drawn at.
struct AxisSnap {
    delta: f64,
    guide_at: f64,
}

/// Test one axis of the candidate against one neighbor span, in the fixed
/// pair priority: lead↔lead, lead↔trail, trail↔lead, trail↔trail,
/// center↔center.
fn match_axis(candidate: &AxisSpan, other: &AxisSpan, start: f64, extent: f64) -> Option<AxisSnap> {
    let pairs = [
        (candidate.lead, other.lead, 0.0),
        (candidate.lead, other.trail, 0.0),
        (candidate.trail, other.lead, extent),
        (candidate.trail, other.trail, extent),
        (candidate.center, other.center, extent / 2.0),
    ];
    for (cand, target, feature_offset) in pairs {
        if (cand - target).abs() <= SNAP_THRESHOLD {
            // Land the candidate feature exactly on the target.
            return Some(AxisSnap { delta: target - feature_offset - start, guide_at: target });
        }
    }
    None
}

/// Compute the adjusted delta for an in-progress move of `active` by
/// `(raw_dx, raw_dy)`, aligning against `neighbors` (same page, active
/// excluded, in collection order).
///
/// Each axis takes the first match found; unmatched axes fall back to the
/// grid. Neighbors on other pages are ignored by the caller's filtering.
#[must_use]
pub fn snap_move<'a, I>(active: &Block, raw_dx: f64, raw_dy: f64, neighbors: I) -> SnapResult
where
    I: IntoIterator<Item = &'a Block>,
{
    let w = width_of(active);
    let h = height_of(active);
    let cand_x = AxisSpan::new(active.x + raw_dx, w);
    let cand_y = AxisSpan::new(active.y + raw_dy, h);

    let mut snap_x: Option<AxisSnap> = None;
    let mut snap_y: Option<AxisSnap> = None;

    for other in neighbors {
        if other.id == active.id {
            continue;
        }
        if snap_x.is_none() {
            let span = AxisSpan::new(other.x, width_of(other));
            snap_x = match_axis(&cand_x, &span, active.x, w);
        }
        if snap_y.is_none() {
            let span = AxisSpan::new(other.y, height_of(other));
            snap_y = match_axis(&cand_y, &span, active.y, h);
        }
        if snap_x.is_some() && snap_y.is_some() {
            break;
        }
    }

    let mut guides = Vec::new();
    let dx = match &snap_x {
        Some(snap) => {
            guides.push(Guide {
                orientation: GuideOrientation::Vertical,
                position: snap.guide_at,
                page: active.page,
            });
            snap.delta
        }
        None => (raw_dx / GRID_STEP).round() * GRID_STEP,
    };
    let dy = match &snap_y {
        Some(snap) => {
            guides.push(Guide {
                orientation: GuideOrientation::Horizontal,
                position: snap.guide_at,
                page: active.page,
            });
            snap.delta
        }
        None => (raw_dy / GRID_STEP).round() * GRID_STEP,
    };

    SnapResult { dx, dy, guides }
}
