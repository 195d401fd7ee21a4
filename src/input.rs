//! Input model: gesture sessions, modifier keys, and explicit view state.
//!
//! `Session` is the active gesture being tracked between pointer-down and
//! pointer-up, carrying all context needed to compute incremental deltas and
//! commit final document mutations on release. At most one session is active
//! at a time; its lifetime is bounded by pointer capture, so pointer-up or
//! pointer-leave always returns the machine to `Idle`.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::camera::Point;
use crate::doc::{BlockId, BlockKind, FigureShape};
use crate::snap::Guide;

/// Keyboard modifier keys held during a pointer event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button.
    Middle,
    /// Right mouse button.
    Secondary,
}

/// Which resize gesture a handle drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeMode {
    /// Right-edge handle: width only.
    Width,
    /// Bottom-edge handle: height only.
    Height,
    /// Corner handle: width and height vary independently.
    Corner,
    /// Corner handle with aspect lock from the starting size.
    Proportional,
}

/// Internal state for the gesture state machine.
///
/// Each active variant carries the context needed to compute deltas and emit
/// final actions on pointer-up.
#[derive(Debug, Clone, Copy)]
pub enum Session {
    /// No gesture in progress; waiting for the next pointer-down.
    Idle,
    /// The user is panning the canvas by dragging empty background.
    Panning {
        /// Screen-space position of the previous pointer event.
        last_screen: Point,
    },
    /// A palette item is being dragged in; no block exists yet.
    DraggingNew {
        /// Kind of block to create on drop.
        kind: BlockKind,
        /// Palette-selected shape, for figure blocks.
        figure: Option<FigureShape>,
        /// World-space pointer position at the previous event.
        last_world: Point,
    },
    /// An existing block is being moved.
    DraggingExisting {
        /// Id of the block being dragged.
        id: BlockId,
        /// World-space pointer position at the start of the drag.
        start_world: Point,
        /// Block x at the start of the drag, used to snap or revert.
        orig_x: f64,
        /// Block y at the start of the drag, used to snap or revert.
        orig_y: f64,
        /// Page the block started on; snapping aligns against its siblings.
        orig_page: u32,
        /// Current snapped delta, applied to the model only on drop.
        dx: f64,
        /// Current snapped delta, applied to the model only on drop.
        dy: f64,
    },
    /// A block is being resized by one of its handles.
    ResizingBlock {
        /// Id of the block being resized.
        id: BlockId,
        /// Which resize gesture is running.
        mode: ResizeMode,
        /// World-space pointer position at the start of the resize.
        start_world: Point,
        /// Width at the start of the resize.
        orig_w: f64,
        /// Height at the start of the resize.
        orig_h: f64,
    },
}

impl Default for Session {
    fn default() -> Self {
        Self::Idle
    }
}

/// Explicit view state passed alongside the geometry model: which block is
/// selected or hovered, and the smart guides live during a drag. Never
/// ambient globals.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    /// The id of the currently selected block, if any.
    pub selected_id: Option<BlockId>,
    /// The id of the block under the pointer, if any.
    pub hovered_id: Option<BlockId>,
    /// Guide lines for the in-progress move; cleared when the session ends.
    pub guides: Vec<Guide>,
}
