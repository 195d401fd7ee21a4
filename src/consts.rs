//! Shared numeric constants for the layout engine.

// ── Viewport ────────────────────────────────────────────────────

/// Smallest allowed zoom factor.
pub const ZOOM_MIN: f64 = 0.5;

/// Largest allowed zoom factor.
pub const ZOOM_MAX: f64 = 2.0;

/// Zoom step applied by one zoom-in / zoom-out action.
pub const ZOOM_STEP: f64 = 0.1;

/// Screen-space offset from the viewport top to a focused page's top edge.
pub const FOCUS_OFFSET_PX: f64 = 24.0;

// ── Page layout ─────────────────────────────────────────────────

/// Page width in document units (A4 at 96 DPI).
pub const PAGE_WIDTH: f64 = 794.0;

/// Page height in document units (A4 at 96 DPI).
pub const PAGE_HEIGHT: f64 = 1123.0;

/// Vertical gap between consecutive pages in document units.
pub const PAGE_GAP: f64 = 40.0;

// ── Snapping ────────────────────────────────────────────────────

/// Distance within which an edge/center alignment counts as a match.
pub const SNAP_THRESHOLD: f64 = 5.0;

/// Grid pitch used when no smart-guide match is found.
pub const GRID_STEP: f64 = 20.0;

// ── Hit-testing ─────────────────────────────────────────────────

/// Screen-space hit slop in pixels for resize handles.
pub const HANDLE_RADIUS_PX: f64 = 8.0;

// ── Block sizing ────────────────────────────────────────────────

/// Minimum side length when resizing an image or figure block.
pub const MIN_MEDIA_SIDE: f64 = 50.0;

/// Minimum width when resizing any other block kind.
pub const MIN_BLOCK_WIDTH: f64 = 60.0;

/// Minimum height when resizing any other block kind.
pub const MIN_BLOCK_HEIGHT: f64 = 30.0;

/// Default render size for an image block with no explicit size.
pub const IMAGE_DEFAULT_SIZE: (f64, f64) = (200.0, 150.0);

/// Default render size for a figure block with no explicit size.
pub const FIGURE_DEFAULT_SIZE: (f64, f64) = (200.0, 200.0);

/// Assumed extent of an intrinsically sized text-like block, used only by
/// the snap heuristic.
pub const SNAP_EXTENT_TEXT: f64 = 50.0;

/// Assumed extent of an intrinsically sized image block for the snap heuristic.
pub const SNAP_EXTENT_IMAGE: f64 = 150.0;

/// Assumed extent of an intrinsically sized figure block for the snap heuristic.
pub const SNAP_EXTENT_FIGURE: f64 = 100.0;
