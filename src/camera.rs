//! Viewport transform: pan/zoom state and coordinate conversions.
//!
//! The camera maps pointer (screen) coordinates into document coordinates
//! and back. It also owns the page strip layout: pages are laid out as a
//! vertical strip in world space, so each page's origin is plain model state
//! recomputed from its index; the engine never reads positions back from
//! rendered output. Camera changes are purely visual and never touch block
//! data.

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use crate::consts::{
    FOCUS_OFFSET_PX, PAGE_GAP, PAGE_HEIGHT, PAGE_WIDTH, ZOOM_MAX, ZOOM_MIN, ZOOM_STEP,
};

/// A point in either screen or world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// World-space top-left corner of a 1-indexed page.
#[must_use]
pub fn page_origin(page: u32) -> Point {
    let index = f64::from(page.saturating_sub(1));
    Point::new(0.0, index * (PAGE_HEIGHT + PAGE_GAP))
}

/// The page whose background contains `world`, if any. Points in the gaps
/// between pages or outside the page width resolve to `None`.
#[must_use]
pub fn page_at(world: Point, num_pages: u32) -> Option<u32> {
    if world.x < 0.0 || world.x > PAGE_WIDTH {
        return None;
    }
    for page in 1..=num_pages {
        let top = page_origin(page).y;
        if world.y >= top && world.y <= top + PAGE_HEIGHT {
            return Some(page);
        }
    }
    None
}

/// Camera state for pan/zoom over the page strip.
///
/// `pan_x` / `pan_y` are in screen pixels. `zoom` is a scale factor clamped
/// to `[ZOOM_MIN, ZOOM_MAX]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { pan_x: 0.0, pan_y: 0.0, zoom: 1.0 }
    }
}

impl Camera {
    /// Convert a screen-space point (pixels) to world coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.pan_x) / self.zoom,
            y: (screen.y - self.pan_y) / self.zoom,
        }
    }

    /// Convert a world-space point to screen coordinates (pixels).
    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        Point {
            x: world.x * self.zoom + self.pan_x,
            y: world.y * self.zoom + self.pan_y,
        }
    }

    /// Convert a screen-space distance (pixels) to world-space distance.
    #[must_use]
    pub fn screen_dist_to_world(&self, screen_dist: f64) -> f64 {
        screen_dist / self.zoom
    }

    /// Step the zoom in by one increment, clamped to the configured range.
    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom + ZOOM_STEP).clamp(ZOOM_MIN, ZOOM_MAX);
    }

    /// Step the zoom out by one increment, clamped to the configured range.
    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom - ZOOM_STEP).clamp(ZOOM_MIN, ZOOM_MAX);
    }

    /// Reset to identity: zoom 1, no pan. Idempotent.
    pub fn reset_view(&mut self) {
        self.pan_x = 0.0;
        self.pan_y = 0.0;
        self.zoom = 1.0;
    }

    /// Accumulate a pan delta in screen pixels.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    /// Position the viewport so page `page`'s top edge sits a fixed offset
    /// below the viewport top. Informational positioning only: silently does
    /// nothing when `page` is out of range.
    pub fn focus_on_page(&mut self, page: u32, num_pages: u32) {
        if page < 1 || page > num_pages {
            return;
        }
        let top = page_origin(page).y;
        self.pan_y = FOCUS_OFFSET_PX - top * self.zoom;
    }
}
