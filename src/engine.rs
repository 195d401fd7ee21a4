//! Engine core: the gesture session manager and mutation surface.
//!
//! `EngineCore` owns the document store, the camera, the explicit view
//! state, and the active gesture session. The host wires pointer events to
//! `on_pointer_down` / `on_pointer_move` / `on_pointer_up` /
//! `on_pointer_leave` and processes the returned [`Action`]s (typically by
//! queueing them for the save endpoint and repainting). All of this is
//! single-threaded and synchronous; at most one session is active at a time,
//! bounded by pointer capture.
//!
//! Move gestures keep their provisional (snapped) delta in the session and
//! only touch the model on a valid drop, so a cancelled drag is a true
//! no-op. Resize gestures mutate live and emit one final sparse update on
//! release; there is no cancel path for resize.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use crate::camera::{Camera, Point, page_origin};
use crate::consts::{
    FIGURE_DEFAULT_SIZE, IMAGE_DEFAULT_SIZE, MIN_BLOCK_HEIGHT, MIN_BLOCK_WIDTH, MIN_MEDIA_SIDE,
};
use crate::doc::{
    Block, BlockContent, BlockId, BlockKind, DocStore, FigurePayload, FigureShape, PartialBlock,
    TemplateStructure,
};
use crate::hit::{self, HitPart};
use crate::input::{Button, Modifiers, ResizeMode, Session, ViewState};
use crate::snap;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone)]
pub enum Action {
    BlockCreated(Block),
    BlockUpdated { id: BlockId, fields: PartialBlock },
    BlockDeleted { id: BlockId },
    RenderNeeded,
}

/// Minimum size a resize gesture may produce for `kind`.
fn min_size(kind: BlockKind) -> (f64, f64) {
    match kind {
        BlockKind::Image | BlockKind::Figure => (MIN_MEDIA_SIDE, MIN_MEDIA_SIDE),
        _ => (MIN_BLOCK_WIDTH, MIN_BLOCK_HEIGHT),
    }
}

/// Starting size for a resize: explicit size, else the kind default for
/// media, else the minimum footprint for intrinsically sized kinds.
fn resize_base(block: &Block) -> (f64, f64) {
    let (dw, dh) = match block.kind {
        BlockKind::Image => IMAGE_DEFAULT_SIZE,
        BlockKind::Figure => FIGURE_DEFAULT_SIZE,
        _ => (MIN_BLOCK_WIDTH, MIN_BLOCK_HEIGHT),
    };
    (block.w.unwrap_or(dw), block.h.unwrap_or(dh))
}

/// Core engine state: document, camera, view state, and the active session.
#[derive(Debug, Default)]
pub struct EngineCore {
    pub doc: DocStore,
    pub camera: Camera,
    pub view: ViewState,
    pub session: Session,
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Data boundary ---

    /// Hydrate the document from the storage collaborator's structure.
    ///
    /// `num_pages` may be supplied by the caller; otherwise it is derived
    /// from the highest page any block references.
    pub fn load_template(&mut self, structure: TemplateStructure, num_pages: Option<u32>) {
        self.doc.load(structure, num_pages);
        self.view = ViewState::default();
        self.session = Session::Idle;
    }

    /// Serialize the in-memory model for the save endpoint, verbatim.
    #[must_use]
    pub fn save_template(&self) -> TemplateStructure {
        self.doc.to_structure()
    }

    // --- Selection ---

    /// Set or clear the selected block.
    pub fn select(&mut self, id: Option<BlockId>) {
        self.view.selected_id = id;
    }

    /// Set or clear the hovered block.
    pub fn hover(&mut self, id: Option<BlockId>) {
        self.view.hovered_id = id;
    }

    /// The currently selected block, if any.
    #[must_use]
    pub fn selection(&self) -> Option<BlockId> {
        self.view.selected_id
    }

    /// Look up a block by id.
    #[must_use]
    pub fn block(&self, id: &BlockId) -> Option<&Block> {
        self.doc.get(id)
    }

    /// Delete the selected block, if any.
    pub fn delete_selected(&mut self) -> Vec<Action> {
        let Some(id) = self.view.selected_id.take() else {
            return Vec::new();
        };
        match self.doc.delete_block(&id) {
            Some(_) => vec![Action::BlockDeleted { id }, Action::RenderNeeded],
            None => Vec::new(),
        }
    }

    // --- Viewport ---

    pub fn zoom_in(&mut self) {
        self.camera.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.camera.zoom_out();
    }

    pub fn reset_view(&mut self) {
        self.camera.reset_view();
    }

    /// Scroll page `page` to the top of the viewport. Out-of-range pages are
    /// ignored.
    pub fn focus_on_page(&mut self, page: u32) {
        self.camera.focus_on_page(page, self.doc.num_pages());
    }

    // --- Layering ---

    pub fn bring_to_front(&mut self, id: &BlockId) -> Vec<Action> {
        Self::z_actions(*id, self.doc.bring_to_front(id))
    }

    pub fn send_to_back(&mut self, id: &BlockId) -> Vec<Action> {
        Self::z_actions(*id, self.doc.send_to_back(id))
    }

    pub fn move_forward(&mut self, id: &BlockId) -> Vec<Action> {
        Self::z_actions(*id, self.doc.move_forward(id))
    }

    pub fn move_backward(&mut self, id: &BlockId) -> Vec<Action> {
        Self::z_actions(*id, self.doc.move_backward(id))
    }

    fn z_actions(id: BlockId, new_z: Option<i64>) -> Vec<Action> {
        match new_z {
            Some(z) => {
                let fields = PartialBlock { z_index: Some(z), ..Default::default() };
                vec![Action::BlockUpdated { id, fields }, Action::RenderNeeded]
            }
            None => Vec::new(),
        }
    }

    // --- Pages ---

    pub fn add_page(&mut self) -> Vec<Action> {
        self.doc.add_page();
        vec![Action::RenderNeeded]
    }

    pub fn delete_page(&mut self, n: u32) -> Vec<Action> {
        if self.doc.delete_page(n) {
            vec![Action::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    pub fn move_page(&mut self, from: u32, to: u32) -> Vec<Action> {
        if self.doc.move_page(from, to) {
            vec![Action::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    // --- Gestures ---

    /// Start dragging a new block in from the palette. `figure` carries the
    /// palette-selected shape for figure blocks.
    pub fn begin_palette_drag(&mut self, kind: BlockKind, figure: Option<FigureShape>, screen_pt: Point) {
        let last_world = self.camera.screen_to_world(screen_pt);
        self.session = Session::DraggingNew { kind, figure, last_world };
    }

    /// Pointer-down: route to a resize handle, a block body, or panning.
    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        if button != Button::Primary || !matches!(self.session, Session::Idle) {
            return Vec::new();
        }
        let world = self.camera.screen_to_world(screen_pt);
        match hit::hit_test(world, &self.doc, &self.camera, self.view.selected_id) {
            Some(hit) => match hit.part {
                HitPart::Handle(mode) => self.begin_resize(hit.block_id, mode, world, modifiers),
                HitPart::Body => self.begin_move(hit.block_id, world),
            },
            None => {
                self.view.selected_id = None;
                self.session = Session::Panning { last_screen: screen_pt };
                vec![Action::RenderNeeded]
            }
        }
    }

    fn begin_move(&mut self, id: BlockId, world: Point) -> Vec<Action> {
        let Some(block) = self.doc.get(&id) else {
            return Vec::new();
        };
        self.view.selected_id = Some(id);
        self.session = Session::DraggingExisting {
            id,
            start_world: world,
            orig_x: block.x,
            orig_y: block.y,
            orig_page: block.page,
            dx: 0.0,
            dy: 0.0,
        };
        vec![Action::RenderNeeded]
    }

    fn begin_resize(&mut self, id: BlockId, mode: ResizeMode, world: Point, modifiers: Modifiers) -> Vec<Action> {
        let Some(block) = self.doc.get(&id) else {
            return Vec::new();
        };
        let (orig_w, orig_h) = resize_base(block);
        let mode = if mode == ResizeMode::Corner && modifiers.shift {
            ResizeMode::Proportional
        } else {
            mode
        };
        self.session = Session::ResizingBlock { id, mode, start_world: world, orig_w, orig_h };
        vec![Action::RenderNeeded]
    }

    /// Pointer-move: advance the active session.
    pub fn on_pointer_move(&mut self, screen_pt: Point, _modifiers: Modifiers) -> Vec<Action> {
        match self.session {
            Session::Idle => Vec::new(),
            Session::Panning { last_screen } => {
                self.camera.pan_by(screen_pt.x - last_screen.x, screen_pt.y - last_screen.y);
                self.session = Session::Panning { last_screen: screen_pt };
                vec![Action::RenderNeeded]
            }
            Session::DraggingNew { kind, figure, .. } => {
                let last_world = self.camera.screen_to_world(screen_pt);
                self.session = Session::DraggingNew { kind, figure, last_world };
                vec![Action::RenderNeeded]
            }
            Session::DraggingExisting { id, start_world, orig_x, orig_y, orig_page, .. } => {
                let world = self.camera.screen_to_world(screen_pt);
                let raw_dx = world.x - start_world.x;
                let raw_dy = world.y - start_world.y;
                let result = match self.doc.get(&id) {
                    Some(active) => {
                        let neighbors: Vec<&Block> =
                            self.doc.blocks_on_page(orig_page).filter(|b| b.id != id).collect();
                        snap::snap_move(active, raw_dx, raw_dy, neighbors)
                    }
                    // Block vanished mid-gesture (e.g. reloaded template);
                    // keep the session consistent with a plain grid snap.
                    None => snap::snap_to_grid(raw_dx, raw_dy),
                };
                let (dx, dy) = (result.dx, result.dy);
                self.view.guides = result.guides;
                self.session =
                    Session::DraggingExisting { id, start_world, orig_x, orig_y, orig_page, dx, dy };
                vec![Action::RenderNeeded]
            }
            Session::ResizingBlock { id, mode, start_world, orig_w, orig_h } => {
                let world = self.camera.screen_to_world(screen_pt);
                let (w, h) = Self::resized(
                    mode,
                    orig_w,
                    orig_h,
                    world.x - start_world.x,
                    world.y - start_world.y,
                );
                let kind = match self.doc.get(&id) {
                    Some(block) => block.kind,
                    None => return self.end_session(),
                };
                let (min_w, min_h) = min_size(kind);
                let fields = PartialBlock {
                    w: Some(w.max(min_w)),
                    h: Some(h.max(min_h)),
                    ..Default::default()
                };
                self.doc.update_block(&id, &fields);
                vec![Action::RenderNeeded]
            }
        }
    }

    /// New width/height before flooring, per resize mode.
    fn resized(mode: ResizeMode, orig_w: f64, orig_h: f64, dx: f64, dy: f64) -> (f64, f64) {
        match mode {
            ResizeMode::Width => (orig_w + dx, orig_h),
            ResizeMode::Height => (orig_w, orig_h + dy),
            ResizeMode::Corner => (orig_w + dx, orig_h + dy),
            ResizeMode::Proportional => {
                // The dominant pointer axis drives; the other follows the
                // starting aspect ratio.
                let aspect = orig_w / orig_h;
                if dx.abs() >= dy.abs() {
                    let w = orig_w + dx;
                    (w, w / aspect)
                } else {
                    let h = orig_h + dy;
                    (h * aspect, h)
                }
            }
        }
    }

    /// Pointer-up: commit or cancel the active session.
    pub fn on_pointer_up(&mut self, screen_pt: Point, _button: Button, _modifiers: Modifiers) -> Vec<Action> {
        let world = self.camera.screen_to_world(screen_pt);
        match self.session {
            Session::Idle => Vec::new(),
            Session::Panning { .. } => self.end_session(),
            Session::DraggingNew { kind, figure, .. } => {
                let mut actions = self.drop_new(kind, figure, world);
                actions.extend(self.end_session());
                actions
            }
            Session::DraggingExisting { id, orig_x, orig_y, orig_page, dx, dy, .. } => {
                let mut actions = self.drop_existing(id, orig_x, orig_y, orig_page, dx, dy, world);
                actions.extend(self.end_session());
                actions
            }
            Session::ResizingBlock { id, .. } => {
                let mut actions = self.commit_resize(id);
                actions.extend(self.end_session());
                actions
            }
        }
    }

    /// Pointer-leave: the session must always terminate, otherwise the
    /// editor is left in a stuck state. Move gestures are discarded; an
    /// in-progress resize commits its current size.
    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        match self.session {
            Session::Idle => Vec::new(),
            Session::ResizingBlock { id, .. } => {
                let mut actions = self.commit_resize(id);
                actions.extend(self.end_session());
                actions
            }
            _ => self.end_session(),
        }
    }

    /// Clear the gesture state and guides.
    fn end_session(&mut self) -> Vec<Action> {
        self.session = Session::Idle;
        self.view.guides.clear();
        vec![Action::RenderNeeded]
    }

    /// Commit a palette drop: create the block page-locally at the drop
    /// point, grid-snapped, intrinsically sized.
    fn drop_new(&mut self, kind: BlockKind, figure: Option<FigureShape>, world: Point) -> Vec<Action> {
        let Some(target) = hit::drop_target(world, &self.doc, None) else {
            tracing::debug!(?kind, "palette drop outside any page, discarded");
            return Vec::new();
        };
        let page = target.page();
        let origin = page_origin(page);
        let snapped = snap::snap_to_grid(world.x - origin.x, world.y - origin.y);
        let mut block = Block::new(kind, page);
        block.x = snapped.dx.max(0.0);
        block.y = snapped.dy.max(0.0);
        if let Some(shape) = figure {
            block.content = BlockContent::Figure(FigurePayload { shape });
        }
        let created = block.clone();
        if !self.doc.add_block(block) {
            return Vec::new();
        }
        self.view.selected_id = Some(created.id);
        vec![Action::BlockCreated(created)]
    }

    /// Commit a move drop: same-page applies the snapped delta; a different
    /// page re-bases the position on the new page's origin.
    #[allow(clippy::too_many_arguments)]
    fn drop_existing(
        &mut self,
        id: BlockId,
        orig_x: f64,
        orig_y: f64,
        orig_page: u32,
        dx: f64,
        dy: f64,
        world: Point,
    ) -> Vec<Action> {
        let Some(target) = hit::drop_target(world, &self.doc, Some(id)) else {
            tracing::debug!(block_id = %id, "drop outside any page, move discarded");
            return Vec::new();
        };
        let page = target.page();
        let fields = if page == orig_page {
            PartialBlock { x: Some(orig_x + dx), y: Some(orig_y + dy), ..Default::default() }
        } else {
            // Re-base on the new page's origin rather than carrying the
            // cumulative global delta.
            let from = page_origin(orig_page);
            let to = page_origin(page);
            PartialBlock {
                x: Some(from.x + orig_x + dx - to.x),
                y: Some(from.y + orig_y + dy - to.y),
                page: Some(page),
                ..Default::default()
            }
        };
        if !self.doc.update_block(&id, &fields) {
            return Vec::new();
        }
        vec![Action::BlockUpdated { id, fields }]
    }

    /// Emit the final size of a live-updated resize.
    fn commit_resize(&mut self, id: BlockId) -> Vec<Action> {
        let Some(block) = self.doc.get(&id) else {
            return Vec::new();
        };
        if block.w.is_none() && block.h.is_none() {
            // Pointer never moved; nothing to report.
            return Vec::new();
        }
        let fields = PartialBlock { w: block.w, h: block.h, ..Default::default() };
        vec![Action::BlockUpdated { id, fields }]
    }
}
