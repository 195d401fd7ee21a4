//! Layout engine for the document-signing template editor.
//!
//! This crate owns the interactive geometry of a multi-page template: the
//! block model, drag-and-drop placement with smart-guide snapping, resizing,
//! z-ordering, page lifecycle, and the read-only reconciler that the editor
//! canvas, the template preview and the signing view all render from. The
//! host layer is responsible only for wiring pointer events to the engine
//! and persisting the resulting [`engine::Action`]s through the storage
//! collaborator.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level [`engine::EngineCore`] and the gesture session manager |
//! | [`doc`] | In-memory document store, block types and wire structure |
//! | [`camera`] | Pan/zoom viewport and coordinate conversions |
//! | [`snap`] | Smart-guide alignment and grid-snap fallback |
//! | [`hit`] | Hit-testing blocks, resize handles and drop targets |
//! | [`input`] | Gesture session state machine and view state |
//! | [`layer`] | Z-order operations on blocks |
//! | [`pages`] | Page add/delete/reorder with block re-assignment |
//! | [`render`] | Pure model → visual tree reconciler |
//! | [`consts`] | Shared numeric constants (zoom limits, snap threshold, page size) |

pub mod camera;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod hit;
pub mod input;
pub mod layer;
pub mod pages;
pub mod render;
pub mod snap;
