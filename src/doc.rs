//! Document model: blocks, typed content payloads, and the in-memory store.
//!
//! This module defines the core data types that describe what is on a
//! template page (`Block`, `BlockKind`, `BlockContent`), a sparse-update type
//! for incremental edits (`PartialBlock`), the wire-format structure exchanged
//! with the storage collaborator (`TemplateStructure`, `WireBlock`), and the
//! runtime store that owns all live blocks (`DocStore`).
//!
//! Data flows into this layer once at editor mount (JSON deserialization via
//! [`TemplateStructure`]) and from the gesture engine (mutations). The render
//! reconciler reads blocks per page to determine draw order. Blocks are kept
//! in insertion order because the snap engine scans them in collection order.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Unique identifier for a block.
pub type BlockId = Uuid;

/// The kind of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    /// Free text, intrinsically sized.
    Text,
    /// Date field, intrinsically sized.
    Date,
    /// Signature field filled in by a signer.
    Signature,
    /// Table with rows of text cells.
    Table,
    /// Raster image referenced by source URL.
    Image,
    /// Vector figure (rectangle, circle, triangle).
    Figure,
    /// Horizontal separator rule.
    Separator,
    /// Any kind this engine does not understand. Its content survives
    /// load/save verbatim; the renderer skips it.
    #[serde(other)]
    Unknown,
}

/// Shape carried by a figure block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FigureShape {
    #[default]
    Rectangle,
    Circle,
    Triangle,
}

/// Structured payload of a table block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TablePayload {
    /// Row-major text cells.
    pub rows: Vec<Vec<String>>,
}

impl Default for TablePayload {
    /// The documented fallback payload: a 2×2 grid of empty cells.
    fn default() -> Self {
        Self { rows: vec![vec![String::new(); 2]; 2] }
    }
}

/// Structured payload of an image block.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImagePayload {
    /// Image source URL. Empty when the image has not been uploaded yet.
    #[serde(default)]
    pub src: String,
}

/// Structured payload of a figure block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FigurePayload {
    #[serde(default)]
    pub shape: FigureShape,
}

/// Typed per-kind content, replacing the source's JSON-in-a-string payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum BlockContent {
    Text(String),
    Date(String),
    Signature(String),
    Table(TablePayload),
    Image(ImagePayload),
    Figure(FigurePayload),
    Separator,
    /// Opaque content of an [`BlockKind::Unknown`] block, kept verbatim.
    Opaque(Value),
}

impl BlockContent {
    /// The default content for a freshly created block of `kind`.
    #[must_use]
    pub fn default_for(kind: BlockKind) -> Self {
        match kind {
            BlockKind::Text => Self::Text(String::new()),
            BlockKind::Date => Self::Date(String::new()),
            BlockKind::Signature => Self::Signature(String::new()),
            BlockKind::Table => Self::Table(TablePayload::default()),
            BlockKind::Image => Self::Image(ImagePayload::default()),
            BlockKind::Figure => Self::Figure(FigurePayload::default()),
            BlockKind::Separator => Self::Separator,
            BlockKind::Unknown => Self::Opaque(Value::Null),
        }
    }

    /// Build typed content from a raw wire value.
    ///
    /// Accepts both structured payloads and the legacy form where the
    /// structure is JSON re-encoded inside a string. A missing value yields
    /// the kind default silently; a malformed one falls back to the same
    /// default with a warning. Never fails.
    #[must_use]
    pub fn from_wire(kind: BlockKind, raw: Option<&Value>) -> Self {
        let Some(raw) = raw else {
            return Self::default_for(kind);
        };
        match kind {
            BlockKind::Text => Self::Text(raw.as_str().unwrap_or_default().to_string()),
            BlockKind::Date => Self::Date(raw.as_str().unwrap_or_default().to_string()),
            BlockKind::Signature => Self::Signature(raw.as_str().unwrap_or_default().to_string()),
            BlockKind::Table => Self::Table(parse_payload(kind, raw)),
            BlockKind::Image => Self::Image(parse_payload(kind, raw)),
            BlockKind::Figure => Self::Figure(parse_payload(kind, raw)),
            BlockKind::Separator => Self::Separator,
            BlockKind::Unknown => Self::Opaque(raw.clone()),
        }
    }

    /// Serialize content back to its wire value.
    #[must_use]
    pub fn to_wire(&self) -> Value {
        match self {
            Self::Text(s) | Self::Date(s) | Self::Signature(s) => Value::String(s.clone()),
            Self::Table(p) => serde_json::to_value(p).unwrap_or(Value::Null),
            Self::Image(p) => serde_json::to_value(p).unwrap_or(Value::Null),
            Self::Figure(p) => serde_json::to_value(p).unwrap_or(Value::Null),
            Self::Separator => Value::Null,
            Self::Opaque(v) => v.clone(),
        }
    }
}

/// Parse a structured payload, unwrapping the legacy string encoding when
/// present and recovering to the documented default on malformed input.
fn parse_payload<T>(kind: BlockKind, raw: &Value) -> T
where
    T: serde::de::DeserializeOwned + Default,
{
    let attempt = match raw {
        Value::String(encoded) => serde_json::from_str(encoded),
        other => serde_json::from_value(other.clone()),
    };
    match attempt {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!(error = %e, ?kind, "malformed content payload, using default");
            T::default()
        }
    }
}

/// A positioned block on one page of the template.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// Unique identifier, stable for the document's lifetime.
    pub id: BlockId,
    /// Kind of visual element.
    pub kind: BlockKind,
    /// Left edge in page-local document units. Never negative.
    pub x: f64,
    /// Top edge in page-local document units. Never negative.
    pub y: f64,
    /// Explicit width; `None` means intrinsic sizing or the kind default.
    pub w: Option<f64>,
    /// Explicit height; `None` means intrinsic sizing or the kind default.
    pub h: Option<f64>,
    /// 1-indexed page number, always within `[1, num_pages]`.
    pub page: u32,
    /// Stacking order; absent reads as 1. Neither unique nor contiguous.
    pub z_index: Option<i64>,
    /// Presentation attributes, fully opaque to the geometry engine.
    pub style: Value,
    /// Typed per-kind payload.
    pub content: BlockContent,
}

impl Block {
    /// Create a block of `kind` at the page origin with default content.
    #[must_use]
    pub fn new(kind: BlockKind, page: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            x: 0.0,
            y: 0.0,
            w: None,
            h: None,
            page,
            z_index: None,
            style: Value::Null,
            content: BlockContent::default_for(kind),
        }
    }

    /// Effective stacking order: explicit `z_index`, else 1.
    #[must_use]
    pub fn effective_z(&self) -> i64 {
        self.z_index.unwrap_or(1)
    }
}

/// Sparse update for a block. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialBlock {
    /// New x position, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    /// New y position, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    /// New explicit width, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub w: Option<f64>,
    /// New explicit height, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub h: Option<f64>,
    /// New page assignment, if being updated. Must be within range or the
    /// whole update is rejected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// New stacking order, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i64>,
    /// Replacement style blob, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<Value>,
    /// Replacement content, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<BlockContent>,
}

/// A block as serialized on the wire. `content` stays a raw JSON value so a
/// malformed payload degrades to a default instead of failing the load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireBlock {
    pub id: BlockId,
    pub kind: BlockKind,
    pub x: f64,
    pub y: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub w: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub h: Option<f64>,
    pub page: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i64>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub style: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
}

impl From<&Block> for WireBlock {
    fn from(block: &Block) -> Self {
        let content = block.content.to_wire();
        Self {
            id: block.id,
            kind: block.kind,
            x: block.x,
            y: block.y,
            w: block.w,
            h: block.h,
            page: block.page,
            z_index: block.z_index,
            style: block.style.clone(),
            content: if content.is_null() { None } else { Some(content) },
        }
    }
}

impl From<WireBlock> for Block {
    fn from(wire: WireBlock) -> Self {
        Self {
            id: wire.id,
            kind: wire.kind,
            x: wire.x.max(0.0),
            y: wire.y.max(0.0),
            w: wire.w,
            h: wire.h,
            page: wire.page,
            z_index: wire.z_index,
            style: wire.style,
            content: BlockContent::from_wire(wire.kind, wire.content.as_ref()),
        }
    }
}

/// The persisted unit exchanged with the storage collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateStructure {
    #[serde(default)]
    pub blocks: Vec<WireBlock>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<Value>,
}

/// Error surfaced at the JSON load/save boundary. Everything past this point
/// recovers locally.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("malformed template structure: {0}")]
    Json(#[from] serde_json::Error),
}

impl TemplateStructure {
    /// Parse a structure from the storage collaborator's JSON.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Json`] when the document is not valid JSON or
    /// does not match the structure shape. Malformed *content payloads*
    /// inside otherwise valid blocks do not fail the load; they fall back to
    /// kind defaults during [`DocStore::load`].
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the structure for the storage collaborator.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, LoadError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// In-memory store of blocks plus the page count.
///
/// Blocks are kept in insertion order; the snap engine's first-match scan is
/// defined over that order.
#[derive(Debug, Clone)]
pub struct DocStore {
    pub(crate) blocks: Vec<Block>,
    pub(crate) num_pages: u32,
    settings: Option<Value>,
}

impl DocStore {
    /// Create an empty single-page store.
    #[must_use]
    pub fn new() -> Self {
        Self { blocks: Vec::new(), num_pages: 1, settings: None }
    }

    /// Replace all state from a loaded structure.
    ///
    /// When `num_pages` is not supplied it is derived as the highest page any
    /// block references, minimum 1.
    pub fn load(&mut self, structure: TemplateStructure, num_pages: Option<u32>) {
        self.settings = structure.settings;
        self.blocks = structure.blocks.into_iter().map(Block::from).collect();
        let derived = self.blocks.iter().map(|b| b.page).max().unwrap_or(1).max(1);
        self.num_pages = num_pages.unwrap_or(derived).max(derived);
    }

    /// Serialize the current state back into the persisted shape.
    #[must_use]
    pub fn to_structure(&self) -> TemplateStructure {
        TemplateStructure {
            blocks: self.blocks.iter().map(WireBlock::from).collect(),
            settings: self.settings.clone(),
        }
    }

    /// Append a block. Rejected (returns `false`) when its page is outside
    /// `[1, num_pages]`.
    pub fn add_block(&mut self, block: Block) -> bool {
        if block.page < 1 || block.page > self.num_pages {
            tracing::debug!(block_id = %block.id, page = block.page, num_pages = self.num_pages, "block placement rejected");
            return false;
        }
        self.blocks.push(block);
        true
    }

    /// Apply a sparse update to an existing block.
    ///
    /// `x`/`y` are clamped to `>= 0`. An update naming a page outside
    /// `[1, num_pages]` is rejected whole. Returns `false` when nothing was
    /// applied.
    pub fn update_block(&mut self, id: &BlockId, partial: &PartialBlock) -> bool {
        let num_pages = self.num_pages;
        let Some(block) = self.blocks.iter_mut().find(|b| b.id == *id) else {
            return false;
        };
        if let Some(page) = partial.page {
            if page < 1 || page > num_pages {
                tracing::debug!(block_id = %id, page, num_pages, "block update rejected");
                return false;
            }
            block.page = page;
        }
        if let Some(x) = partial.x {
            block.x = x.max(0.0);
        }
        if let Some(y) = partial.y {
            block.y = y.max(0.0);
        }
        if let Some(w) = partial.w {
            block.w = Some(w);
        }
        if let Some(h) = partial.h {
            block.h = Some(h);
        }
        if let Some(z) = partial.z_index {
            block.z_index = Some(z);
        }
        if let Some(ref style) = partial.style {
            block.style = style.clone();
        }
        if let Some(ref content) = partial.content {
            block.content = content.clone();
        }
        true
    }

    /// Remove a block by id, returning it if it was present.
    pub fn delete_block(&mut self, id: &BlockId) -> Option<Block> {
        let index = self.blocks.iter().position(|b| b.id == *id)?;
        Some(self.blocks.remove(index))
    }

    /// Return a reference to a block by id.
    #[must_use]
    pub fn get(&self, id: &BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == *id)
    }

    /// All blocks in insertion order.
    #[must_use]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Blocks assigned to `page`, in insertion order.
    pub fn blocks_on_page(&self, page: u32) -> impl Iterator<Item = &Block> {
        self.blocks.iter().filter(move |b| b.page == page)
    }

    /// Current page count. Always at least 1.
    #[must_use]
    pub fn num_pages(&self) -> u32 {
        self.num_pages
    }

    /// Number of blocks currently in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Returns `true` if the store contains no blocks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl Default for DocStore {
    fn default() -> Self {
        Self::new()
    }
}
