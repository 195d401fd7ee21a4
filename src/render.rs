//! Render reconciler: maps the document model to a positioned visual tree.
//!
//! A pure function of the model: no mutation, no host dependency. The same
//! reconciliation backs all three presentation contexts: the editor canvas
//! (editable, raw tokens), the template preview, and the signing view (both
//! read-only, with `{{key}}` variable substitution). Hosts walk the returned
//! nodes bottom-to-top and draw them however they like.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::collections::HashMap;

use serde_json::Value;

use crate::consts::{FIGURE_DEFAULT_SIZE, IMAGE_DEFAULT_SIZE};
use crate::doc::{Block, BlockContent, BlockId, BlockKind, DocStore};

/// Which presentation context is rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Editor canvas: blocks are editable, tokens stay raw.
    Edit,
    /// Template preview: read-only, tokens substituted.
    Preview,
    /// Signing canvas: read-only, tokens substituted.
    Signing,
}

/// One positioned element of the visual tree.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderNode {
    pub id: BlockId,
    pub kind: BlockKind,
    /// Page-local position.
    pub x: f64,
    /// Page-local position.
    pub y: f64,
    /// Resolved width; `None` means the host sizes it intrinsically.
    pub w: Option<f64>,
    /// Resolved height; `None` means the host sizes it intrinsically.
    pub h: Option<f64>,
    /// Effective stacking order (absent `z_index` reads as 1).
    pub z: i64,
    /// Opaque presentation attributes, passed through verbatim.
    pub style: Value,
    /// Content with variables resolved per the render mode.
    pub content: BlockContent,
    /// Whether the host should attach edit affordances.
    pub editable: bool,
}

/// Resolved size for a block: explicit `w`/`h`, else the kind default for
/// media blocks, else intrinsic (`None`).
fn resolved_size(block: &Block) -> (Option<f64>, Option<f64>) {
    let default = match block.kind {
        BlockKind::Image => Some(IMAGE_DEFAULT_SIZE),
        BlockKind::Figure => Some(FIGURE_DEFAULT_SIZE),
        _ => None,
    };
    match default {
        Some((dw, dh)) => (Some(block.w.unwrap_or(dw)), Some(block.h.unwrap_or(dh))),
        None => (block.w, block.h),
    }
}

/// Replace `{{key}}` tokens from `vars`. Unresolved tokens stay literal;
/// keys are matched purely syntactically (inner whitespace trimmed), never
/// validated against any registry.
fn substitute(input: &str, vars: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let key = after[..end].trim();
                match vars.get(key) {
                    Some(value) => out.push_str(value),
                    None => out.push_str(&rest[start..start + end + 4]),
                }
                rest = &after[end + 2..];
            }
            None => {
                // Unterminated token: keep the tail as-is.
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Resolve content for the given mode: substitution applies to text-bearing
/// payloads in the read-only contexts, never in the editor.
fn resolve_content(content: &BlockContent, mode: RenderMode, vars: &HashMap<String, String>) -> BlockContent {
    if mode == RenderMode::Edit {
        return content.clone();
    }
    match content {
        BlockContent::Text(s) => BlockContent::Text(substitute(s, vars)),
        BlockContent::Date(s) => BlockContent::Date(substitute(s, vars)),
        BlockContent::Table(p) => {
            let rows = p
                .rows
                .iter()
                .map(|row| row.iter().map(|cell| substitute(cell, vars)).collect())
                .collect();
            BlockContent::Table(crate::doc::TablePayload { rows })
        }
        other => other.clone(),
    }
}

/// Produce the visual tree for one page: blocks filtered by page, painted in
/// z-order (insertion order breaking ties), unknown kinds skipped.
#[must_use]
pub fn render_page(
    doc: &DocStore,
    page: u32,
    mode: RenderMode,
    vars: &HashMap<String, String>,
) -> Vec<RenderNode> {
    let mut nodes: Vec<RenderNode> = doc
        .blocks_on_page(page)
        .filter(|b| b.kind != BlockKind::Unknown)
        .map(|b| {
            let (w, h) = resolved_size(b);
            RenderNode {
                id: b.id,
                kind: b.kind,
                x: b.x,
                y: b.y,
                w,
                h,
                z: b.effective_z(),
                style: b.style.clone(),
                content: resolve_content(&b.content, mode, vars),
                editable: mode == RenderMode::Edit,
            }
        })
        .collect();
    nodes.sort_by_key(|n| n.z);
    nodes
}
