#![allow(clippy::clone_on_copy, clippy::float_cmp)]

use serde_json::json;

use super::*;
use crate::doc::{FigurePayload, FigureShape, ImagePayload, TablePayload};

// =============================================================
// Helpers
// =============================================================

fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

fn text_block(page: u32, text: &str) -> Block {
    let mut block = Block::new(BlockKind::Text, page);
    block.content = BlockContent::Text(text.to_string());
    block
}

fn store_with(blocks: Vec<Block>, pages: u32) -> DocStore {
    let mut store = DocStore::new();
    for _ in 1..pages {
        store.add_page();
    }
    for block in blocks {
        assert!(store.add_block(block));
    }
    store
}

// =============================================================
// Filtering and ordering
// =============================================================

#[test]
fn only_requested_page_renders() {
    let store = store_with(vec![text_block(1, "a"), text_block(2, "b")], 2);
    let nodes = render_page(&store, 2, RenderMode::Edit, &HashMap::new());
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].content, BlockContent::Text("b".into()));
}

#[test]
fn nodes_sorted_by_effective_z() {
    let mut top = text_block(1, "top");
    top.z_index = Some(9);
    let mut bottom = text_block(1, "bottom");
    bottom.z_index = Some(0);
    let middle = text_block(1, "middle"); // absent z reads as 1
    let store = store_with(vec![top, bottom, middle], 1);
    let nodes = render_page(&store, 1, RenderMode::Edit, &HashMap::new());
    let zs: Vec<i64> = nodes.iter().map(|n| n.z).collect();
    assert_eq!(zs, vec![0, 1, 9]);
}

#[test]
fn z_ties_keep_insertion_order() {
    let first = text_block(1, "first");
    let second = text_block(1, "second");
    let (id_first, id_second) = (first.id, second.id);
    let store = store_with(vec![first, second], 1);
    let nodes = render_page(&store, 1, RenderMode::Edit, &HashMap::new());
    assert_eq!(nodes[0].id, id_first);
    assert_eq!(nodes[1].id, id_second);
}

#[test]
fn unknown_kind_is_skipped() {
    let mut foreign = Block::new(BlockKind::Unknown, 1);
    foreign.content = BlockContent::Opaque(json!({ "weird": true }));
    let store = store_with(vec![foreign, text_block(1, "visible")], 1);
    let nodes = render_page(&store, 1, RenderMode::Edit, &HashMap::new());
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].kind, BlockKind::Text);
}

#[test]
fn empty_page_renders_nothing() {
    let store = store_with(vec![text_block(1, "a")], 2);
    assert!(render_page(&store, 2, RenderMode::Edit, &HashMap::new()).is_empty());
}

// =============================================================
// Size resolution
// =============================================================

#[test]
fn explicit_size_is_passed_through() {
    let mut block = text_block(1, "sized");
    block.w = Some(300.0);
    block.h = Some(80.0);
    let store = store_with(vec![block], 1);
    let nodes = render_page(&store, 1, RenderMode::Edit, &HashMap::new());
    assert_eq!(nodes[0].w, Some(300.0));
    assert_eq!(nodes[0].h, Some(80.0));
}

#[test]
fn intrinsic_text_has_no_resolved_size() {
    let store = store_with(vec![text_block(1, "free")], 1);
    let nodes = render_page(&store, 1, RenderMode::Edit, &HashMap::new());
    assert_eq!(nodes[0].w, None);
    assert_eq!(nodes[0].h, None);
}

#[test]
fn image_defaults_to_200_by_150() {
    let mut image = Block::new(BlockKind::Image, 1);
    image.content = BlockContent::Image(ImagePayload { src: "x.png".into() });
    let store = store_with(vec![image], 1);
    let nodes = render_page(&store, 1, RenderMode::Edit, &HashMap::new());
    assert_eq!(nodes[0].w, Some(200.0));
    assert_eq!(nodes[0].h, Some(150.0));
}

#[test]
fn figure_defaults_to_200_square() {
    let mut figure = Block::new(BlockKind::Figure, 1);
    figure.content = BlockContent::Figure(FigurePayload { shape: FigureShape::Triangle });
    let store = store_with(vec![figure], 1);
    let nodes = render_page(&store, 1, RenderMode::Edit, &HashMap::new());
    assert_eq!(nodes[0].w, Some(200.0));
    assert_eq!(nodes[0].h, Some(200.0));
}

// =============================================================
// Variable substitution
// =============================================================

#[test]
fn edit_mode_keeps_tokens_raw_and_editable() {
    let store = store_with(vec![text_block(1, "Dear {{name}},")], 1);
    let nodes = render_page(&store, 1, RenderMode::Edit, &vars(&[("name", "Ada")]));
    assert_eq!(nodes[0].content, BlockContent::Text("Dear {{name}},".into()));
    assert!(nodes[0].editable);
}

#[test]
fn preview_mode_substitutes_tokens() {
    let store = store_with(vec![text_block(1, "Dear {{name}},")], 1);
    let nodes = render_page(&store, 1, RenderMode::Preview, &vars(&[("name", "Ada")]));
    assert_eq!(nodes[0].content, BlockContent::Text("Dear Ada,".into()));
    assert!(!nodes[0].editable);
}

#[test]
fn signing_mode_substitutes_tokens() {
    let store = store_with(vec![text_block(1, "{{a}}-{{b}}")], 1);
    let nodes = render_page(&store, 1, RenderMode::Signing, &vars(&[("a", "1"), ("b", "2")]));
    assert_eq!(nodes[0].content, BlockContent::Text("1-2".into()));
}

#[test]
fn unresolved_tokens_stay_literal() {
    let store = store_with(vec![text_block(1, "Hi {{missing}}!")], 1);
    let nodes = render_page(&store, 1, RenderMode::Signing, &HashMap::new());
    assert_eq!(nodes[0].content, BlockContent::Text("Hi {{missing}}!".into()));
}

#[test]
fn token_keys_are_whitespace_trimmed() {
    let store = store_with(vec![text_block(1, "{{ name }}")], 1);
    let nodes = render_page(&store, 1, RenderMode::Preview, &vars(&[("name", "Ada")]));
    assert_eq!(nodes[0].content, BlockContent::Text("Ada".into()));
}

#[test]
fn unterminated_token_kept_as_is() {
    let store = store_with(vec![text_block(1, "broken {{name")], 1);
    let nodes = render_page(&store, 1, RenderMode::Preview, &vars(&[("name", "Ada")]));
    assert_eq!(nodes[0].content, BlockContent::Text("broken {{name".into()));
}

#[test]
fn table_cells_are_substituted() {
    let mut table = Block::new(BlockKind::Table, 1);
    table.content = BlockContent::Table(TablePayload {
        rows: vec![vec!["{{item}}".into(), "qty: {{qty}}".into()]],
    });
    let store = store_with(vec![table], 1);
    let nodes = render_page(&store, 1, RenderMode::Signing, &vars(&[("item", "Pen"), ("qty", "3")]));
    let BlockContent::Table(payload) = &nodes[0].content else {
        panic!("expected table content");
    };
    assert_eq!(payload.rows, vec![vec!["Pen".to_string(), "qty: 3".to_string()]]);
}

#[test]
fn date_content_is_substituted() {
    let mut date = Block::new(BlockKind::Date, 1);
    date.content = BlockContent::Date("{{signedAt}}".into());
    let store = store_with(vec![date], 1);
    let nodes = render_page(&store, 1, RenderMode::Signing, &vars(&[("signedAt", "2024-03-01")]));
    assert_eq!(nodes[0].content, BlockContent::Date("2024-03-01".into()));
}

#[test]
fn signature_content_is_never_substituted() {
    let mut sig = Block::new(BlockKind::Signature, 1);
    sig.content = BlockContent::Signature("{{notAVariable}}".into());
    let store = store_with(vec![sig], 1);
    let nodes = render_page(&store, 1, RenderMode::Signing, &vars(&[("notAVariable", "x")]));
    assert_eq!(nodes[0].content, BlockContent::Signature("{{notAVariable}}".into()));
}

// =============================================================
// Purity
// =============================================================

#[test]
fn render_does_not_mutate_the_model() {
    let store = store_with(vec![text_block(1, "Dear {{name}},")], 1);
    let before = store.blocks().to_vec();
    render_page(&store, 1, RenderMode::Signing, &vars(&[("name", "Ada")]));
    assert_eq!(store.blocks(), &before[..]);
}

#[test]
fn style_is_passed_through_verbatim() {
    let mut block = text_block(1, "styled");
    block.style = json!({ "color": "#222", "font": "serif" });
    let store = store_with(vec![block], 1);
    let nodes = render_page(&store, 1, RenderMode::Edit, &HashMap::new());
    assert_eq!(nodes[0].style, json!({ "color": "#222", "font": "serif" }));
}
