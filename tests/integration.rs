//! Integration tests for the editing core.
//!
//! These exercise the full path from template JSON to pixel scene and back
//! through interaction. They verify:
//! - validation aborts before any visible state changes
//! - physical → pixel resolution matches the DPI math
//! - drag deltas are correct under an active scale transform
//! - snap-on-drop picks the nearest corner only when fully out of page
//! - locked elements can never enter the selection state
//! - pagination clamps at both bounds

use futures::executor::block_on;
use galley::fetch::StaticSource;
use galley::model::BackgroundSpec;
use galley::scene::Visual;
use galley::{
    Editor, EditorEvent, ElementSpec, MeasureSpec, NodeId, PageSpec, Point, TemplateSpec, Viewport,
};
use serde_json::json;

// ─── Helpers ────────────────────────────────────────────────────

/// The sample business-card template: 85×55 mm at 300 dpi, two sides.
fn sample_template() -> TemplateSpec {
    TemplateSpec {
        props: Some(json!({ "title": "Sample template 85x55mm — 2 sides" })),
        measure: Some(MeasureSpec {
            unit: galley::measure::Unit::Mm,
            dpi: 300.0,
            width: 85.0,
            height: 55.0,
            bleed: 5.0,
            cut: 3.0,
        }),
        pages: Some(vec![
            PageSpec {
                background: BackgroundSpec {
                    color: Some("#dddddd".into()),
                    image: None,
                },
                elements: vec![
                    ElementSpec::text(15.0, 10.0, "Sample text", 21.0),
                    ElementSpec::image(30.0, 40.0, 25.0, 13.0, "image/sample-1.png"),
                    ElementSpec::vector(6.0, 6.0, 73.0, 12.0, "shape/streak.svg"),
                ],
            },
            PageSpec {
                background: BackgroundSpec {
                    color: Some("#ea7c7c".into()),
                    image: Some("background/sample-2.jpg".into()),
                },
                elements: vec![ElementSpec::text(6.0, 6.0, "Back side", 21.0)],
            },
        ]),
    }
}

/// A pixel-friendly document: 10×6 in at 100 dpi → a 1000×600 px page with
/// one 200×100 px image at (100, 100).
fn px_template(locked: bool) -> TemplateSpec {
    let mut image = ElementSpec::image(1.0, 1.0, 2.0, 1.0, "a.png");
    if let ElementSpec::Image { locked: l, .. } = &mut image {
        *l = locked;
    }
    TemplateSpec {
        props: Some(json!({})),
        measure: Some(MeasureSpec {
            unit: galley::measure::Unit::In,
            dpi: 100.0,
            width: 10.0,
            height: 6.0,
            bleed: 0.0,
            cut: 0.0,
        }),
        pages: Some(vec![PageSpec {
            background: BackgroundSpec::default(),
            elements: vec![image],
        }]),
    }
}

fn shape_source() -> StaticSource {
    let mut source = StaticSource::new();
    source.insert(
        "shape/streak.svg",
        r##"<svg viewBox="0 0 10 10"><path fill="#ff0000" d="M0 0h10v10z"/></svg>"##,
    );
    source
}

fn image_node(editor: &Editor) -> NodeId {
    editor
        .scene()
        .unwrap()
        .pages
        .iter()
        .flat_map(|p| &p.nodes)
        .find(|n| matches!(n.visual, Visual::Image { .. }))
        .map(|n| n.id)
        .expect("an image node")
}

/// Viewport whose width binds the fit scale to exactly 0.5 for a 1000 px
/// page: (600 - 100) / 1000.
const HALF_SCALE_VIEWPORT: Viewport = Viewport {
    width: 600.0,
    height: 5000.0,
};

// ─── Render pipeline ────────────────────────────────────────────

#[test]
fn sample_template_resolves_to_expected_pixels() {
    let mut editor =
        Editor::new(Viewport::new(1280.0, 800.0)).with_vector_source(shape_source());
    block_on(editor.render(sample_template())).unwrap();

    let scene = editor.scene().unwrap();
    assert!((scene.measure.px_width - 85.0 * 300.0 / 25.4).abs() < 0.01);
    assert!((scene.measure.px_height - 55.0 * 300.0 / 25.4).abs() < 0.01);
    assert!((scene.measure.px_width - 1003.94).abs() < 0.01);
    assert!((scene.measure.px_height - 649.61).abs() < 0.01);

    assert_eq!(scene.pages.len(), 2);
    assert!(scene.pages[0].active);
    assert!(!scene.pages[1].active);
    assert_eq!(scene.pages[0].nodes.len(), 3);
    assert_eq!(editor.page_label(), "Displaying page 1 of 2 pages.");
    assert_eq!(editor.state(), galley::RenderState::Ready);
}

#[test]
fn render_publishes_scale_event() {
    let mut editor =
        Editor::new(Viewport::new(800.0, 600.0)).with_vector_source(shape_source());
    block_on(editor.render(sample_template())).unwrap();

    let events = editor.drain_events();
    assert!(events
        .iter()
        .any(|e| matches!(e, EditorEvent::Scale { scale } if *scale < 1.0)));
    // The width ratio (800-100)/1003.94 binds; height would allow 0.7697.
    let expected = (800.0 - 100.0) / (85.0 * 300.0 / 25.4);
    assert!((editor.scale() - expected).abs() < 1e-9);
}

#[test]
fn vector_markup_is_fetched_and_recolored() {
    let mut editor =
        Editor::new(Viewport::new(1280.0, 800.0)).with_vector_source(shape_source());
    let mut template = sample_template();
    if let Some(pages) = &mut template.pages {
        if let ElementSpec::Vector { fill_color, .. } = &mut pages[0].elements[2] {
            *fill_color = Some("#4b4c48ff".into());
        }
    }
    block_on(editor.render(template)).unwrap();

    let scene = editor.scene().unwrap();
    let markup = scene.pages[0]
        .nodes
        .iter()
        .find_map(|n| match &n.visual {
            Visual::Vector { markup } => Some(markup.as_str()),
            _ => None,
        })
        .expect("vector node");
    assert!(markup.contains(r##"fill="#4b4c48ff""##));
    assert!(!markup.contains("#ff0000"));
}

#[test]
fn unreachable_shape_is_skipped_not_fatal() {
    // No shape source registered: the vector fetch fails.
    let mut editor = Editor::new(Viewport::new(1280.0, 800.0));
    block_on(editor.render(sample_template())).unwrap();

    let scene = editor.scene().unwrap();
    // The vector node is omitted; its siblings render.
    assert_eq!(scene.pages[0].nodes.len(), 2);
    assert_eq!(scene.pages[1].nodes.len(), 1);
}

#[test]
fn invalid_template_aborts_before_mutation() {
    let mut editor = Editor::new(Viewport::new(1280.0, 800.0));
    let broken = TemplateSpec {
        props: Some(json!({})),
        measure: None,
        pages: Some(vec![]),
    };
    assert!(block_on(editor.render(broken)).is_err());
    assert!(editor.scene().is_none());
    assert!(editor.document().is_none());
    assert_eq!(editor.state(), galley::RenderState::Unloaded);
    assert!(editor.drain_events().is_empty());
}

#[test]
fn bleed_and_cut_guides_are_inset() {
    let mut editor =
        Editor::new(Viewport::new(1280.0, 800.0)).with_vector_source(shape_source());
    block_on(editor.render(sample_template())).unwrap();

    let scene = editor.scene().unwrap();
    let m = &scene.measure;
    let page = &scene.pages[0];
    assert!((page.bleed.x - m.px_bleed).abs() < 1e-9);
    assert!((page.bleed.w - (m.px_width - 2.0 * m.px_bleed)).abs() < 1e-9);
    assert!((page.cut.y - m.px_cut).abs() < 1e-9);
}

// ─── Element insertion ──────────────────────────────────────────

#[test]
fn add_element_appends_to_document_and_scene() {
    let mut editor =
        Editor::new(Viewport::new(1280.0, 800.0)).with_vector_source(shape_source());
    block_on(editor.render(sample_template())).unwrap();

    block_on(editor.add_element(ElementSpec::text(30.0, 50.0, "Added", 12.0), 1)).unwrap();
    assert_eq!(editor.document().unwrap().pages[1].elements.len(), 2);
    assert_eq!(editor.scene().unwrap().pages[1].nodes.len(), 2);
}

#[test]
fn add_element_to_foreign_page_is_refused() {
    let mut editor =
        Editor::new(Viewport::new(1280.0, 800.0)).with_vector_source(shape_source());
    block_on(editor.render(sample_template())).unwrap();

    let err = block_on(editor.add_element(ElementSpec::text(0.0, 0.0, "x", 12.0), 5)).unwrap_err();
    assert!(matches!(err, galley::EditorError::MissingTarget(_)));
}

// ─── Drag & selection ───────────────────────────────────────────

#[test]
fn drag_deltas_divide_by_active_scale() {
    let mut editor = Editor::new(HALF_SCALE_VIEWPORT);
    block_on(editor.render(px_template(false))).unwrap();
    assert!((editor.scale() - 0.5).abs() < 1e-9);

    let id = image_node(&editor);
    assert!(editor.activate(id));

    // Image frame (100, 100, 200, 100) → wrapper (98, 98); page origin in
    // client space is (50, 2350), so the wrapper sits at (99, 2399).
    assert!(editor.pointer_down(Point::new(120.0, 2410.0)));
    editor.pointer_move(Point::new(160.0, 2440.0));

    let wrapper = editor.selection().unwrap();
    assert!((wrapper.frame.x - (98.0 + 40.0 / 0.5)).abs() < 1e-9);
    assert!((wrapper.frame.y - (98.0 + 30.0 / 0.5)).abs() < 1e-9);
}

#[test]
fn pointer_down_outside_wrapper_starts_no_drag() {
    let mut editor = Editor::new(HALF_SCALE_VIEWPORT);
    block_on(editor.render(px_template(false))).unwrap();
    editor.activate(image_node(&editor));

    assert!(!editor.pointer_down(Point::new(5.0, 5.0)));
    editor.pointer_move(Point::new(500.0, 500.0));
    let wrapper = editor.selection().unwrap();
    assert_eq!(wrapper.frame.x, 98.0);
}

#[test]
fn mid_drag_rescale_applies_to_subsequent_deltas_only() {
    let mut editor = Editor::new(HALF_SCALE_VIEWPORT);
    block_on(editor.render(px_template(false))).unwrap();
    editor.activate(image_node(&editor));
    editor.pointer_down(Point::new(120.0, 2410.0));

    editor.pointer_move(Point::new(130.0, 2410.0)); // +10 client at s=0.5 → +20 doc

    // Resize: (350 - 100) / 1000 = 0.25.
    editor.rescale(Viewport::new(350.0, 5000.0));
    assert!((editor.scale() - 0.25).abs() < 1e-9);

    editor.pointer_move(Point::new(140.0, 2410.0)); // +10 client at s=0.25 → +40 doc

    let wrapper = editor.selection().unwrap();
    assert!((wrapper.frame.x - (98.0 + 20.0 + 40.0)).abs() < 1e-9);
}

#[test]
fn drop_fully_off_right_snaps_to_nearest_right_corner() {
    let mut editor = Editor::new(HALF_SCALE_VIEWPORT);
    block_on(editor.render(px_template(false))).unwrap();
    editor.activate(image_node(&editor));
    editor.pointer_down(Point::new(120.0, 2410.0));

    // Move the wrapper to x = 98 + 952 = 1050 > page width 1000, fully out.
    editor.pointer_move(Point::new(120.0 + 476.0, 2410.0));

    let snap = editor.pointer_up().expect("fully out must snap");
    assert_eq!(snap.corner, galley::drag::Corner::TopRight);
    assert_eq!(snap.to, Point::new(800.0, 0.0));
    assert_eq!(snap.duration_ms, galley::drag::SNAP_DURATION_MS);

    let wrapper = editor.selection().unwrap();
    assert_eq!(wrapper.frame.x, 800.0);
    assert_eq!(wrapper.frame.y, 0.0);
}

#[test]
fn partial_overlap_drop_stays_where_dropped() {
    let mut editor = Editor::new(HALF_SCALE_VIEWPORT);
    block_on(editor.render(px_template(false))).unwrap();
    editor.activate(image_node(&editor));
    editor.pointer_down(Point::new(120.0, 2410.0));

    // x = 98 + 800 = 898; right edge 1098 sticks out but overlaps the page.
    editor.pointer_move(Point::new(120.0 + 400.0, 2410.0));
    assert!(editor.pointer_up().is_none());
    assert_eq!(editor.selection().unwrap().frame.x, 898.0);
}

#[test]
fn deselect_writes_position_back_to_physical_units() {
    let mut editor = Editor::new(HALF_SCALE_VIEWPORT);
    block_on(editor.render(px_template(false))).unwrap();
    let id = image_node(&editor);
    editor.activate(id);
    editor.pointer_down(Point::new(120.0, 2410.0));
    editor.pointer_move(Point::new(170.0, 2435.0)); // +100, +50 doc px
    editor.pointer_up();
    editor.deselect();

    assert!(editor.selection().is_none());
    // Wrapper moved from (98, 98) to (198, 148); node returns at +padding.
    let (x, y) = editor.document().unwrap().pages[0].elements[0].position();
    assert!((x - 2.0).abs() < 1e-9, "expected 2.0 in, got {x}");
    assert!((y - 1.5).abs() < 1e-9, "expected 1.5 in, got {y}");

    let scene = editor.scene().unwrap();
    let node = scene.pages[0].node(id).unwrap();
    assert!((node.frame.x - 200.0).abs() < 1e-9);
    assert!((node.frame.y - 150.0).abs() < 1e-9);
}

#[test]
fn locked_elements_never_enter_selection() {
    let mut editor = Editor::new(HALF_SCALE_VIEWPORT);
    block_on(editor.render(px_template(true))).unwrap();
    let scene = editor.scene().unwrap();
    let id = scene.pages[0].nodes[0].id;
    assert!(!scene.pages[0].nodes[0].selectable);

    assert!(!editor.activate(id));
    assert!(editor.selection().is_none());
    assert!(!editor
        .drain_events()
        .iter()
        .any(|e| matches!(e, EditorEvent::ElementSelected { .. })));
}

#[test]
fn activating_b_tears_down_a_first() {
    let mut editor =
        Editor::new(Viewport::new(1280.0, 800.0)).with_vector_source(shape_source());
    block_on(editor.render(sample_template())).unwrap();

    let scene = editor.scene().unwrap();
    let a = scene.pages[0].nodes[0].id;
    let b = scene.pages[0].nodes[1].id;

    assert!(editor.activate(a));
    assert!(editor.activate(b));
    let wrapper = editor.selection().unwrap();
    assert_eq!(wrapper.node, b);

    let selected: Vec<_> = editor
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, EditorEvent::ElementSelected { .. }))
        .collect();
    assert_eq!(selected.len(), 2);
}

// ─── Pagination ─────────────────────────────────────────────────

#[test]
fn three_page_document_clamps_navigation() {
    let mut template = sample_template();
    if let Some(pages) = &mut template.pages {
        pages.push(PageSpec::default());
    }
    let mut editor =
        Editor::new(Viewport::new(1280.0, 800.0)).with_vector_source(shape_source());
    block_on(editor.render(template)).unwrap();

    assert!(!editor.prev_page());
    assert_eq!(editor.active_page(), 0);

    assert!(editor.next_page());
    assert!(editor.next_page());
    assert!(!editor.next_page());
    assert_eq!(editor.active_page(), 2);

    let controls = editor.pagination_controls();
    assert!(!controls.next_enabled);
    assert!(controls.prev_enabled);

    let scene = editor.scene().unwrap();
    assert!(scene.pages[2].active);
    assert!(!scene.pages[0].active && !scene.pages[1].active);
    assert_eq!(editor.page_label(), "Displaying page 3 of 3 pages.");
}

#[test]
fn single_page_document_hides_controls() {
    let mut editor = Editor::new(HALF_SCALE_VIEWPORT);
    block_on(editor.render(px_template(false))).unwrap();
    assert!(!editor.pagination_controls().visible);
}

// ─── Rescale ────────────────────────────────────────────────────

#[test]
fn rescale_republishes_uniform_scale() {
    let mut editor =
        Editor::new(Viewport::new(1280.0, 800.0)).with_vector_source(shape_source());
    block_on(editor.render(sample_template())).unwrap();
    editor.drain_events();

    editor.rescale(Viewport::new(2000.0, 2000.0));
    assert_eq!(editor.scale(), 1.0);
    assert_eq!(editor.zoom_label(), "Zoom: 100%");
    assert!(editor
        .drain_events()
        .iter()
        .any(|e| matches!(e, EditorEvent::Scale { scale } if *scale == 1.0)));
}

// ─── JSON surface ───────────────────────────────────────────────

#[test]
fn template_round_trips_through_json() {
    let json = serde_json::to_string(&sample_template()).unwrap();
    let parsed = TemplateSpec::from_json(&json).unwrap();
    let mut editor =
        Editor::new(Viewport::new(1280.0, 800.0)).with_vector_source(shape_source());
    block_on(editor.render(parsed)).unwrap();
    assert_eq!(editor.scene().unwrap().pages.len(), 2);
}

#[test]
fn malformed_json_reports_parse_hint() {
    let err = TemplateSpec::from_json("{ not json").unwrap_err();
    assert!(err.to_string().contains("hint:"));
}
