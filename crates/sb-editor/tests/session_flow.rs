//! Integration tests: end-to-end host flows (drag, edit, export, publish).

use pretty_assertions::assert_eq;
use sb_core::catalog::ElementType;
use sb_core::export::{AssetStoreError, MemoryAssetStore};
use sb_core::id::NodeId;
use sb_editor::clipboard::{COPIED_LABEL, COPY_LABEL, MemoryClipboard};
use sb_editor::export::ExportTab;
use sb_editor::{BuilderSession, EventOutcome, FocusContext, InputEvent, Modifiers};
use std::time::Duration;
use web_time::Instant;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn drag_in(session: &mut BuilderSession, element: ElementType, target: Option<NodeId>) -> NodeId {
    session
        .handle_event(&InputEvent::DragStart { element })
        .unwrap();
    session
        .handle_event(&InputEvent::DragOver { target })
        .unwrap();
    match session.handle_event(&InputEvent::Drop { target }).unwrap() {
        EventOutcome::Placed(placement) => placement.id,
        other => panic!("expected placement, got {other:?}"),
    }
}

fn press(session: &mut BuilderSession, key: &str, modifiers: Modifiers, focus: FocusContext) -> EventOutcome {
    session
        .handle_event(&InputEvent::Key {
            key: key.to_string(),
            modifiers,
            focus,
        })
        .unwrap_or(EventOutcome::Ignored)
}

#[test]
fn heading_in_container_exports_with_style() {
    init_logging();
    let mut session = BuilderSession::default();
    let container = drag_in(&mut session, ElementType::Container, None);
    let heading = drag_in(&mut session, ElementType::Heading, Some(container));
    session
        .handle_event(&InputEvent::Click {
            target: Some(heading),
        })
        .unwrap();
    session.set_field("content", "Hello").unwrap();
    session.set_field("bg-color", "#ff0000").unwrap();

    let bundle = session.export("Promo Banner");
    assert!(bundle.markup.contains(
        "<div class=\"el-container\">\n  <h2 class=\"el-heading\">\n    Hello\n  </h2>\n</div>\n"
    ));
    assert!(
        bundle
            .stylesheet
            .ends_with(".el-heading {\n  background-color: #ff0000;\n}\n\n")
    );
    assert_eq!(bundle.slug, "promo-banner");
}

#[test]
fn delete_in_text_field_keeps_node() {
    init_logging();
    let mut session = BuilderSession::default();
    let text = drag_in(&mut session, ElementType::Text, None);
    session.select(Some(text)).unwrap();

    let outcome = press(&mut session, "Delete", Modifiers::NONE, FocusContext::TextField);
    assert_eq!(outcome, EventOutcome::Ignored);
    assert!(session.tree().contains(text));
    assert_eq!(session.selected(), Some(text));
}

#[test]
fn keyboard_undo_and_both_redo_bindings() {
    init_logging();
    let mut session = BuilderSession::default();
    drag_in(&mut session, ElementType::Image, None);
    let ctrl = Modifiers {
        ctrl: true,
        ..Modifiers::NONE
    };
    let ctrl_shift = Modifiers {
        shift: true,
        ..ctrl
    };

    assert!(matches!(
        press(&mut session, "z", ctrl, FocusContext::Canvas),
        EventOutcome::Undone(_)
    ));
    assert!(matches!(
        press(&mut session, "y", ctrl, FocusContext::Canvas),
        EventOutcome::Redone(_)
    ));
    press(&mut session, "z", ctrl, FocusContext::Canvas);
    assert!(matches!(
        press(&mut session, "Z", ctrl_shift, FocusContext::Canvas),
        EventOutcome::Redone(_)
    ));
    assert_eq!(session.tree().len(), 1);
}

#[test]
fn drop_on_leaf_is_redirected_to_container() {
    init_logging();
    let mut session = BuilderSession::default();
    let column = drag_in(&mut session, ElementType::Column, None);
    let icon = drag_in(&mut session, ElementType::Icon, Some(column));

    session
        .handle_event(&InputEvent::DragStart {
            element: ElementType::Link,
        })
        .unwrap();
    assert_eq!(
        session
            .handle_event(&InputEvent::DragOver { target: Some(icon) })
            .unwrap(),
        EventOutcome::Highlight(Some(column))
    );
    let outcome = session
        .handle_event(&InputEvent::Drop { target: Some(icon) })
        .unwrap();
    let EventOutcome::Placed(placement) = outcome else {
        panic!("expected placement, got {outcome:?}");
    };
    assert!(placement.redirected);
    assert_eq!(placement.parent, column);
    assert_eq!(session.tree().children(icon), Vec::<NodeId>::new());
}

#[test]
fn export_view_copy_feedback() {
    init_logging();
    let mut session = BuilderSession::default();
    drag_in(&mut session, ElementType::Paragraph, None);
    let mut view = session.export_view("");
    view.tab = ExportTab::Stylesheet;

    let mut clipboard = MemoryClipboard::default();
    let t0 = Instant::now();
    assert!(view.copy_active(&mut clipboard, t0));
    assert_eq!(clipboard.contents.as_deref(), Some(view.bundle.stylesheet.as_str()));
    assert_eq!(view.copy_label(t0 + Duration::from_millis(500)), COPIED_LABEL);
    assert_eq!(view.copy_label(t0 + Duration::from_millis(2500)), COPY_LABEL);
}

#[test]
fn publish_saves_both_files() {
    init_logging();
    let mut session = BuilderSession::default();
    drag_in(&mut session, ElementType::Video, None);
    let mut store = MemoryAssetStore::default();

    let bundle = session.publish("Hero", "theme-1", &mut store).unwrap();
    assert_eq!(store.get("theme-1", "sections/hero.liquid"), Some(bundle.markup.as_str()));
    assert_eq!(store.get("theme-1", "assets/hero.css"), Some(bundle.stylesheet.as_str()));

    let mut failing = MemoryAssetStore {
        reject: vec!["assets/hero.css".into()],
        ..Default::default()
    };
    let err = session.publish("Hero", "theme-1", &mut failing).unwrap_err();
    assert!(matches!(err, AssetStoreError::Rejected { .. }));
    assert_eq!(failing.len(), 1);
}
