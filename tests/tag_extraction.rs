//! End-to-end pipeline tests: tag extraction feeding normalization.

use serde_json::json;
use tagmend::config::{self, Loader};
use tagmend::{Pipeline, TagValue};

fn default_pipeline() -> Pipeline {
    let config = config::load_defaults().expect("defaults to load");
    Pipeline::from_config(&config).expect("pipeline to build")
}

#[test]
fn progress_tag_is_lifted_before_normalization() {
    let out = default_pipeline().run("[TAG_PROGRESS: 42] Hint: head north");
    assert_eq!(out.progress, Some(42));
    assert!(out.tags.is_empty());
    assert_eq!(out.content, "**Hint:**\n\nhead north");
}

#[test]
fn structured_tags_never_reach_the_markup_passes() {
    let out = default_pipeline().run("[TAG_INVENTORY: ['map', 'rope']]**Lore** ruins");
    assert_eq!(
        out.tags.get("INVENTORY"),
        Some(&TagValue::Json(json!(["map", "rope"])))
    );
    assert_eq!(out.content, "**Lore:**\n\nruins");
}

#[test]
fn progress_extraction_can_be_disabled() {
    let config = Loader::new()
        .set_override("tags.extract_progress", false)
        .expect("override to apply")
        .build()
        .expect("config to build");
    let pipeline = Pipeline::from_config(&config).expect("pipeline to build");

    let out = pipeline.run("[TAG_PROGRESS: 50] hi");
    assert_eq!(out.progress, None);
    assert_eq!(out.content, "hi");
}

#[test]
fn prefix_is_configurable() {
    let config = Loader::new()
        .set_override("tags.prefix", "OTK")
        .expect("override to apply")
        .build()
        .expect("config to build");
    let pipeline = Pipeline::from_config(&config).expect("pipeline to build");

    let out = pipeline.run("[OTK_ITEM: brass key] go");
    assert_eq!(
        out.tags.get("ITEM"),
        Some(&TagValue::Text("brass key".to_string()))
    );
    assert_eq!(out.content, "go");

    // Tags under a different prefix read as ordinary bracketed text.
    let out = pipeline.run("[TAG_ITEM: brass key] go");
    assert!(out.tags.is_empty());
    assert_eq!(out.content, "[TAG_ITEM: brass key] go");
}

#[test]
fn header_labels_are_configurable() {
    let config = Loader::new()
        .set_override("headers.labels", vec!["Objective".to_string()])
        .expect("override to apply")
        .build()
        .expect("config to build");
    let pipeline = Pipeline::from_config(&config).expect("pipeline to build");

    let out = pipeline.run("Objective: reach the gate. Hint: ignored");
    assert_eq!(
        out.content,
        "**Objective:**\n\nreach the gate. Hint: ignored"
    );
}
