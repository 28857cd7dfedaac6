//! Property tests for the conversion pipeline

use proptest::prelude::*;
use ruleshift::{
    convert, cursor_to_windsurf, detect_dialect, parse_frontmatter, render_frontmatter,
    CursorFrontmatter, Dialect, Direction, Metadata, Trigger,
};
use serde_yaml_ng::Value;

fn description_strategy() -> impl Strategy<Value = Option<String>> {
    prop::option::of("[A-Za-z][A-Za-z0-9 ,.]{0,40}[A-Za-z0-9.]")
}

fn globs_strategy() -> impl Strategy<Value = Option<String>> {
    prop::option::of("([a-z]{1,8}/)?\\*\\*?/?\\*\\.[a-z]{1,3}(,\\*\\.[a-z]{1,3}){0,2}")
}

fn body_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 #*\\-\n]{0,200}".prop_map(|body| format!("{}\n", body))
}

fn cursor_rule_strategy() -> impl Strategy<Value = (CursorFrontmatter, String)> {
    (
        description_strategy(),
        globs_strategy(),
        any::<bool>(),
        body_strategy(),
    )
        .prop_map(|(description, glob_pattern, always_apply, body)| {
            let frontmatter = CursorFrontmatter {
                description,
                glob_pattern,
                always_apply: Some(always_apply),
                ..Default::default()
            };
            (frontmatter, body)
        })
}

fn windsurf_text_strategy() -> impl Strategy<Value = String> {
    (
        prop::sample::select(vec!["manual", "always_on", "model_decision", "glob"]),
        description_strategy(),
        globs_strategy(),
        body_strategy(),
    )
        .prop_map(|(trigger, description, globs, body)| {
            let mut metadata = Metadata::new();
            metadata.insert("trigger".to_string(), Value::String(trigger.to_string()));
            if let Some(description) = description {
                metadata.insert("description".to_string(), Value::String(description));
            }
            if let Some(globs) = globs {
                metadata.insert("globs".to_string(), Value::String(globs));
            }
            render_frontmatter(&metadata, &body).unwrap()
        })
}

fn metadata_strategy() -> impl Strategy<Value = Metadata> {
    prop::collection::vec(("x_[a-z]{1,8}", "[ -~]{0,20}"), 1..6).prop_map(|entries| {
        entries
            .into_iter()
            .map(|(key, value)| (key, Value::String(value)))
            .collect()
    })
}

fn effective_trigger(text: &str) -> Trigger {
    let document = parse_frontmatter(text).unwrap();
    cursor_to_windsurf(CursorFrontmatter::from_metadata(document.metadata)).trigger
}

proptest! {
    #[test]
    fn prop_cursor_round_trip_keeps_body_and_policy((frontmatter, body) in cursor_rule_strategy()) {
        let original = render_frontmatter(&frontmatter.clone().into_metadata(), &body).unwrap();
        let expected_trigger = cursor_to_windsurf(frontmatter).trigger;

        let windsurf = convert(&original, Direction::CursorToWindsurf, None, None).unwrap();
        let back = convert(&windsurf, Direction::WindsurfToCursor, None, None).unwrap();

        prop_assert_eq!(parse_frontmatter(&back).unwrap().body, body);
        prop_assert_eq!(effective_trigger(&back), expected_trigger);
    }

    #[test]
    fn prop_detection_is_deterministic(text in "[ -~\n]{0,300}") {
        prop_assert_eq!(detect_dialect(&text, None), detect_dialect(&text, None));
    }

    #[test]
    fn prop_cursor_to_windsurf_never_fails_on_cursor_input((frontmatter, body) in cursor_rule_strategy()) {
        let text = render_frontmatter(&frontmatter.into_metadata(), &body).unwrap();
        prop_assert_eq!(detect_dialect(&text, None), Some(Dialect::Cursor));

        let output = convert(&text, Direction::CursorToWindsurf, None, None);
        prop_assert!(output.is_ok());
    }

    #[test]
    fn prop_windsurf_to_cursor_fails_only_on_missing_fields(text in windsurf_text_strategy()) {
        let document = parse_frontmatter(&text).unwrap();
        let trigger = document.metadata.get("trigger").and_then(Value::as_str).unwrap().to_string();
        let missing_globs = trigger == "glob" && !document.metadata.contains_key("globs");
        let missing_description =
            trigger == "model_decision" && !document.metadata.contains_key("description");

        let result = convert(&text, Direction::WindsurfToCursor, None, None);
        prop_assert_eq!(result.is_err(), missing_globs || missing_description);
    }

    #[test]
    fn prop_render_then_parse_is_identity(metadata in metadata_strategy(), body in body_strategy()) {
        let rendered = render_frontmatter(&metadata, &body).unwrap();
        let parsed = parse_frontmatter(&rendered).unwrap();

        prop_assert_eq!(parsed.metadata, metadata);
        prop_assert_eq!(parsed.body, body);
    }

    #[test]
    fn prop_glob_values_survive_render_and_parse(globs in "[a-z*/.{},?!&|@%\\[\\]]{1,30}") {
        let mut metadata = Metadata::new();
        metadata.insert("globs".to_string(), Value::String(globs.clone()));

        let rendered = render_frontmatter(&metadata, "Body\n").unwrap();
        let parsed = parse_frontmatter(&rendered).unwrap();
        prop_assert_eq!(parsed.metadata.get("globs").and_then(Value::as_str), Some(globs.as_str()));
    }
}
