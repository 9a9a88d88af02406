use serde_json::{Map, Value};
use yomu_explainer::try_parse;
use yomu_types::{Example, ExampleEntry, ExplanationResult, PaneBody, Section, SectionTree};

/// Header used when neither a title nor the queried word is available
pub const FALLBACK_HEADER: &str = "AI explanation";

pub const MEANING_LABEL: &str = "Meaning";
pub const CONTEXT_LABEL: &str = "In context";
pub const USAGE_LABEL: &str = "Usage";

/// Pane body for accumulated model text: sections when it parses as an
/// object, the raw text otherwise
pub fn render_text(text: &str, queried_word: &str) -> PaneBody {
    match try_parse(text) {
        Some(object) => PaneBody::Sections(render(&object, queried_word)),
        None => PaneBody::Raw(text.to_string()),
    }
}

/// Build the section tree for a parsed model answer
pub fn render(object: &Map<String, Value>, queried_word: &str) -> SectionTree {
    build_tree(&extract_result(object), queried_word)
}

/// Read the known fields. Anything with the wrong type counts as missing.
pub fn extract_result(object: &Map<String, Value>) -> ExplanationResult {
    ExplanationResult {
        title: string_field(object, "title"),
        word: string_field(object, "word"),
        meaning: string_field(object, "meaning"),
        meaning_in_context: string_field(object, "meaning_in_context"),
        usage: string_field(object, "usage"),
        examples: examples_field(object),
    }
}

pub fn build_tree(result: &ExplanationResult, queried_word: &str) -> SectionTree {
    let queried_word = non_blank(Some(queried_word));

    let header = non_blank(result.title.as_deref())
        .or(queried_word)
        .unwrap_or(FALLBACK_HEADER)
        .to_string();

    let badge = non_blank(result.word.as_deref())
        .or(queried_word)
        .map(str::to_string);

    let mut sections = Vec::new();
    for (label, body) in [
        (MEANING_LABEL, &result.meaning),
        (CONTEXT_LABEL, &result.meaning_in_context),
        (USAGE_LABEL, &result.usage),
    ] {
        if let Some(body) = non_blank(body.as_deref()) {
            sections.push(Section::Text {
                label,
                body: body.to_string(),
            });
        }
    }

    let examples: Vec<ExampleEntry> = result
        .examples
        .iter()
        .filter_map(|example| {
            let text = non_blank(example.text.as_deref()).map(str::to_string);
            let explain = non_blank(example.explain.as_deref()).map(str::to_string);
            (text.is_some() || explain.is_some()).then_some(ExampleEntry { text, explain })
        })
        .collect();

    if !examples.is_empty() {
        sections.push(Section::Examples(examples));
    }

    SectionTree {
        header,
        badge,
        sections,
    }
}

fn non_blank(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|t| !t.is_empty())
}

fn string_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    match object.get(key)? {
        Value::String(text) => Some(text.clone()),
        Value::Null => None,
        other => {
            tracing::debug!("[RENDER] Structure mismatch: '{key}' is {other}, expected a string");
            None
        }
    }
}

fn examples_field(object: &Map<String, Value>) -> Vec<Example> {
    let items = match object.get("examples") {
        Some(Value::Array(items)) => items,
        Some(Value::Null) | None => return Vec::new(),
        Some(other) => {
            tracing::debug!("[RENDER] Structure mismatch: 'examples' is {other}, expected a list");
            return Vec::new();
        }
    };

    items
        .iter()
        .filter_map(|item| match item {
            Value::Object(example) => Some(Example {
                text: string_field(example, "text"),
                explain: string_field(example, "explain"),
            }),
            other => {
                tracing::debug!("[RENDER] Skipping example {other}, expected an object");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn full_result_renders_all_sections_in_order() {
        let tree = render(
            &object(json!({
                "title": "Run",
                "word": "run",
                "meaning": "move fast on foot",
                "meaning_in_context": "operate a business",
                "usage": "very common",
                "examples": [{"text": "She runs a shop.", "explain": "manage"}]
            })),
            "runs",
        );

        assert_eq!(tree.header, "Run");
        assert_eq!(tree.badge.as_deref(), Some("run"));
        assert_eq!(
            tree.sections,
            vec![
                Section::Text {
                    label: MEANING_LABEL,
                    body: "move fast on foot".into()
                },
                Section::Text {
                    label: CONTEXT_LABEL,
                    body: "operate a business".into()
                },
                Section::Text {
                    label: USAGE_LABEL,
                    body: "very common".into()
                },
                Section::Examples(vec![ExampleEntry {
                    text: Some("She runs a shop.".into()),
                    explain: Some("manage".into()),
                }]),
            ]
        );
    }

    #[test]
    fn header_falls_back_to_queried_word_then_label() {
        let tree = render(&object(json!({"title": "  "})), "runs");
        assert_eq!(tree.header, "runs");
        assert_eq!(tree.badge.as_deref(), Some("runs"));

        let tree = render(&object(json!({})), "");
        assert_eq!(tree.header, FALLBACK_HEADER);
        assert_eq!(tree.badge, None);
    }

    #[test]
    fn blank_sections_are_omitted() {
        let tree = render(
            &object(json!({"meaning": "fast", "meaning_in_context": " \n", "usage": ""})),
            "run",
        );

        assert_eq!(
            tree.sections,
            vec![Section::Text {
                label: MEANING_LABEL,
                body: "fast".into()
            }]
        );
    }

    #[test]
    fn wrong_types_are_treated_as_missing() {
        let tree = render(
            &object(json!({
                "title": 42,
                "meaning": ["not", "a", "string"],
                "usage": "ok",
                "examples": "none"
            })),
            "run",
        );

        assert_eq!(tree.header, "run");
        assert_eq!(
            tree.sections,
            vec![Section::Text {
                label: USAGE_LABEL,
                body: "ok".into()
            }]
        );
    }

    #[test]
    fn examples_keep_only_present_lines() {
        let tree = render(
            &object(json!({
                "examples": [
                    {"text": "I run.", "explain": ""},
                    {"explain": "only explanation"},
                    {"text": "", "explain": " "},
                    "bare string",
                    {"text": 7}
                ]
            })),
            "run",
        );

        assert_eq!(
            tree.sections,
            vec![Section::Examples(vec![
                ExampleEntry {
                    text: Some("I run.".into()),
                    explain: None
                },
                ExampleEntry {
                    text: None,
                    explain: Some("only explanation".into())
                },
            ])]
        );
    }

    #[test]
    fn empty_examples_section_is_omitted() {
        let tree = render(&object(json!({"examples": []})), "run");
        assert!(tree.sections.is_empty());
    }

    #[test]
    fn rendering_is_idempotent() {
        let parsed = object(json!({"title": "Run", "meaning": "fast"}));
        assert_eq!(render(&parsed, "run"), render(&parsed, "run"));
    }

    #[test]
    fn incomplete_text_renders_raw() {
        let body = render_text(r#"{"title":"Run""#, "run");
        assert_eq!(body, PaneBody::Raw(r#"{"title":"Run""#.into()));

        let body = render_text(r#"{"title":"Run"}"#, "run");
        assert!(matches!(body, PaneBody::Sections(tree) if tree.header == "Run"));
    }
}
