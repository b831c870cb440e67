//! JSON Schema describing the reply the grading model must produce

use std::sync::LazyLock;

use schemars::r#gen::SchemaSettings;
use serde_json::Value;

use crate::model::extracted::ExtractedAnalysis;

static RESPONSE_SCHEMA: LazyLock<Value> = LazyLock::new(build_response_schema);

/// Schema for [`ExtractedAnalysis`], with nested definitions inlined
pub fn response_schema() -> &'static Value {
    &RESPONSE_SCHEMA
}

/// Pretty-printed schema, as embedded in the prompt
pub fn response_schema_text() -> String {
    serde_json::to_string_pretty(response_schema()).unwrap_or_default()
}

fn build_response_schema() -> Value {
    let settings = SchemaSettings::draft07().with(|s| {
        s.inline_subschemas = true;
        s.meta_schema = None;
    });
    let schema = settings
        .into_generator()
        .into_root_schema_for::<ExtractedAnalysis>();

    serde_json::to_value(schema).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn required(schema: &Value) -> Vec<&str> {
        schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect()
    }

    #[test]
    fn test_top_level_fields_are_required() {
        let schema = response_schema();
        let required = required(schema);
        for field in [
            "scores",
            "totalScore",
            "generalFeedback",
            "goodPoints",
            "badPoints",
            "revisedText",
            "inlineFeedback",
        ] {
            assert!(required.contains(&field), "{field} should be required");
        }
    }

    #[test]
    fn test_segment_schema_is_inlined() {
        let schema = response_schema();
        let segment = &schema["properties"]["inlineFeedback"]["items"];

        assert_eq!(segment["type"], "object");
        let required = required(segment);
        assert!(required.contains(&"text"));
        assert!(required.contains(&"isError"));
        assert!(!required.contains(&"correction"));

        let text = response_schema_text();
        assert!(!text.contains("$ref"));
        for name in ["grammar", "vocabulary", "spelling", "punctuation", "style"] {
            assert!(text.contains(name));
        }
    }

    #[test]
    fn test_descriptions_come_from_field_docs() {
        let schema = response_schema();
        let description = schema["properties"]["inlineFeedback"]["description"]
            .as_str()
            .unwrap();
        assert!(description.contains("reconstruct the exact original story"));
        assert!(
            schema["properties"]["scores"]["properties"]["content"]["description"]
                .as_str()
                .unwrap()
                .contains("out of 5")
        );
    }
}
