//! Typo suggestions and example-value synthesis (spec §4.2, testable
//! property "Typo suggestion" in §8).

use crate::types::{ObjectSchema, SchemaType};

/// Up to 3 closest accepted field/enum names within Levenshtein distance 3,
/// ordered by distance ascending then lexicographically — spec §4.2's
/// "unknown property" suggestion rule and the enum-violation rule share
/// this helper.
pub fn closest_matches(typed: &str, candidates: &[&'static str]) -> Vec<&'static str> {
    const MAX_DISTANCE: usize = 3;
    const LIMIT: usize = 3;

    let mut scored: Vec<(usize, &'static str)> = candidates
        .iter()
        .map(|c| (strsim::levenshtein(typed, c), *c))
        .filter(|(d, _)| *d <= MAX_DISTANCE)
        .collect();
    scored.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));
    scored.into_iter().take(LIMIT).map(|(_, c)| c).collect()
}

/// When no candidate is within the distance threshold, list up to 10 valid
/// field names instead (spec §4.2).
pub fn fallback_field_list(schema: &ObjectSchema) -> Vec<&'static str> {
    let mut names = schema.accepted_names();
    names.sort_unstable();
    names.truncate(10);
    names
}

/// Build an example value for a type-mismatch diagnostic by structural
/// recursion over the schema (spec §4.2).
pub fn example_value(schema: &SchemaType) -> serde_yaml::Value {
    use serde_yaml::Value;
    match schema {
        SchemaType::String => Value::String("string".to_string()),
        SchemaType::Integer => Value::Number(42.into()),
        SchemaType::Boolean => Value::Bool(true),
        SchemaType::Enum(values) => values
            .first()
            .map(|v| Value::String((*v).to_string()))
            .unwrap_or(Value::Null),
        SchemaType::Array(inner) => Value::Sequence(vec![example_value(inner)]),
        SchemaType::Object(obj) => {
            let mut fields: Vec<&crate::types::FieldSchema> = obj
                .fields
                .iter()
                .filter(|f| f.deprecated_in_favor_of.is_none())
                .collect();
            fields.sort_by_key(|f| !f.required);
            let mut mapping = serde_yaml::Mapping::new();
            for field in fields.into_iter().take(3) {
                mapping.insert(
                    Value::String(field.name.to_string()),
                    example_value(&field.schema),
                );
            }
            Value::Mapping(mapping)
        }
        SchemaType::Union(alternatives) => alternatives
            .first()
            .map(example_value)
            .unwrap_or(Value::Null),
        SchemaType::Any => Value::Null,
    }
}

/// Render an example value the way the diagnostic text wants it: compact
/// single-line YAML/JSON-ish form, e.g. `{ title: string, body: string }`.
pub fn render_example(value: &serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::String(s) => format!("\"{s}\""),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Null => "null".to_string(),
        serde_yaml::Value::Sequence(items) => {
            let rendered: Vec<String> = items.iter().map(render_example).collect();
            format!("[{}]", rendered.join(", "))
        }
        serde_yaml::Value::Mapping(map) => {
            let rendered: Vec<String> = map
                .iter()
                .map(|(k, v)| {
                    let key = k.as_str().unwrap_or("?");
                    format!("{key}: {}", render_example(v))
                })
                .collect();
            format!("{{ {} }}", rendered.join(", "))
        }
        serde_yaml::Value::Tagged(tagged) => render_example(&tagged.value),
    }
}
