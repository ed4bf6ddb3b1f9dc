//! Schema-driven recommendations for a field path under `frontendSpec`.

use serde_json::Value;

const ROOT_DEFINITION: &str = "frontendSpec";
const MAX_REF_DEPTH: usize = 32;

/// What the schema says about one field path.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FieldRecommendations {
    /// Whether the path resolved to a schema node at all.
    pub resolved: bool,
    pub required: Vec<String>,
    pub defaults: Vec<(String, Value)>,
    pub examples: Vec<Value>,
}

/// Walk `frontendSpec.<field_path>` through the schema and collect its hints.
///
/// A path ending on an array field reports on the array's item schema.
pub fn field_recommendations(schema: &Value, field_path: &str) -> FieldRecommendations {
    let mut node = Some(schema);
    for part in std::iter::once(ROOT_DEFINITION).chain(field_path.split('.').filter(|part| !part.is_empty())) {
        node = node.and_then(|current| child(schema, current, part, &mut Vec::new()));
    }

    let Some(field) = node.map(|node| resolve(schema, node)) else {
        return FieldRecommendations::default();
    };
    let shape = field.get("items").map(|items| resolve(schema, items)).unwrap_or(field);

    let required = shape
        .get("required")
        .and_then(Value::as_array)
        .map(|fields| fields.iter().filter_map(Value::as_str).map(str::to_string).collect())
        .unwrap_or_default();

    let mut defaults = Vec::new();
    if let Some(default) = field.get("default") {
        let name = field_path.rsplit('.').next().unwrap_or(field_path);
        defaults.push((name.to_string(), default.clone()));
    }
    if let Some(properties) = shape.get("properties").and_then(Value::as_object) {
        for (name, property) in properties {
            if let Some(default) = resolve(schema, property).get("default") {
                defaults.push((name.clone(), default.clone()));
            }
        }
    }

    let mut examples = examples_of(field);
    if !std::ptr::eq(shape, field) {
        examples.extend(examples_of(shape));
    }

    FieldRecommendations {
        resolved: true,
        required,
        defaults,
        examples,
    }
}

fn examples_of(node: &Value) -> Vec<Value> {
    let mut examples: Vec<Value> = node
        .get("examples")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    if let Some(example) = node.get("example") {
        examples.push(example.clone());
    }
    examples
}

/// Step from `node` into the child named `part`.
///
/// `visited` holds the nodes already searched for this step; recursive
/// schemas end the search instead of looping.
fn child<'a>(root: &'a Value, node: &'a Value, part: &str, visited: &mut Vec<&'a Value>) -> Option<&'a Value> {
    let node = resolve(root, node);
    if visited.iter().any(|seen| std::ptr::eq(*seen, node)) {
        return None;
    }
    visited.push(node);

    if let Some(found) = node.get("properties").and_then(|properties| properties.get(part)) {
        return Some(found);
    }
    if let Some(items) = node.get("items")
        && let Some(found) = child(root, items, part, visited)
    {
        return Some(found);
    }
    for combinator in ["allOf", "anyOf", "oneOf"] {
        if let Some(branches) = node.get(combinator).and_then(Value::as_array) {
            for branch in branches {
                if let Some(found) = child(root, branch, part, visited) {
                    return Some(found);
                }
            }
        }
    }
    definitions(root).and_then(|definitions| definitions.get(part))
}

/// Follow local `$ref`s until a concrete node is reached.
fn resolve<'a>(root: &'a Value, node: &'a Value) -> &'a Value {
    let mut current = node;
    for _ in 0..MAX_REF_DEPTH {
        let Some(reference) = current.get("$ref").and_then(Value::as_str) else {
            break;
        };
        let Some(target) = reference
            .strip_prefix('#')
            .and_then(|pointer| root.pointer(pointer))
        else {
            break;
        };
        current = target;
    }
    current
}

fn definitions(root: &Value) -> Option<&Value> {
    root.get("$defs").or_else(|| root.get("definitions"))
}

/// Markdown report for a field path.
pub fn render_recommendations(field_path: &str, recommendations: &FieldRecommendations) -> String {
    let mut text = format!("# Field Recommendations: {field_path}\n\n");

    if !recommendations.resolved {
        text.push_str(&format!(
            "No schema definition found for `{ROOT_DEFINITION}.{field_path}`.\n"
        ));
        return text;
    }

    if !recommendations.required.is_empty() {
        let lines: Vec<String> = recommendations.required.iter().map(|field| format!("- `{field}`")).collect();
        text.push_str(&format!("## Required Fields\n{}\n\n", lines.join("\n")));
    }

    if !recommendations.defaults.is_empty() {
        text.push_str("## Default Values\n");
        for (key, value) in &recommendations.defaults {
            text.push_str(&format!("- `{key}`: `{value}`\n"));
        }
        text.push('\n');
    }

    if !recommendations.examples.is_empty() {
        let rendered: Vec<String> = recommendations
            .examples
            .iter()
            .map(|example| serde_yaml::to_string(example).unwrap_or_else(|_| example.to_string()))
            .collect();
        text.push_str(&format!("## Schema Examples\n```yaml\n{}```\n\n", rendered.join("\n---\n")));
    }

    if recommendations.required.is_empty() && recommendations.defaults.is_empty() && recommendations.examples.is_empty() {
        text.push_str("The schema declares no required fields, defaults, or examples for this path.\n");
    }

    text
}
