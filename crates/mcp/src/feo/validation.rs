//! `frontend.yaml` validation against the FEO schema.

use serde_json::Value;

/// One schema violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    /// JSON pointer into the document; empty for the root.
    pub instance_path: String,
    pub message: String,
}

/// Parse YAML text into a JSON value.
pub fn parse_yaml(content: &str) -> Result<Value, serde_yaml::Error> {
    serde_yaml::from_str::<Value>(content)
}

/// Validate `document` against `schema`, collecting every violation.
///
/// Fails only when the schema itself cannot be compiled.
pub fn validate_document(schema: &Value, document: &Value) -> Result<Vec<SchemaViolation>, String> {
    let validator = jsonschema::validator_for(schema).map_err(|error| format!("invalid FEO schema: {error}"))?;
    Ok(validator
        .iter_errors(document)
        .map(|error| SchemaViolation {
            instance_path: error.instance_path.to_string(),
            message: error.to_string(),
        })
        .collect())
}

/// Non-fatal checks the schema does not express.
pub fn additional_checks(document: &Value) -> Vec<String> {
    let mut recommendations = Vec::new();
    for frontend in frontend_objects(document) {
        if text_at(frontend, &["metadata", "name"]).is_none() {
            recommendations.push("Add metadata.name to identify the Frontend resource".to_string());
        }

        let spec = &frontend["spec"];
        if text_at(spec, &["module", "manifestLocation"]).is_none() {
            recommendations
                .push("Set spec.module.manifestLocation (usually /apps/<app-name>/fed-mods.json)".to_string());
        }

        for segment in items(&spec["bundleSegments"]) {
            if segment.get("position").is_none_or(Value::is_null) {
                recommendations.push(format!(
                    "Bundle segment '{}' has no position; set one to control navigation order",
                    label(segment, "segmentId")
                ));
            }
            check_nav_items(&segment["navItems"], &mut recommendations);
        }

        for entry in items(&spec["searchEntries"]) {
            if items(&entry["alt_title"]).next().is_none() {
                recommendations.push(format!(
                    "Search entry '{}' has no alt_title; alternative titles improve search results",
                    label(entry, "id")
                ));
            }
        }
    }
    recommendations
}

fn check_nav_items(nav_items: &Value, recommendations: &mut Vec<String>) {
    for item in items(nav_items) {
        if text_at(item, &["id"]).is_none() {
            recommendations.push(format!("Navigation item '{}' has no id", label(item, "title")));
        }
        check_nav_items(&item["routes"], recommendations);
    }
}

/// Frontend resources in a document: the `objects` of a template, or the document itself.
fn frontend_objects(document: &Value) -> Vec<&Value> {
    match document.get("objects").and_then(Value::as_array) {
        Some(objects) => objects
            .iter()
            .filter(|object| object.get("kind").and_then(Value::as_str).is_none_or(|kind| kind == "Frontend"))
            .collect(),
        None if document.is_object() => vec![document],
        None => Vec::new(),
    }
}

fn items(value: &Value) -> impl Iterator<Item = &Value> {
    value.as_array().into_iter().flatten()
}

fn text_at<'a>(value: &'a Value, path: &[&str]) -> Option<&'a str> {
    path.iter()
        .try_fold(value, |node, key| node.get(*key))
        .and_then(Value::as_str)
        .filter(|text| !text.trim().is_empty())
}

fn label<'a>(value: &'a Value, key: &str) -> &'a str {
    value
        .get(key)
        .or_else(|| value.get("title"))
        .and_then(Value::as_str)
        .unwrap_or("unnamed")
}

/// Markdown report in the shape tool callers expect.
pub fn render_report(violations: &[SchemaViolation], recommendations: &[String]) -> String {
    let status = if violations.is_empty() { "✅ Valid" } else { "❌ Invalid" };
    let mut report = format!(
        "# FEO Configuration Validation\n\n## YAML Parse: ✅ Valid YAML structure\n\n## Schema Validation: {status}\n"
    );

    if !violations.is_empty() {
        let lines: Vec<String> = violations
            .iter()
            .map(|violation| {
                let path = if violation.instance_path.is_empty() {
                    "root"
                } else {
                    violation.instance_path.as_str()
                };
                format!("- **{path}**: {}", violation.message)
            })
            .collect();
        report.push_str(&format!("\n## Validation Errors:\n{}\n", lines.join("\n")));
    }

    if !recommendations.is_empty() {
        let lines: Vec<String> = recommendations.iter().map(|check| format!("- {check}")).collect();
        report.push_str(&format!("\n## Additional Recommendations:\n{}\n", lines.join("\n")));
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> Value {
        json!({
            "$schema": "https://json-schema.org/draft/2020-12/schema",
            "type": "object",
            "required": ["metadata"],
            "properties": {
                "metadata": {
                    "type": "object",
                    "properties": {"name": {"type": "string"}}
                }
            }
        })
    }

    #[test]
    fn collects_every_violation_with_paths() {
        let document = parse_yaml("metadata:\n  name: 42\n").expect("yaml");
        let violations = validate_document(&schema(), &document).expect("validate");

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].instance_path, "/metadata/name");
        assert!(violations[0].message.contains("string"));

        let missing = validate_document(&schema(), &json!({})).expect("validate");
        assert_eq!(missing[0].instance_path, "");
        assert!(render_report(&missing, &[]).contains("- **root**: "));
    }

    #[test]
    fn valid_documents_report_success() {
        let document = parse_yaml("metadata:\n  name: my-app\n").expect("yaml");
        let violations = validate_document(&schema(), &document).expect("validate");

        let report = render_report(&violations, &[]);
        assert!(report.contains("## Schema Validation: ✅ Valid"));
        assert!(!report.contains("Validation Errors"));
    }

    #[test]
    fn unparsable_yaml_is_an_error() {
        assert!(parse_yaml("key: [unclosed").is_err());
    }

    #[test]
    fn additional_checks_inspect_template_objects() {
        let document = parse_yaml(
            r#"
objects:
  - kind: Frontend
    metadata: {}
    spec:
      bundleSegments:
        - segmentId: learning
          navItems:
            - title: Overview
      searchEntries:
        - id: learning-search
"#,
        )
        .expect("yaml");

        let checks = additional_checks(&document);

        assert_eq!(
            checks,
            vec![
                "Add metadata.name to identify the Frontend resource".to_string(),
                "Set spec.module.manifestLocation (usually /apps/<app-name>/fed-mods.json)".to_string(),
                "Bundle segment 'learning' has no position; set one to control navigation order".to_string(),
                "Navigation item 'Overview' has no id".to_string(),
                "Search entry 'learning-search' has no alt_title; alternative titles improve search results".to_string(),
            ]
        );
    }

    #[test]
    fn complete_frontend_has_no_recommendations() {
        let document = json!({
            "metadata": {"name": "learning"},
            "spec": {
                "module": {"manifestLocation": "/apps/learning/fed-mods.json"},
                "bundleSegments": [{"segmentId": "s", "position": 100, "navItems": [{"id": "n", "title": "N"}]}],
                "searchEntries": [{"id": "e", "alt_title": ["Learn"]}]
            }
        });
        assert!(additional_checks(&document).is_empty());
    }
}
