use hcc_jira_api::{CreateMetaFilter, JiraClient};
use rmcp::model::ErrorData;
use serde_json::{Map, Value, json};

use super::pick;
use crate::jira::schemas::CreateMetadataRequest;
use crate::server::errors::upstream_error;

const PROJECT_KEYS: &[&str] = &["key", "id", "name"];
const ISSUETYPE_KEYS: &[&str] = &["id", "name", "description", "subtask"];
const FIELD_KEYS: &[&str] = &[
    "name",
    "required",
    "hasDefaultValue",
    "schema",
    "operations",
    "allowedValues",
    "autoCompleteUrl",
];

/// `get_jira_create_metadata`: projects, issue types, and their fields.
pub(crate) async fn create_metadata(client: &JiraClient, request: &CreateMetadataRequest) -> Result<Value, ErrorData> {
    let filter = CreateMetaFilter {
        project_key: request.project_key.clone(),
        project_id: request.project_id.clone(),
        issuetype_name: request.issuetype_name.clone(),
        issuetype_id: request.issuetype_id.clone(),
    };
    let metadata = client
        .create_metadata(&filter)
        .await
        .map_err(|error| upstream_error(&error))?;

    let projects: Vec<Value> = array(&metadata, "projects").map(summarize_project).collect();
    Ok(json!({ "projects": projects }))
}

fn summarize_project(project: &Value) -> Value {
    let mut summary = pick(project, PROJECT_KEYS);
    if project.get("issuetypes").is_some() {
        let issuetypes: Vec<Value> = array(project, "issuetypes").map(summarize_issuetype).collect();
        summary.insert("issuetypes".into(), Value::Array(issuetypes));
    }
    Value::Object(summary)
}

fn summarize_issuetype(issuetype: &Value) -> Value {
    let mut summary = pick(issuetype, ISSUETYPE_KEYS);
    let fields: Map<String, Value> = issuetype
        .get("fields")
        .and_then(Value::as_object)
        .map(|fields| {
            fields
                .iter()
                .map(|(id, field)| (id.clone(), Value::Object(pick(field, FIELD_KEYS))))
                .collect()
        })
        .unwrap_or_default();
    summary.insert("fields".into(), Value::Object(fields));
    Value::Object(summary)
}

fn array<'a>(value: &'a Value, key: &str) -> impl Iterator<Item = &'a Value> {
    value.get(key).and_then(Value::as_array).into_iter().flatten()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jira::tools::test_client;
    use hcc_jira_api::test_support::{CannedResponse, MockJira};

    #[tokio::test]
    async fn reshapes_projects_issue_types_and_fields() {
        let server = MockJira::start(vec![CannedResponse::json(
            200,
            json!({
                "expand": "projects",
                "projects": [{
                    "key": "RHCLOUD",
                    "id": "1",
                    "name": "Hybrid Cloud Console",
                    "avatarUrls": {},
                    "issuetypes": [{
                        "id": "10",
                        "name": "Bug",
                        "description": "A problem",
                        "subtask": false,
                        "iconUrl": "https://example.com/bug.png",
                        "fields": {
                            "summary": {
                                "name": "Summary",
                                "required": true,
                                "hasDefaultValue": false,
                                "schema": {"type": "string"},
                                "operations": ["set"],
                                "key": "summary"
                            }
                        }
                    }]
                }]
            }),
        )])
        .await;
        let request = CreateMetadataRequest {
            project_key: Some("RHCLOUD".into()),
            issuetype_name: Some("Bug".into()),
            ..CreateMetadataRequest::default()
        };

        let payload = create_metadata(&test_client(&server.base_url), &request)
            .await
            .expect("payload");

        let project = &payload["projects"][0];
        assert_eq!(project["name"], "Hybrid Cloud Console");
        assert!(project.get("avatarUrls").is_none());
        let issuetype = &project["issuetypes"][0];
        assert_eq!(issuetype["subtask"], false);
        assert!(issuetype.get("iconUrl").is_none());
        assert_eq!(
            issuetype["fields"]["summary"],
            json!({
                "name": "Summary",
                "required": true,
                "hasDefaultValue": false,
                "schema": {"type": "string"},
                "operations": ["set"]
            })
        );

        let recorded = &server.requests()[0];
        assert_eq!(recorded.path, "/rest/api/2/issue/createmeta");
        assert_eq!(
            recorded.query,
            "projectKeys=RHCLOUD&issuetypeNames=Bug&expand=projects.issuetypes.fields"
        );
    }

    #[tokio::test]
    async fn issue_types_without_fields_get_empty_map() {
        let server = MockJira::start(vec![CannedResponse::json(
            200,
            json!({"projects": [{"key": "A", "issuetypes": [{"id": "1", "name": "Task"}]}]}),
        )])
        .await;

        let payload = create_metadata(&test_client(&server.base_url), &CreateMetadataRequest::default())
            .await
            .expect("payload");

        assert_eq!(payload["projects"][0]["issuetypes"][0]["fields"], json!({}));
    }

    #[tokio::test]
    async fn missing_projects_is_empty_list() {
        let server = MockJira::start(vec![CannedResponse::json(200, json!({}))]).await;

        let payload = create_metadata(&test_client(&server.base_url), &CreateMetadataRequest::default())
            .await
            .expect("payload");

        assert_eq!(payload, json!({"projects": []}));
    }
}
