use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for `validateFEOConfig`.
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ValidateConfigRequest {
    #[schemars(description = "YAML content to validate")]
    pub yaml_content: String,
    #[schemars(description = "Skip fetching latest schema and use cached version (default: false)")]
    pub skip_schema_fetch: Option<bool>,
}

/// Parameters for `getFEOFieldRecommendations`.
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FieldRecommendationsRequest {
    #[schemars(
        description = "Dot-notation path to field (e.g., \"module\", \"bundleSegments\", \"serviceTiles\")"
    )]
    pub field_path: String,
    #[schemars(description = "Bundle context for bundle-specific recommendations (optional)")]
    pub bundle: Option<String>,
}

/// Parameters for `getFEOYamlSetupTemplate`.
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct YamlTemplateRequest {
    #[schemars(description = "Application name in kebab-case (e.g., \"my-new-app\")")]
    pub app_name: String,
    #[schemars(description = "Human-readable application title")]
    pub display_title: String,
    #[schemars(description = "Target bundle (insights, openshift, ansible, settings, etc.)")]
    pub bundle: String,
    #[schemars(description = "Brief description of what the application does")]
    pub description: Option<String>,
    #[schemars(description = "Include navigation bundle segment (default: true)")]
    pub include_navigation: Option<bool>,
    #[schemars(description = "Include service tiles configuration (default: true)")]
    pub include_service_tiles: Option<bool>,
    #[schemars(description = "Include search entries (default: true)")]
    pub include_search: Option<bool>,
}

/// Parameters for `getFEOMigrationTemplate`.
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MigrationTemplateRequest {
    #[schemars(description = "Application name in kebab-case (e.g., \"learning-resources\")")]
    pub app_name: String,
    #[schemars(description = "Target bundle (insights, openshift, ansible, settings, etc.)")]
    pub bundle: String,
    #[schemars(
        description = "Type of migration to generate template for: navigation, service-tiles, search, module, or full"
    )]
    pub migration_type: String,
    #[schemars(description = "Human-readable application title (optional)")]
    pub display_title: Option<String>,
}
