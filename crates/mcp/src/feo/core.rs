use std::sync::Arc;

use chrono::Utc;
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, ErrorData, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo};
use rmcp::{ServerHandler, tool, tool_handler, tool_router};
use serde_json::{Value, json};

use crate::feo::bundles::render_bundle_recommendations;
use crate::feo::recommendations::{field_recommendations, render_recommendations};
use crate::feo::schema_cache::{CachedSchema, SchemaCache};
use crate::feo::schemas::{
    FieldRecommendationsRequest, MigrationTemplateRequest, ValidateConfigRequest, YamlTemplateRequest,
};
use crate::feo::template::{
    MigrationType, TemplateOptions, UnknownMigrationType, render_migration, render_migration_guide, render_setup_guide,
    render_template, title_from_app_name,
};
use crate::feo::validation::{additional_checks, parse_yaml, render_report, validate_document};
use crate::server::errors::{internal_error, invalid_params_error};
use crate::server::log_payload::emit_tool_log;
use crate::server::markdown_result;

const SCHEMA_RETRY_ACTION: &str = "Check network access to the FEO schema URL and retry.";

/// MCP handler exposing the Frontend Operator tools.
#[derive(Clone)]
pub struct FeoMcpCore {
    tool_router: ToolRouter<Self>,
    cache: Arc<SchemaCache>,
}

#[tool_router]
impl FeoMcpCore {
    pub fn new(cache: Arc<SchemaCache>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            cache,
        }
    }

    #[tool(
        name = "getFEOSchema",
        annotations(read_only_hint = true),
        description = "Get the latest Frontend Operator CRD schema for validation and reference"
    )]
    async fn get_feo_schema(&self) -> Result<CallToolResult, ErrorData> {
        let outcome = self
            .cache
            .ensure_loaded()
            .await
            .map(|cached| markdown_result(render_schema_overview(self.cache.source_location(), &cached)))
            .map_err(|error| {
                internal_error(
                    "FEO_SCHEMA_UNAVAILABLE",
                    format!("Error fetching FEO schema: {error}"),
                    json!({ "source": self.cache.source_location() }),
                    SCHEMA_RETRY_ACTION,
                )
            });
        emit_tool_log("getFEOSchema", None, &outcome);
        outcome
    }

    #[tool(
        name = "validateFEOConfig",
        annotations(read_only_hint = true),
        description = "Validate frontend.yaml configuration against FEO schema"
    )]
    async fn validate_feo_config(&self, param: Parameters<ValidateConfigRequest>) -> Result<CallToolResult, ErrorData> {
        let outcome = self.validate_config(&param.0).await;
        emit_tool_log(
            "validateFEOConfig",
            Some(json!({ "skipSchemaFetch": param.0.skip_schema_fetch })),
            &outcome,
        );
        outcome
    }

    #[tool(
        name = "getFEOFieldRecommendations",
        annotations(read_only_hint = true),
        description = "Get schema-based field recommendations for specific FEO configuration paths"
    )]
    async fn get_feo_field_recommendations(
        &self,
        param: Parameters<FieldRecommendationsRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        let outcome = self.field_recommendations(&param.0).await;
        emit_tool_log("getFEOFieldRecommendations", serde_json::to_value(&param.0).ok(), &outcome);
        outcome
    }

    #[tool(
        name = "getFEOYamlSetupTemplate",
        annotations(read_only_hint = true),
        description = "Generate complete frontend.yaml template for new applications"
    )]
    async fn get_feo_yaml_setup_template(&self, param: Parameters<YamlTemplateRequest>) -> Result<CallToolResult, ErrorData> {
        let outcome = self.setup_template(&param.0).await;
        emit_tool_log("getFEOYamlSetupTemplate", serde_json::to_value(&param.0).ok(), &outcome);
        outcome
    }

    #[tool(
        name = "getFEOMigrationTemplate",
        annotations(read_only_hint = true),
        description = "Generate customized migration template for converting existing app to FEO"
    )]
    async fn get_feo_migration_template(
        &self,
        param: Parameters<MigrationTemplateRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        let outcome = self.migration_template(&param.0).await;
        emit_tool_log("getFEOMigrationTemplate", serde_json::to_value(&param.0).ok(), &outcome);
        outcome
    }

    async fn validate_config(&self, request: &ValidateConfigRequest) -> Result<CallToolResult, ErrorData> {
        if request.yaml_content.is_empty() {
            return Err(invalid_params_error(
                "MISSING_PARAMETER",
                "Missing required parameter: yamlContent",
                json!({ "parameter": "yamlContent" }),
                "Pass the frontend.yaml content as yamlContent.",
            ));
        }

        let document = parse_yaml(&request.yaml_content).map_err(|error| {
            invalid_params_error(
                "YAML_PARSE_ERROR",
                format!("YAML Parse Error: {error}"),
                json!({}),
                "Fix the YAML syntax and validate again.",
            )
        })?;

        let cached = if request.skip_schema_fetch.unwrap_or(false) {
            self.cache.cached().await
        } else {
            Some(self.cache.ensure_loaded().await.map_err(|error| validation_failure(error.to_string()))?)
        };
        let Some(cached) = cached else {
            return Ok(markdown_result("Warning: Schema validation skipped (schema not available)"));
        };

        let violations = validate_document(&cached.schema, &document).map_err(validation_failure)?;
        Ok(markdown_result(render_report(&violations, &additional_checks(&document))))
    }

    async fn field_recommendations(&self, request: &FieldRecommendationsRequest) -> Result<CallToolResult, ErrorData> {
        let field_path = request.field_path.as_str();
        if field_path.is_empty() {
            return Err(invalid_params_error(
                "MISSING_PARAMETER",
                "Missing required parameter: fieldPath",
                json!({ "parameter": "fieldPath" }),
                "Pass a dot-notation path such as \"module\" or \"bundleSegments\".",
            ));
        }

        let cached = self.cache.ensure_loaded().await.map_err(|error| {
            internal_error(
                "FEO_SCHEMA_UNAVAILABLE",
                format!("Error getting field recommendations: {error}"),
                json!({ "fieldPath": field_path }),
                SCHEMA_RETRY_ACTION,
            )
        })?;

        let recommendations = field_recommendations(&cached.schema, field_path);
        let mut text = render_recommendations(field_path, &recommendations);
        if let Some(bundle) = request.bundle.as_deref().filter(|bundle| !bundle.is_empty()) {
            text.push_str(&render_bundle_recommendations(bundle));
        }
        Ok(markdown_result(text))
    }

    async fn setup_template(&self, request: &YamlTemplateRequest) -> Result<CallToolResult, ErrorData> {
        if request.app_name.is_empty() || request.display_title.is_empty() || request.bundle.is_empty() {
            return Err(invalid_params_error(
                "MISSING_PARAMETER",
                "Missing required parameters: appName, displayTitle, and bundle are required",
                json!({ "parameters": ["appName", "displayTitle", "bundle"] }),
                "Provide appName, displayTitle, and bundle.",
            ));
        }

        let template_failure = |message: String| {
            internal_error(
                "TEMPLATE_GENERATION_FAILED",
                format!("Error generating YAML setup template: {message}"),
                json!({ "appName": request.app_name }),
                SCHEMA_RETRY_ACTION,
            )
        };

        self.cache
            .ensure_loaded()
            .await
            .map_err(|error| template_failure(error.to_string()))?;

        let mut options = TemplateOptions::new(
            &request.app_name,
            &request.display_title,
            &request.bundle,
            request.description.as_deref(),
        );
        options.include_navigation = request.include_navigation.unwrap_or(true);
        options.include_service_tiles = request.include_service_tiles.unwrap_or(true);
        options.include_search = request.include_search.unwrap_or(true);

        let template = render_template(&options).map_err(|error| template_failure(error.to_string()))?;
        Ok(markdown_result(render_setup_guide(&options, &template)))
    }

    async fn migration_template(&self, request: &MigrationTemplateRequest) -> Result<CallToolResult, ErrorData> {
        if request.app_name.is_empty() || request.bundle.is_empty() || request.migration_type.is_empty() {
            return Err(invalid_params_error(
                "MISSING_PARAMETER",
                "Missing required parameters: appName, bundle, and migrationType are required",
                json!({ "parameters": ["appName", "bundle", "migrationType"] }),
                "Provide appName, bundle, and migrationType.",
            ));
        }

        let kind: MigrationType = request.migration_type.parse().map_err(|error: UnknownMigrationType| {
            invalid_params_error(
                "UNKNOWN_MIGRATION_TYPE",
                error.to_string(),
                json!({ "migrationType": request.migration_type }),
                "Use one of: module, navigation, service-tiles, search, full.",
            )
        })?;

        let migration_failure = |message: String| {
            internal_error(
                "TEMPLATE_GENERATION_FAILED",
                format!("Error generating migration template: {message}"),
                json!({ "appName": request.app_name, "migrationType": kind.to_string() }),
                SCHEMA_RETRY_ACTION,
            )
        };

        self.cache
            .ensure_loaded()
            .await
            .map_err(|error| migration_failure(error.to_string()))?;

        let title = request
            .display_title
            .clone()
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| title_from_app_name(&request.app_name));
        let options = TemplateOptions::new(&request.app_name, &title, &request.bundle, None);

        let template = render_migration(kind, &options).map_err(|error| migration_failure(error.to_string()))?;
        Ok(markdown_result(render_migration_guide(kind, &options, &template)))
    }
}

fn validation_failure(message: String) -> ErrorData {
    internal_error(
        "FEO_VALIDATION_FAILED",
        format!("Error validating FEO config: {message}"),
        json!({}),
        SCHEMA_RETRY_ACTION,
    )
}

/// Markdown summary of the cached schema followed by the schema itself.
fn render_schema_overview(source: &str, cached: &CachedSchema) -> String {
    let schema = cached.schema.as_ref();
    let text_or = |key: &str, fallback: &str| -> String {
        match schema.get(key) {
            Some(Value::String(text)) => text.clone(),
            Some(other) => other.to_string(),
            None => fallback.to_string(),
        }
    };

    let definitions: Vec<String> = schema
        .get("$defs")
        .and_then(Value::as_object)
        .map(|defs| {
            defs.iter()
                .map(|(name, definition)| {
                    let description = definition
                        .get("description")
                        .and_then(Value::as_str)
                        .unwrap_or("No description");
                    format!("- **{name}**: {description}")
                })
                .collect()
        })
        .unwrap_or_default();

    let pretty = serde_json::to_string_pretty(schema).unwrap_or_else(|_| schema.to_string());

    format!(
        "# Frontend Operator CRD Schema

Latest schema from: {source}
Cache age: {age} minutes (refreshes hourly)

## Schema Structure
- **Version**: {version}
- **Title**: {title}
- **Root Type**: {root_type}

## Key Definitions
{definitions}

## Full Schema
```json
{pretty}
```",
        age = cached.age_minutes(Utc::now()),
        version = text_or("$schema", "JSON Schema Draft 2020-12"),
        title = text_or("title", "undefined"),
        root_type = text_or("type", "undefined"),
        definitions = definitions.join("\n"),
    )
}

#[tool_handler]
impl ServerHandler for FeoMcpCore {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            protocol_version: ProtocolVersion::LATEST,
            server_info: Implementation {
                name: "HCC FEO MCP Server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: Some("HCC Frontend Operator MCP".to_string()),
                ..Default::default()
            },
            instructions: Some(
                "You are a Model Context Protocol (MCP) server for the Frontend Operator (FEO). You can fetch the FEO \
                 schema, validate frontend.yaml configuration, recommend values for schema fields, generate a \
                 complete frontend.yaml template for new applications, and generate migration templates for \
                 existing applications."
                    .to_string(),
            ),
        }
    }
}
