//! `frontend.yaml` scaffolding for new and migrating applications.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::feo::bundles::{BundleProfile, bundle_profile};

/// Inputs for a generated template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateOptions {
    pub app_name: String,
    pub display_title: String,
    pub bundle: String,
    pub description: String,
    pub include_navigation: bool,
    pub include_service_tiles: bool,
    pub include_search: bool,
}

impl TemplateOptions {
    pub fn new(app_name: &str, display_title: &str, bundle: &str, description: Option<&str>) -> Self {
        let description = description
            .filter(|description| !description.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("[Brief description of what {display_title} does]"));
        Self {
            app_name: app_name.to_string(),
            display_title: display_title.to_string(),
            bundle: bundle.to_string(),
            description,
            include_navigation: true,
            include_service_tiles: true,
            include_search: true,
        }
    }

    fn route(&self) -> String {
        format!("/{}/{}", self.bundle, self.app_name)
    }
}

/// `learning-resources` becomes `Learning Resources`.
pub fn title_from_app_name(app_name: &str) -> String {
    app_name
        .split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Part of a `frontend.yaml` a migration template covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationType {
    Module,
    Navigation,
    ServiceTiles,
    Search,
    Full,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown migration type: {0}. Valid types are: module, navigation, service-tiles, search, full")]
pub struct UnknownMigrationType(pub String);

impl FromStr for MigrationType {
    type Err = UnknownMigrationType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "module" => Ok(Self::Module),
            "navigation" => Ok(Self::Navigation),
            "service-tiles" => Ok(Self::ServiceTiles),
            "search" => Ok(Self::Search),
            "full" => Ok(Self::Full),
            other => Err(UnknownMigrationType(other.to_string())),
        }
    }
}

impl fmt::Display for MigrationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Module => "module",
            Self::Navigation => "navigation",
            Self::ServiceTiles => "service-tiles",
            Self::Search => "search",
            Self::Full => "full",
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OpenShiftTemplate {
    api_version: &'static str,
    kind: &'static str,
    metadata: Metadata,
    objects: Vec<FrontendResource>,
    parameters: Vec<Parameter>,
}

#[derive(Serialize)]
struct Metadata {
    name: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FrontendResource {
    api_version: &'static str,
    kind: &'static str,
    metadata: Metadata,
    spec: FrontendSpec,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FrontendSpec {
    env_name: &'static str,
    title: String,
    deployment_repo: String,
    #[serde(rename = "API")]
    api: ApiVersions,
    frontend: FrontendPaths,
    image: &'static str,
    feo_config_enabled: bool,
    module: Module,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    bundle_segments: Vec<BundleSegment>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    service_tiles: Vec<ServiceTile>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    search_entries: Vec<SearchEntry>,
}

#[derive(Serialize)]
struct ApiVersions {
    versions: Vec<&'static str>,
}

#[derive(Serialize)]
struct FrontendPaths {
    paths: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Module {
    manifest_location: String,
    default_document_title: String,
    modules: Vec<FederatedModule>,
    analytics: Analytics,
}

#[derive(Serialize)]
struct FederatedModule {
    id: String,
    module: &'static str,
    routes: Vec<Route>,
}

#[derive(Serialize)]
struct Route {
    pathname: String,
    props: RouteProps,
}

#[derive(Serialize)]
struct RouteProps {
    bundle: String,
}

#[derive(Serialize)]
struct Analytics {
    #[serde(rename = "APIKey")]
    api_key: &'static str,
    #[serde(rename = "APIKeyDev")]
    api_key_dev: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BundleSegment {
    segment_id: String,
    bundle_id: String,
    position: u32,
    nav_items: Vec<NavItem>,
}

#[derive(Serialize)]
struct NavItem {
    id: String,
    title: String,
    href: String,
    product: String,
}

#[derive(Serialize)]
struct ServiceTile {
    id: String,
    section: &'static str,
    group: &'static str,
    title: String,
    href: String,
    description: String,
    icon: &'static str,
}

#[derive(Serialize)]
struct SearchEntry {
    id: String,
    title: String,
    href: String,
    description: String,
    alt_title: Vec<String>,
}

#[derive(Serialize)]
struct Parameter {
    name: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    required: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<String>,
}

/// Spec sections rendered on their own for a partial migration.
#[derive(Serialize, Default)]
#[serde(rename_all = "camelCase")]
struct SpecFragment {
    #[serde(skip_serializing_if = "Option::is_none")]
    module: Option<Module>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bundle_segments: Option<Vec<BundleSegment>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    service_tiles: Option<Vec<ServiceTile>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    search_entries: Option<Vec<SearchEntry>>,
}

fn module_section(options: &TemplateOptions) -> Module {
    let app = &options.app_name;
    Module {
        manifest_location: format!("/apps/{app}/fed-mods.json"),
        default_document_title: format!("{} | Red Hat Hybrid Cloud Console", options.display_title),
        modules: vec![FederatedModule {
            id: app.clone(),
            module: "./RootApp",
            routes: vec![Route {
                pathname: options.route(),
                props: RouteProps {
                    bundle: options.bundle.clone(),
                },
            }],
        }],
        analytics: Analytics {
            api_key: "[PRODUCTION-API-KEY]",
            api_key_dev: "[DEVELOPMENT-API-KEY]",
        },
    }
}

fn bundle_segments(options: &TemplateOptions, profile: &BundleProfile) -> Vec<BundleSegment> {
    vec![BundleSegment {
        segment_id: options.app_name.clone(),
        bundle_id: options.bundle.clone(),
        position: profile.position,
        nav_items: vec![NavItem {
            id: options.app_name.clone(),
            title: options.display_title.clone(),
            href: options.route(),
            product: profile.product.clone(),
        }],
    }]
}

fn service_tiles(options: &TemplateOptions, profile: &BundleProfile) -> Vec<ServiceTile> {
    vec![ServiceTile {
        id: options.app_name.clone(),
        section: profile.section,
        group: profile.group,
        title: options.display_title.clone(),
        href: options.route(),
        description: options.description.clone(),
        icon: profile.icon,
    }]
}

fn search_entries(options: &TemplateOptions) -> Vec<SearchEntry> {
    vec![SearchEntry {
        id: options.app_name.clone(),
        title: options.display_title.clone(),
        href: options.route(),
        description: options.description.clone(),
        alt_title: vec![options.display_title.clone(), options.app_name.replace('-', " ")],
    }]
}

/// Render the YAML body of a `frontend.yaml` for `options`.
pub fn render_template(options: &TemplateOptions) -> Result<String, serde_yaml::Error> {
    let app = &options.app_name;
    let profile = bundle_profile(&options.bundle);

    let template = OpenShiftTemplate {
        api_version: "v1",
        kind: "Template",
        metadata: Metadata { name: app.clone() },
        objects: vec![FrontendResource {
            api_version: "cloud.redhat.com/v1alpha1",
            kind: "Frontend",
            metadata: Metadata { name: app.clone() },
            spec: FrontendSpec {
                env_name: "${ENV_NAME}",
                title: options.display_title.clone(),
                deployment_repo: format!("https://github.com/RedHatInsights/{app}"),
                api: ApiVersions { versions: vec!["v1"] },
                frontend: FrontendPaths {
                    paths: vec![format!("/apps/{app}")],
                },
                image: "${IMAGE}:${IMAGE_TAG}",
                feo_config_enabled: true,
                module: module_section(options),
                bundle_segments: if options.include_navigation {
                    bundle_segments(options, &profile)
                } else {
                    Vec::new()
                },
                service_tiles: if options.include_service_tiles {
                    service_tiles(options, &profile)
                } else {
                    Vec::new()
                },
                search_entries: if options.include_search {
                    search_entries(options)
                } else {
                    Vec::new()
                },
            },
        }],
        parameters: vec![
            Parameter {
                name: "ENV_NAME",
                required: Some(true),
                value: None,
            },
            Parameter {
                name: "IMAGE_TAG",
                required: Some(true),
                value: None,
            },
            Parameter {
                name: "IMAGE",
                required: None,
                value: Some(format!("quay.io/redhat-services-prod/hcc-platex-services/{app}")),
            },
        ],
    };

    serde_yaml::to_string(&template)
}

/// Render the configuration a migration of `kind` adds to `frontend.yaml`.
///
/// Partial migrations render only their `spec` section; `Full` renders the
/// whole template.
pub fn render_migration(kind: MigrationType, options: &TemplateOptions) -> Result<String, serde_yaml::Error> {
    let profile = bundle_profile(&options.bundle);
    let fragment = match kind {
        MigrationType::Full => return render_template(options),
        MigrationType::Module => SpecFragment {
            module: Some(module_section(options)),
            ..Default::default()
        },
        MigrationType::Navigation => SpecFragment {
            bundle_segments: Some(bundle_segments(options, &profile)),
            ..Default::default()
        },
        MigrationType::ServiceTiles => SpecFragment {
            service_tiles: Some(service_tiles(options, &profile)),
            ..Default::default()
        },
        MigrationType::Search => SpecFragment {
            search_entries: Some(search_entries(options)),
            ..Default::default()
        },
    };
    serde_yaml::to_string(&fragment)
}

fn migration_steps(kind: MigrationType) -> &'static str {
    match kind {
        MigrationType::Module => {
            "1. Add the `module` section to the Frontend spec in `deploy/frontend.yaml`
2. Move route definitions from chrome-service-backend into `modules[].routes`
3. Check that `manifestLocation` matches the path your build publishes"
        }
        MigrationType::Navigation => {
            "1. Add the `bundleSegments` entry to the Frontend spec
2. Copy each navigation item from the chrome-service-backend navigation file
3. Keep `id` values stable so existing links and permissions keep working
4. Adjust `position` to place the segment within the bundle"
        }
        MigrationType::ServiceTiles => {
            "1. Add the `serviceTiles` entry to the Frontend spec
2. Copy the tile from the chrome-service-backend services file
3. Confirm `section` and `group` match an existing services dropdown group"
        }
        MigrationType::Search => {
            "1. Add the `searchEntries` entry to the Frontend spec
2. Copy the static search entries for the application
3. Add `alt_title` values for the terms users search for"
        }
        MigrationType::Full => {
            "1. Save the template as `deploy/frontend.yaml`
2. Move module routes, navigation, service tiles and search entries out of chrome-service-backend
3. Replace the analytics key placeholders
4. Remove the old entries from chrome-service-backend once the new configuration is live"
        }
    }
}

/// Migration tool response: configuration, steps and validation checklist.
pub fn render_migration_guide(kind: MigrationType, options: &TemplateOptions, template: &str) -> String {
    format!(
        "# FEO Migration Template: {kind}

App: **{app}** → **{title}**
Bundle: **{bundle}**

## Configuration to Add/Update

```yaml
{template}```

## Migration Steps

{steps}

## Validation

After applying this configuration:
1. Run `npm run build` to validate
2. Check for schema validation errors
3. Test in development environment
4. Mark corresponding items for replacement in chrome-service-backend",
        app = options.app_name,
        title = options.display_title,
        bundle = options.bundle,
        steps = migration_steps(kind),
    )
}

/// Full tool response: template plus next steps.
pub fn render_setup_guide(options: &TemplateOptions, template: &str) -> String {
    format!(
        "# Complete Frontend.yaml Template

Generated for: **{title}** ({app})
Bundle: **{bundle}**

## Template

```yaml
{template}```

## Next Steps

1. **Save** this as `deploy/frontend.yaml` in your repository
2. **Update values**:
   - Replace `[PRODUCTION-API-KEY]` with your analytics key
   - Replace `[DEVELOPMENT-API-KEY]` with your dev analytics key
{tile_step}   - Adjust position value based on desired navigation placement
   - Customize description and alt_title entries
3. **Validate**:
   ```bash
   npm run build  # Will validate schema
   ```
4. **Test** in development environment
5. **Deploy** to staging/production",
        title = options.display_title,
        app = options.app_name,
        bundle = options.bundle,
        tile_step = if bundle_profile(&options.bundle).has_placeholders() {
            "   - Replace the service tile `section`, `group` and `icon` placeholders\n"
        } else {
            ""
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feo::validation::{additional_checks, parse_yaml};

    #[test]
    fn description_defaults_to_placeholder() {
        let options = TemplateOptions::new("learning-resources", "Learning Resources", "insights", None);
        assert_eq!(options.description, "[Brief description of what Learning Resources does]");
    }

    #[test]
    fn template_carries_manifest_route_and_sections() {
        let options = TemplateOptions::new("learning-resources", "Learning Resources", "insights", Some("Docs"));
        let yaml = render_template(&options).expect("render");
        let document = parse_yaml(&yaml).expect("round trip");

        let spec = &document["objects"][0]["spec"];
        assert_eq!(spec["module"]["manifestLocation"], "/apps/learning-resources/fed-mods.json");
        assert_eq!(
            spec["module"]["modules"][0]["routes"][0]["pathname"],
            "/insights/learning-resources"
        );
        assert_eq!(spec["bundleSegments"][0]["navItems"][0]["product"], "Red Hat Insights");
        assert_eq!(spec["serviceTiles"][0]["description"], "Docs");
        assert_eq!(spec["searchEntries"][0]["alt_title"][0], "Learning Resources");
        assert!(additional_checks(&document).is_empty());
    }

    #[test]
    fn optional_sections_can_be_left_out() {
        let mut options = TemplateOptions::new("my-app", "My App", "settings", None);
        options.include_navigation = false;
        options.include_service_tiles = false;
        options.include_search = false;

        let document = parse_yaml(&render_template(&options).expect("render")).expect("yaml");
        let spec = &document["objects"][0]["spec"];

        assert!(spec.get("bundleSegments").is_none());
        assert!(spec.get("serviceTiles").is_none());
        assert!(spec.get("searchEntries").is_none());
    }

    #[test]
    fn guide_wraps_template_with_next_steps() {
        let options = TemplateOptions::new("my-app", "My App", "settings", None);
        let guide = render_setup_guide(&options, "kind: Template\n");

        assert!(guide.starts_with("# Complete Frontend.yaml Template\n\nGenerated for: **My App** (my-app)\nBundle: **settings**"));
        assert!(guide.contains("```yaml\nkind: Template\n```"));
        assert!(guide.contains("## Next Steps"));
        assert!(!guide.contains("placeholders"));
    }

    #[test]
    fn tiles_follow_the_bundle_profile() {
        let options = TemplateOptions::new("cost-app", "Cost App", "subscriptions", None);
        let document = parse_yaml(&render_template(&options).expect("render")).expect("yaml");
        let spec = &document["objects"][0]["spec"];

        assert_eq!(spec["bundleSegments"][0]["position"], 600);
        assert_eq!(spec["serviceTiles"][0]["section"], "spend-management");
        assert_eq!(spec["serviceTiles"][0]["group"], "subscriptions");
        assert_eq!(spec["serviceTiles"][0]["icon"], "SubscriptionsIcon");
    }

    #[test]
    fn unknown_bundles_keep_tile_placeholders() {
        let options = TemplateOptions::new("edge-app", "Edge App", "edge", None);
        let yaml = render_template(&options).expect("render");

        assert!(yaml.contains("[SERVICE-SECTION]"));
        assert!(render_setup_guide(&options, &yaml).contains("Replace the service tile `section`, `group` and `icon` placeholders"));
    }

    #[test]
    fn app_names_become_titles() {
        assert_eq!(title_from_app_name("learning-resources"), "Learning Resources");
        assert_eq!(title_from_app_name("app"), "App");
    }

    #[test]
    fn migration_types_parse_by_name() {
        assert_eq!("service-tiles".parse::<MigrationType>(), Ok(MigrationType::ServiceTiles));
        assert_eq!(MigrationType::ServiceTiles.to_string(), "service-tiles");
        assert_eq!(
            "widgets".parse::<MigrationType>().expect_err("unknown").to_string(),
            "Unknown migration type: widgets. Valid types are: module, navigation, service-tiles, search, full"
        );
    }

    #[test]
    fn partial_migrations_render_one_section() {
        let options = TemplateOptions::new("my-app", "My App", "ansible", None);

        let navigation = parse_yaml(&render_migration(MigrationType::Navigation, &options).expect("render")).expect("yaml");
        let segments = navigation.as_object().expect("mapping");
        assert_eq!(segments.len(), 1);
        assert_eq!(navigation["bundleSegments"][0]["position"], 400);
        assert_eq!(
            navigation["bundleSegments"][0]["navItems"][0]["product"],
            "Red Hat Ansible Automation Platform"
        );

        let module = parse_yaml(&render_migration(MigrationType::Module, &options).expect("render")).expect("yaml");
        assert_eq!(module["module"]["defaultDocumentTitle"], "My App | Red Hat Hybrid Cloud Console");
        assert!(module.get("bundleSegments").is_none());

        let full = parse_yaml(&render_migration(MigrationType::Full, &options).expect("render")).expect("yaml");
        assert_eq!(full["kind"], "Template");
    }

    #[test]
    fn migration_guide_lists_steps_and_validation() {
        let options = TemplateOptions::new("my-app", "My App", "insights", None);
        let guide = render_migration_guide(MigrationType::Search, &options, "searchEntries: []\n");

        assert!(guide.starts_with("# FEO Migration Template: search\n\nApp: **my-app** → **My App**\nBundle: **insights**"));
        assert!(guide.contains("```yaml\nsearchEntries: []\n```"));
        assert!(guide.contains("## Migration Steps\n\n1. Add the `searchEntries` entry"));
        assert!(guide.ends_with("4. Mark corresponding items for replacement in chrome-service-backend"));
    }
}
