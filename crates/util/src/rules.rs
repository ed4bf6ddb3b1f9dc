//! Claude agent → Cursor rule conversion.
//!
//! Agent files are markdown with a small front-matter block. Each one becomes
//! a `.mdc` rule whose front matter carries a description and a glob picked
//! from the agent's name.

use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

const AGENT_PREFIXES: [&str; 2] = ["hcc-frontend-", "hcc-infra-"];
const MAX_VALUE_CHARS: usize = 200;

const GLOB_TYPESCRIPT: &str = "**/*.{ts,tsx}";
const GLOB_PATTERNFLY: &str = "**/*.{jsx,tsx,js,ts}";
const GLOB_STORYBOOK: &str = "**/*.{stories.ts,stories.tsx,stories.js}";
const GLOB_UNIT_TEST: &str = "**/*.{test.ts,spec.ts,test.js,spec.js}";
const GLOB_CODE_QUALITY: &str = "**/*.{ts,tsx,js,jsx}";
const GLOB_DEPENDENCY_CLEANUP: &str = "**/*.{ts,tsx,js,jsx,json}";
const GLOB_CSS_UTILITY: &str = "**/*.{tsx,jsx,css,scss}";
const GLOB_COMPONENTS: &str = "**/*.{tsx,jsx}";
const GLOB_EVERYTHING: &str = "**/*";
const GLOB_YAML: &str = "**/*.{yml,yaml}";

const FRONT_MATTER_FENCE: &str = "---\n";
const FRONT_MATTER_CLOSE: &str = "\n---\n";

#[derive(Debug, Error)]
pub enum RulesError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No frontmatter found in {file}")]
    MissingFrontMatter { file: String },
}

impl RulesError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        RulesError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// A generated Cursor rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleFile {
    pub file_name: String,
    pub contents: String,
}

/// Result of rendering every agent in a directory.
#[derive(Debug, Default)]
pub struct RenderedRules {
    pub rules: Vec<RuleFile>,
    /// Agent files that could not be converted, keyed by file name.
    pub failures: Vec<(String, RulesError)>,
}

/// Differences between generated rules and the rules directory.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub checked: usize,
    /// Agent files that could not be rendered at all.
    pub failed: Vec<String>,
    pub missing: Vec<String>,
    pub stale: Vec<String>,
    pub unexpected: Vec<String>,
}

impl SyncReport {
    pub fn is_in_sync(&self) -> bool {
        self.failed.is_empty() && self.missing.is_empty() && self.stale.is_empty() && self.unexpected.is_empty()
    }
}

/// Pick the rule glob for an agent based on its name.
pub fn determine_globs(agent_name: &str) -> &'static str {
    let name = agent_name.to_lowercase();
    let has = |needle: &str| name.contains(needle);

    if has("typescript") {
        GLOB_TYPESCRIPT
    } else if has("storybook") {
        GLOB_STORYBOOK
    } else if has("unit-test") || has("test-writer") {
        GLOB_UNIT_TEST
    } else if has("code-quality") || has("scanner") {
        GLOB_CODE_QUALITY
    } else if has("dependency-cleanup") {
        GLOB_DEPENDENCY_CLEANUP
    } else if has("css-utility") {
        GLOB_CSS_UTILITY
    } else if has("dataview") || has("component-builder") || has("patternfly") {
        GLOB_COMPONENTS
    } else if has("hello-world") {
        GLOB_EVERYTHING
    } else if has("db-upgrade") || has("infra") {
        GLOB_YAML
    } else {
        GLOB_PATTERNFLY
    }
}

/// Parsed agent front matter plus the trimmed markdown body.
#[derive(Debug)]
struct AgentDocument {
    front_matter: BTreeMap<String, Value>,
    body: String,
}

fn parse_agent(file: &str, content: &str) -> Result<AgentDocument, RulesError> {
    let missing = || RulesError::MissingFrontMatter { file: file.to_string() };
    let rest = content.strip_prefix(FRONT_MATTER_FENCE).ok_or_else(missing)?;
    let close = rest.find(FRONT_MATTER_CLOSE).ok_or_else(missing)?;
    let header = &rest[..close];
    let body = &rest[close + FRONT_MATTER_CLOSE.len()..];

    let mut front_matter = BTreeMap::new();
    let mut current: Option<(String, String)> = None;
    for line in header.split('\n') {
        if let Some((key, value)) = split_key(line) {
            if let Some((previous_key, previous_value)) = current.take() {
                front_matter.insert(previous_key, clean_value(previous_value.trim()));
            }
            current = Some((key.to_string(), value.to_string()));
        } else if let Some((_, value)) = current.as_mut()
            && !line.trim().is_empty()
        {
            value.push(' ');
            value.push_str(line.trim());
        }
    }
    if let Some((key, value)) = current {
        front_matter.insert(key, clean_value(value.trim()));
    }

    Ok(AgentDocument {
        front_matter,
        body: body.trim().to_string(),
    })
}

/// `key: value` where the key is made of ASCII alphanumerics, `_` or `-`.
fn split_key(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once(':')?;
    let valid_key = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    valid_key.then_some((key, value.trim_start()))
}

fn clean_value(raw: &str) -> Value {
    let mut value = raw;
    let quoted = value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"')) || (value.starts_with('\'') && value.ends_with('\'')));
    if quoted {
        value = &value[1..value.len() - 1];
    }

    if value.starts_with('[')
        && value.ends_with(']')
        && let Ok(list) = serde_json::from_str::<Vec<Value>>(value)
    {
        return Value::Array(list);
    }

    let mut text = value.split("Examples:").next().unwrap_or_default();
    if text.len() != value.len() {
        text = text.trim();
    }

    if text.chars().count() > MAX_VALUE_CHARS {
        let truncated: String = text.chars().take(MAX_VALUE_CHARS).collect();
        return Value::String(format!("{}...", truncated.trim()));
    }
    Value::String(text.to_string())
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Array(items) => items.iter().map(display_value).collect::<Vec<_>>().join(","),
        other => other.to_string(),
    }
}

/// Cursor rule file name for an agent file name, or `None` when it is not an agent.
pub fn rule_file_name(agent_file: &str) -> Option<String> {
    let stem = agent_file.strip_suffix(".md")?;
    AGENT_PREFIXES
        .iter()
        .find_map(|prefix| stem.strip_prefix(prefix))
        .map(|name| format!("{name}.mdc"))
}

/// Render one agent file into its Cursor rule.
pub fn render_rule(agent_file: &str, content: &str) -> Result<RuleFile, RulesError> {
    let file_name = rule_file_name(agent_file).ok_or_else(|| RulesError::MissingFrontMatter {
        file: agent_file.to_string(),
    })?;
    let agent_name = agent_file.strip_suffix(".md").unwrap_or(agent_file);
    let document = parse_agent(agent_file, content)?;

    let non_empty = |key: &str| {
        document
            .front_matter
            .get(key)
            .map(display_value)
            .filter(|value| !value.is_empty())
    };
    let description = non_empty("description")
        .or_else(|| non_empty("name"))
        .unwrap_or_else(|| agent_name.to_string());
    let globs = determine_globs(agent_name);

    Ok(RuleFile {
        file_name,
        contents: format!(
            "---\ndescription: \"{description}\"\nglobs: \"{globs}\"\n---\n\n{}",
            document.body
        ),
    })
}

/// Render every agent in `agents_dir`. Per-file failures do not stop the batch.
pub fn render_rules(agents_dir: &Path) -> Result<RenderedRules, RulesError> {
    let mut agent_files = Vec::new();
    for entry in fs::read_dir(agents_dir).map_err(|error| RulesError::io(agents_dir, error))? {
        let entry = entry.map_err(|error| RulesError::io(agents_dir, error))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if rule_file_name(&name).is_some() {
            agent_files.push(name);
        }
    }
    agent_files.sort();

    let mut rendered = RenderedRules::default();
    for file in agent_files {
        let path = agents_dir.join(&file);
        let result = fs::read_to_string(&path)
            .map_err(|error| RulesError::io(&path, error))
            .and_then(|content| render_rule(&file, &content));
        match result {
            Ok(rule) => rendered.rules.push(rule),
            Err(error) => {
                warn!(file = %file, error = %error, "failed to convert agent");
                rendered.failures.push((file, error));
            }
        }
    }
    Ok(rendered)
}

/// Convert agents into `.mdc` files under `rules_dir`.
pub fn convert_agents(agents_dir: &Path, rules_dir: &Path) -> Result<RenderedRules, RulesError> {
    fs::create_dir_all(rules_dir).map_err(|error| RulesError::io(rules_dir, error))?;
    let rendered = render_rules(agents_dir)?;
    for rule in &rendered.rules {
        let path = rules_dir.join(&rule.file_name);
        fs::write(&path, &rule.contents).map_err(|error| RulesError::io(&path, error))?;
        info!(rule = %rule.file_name, "created cursor rule");
    }
    Ok(rendered)
}

/// Compare freshly rendered rules against what `rules_dir` currently holds.
pub fn check_rules(agents_dir: &Path, rules_dir: &Path) -> Result<SyncReport, RulesError> {
    let rendered = render_rules(agents_dir)?;
    let mut report = SyncReport {
        checked: rendered.rules.len(),
        failed: rendered.failures.iter().map(|(file, _)| file.clone()).collect(),
        ..SyncReport::default()
    };

    for rule in &rendered.rules {
        let path = rules_dir.join(&rule.file_name);
        match fs::read_to_string(&path) {
            Ok(existing) if existing == rule.contents => {}
            Ok(_) => report.stale.push(rule.file_name.clone()),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => report.missing.push(rule.file_name.clone()),
            Err(error) => return Err(RulesError::io(&path, error)),
        }
    }

    if rules_dir.exists() {
        for entry in fs::read_dir(rules_dir).map_err(|error| RulesError::io(rules_dir, error))? {
            let entry = entry.map_err(|error| RulesError::io(rules_dir, error))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.ends_with(".mdc") && !rendered.rules.iter().any(|rule| rule.file_name == name) {
                report.unexpected.push(name);
            }
        }
        report.unexpected.sort();
    }

    Ok(report)
}
