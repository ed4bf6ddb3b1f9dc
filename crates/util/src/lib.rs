//! Shared helpers for the HCC MCP servers.
//!
//! - [`keystore`]: JIRA credential persistence split between a plain config
//!   file and the OS keychain, plus environment-variable resolution.
//! - [`rules`]: conversion of Claude agent files into Cursor rule files.
//! - [`path_processing`]: tilde expansion for user supplied paths.

pub mod keystore;
pub mod path_processing;
pub mod rules;

pub use keystore::{
    CredentialSource, CredentialStore, CredentialStoreError, Credentials, KeyringBackend, SecretBackend, credentials_from_env,
    resolve_credentials,
};
pub use path_processing::expand_tilde;

use once_cell::sync::Lazy;
use regex::Regex;

static SENSITIVE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)(authorization: )([\w\-\.=:/+ ]+)",
        r"(?i)([A-Z0-9_]*?(KEY|TOKEN|SECRET|PASSWORD)=)([^\s]+)",
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
});

/// Redacts values that look like secrets in a string.
pub fn redact_sensitive(input: &str) -> String {
    let mut redacted = input.to_string();
    for pattern in SENSITIVE_PATTERNS.iter() {
        redacted = pattern
            .replace_all(&redacted, |caps: &regex::Captures| {
                let prefix = caps.get(1).map(|m| m.as_str()).unwrap_or("");
                format!("{}<redacted>", prefix)
            })
            .to_string();
    }
    redacted
}
