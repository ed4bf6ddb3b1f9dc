use crate::keystore::store::{CredentialStore, Credentials};
use anyhow::{Context, Result, anyhow};
use std::fmt;
use tracing::info;

/// JIRA base URL environment variable.
pub const BASE_URL_ENV_VAR: &str = "JIRA_BASE_URL";
/// JIRA API token environment variable.
pub const API_TOKEN_ENV_VAR: &str = "JIRA_API_TOKEN";

/// Where resolved credentials came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    Environment,
    Keychain,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Environment => f.write_str("environment variables"),
            CredentialSource::Keychain => f.write_str("system keychain"),
        }
    }
}

/// Credentials from `JIRA_BASE_URL` and `JIRA_API_TOKEN`, only when both are non-empty.
pub fn credentials_from_env() -> Option<Credentials> {
    let base_url = std::env::var(BASE_URL_ENV_VAR).ok().filter(|value| !value.trim().is_empty())?;
    let api_token = std::env::var(API_TOKEN_ENV_VAR).ok().filter(|value| !value.trim().is_empty())?;
    Some(Credentials { base_url, api_token })
}

/// Resolve credentials for the JIRA server: environment first, then the store.
pub async fn resolve_credentials(store: &CredentialStore) -> Result<(Credentials, CredentialSource)> {
    resolve_from(credentials_from_env(), store).await
}

async fn resolve_from(
    from_env: Option<Credentials>,
    store: &CredentialStore,
) -> Result<(Credentials, CredentialSource)> {
    if let Some(credentials) = from_env {
        info!("Using JIRA credentials from {}", CredentialSource::Environment);
        return Ok((credentials, CredentialSource::Environment));
    }

    let credentials = store
        .get()
        .await
        .context("Failed to load JIRA credentials from keychain.")?
        .ok_or_else(|| anyhow!("Failed to load JIRA credentials from keychain."))?;
    info!("Using JIRA credentials from {}", CredentialSource::Keychain);
    Ok((credentials, CredentialSource::Keychain))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keystore::backend::memory::MemoryBackend;
    use std::sync::Arc;

    fn empty_store(temp: &tempfile::TempDir) -> CredentialStore {
        CredentialStore::new(temp.path().join("config"), Arc::new(MemoryBackend::default()))
    }

    #[test]
    fn env_credentials_require_both_variables() {
        temp_env::with_vars(
            [
                (BASE_URL_ENV_VAR, Some("https://issues.example.com")),
                (API_TOKEN_ENV_VAR, Some("env-token")),
            ],
            || {
                assert_eq!(
                    credentials_from_env(),
                    Some(Credentials::new("https://issues.example.com", "env-token"))
                );
            },
        );

        temp_env::with_vars(
            [
                (BASE_URL_ENV_VAR, Some("https://issues.example.com")),
                (API_TOKEN_ENV_VAR, None),
            ],
            || assert_eq!(credentials_from_env(), None),
        );

        temp_env::with_vars(
            [(BASE_URL_ENV_VAR, Some("")), (API_TOKEN_ENV_VAR, Some("env-token"))],
            || assert_eq!(credentials_from_env(), None),
        );
    }

    #[tokio::test]
    async fn environment_wins_over_store() {
        let temp = tempfile::tempdir().expect("tempdir");
        let store = empty_store(&temp);
        store
            .store(&Credentials::new("https://stored.example.com", "stored-token"))
            .await
            .expect("store");

        let env = Credentials::new("https://env.example.com", "env-token");
        let (credentials, source) = resolve_from(Some(env.clone()), &store).await.expect("resolve");

        assert_eq!(credentials, env);
        assert_eq!(source, CredentialSource::Environment);
    }

    #[tokio::test]
    async fn falls_back_to_store() {
        let temp = tempfile::tempdir().expect("tempdir");
        let store = empty_store(&temp);
        let stored = Credentials::new("https://stored.example.com", "stored-token");
        store.store(&stored).await.expect("store");

        let (credentials, source) = resolve_from(None, &store).await.expect("resolve");

        assert_eq!(credentials, stored);
        assert_eq!(source, CredentialSource::Keychain);
    }

    #[tokio::test]
    async fn missing_credentials_is_an_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let store = empty_store(&temp);

        let error = resolve_from(None, &store).await.expect_err("no credentials");

        assert_eq!(error.to_string(), "Failed to load JIRA credentials from keychain.");
    }
}
