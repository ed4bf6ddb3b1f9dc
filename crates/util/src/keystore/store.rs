//! JIRA credential persistence.
//!
//! The base URL lives in a small JSON file under the per-user config
//! directory; the API token only ever lives in the secure store. Both halves
//! must be present for the credentials to count as configured.

use crate::expand_tilde;
use crate::keystore::backend::{KeyringBackend, SecretBackend};
use dirs_next::home_dir;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::fs;
use tracing::debug;

/// Keychain service name for the JIRA API token.
pub const KEYCHAIN_SERVICE: &str = "hcc-jira-mcp";
/// Keychain account name for the JIRA API token.
pub const KEYCHAIN_ACCOUNT: &str = "jira-api-token";
/// Environment variable overriding the credential config directory.
pub const CONFIG_DIR_ENV_VAR: &str = "HCC_JIRA_MCP_CONFIG_DIR";

const CONFIG_DIR_NAME: &str = ".hcc-jira-mcp";
const CONFIG_FILE_NAME: &str = "config.json";

/// JIRA connection credentials.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub base_url: String,
    pub api_token: String,
}

impl Credentials {
    pub fn new(base_url: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_token: api_token.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("base_url", &self.base_url)
            .field("api_token", &"<redacted>")
            .finish()
    }
}

/// On-disk shape of `config.json`.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    base_url: Option<String>,
}

/// Errors raised by [`CredentialStore`] operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CredentialStoreError {
    #[error("Failed to store credentials: {0}")]
    Storage(String),

    #[error("Failed to retrieve credentials: {0}")]
    Retrieval(String),

    #[error("Failed to delete credentials: {0}")]
    Deletion(String),
}

/// Returns the default credential config directory.
///
/// Honors `HCC_JIRA_MCP_CONFIG_DIR`, otherwise `~/.hcc-jira-mcp`.
pub fn default_config_dir() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_DIR_ENV_VAR)
        && !path.trim().is_empty()
    {
        return expand_tilde(&path);
    }

    home_dir().unwrap_or_else(|| PathBuf::from(".")).join(CONFIG_DIR_NAME)
}

/// Credential store backed by a config file and a [`SecretBackend`].
#[derive(Clone)]
pub struct CredentialStore {
    config_dir: PathBuf,
    backend: Arc<dyn SecretBackend>,
}

impl fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialStore").field("config_dir", &self.config_dir).finish()
    }
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new(default_config_dir(), Arc::new(KeyringBackend))
    }
}

impl CredentialStore {
    /// Create a store rooted at `config_dir` using the given secret backend.
    pub fn new(config_dir: PathBuf, backend: Arc<dyn SecretBackend>) -> Self {
        Self { config_dir, backend }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE_NAME)
    }

    /// Persist credentials: base URL to the config file, token to the secure store.
    ///
    /// The two writes are independent. When the token write fails the config
    /// file has already been written and is left in place.
    pub async fn store(&self, credentials: &Credentials) -> Result<(), CredentialStoreError> {
        let storage_error = |error: String| CredentialStoreError::Storage(error);

        fs::create_dir_all(&self.config_dir)
            .await
            .map_err(|error| storage_error(error.to_string()))?;

        let config = StoredConfig {
            base_url: Some(credentials.base_url.clone()),
        };
        let content = serde_json::to_string_pretty(&config).map_err(|error| storage_error(error.to_string()))?;
        fs::write(self.config_file(), content)
            .await
            .map_err(|error| storage_error(error.to_string()))?;

        let api_token = credentials.api_token.clone();
        self.with_backend(move |backend| backend.write(KEYCHAIN_SERVICE, KEYCHAIN_ACCOUNT, &api_token))
            .await
            .map_err(storage_error)?;

        debug!(config_file = %self.config_file().display(), "stored JIRA credentials");
        Ok(())
    }

    /// Load credentials.
    ///
    /// Returns `Ok(None)` when the config file is missing, has no base URL, or
    /// the secure store has no token.
    pub async fn get(&self) -> Result<Option<Credentials>, CredentialStoreError> {
        let retrieval_error = |error: String| CredentialStoreError::Retrieval(error);
        let config_file = self.config_file();

        let exists = fs::try_exists(&config_file)
            .await
            .map_err(|error| retrieval_error(error.to_string()))?;
        if !exists {
            return Ok(None);
        }

        let content = fs::read_to_string(&config_file)
            .await
            .map_err(|error| retrieval_error(error.to_string()))?;
        let config: StoredConfig = serde_json::from_str(&content).map_err(|error| retrieval_error(error.to_string()))?;
        let Some(base_url) = config.base_url.filter(|url| !url.trim().is_empty()) else {
            return Ok(None);
        };

        let api_token = self
            .with_backend(|backend| backend.read(KEYCHAIN_SERVICE, KEYCHAIN_ACCOUNT))
            .await
            .map_err(retrieval_error)?;

        Ok(api_token
            .filter(|token| !token.is_empty())
            .map(|api_token| Credentials { base_url, api_token }))
    }

    /// Remove the token, the config file, and the config directory when it is left empty.
    pub async fn delete(&self) -> Result<(), CredentialStoreError> {
        let deletion_error = |error: String| CredentialStoreError::Deletion(error);

        self.with_backend(|backend| backend.remove(KEYCHAIN_SERVICE, KEYCHAIN_ACCOUNT))
            .await
            .map_err(deletion_error)?;

        let config_file = self.config_file();
        if fs::try_exists(&config_file)
            .await
            .map_err(|error| deletion_error(error.to_string()))?
        {
            fs::remove_file(&config_file)
                .await
                .map_err(|error| deletion_error(error.to_string()))?;
        }

        if fs::try_exists(&self.config_dir)
            .await
            .map_err(|error| deletion_error(error.to_string()))?
            && is_empty_dir(&self.config_dir)
                .await
                .map_err(|error| deletion_error(error.to_string()))?
        {
            fs::remove_dir(&self.config_dir)
                .await
                .map_err(|error| deletion_error(error.to_string()))?;
        }

        debug!(config_dir = %self.config_dir.display(), "deleted JIRA credentials");
        Ok(())
    }

    /// Best-effort existence check; any failure reads as `false`.
    pub async fn exists(&self) -> bool {
        matches!(self.get().await, Ok(Some(_)))
    }

    async fn with_backend<T, F>(&self, operation: F) -> Result<T, String>
    where
        T: Send + 'static,
        F: FnOnce(&dyn SecretBackend) -> keyring::Result<T> + Send + 'static,
    {
        let backend = Arc::clone(&self.backend);
        tokio::task::spawn_blocking(move || operation(backend.as_ref()))
            .await
            .map_err(|error| error.to_string())?
            .map_err(|error| error.to_string())
    }
}

async fn is_empty_dir(path: &Path) -> std::io::Result<bool> {
    let mut entries = fs::read_dir(path).await?;
    Ok(entries.next_entry().await?.is_none())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keystore::backend::memory::MemoryBackend;

    fn credentials() -> Credentials {
        Credentials::new("https://issues.example.com", "test-api-token-123")
    }

    fn store_in(temp: &tempfile::TempDir) -> (CredentialStore, Arc<MemoryBackend>) {
        let backend = Arc::new(MemoryBackend::default());
        let store = CredentialStore::new(temp.path().join(CONFIG_DIR_NAME), backend.clone());
        (store, backend)
    }

    #[tokio::test]
    async fn store_creates_directory_and_writes_both_halves() {
        let temp = tempfile::tempdir().expect("tempdir");
        let (store, backend) = store_in(&temp);

        store.store(&credentials()).await.expect("store");

        let content = std::fs::read_to_string(store.config_file()).expect("config file");
        assert_eq!(content, "{\n  \"baseUrl\": \"https://issues.example.com\"\n}");
        assert!(!content.contains("test-api-token-123"));
        assert_eq!(
            backend.secret(KEYCHAIN_SERVICE, KEYCHAIN_ACCOUNT).as_deref(),
            Some("test-api-token-123")
        );
    }

    #[tokio::test]
    async fn store_then_get_round_trips() {
        let temp = tempfile::tempdir().expect("tempdir");
        let (store, _) = store_in(&temp);

        store.store(&credentials()).await.expect("store");

        assert_eq!(store.get().await.expect("get"), Some(credentials()));
    }

    #[tokio::test]
    async fn store_reports_keychain_failure() {
        let temp = tempfile::tempdir().expect("tempdir");
        let (store, backend) = store_in(&temp);
        MemoryBackend::fail_with(&backend.fail_writes, "Keychain error");

        let error = store.store(&credentials()).await.expect_err("keychain failure");

        assert!(matches!(error, CredentialStoreError::Storage(_)));
        assert!(error.to_string().starts_with("Failed to store credentials: "));
        assert!(error.to_string().contains("Keychain error"));
        // Not transactional: the config file write already happened.
        assert!(store.config_file().exists());
    }

    #[tokio::test]
    async fn store_reports_file_failure() {
        let temp = tempfile::tempdir().expect("tempdir");
        let blocker = temp.path().join("blocker");
        std::fs::write(&blocker, "not a directory").expect("blocker");
        let backend = Arc::new(MemoryBackend::default());
        let store = CredentialStore::new(blocker.join("nested"), backend.clone());

        let error = store.store(&credentials()).await.expect_err("file failure");

        assert!(matches!(error, CredentialStoreError::Storage(_)));
        assert!(backend.secret(KEYCHAIN_SERVICE, KEYCHAIN_ACCOUNT).is_none());
    }

    #[tokio::test]
    async fn get_returns_none_without_config_file() {
        let temp = tempfile::tempdir().expect("tempdir");
        let (store, backend) = store_in(&temp);
        // A token alone does not count as configured.
        backend.write(KEYCHAIN_SERVICE, KEYCHAIN_ACCOUNT, "orphan").expect("write");

        assert_eq!(store.get().await.expect("get"), None);
    }

    #[tokio::test]
    async fn get_returns_none_when_token_is_missing() {
        let temp = tempfile::tempdir().expect("tempdir");
        let (store, backend) = store_in(&temp);
        store.store(&credentials()).await.expect("store");
        backend.remove(KEYCHAIN_SERVICE, KEYCHAIN_ACCOUNT).expect("remove");

        assert_eq!(store.get().await.expect("get"), None);
    }

    #[tokio::test]
    async fn get_returns_none_when_base_url_is_missing() {
        let temp = tempfile::tempdir().expect("tempdir");
        let (store, backend) = store_in(&temp);
        std::fs::create_dir_all(store.config_dir()).expect("dir");
        std::fs::write(store.config_file(), "{}").expect("config");
        backend.write(KEYCHAIN_SERVICE, KEYCHAIN_ACCOUNT, "token").expect("write");

        assert_eq!(store.get().await.expect("get"), None);
    }

    #[tokio::test]
    async fn get_fails_on_corrupted_config() {
        let temp = tempfile::tempdir().expect("tempdir");
        let (store, _) = store_in(&temp);
        std::fs::create_dir_all(store.config_dir()).expect("dir");
        std::fs::write(store.config_file(), "invalid json").expect("config");

        let error = store.get().await.expect_err("corrupted");

        assert!(matches!(error, CredentialStoreError::Retrieval(_)));
        assert!(error.to_string().starts_with("Failed to retrieve credentials"));
    }

    #[tokio::test]
    async fn get_fails_when_keychain_lookup_fails() {
        let temp = tempfile::tempdir().expect("tempdir");
        let (store, backend) = store_in(&temp);
        store.store(&credentials()).await.expect("store");
        MemoryBackend::fail_with(&backend.fail_reads, "Keychain error");

        let error = store.get().await.expect_err("lookup failure");

        assert!(error.to_string().starts_with("Failed to retrieve credentials: "));
        assert!(error.to_string().contains("Keychain error"));
    }

    #[tokio::test]
    async fn delete_removes_token_file_and_empty_directory() {
        let temp = tempfile::tempdir().expect("tempdir");
        let (store, backend) = store_in(&temp);
        store.store(&credentials()).await.expect("store");

        store.delete().await.expect("delete");

        assert!(backend.secret(KEYCHAIN_SERVICE, KEYCHAIN_ACCOUNT).is_none());
        assert!(!store.config_file().exists());
        assert!(!store.config_dir().exists());
        assert_eq!(store.get().await.expect("get"), None);
    }

    #[tokio::test]
    async fn delete_preserves_directory_with_other_files() {
        let temp = tempfile::tempdir().expect("tempdir");
        let (store, _) = store_in(&temp);
        store.store(&credentials()).await.expect("store");
        let unrelated = store.config_dir().join("other-file.txt");
        std::fs::write(&unrelated, "keep me").expect("unrelated");

        store.delete().await.expect("delete");

        assert!(!store.config_file().exists());
        assert!(store.config_dir().exists());
        assert!(unrelated.exists());
    }

    #[tokio::test]
    async fn delete_without_anything_stored_succeeds() {
        let temp = tempfile::tempdir().expect("tempdir");
        let (store, _) = store_in(&temp);

        store.delete().await.expect("delete");

        assert_eq!(store.get().await.expect("get"), None);
    }

    #[tokio::test]
    async fn delete_stops_when_keychain_removal_fails() {
        let temp = tempfile::tempdir().expect("tempdir");
        let (store, backend) = store_in(&temp);
        store.store(&credentials()).await.expect("store");
        MemoryBackend::fail_with(&backend.fail_removes, "Keychain error");

        let error = store.delete().await.expect_err("removal failure");

        assert!(matches!(error, CredentialStoreError::Deletion(_)));
        assert!(error.to_string().starts_with("Failed to delete credentials: "));
        assert!(store.config_file().exists());
    }

    #[tokio::test]
    async fn exists_tracks_configuration_state() {
        let temp = tempfile::tempdir().expect("tempdir");
        let (store, _) = store_in(&temp);
        assert!(!store.exists().await);

        store.store(&credentials()).await.expect("store");
        assert!(store.exists().await);

        std::fs::write(store.config_file(), "invalid json").expect("corrupt");
        assert!(!store.exists().await);
    }

    #[test]
    fn debug_output_redacts_token() {
        let rendered = format!("{:?}", credentials());
        assert!(rendered.contains("https://issues.example.com"));
        assert!(!rendered.contains("test-api-token-123"));
    }

    #[test]
    fn default_config_dir_honors_environment_override() {
        let override_path = "~/custom/hcc-jira";
        temp_env::with_var(CONFIG_DIR_ENV_VAR, Some(override_path), || {
            assert_eq!(default_config_dir(), expand_tilde(override_path));
        });
    }

    #[test]
    fn default_config_dir_falls_back_to_home() {
        temp_env::with_var(CONFIG_DIR_ENV_VAR, None::<&str>, || {
            assert!(default_config_dir().ends_with(CONFIG_DIR_NAME));
        });
    }
}
