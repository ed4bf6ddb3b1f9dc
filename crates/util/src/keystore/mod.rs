//! JIRA credential storage and resolution.

mod backend;
mod env;
mod store;

pub use backend::{KeyringBackend, SecretBackend};
pub use env::{API_TOKEN_ENV_VAR, BASE_URL_ENV_VAR, CredentialSource, credentials_from_env, resolve_credentials};
pub use store::{
    CONFIG_DIR_ENV_VAR, CredentialStore, CredentialStoreError, Credentials, KEYCHAIN_ACCOUNT, KEYCHAIN_SERVICE,
    default_config_dir,
};
