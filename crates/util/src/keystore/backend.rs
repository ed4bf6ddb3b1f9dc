//! Secure secret storage backends.

use tracing::debug;

/// Storage for a single secret addressed by a service/account pair.
///
/// Implementations are synchronous; callers on an async runtime move them to
/// the blocking pool.
pub trait SecretBackend: Send + Sync + 'static {
    /// Read the secret. `Ok(None)` means no entry exists.
    fn read(&self, service: &str, account: &str) -> keyring::Result<Option<String>>;

    /// Create or overwrite the secret.
    fn write(&self, service: &str, account: &str, secret: &str) -> keyring::Result<()>;

    /// Remove the secret. Removing a missing entry is not an error.
    fn remove(&self, service: &str, account: &str) -> keyring::Result<()>;
}

/// OS keychain backend built on `keyring-rs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeyringBackend;

impl SecretBackend for KeyringBackend {
    fn read(&self, service: &str, account: &str) -> keyring::Result<Option<String>> {
        let entry = keyring::Entry::new(service, account)?;
        match entry.get_password() {
            Ok(secret) => Ok(Some(secret)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(error) => Err(error),
        }
    }

    fn write(&self, service: &str, account: &str, secret: &str) -> keyring::Result<()> {
        let entry = keyring::Entry::new(service, account)?;
        entry.set_password(secret)?;
        debug!("Stored secret in keychain: {}/{}", service, account);
        Ok(())
    }

    fn remove(&self, service: &str, account: &str) -> keyring::Result<()> {
        let entry = keyring::Entry::new(service, account)?;
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => {
                debug!("Removed secret from keychain: {}/{}", service, account);
                Ok(())
            }
            Err(error) => Err(error),
        }
    }
}

#[cfg(test)]
pub(crate) mod memory {
    use super::SecretBackend;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory stand-in for the OS keychain with switchable failures.
    #[derive(Debug, Default)]
    pub(crate) struct MemoryBackend {
        entries: Mutex<HashMap<(String, String), String>>,
        pub(crate) fail_reads: Mutex<Option<String>>,
        pub(crate) fail_writes: Mutex<Option<String>>,
        pub(crate) fail_removes: Mutex<Option<String>>,
    }

    fn failure(message: &Mutex<Option<String>>) -> keyring::Result<()> {
        match message.lock().map(|guard| guard.clone()) {
            Ok(Some(message)) => Err(keyring::Error::PlatformFailure(Box::new(std::io::Error::other(message)))),
            _ => Ok(()),
        }
    }

    impl MemoryBackend {
        pub(crate) fn fail_with(slot: &Mutex<Option<String>>, message: &str) {
            *slot.lock().expect("lock") = Some(message.to_string());
        }

        pub(crate) fn secret(&self, service: &str, account: &str) -> Option<String> {
            self.entries
                .lock()
                .expect("lock")
                .get(&(service.to_string(), account.to_string()))
                .cloned()
        }
    }

    impl SecretBackend for MemoryBackend {
        fn read(&self, service: &str, account: &str) -> keyring::Result<Option<String>> {
            failure(&self.fail_reads)?;
            Ok(self.secret(service, account))
        }

        fn write(&self, service: &str, account: &str, secret: &str) -> keyring::Result<()> {
            failure(&self.fail_writes)?;
            self.entries
                .lock()
                .expect("lock")
                .insert((service.to_string(), account.to_string()), secret.to_string());
            Ok(())
        }

        fn remove(&self, service: &str, account: &str) -> keyring::Result<()> {
            failure(&self.fail_removes)?;
            self.entries
                .lock()
                .expect("lock")
                .remove(&(service.to_string(), account.to_string()));
            Ok(())
        }
    }
}
