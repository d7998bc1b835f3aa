use std::{fs, path::PathBuf, sync::Mutex};

use crate::{
    errors::{FitbitError, FitbitResult},
    types::Credentials,
};

/// Synchronous key-value storage for the access token and user id.
///
/// Implementations must treat `set` as a single write of both fields and
/// `clear` as removing both.
pub trait CredentialStore: Send + Sync {
    fn access_token(&self) -> Option<String>;

    fn user_id(&self) -> Option<String>;

    fn set(&self, access_token: &str, user_id: &str) -> FitbitResult<()>;

    fn clear(&self) -> FitbitResult<()>;

    fn credentials(&self) -> Credentials {
        Credentials {
            access_token: self.access_token(),
            user_id: self.user_id(),
        }
    }
}

/// Keeps credentials in process memory only.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    inner: Mutex<Credentials>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credentials(credentials: Credentials) -> Self {
        Self {
            inner: Mutex::new(credentials),
        }
    }

    fn read(&self) -> Credentials {
        match self.inner.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn access_token(&self) -> Option<String> {
        self.read().access_token
    }

    fn user_id(&self) -> Option<String> {
        self.read().user_id
    }

    fn set(&self, access_token: &str, user_id: &str) -> FitbitResult<()> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|e| FitbitError::storage(e.to_string()))?;
        *guard = Credentials::new(access_token, user_id);
        Ok(())
    }

    fn clear(&self) -> FitbitResult<()> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|e| FitbitError::storage(e.to_string()))?;
        *guard = Credentials::default();
        Ok(())
    }
}

/// Persists credentials as JSON in the local data directory so they
/// survive restarts. Reads are served from memory.
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
    cache: MemoryCredentialStore,
}

impl FileCredentialStore {
    /// Opens the store at the default location, loading any saved credentials.
    pub fn open_default() -> FitbitResult<Self> {
        Self::open(Self::default_path())
    }

    /// Opens the store at `path`. A missing file means no credentials yet.
    pub fn open(path: impl Into<PathBuf>) -> FitbitResult<Self> {
        let path = path.into();
        let credentials = if path.is_file() {
            let content =
                fs::read_to_string(&path).map_err(|e| FitbitError::storage(e.to_string()))?;
            serde_json::from_str::<Credentials>(&content)
                .map_err(|e| FitbitError::storage(e.to_string()))?
        } else {
            Credentials::default()
        };

        Ok(Self {
            path,
            cache: MemoryCredentialStore::with_credentials(credentials),
        })
    }

    pub fn default_path() -> PathBuf {
        let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("fitbitcli/cache/credentials.json");
        path
    }

    fn persist(&self, credentials: &Credentials) -> FitbitResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| FitbitError::storage(e.to_string()))?;
        }

        let json = serde_json::to_string_pretty(credentials)
            .map_err(|e| FitbitError::storage(e.to_string()))?;
        write_private(&self.path, json.as_bytes()).map_err(|e| FitbitError::storage(e.to_string()))
    }
}

impl CredentialStore for FileCredentialStore {
    fn access_token(&self) -> Option<String> {
        self.cache.access_token()
    }

    fn user_id(&self) -> Option<String> {
        self.cache.user_id()
    }

    fn set(&self, access_token: &str, user_id: &str) -> FitbitResult<()> {
        // write to disk first so a failed write leaves memory unchanged
        self.persist(&Credentials::new(access_token, user_id))?;
        self.cache.set(access_token, user_id)
    }

    fn clear(&self) -> FitbitResult<()> {
        if self.path.is_file() {
            fs::remove_file(&self.path).map_err(|e| FitbitError::storage(e.to_string()))?;
        }
        self.cache.clear()
    }
}

/// Writes `content` readable by the owner only.
#[cfg(unix)]
fn write_private(path: &std::path::Path, content: &[u8]) -> std::io::Result<()> {
    use std::{
        io::Write,
        os::unix::fs::{OpenOptionsExt, PermissionsExt},
    };

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // mode() only applies on creation
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    file.write_all(content)
}

#[cfg(not(unix))]
fn write_private(path: &std::path::Path, content: &[u8]) -> std::io::Result<()> {
    fs::write(path, content)
}
