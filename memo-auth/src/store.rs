use crate::error::AuthError;
use crate::models::Credential;
use std::fs;
use std::path::PathBuf;

const CREDENTIAL_FILE: &str = "credential.json";

/// On-disk store for the bearer credential, one JSON file under the user
/// cache directory.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    credential_path: PathBuf,
}

impl CredentialStore {
    /// Open the store at its default location (`<cache_dir>/memo`).
    pub fn new() -> Result<Self, AuthError> {
        let dir = dirs::cache_dir()
            .ok_or_else(|| AuthError::Storage("Could not find cache directory".to_string()))?
            .join("memo");
        Self::in_dir(dir)
    }

    /// Open the store inside an explicit directory, creating it if needed.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Result<Self, AuthError> {
        let dir = dir.into();
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|e| {
                AuthError::Storage(format!("Failed to create credential directory: {}", e))
            })?;
        }

        Ok(Self {
            credential_path: dir.join(CREDENTIAL_FILE),
        })
    }

    pub fn save(&self, credential: &Credential) -> Result<(), AuthError> {
        let json = serde_json::to_string_pretty(credential)?;

        fs::write(&self.credential_path, json)
            .map_err(|e| AuthError::Storage(format!("Failed to save credential: {}", e)))?;

        // Set permissions to 0600 (read/write for owner only)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(&self.credential_path)
                .map_err(|e| AuthError::Storage(format!("Failed to get file permissions: {}", e)))?
                .permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&self.credential_path, perms).map_err(|e| {
                AuthError::Storage(format!("Failed to set file permissions: {}", e))
            })?;
        }

        Ok(())
    }

    /// Read the stored credential. Absent, unreadable or malformed data all
    /// read as "no credential" rather than an error.
    pub fn load(&self) -> Option<Credential> {
        if !self.credential_path.exists() {
            return None;
        }

        let json = match fs::read_to_string(&self.credential_path) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("Failed to read stored credential: {}", e);
                return None;
            }
        };

        match serde_json::from_str(&json) {
            Ok(credential) => Some(credential),
            Err(e) => {
                tracing::warn!("Stored credential is malformed, ignoring it: {}", e);
                None
            }
        }
    }

    pub fn clear(&self) -> Result<(), AuthError> {
        if self.credential_path.exists() {
            fs::remove_file(&self.credential_path)
                .map_err(|e| AuthError::Storage(format!("Failed to delete credential: {}", e)))?;
        }
        Ok(())
    }
}
