use crate::{ClientError, ClientResult, KeyValueStore};

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::{debug, warn};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

const FILE_EXTENSION: &str = "json";
const DATE_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Directory-backed store: one file per key.
///
/// Writes go to a temp file, are synced, then atomically renamed over the
/// target so a crash mid-write never leaves a torn value behind.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> ClientResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| {
            ClientError::storage_io(
                dir.display().to_string(),
                "failed to create storage directory",
                e,
            )
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> ClientResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(ClientError::storage(
                key,
                "keys may only contain ASCII letters, digits, '_' and '-'",
            ));
        }
        Ok(self.dir.join(format!("{key}.{FILE_EXTENSION}")))
    }

    #[cfg(unix)]
    async fn restrict_permissions(key: &str, path: &Path) -> ClientResult<()> {
        use std::os::unix::fs::PermissionsExt;

        fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
            .await
            .map_err(|e| ClientError::storage_io(key, "failed to restrict permissions", e))
    }

    #[cfg(not(unix))]
    async fn restrict_permissions(_key: &str, _path: &Path) -> ClientResult<()> {
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> ClientResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ClientError::storage_io(key, "read failed", e)),
        }
    }

    async fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        let final_path = self.path_for(key)?;
        let temp_path = self
            .dir
            .join(format!("{key}.{FILE_EXTENSION}.tmp.{}", Uuid::new_v4().simple()));

        {
            let mut file = fs::File::create(&temp_path)
                .await
                .map_err(|e| ClientError::storage_io(key, "temp file create failed", e))?;

            file.write_all(value.as_bytes())
                .await
                .map_err(|e| ClientError::storage_io(key, "temp file write failed", e))?;

            file.sync_all()
                .await
                .map_err(|e| ClientError::storage_io(key, "temp file sync failed", e))?;
        }

        Self::restrict_permissions(key, &temp_path).await?;

        if let Err(e) = fs::rename(&temp_path, &final_path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(ClientError::storage_io(key, "atomic rename failed", e));
        }

        debug!("Stored '{key}' ({} bytes)", value.len());
        Ok(())
    }

    async fn remove(&self, key: &str) -> ClientResult<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ClientError::storage_io(key, "remove failed", e)),
        }
    }

    /// Renames `<key>.json` to `<key>.json.corrupted.<timestamp>`.
    async fn quarantine(&self, key: &str) -> ClientResult<()> {
        let path = self.path_for(key)?;
        let timestamp = chrono::Utc::now().format(DATE_FORMAT);
        let backup = self
            .dir
            .join(format!("{key}.{FILE_EXTENSION}.corrupted.{timestamp}"));

        match fs::rename(&path, &backup).await {
            Ok(()) => {
                warn!("Backed up unreadable '{key}' to {}", backup.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ClientError::storage_io(key, "backup of corrupted value failed", e)),
        }
    }
}
