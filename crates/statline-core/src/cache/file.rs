use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;

use statline_types::{CacheError, LeagueSyncResult};

use super::{CachedSnapshot, DataCache};

/// One `<league_id>.json` file per league, replaced atomically on write.
#[derive(Debug, Clone)]
pub struct FileDataCache {
    directory: PathBuf,
}

impl FileDataCache {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self { directory: directory.into() }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn path_for(&self, league_id: &str) -> Result<PathBuf, CacheError> {
        let valid = !league_id.is_empty()
            && league_id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(CacheError::Unavailable {
                message: format!("invalid league id for file cache: '{league_id}'"),
            });
        }
        Ok(self.directory.join(format!("{league_id}.json")))
    }
}

fn io_error(league_id: &str, err: &std::io::Error) -> CacheError {
    CacheError::Io { league_id: league_id.to_string(), message: err.to_string() }
}

#[async_trait]
impl DataCache for FileDataCache {
    async fn put(
        &self,
        league_id: &str,
        result: &LeagueSyncResult,
        ttl: Duration,
    ) -> Result<CachedSnapshot, CacheError> {
        let path = self.path_for(league_id)?;
        let snapshot = CachedSnapshot::new(league_id, result, ttl);
        let content = serde_json::to_vec_pretty(&snapshot).map_err(|e| CacheError::Serialization {
            league_id: league_id.to_string(),
            message: e.to_string(),
        })?;

        tokio::fs::create_dir_all(&self.directory).await.map_err(|e| io_error(league_id, &e))?;

        // Atomic write: temp file then rename, so readers never see a partial snapshot.
        let temp_path = path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, content).await.map_err(|e| io_error(league_id, &e))?;
        tokio::fs::rename(&temp_path, &path).await.map_err(|e| io_error(league_id, &e))?;

        Ok(snapshot)
    }

    async fn get(&self, league_id: &str) -> Result<Option<CachedSnapshot>, CacheError> {
        let path = self.path_for(league_id)?;
        let content = match tokio::fs::read(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_error(league_id, &e)),
        };
        serde_json::from_slice(&content).map(Some).map_err(|e| CacheError::Serialization {
            league_id: league_id.to_string(),
            message: e.to_string(),
        })
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}
