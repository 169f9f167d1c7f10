use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{Context, Result};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::cache::store::TokenStore;

// distinguishes temp files of overlapping writes within one process
static WRITE_SEQ: AtomicU64 = AtomicU64::new(0);

/// Token store backed by one file per key inside a directory.
///
/// Every write goes to its own `<key>.<pid>.<seq>.tmp`, created 0600, and is
/// renamed over `<key>.json`, so a reader never observes a half-written
/// record and overlapping writers never touch each other's temp file.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self { dir: dir.as_ref().to_path_buf() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    fn tmp_path_for(&self, key: &str) -> PathBuf {
        let seq = WRITE_SEQ.fetch_add(1, Ordering::Relaxed);
        self.dir.join(format!("{}.{}.{}.tmp", key, std::process::id(), seq))
    }
}

async fn write_private(path: &Path, value: &[u8]) -> std::io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options.open(path).await?;
    file.write_all(value).await?;
    file.sync_all().await?;
    Ok(())
}

impl TokenStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(key);
        match fs::read(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("no token record at path '{}'", path.display());
                Ok(None)
            }
            Err(e) => Err(e).with_context(|| format!("failed to read '{}'", path.display())),
        }
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("failed to create store dir '{}'", self.dir.display()))?;

        let tmp = self.tmp_path_for(key);
        let path = self.path_for(key);
        if let Err(e) = write_private(&tmp, &value).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e).with_context(|| format!("failed to write '{}'", tmp.display()));
        }

        if let Err(e) = fs::rename(&tmp, &path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e)
                .with_context(|| format!("failed to move token record into '{}'", path.display()));
        }
        debug!("token record written, path '{}'", path.display());
        Ok(())
    }
}
