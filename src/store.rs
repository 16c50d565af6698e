use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use sha2::{Digest as _, Sha256};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub text: String,
    /// SHA-256 of the bytes read; `None` when the file did not exist.
    pub digest: Option<String>,
}

#[derive(Debug, thiserror::Error)]
#[error("{} changed on disk during this run; refusing to overwrite it", path.display())]
pub struct ConcurrentChange {
    pub path: PathBuf,
}

pub fn load(path: &Path) -> anyhow::Result<Snapshot> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "war log not found; starting a new one");
            return Ok(Snapshot::default());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("read war log: {}", path.display()));
        }
    };
    let digest = digest(&bytes);
    let text = String::from_utf8(bytes)
        .with_context(|| format!("war log is not valid UTF-8: {}", path.display()))?;
    Ok(Snapshot {
        text,
        digest: Some(digest),
    })
}

/// Replaces the log with `text` through a temp file in the same directory.
pub fn write_atomic(path: &Path, text: &str, read: &Snapshot) -> anyhow::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)
        .with_context(|| format!("create parent dir: {}", parent.display()))?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent)
        .with_context(|| format!("create temp file in {}", parent.display()))?;
    tmp.write_all(text.as_bytes())
        .with_context(|| format!("write tmp: {}", tmp.path().display()))?;
    tmp.as_file()
        .sync_all()
        .with_context(|| format!("sync tmp: {}", tmp.path().display()))?;

    let current = current_digest(path)?;
    if current != read.digest {
        return Err(ConcurrentChange {
            path: path.to_path_buf(),
        }
        .into());
    }

    tmp.persist(path)
        .map_err(|err| err.error)
        .with_context(|| format!("rename tmp to final: {}", path.display()))?;
    Ok(())
}

fn current_digest(path: &Path) -> anyhow::Result<Option<String>> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(digest(&bytes))),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err).with_context(|| format!("re-read war log: {}", path.display())),
    }
}

fn digest(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}
