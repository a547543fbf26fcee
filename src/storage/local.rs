use anyhow::{Context, Result};
use std::io::ErrorKind;
use std::path::PathBuf;

use super::ObjectStore;

/// An [`ObjectStore`] backed by the regular files of a single directory.
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait::async_trait]
impl ObjectStore for LocalStore {
    async fn list_names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();

        let entries = std::fs::read_dir(&self.root)
            .with_context(|| format!("failed to list '{}'", self.root.display()))?;

        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }

        names.sort();
        Ok(names)
    }

    async fn read(&self, name: &str) -> Result<Option<Vec<u8>>> {
        let path = self.root.join(name);
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("failed to read '{}'", path.display())),
        }
    }

    async fn write_text(&self, name: &str, text: &str) -> Result<()> {
        let path = self.root.join(name);
        std::fs::write(&path, text)
            .with_context(|| format!("failed to write '{}'", path.display()))
    }
}
