use crate::domain::ports::Storage;
use crate::utils::error::Result;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Local file system storage. Relative paths resolve against `root`.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}

impl Default for LocalStorage {
    fn default() -> Self {
        Self::new(".")
    }
}

impl Storage for LocalStorage {
    async fn exists(&self, path: &Path) -> Result<bool> {
        Ok(self.resolve(path).try_exists()?)
    }

    async fn write_file(&self, path: &Path, data: &[u8]) -> Result<()> {
        let full_path = self.resolve(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(full_path, data)?;
        Ok(())
    }

    async fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        let to = self.resolve(to);
        if let Some(parent) = to.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::rename(self.resolve(from), to)?;
        Ok(())
    }

    async fn create_dir_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(self.resolve(path))?;
        Ok(())
    }

    async fn remove_dir_all(&self, path: &Path) -> Result<()> {
        match fs::remove_dir_all(self.resolve(path)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_rename_and_cleanup() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path());

        let part = Path::new("layer/tmp/2020.part");
        let done = Path::new("layer/2020.tif");
        storage.write_file(part, b"raster").await.unwrap();
        assert!(storage.exists(part).await.unwrap());

        storage.rename(part, done).await.unwrap();
        assert!(!storage.exists(part).await.unwrap());
        assert_eq!(fs::read(dir.path().join(done)).unwrap(), b"raster");

        storage.remove_dir_all(Path::new("layer/tmp")).await.unwrap();
        assert!(!dir.path().join("layer/tmp").exists());
        // removing again is not an error
        storage.remove_dir_all(Path::new("layer/tmp")).await.unwrap();
    }
}
