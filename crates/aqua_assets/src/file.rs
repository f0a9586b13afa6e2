use std::path::{Path, PathBuf};

use aqua_core::LoadError;

use crate::descriptor::AssetDescriptor;
use crate::loader::{AssetLoader, AssetRef, LoadedAsset};

/// Loads JSON asset descriptors relative to a root directory.
pub struct FileLoader {
    root_path: PathBuf,
}

impl FileLoader {
    /// `path` may be the root directory or any file inside it.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let root_path = if path.is_file() {
            path.parent().unwrap_or(Path::new(".")).to_path_buf()
        } else {
            path.to_path_buf()
        };
        Self { root_path }
    }

    #[inline]
    #[must_use]
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }
}

impl AssetLoader for FileLoader {
    async fn load(&self, source: &AssetRef) -> Result<LoadedAsset, LoadError> {
        let path = self.root_path.join(source.as_str());
        let bytes = tokio::fs::read(&path).await.map_err(|e| {
            log::warn!("reading {} failed: {e}", path.display());
            if e.kind() == std::io::ErrorKind::NotFound {
                LoadError::NotFound(source.to_string())
            } else {
                LoadError::Io {
                    source_ref: source.to_string(),
                    message: e.to_string(),
                }
            }
        })?;

        AssetDescriptor::decode_json(source, &bytes).inspect_err(|e| log::warn!("{e}"))
    }
}
