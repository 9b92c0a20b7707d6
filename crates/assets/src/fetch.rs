use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use url::Url;

use crate::LoadError;

/// Resolves manifest paths to raw bytes.
pub trait AssetFetcher: Send + Sync {
    fn fetch(&self, path: &str) -> Result<Vec<u8>, LoadError>;
}

/// Reads paths relative to a directory.
#[derive(Debug, Clone)]
pub struct FsFetcher {
    root: PathBuf,
}

impl FsFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetFetcher for FsFetcher {
    fn fetch(&self, path: &str) -> Result<Vec<u8>, LoadError> {
        let full = self.root.join(path);
        std::fs::read(&full).map_err(|source| LoadError::Io {
            path: full.display().to_string(),
            source,
        })
    }
}

/// Downloads paths relative to a base URL.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    base: Url,
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new(base: &str) -> Result<Self, LoadError> {
        // Url::join drops the last segment unless the base ends with a slash.
        let base = if base.ends_with('/') {
            Url::parse(base)?
        } else {
            Url::parse(&format!("{base}/"))?
        };
        Ok(Self {
            base,
            client: reqwest::blocking::Client::new(),
        })
    }
}

impl AssetFetcher for HttpFetcher {
    fn fetch(&self, path: &str) -> Result<Vec<u8>, LoadError> {
        let url = self.base.join(path)?;
        tracing::debug!(%url, "fetching");
        let response = self.client.get(url).send()?.error_for_status()?;
        Ok(response.bytes()?.to_vec())
    }
}

/// In-memory files keyed by path.
#[derive(Debug, Clone, Default)]
pub struct MemoryFetcher {
    files: BTreeMap<String, Vec<u8>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, bytes: Vec<u8>) {
        self.files.insert(path.into(), bytes);
    }

    pub fn with(mut self, path: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.insert(path, bytes);
        self
    }
}

impl AssetFetcher for MemoryFetcher {
    fn fetch(&self, path: &str) -> Result<Vec<u8>, LoadError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| LoadError::NotFound(path.to_string()))
    }
}

/// Pick a fetcher for a configured asset base: `http(s)://` bases download,
/// everything else is a directory.
pub fn fetcher_for(base: &str) -> Result<Arc<dyn AssetFetcher>, LoadError> {
    if base.starts_with("http://") || base.starts_with("https://") {
        Ok(Arc::new(HttpFetcher::new(base)?))
    } else {
        Ok(Arc::new(FsFetcher::new(base)))
    }
}

/// Resolve `relative` against the directory containing `path`.
pub(crate) fn sibling_path(path: &str, relative: &str) -> String {
    match path.rsplit_once('/') {
        Some((dir, _)) => format!("{dir}/{relative}"),
        None => relative.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_fetcher_reads_relative_to_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("model")).unwrap();
        std::fs::write(dir.path().join("model/a.bin"), [1, 2, 3]).unwrap();
        let fetcher = FsFetcher::new(dir.path());
        assert_eq!(fetcher.fetch("model/a.bin").unwrap(), vec![1, 2, 3]);
        assert!(matches!(fetcher.fetch("model/b.bin"), Err(LoadError::Io { .. })));
    }

    #[test]
    fn memory_fetcher_reports_missing_paths() {
        let fetcher = MemoryFetcher::new().with("a", vec![7]);
        assert_eq!(fetcher.fetch("a").unwrap(), vec![7]);
        assert!(matches!(fetcher.fetch("b"), Err(LoadError::NotFound(_))));
    }

    #[test]
    fn http_base_gets_trailing_slash() {
        let fetcher = HttpFetcher::new("https://example.com/static").unwrap();
        assert_eq!(
            fetcher.base.join("model/Character.glb").unwrap().as_str(),
            "https://example.com/static/model/Character.glb"
        );
    }

    #[test]
    fn sibling_path_keeps_directory() {
        assert_eq!(sibling_path("model/Character.gltf", "Character.bin"), "model/Character.bin");
        assert_eq!(sibling_path("scene.gltf", "scene.bin"), "scene.bin");
    }
}
