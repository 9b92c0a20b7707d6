//! Asset pipeline: manifest, fetchers, decoders, and the resource loader.
//!
//! A manifest is a list of named [`Source`]s. The [`ResourceLoader`] fetches
//! and decodes every source on a worker thread and fills a
//! [`LoadedAssetTable`], broadcasting start, progress and finish events.
//!
//! # Invariants
//! - A loader runs at most one load cycle.
//! - Progress is non-decreasing and reaches 1.0 at most once, immediately
//!   before a successful finish.
//! - A failed cycle keeps whatever already resolved; nothing is rolled back.
//! - Consumers read the table only after the finish event.

pub mod fetch;
pub mod loader;
pub mod model;
pub mod source;
pub mod table;
pub mod texture;

use sha2::{Digest, Sha256};

pub use fetch::{AssetFetcher, FsFetcher, HttpFetcher, MemoryFetcher, fetcher_for};
pub use loader::{LoadEvent, ResourceLoader, resolve};
pub use model::{MeshTemplate, ModelData, NodeKind, NodeTemplate, decode_model};
pub use source::{Source, SourceKind, default_manifest, load_manifest, parse_manifest_json};
pub use table::{LoadedAsset, LoadedAssetTable};
pub use texture::{CubeTextureData, TextureData, TextureFilter};

/// Failure to fetch or decode a single source.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("not found: {0}")]
    NotFound(String),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("image decode error: {0}")]
    Image(#[from] image::ImageError),
    #[error("glTF error: {0}")]
    Gltf(#[from] gltf::Error),
    #[error("GLB file has no binary chunk")]
    MissingBinaryChunk,
    #[error("manifest JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("manifest YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("{kind} source {name:?} has no path")]
    MissingPath { name: String, kind: &'static str },
    #[error("cube texture {name:?} needs 6 faces, found {found}")]
    CubeFaceCount { name: String, found: usize },
}

/// Errors from reading loaded assets or driving the loader.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("no {kind} named {name:?} was loaded")]
    Missing { kind: &'static str, name: String },
    #[error("a load cycle has already been started")]
    LoadCycleStarted,
    #[error("failed to start loader worker: {0}")]
    Worker(#[source] std::io::Error),
}

/// Content hash of raw asset bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentHash(pub u64);

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

pub fn content_hash(bytes: &[u8]) -> ContentHash {
    let digest = Sha256::digest(bytes);
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    ContentHash(u64::from_le_bytes(head))
}

pub fn crate_info() -> &'static str {
    "folio-assets v0.1.0"
}
