use std::collections::BTreeMap;
use std::sync::Arc;

use crate::AssetError;
use crate::model::ModelData;
use crate::texture::{CubeTextureData, TextureData};

/// Name-keyed decoded assets, one map per asset type.
#[derive(Debug, Clone, Default)]
pub struct LoadedAssetTable {
    models: BTreeMap<String, Arc<ModelData>>,
    textures: BTreeMap<String, Arc<TextureData>>,
    cube_textures: BTreeMap<String, Arc<CubeTextureData>>,
}

/// One decoded source ready for insertion.
#[derive(Debug, Clone)]
pub enum LoadedAsset {
    Model(ModelData),
    Texture(TextureData),
    CubeTexture(CubeTextureData),
}

impl LoadedAssetTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, asset: LoadedAsset) {
        let name = name.into();
        match asset {
            LoadedAsset::Model(m) => {
                self.models.insert(name, Arc::new(m));
            }
            LoadedAsset::Texture(t) => {
                self.textures.insert(name, Arc::new(t));
            }
            LoadedAsset::CubeTexture(c) => {
                self.cube_textures.insert(name, Arc::new(c));
            }
        }
    }

    pub fn model(&self, name: &str) -> Result<&Arc<ModelData>, AssetError> {
        self.models.get(name).ok_or_else(|| missing("model", name))
    }

    pub fn texture(&self, name: &str) -> Result<&Arc<TextureData>, AssetError> {
        self.textures.get(name).ok_or_else(|| missing("texture", name))
    }

    pub fn cube_texture(&self, name: &str) -> Result<&Arc<CubeTextureData>, AssetError> {
        self.cube_textures
            .get(name)
            .ok_or_else(|| missing("cube texture", name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.models.contains_key(name)
            || self.textures.contains_key(name)
            || self.cube_textures.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.models.len() + self.textures.len() + self.cube_textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn model_names(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    pub fn texture_names(&self) -> impl Iterator<Item = &str> {
        self.textures.keys().map(String::as_str)
    }
}

fn missing(kind: &'static str, name: &str) -> AssetError {
    AssetError::Missing {
        kind,
        name: name.to_string(),
    }
}
