use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::LoadError;

/// How a source's bytes are decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SourceKind {
    /// glTF / GLB scene.
    Model,
    /// Image with the default upload settings (flipped Y, linear filtering).
    Texture,
    /// Image baked for a model's UV layout: unflipped, nearest filtering.
    ModelTexture,
    /// Six images, one per cube face.
    CubeTexture,
}

impl SourceKind {
    pub fn label(self) -> &'static str {
        match self {
            SourceKind::Model => "model",
            SourceKind::Texture => "texture",
            SourceKind::ModelTexture => "modelTexture",
            SourceKind::CubeTexture => "cubeTexture",
        }
    }
}

/// One named entry of an asset manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub name: String,
    pub kind: SourceKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub paths: Vec<String>,
}

impl Source {
    pub fn new(name: impl Into<String>, kind: SourceKind, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            path: Some(path.into()),
            paths: Vec::new(),
        }
    }

    pub fn cube(name: impl Into<String>, faces: [&str; 6]) -> Self {
        Self {
            name: name.into(),
            kind: SourceKind::CubeTexture,
            path: None,
            paths: faces.iter().map(|f| f.to_string()).collect(),
        }
    }

    /// The single path of a model or texture source.
    pub fn single_path(&self) -> Result<&str, LoadError> {
        self.path
            .as_deref()
            .or_else(|| self.paths.first().map(String::as_str))
            .ok_or_else(|| LoadError::MissingPath {
                name: self.name.clone(),
                kind: self.kind.label(),
            })
    }

    /// Every path of the source, in declaration order.
    pub fn all_paths(&self) -> Vec<&str> {
        self.path
            .iter()
            .chain(self.paths.iter())
            .map(String::as_str)
            .collect()
    }
}

/// Parse a manifest from JSON text.
pub fn parse_manifest_json(text: &str) -> Result<Vec<Source>, LoadError> {
    Ok(serde_json::from_str(text)?)
}

/// Parse a manifest from YAML text.
pub fn parse_manifest_yaml(text: &str) -> Result<Vec<Source>, LoadError> {
    Ok(serde_yaml::from_str(text)?)
}

/// Read a manifest file; `.yaml`/`.yml` files are YAML, anything else JSON.
pub fn load_manifest(path: impl AsRef<Path>) -> Result<Vec<Source>, LoadError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml" | "yml") => parse_manifest_yaml(&text),
        _ => parse_manifest_json(&text),
    }
}

/// The site's own asset list, relative to the asset base.
pub fn default_manifest() -> Vec<Source> {
    vec![
        Source::new("character", SourceKind::Model, "model/Character.glb"),
        Source::new("study-mono", SourceKind::Model, "model/Study_Mono.glb"),
        Source::new("logos", SourceKind::Model, "model/Logos.glb"),
        Source::new("characterTexture", SourceKind::ModelTexture, "texture/MonoboyTexture.png"),
        Source::new("snapVFX", SourceKind::Texture, "texture/Snap_VFX.jpg"),
        Source::new("logosTexture", SourceKind::ModelTexture, "texture/Logos_Texture.png"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn json_manifest_uses_camel_case_kinds() {
        let sources = parse_manifest_json(
            r#"[{"name":"tex","kind":"modelTexture","path":"a.png"},
                {"name":"sky","kind":"cubeTexture","paths":["1","2","3","4","5","6"]}]"#,
        )
        .unwrap();
        assert_eq!(sources[0].kind, SourceKind::ModelTexture);
        assert_eq!(sources[1].all_paths().len(), 6);
    }

    #[test]
    fn yaml_manifest_from_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "- name: character\n  kind: model\n  path: model/Character.glb").unwrap();
        let sources = load_manifest(file.path()).unwrap();
        assert_eq!(sources, vec![Source::new("character", SourceKind::Model, "model/Character.glb")]);
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert!(parse_manifest_json(r#"[{"name":"x","kind":"video","path":"x"}]"#).is_err());
    }

    #[test]
    fn source_without_path_reports_missing_path() {
        let source = Source {
            name: "broken".into(),
            kind: SourceKind::Model,
            path: None,
            paths: Vec::new(),
        };
        assert!(matches!(source.single_path(), Err(LoadError::MissingPath { .. })));
    }

    #[test]
    fn default_manifest_names_are_unique() {
        let manifest = default_manifest();
        let mut names: Vec<_> = manifest.iter().map(|s| s.name.as_str()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), manifest.len());
    }
}
