use crate::{ContentHash, LoadError, content_hash};

/// Magnification filter requested for a texture upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureFilter {
    Linear,
    Nearest,
}

/// Decoded RGBA8 image plus its upload settings.
#[derive(Debug, Clone)]
pub struct TextureData {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
    /// Flip rows on upload. Model textures keep glTF's top-left UV origin.
    pub flip_y: bool,
    pub filter: TextureFilter,
    pub digest: ContentHash,
}

impl TextureData {
    /// Settings for a texture mapped onto a model's UVs: no flip, nearest filtering.
    pub fn into_model_texture(mut self) -> Self {
        self.flip_y = false;
        self.filter = TextureFilter::Nearest;
        self
    }
}

/// Six faces in +X, -X, +Y, -Y, +Z, -Z order.
#[derive(Debug, Clone)]
pub struct CubeTextureData {
    pub name: String,
    pub faces: Vec<TextureData>,
}

pub fn decode_texture(name: &str, bytes: &[u8]) -> Result<TextureData, LoadError> {
    let image = image::load_from_memory(bytes)?.to_rgba8();
    let (width, height) = image.dimensions();
    tracing::debug!(texture = name, width, height, "texture decoded");
    Ok(TextureData {
        name: name.to_string(),
        width,
        height,
        pixels: image.into_raw(),
        flip_y: true,
        filter: TextureFilter::Linear,
        digest: content_hash(bytes),
    })
}

pub fn decode_cube_texture(name: &str, faces: &[Vec<u8>]) -> Result<CubeTextureData, LoadError> {
    if faces.len() != 6 {
        return Err(LoadError::CubeFaceCount {
            name: name.to_string(),
            found: faces.len(),
        });
    }
    let faces = faces
        .iter()
        .enumerate()
        .map(|(i, bytes)| decode_texture(&format!("{name}[{i}]"), bytes))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(CubeTextureData {
        name: name.to_string(),
        faces,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]));
        let mut out = std::io::Cursor::new(Vec::new());
        image.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn decodes_png_to_rgba() {
        let texture = decode_texture("snapVFX", &png_bytes(2, 3)).unwrap();
        assert_eq!((texture.width, texture.height), (2, 3));
        assert_eq!(texture.pixels.len(), 2 * 3 * 4);
        assert_eq!(&texture.pixels[..4], &[10, 20, 30, 255]);
        assert!(texture.flip_y);
    }

    #[test]
    fn model_texture_is_unflipped_and_nearest() {
        let texture = decode_texture("logosTexture", &png_bytes(1, 1))
            .unwrap()
            .into_model_texture();
        assert!(!texture.flip_y);
        assert_eq!(texture.filter, TextureFilter::Nearest);
    }

    #[test]
    fn cube_needs_six_faces() {
        let face = png_bytes(1, 1);
        assert!(matches!(
            decode_cube_texture("sky", &[face.clone(), face]),
            Err(LoadError::CubeFaceCount { found: 2, .. })
        ));
    }

    #[test]
    fn corrupt_image_fails() {
        assert!(matches!(decode_texture("x", b"nope"), Err(LoadError::Image(_))));
    }
}
