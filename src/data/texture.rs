//! Texture.

use std::{fmt, path::Path};

use anyhow::Context;
use image::{DynamicImage, Rgba, RgbaImage};
use log::debug;

/// Texture image, decoded to 8-bit RGBA.
#[derive(Clone)]
pub struct Texture {
    /// Name.
    pub name: Option<String>,
    /// Pixels.
    pub image: RgbaImage,
}

impl Texture {
    /// Decodes the image file at the given path.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        debug!("Loading texture image: {}", path.display());
        let image = image::open(path)
            .with_context(|| format!("Failed to decode image {}", path.display()))?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());
        let texture = Self::from_image(name, image);
        debug!(
            "Successfully loaded texture image: {}, size={}x{}",
            path.display(),
            texture.width(),
            texture.height()
        );

        Ok(texture)
    }

    /// Creates a texture from a decoded image.
    pub fn from_image(name: Option<String>, image: DynamicImage) -> Self {
        Self {
            name,
            image: image.to_rgba8(),
        }
    }

    /// Creates 1x1 opaque white texture.
    ///
    /// Multiplying by this texture leaves vertex colors untouched.
    pub fn white() -> Self {
        Self {
            name: None,
            image: RgbaImage::from_pixel(1, 1, Rgba([0xff; 4])),
        }
    }

    /// Returns the width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Returns the height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

impl fmt::Debug for Texture {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Texture")
            .field("name", &self.name)
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use image::{ImageBuffer, Rgb};

    #[test]
    fn white_texture() {
        let texture = Texture::white();
        assert_eq!((texture.width(), texture.height()), (1, 1));
        assert_eq!(texture.image.get_pixel(0, 0), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn from_rgb_image_is_opaque() {
        let rgb = ImageBuffer::from_pixel(2, 3, Rgb([10u8, 20, 30]));
        let texture = Texture::from_image(Some("rgb".to_owned()), DynamicImage::ImageRgb8(rgb));
        assert_eq!((texture.width(), texture.height()), (2, 3));
        assert!(texture.image.pixels().all(|p| *p == Rgba([10, 20, 30, 255])));
    }

    #[test]
    fn load_roundtrip_through_png() {
        let path = std::env::temp_dir().join(format!(
            "fbx-orbit-viewer-texture-{}.png",
            std::process::id()
        ));
        RgbaImage::from_pixel(4, 2, Rgba([1, 2, 3, 4]))
            .save(&path)
            .unwrap();
        let texture = Texture::load(&path);
        std::fs::remove_file(&path).unwrap();

        let texture = texture.unwrap();
        assert_eq!(
            texture.name.as_deref(),
            path.file_name().and_then(|s| s.to_str())
        );
        assert_eq!((texture.width(), texture.height()), (4, 2));
        assert_eq!(texture.image.get_pixel(3, 1), &Rgba([1, 2, 3, 4]));
    }

    #[test]
    fn load_missing_file_fails() {
        assert!(Texture::load("/nonexistent/fbx-orbit-viewer/texture.png").is_err());
    }
}
