//! Leaf image sources.
//!
//! Leaves sit at the bottom of an effect chain. Their pixels are immutable,
//! so a deep clone may share the pixel storage.

use std::sync::Arc;

use fx_core::{Bgra, Error, Result};

use crate::node::{ImageProvider, LeafImage, SourceRef};

/// A solid color image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorImageSource {
    color: Bgra,
    width: u32,
    height: u32,
}

impl ColorImageSource {
    /// Creates a `width` x `height` image filled with `color`.
    pub fn new(color: Bgra, width: u32, height: u32) -> Self {
        Self {
            color,
            width,
            height,
        }
    }

    /// The fill color.
    pub fn color(&self) -> Bgra {
        self.color
    }
}

impl ImageProvider for ColorImageSource {
    fn kind(&self) -> &'static str {
        "color"
    }

    fn clone_provider(&self) -> Result<SourceRef> {
        Ok(Arc::new(*self))
    }

    fn leaf_image(&self) -> Option<LeafImage> {
        let len = self.width as usize * self.height as usize;
        Some(LeafImage {
            width: self.width,
            height: self.height,
            pixels: vec![self.color; len].into(),
        })
    }
}

/// An image backed by caller-supplied BGRA pixels.
#[derive(Debug, Clone)]
pub struct BitmapImageSource {
    image: LeafImage,
}

impl BitmapImageSource {
    /// Wraps tightly packed pixels.
    ///
    /// Fails with [`Error::InvalidArgument`] if `pixels.len()` is not
    /// `width * height`.
    pub fn new(pixels: impl Into<Arc<[Bgra]>>, width: u32, height: u32) -> Result<Self> {
        let pixels = pixels.into();
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(Error::invalid_argument(
                "pixels",
                format!("{} pixels for a {width}x{height} image", pixels.len()),
            ));
        }
        Ok(Self {
            image: LeafImage {
                width,
                height,
                pixels,
            },
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height
    }

    /// The pixels, tightly packed.
    pub fn pixels(&self) -> &[Bgra] {
        &self.image.pixels
    }
}

impl ImageProvider for BitmapImageSource {
    fn kind(&self) -> &'static str {
        "bitmap"
    }

    fn clone_provider(&self) -> Result<SourceRef> {
        Ok(Arc::new(self.clone()))
    }

    fn leaf_image(&self) -> Option<LeafImage> {
        Some(self.image.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_source() {
        let src = ColorImageSource::new(Bgra::opaque(1, 2, 3), 3, 2);
        let img = src.leaf_image().unwrap();
        assert_eq!((img.width, img.height), (3, 2));
        assert_eq!(img.pixels.len(), 6);
        assert!(img.pixels.iter().all(|&p| p == Bgra::opaque(1, 2, 3)));
        assert!(src.as_effect().is_none());
    }

    #[test]
    fn test_bitmap_size_checked() {
        assert!(BitmapImageSource::new(vec![Bgra::BLACK; 5], 2, 3).is_err());
        let src = BitmapImageSource::new(vec![Bgra::BLACK; 6], 2, 3).unwrap();
        assert_eq!(src.pixels().len(), 6);
    }

    #[test]
    fn test_bitmap_clone_shares_pixels() {
        let src = BitmapImageSource::new(vec![Bgra::WHITE; 4], 2, 2).unwrap();
        let copy = src.clone_provider().unwrap();
        let img = copy.leaf_image().unwrap();
        assert!(Arc::ptr_eq(&img.pixels, &src.image.pixels));
    }
}
