//! Conversions between [`Bitmap`] and the buffers of the [`image`] crate.

use crate::{Bitmap, FilterError, PixelFormat};
use image::{Rgb, RgbImage, Rgba, RgbaImage};

impl From<&RgbImage> for Bitmap {
    /// Creates a [`PixelFormat::Rgb24`] bitmap from an [`RgbImage`].
    fn from(image: &RgbImage) -> Self {
        let (width, height) = image.dimensions();
        let mut bitmap = Self::new(width, height, PixelFormat::Rgb24);
        {
            let mut data = bitmap.lock_mut();
            for (y, row) in image.rows().enumerate() {
                #[allow(clippy::cast_possible_truncation)]
                let dst = data.row_mut(y as u32);
                for (&Rgb([r, g, b]), pixel) in row.zip(dst.chunks_exact_mut(3)) {
                    pixel.copy_from_slice(&[b, g, r]);
                }
            }
        }
        bitmap
    }
}

impl From<&RgbaImage> for Bitmap {
    /// Creates a [`PixelFormat::Argb32`] bitmap from an [`RgbaImage`].
    fn from(image: &RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        let mut bitmap = Self::new(width, height, PixelFormat::Argb32);
        {
            let mut data = bitmap.lock_mut();
            for (y, row) in image.rows().enumerate() {
                #[allow(clippy::cast_possible_truncation)]
                let dst = data.row_mut(y as u32);
                for (&Rgba([r, g, b, a]), pixel) in row.zip(dst.chunks_exact_mut(4)) {
                    pixel.copy_from_slice(&[b, g, r, a]);
                }
            }
        }
        bitmap
    }
}

impl Bitmap {
    /// Renders this bitmap into an [`RgbaImage`], resolving indexed pixels through the color table.
    ///
    /// # Errors
    /// Returns [`FilterError::UnsupportedFormat`] (with [`PixelFormat::Argb32`] as the target)
    /// if this bitmap is neither full-color nor indexed.
    pub fn to_rgba_image(&self) -> Result<RgbaImage, FilterError> {
        let format = self.format();
        let unsupported = FilterError::unsupported(format, PixelFormat::Argb32);
        if !(format.is_full_color() || format.is_indexed()) {
            return Err(unsupported);
        }

        let mut image = RgbaImage::new(self.width(), self.height());
        for (x, y, pixel) in image.enumerate_pixels_mut() {
            let color = self.color_at(x, y).ok_or_else(|| unsupported.clone())?;
            *pixel = Rgba(color.into_components().into());
        }
        Ok(image)
    }
}
