//! Contains the [`Bitmap`] raster type and the scoped views used to access its bytes.

use crate::{FilterError, PixelFormat, MAX_PIXELS};
use bitvec::{field::BitField, order::Msb0, view::BitView};
use palette::Srgba;
use std::{
    ops::{Deref, Range},
    sync::atomic::{AtomicBool, Ordering},
};
use tracing::trace;

/// Returns the number of pixels of a `width` by `height` bitmap, or `None` if it is above [`MAX_PIXELS`].
fn checked_num_pixels(width: u32, height: u32) -> Option<u32> {
    // `MAX_PIXELS` is `u32::MAX`
    width.checked_mul(height)
}

/// Returns the color every color table slot starts out with, opaque black.
fn default_table_color() -> Srgba<u8> {
    Srgba::new(0, 0, 0, u8::MAX)
}

/// A raster of pixels stored row by row, with each row occupying `stride` bytes.
///
/// Indexed bitmaps additionally carry a color table with one slot per representable index.
///
/// The bytes of a [`Bitmap`] are accessed through [`Bitmap::lock`] and [`Bitmap::lock_mut`],
/// which hand out views that release the bitmap when dropped.
#[derive(Debug)]
pub struct Bitmap {
    /// The width of the bitmap in pixels.
    width: u32,
    /// The height of the bitmap in pixels.
    height: u32,
    /// The number of bytes per row, including padding.
    stride: usize,
    /// The layout of each pixel.
    format: PixelFormat,
    /// The pixel bytes, `stride * height` long.
    data: Vec<u8>,
    /// The color table, empty for non-indexed formats.
    palette: Vec<Srgba<u8>>,
    /// Whether a read view of this bitmap is currently alive.
    locked: AtomicBool,
}

impl Clone for Bitmap {
    fn clone(&self) -> Self {
        Self {
            width: self.width,
            height: self.height,
            stride: self.stride,
            format: self.format,
            data: self.data.clone(),
            palette: self.palette.clone(),
            locked: AtomicBool::new(false),
        }
    }
}

impl PartialEq for Bitmap {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.stride == other.stride
            && self.format == other.format
            && self.data == other.data
            && self.palette == other.palette
    }
}

impl Eq for Bitmap {}

impl Bitmap {
    /// Creates a zeroed bitmap with a row stride aligned to 4 bytes.
    ///
    /// Indexed bitmaps get a color table of [`PixelFormat::palette_len`] opaque black entries.
    ///
    /// # Panics
    /// Panics if `width * height` is above [`MAX_PIXELS`]
    /// or the pixel bytes do not fit in memory.
    #[must_use]
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        assert!(
            checked_num_pixels(width, height).is_some(),
            "{width}x{height} is above the maximum of {MAX_PIXELS} pixels"
        );

        let stride = format.aligned_stride(width);
        Self {
            width,
            height,
            stride,
            format,
            data: vec![0; stride.saturating_mul(height as usize)],
            palette: vec![default_table_color(); format.palette_len()],
            locked: AtomicBool::new(false),
        }
    }

    /// Creates a bitmap from existing pixel bytes.
    ///
    /// # Errors
    /// Returns [`FilterError::InvalidOperation`] if `width * height` is above [`MAX_PIXELS`],
    /// if `stride` is too small to hold a row of `width` pixels,
    /// or if `data` is shorter than `stride * height`.
    pub fn from_raw(
        width: u32,
        height: u32,
        stride: usize,
        format: PixelFormat,
        data: Vec<u8>,
    ) -> Result<Self, FilterError> {
        if checked_num_pixels(width, height).is_none() {
            return Err(FilterError::InvalidOperation(format!(
                "{width}x{height} is above the maximum of {MAX_PIXELS} pixels"
            )));
        }

        let min_stride = format.min_stride(width);
        if stride < min_stride {
            return Err(FilterError::InvalidOperation(format!(
                "stride of {stride} bytes is below the {min_stride} bytes needed for {width} pixels of {format}"
            )));
        }

        let needed = stride.checked_mul(height as usize);
        if needed.map_or(true, |needed| data.len() < needed) {
            return Err(FilterError::InvalidOperation(format!(
                "buffer of {} bytes is below the {stride} * {height} bytes needed for {height} rows",
                data.len()
            )));
        }

        Ok(Self {
            width,
            height,
            stride,
            format,
            data,
            palette: vec![default_table_color(); format.palette_len()],
            locked: AtomicBool::new(false),
        })
    }

    /// The width of the bitmap in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// The height of the bitmap in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// The number of bytes per row, including padding.
    #[must_use]
    pub const fn stride(&self) -> usize {
        self.stride
    }

    /// The pixel format of the bitmap.
    #[must_use]
    pub const fn format(&self) -> PixelFormat {
        self.format
    }

    /// The number of pixels in the bitmap.
    #[must_use]
    pub const fn num_pixels(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// The color table of an indexed bitmap. Empty for other formats.
    #[must_use]
    pub fn palette(&self) -> &[Srgba<u8>] {
        &self.palette
    }

    /// The raw pixel bytes of the bitmap.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Whether a read view of this bitmap is currently alive.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Acquire)
    }

    /// Acquires read access to the bitmap's bytes.
    ///
    /// The bitmap stays locked until the returned view is dropped.
    ///
    /// # Errors
    /// Returns [`FilterError::InvalidOperation`] if the bitmap is already locked.
    pub fn lock(&self) -> Result<BitmapData<'_>, FilterError> {
        if self
            .locked
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(FilterError::InvalidOperation(format!(
                "{}x{} {} bitmap is already locked",
                self.width, self.height, self.format
            )));
        }

        trace!(width = self.width, height = self.height, format = %self.format, "locked bitmap");
        Ok(BitmapData { bitmap: self })
    }

    /// Acquires read and write access to the bitmap's bytes and color table.
    pub fn lock_mut(&mut self) -> BitmapDataMut<'_> {
        trace!(width = self.width, height = self.height, format = %self.format, "locked bitmap for writing");
        BitmapDataMut { bitmap: self }
    }

    /// The byte range of row `y` (including padding).
    fn row_range(&self, y: u32) -> Range<usize> {
        let start = y as usize * self.stride;
        start..(start + self.stride)
    }

    /// Reads the palette index stored for the pixel at `(x, y)`.
    ///
    /// Returns `None` if the bitmap is not indexed or the position is out of bounds.
    #[must_use]
    pub fn index_at(&self, x: u32, y: u32) -> Option<u8> {
        if !self.format.is_indexed() || x >= self.width || y >= self.height {
            return None;
        }

        let bits = usize::from(self.format.bits_per_pixel());
        let row = self.data[self.row_range(y)].view_bits::<Msb0>();
        let start = x as usize * bits;
        Some(row[start..(start + bits)].load_be::<u8>())
    }

    /// Reads the color of the pixel at `(x, y)`.
    ///
    /// Indexed pixels are resolved through the color table.
    /// Returns `None` for unsupported formats or out of bounds positions.
    #[must_use]
    pub fn color_at(&self, x: u32, y: u32) -> Option<Srgba<u8>> {
        if x >= self.width || y >= self.height {
            return None;
        }

        if self.format.is_indexed() {
            let i = self.index_at(x, y)?;
            return self.palette.get(usize::from(i)).copied();
        }

        let bytes = self.format.bytes_per_pixel()?;
        let offset = y as usize * self.stride + x as usize * bytes;
        read_color(self.format, &self.data[offset..(offset + bytes)])
    }
}

/// Reads a single full-color pixel stored in DIB channel order.
///
/// Formats without alpha read as fully opaque.
pub(crate) fn read_color(format: PixelFormat, pixel: &[u8]) -> Option<Srgba<u8>> {
    match format {
        PixelFormat::Rgb24 | PixelFormat::Rgb32 => {
            Some(Srgba::new(pixel[2], pixel[1], pixel[0], u8::MAX))
        }
        PixelFormat::Argb32 => Some(Srgba::new(pixel[2], pixel[1], pixel[0], pixel[3])),
        _ => None,
    }
}

/// A read-only view of a locked [`Bitmap`].
///
/// Dropping the view unlocks the bitmap.
#[derive(Debug)]
pub struct BitmapData<'a> {
    /// The locked bitmap.
    bitmap: &'a Bitmap,
}

impl<'a> BitmapData<'a> {
    /// Returns the bytes of row `y`, including padding.
    ///
    /// # Panics
    /// Panics if `y` is not less than the height of the bitmap.
    #[must_use]
    pub fn row(&self, y: u32) -> &'a [u8] {
        assert!(y < self.bitmap.height, "row {y} is out of bounds");
        &self.bitmap.data[self.bitmap.row_range(y)]
    }

    /// Returns an iterator over the rows of the bitmap, each `stride` bytes long.
    pub fn rows(&self) -> impl Iterator<Item = &'a [u8]> + 'a {
        let bitmap = self.bitmap;
        (0..bitmap.height).map(move |y| &bitmap.data[bitmap.row_range(y)])
    }
}

impl<'a> Deref for BitmapData<'a> {
    type Target = Bitmap;

    fn deref(&self) -> &Self::Target {
        self.bitmap
    }
}

impl<'a> Drop for BitmapData<'a> {
    fn drop(&mut self) {
        self.bitmap.locked.store(false, Ordering::Release);
        trace!(format = %self.bitmap.format, "unlocked bitmap");
    }
}

/// A mutable view of a locked [`Bitmap`].
#[derive(Debug)]
pub struct BitmapDataMut<'a> {
    /// The locked bitmap.
    bitmap: &'a mut Bitmap,
}

impl<'a> BitmapDataMut<'a> {
    /// The width of the bitmap in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.bitmap.width
    }

    /// The height of the bitmap in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.bitmap.height
    }

    /// The number of bytes per row, including padding.
    #[must_use]
    pub fn stride(&self) -> usize {
        self.bitmap.stride
    }

    /// The pixel format of the bitmap.
    #[must_use]
    pub fn format(&self) -> PixelFormat {
        self.bitmap.format
    }

    /// Returns the mutable bytes of row `y`, including padding.
    ///
    /// # Panics
    /// Panics if `y` is not less than the height of the bitmap.
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        assert!(y < self.bitmap.height, "row {y} is out of bounds");
        let range = self.bitmap.row_range(y);
        &mut self.bitmap.data[range]
    }

    /// Returns all pixel bytes of the bitmap, `stride * height` long.
    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bitmap.data
    }

    /// Returns the color table of the bitmap.
    pub fn palette_mut(&mut self) -> &mut [Srgba<u8>] {
        &mut self.bitmap.palette
    }
}

impl<'a> Drop for BitmapDataMut<'a> {
    fn drop(&mut self) {
        trace!(format = %self.bitmap.format, "unlocked bitmap for writing");
    }
}
