//! Contains various types needed across the crate.

use crate::MAX_DEPTH;
use palette::Srgba;
use std::{fmt::Display, ops::Deref};
use thiserror::Error;

/// The pixel formats a [`Bitmap`](crate::Bitmap) can be tagged with.
///
/// Full-color formats store their channels in little-endian DIB order,
/// i.e., blue first: [`PixelFormat::Rgb24`] is `B, G, R`, [`PixelFormat::Rgb32`] is `B, G, R, X`,
/// and [`PixelFormat::Argb32`] is `B, G, R, A`.
/// Indexed formats pack palette indices most significant bits first.
///
/// The 16, 48, and 64-bit formats exist so that bitmaps can be tagged with them,
/// but no filter supports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// 16-bit grayscale.
    Gray16,
    /// 16-bit color with 1 bit of alpha and 5 bits per color channel.
    Argb1555,
    /// 16-bit color with 5 bits per channel.
    Rgb555,
    /// 16-bit color with 5 bits of red, 6 bits of green, and 5 bits of blue.
    Rgb565,
    /// 24-bit color stored as `B, G, R`.
    Rgb24,
    /// 32-bit color stored as `B, G, R, X`, where the last byte is unused.
    Rgb32,
    /// 32-bit color with alpha stored as `B, G, R, A`.
    Argb32,
    /// 48-bit color with 16 bits per channel.
    Rgb48,
    /// 64-bit color with alpha and 16 bits per channel.
    Argb64,
    /// 1 bit per pixel, indexing a 2 color palette.
    Indexed1,
    /// 4 bits per pixel, indexing a 16 color palette.
    Indexed4,
    /// 8 bits per pixel, indexing a 256 color palette.
    Indexed8,
}

impl PixelFormat {
    /// All pixel formats.
    pub const ALL: [Self; 12] = [
        Self::Gray16,
        Self::Argb1555,
        Self::Rgb555,
        Self::Rgb565,
        Self::Rgb24,
        Self::Rgb32,
        Self::Argb32,
        Self::Rgb48,
        Self::Argb64,
        Self::Indexed1,
        Self::Indexed4,
        Self::Indexed8,
    ];

    /// The full-color formats supported by the filters.
    pub const FULL_COLOR: [Self; 3] = [Self::Rgb24, Self::Rgb32, Self::Argb32];

    /// The indexed formats supported as quantization targets.
    pub const INDEXED: [Self; 3] = [Self::Indexed1, Self::Indexed4, Self::Indexed8];

    /// Returns the number of bits used to store a single pixel.
    #[must_use]
    pub const fn bits_per_pixel(self) -> u8 {
        match self {
            Self::Gray16 | Self::Argb1555 | Self::Rgb555 | Self::Rgb565 => 16,
            Self::Rgb24 => 24,
            Self::Rgb32 | Self::Argb32 => 32,
            Self::Rgb48 => 48,
            Self::Argb64 => 64,
            Self::Indexed1 => 1,
            Self::Indexed4 => 4,
            Self::Indexed8 => 8,
        }
    }

    /// Returns the number of whole bytes per pixel, or `None` for sub-byte formats.
    #[must_use]
    pub const fn bytes_per_pixel(self) -> Option<usize> {
        let bits = self.bits_per_pixel();
        if bits % 8 == 0 {
            Some(bits as usize / 8)
        } else {
            None
        }
    }

    /// Whether this format stores palette indices.
    #[must_use]
    pub const fn is_indexed(self) -> bool {
        matches!(self, Self::Indexed1 | Self::Indexed4 | Self::Indexed8)
    }

    /// Whether this format is one of the supported 24 or 32-bit color formats.
    #[must_use]
    pub const fn is_full_color(self) -> bool {
        matches!(self, Self::Rgb24 | Self::Rgb32 | Self::Argb32)
    }

    /// Whether this format carries an alpha channel.
    #[must_use]
    pub const fn has_alpha(self) -> bool {
        matches!(self, Self::Argb1555 | Self::Argb32 | Self::Argb64)
    }

    /// The number of entries in the color table of an indexed format, or `0` otherwise.
    #[must_use]
    pub const fn palette_len(self) -> usize {
        if self.is_indexed() {
            1 << self.bits_per_pixel()
        } else {
            0
        }
    }

    /// The minimum number of bytes needed to store a row of `width` pixels.
    #[must_use]
    pub const fn min_stride(self, width: u32) -> usize {
        (width as usize * self.bits_per_pixel() as usize).div_ceil(8)
    }

    /// The row stride used for newly allocated bitmaps:
    /// [`PixelFormat::min_stride`] rounded up to a multiple of 4 bytes.
    #[must_use]
    pub const fn aligned_stride(self, width: u32) -> usize {
        self.min_stride(width).next_multiple_of(4)
    }
}

impl Display for PixelFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Gray16 => "16bpp grayscale",
            Self::Argb1555 => "16bpp ARGB 1555",
            Self::Rgb555 => "16bpp RGB 555",
            Self::Rgb565 => "16bpp RGB 565",
            Self::Rgb24 => "24bpp RGB",
            Self::Rgb32 => "32bpp RGB",
            Self::Argb32 => "32bpp ARGB",
            Self::Rgb48 => "48bpp RGB",
            Self::Argb64 => "64bpp ARGB",
            Self::Indexed1 => "1bpp indexed",
            Self::Indexed4 => "4bpp indexed",
            Self::Indexed8 => "8bpp indexed",
        };
        f.write_str(name)
    }
}

/// An error type for when a quantization depth is above [`MAX_DEPTH`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("above the maximum quantization depth of {0}")]
pub struct AboveMaxDepth(pub u8);

/// The number of times the median cut quantizer splits the samples.
///
/// A depth of `k` yields a palette of `2^k` colors.
/// This is a simple new type wrapper around `u8` with the invariant that it must be
/// less than or equal to [`MAX_DEPTH`], so that every palette index fits in a `u8`.
///
/// A depth of `0` results in an empty [`Palette`].
///
/// # Examples
/// ```
/// # use repixel::{QuantizeDepth, AboveMaxDepth, PixelFormat};
/// # fn main() -> Result<(), AboveMaxDepth> {
/// let depth = QuantizeDepth::try_from(4)?;
/// let depth = QuantizeDepth::from_clamped(12);
/// assert_eq!(depth, QuantizeDepth::MAX);
/// let depth = QuantizeDepth::for_format(PixelFormat::Indexed4);
/// assert_eq!(depth, Some(QuantizeDepth::try_from(4)?));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct QuantizeDepth(u8);

impl QuantizeDepth {
    /// The maximum supported depth (given by [`MAX_DEPTH`]).
    pub const MAX: Self = Self(MAX_DEPTH);

    /// Gets the inner `u8` value.
    #[must_use]
    pub const fn into_inner(self) -> u8 {
        self.0
    }

    /// Creates a [`QuantizeDepth`] by clamping the given `u8` to be less than or equal to [`MAX_DEPTH`].
    #[must_use]
    pub const fn from_clamped(value: u8) -> Self {
        if value <= MAX_DEPTH {
            Self(value)
        } else {
            Self(MAX_DEPTH)
        }
    }

    /// Returns the depth matching the bits per pixel of an indexed format.
    #[must_use]
    pub const fn for_format(format: PixelFormat) -> Option<Self> {
        if format.is_indexed() {
            Some(Self(format.bits_per_pixel()))
        } else {
            None
        }
    }

    /// The number of palette entries a quantization of this depth produces.
    #[must_use]
    pub const fn palette_len(self) -> usize {
        if self.0 == 0 {
            0
        } else {
            1 << self.0
        }
    }
}

impl TryFrom<u8> for QuantizeDepth {
    type Error = AboveMaxDepth;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value <= MAX_DEPTH {
            Ok(Self(value))
        } else {
            Err(AboveMaxDepth(MAX_DEPTH))
        }
    }
}

impl From<QuantizeDepth> for u8 {
    fn from(val: QuantizeDepth) -> Self {
        val.into_inner()
    }
}

impl Display for QuantizeDepth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.into_inner())
    }
}

/// A single pixel of a source bitmap, tagged with its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelSample {
    /// The color of the pixel.
    pub color: Srgba<u8>,
    /// The row-major position of the pixel in the source bitmap, `y * width + x`.
    pub source_index: u32,
}

/// A palette color and the source pixels assigned to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteEntry {
    /// The per-channel mean of the member pixels, truncated towards zero.
    pub color: Srgba<u8>,
    /// The source indices of the pixels assigned to this entry.
    ///
    /// The order of the indices is unspecified.
    pub members: Vec<u32>,
}

/// The ordered output of the median cut quantizer.
///
/// The position of an entry is the palette index written for its members.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Palette(Vec<PaletteEntry>);

impl Palette {
    /// Creates a new [`Palette`] from the given entries.
    #[must_use]
    pub fn new(entries: Vec<PaletteEntry>) -> Self {
        Self(entries)
    }

    /// Returns an iterator over the colors of the palette in index order.
    pub fn colors(&self) -> impl Iterator<Item = Srgba<u8>> + '_ {
        self.0.iter().map(|entry| entry.color)
    }

    /// Returns the total number of member pixels across all entries.
    #[must_use]
    pub fn num_members(&self) -> usize {
        self.0.iter().map(|entry| entry.members.len()).sum()
    }

    /// Consumes the palette and returns its entries.
    #[must_use]
    pub fn into_entries(self) -> Vec<PaletteEntry> {
        self.0
    }
}

impl Deref for Palette {
    type Target = [PaletteEntry];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<[PaletteEntry]> for Palette {
    fn as_ref(&self) -> &[PaletteEntry] {
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn format_classes_are_disjoint() {
        for format in PixelFormat::ALL {
            assert!(!(format.is_indexed() && format.is_full_color()));
            assert_eq!(format.palette_len() > 0, format.is_indexed());
        }
        assert!(PixelFormat::FULL_COLOR.iter().all(|f| f.is_full_color()));
        assert!(PixelFormat::INDEXED.iter().all(|f| f.is_indexed()));
    }

    #[test]
    fn strides() {
        assert_eq!(PixelFormat::Indexed1.min_stride(9), 2);
        assert_eq!(PixelFormat::Indexed4.min_stride(5), 3);
        assert_eq!(PixelFormat::Rgb24.min_stride(3), 9);
        assert_eq!(PixelFormat::Rgb24.aligned_stride(3), 12);
        assert_eq!(PixelFormat::Argb32.aligned_stride(3), 12);
        assert_eq!(PixelFormat::Indexed8.aligned_stride(0), 0);
        assert_eq!(PixelFormat::Indexed1.bytes_per_pixel(), None);
        assert_eq!(PixelFormat::Rgb24.bytes_per_pixel(), Some(3));
    }

    #[test]
    fn depth_bounds() {
        assert_eq!(QuantizeDepth::try_from(9), Err(AboveMaxDepth(MAX_DEPTH)));
        assert_eq!(QuantizeDepth::from_clamped(200), QuantizeDepth::MAX);
        assert_eq!(QuantizeDepth::MAX.palette_len(), 256);
        assert_eq!(QuantizeDepth::default().palette_len(), 0);

        for format in PixelFormat::INDEXED {
            let depth = QuantizeDepth::for_format(format).unwrap();
            assert_eq!(depth.palette_len(), format.palette_len());
        }
        assert_eq!(QuantizeDepth::for_format(PixelFormat::Rgb24), None);
    }
}
