//! Per-pixel copying between the full-color formats, and the invert filter's pixel loop.

use crate::{BitmapData, BitmapDataMut, PixelFormat};
#[cfg(feature = "threads")]
use rayon::prelude::*;

/// Copies the channels of one row of full-color pixels into another row of a
/// (possibly different) full-color format.
fn copy_row(
    src: &[u8],
    src_format: PixelFormat,
    dst: &mut [u8],
    dst_format: PixelFormat,
    width: usize,
) {
    // both formats are checked to be full-color by the callers
    let src_bytes = src_format.bytes_per_pixel().unwrap_or(3);
    let dst_bytes = dst_format.bytes_per_pixel().unwrap_or(3);

    let src = src[..(width * src_bytes)].chunks_exact(src_bytes);
    let dst = dst[..(width * dst_bytes)].chunks_exact_mut(dst_bytes);

    for (src, dst) in src.zip(dst) {
        dst[..3].copy_from_slice(&src[..3]);
        if dst_format.has_alpha() {
            dst[3] = if src_format.has_alpha() { src[3] } else { u8::MAX };
        }
    }
}

/// Copies every pixel of `src` into `dst`, converting between full-color formats.
///
/// Blue, green, and red are copied as is. Alpha is copied only if `dst` has an alpha channel,
/// in which case pixels from a source without alpha become fully opaque.
/// Row padding in `dst` is left untouched.
///
/// Both bitmaps must be full-color and have the same dimensions.
pub fn copy_channels(src: &BitmapData<'_>, dst: &mut BitmapDataMut<'_>) {
    debug_assert!(src.format().is_full_color() && dst.format().is_full_color());
    debug_assert_eq!((src.width(), src.height()), (dst.width(), dst.height()));

    let (src_format, dst_format) = (src.format(), dst.format());
    let width = src.width() as usize;
    for y in 0..src.height() {
        copy_row(src.row(y), src_format, dst.row_mut(y), dst_format, width);
    }
}

/// Copies every pixel of `src` into `dst` in parallel, one row per task.
///
/// The output is identical to [`copy_channels`].
#[cfg(feature = "threads")]
pub fn copy_channels_par(src: &BitmapData<'_>, dst: &mut BitmapDataMut<'_>) {
    debug_assert!(src.format().is_full_color() && dst.format().is_full_color());
    debug_assert_eq!((src.width(), src.height()), (dst.width(), dst.height()));

    let (src_format, dst_format) = (src.format(), dst.format());
    let width = src.width() as usize;
    let (src_stride, dst_stride) = (src.stride(), dst.stride());
    if src_stride == 0 || dst_stride == 0 {
        return;
    }

    dst.bytes_mut()
        .par_chunks_exact_mut(dst_stride)
        .zip(src.as_bytes().par_chunks_exact(src_stride))
        .for_each(|(dst, src)| copy_row(src, src_format, dst, dst_format, width));
}

/// Replaces the blue, green, and red channels of every pixel with their bitwise negation.
///
/// Alpha and row padding are left untouched. The bitmap must be full-color.
pub fn invert_channels(data: &mut BitmapDataMut<'_>) {
    debug_assert!(data.format().is_full_color());

    let bytes = data.format().bytes_per_pixel().unwrap_or(3);
    let width = data.width() as usize;
    for y in 0..data.height() {
        for pixel in data.row_mut(y)[..(width * bytes)].chunks_exact_mut(bytes) {
            for channel in &mut pixel[..3] {
                *channel = !*channel;
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{tests::*, Bitmap};
    use palette::Srgba;

    fn copied(src: &Bitmap, format: PixelFormat) -> Bitmap {
        let mut dst = Bitmap::new(src.width(), src.height(), format);
        copy_channels(&src.lock().unwrap(), &mut dst.lock_mut());
        dst
    }

    #[test]
    fn argb_to_rgb_preserves_color_channels() {
        let colors = test_colors(13 * 3);
        let src = bitmap_from_colors(13, 3, PixelFormat::Argb32, &colors);
        let dst = copied(&src, PixelFormat::Rgb24);

        for (i, color) in colors.iter().enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            let (x, y) = ((i % 13) as u32, (i / 13) as u32);
            let actual = dst.color_at(x, y).unwrap();
            assert_eq!(actual, Srgba::new(color.red, color.green, color.blue, 255));
        }
    }

    #[test]
    fn alpha_is_copied_or_made_opaque() {
        let colors = [Srgba::new(1, 2, 3, 4), Srgba::new(5, 6, 7, 8)];

        let src = bitmap_from_colors(2, 1, PixelFormat::Argb32, &colors);
        let dst = copied(&src, PixelFormat::Argb32);
        assert_eq!(dst.color_at(1, 0), Some(Srgba::new(5, 6, 7, 8)));

        let src = bitmap_from_colors(2, 1, PixelFormat::Rgb24, &colors);
        let dst = copied(&src, PixelFormat::Argb32);
        assert_eq!(dst.color_at(0, 0), Some(Srgba::new(1, 2, 3, 255)));

        let src = bitmap_from_colors(2, 1, PixelFormat::Argb32, &colors);
        let dst = copied(&src, PixelFormat::Rgb32);
        assert_eq!(dst.as_bytes(), [3, 2, 1, 0, 7, 6, 5, 0]);
    }

    #[test]
    fn padding_is_left_untouched() {
        let colors = test_colors(3 * 2);
        let src = bitmap_from_colors(3, 2, PixelFormat::Rgb32, &colors);
        let dst = copied(&src, PixelFormat::Rgb24);
        assert_eq!(dst.stride(), 12);
        assert!(dst.as_bytes()[9..12].iter().all(|&b| b == 0));
        assert!(dst.as_bytes()[21..24].iter().all(|&b| b == 0));
    }

    #[test]
    fn invert_twice_is_identity() {
        let src = bitmap_from_colors(5, 4, PixelFormat::Argb32, &test_colors(20));
        let mut dst = src.clone();
        invert_channels(&mut dst.lock_mut());

        let color = src.color_at(2, 3).unwrap();
        assert_eq!(
            dst.color_at(2, 3),
            Some(Srgba::new(!color.red, !color.green, !color.blue, color.alpha))
        );

        invert_channels(&mut dst.lock_mut());
        assert_eq!(dst, src);
    }

    #[test]
    #[cfg(feature = "threads")]
    fn single_and_multi_threaded_match() {
        let src = bitmap_from_colors(29, 11, PixelFormat::Argb32, &test_colors(29 * 11));
        for format in PixelFormat::FULL_COLOR {
            let single = copied(&src, format);
            let mut par = Bitmap::new(src.width(), src.height(), format);
            copy_channels_par(&src.lock().unwrap(), &mut par.lock_mut());
            assert_eq!(single, par);
        }
    }
}
