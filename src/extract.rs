//! Reads the pixels of a full-color bitmap into [`PixelSample`]s.

use crate::{bitmap::read_color, BitmapData, PixelSample};
#[cfg(feature = "threads")]
use rayon::prelude::*;

/// Returns the samples of row `y`.
fn row_samples<'a>(data: &BitmapData<'a>, y: u32) -> impl Iterator<Item = PixelSample> + 'a {
    let format = data.format();
    let width = data.width();
    // bitmaps hold at most `MAX_PIXELS` pixels
    let row_start = y * width;

    // callers check `bytes_per_pixel` before scanning
    let bytes = format.bytes_per_pixel().unwrap_or(1);

    data.row(y)[..(width as usize * bytes)]
        .chunks_exact(bytes)
        .zip(row_start..)
        .filter_map(move |(pixel, source_index)| {
            read_color(format, pixel).map(|color| PixelSample { color, source_index })
        })
}

/// Extracts one [`PixelSample`] per pixel of the given bitmap.
///
/// Pixels are scanned top to bottom, left to right, so that the sample at position `i`
/// has a `source_index` of `i`.
/// Pixels of [`PixelFormat::Rgb32`](crate::PixelFormat::Rgb32) bitmaps are read as fully opaque.
///
/// Returns `None` if the bitmap is not one of the full-color formats
/// ([`PixelFormat::FULL_COLOR`](crate::PixelFormat::FULL_COLOR)).
#[must_use]
pub fn samples(data: &BitmapData<'_>) -> Option<Vec<PixelSample>> {
    if !data.format().is_full_color() {
        return None;
    }

    let mut samples = Vec::with_capacity(data.num_pixels());
    for y in 0..data.height() {
        samples.extend(row_samples(data, y));
    }
    Some(samples)
}

/// Extracts one [`PixelSample`] per pixel of the given bitmap in parallel.
///
/// The output is identical to [`samples`].
#[cfg(feature = "threads")]
#[must_use]
pub fn samples_par(data: &BitmapData<'_>) -> Option<Vec<PixelSample>> {
    if !data.format().is_full_color() {
        return None;
    }

    Some(
        (0..data.height())
            .into_par_iter()
            .flat_map_iter(|y| row_samples(data, y))
            .collect(),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{tests::*, Bitmap, PixelFormat};
    use palette::Srgba;

    #[test]
    fn samples_are_row_major_and_dense() {
        let colors = test_colors(7 * 5);
        for format in PixelFormat::FULL_COLOR {
            let bitmap = bitmap_from_colors(7, 5, format, &colors);
            let data = bitmap.lock().unwrap();
            let samples = samples(&data).unwrap();

            assert_eq!(samples.len(), 35);
            for (i, sample) in samples.iter().enumerate() {
                assert_eq!(sample.source_index as usize, i);
                let expected = colors[i];
                assert_eq!(sample.color.red, expected.red);
                assert_eq!(sample.color.green, expected.green);
                assert_eq!(sample.color.blue, expected.blue);
            }
        }
    }

    #[test]
    fn alpha_handling() {
        let colors = [Srgba::new(1, 2, 3, 40), Srgba::new(4, 5, 6, 0)];

        let bitmap = bitmap_from_colors(2, 1, PixelFormat::Argb32, &colors);
        let data = bitmap.lock().unwrap();
        let alphas = samples(&data).unwrap().iter().map(|s| s.color.alpha).collect::<Vec<_>>();
        assert_eq!(alphas, [40, 0]);

        let bitmap = bitmap_from_colors(2, 1, PixelFormat::Rgb32, &colors);
        let data = bitmap.lock().unwrap();
        let alphas = samples(&data).unwrap().iter().map(|s| s.color.alpha).collect::<Vec<_>>();
        assert_eq!(alphas, [255, 255]);
    }

    #[test]
    fn padding_is_skipped() {
        // 3 pixels of 24 bits with 3 bytes of padding per row
        let mut bytes = vec![0xEE; 24];
        bytes[..9].copy_from_slice(&[0, 0, 1, 0, 0, 2, 0, 0, 3]);
        bytes[12..21].copy_from_slice(&[0, 0, 4, 0, 0, 5, 0, 0, 6]);
        let bitmap = Bitmap::from_raw(3, 2, 12, PixelFormat::Rgb24, bytes).unwrap();
        let data = bitmap.lock().unwrap();

        let reds = samples(&data).unwrap().iter().map(|s| s.color.red).collect::<Vec<_>>();
        assert_eq!(reds, [1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn unsupported_formats() {
        for format in [
            PixelFormat::Gray16,
            PixelFormat::Rgb565,
            PixelFormat::Rgb48,
            PixelFormat::Argb64,
            PixelFormat::Indexed1,
            PixelFormat::Indexed8,
        ] {
            let bitmap = Bitmap::new(2, 2, format);
            let data = bitmap.lock().unwrap();
            assert!(samples(&data).is_none());
        }
    }

    #[test]
    #[cfg(feature = "threads")]
    fn single_and_multi_threaded_match() {
        let bitmap = bitmap_from_colors(31, 17, PixelFormat::Argb32, &test_colors(31 * 17));
        let data = bitmap.lock().unwrap();
        assert_eq!(samples(&data), samples_par(&data));
    }
}
