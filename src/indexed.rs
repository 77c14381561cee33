//! Writes a [`Palette`] into an indexed bitmap.

use crate::{BitmapDataMut, Palette};
use bitvec::{field::BitField, order::Msb0, view::BitView};

/// Writes the colors of `palette` into the color table of `data` and stores,
/// for every member of every entry, the index of that entry at the member's pixel.
///
/// Member source indices are mapped to pixels in row-major order using the width of `data`.
/// For 1 and 4-bit formats several pixels share a byte, with the leftmost pixel in the most
/// significant bits. Since the entries of a [`Palette`] are disjoint,
/// each pixel (and each bit lane) is written exactly once.
///
/// `data` must be one of the indexed formats and its color table must have room for every entry,
/// that is, the palette must have at most `2^bits_per_pixel` entries.
/// Pixels not covered by the palette are left untouched.
pub fn write_indices(palette: &Palette, data: &mut BitmapDataMut<'_>) {
    let format = data.format();
    debug_assert!(format.is_indexed());
    debug_assert!(palette.len() <= format.palette_len());

    let width = data.width() as usize;
    let stride = data.stride();
    let bits = usize::from(format.bits_per_pixel());

    for (slot, entry) in data.palette_mut().iter_mut().zip(palette.iter()) {
        *slot = entry.color;
    }

    let bytes = data.bytes_mut();
    for (i, entry) in palette.iter().enumerate() {
        #[allow(clippy::cast_possible_truncation)]
        let index = i as u8;

        for &member in &entry.members {
            let member = member as usize;
            let (row, col) = (member / width, member % width);
            let row = &mut bytes[(row * stride)..((row + 1) * stride)];

            if bits == 8 {
                row[col] = index;
            } else {
                let start = col * bits;
                row.view_bits_mut::<Msb0>()[start..(start + bits)].store_be(index);
            }
        }
    }
}
