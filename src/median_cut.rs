//! Median cut color quantization.
//!
//! The samples are recursively split in half at the median of the color channel with the
//! greatest range of values. After `k` levels of splitting this yields `2^k` boxes
//! of (nearly) equal size, each of which becomes a palette entry with the mean color of its samples.
//!
//! Boxes are finalized depth first, lower half before upper half,
//! so the palette order (and therefore each palette index) is fully determined by the input.
//!
//! Partitioning works on a single permutation of sample positions: each box is a
//! `start..end` range of that permutation, and splitting a box only reorders its own range.
//!
//! If `k` is greater than `floor(log2(n))` for `n` samples, some boxes would be empty.
//! In that case `k` is clamped to `floor(log2(n))` so that every palette entry has at least one member.
//! A single sample clamps `k` to `0`, which yields one entry holding that sample.

use crate::{Palette, PaletteEntry, PixelSample, QuantizeDepth};
use palette::Srgba;
#[cfg(feature = "threads")]
use rayon::prelude::*;
use std::ops::Range;
use tracing::{debug, warn};

/// A color channel considered when choosing where to split a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Channel {
    /// The red channel.
    Red,
    /// The green channel.
    Green,
    /// The blue channel.
    Blue,
}

impl Channel {
    /// Returns the value of this channel for the given color.
    #[inline]
    fn of(self, color: Srgba<u8>) -> u8 {
        match self {
            Self::Red => color.red,
            Self::Green => color.green,
            Self::Blue => color.blue,
        }
    }

    /// Returns the channel with the greatest range of values over the given colors.
    ///
    /// Ties go to green, then blue, then red.
    fn widest(colors: impl Iterator<Item = Srgba<u8>>) -> Self {
        let mut min = [u8::MAX; 3];
        let mut max = [u8::MIN; 3];
        for color in colors {
            for (c, v) in [color.red, color.green, color.blue].into_iter().enumerate() {
                min[c] = min[c].min(v);
                max[c] = max[c].max(v);
            }
        }

        let [r, g, b] = [0, 1, 2].map(|c| max[c].saturating_sub(min[c]));
        if g >= b && g >= r {
            Self::Green
        } else if b >= r {
            Self::Blue
        } else {
            Self::Red
        }
    }
}

/// The state for one run of the median cut quantizer.
struct MedianCut<'a> {
    /// The input samples.
    samples: &'a [PixelSample],
    /// The permutation of sample positions that boxes are ranges of.
    order: Vec<u32>,
    /// The finalized boxes, in palette order.
    leaves: Vec<Range<usize>>,
    /// The number of splits to perform.
    depth: u8,
}

impl<'a> MedianCut<'a> {
    /// Partitions the samples into `2^depth` boxes.
    ///
    /// The samples must contain at least `2^depth` elements.
    #[allow(clippy::cast_possible_truncation)]
    fn new(samples: &'a [PixelSample], depth: u8) -> Self {
        let mut cut = Self {
            samples,
            order: (0..samples.len() as u32).collect(),
            leaves: Vec::with_capacity(1 << depth),
            depth,
        };
        cut.partition(0..samples.len(), 0);
        cut
    }

    /// Splits the given range of `order` at its median along its widest channel,
    /// recording it as a leaf once it has been split `depth` times.
    fn partition(&mut self, range: Range<usize>, level: u8) {
        if level == self.depth {
            self.leaves.push(range);
            return;
        }

        let samples = self.samples;
        let order = &mut self.order[range.clone()];

        let channel = Channel::widest(order.iter().map(|&i| samples[i as usize].color));
        order.sort_by_key(|&i| channel.of(samples[i as usize].color));

        let mid = (range.start + range.end) / 2;
        self.partition(range.start..mid, level + 1);
        self.partition(mid..range.end, level + 1);
    }

    /// Returns the mean color and member source indices of the given box.
    fn entry(&self, range: Range<usize>) -> PaletteEntry {
        let members = &self.order[range];
        debug_assert!(!members.is_empty());

        let mut sums = [0u64; 4];
        let members = members
            .iter()
            .map(|&i| {
                let PixelSample { color, source_index } = self.samples[i as usize];
                let (r, g, b, a) = color.into_components();
                for (sum, v) in sums.iter_mut().zip([r, g, b, a]) {
                    *sum += u64::from(v);
                }
                source_index
            })
            .collect::<Vec<_>>();

        let n = members.len() as u64;
        #[allow(clippy::cast_possible_truncation)]
        let [r, g, b, a] = sums.map(|sum| (sum / n) as u8);

        PaletteEntry { color: Srgba::new(r, g, b, a), members }
    }
}

/// Returns the depth actually used for the given number of samples,
/// or `None` if no palette should be computed.
fn clamp_depth(num_samples: usize, depth: QuantizeDepth) -> Option<u8> {
    let depth = depth.into_inner();
    if num_samples == 0 || depth == 0 {
        return None;
    }

    #[allow(clippy::cast_possible_truncation)]
    let max_depth = num_samples.ilog2().min(u32::from(u8::MAX)) as u8;
    if depth > max_depth {
        warn!(depth, max_depth, num_samples, "clamping quantization depth to fit the number of samples");
        Some(max_depth)
    } else {
        Some(depth)
    }
}

/// Computes a palette of `2^depth` colors from the given samples using median cut.
///
/// Each [`PaletteEntry`] lists the `source_index` of every sample assigned to it,
/// and every sample is assigned to exactly one entry.
///
/// An empty [`Palette`] is returned if `depth` is `0` or `samples` is empty.
/// Otherwise every sample is assigned to an entry, even if `depth` had to be clamped.
/// See the [module documentation](self) for how `depth` is clamped for small inputs.
#[must_use]
pub fn palette(samples: &[PixelSample], depth: QuantizeDepth) -> Palette {
    let Some(depth) = clamp_depth(samples.len(), depth) else {
        return Palette::default();
    };

    let cut = MedianCut::new(samples, depth);
    debug!(samples = samples.len(), depth, leaves = cut.leaves.len(), "median cut partitioned samples");

    Palette::new(cut.leaves.iter().map(|range| cut.entry(range.clone())).collect())
}

/// Computes a palette of `2^depth` colors from the given samples using median cut,
/// averaging the boxes in parallel.
///
/// The output is identical to [`palette`].
#[cfg(feature = "threads")]
#[must_use]
pub fn palette_par(samples: &[PixelSample], depth: QuantizeDepth) -> Palette {
    let Some(depth) = clamp_depth(samples.len(), depth) else {
        return Palette::default();
    };

    let cut = MedianCut::new(samples, depth);
    debug!(samples = samples.len(), depth, leaves = cut.leaves.len(), "median cut partitioned samples");

    Palette::new(
        cut.leaves
            .par_iter()
            .map(|range| cut.entry(range.clone()))
            .collect(),
    )
}
