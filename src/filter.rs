//! Contains the [`Filter`] trait, the filters implementing it, and the [`Command`] runner.

use crate::{
    copy, extract, indexed, median_cut, Bitmap, FilterError, PixelFormat, QuantizeDepth,
};
use tracing::{debug, debug_span};

/// An operation that produces a new [`Bitmap`] from an input bitmap.
///
/// Filters run synchronously and either return a complete bitmap or an error,
/// never a partially written one.
pub trait Filter {
    /// The input pixel formats this filter accepts.
    fn supported_formats(&self) -> &'static [PixelFormat];

    /// Runs the filter.
    ///
    /// # Errors
    /// Returns [`FilterError::UnsupportedFormat`] if the input or output format is not supported,
    /// or [`FilterError::InvalidOperation`] if the input bitmap could not be locked.
    fn execute(&self) -> Result<Bitmap, FilterError>;
}

/// Holds the outcome of running a [`Filter`]: either a result bitmap or an error.
///
/// # Examples
/// ```
/// # use repixel::{Bitmap, Command, ConvertPixelFormat, PixelFormat};
/// let image = Bitmap::new(4, 4, PixelFormat::Rgb24);
/// let mut command = Command::new(ConvertPixelFormat::new(&image, PixelFormat::Indexed4));
/// command.execute();
///
/// assert!(command.error().is_none());
/// let indexed = command.take_result().unwrap();
/// assert_eq!(indexed.format(), PixelFormat::Indexed4);
/// ```
#[derive(Debug)]
pub struct Command<F> {
    /// The filter to run.
    filter: F,
    /// The output of the last successful run.
    result: Option<Bitmap>,
    /// The error of the last failed run.
    error: Option<FilterError>,
}

impl<F: Filter> Command<F> {
    /// Creates a new [`Command`] that has not been run yet.
    #[must_use]
    pub const fn new(filter: F) -> Self {
        Self { filter, result: None, error: None }
    }

    /// Runs the filter, replacing the outcome of any previous run.
    pub fn execute(&mut self) {
        match self.filter.execute() {
            Ok(bitmap) => {
                self.result = Some(bitmap);
                self.error = None;
            }
            Err(error) => {
                debug!(%error, "filter failed");
                self.result = None;
                self.error = Some(error);
            }
        }
    }

    /// The filter this command runs.
    #[must_use]
    pub const fn filter(&self) -> &F {
        &self.filter
    }

    /// The result of the last run, or `None` if the filter has not run or failed.
    #[must_use]
    pub const fn result(&self) -> Option<&Bitmap> {
        self.result.as_ref()
    }

    /// Takes the result of the last run out of the command.
    pub fn take_result(&mut self) -> Option<Bitmap> {
        self.result.take()
    }

    /// The error of the last run, or `None` if the filter has not run or succeeded.
    #[must_use]
    pub const fn error(&self) -> Option<&FilterError> {
        self.error.as_ref()
    }
}

/// Converts a bitmap into another pixel format.
///
/// Conversions between [`PixelFormat::FULL_COLOR`] formats copy the color channels directly.
/// Conversions from a full-color format into one of the [`PixelFormat::INDEXED`] formats
/// quantize the image with [median cut](crate::median_cut) to `2^bits_per_pixel` colors
/// and store the resulting palette as the color table of the output.
/// All other combinations fail with [`FilterError::UnsupportedFormat`].
///
/// # Examples
/// ```
/// # use repixel::{Bitmap, ConvertPixelFormat, Filter, PixelFormat};
/// # fn main() -> Result<(), repixel::FilterError> {
/// let image = Bitmap::new(16, 16, PixelFormat::Argb32);
/// let rgb = ConvertPixelFormat::new(&image, PixelFormat::Rgb24).execute()?;
/// let indexed = ConvertPixelFormat::new(&rgb, PixelFormat::Indexed1).execute()?;
/// assert_eq!(indexed.palette().len(), 2);
/// # Ok(())
/// # }
/// ```
#[must_use]
#[derive(Debug, Clone, Copy)]
pub struct ConvertPixelFormat<'a> {
    /// The input bitmap.
    source: &'a Bitmap,
    /// The pixel format of the output bitmap.
    target: PixelFormat,
    /// Whether to run the conversion across multiple threads.
    #[cfg(feature = "threads")]
    parallel: bool,
}

impl<'a> ConvertPixelFormat<'a> {
    /// Creates a new conversion of `source` into the `target` pixel format.
    pub const fn new(source: &'a Bitmap, target: PixelFormat) -> Self {
        Self {
            source,
            target,
            #[cfg(feature = "threads")]
            parallel: false,
        }
    }

    /// Sets the pixel format of the output bitmap.
    pub const fn target_format(mut self, target: PixelFormat) -> Self {
        self.target = target;
        self
    }

    /// Sets whether to run the conversion in parallel across multiple threads.
    /// The output is the same either way.
    ///
    /// The default value is `false`.
    #[cfg(feature = "threads")]
    pub const fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// The pixel format of the output bitmap.
    #[must_use]
    pub const fn target(&self) -> PixelFormat {
        self.target
    }

    /// Whether the conversion should run in parallel.
    const fn is_parallel(&self) -> bool {
        #[cfg(feature = "threads")]
        {
            self.parallel
        }
        #[cfg(not(feature = "threads"))]
        {
            false
        }
    }

    /// Copies the channels of the source into a full-color bitmap.
    fn execute_full_color(&self, result: &mut Bitmap) -> Result<(), FilterError> {
        let src = self.source.lock()?;
        let mut dst = result.lock_mut();

        #[cfg(feature = "threads")]
        if self.is_parallel() {
            copy::copy_channels_par(&src, &mut dst);
            return Ok(());
        }

        copy::copy_channels(&src, &mut dst);
        Ok(())
    }

    /// Quantizes the source into an indexed bitmap.
    fn execute_indexed(&self, result: &mut Bitmap, depth: QuantizeDepth) -> Result<(), FilterError> {
        let unsupported = || FilterError::unsupported(self.source.format(), self.target);

        let src = self.source.lock()?;

        #[cfg(feature = "threads")]
        let palette = if self.is_parallel() {
            let samples = extract::samples_par(&src).ok_or_else(unsupported)?;
            median_cut::palette_par(&samples, depth)
        } else {
            let samples = extract::samples(&src).ok_or_else(unsupported)?;
            median_cut::palette(&samples, depth)
        };

        #[cfg(not(feature = "threads"))]
        let palette = {
            let samples = extract::samples(&src).ok_or_else(unsupported)?;
            median_cut::palette(&samples, depth)
        };

        drop(src);

        indexed::write_indices(&palette, &mut result.lock_mut());
        Ok(())
    }
}

impl<'a> Filter for ConvertPixelFormat<'a> {
    fn supported_formats(&self) -> &'static [PixelFormat] {
        &PixelFormat::FULL_COLOR
    }

    fn execute(&self) -> Result<Bitmap, FilterError> {
        let (source, target) = (self.source.format(), self.target);
        let span = debug_span!(
            "convert",
            width = self.source.width(),
            height = self.source.height(),
            %source,
            %target,
        );
        let _enter = span.enter();

        if !source.is_full_color() {
            return Err(FilterError::unsupported(source, target));
        }

        let mut result = Bitmap::new(self.source.width(), self.source.height(), target);

        if target.is_full_color() {
            self.execute_full_color(&mut result)?;
        } else if let Some(depth) = QuantizeDepth::for_format(target) {
            self.execute_indexed(&mut result, depth)?;
        } else {
            return Err(FilterError::unsupported(source, target));
        }

        debug!(parallel = self.is_parallel(), "converted bitmap");
        Ok(result)
    }
}

/// Inverts the color channels of a full-color bitmap.
///
/// Each of blue, green, and red is replaced with its bitwise negation, while alpha is kept.
#[must_use]
#[derive(Debug, Clone, Copy)]
pub struct Invert<'a> {
    /// The input bitmap.
    source: &'a Bitmap,
}

impl<'a> Invert<'a> {
    /// Creates a new inversion of `source`.
    pub const fn new(source: &'a Bitmap) -> Self {
        Self { source }
    }
}

impl<'a> Filter for Invert<'a> {
    fn supported_formats(&self) -> &'static [PixelFormat] {
        &PixelFormat::FULL_COLOR
    }

    fn execute(&self) -> Result<Bitmap, FilterError> {
        let format = self.source.format();
        let span = debug_span!(
            "invert",
            width = self.source.width(),
            height = self.source.height(),
            %format,
        );
        let _enter = span.enter();

        if !format.is_full_color() {
            return Err(FilterError::unsupported(format, format));
        }

        let mut result = {
            let src = self.source.lock()?;
            Bitmap::clone(&src)
        };

        copy::invert_channels(&mut result.lock_mut());
        debug!("inverted bitmap");
        Ok(result)
    }
}
