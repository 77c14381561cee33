//! A library for converting bitmaps between pixel formats, including median cut quantization
//! of full-color images down to 1, 4, and 8-bit indexed bitmaps.
//!
//! Bitmaps store their pixels row by row in DIB channel order (blue, green, red, then alpha or padding)
//! with rows aligned to 4 bytes. Indexed bitmaps pack several pixels per byte for 1 and 4-bit formats,
//! leftmost pixel in the most significant bits, and carry a color table.
//!
//! # Features
//! To reduce dependencies and compile times, `repixel` has several `cargo` features
//! that can be turned off or on:
//! - `threads`: exposes parallel versions of most functions via [`rayon`].
//! - `image`: enables integration with the [`image`] crate.
//!
//! # High-Level API
//! To get started with the high-level API, see [`ConvertPixelFormat`] and [`Command`].
//! Here is an additional example:
//! ```no_run
//! # use repixel::{Bitmap, Command, ConvertPixelFormat, PixelFormat};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let img = image::open("some image")?.into_rgba8();
//! let bitmap = Bitmap::from(&img);
//!
//! let mut command = Command::new(
//!     ConvertPixelFormat::new(&bitmap, PixelFormat::Indexed4)
//!         .parallel(true) // run across multiple threads
//! );
//! command.execute();
//!
//! if let Some(error) = command.error() {
//!     return Err(error.clone().into());
//! }
//! let quantized = command.take_result().unwrap();
//! quantized.to_rgba_image()?.save("quantized.png")?;
//! # Ok(())
//! # }
//! ```
//!
//! # Low-Level API
//! The building blocks of the conversion are exposed as well:
//! [`extract`] reads the pixels of a bitmap into [`PixelSample`]s,
//! [`median_cut`] computes a [`Palette`] from them,
//! and [`indexed`] writes that palette into an indexed bitmap.
//!
//! Note that some of the options and functions above require certain features to be enabled.

#![deny(unsafe_code, unsafe_op_in_unsafe_fn)]
#![warn(
    clippy::pedantic,
    clippy::cargo,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,
    clippy::unwrap_in_result,
    clippy::expect_used,
    clippy::unneeded_field_pattern,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unnecessary_self_imports,
    clippy::str_to_string,
    clippy::string_to_string,
    clippy::string_slice,
    missing_docs,
    clippy::missing_docs_in_private_items,
    rustdoc::all
)]
#![allow(
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::many_single_char_names,
    clippy::missing_panics_doc,
    clippy::unreadable_literal,
    clippy::wildcard_imports
)]

mod bitmap;
mod copy;
mod error;
mod filter;
mod types;

#[cfg(feature = "image")]
mod image_io;

pub mod extract;
pub mod indexed;
pub mod median_cut;

pub use bitmap::*;
pub use error::*;
pub use filter::*;
pub use types::*;

/// The maximum supported image size in number of pixels is `u32::MAX`,
/// so that every pixel has a `u32` [`PixelSample::source_index`].
pub const MAX_PIXELS: u32 = u32::MAX;

/// The maximum supported number of median cut splits is `8`, giving `256` palette colors.
pub const MAX_DEPTH: u8 = 8;
