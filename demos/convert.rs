#![deny(unsafe_code, unsafe_op_in_unsafe_fn)]
#![warn(
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented,
    clippy::unneeded_field_pattern,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unnecessary_self_imports,
    clippy::str_to_string,
    clippy::string_to_string,
    clippy::string_slice
)]

use std::{fmt::Display, path::PathBuf};

use clap::{Parser, ValueEnum};
use repixel::{Bitmap, Command, ConvertPixelFormat, Invert, PixelFormat};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Copy, Clone, ValueEnum)]
enum CliFormat {
    Rgb24,
    Rgb32,
    Argb32,
    Indexed1,
    Indexed4,
    Indexed8,
}

impl From<CliFormat> for PixelFormat {
    fn from(value: CliFormat) -> Self {
        match value {
            CliFormat::Rgb24 => PixelFormat::Rgb24,
            CliFormat::Rgb32 => PixelFormat::Rgb32,
            CliFormat::Argb32 => PixelFormat::Argb32,
            CliFormat::Indexed1 => PixelFormat::Indexed1,
            CliFormat::Indexed4 => PixelFormat::Indexed4,
            CliFormat::Indexed8 => PixelFormat::Indexed8,
        }
    }
}

impl Display for CliFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        PixelFormat::from(*self).fmt(f)
    }
}

#[derive(Parser)]
pub struct Options {
    #[arg(short, long, default_value_t = CliFormat::Indexed8)]
    format: CliFormat,

    #[arg(long)]
    invert: bool,

    #[arg(short, long, default_value_t = 0)]
    threads: u8,

    input: PathBuf,

    output: PathBuf,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let Options { format, invert, threads, input, output } = Options::parse();

    let image = image::open(&input).unwrap().into_rgba8();
    let mut bitmap = Bitmap::from(&image);
    info!(path = %input.display(), width = bitmap.width(), height = bitmap.height(), "read image");

    if invert {
        let mut command = Command::new(Invert::new(&bitmap));
        command.execute();
        if let Some(error) = command.error() {
            panic!("{error}");
        }
        bitmap = command.take_result().unwrap();
    }

    let convert = ConvertPixelFormat::new(&bitmap, format.into()).parallel(threads != 1);
    let mut command = Command::new(convert);
    let time = std::time::Instant::now();
    match threads {
        0 | 1 => command.execute(),
        t => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(t.into())
                .build()
                .unwrap();

            pool.install(|| command.execute());
        }
    }

    if let Some(error) = command.error() {
        panic!("{error}");
    }
    info!(elapsed_ms = time.elapsed().as_millis(), %format, "converted image");

    let result = command.take_result().unwrap();
    result.to_rgba_image().unwrap().save(output).unwrap();
}
