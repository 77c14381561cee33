#![allow(dead_code)]

use std::{
    path::{Path, PathBuf},
    sync::OnceLock,
};

use repixel::{Bitmap, PixelFormat};

pub fn load_images(images: &[PathBuf]) -> Vec<(String, Bitmap)> {
    images
        .iter()
        .map(|path| {
            image::open(path).map(|image| {
                (
                    path.file_name().unwrap().to_owned().into_string().unwrap(),
                    Bitmap::from(&image.into_rgba8()),
                )
            })
        })
        .collect::<Result<_, _>>()
        .expect("loaded each image")
}

pub fn load_image_dir(dir: impl AsRef<Path>) -> Vec<(String, Bitmap)> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut paths = entries
        .collect::<Result<Vec<_>, _>>()
        .expect("read each file")
        .iter()
        .map(std::fs::DirEntry::path)
        .collect::<Vec<_>>();

    paths.sort();

    load_images(&paths)
}

/// A gradient with some high frequency noise, stored as `Argb32`.
pub fn synthetic_image(width: u32, height: u32) -> Bitmap {
    let image = image::RgbaImage::from_fn(width, height, |x, y| {
        let noise = (x.wrapping_mul(7919) ^ y.wrapping_mul(104_729)) % 32;
        image::Rgba([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            ((x + y) % 256) as u8 ^ noise as u8,
            255,
        ])
    });
    Bitmap::from(&image)
}

pub const BENCH_DIR: &str = "img/bench";

static BENCH_IMAGES: OnceLock<Vec<(String, Bitmap)>> = OnceLock::new();

/// The images in [`BENCH_DIR`], or a few synthetic images if the directory is missing.
pub fn bench_images() -> &'static [(String, Bitmap)] {
    BENCH_IMAGES.get_or_init(|| {
        let images = load_image_dir(BENCH_DIR);
        if images.is_empty() {
            [(256, 256), (1024, 768), (1920, 1080)]
                .into_iter()
                .map(|(w, h)| (format!("synthetic_{w}x{h}"), synthetic_image(w, h)))
                .collect()
        } else {
            images
        }
    })
}

/// The bench images converted to the given full-color format.
pub fn bench_images_as(format: PixelFormat) -> Vec<(String, Bitmap)> {
    use repixel::{ConvertPixelFormat, Filter};

    bench_images()
        .iter()
        .map(|(name, bitmap)| {
            let converted = ConvertPixelFormat::new(bitmap, format)
                .execute()
                .expect("full-color conversion");
            (name.clone(), converted)
        })
        .collect()
}
