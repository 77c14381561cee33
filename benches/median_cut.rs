#[path = "../util/util.rs"]
mod util;

use util::{bench_images, bench_images_as};

use std::time::Duration;

use criterion::{
    criterion_group, criterion_main, measurement::WallTime, Bencher, BenchmarkId, Criterion,
    SamplingMode,
};
use repixel::{
    extract, median_cut, Bitmap, ConvertPixelFormat, Filter, PixelFormat, PixelSample,
    QuantizeDepth,
};

fn bench<T>(
    c: &mut Criterion,
    group: &str,
    inputs: &[(String, T)],
    mut f: impl FnMut(&mut Bencher<WallTime>, &(QuantizeDepth, &T)),
) {
    let mut group = c.benchmark_group(group);
    group
        .sample_size(30)
        .noise_threshold(0.05)
        .sampling_mode(SamplingMode::Flat)
        .warm_up_time(Duration::from_millis(500));

    for (k, secs) in [
        (QuantizeDepth::from_clamped(1), 2),
        (QuantizeDepth::from_clamped(4), 3),
        (QuantizeDepth::MAX, 4),
    ] {
        group.measurement_time(Duration::from_secs(secs));
        for (name, input) in inputs {
            group.bench_with_input(BenchmarkId::new(k.to_string(), name), &(k, input), &mut f);
        }
    }
}

fn samples(images: &[(String, Bitmap)]) -> Vec<(String, Vec<PixelSample>)> {
    images
        .iter()
        .map(|(name, bitmap)| {
            let data = bitmap.lock().unwrap();
            (name.clone(), extract::samples(&data).unwrap())
        })
        .collect()
}

fn median_cut_palette_single(c: &mut Criterion) {
    let samples = samples(bench_images());
    bench(c, "median_cut_palette_single", &samples, |b, &(k, samples)| {
        b.iter(|| median_cut::palette(samples, k))
    })
}

fn median_cut_palette_par(c: &mut Criterion) {
    let samples = samples(bench_images());
    bench(c, "median_cut_palette_par", &samples, |b, &(k, samples)| {
        b.iter(|| median_cut::palette_par(samples, k))
    })
}

fn indexed_target(k: QuantizeDepth) -> PixelFormat {
    match k.into_inner() {
        1 => PixelFormat::Indexed1,
        4 => PixelFormat::Indexed4,
        _ => PixelFormat::Indexed8,
    }
}

fn convert_indexed_single(c: &mut Criterion) {
    let images = bench_images_as(PixelFormat::Rgb24);
    bench(c, "convert_indexed_single", &images, |b, &(k, bitmap)| {
        b.iter(|| {
            ConvertPixelFormat::new(bitmap, indexed_target(k))
                .execute()
                .unwrap()
        })
    })
}

fn convert_indexed_par(c: &mut Criterion) {
    let images = bench_images_as(PixelFormat::Rgb24);
    bench(c, "convert_indexed_par", &images, |b, &(k, bitmap)| {
        b.iter(|| {
            ConvertPixelFormat::new(bitmap, indexed_target(k))
                .parallel(true)
                .execute()
                .unwrap()
        })
    })
}

fn convert_full_color(c: &mut Criterion) {
    let mut group = c.benchmark_group("convert_full_color");
    group.sample_size(30).warm_up_time(Duration::from_millis(500));

    for (name, bitmap) in bench_images() {
        for target in [PixelFormat::Rgb24, PixelFormat::Rgb32] {
            group.bench_with_input(BenchmarkId::new(target.to_string(), name), bitmap, |b, bitmap| {
                b.iter(|| ConvertPixelFormat::new(bitmap, target).execute().unwrap())
            });
            group.bench_with_input(
                BenchmarkId::new(format!("{target}_par"), name),
                bitmap,
                |b, bitmap| {
                    b.iter(|| {
                        ConvertPixelFormat::new(bitmap, target)
                            .parallel(true)
                            .execute()
                            .unwrap()
                    })
                },
            );
        }
    }
}

criterion_group!(
    benches,
    median_cut_palette_single,
    median_cut_palette_par,
    convert_indexed_single,
    convert_indexed_par,
    convert_full_color,
);
criterion_main!(benches);
