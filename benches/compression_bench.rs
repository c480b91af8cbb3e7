use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};
use img_shrink::{
    classify, encode_at_quality, encode_png_lossless, resize_to_fit, search_quality, Codec,
    QualityBounds,
};

fn gradient_rgb(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    }))
}

fn gradient_rgba(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255])
    }))
}

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");

    for size in [Small, Medium, Large].iter() {
        let (width, height) = size.dimensions();
        let img = gradient_rgba(width, height);

        // Worst case: every pixel is opaque so the whole buffer is scanned.
        group.bench_with_input(
            BenchmarkId::new("opaque_rgba", format!("{}x{}", width, height)),
            &img,
            |b, img| b.iter(|| classify(black_box(img))),
        );
    }

    group.finish();
}

fn bench_resize(c: &mut Criterion) {
    let mut group = c.benchmark_group("resize_to_fit");

    for size in [Medium, Large].iter() {
        let (width, height) = size.dimensions();
        let img = gradient_rgb(width, height);

        group.bench_with_input(
            BenchmarkId::new("half", format!("{}x{}", width, height)),
            &img,
            |b, img| {
                b.iter(|| {
                    let mut img = img.clone();
                    resize_to_fit(black_box(&mut img), (width / 2, height / 2));
                })
            },
        );
    }

    group.finish();
}

fn bench_quality_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("quality_search");
    group.sample_size(10);

    let img = gradient_rgb(800, 600);
    let rgba = gradient_rgba(800, 600);

    group.bench_function("jpeg_800x600_50kb", |b| {
        b.iter(|| {
            search_quality(
                |q| encode_at_quality(&img, Codec::Jpeg, q),
                black_box(50),
                QualityBounds::default(),
            )
        })
    });

    group.bench_function("webp_800x600_50kb", |b| {
        b.iter(|| {
            search_quality(
                |q| encode_at_quality(&rgba, Codec::WebP, q),
                black_box(50),
                QualityBounds::default(),
            )
        })
    });

    group.finish();
}

fn bench_png_lossless(c: &mut Criterion) {
    let mut group = c.benchmark_group("png_lossless");
    group.sample_size(10);

    let img = gradient_rgba(256, 256);
    group.bench_function("oxipng_256x256", |b| {
        b.iter(|| encode_png_lossless(black_box(&img)))
    });

    group.finish();
}

enum ImageSize {
    Small,
    Medium,
    Large,
}

impl ImageSize {
    fn dimensions(&self) -> (u32, u32) {
        match self {
            Small => (800, 600),
            Medium => (1920, 1080),
            Large => (3840, 2160),
        }
    }
}

use ImageSize::*;

criterion_group!(
    benches,
    bench_classify,
    bench_resize,
    bench_quality_search,
    bench_png_lossless
);
criterion_main!(benches);
