#![allow(dead_code)]

use image::{Rgb, RgbImage, Rgba, RgbaImage};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Fully opaque RGB PNG with a smooth gradient.
pub fn write_opaque_png(path: &Path, width: u32, height: u32) {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    })
    .save(path)
    .unwrap();
}

/// RGBA PNG, alpha 255 everywhere except one pixel set to `alpha`.
pub fn write_png_with_alpha_pixel(path: &Path, width: u32, height: u32, alpha: u8) {
    let mut img = RgbaImage::from_pixel(width, height, Rgba([20, 140, 220, 255]));
    img.put_pixel(width / 2, height / 2, Rgba([20, 140, 220, alpha]));
    img.save(path).unwrap();
}

/// Two-colour palette PNG. Pixels alternate between index 0 and `second_index`.
/// With `trns`, index 0 is opaque and index 1 fully transparent.
pub fn write_indexed_png(path: &Path, width: u32, height: u32, second_index: u8, trns: bool) {
    let writer = BufWriter::new(File::create(path).unwrap());
    let mut encoder = png::Encoder::new(writer, width, height);
    encoder.set_color(png::ColorType::Indexed);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_palette(vec![255u8, 0, 0, 0, 0, 255]);
    if trns {
        encoder.set_trns(vec![255u8, 0]);
    }

    let data: Vec<u8> = (0..width * height)
        .map(|i| if i % 2 == 0 { 0 } else { second_index })
        .collect();

    let mut png_writer = encoder.write_header().unwrap();
    png_writer.write_image_data(&data).unwrap();
}

/// Pseudo-random RGB noise; compresses badly at any quality.
pub fn write_noise_jpeg(path: &Path, width: u32, height: u32) {
    let mut state: u32 = 0x1234_5678;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        (state & 0xFF) as u8
    };
    let mut img = RgbImage::new(width, height);
    for pixel in img.pixels_mut() {
        *pixel = Rgb([next(), next(), next()]);
    }
    img.save(path).unwrap();
}

/// RGB PNG whose `tRNS` chunk makes black the transparent colour key.
/// Pixel (0, 0) is black, the rest are grey.
pub fn write_color_keyed_rgb_png(path: &Path, width: u32, height: u32) {
    let writer = BufWriter::new(File::create(path).unwrap());
    let mut encoder = png::Encoder::new(writer, width, height);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_trns(vec![0u8, 0, 0, 0, 0, 0]);

    let mut data = vec![128u8; (width * height * 3) as usize];
    data[..3].copy_from_slice(&[0, 0, 0]);

    let mut png_writer = encoder.write_header().unwrap();
    png_writer.write_image_data(&data).unwrap();
}

/// Grayscale PNG with luma 0 as the transparent colour key.
/// Pixel (0, 0) is black, the rest are grey.
pub fn write_color_keyed_gray_png(path: &Path, width: u32, height: u32) {
    let writer = BufWriter::new(File::create(path).unwrap());
    let mut encoder = png::Encoder::new(writer, width, height);
    encoder.set_color(png::ColorType::Grayscale);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_trns(vec![0u8, 0]);

    let mut data = vec![128u8; (width * height) as usize];
    data[0] = 0;

    let mut png_writer = encoder.write_header().unwrap();
    png_writer.write_image_data(&data).unwrap();
}
