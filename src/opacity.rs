//! Effective opacity of decoded images.
//!
//! An image counts as opaque when it *looks* opaque: an alpha channel whose
//! every sample is at the channel maximum does not make an image
//! transparent. Palette images are expanded by the decoder, so a palette
//! with a `tRNS` entry shows up here as an alpha-bearing layout and a
//! palette without one as plain RGB or luma.

use image::{DynamicImage, ImageBuffer, Pixel, Primitive};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opacity {
    /// Safe to encode without an alpha channel
    Opaque,
    /// At least one pixel is not fully opaque
    Transparent,
}

impl Opacity {
    pub fn is_opaque(&self) -> bool {
        matches!(self, Opacity::Opaque)
    }
}

/// Classify `img` by scanning the alpha of every pixel.
///
/// Layouts without an alpha channel are opaque without looking at pixels.
pub fn classify(img: &DynamicImage) -> Opacity {
    let opaque = match img {
        DynamicImage::ImageLumaA8(buf) => is_fully_opaque(buf),
        DynamicImage::ImageRgba8(buf) => is_fully_opaque(buf),
        DynamicImage::ImageLumaA16(buf) => is_fully_opaque(buf),
        DynamicImage::ImageRgba16(buf) => is_fully_opaque(buf),
        DynamicImage::ImageRgba32F(buf) => is_fully_opaque(buf),
        _ => true,
    };

    if opaque {
        Opacity::Opaque
    } else {
        Opacity::Transparent
    }
}

/// Where the alpha of a decoded image came from in the source file.
///
/// The decoder expands both palette transparency and `tRNS` colour keys
/// into a real alpha channel, so the decoded layout alone cannot tell
/// them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlphaOrigin {
    /// Stored alpha channel, or a format whose decoded layout is authoritative
    Channel,
    /// Palette with a transparency table
    Palette,
    /// RGB or grayscale PNG with a single transparent colour key
    ColorKey,
}

/// [`classify`], except that a colour-keyed RGB or grayscale source is
/// opaque whatever its expanded alpha holds. Only stored alpha channels and
/// palette transparency make an image transparent.
pub fn classify_with_origin(img: &DynamicImage, origin: AlphaOrigin) -> Opacity {
    match origin {
        AlphaOrigin::ColorKey => Opacity::Opaque,
        AlphaOrigin::Channel | AlphaOrigin::Palette => classify(img),
    }
}

/// Whether the pixel layout carries alpha, regardless of the values in it.
pub fn has_alpha_channel(img: &DynamicImage) -> bool {
    img.color().has_alpha()
}

/// Minimum and maximum alpha, scaled to `0.0..=1.0`.
///
/// `None` when the layout has no alpha channel or the image has no pixels.
pub fn alpha_extrema(img: &DynamicImage) -> Option<(f32, f32)> {
    match img {
        DynamicImage::ImageLumaA8(buf) => {
            raw_alpha_extrema(buf).map(|(lo, hi)| (lo as f32 / 255.0, hi as f32 / 255.0))
        }
        DynamicImage::ImageRgba8(buf) => {
            raw_alpha_extrema(buf).map(|(lo, hi)| (lo as f32 / 255.0, hi as f32 / 255.0))
        }
        DynamicImage::ImageLumaA16(buf) => {
            raw_alpha_extrema(buf).map(|(lo, hi)| (lo as f32 / 65535.0, hi as f32 / 65535.0))
        }
        DynamicImage::ImageRgba16(buf) => {
            raw_alpha_extrema(buf).map(|(lo, hi)| (lo as f32 / 65535.0, hi as f32 / 65535.0))
        }
        DynamicImage::ImageRgba32F(buf) => raw_alpha_extrema(buf),
        _ => None,
    }
}

fn is_fully_opaque<P: Pixel>(buf: &ImageBuffer<P, Vec<P::Subpixel>>) -> bool {
    let max = <P::Subpixel as Primitive>::DEFAULT_MAX_VALUE;
    match raw_alpha_extrema(buf) {
        Some((lo, hi)) => lo == max && hi == max,
        None => true,
    }
}

// Alpha is the last channel of every alpha-bearing layout.
fn raw_alpha_extrema<P: Pixel>(
    buf: &ImageBuffer<P, Vec<P::Subpixel>>,
) -> Option<(P::Subpixel, P::Subpixel)> {
    let mut alphas = buf.pixels().filter_map(|p| p.channels().last().copied());
    let first = alphas.next()?;
    Some(alphas.fold((first, first), |(lo, hi), a| {
        (if a < lo { a } else { lo }, if a > hi { a } else { hi })
    }))
}
