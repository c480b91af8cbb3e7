/// Output codecs and the policy that picks one for each input image.
///
/// Opaque images go to JPEG, images with visible transparency go to lossy
/// WebP, and PNG inputs may be kept as optimized lossless PNG on request.
use crate::opacity::Opacity;
use std::fmt;

/// Output encodings the compressor can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Codec {
    /// Lossy, no alpha channel
    Jpeg,
    /// Lossy with alpha channel
    WebP,
    /// Lossless, never target-fitted
    Png,
}

impl Codec {
    /// Returns the file extension written for this codec, without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            Codec::Jpeg => "jpg",
            Codec::WebP => "webp",
            Codec::Png => "png",
        }
    }

    /// Lossless codecs ignore quality and bypass the quality search
    pub fn is_lossless(&self) -> bool {
        matches!(self, Codec::Png)
    }

    pub fn all() -> [Codec; 3] {
        [Codec::Jpeg, Codec::WebP, Codec::Png]
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Codec::Jpeg => "JPEG",
            Codec::WebP => "WebP",
            Codec::Png => "PNG",
        };
        write!(f, "{}", name)
    }
}

/// Pick the output codec for an input file.
///
/// `input_extension` is compared case-insensitively and may carry a leading
/// dot. Every combination of inputs maps to exactly one codec.
pub fn select_codec(input_extension: &str, opacity: Opacity, keep_png: bool) -> Codec {
    let ext = input_extension.trim_start_matches('.').to_lowercase();

    if keep_png && ext == "png" {
        Codec::Png
    } else if opacity.is_opaque() {
        Codec::Jpeg
    } else {
        Codec::WebP
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codec_extension() {
        assert_eq!(Codec::Jpeg.extension(), "jpg");
        assert_eq!(Codec::WebP.extension(), "webp");
        assert_eq!(Codec::Png.extension(), "png");
    }

    #[test]
    fn test_codec_display() {
        assert_eq!(format!("{}", Codec::Jpeg), "JPEG");
        assert_eq!(format!("{}", Codec::WebP), "WebP");
        assert_eq!(format!("{}", Codec::Png), "PNG");
    }

    #[test]
    fn test_only_png_is_lossless() {
        assert!(Codec::Png.is_lossless());
        assert!(!Codec::Jpeg.is_lossless());
        assert!(!Codec::WebP.is_lossless());
    }

    #[test]
    fn test_keep_png_keeps_png_even_with_alpha() {
        assert_eq!(select_codec("png", Opacity::Transparent, true), Codec::Png);
        assert_eq!(select_codec(".PNG", Opacity::Opaque, true), Codec::Png);
    }

    #[test]
    fn test_keep_png_ignored_for_other_inputs() {
        assert_eq!(select_codec("jpg", Opacity::Opaque, true), Codec::Jpeg);
        assert_eq!(select_codec("webp", Opacity::Transparent, true), Codec::WebP);
    }

    #[test]
    fn test_opaque_goes_to_jpeg() {
        assert_eq!(select_codec("png", Opacity::Opaque, false), Codec::Jpeg);
        assert_eq!(select_codec("webp", Opacity::Opaque, false), Codec::Jpeg);
    }

    #[test]
    fn test_transparent_goes_to_webp() {
        assert_eq!(select_codec("png", Opacity::Transparent, false), Codec::WebP);
        assert_eq!(select_codec(".jpeg", Opacity::Transparent, false), Codec::WebP);
    }

    #[test]
    fn test_selection_is_total() {
        for ext in [".jpg", ".png", ".webp", ".jpeg"] {
            for opacity in [Opacity::Opaque, Opacity::Transparent] {
                for keep_png in [true, false] {
                    let codec = select_codec(ext, opacity, keep_png);
                    assert!(Codec::all().contains(&codec));
                }
            }
        }
    }
}
