use crate::batch::generate_output_path;
use crate::constants::{
    DEFAULT_TARGET_SIZE_KB, LIBDEFLATER_MAX_LEVEL, MAX_FILE_SIZE, MAX_IMAGE_DIMENSION,
    OXIPNG_PRESET, WEBP_METHOD,
};
use crate::error::{CompressionError, Result};
use crate::formats::{select_codec, Codec};
use crate::opacity::{alpha_extrema, classify_with_origin, has_alpha_channel, AlphaOrigin};
use crate::search::{search, QualityBounds};
use crate::{verbose, warn};
use image::{DynamicImage, ImageDecoder, ImageFormat, ImageReader, RgbImage, RgbaImage};
use mozjpeg::{ColorSpace, Compress};
use oxipng::{Deflaters, Options};
use std::borrow::Cow;
use std::fs;
use std::io::{BufReader, Cursor, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionOptions {
    /// Size budget per output file, in kilobytes
    pub target_kb: u64,
    /// Bounding box for fit-within resizing
    pub max_dimensions: Option<(u32, u32)>,
    /// Keep PNG inputs as lossless PNG
    pub keep_png: bool,
    pub quality: QualityBounds,
}

impl CompressionOptions {
    pub fn new(
        target_kb: u64,
        width: Option<u32>,
        height: Option<u32>,
        keep_png: bool,
        min_quality: u8,
        max_quality: u8,
    ) -> Result<Self> {
        if target_kb == 0 {
            return Err(CompressionError::InvalidTargetSize(target_kb));
        }
        let quality = QualityBounds::new(min_quality, max_quality)?;

        let max_dimensions = match (width.filter(|&w| w > 0), height.filter(|&h| h > 0)) {
            (Some(w), Some(h)) => Some((w, h)),
            (None, None) => None,
            _ => {
                warn!("--width and --height must be given together; resizing is disabled");
                None
            }
        };

        Ok(Self {
            target_kb,
            max_dimensions,
            keep_png,
            quality,
        })
    }
}

impl Default for CompressionOptions {
    fn default() -> Self {
        Self {
            target_kb: DEFAULT_TARGET_SIZE_KB,
            max_dimensions: None,
            keep_png: false,
            quality: QualityBounds::default(),
        }
    }
}

/// Outcome of compressing one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub codec: Codec,
    /// `None` for lossless output
    pub quality: Option<u8>,
    pub original_size: u64,
    pub compressed_size: u64,
    pub within_target: bool,
}

/// Validates that a file exists at the given path.
///
/// # Example
/// ```
/// use std::path::Path;
/// use img_shrink::validate_file_exists;
///
/// let result = validate_file_exists(Path::new("nonexistent.jpg"));
/// assert!(result.is_err());
/// ```
pub fn validate_file_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(CompressionError::FileNotFound(path.to_path_buf()));
    }
    Ok(())
}

/// Compress one image into `output_dir`:
/// load -> resize -> classify -> select codec -> search or lossless -> write
///
/// # Returns
/// * `Ok(FileReport)` - What was written and how
/// * `Err(CompressionError)` - Any failure for this file; nothing is left
///   at the output path when writing fails
pub fn process_image_pipeline(
    input_path: &Path,
    output_dir: &Path,
    options: &CompressionOptions,
) -> Result<FileReport> {
    let (mut img, original_size) = load_image_with_metadata(input_path)?;

    if let Some(bounds) = options.max_dimensions {
        resize_to_fit(&mut img, bounds);
    }

    let extension = input_path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();
    let origin = match alpha_origin(input_path) {
        Ok(origin) => origin,
        Err(e) => {
            verbose!("Could not read the PNG header of {:?}: {}", input_path, e);
            AlphaOrigin::Channel
        }
    };
    let opacity = classify_with_origin(&img, origin);
    let codec = select_codec(extension, opacity, options.keep_png);

    verbose!(
        "[detector] opaque={}, layout={:?}, origin={:?}, has_alpha={}, alpha_range={:?}, keep_png={} -> {}",
        opacity.is_opaque(),
        img.color(),
        origin,
        has_alpha_channel(&img),
        alpha_extrema(&img),
        options.keep_png,
        codec
    );

    let output_path = generate_output_path(input_path, output_dir, codec)?;
    let budget = options.target_kb.saturating_mul(1024);

    let (data, quality, within_target) = if codec.is_lossless() {
        let data = encode_png_lossless(&img)?;
        let within_target = data.len() as u64 <= budget;
        (data, None, within_target)
    } else {
        let result = search(&img, codec, options.target_kb, options.quality)?;
        verbose!(
            "Quality search settled on Q={} after {} encodes",
            result.candidate.quality,
            result.attempts
        );
        (
            result.candidate.data,
            Some(result.candidate.quality),
            result.within_target,
        )
    };

    write_output(&output_path, &data)?;

    Ok(FileReport {
        input: input_path.to_path_buf(),
        output: output_path,
        codec,
        quality,
        original_size,
        compressed_size: data.len() as u64,
        within_target,
    })
}

/// Loads an image file, applies its EXIF orientation and returns it along
/// with the file size in bytes.
///
/// # Security Features
/// - Enforces a maximum file size before decoding
/// - Rejects images whose header declares dimensions above the limit,
///   before any pixel buffer is allocated
///
/// A missing or unreadable orientation tag is ignored.
pub fn load_image_with_metadata(input_path: &Path) -> Result<(DynamicImage, u64)> {
    validate_file_exists(input_path)?;

    let file_size = fs::metadata(input_path)?.len();
    if file_size > MAX_FILE_SIZE {
        return Err(CompressionError::FileTooLarge(file_size, MAX_FILE_SIZE));
    }

    let mut decoder = ImageReader::open(input_path)?
        .with_guessed_format()?
        .into_decoder()?;

    let (width, height) = decoder.dimensions();
    if width > MAX_IMAGE_DIMENSION || height > MAX_IMAGE_DIMENSION {
        return Err(CompressionError::InvalidDimensions(
            width,
            height,
            MAX_IMAGE_DIMENSION,
        ));
    }

    let orientation = decoder.orientation();
    let mut img = DynamicImage::from_decoder(decoder)?;
    match orientation {
        Ok(orientation) => img.apply_orientation(orientation),
        Err(e) => verbose!("Ignoring EXIF orientation of {:?}: {}", input_path, e),
    }

    Ok((img, file_size))
}

/// Where the alpha of `input_path` comes from, judged from the stored PNG
/// header. Files that are not PNG report [`AlphaOrigin::Channel`].
pub fn alpha_origin(input_path: &Path) -> Result<AlphaOrigin> {
    let format = ImageReader::open(input_path)?
        .with_guessed_format()?
        .format();
    if format != Some(ImageFormat::Png) {
        return Ok(AlphaOrigin::Channel);
    }

    let decoder = png::Decoder::new(BufReader::new(fs::File::open(input_path)?));
    let reader = decoder
        .read_info()
        .map_err(|e| CompressionError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;
    let info = reader.info();

    let origin = match info.color_type {
        png::ColorType::Indexed => AlphaOrigin::Palette,
        png::ColorType::Rgb | png::ColorType::Grayscale if info.trns.is_some() => {
            AlphaOrigin::ColorKey
        }
        _ => AlphaOrigin::Channel,
    };
    Ok(origin)
}

/// Shrink `img` to fit within `(max_width, max_height)`, keeping its aspect
/// ratio. Images already inside the box are left alone.
///
/// Returns whether the image was resized.
pub fn resize_to_fit(img: &mut DynamicImage, (max_width, max_height): (u32, u32)) -> bool {
    if img.width() <= max_width && img.height() <= max_height {
        return false;
    }

    let (old_width, old_height) = (img.width(), img.height());
    *img = img.resize(max_width, max_height, image::imageops::FilterType::Lanczos3);
    verbose!(
        "🔄 Resized {}x{} -> {}x{}",
        old_width,
        old_height,
        img.width(),
        img.height()
    );
    true
}

/// Encode `img` with a lossy codec at `quality`.
pub fn encode_at_quality(img: &DynamicImage, codec: Codec, quality: u8) -> Result<Vec<u8>> {
    match codec {
        Codec::Jpeg => encode_jpeg(img, quality),
        Codec::WebP => encode_webp(img, quality),
        Codec::Png => Err(CompressionError::CodecContract(codec)),
    }
}

/// Progressive JPEG: RGB only, 4:2:0 chroma subsampling and
/// optimized Huffman tables.
pub fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let rgb: Cow<'_, RgbImage> = match img {
        DynamicImage::ImageRgb8(rgb) => Cow::Borrowed(rgb),
        _ => Cow::Owned(img.to_rgb8()),
    };
    let (width, height) = rgb.dimensions();
    if width == 0 || height == 0 {
        return Err(CompressionError::JpegEncoding(format!(
            "cannot encode a {}x{} image",
            width, height
        )));
    }

    let mut comp = Compress::new(ColorSpace::JCS_RGB);
    comp.set_size(width as usize, height as usize);
    comp.set_color_space(ColorSpace::JCS_YCbCr);
    comp.set_quality(f32::from(quality));
    comp.set_chroma_sampling_pixel_sizes((2, 2), (2, 2));
    comp.set_progressive_mode();
    comp.set_optimize_coding(true);

    let mut started = comp
        .start_compress(Vec::new())
        .map_err(|e| CompressionError::JpegEncoding(e.to_string()))?;
    started
        .write_scanlines(rgb.as_raw())
        .map_err(|e| CompressionError::JpegEncoding(e.to_string()))?;
    started
        .finish()
        .map_err(|e| CompressionError::JpegEncoding(e.to_string()))
}

/// Lossy WebP that keeps the alpha channel, at maximum compression effort.
pub fn encode_webp(img: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let rgba: Cow<'_, RgbaImage> = match img {
        DynamicImage::ImageRgba8(rgba) => Cow::Borrowed(rgba),
        _ => Cow::Owned(img.to_rgba8()),
    };
    let (width, height) = rgba.dimensions();

    let mut config = webp::WebPConfig::new()
        .map_err(|_| CompressionError::WebPEncoding("failed to create WebPConfig".to_string()))?;
    config.lossless = 0;
    config.quality = f32::from(quality);
    config.method = WEBP_METHOD;

    let encoded = webp::Encoder::from_rgba(rgba.as_raw(), width, height)
        .encode_advanced(&config)
        .map_err(|e| CompressionError::WebPEncoding(format!("{:?}", e)))?;

    Ok(encoded.to_vec())
}

/// Lossless PNG squeezed by oxipng at its highest preset. Takes no quality.
pub fn encode_png_lossless(img: &DynamicImage) -> Result<Vec<u8>> {
    let mut raw = Vec::new();
    img.write_to(&mut Cursor::new(&mut raw), ImageFormat::Png)?;

    let mut oxipng_options = Options::from_preset(OXIPNG_PRESET);
    oxipng_options.deflate = Deflaters::Libdeflater {
        compression: LIBDEFLATER_MAX_LEVEL,
    };

    oxipng::optimize_from_memory(&raw, &oxipng_options)
        .map_err(|e| CompressionError::PngOptimization(e.to_string()))
}

/// Write `data` to `output_path` through a sibling temporary file that is
/// renamed into place once complete.
pub fn write_output(output_path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)
            .map_err(|_| CompressionError::DirectoryCreationFailed(parent.to_path_buf()))?;
    }

    let file_name = output_path
        .file_name()
        .ok_or_else(|| CompressionError::InvalidFileName(output_path.to_path_buf()))?;
    let mut partial_name = std::ffi::OsString::from(".");
    partial_name.push(file_name);
    partial_name.push(".partial");
    let partial_path = output_path.with_file_name(partial_name);

    // Removes the partial file on every early return.
    struct PartialFileGuard {
        path: PathBuf,
        armed: bool,
    }
    impl Drop for PartialFileGuard {
        fn drop(&mut self) {
            if self.armed {
                let _ = fs::remove_file(&self.path);
            }
        }
    }
    let mut guard = PartialFileGuard {
        path: partial_path.clone(),
        armed: true,
    };

    let mut file = fs::File::create(&partial_path)?;
    file.write_all(data)?;
    file.sync_all()?;
    drop(file);

    fs::rename(&partial_path, output_path)?;
    guard.armed = false;

    Ok(())
}
