pub const DEFAULT_TARGET_SIZE_KB: u64 = 500;
pub const DEFAULT_MIN_QUALITY: u8 = 10;
pub const DEFAULT_MAX_QUALITY: u8 = 95;
pub const MIN_QUALITY: u8 = 1;
pub const MAX_QUALITY: u8 = 100;

/// libwebp `method`: 0 is fastest, 6 is the slowest and smallest.
pub const WEBP_METHOD: i32 = 6;

pub const OXIPNG_PRESET: u8 = 6;
pub const LIBDEFLATER_MAX_LEVEL: u8 = 12;

/// Loader limits
pub const MAX_FILE_SIZE: u64 = 200 * 1024 * 1024;
pub const MAX_IMAGE_DIMENSION: u32 = 30_000;

pub const SUPPORTED_INPUT_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];
pub const OUTPUT_SUFFIX: &str = "_compressed";
pub const DEFAULT_OUTPUT_SUBDIR: &str = "compressed";

pub const PROGRESS_BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}";
