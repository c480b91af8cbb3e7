pub mod batch;
pub mod cli;
pub mod constants;
pub mod error;
pub mod formats;
pub mod logger;
pub mod opacity;
pub mod processing;
pub mod search;
pub mod utils;

pub use batch::{batch_compress_images, collect_image_files, generate_output_path, BatchSummary};
pub use error::{CompressionError, Result};
pub use formats::{select_codec, Codec};
pub use opacity::{
    alpha_extrema, classify, classify_with_origin, has_alpha_channel, AlphaOrigin, Opacity,
};
pub use processing::{
    alpha_origin, encode_at_quality, encode_png_lossless, load_image_with_metadata,
    process_image_pipeline, resize_to_fit, validate_file_exists, CompressionOptions, FileReport,
};
pub use search::{search, search_quality, Candidate, QualityBounds, SearchResult};
pub use utils::is_image_file;
