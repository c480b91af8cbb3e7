use crate::constants::{
    DEFAULT_MAX_QUALITY, DEFAULT_MIN_QUALITY, DEFAULT_OUTPUT_SUBDIR, DEFAULT_TARGET_SIZE_KB,
};
use crate::utils::expand_tilde;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "img-shrink",
    about = "Batch-compress images toward a target file size",
    long_about = "img-shrink compresses every JPEG, PNG and WebP image in a directory toward a target size. \
                  Opaque images are written as JPEG, images with visible transparency as lossy WebP, \
                  and the highest quality that fits the size budget is found by binary search. \
                  PNG inputs can optionally be kept as losslessly optimized PNG.",
    version,
    after_help = "EXAMPLES:\n  \
    img-shrink --input ~/Pictures --size 300\n  \
    img-shrink -i ./shots -o ./shots/small --width 1920 --height 1080\n  \
    img-shrink -i ./icons --keep-png -v"
)]
pub struct Args {
    #[arg(
        short = 'i',
        long,
        help = "Input directory",
        long_help = "Directory whose .jpg, .jpeg, .png and .webp files are compressed. \
                     Subdirectories are not visited. A leading ~ is expanded."
    )]
    pub input: String,

    #[arg(
        short = 'o',
        long,
        help = "Output directory (default: <input>/compressed)",
        long_help = "Directory that receives <name>_compressed.<ext> files. \
                     Created if missing. A leading ~ is expanded."
    )]
    pub output: Option<String>,

    #[arg(
        short = 's',
        long,
        default_value_t = DEFAULT_TARGET_SIZE_KB,
        help = "Target size per file in KB",
        long_help = "Upper bound for each lossy output in kilobytes. When even the lowest \
                     quality is larger, the lowest-quality result is written anyway. \
                     Ignored for lossless PNG output."
    )]
    pub size: u64,

    #[arg(
        short = 'w',
        long,
        help = "Maximum width in pixels (needs --height)",
        long_help = "Together with --height, shrink images to fit inside the box while \
                     preserving aspect ratio. Smaller images are never enlarged."
    )]
    pub width: Option<u32>,

    #[arg(
        short = 'H',
        long,
        help = "Maximum height in pixels (needs --width)",
        long_help = "Together with --width, shrink images to fit inside the box while \
                     preserving aspect ratio. Smaller images are never enlarged."
    )]
    pub height: Option<u32>,

    #[arg(
        long,
        help = "Keep PNG inputs as lossless PNG",
        long_help = "Write PNG inputs as optimized lossless PNG instead of JPEG/WebP. \
                     The target size does not apply to these files."
    )]
    pub keep_png: bool,

    #[arg(
        long,
        default_value_t = DEFAULT_MIN_QUALITY,
        help = "Lowest quality the search may use (1-100)"
    )]
    pub min_quality: u8,

    #[arg(
        long,
        default_value_t = DEFAULT_MAX_QUALITY,
        help = "Highest quality the search may use (1-100)"
    )]
    pub max_quality: u8,

    #[arg(short = 'q', long, conflicts_with = "verbose", help = "Only print errors")]
    pub quiet: bool,

    #[arg(
        short = 'v',
        long,
        help = "Print detector verdicts and every quality attempt"
    )]
    pub verbose: bool,
}

impl Args {
    pub fn input_dir(&self) -> PathBuf {
        expand_tilde(&self.input)
    }

    pub fn output_dir(&self) -> PathBuf {
        match &self.output {
            Some(output) => expand_tilde(output),
            None => self.input_dir().join(DEFAULT_OUTPUT_SUBDIR),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["img-shrink", "--input", "/data/in"]).unwrap();
        assert_eq!(args.size, 500);
        assert_eq!(args.min_quality, 10);
        assert_eq!(args.max_quality, 95);
        assert!(!args.keep_png);
        assert_eq!(args.width, None);
        assert_eq!(args.output_dir(), PathBuf::from("/data/in/compressed"));
    }

    #[test]
    fn test_all_flags() {
        let args = Args::try_parse_from([
            "img-shrink",
            "-i",
            "in",
            "-o",
            "out",
            "--size",
            "250",
            "--width",
            "1280",
            "--height",
            "720",
            "--keep-png",
            "-v",
        ])
        .unwrap();
        assert_eq!(args.input_dir(), PathBuf::from("in"));
        assert_eq!(args.output_dir(), PathBuf::from("out"));
        assert_eq!(args.size, 250);
        assert_eq!((args.width, args.height), (Some(1280), Some(720)));
        assert!(args.keep_png);
        assert!(args.verbose);
    }

    #[test]
    fn test_input_is_required() {
        assert!(Args::try_parse_from(["img-shrink"]).is_err());
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Args::try_parse_from(["img-shrink", "-i", "in", "-q", "-v"]).is_err());
    }
}
