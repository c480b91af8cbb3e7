use anyhow::{Context, Result};
use clap::Parser;
use img_shrink::cli::Args;
use img_shrink::{batch_compress_images, logger, CompressionOptions};

fn main() -> Result<()> {
    let args = Args::parse();
    logger::init(args.quiet, args.verbose);

    let options = CompressionOptions::new(
        args.size,
        args.width,
        args.height,
        args.keep_png,
        args.min_quality,
        args.max_quality,
    )
    .context("Invalid compression options")?;

    let input_dir = args.input_dir();
    let output_dir = args.output_dir();

    batch_compress_images(&input_dir, &output_dir, &options)
        .with_context(|| format!("Batch compression of {:?} failed", input_dir))?;

    Ok(())
}
