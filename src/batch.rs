use crate::constants::{OUTPUT_SUFFIX, PROGRESS_BAR_TEMPLATE};
use crate::error::{CompressionError, Result};
use crate::formats::Codec;
use crate::logger;
use crate::processing::{process_image_pipeline, CompressionOptions, FileReport};
use crate::utils::{calculate_compression_ratio, format_file_size, is_image_file};
use crate::{info, warn};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use walkdir::WalkDir;

/// Collected outcome of one batch run
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub reports: Vec<FileReport>,
    /// Input path and error message for every file that failed
    pub failures: Vec<(PathBuf, String)>,
    /// Output paths written more than once in this batch
    pub collisions: Vec<PathBuf>,
    pub elapsed: Duration,
}

impl BatchSummary {
    pub fn processed_count(&self) -> usize {
        self.reports.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failures.len()
    }

    pub fn total_original_size(&self) -> u64 {
        self.reports.iter().map(|r| r.original_size).sum()
    }

    pub fn total_compressed_size(&self) -> u64 {
        self.reports.iter().map(|r| r.compressed_size).sum()
    }
}

/// Detaches the progress bar from the logger however the batch ends.
struct ProgressGuard(ProgressBar);

impl Drop for ProgressGuard {
    fn drop(&mut self) {
        if !self.0.is_finished() {
            self.0.abandon();
        }
        logger::detach_progress();
    }
}

/// Compress every supported image directly inside `input_dir` into
/// `output_dir`, one file at a time.
///
/// A failing file is logged and recorded in the summary; the remaining
/// files are still processed. Only a codec contract violation stops the
/// batch early.
pub fn batch_compress_images(
    input_dir: &Path,
    output_dir: &Path,
    options: &CompressionOptions,
) -> Result<BatchSummary> {
    info!("🚀 Starting batch compression...");
    info!("📁 Input: {:?}", input_dir);
    info!("📁 Output: {:?}", output_dir);
    info!("🎯 Target size: {} KB", options.target_kb);

    let start_time = Instant::now();

    if !input_dir.exists() {
        return Err(CompressionError::FileNotFound(input_dir.to_path_buf()));
    }
    if !input_dir.is_dir() {
        return Err(CompressionError::NotADirectory(input_dir.to_path_buf()));
    }

    fs::create_dir_all(output_dir)
        .map_err(|_| CompressionError::DirectoryCreationFailed(output_dir.to_path_buf()))?;

    let image_files = collect_image_files(input_dir)?;
    let total_files = image_files.len();

    let mut summary = BatchSummary::default();

    if total_files == 0 {
        warn!("No compressible images found in {:?}", input_dir);
        summary.elapsed = start_time.elapsed();
        return Ok(summary);
    }

    info!("📊 Found {} image files to process", total_files);

    let progress = if logger::is_quiet() {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(total_files as u64);
        if let Ok(style) = ProgressStyle::default_bar().template(PROGRESS_BAR_TEMPLATE) {
            bar.set_style(style.progress_chars("#>-"));
        }
        bar
    };
    logger::attach_progress(&progress);
    let progress = ProgressGuard(progress);

    let mut written = HashSet::new();

    for input_path in &image_files {
        let name = display_name(input_path);
        progress.0.set_message(name.clone());

        match process_image_pipeline(input_path, output_dir, options) {
            Ok(report) => {
                if !written.insert(report.output.clone()) {
                    warn!(
                        "{} overwrote an earlier output at {:?}",
                        name, report.output
                    );
                    summary.collisions.push(report.output.clone());
                }
                print_file_report(&report);
                summary.reports.push(report);
            }
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                crate::error!("{} failed to compress: {}", name, e);
                summary.failures.push((input_path.clone(), e.to_string()));
            }
        }

        progress.0.inc(1);
    }

    progress.0.finish_with_message("✅ Batch compression complete");
    drop(progress);

    summary.elapsed = start_time.elapsed();
    print_summary(&summary);

    Ok(summary)
}

/// List supported images directly inside `input_dir`, sorted by file name.
/// Subdirectories are not descended into.
pub fn collect_image_files(input_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut image_files = Vec::new();

    let walker = WalkDir::new(input_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry?;
        let path = entry.path();

        if path.is_file() && is_image_file(path) {
            image_files.push(path.to_path_buf());
        }
    }

    Ok(image_files)
}

/// `<output_dir>/<input stem>_compressed.<codec extension>`
pub fn generate_output_path(input_path: &Path, output_dir: &Path, codec: Codec) -> Result<PathBuf> {
    let file_stem = input_path
        .file_stem()
        .ok_or_else(|| CompressionError::InvalidFileName(input_path.to_path_buf()))?;

    let output_filename = format!(
        "{}{}.{}",
        file_stem.to_string_lossy(),
        OUTPUT_SUFFIX,
        codec.extension()
    );
    Ok(output_dir.join(output_filename))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn print_file_report(report: &FileReport) {
    let name = report
        .input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let size_kb = report.compressed_size as f64 / 1024.0;

    match report.quality {
        Some(quality) => {
            info!(
                "✅ {} -> {:.2}KB (Q={}, fmt={})",
                name, size_kb, quality, report.codec
            );
            if !report.within_target {
                warn!(
                    "{} is still above the target at the lowest quality (Q={})",
                    name, quality
                );
            }
        }
        None => info!("✅ {} -> {:.2}KB (fmt={}, lossless)", name, size_kb, report.codec),
    }
}

fn print_summary(summary: &BatchSummary) {
    let total_before = summary.total_original_size();
    let total_after = summary.total_compressed_size();
    let elapsed = summary.elapsed;

    info!("\n📊 Batch Compression Summary:");
    info!("  📁 Total files processed: {}", summary.processed_count());
    info!("  📊 Total original size: {}", format_file_size(total_before));
    info!("  📊 Total compressed size: {}", format_file_size(total_after));
    info!(
        "  🎯 Overall compression ratio: {:.1}%",
        calculate_compression_ratio(total_before, total_after)
    );
    info!("  ⏱️  Total time: {:?}", elapsed);
    if elapsed.as_secs_f64() > 0.0 {
        info!(
            "  ⚡ Average speed: {:.2} files/second",
            summary.processed_count() as f64 / elapsed.as_secs_f64()
        );
    }

    if summary.failed_count() > 0 {
        info!("  ⚠️  Failed files: {}", summary.failed_count());
    }
    if !summary.collisions.is_empty() {
        info!("  ⚠️  Overwritten outputs: {}", summary.collisions.len());
    }
}
