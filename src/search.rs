//! Binary search for the highest encoder quality that fits a size budget.
//!
//! The search assumes encoded size does not grow as quality drops. Encoders
//! do not promise this for every image; when it fails the search still
//! terminates but may miss a fitting quality.

use crate::constants::{DEFAULT_MAX_QUALITY, DEFAULT_MIN_QUALITY, MAX_QUALITY, MIN_QUALITY};
use crate::error::{CompressionError, Result};
use crate::formats::Codec;
use crate::processing::encode_at_quality;
use crate::utils::format_file_size;
use crate::verbose;
use image::DynamicImage;

/// Inclusive range of quality levels the search may try
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualityBounds {
    pub min: u8,
    pub max: u8,
}

impl QualityBounds {
    pub fn new(min: u8, max: u8) -> Result<Self> {
        for quality in [min, max] {
            if !(MIN_QUALITY..=MAX_QUALITY).contains(&quality) {
                return Err(CompressionError::InvalidQuality(quality));
            }
        }
        if min > max {
            return Err(CompressionError::InvalidQualityRange(min, max));
        }
        Ok(Self { min, max })
    }

    /// Number of quality levels in the range
    pub fn levels(&self) -> u32 {
        u32::from(self.max - self.min) + 1
    }
}

impl Default for QualityBounds {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_QUALITY,
            max: DEFAULT_MAX_QUALITY,
        }
    }
}

/// One encode attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub data: Vec<u8>,
    pub quality: u8,
}

impl Candidate {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn size_kb(&self) -> f64 {
        self.data.len() as f64 / 1024.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub candidate: Candidate,
    /// False when even the lowest quality exceeded the budget
    pub within_target: bool,
    /// Encoder calls made
    pub attempts: u32,
}

/// Search `bounds` for the largest quality whose output is at most
/// `target_kb` kilobytes.
///
/// When nothing fits, the candidate at the lowest quality reached
/// (`bounds.min`) is returned with `within_target == false`. Encoder errors
/// abort the search.
pub fn search_quality<F>(mut encode: F, target_kb: u64, bounds: QualityBounds) -> Result<SearchResult>
where
    F: FnMut(u8) -> Result<Vec<u8>>,
{
    let budget = target_kb.saturating_mul(1024);
    let mut lo = i32::from(bounds.min);
    let mut hi = i32::from(bounds.max);
    let mut best: Option<Candidate> = None;
    // Lowest quality that overshot; reused for the fallback.
    let mut floor: Option<Candidate> = None;
    let mut attempts = 0;

    while lo <= hi {
        let mid = (lo + hi) / 2;
        let quality = mid as u8;
        let data = encode(quality)?;
        attempts += 1;

        let fits = data.len() as u64 <= budget;
        verbose!(
            "Q={} -> {} ({})",
            quality,
            format_file_size(data.len() as u64),
            if fits { "fits" } else { "over budget" }
        );

        let candidate = Candidate { data, quality };
        if fits {
            best = Some(candidate);
            lo = mid + 1;
        } else {
            floor = Some(candidate);
            hi = mid - 1;
        }
    }

    if let Some(candidate) = best {
        return Ok(SearchResult {
            candidate,
            within_target: true,
            attempts,
        });
    }

    let fallback = hi.max(i32::from(bounds.min)) as u8;
    let candidate = match floor {
        Some(candidate) if candidate.quality == fallback => candidate,
        _ => {
            attempts += 1;
            Candidate {
                data: encode(fallback)?,
                quality: fallback,
            }
        }
    };

    Ok(SearchResult {
        candidate,
        within_target: false,
        attempts,
    })
}

/// Run the quality search for `img` with a lossy `codec`.
///
/// Lossless codecs have no quality parameter; handing one in is a caller
/// bug and yields [`CompressionError::CodecContract`].
pub fn search(
    img: &DynamicImage,
    codec: Codec,
    target_kb: u64,
    bounds: QualityBounds,
) -> Result<SearchResult> {
    if codec.is_lossless() {
        return Err(CompressionError::CodecContract(codec));
    }
    search_quality(|quality| encode_at_quality(img, codec, quality), target_kb, bounds)
}
