//! Tag classification of segment transformations
//!
//! **Purpose:** Break evaluation results down by how the query was derived
//! from the reference (pitch/tempo/speed change, filters, noise, merges).
//!
//! Pitch and tempo are bucketed into `exact`, `small`, `medium` and `large`
//! by two relative-quality thresholds. The threshold bands are converted
//! once into cents and percent and kept in [`THRESHOLDS`].

use crate::fields::NOISE_TYPE_SAMPLE;
use crate::segment::Transform;
use once_cell::sync::Lazy;
use std::collections::BTreeSet;

/// Sorted, de-duplicated set of tags
pub type TagSet = BTreeSet<String>;

/// Tag of the single global result row
pub const TOTAL_TAG: &str = "TOTAL";

/// Relative quality still considered a small modification
pub const THRESHOLD_SMALL: f64 = 1.0 - 0.07;

/// Relative quality still considered a medium modification
pub const THRESHOLD_MEDIUM: f64 = 1.0 - 0.07 * 3.0;

/// Convert a pitch scale to cents (100 cents = 1 semitone, 1200 = 1 octave)
pub fn pitch_scale_to_cents(scale: f64) -> f64 {
    1200.0 * scale.ln() / 2.0_f64.ln()
}

/// Convert a tempo scale to percent
pub fn tempo_scale_to_percent(scale: f64) -> f64 {
    100.0 * scale
}

/// Inclusive integer range of one threshold band
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Band {
    pub min: i64,
    pub max: i64,
}

impl Band {
    /// Band between `threshold` and its reciprocal, measured by `convert`
    ///
    /// The lower bound rounds up and the upper bound rounds down so the band
    /// never exceeds the threshold on either side.
    fn from_threshold(threshold: f64, convert: fn(f64) -> f64) -> Self {
        Self {
            min: convert(threshold).ceil() as i64,
            max: convert(1.0 / threshold).floor() as i64,
        }
    }

    pub fn contains(&self, value: i64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// Pitch and tempo bands derived from the two quality thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    pub pitch_small: Band,
    pub pitch_medium: Band,
    pub tempo_small: Band,
    pub tempo_medium: Band,
}

impl Thresholds {
    fn compute() -> Self {
        Self {
            pitch_small: Band::from_threshold(THRESHOLD_SMALL, pitch_scale_to_cents),
            pitch_medium: Band::from_threshold(THRESHOLD_MEDIUM, pitch_scale_to_cents),
            tempo_small: Band::from_threshold(THRESHOLD_SMALL, tempo_scale_to_percent),
            tempo_medium: Band::from_threshold(THRESHOLD_MEDIUM, tempo_scale_to_percent),
        }
    }

    fn bucket(value: i64, small: &Band, medium: &Band) -> &'static str {
        if small.contains(value) {
            "small"
        } else if medium.contains(value) {
            "medium"
        } else {
            "large"
        }
    }
}

pub static THRESHOLDS: Lazy<Thresholds> = Lazy::new(Thresholds::compute);

/// Anything that can be classified into tags
pub trait Tagged {
    fn tags(&self) -> TagSet;
}

/// Classify a transformation into its tags
///
/// Rule groups are independent; a segment usually receives several tags.
pub fn derive_tags(transform: &Transform) -> TagSet {
    let thresholds = &*THRESHOLDS;
    let mut tags = TagSet::new();
    let tempo = transform.tempo;
    let pitch = transform.pitch;

    if tempo == 100 {
        let bucket = if pitch == 0 {
            "exact"
        } else {
            Thresholds::bucket(pitch, &thresholds.pitch_small, &thresholds.pitch_medium)
        };
        tags.insert(format!("pitch:{}", bucket));
    }
    if pitch == 0 {
        if tempo == 100 {
            tags.insert("tempo:exact".to_string());
            tags.insert("speed:exact".to_string());
        } else {
            let bucket = Thresholds::bucket(tempo, &thresholds.tempo_small, &thresholds.tempo_medium);
            tags.insert(format!("tempo:{}", bucket));
        }
    }
    // Pitch and tempo changed together
    if tempo != 100 && pitch != 0 {
        let bucket = Thresholds::bucket(tempo, &thresholds.tempo_small, &thresholds.tempo_medium);
        tags.insert(format!("speed:{}", bucket));
    }

    for (value, tag) in [
        (transform.echo_delay, "echo"),
        (transform.high_pass, "high-pass"),
        (transform.low_pass, "low-pass"),
        (transform.reverb, "reverb"),
    ] {
        if value != 0 {
            tags.insert(tag.to_string());
        }
    }

    if transform.noise_type.as_deref() == Some(NOISE_TYPE_SAMPLE) {
        tags.insert("noise:sample".to_string());
    } else if let Some(color) = &transform.noise_color {
        tags.insert(format!("noise:{}", color));
    } else {
        tags.insert("noise:none".to_string());
    }
    if let Some(snr) = &transform.noise_snr {
        tags.insert(format!("noise:{}dB", snr));
    }

    tags.insert(format!(
        "merge_prev:{}",
        transform.merge_prev.as_deref().unwrap_or("begin")
    ));
    tags.insert(format!(
        "merge_next:{}",
        transform.merge_next.as_deref().unwrap_or("end")
    ));

    tags
}

/// Tag set holding a single tag
pub fn single_tag(tag: &str) -> TagSet {
    TagSet::from([tag.to_string()])
}
