//! Segment records: raw rows, transformation parameters and typed segments
//!
//! A loaded file yields [`SegmentRow`]s, one per CSV line, grouped by
//! [`PairKey`]. Track-level evaluation works on rows directly. Segment-level
//! evaluation first converts every row to a [`Segment`] carrying both time
//! ranges; that conversion is the only step that can fail.

use crate::fields;
use crate::interval::Interval;
use crate::tags::{derive_tags, TagSet, Tagged};
use crate::{Error, Result};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Identifier of one (query track, reference track) combination
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PairKey {
    pub query_id: String,
    pub reference_id: String,
}

impl PairKey {
    pub fn new(query_id: impl Into<String>, reference_id: impl Into<String>) -> Self {
        Self {
            query_id: query_id.into(),
            reference_id: reference_id.into(),
        }
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}  {}", self.query_id, self.reference_id)
    }
}

/// Segments grouped by pair, in file order within each pair
pub type SegmentMap<S> = BTreeMap<PairKey, Vec<S>>;

/// One annotation or match line with every column kept as text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentRow {
    fields: HashMap<String, String>,
}

impl SegmentRow {
    pub fn new(fields: HashMap<String, String>) -> Self {
        Self { fields }
    }

    /// Build a row from `(column, value)` pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Integer column with lenient parsing
    ///
    /// Returns `default` when the column is absent or does not hold an
    /// optionally signed run of digits.
    pub fn get_int(&self, field: &str, default: i64) -> i64 {
        self.get(field)
            .and_then(|value| value.parse::<i64>().ok())
            .unwrap_or(default)
    }

    /// Text column, `None` when absent or empty
    pub fn get_non_empty(&self, field: &str) -> Option<&str> {
        self.get(field).filter(|value| !value.is_empty())
    }

    pub fn query_id(&self) -> &str {
        self.get(fields::QUERY_ID).unwrap_or_default()
    }

    pub fn reference_id(&self) -> &str {
        self.get(fields::REFERENCE_ID).unwrap_or_default()
    }

    pub fn pair_key(&self) -> PairKey {
        PairKey::new(self.query_id(), self.reference_id())
    }

    /// Transformation parameters of this row
    pub fn transform(&self) -> Transform {
        Transform::from_row(self)
    }

    /// Segment boundary in whole seconds, never negative
    fn interval_bound(&self, field: &'static str) -> Result<i64> {
        let value = self.get(field).ok_or_else(|| Error::MissingField {
            field,
            query_id: self.query_id().to_string(),
            reference_id: self.reference_id().to_string(),
        })?;

        let bound = value.trim().parse::<i64>().ok().filter(|bound| *bound >= 0);
        bound.ok_or_else(|| Error::InvalidInterval {
            field,
            value: value.to_string(),
            query_id: self.query_id().to_string(),
            reference_id: self.reference_id().to_string(),
        })
    }
}

impl Tagged for SegmentRow {
    fn tags(&self) -> TagSet {
        derive_tags(&self.transform())
    }
}

/// Transformation applied to the reference audio to produce the query
///
/// Parsed leniently: malformed numbers fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transform {
    /// Playback speed in percent, 100 = unchanged
    pub tempo: i64,
    /// Pitch shift in cents
    pub pitch: i64,
    pub echo_delay: i64,
    pub high_pass: i64,
    pub low_pass: i64,
    pub reverb: i64,
    pub noise_type: Option<String>,
    pub noise_color: Option<String>,
    /// Signal-to-noise ratio as written in the file (may be "0")
    pub noise_snr: Option<String>,
    pub merge_prev: Option<String>,
    pub merge_next: Option<String>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            tempo: 100,
            pitch: 0,
            echo_delay: 0,
            high_pass: 0,
            low_pass: 0,
            reverb: 0,
            noise_type: None,
            noise_color: None,
            noise_snr: None,
            merge_prev: None,
            merge_next: None,
        }
    }
}

impl Transform {
    pub fn from_row(row: &SegmentRow) -> Self {
        let text = |field: &str| row.get_non_empty(field).map(str::to_string);

        Self {
            tempo: row.get_int(fields::TEMPO, 100),
            pitch: row.get_int(fields::PITCH, 0),
            echo_delay: row.get_int(fields::ECHO_DELAY, 0),
            high_pass: row.get_int(fields::HIGH_PASS, 0),
            low_pass: row.get_int(fields::LOW_PASS, 0),
            reverb: row.get_int(fields::REVERB, 0),
            noise_type: text(fields::NOISE_TYPE),
            noise_color: text(fields::NOISE_COLOR),
            noise_snr: text(fields::NOISE_SNR),
            merge_prev: text(fields::MERGE_PREV),
            merge_next: text(fields::MERGE_NEXT),
        }
    }

    /// Tempo as a speed multiplier (1.0 = unchanged)
    pub fn tempo_ratio(&self) -> f64 {
        self.tempo as f64 / 100.0
    }
}

/// Alignment of a reference range with a query range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub reference: Interval,
    pub query: Interval,
    pub transform: Transform,
}

impl Segment {
    pub fn new(reference: Interval, query: Interval, transform: Transform) -> Self {
        Self {
            reference,
            query,
            transform,
        }
    }

    /// Convert a row; both ranges must be present as whole seconds
    pub fn from_row(row: &SegmentRow) -> Result<Self> {
        let reference = Interval::new(
            row.interval_bound(fields::REFERENCE_BEGIN)?,
            row.interval_bound(fields::REFERENCE_END)?,
        );
        let query = Interval::new(
            row.interval_bound(fields::QUERY_BEGIN)?,
            row.interval_bound(fields::QUERY_END)?,
        );

        Ok(Self::new(reference, query, row.transform()))
    }
}

impl Tagged for Segment {
    fn tags(&self) -> TagSet {
        derive_tags(&self.transform)
    }
}

/// Convert every row of a map to a typed segment
///
/// Fails on the first row lacking usable ranges, so segment-level
/// evaluation never runs on partially converted data.
pub fn convert_segment_ranges(rows: &SegmentMap<SegmentRow>) -> Result<SegmentMap<Segment>> {
    rows.iter()
        .map(|(pair, list)| {
            let segments = list.iter().map(Segment::from_row).collect::<Result<Vec<_>>>()?;
            Ok((pair.clone(), segments))
        })
        .collect()
}
