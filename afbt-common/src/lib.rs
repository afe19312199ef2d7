//! # AFBT Common Library
//!
//! Scoring engine of the audio fingerprinting benchmark toolkit, shared by
//! all AFBT tools:
//! - Interval algebra over the reference and query time axes
//! - Annotation/match records and their transformation tags
//! - Result accumulators and the three evaluation strategies
//! - Text and CSV reports
//! - Configuration loading, CSV input, media probing and track lists
//! - Track list filtering and FMA import
//! - Reference packaging with symbolic links

pub mod config;
pub mod error;
pub mod evaluator;
pub mod fields;
pub mod fma;
pub mod interval;
pub mod loader;
pub mod media;
pub mod reference_filter;
pub mod reference_links;
pub mod report;
pub mod results;
pub mod segment;
pub mod tags;
pub mod track_list;
pub mod track_table;

pub use error::{Error, Result};
pub use evaluator::{evaluate, BoundingBoxScorer, EvaluationReport, Evaluator, LengthScorer, PairScorer, TrackScorer};
pub use interval::{Interval, IntervalSet};
pub use segment::{convert_segment_ranges, PairKey, Segment, SegmentMap, SegmentRow, Transform};
pub use track_table::TrackTable;
