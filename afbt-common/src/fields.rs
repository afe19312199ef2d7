//! Column names of annotation, match and track list files

pub const QUERY_ID: &str = "query_id";
pub const REFERENCE_ID: &str = "reference_id";
pub const QUERY_BEGIN: &str = "query_begin";
pub const QUERY_END: &str = "query_end";
pub const REFERENCE_BEGIN: &str = "reference_begin";
pub const REFERENCE_END: &str = "reference_end";
pub const TEMPO: &str = "tempo";
pub const PITCH: &str = "pitch";
pub const ECHO_DELAY: &str = "echo_delay";
pub const ECHO_DECAY: &str = "echo_decay";
pub const HIGH_PASS: &str = "high_pass";
pub const LOW_PASS: &str = "low_pass";
pub const REVERB: &str = "reverb";
pub const NOISE_TYPE: &str = "noise_type";
pub const NOISE_FILE: &str = "noise_file";
pub const NOISE_COLOR: &str = "noise_color";
pub const NOISE_SNR: &str = "noise_snr";
pub const MERGE_PREV: &str = "merge_prev";
pub const MERGE_PREV_DURATION: &str = "merge_prev_duration";
pub const MERGE_NEXT: &str = "merge_next";
pub const MERGE_NEXT_DURATION: &str = "merge_next_duration";

/// Every annotation column, in file order
pub const ANNOTATION_FIELDS: [&str; 21] = [
    QUERY_ID,
    REFERENCE_ID,
    QUERY_BEGIN,
    QUERY_END,
    REFERENCE_BEGIN,
    REFERENCE_END,
    TEMPO,
    PITCH,
    ECHO_DELAY,
    ECHO_DECAY,
    HIGH_PASS,
    LOW_PASS,
    REVERB,
    NOISE_TYPE,
    NOISE_FILE,
    NOISE_COLOR,
    NOISE_SNR,
    MERGE_PREV,
    MERGE_PREV_DURATION,
    MERGE_NEXT,
    MERGE_NEXT_DURATION,
];

/// `noise_type` value for noise mixed in from a sample file
pub const NOISE_TYPE_SAMPLE: &str = "sample";

pub const TRACK_ID: &str = "track_id";
pub const TRACK_FILE: &str = "track_file";
pub const TRACK_DURATION: &str = "track_duration";
