/// Metrics and telemetry for UserDir
///
/// Provides Prometheus-compatible metrics for monitoring:
/// - Profile cache hit/miss rates and size
/// - Directory search outcomes (the only place transient failures stay
///   distinguishable from plain absence)

use lazy_static::lazy_static;
use prometheus::{
    register_int_counter_vec, register_int_gauge, Encoder, IntCounterVec, IntGauge, TextEncoder,
};

lazy_static! {
    /// Cache hits by cache type
    pub static ref CACHE_HITS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "userdir_cache_hits_total",
        "Total number of cache hits",
        &["cache_type"]
    )
    .unwrap();

    /// Cache misses by cache type
    pub static ref CACHE_MISSES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "userdir_cache_misses_total",
        "Total number of cache misses",
        &["cache_type"]
    )
    .unwrap();

    /// Cache size (number of entries)
    pub static ref CACHE_SIZE: IntGauge = register_int_gauge!(
        "userdir_cache_size",
        "Number of entries in the profile cache"
    )
    .unwrap();

    /// Directory searches by result (found, not_found, error)
    pub static ref DIRECTORY_SEARCHES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "userdir_directory_searches_total",
        "Total number of directory collaborator searches",
        &["result"]
    )
    .unwrap();
}

/// Encode all registered metrics in Prometheus text format
pub fn gather() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    if encoder.encode(&metric_families, &mut buffer).is_err() {
        return String::new();
    }

    String::from_utf8(buffer).unwrap_or_default()
}
