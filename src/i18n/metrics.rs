//! Prompt template loader metrics.
//!
//! Tracks cache effectiveness and how often templates are served from the
//! default locale instead of the requested one.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counters for a single [`PromptLoader`](crate::i18n::PromptLoader).
#[derive(Debug, Default)]
pub struct TemplateMetrics {
    /// Number of loads answered from the cache
    cache_hits: AtomicUsize,

    /// Number of loads that had to go to disk
    cache_misses: AtomicUsize,

    /// Number of template files read from disk
    disk_reads: AtomicUsize,

    /// Number of loads served from the default locale's directory
    fallbacks: AtomicUsize,

    /// Number of loads that found no template at all
    not_found: AtomicUsize,
}

impl TemplateMetrics {
    /// Create a new set of counters, all zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a load answered from the cache.
    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a load that had to go to disk.
    pub fn record_cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a template file read.
    pub fn record_disk_read(&self) {
        self.disk_reads.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a load served from the default locale's directory.
    pub fn record_fallback(&self) {
        self.fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a load that found no template.
    pub fn record_not_found(&self) {
        self.not_found.fetch_add(1, Ordering::Relaxed);
    }

    pub fn cache_hits(&self) -> usize {
        self.cache_hits.load(Ordering::Relaxed)
    }

    pub fn cache_misses(&self) -> usize {
        self.cache_misses.load(Ordering::Relaxed)
    }

    pub fn disk_reads(&self) -> usize {
        self.disk_reads.load(Ordering::Relaxed)
    }

    pub fn fallbacks(&self) -> usize {
        self.fallbacks.load(Ordering::Relaxed)
    }

    pub fn not_found(&self) -> usize {
        self.not_found.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let hits = self.cache_hits();
        let misses = self.cache_misses();
        let total = hits + misses;
        let cache_hit_rate = if total > 0 {
            (hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            cache_hits: hits,
            cache_misses: misses,
            cache_hit_rate,
            disk_reads: self.disk_reads(),
            fallbacks: self.fallbacks(),
            not_found: self.not_found(),
        }
    }
}

/// Snapshot of template loader statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsReport {
    pub cache_hits: usize,
    pub cache_misses: usize,

    /// Cache hit rate as a percentage (0-100)
    pub cache_hit_rate: f64,

    pub disk_reads: usize,
    pub fallbacks: usize,
    pub not_found: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Counter Tests ====================

    #[test]
    fn test_new_metrics_are_zero() {
        let metrics = TemplateMetrics::new();
        assert_eq!(metrics.cache_hits(), 0);
        assert_eq!(metrics.cache_misses(), 0);
        assert_eq!(metrics.disk_reads(), 0);
        assert_eq!(metrics.fallbacks(), 0);
        assert_eq!(metrics.not_found(), 0);
    }

    #[test]
    fn test_record_counters() {
        let metrics = TemplateMetrics::new();

        metrics.record_cache_hit();
        metrics.record_cache_hit();
        metrics.record_cache_miss();
        metrics.record_disk_read();
        metrics.record_fallback();
        metrics.record_not_found();

        assert_eq!(metrics.cache_hits(), 2);
        assert_eq!(metrics.cache_misses(), 1);
        assert_eq!(metrics.disk_reads(), 1);
        assert_eq!(metrics.fallbacks(), 1);
        assert_eq!(metrics.not_found(), 1);
    }

    // ==================== Report Tests ====================

    #[test]
    fn test_report_empty() {
        let report = TemplateMetrics::new().report();
        assert_eq!(report.cache_hit_rate, 0.0);
        assert_eq!(report.cache_hits, 0);
    }

    #[test]
    fn test_report_cache_hit_rate() {
        let metrics = TemplateMetrics::new();

        // 3 hits, 1 miss = 75% hit rate
        metrics.record_cache_hit();
        metrics.record_cache_hit();
        metrics.record_cache_hit();
        metrics.record_cache_miss();

        let report = metrics.report();
        assert_eq!(report.cache_hits, 3);
        assert_eq!(report.cache_misses, 1);
        assert_eq!(report.cache_hit_rate, 75.0);
    }

    #[test]
    fn test_report_serializes() {
        let metrics = TemplateMetrics::new();
        metrics.record_cache_miss();

        let json = serde_json::to_value(metrics.report()).expect("Should serialize");
        assert_eq!(json["cache_misses"], 1);
        assert_eq!(json["cache_hit_rate"], 0.0);
    }
}
