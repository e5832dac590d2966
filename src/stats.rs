//! Timing loop and summary statistics for a single benchmark segment.

use std::hint::black_box;
use std::time::Instant;

use crate::error::{BenchError, Result};

/// Summary of one segment's per-call latencies, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatencyStats {
    pub p99: f64,
    pub max: f64,
    pub min: f64,
    pub median: f64,
    pub avg: f64,
    pub samples: usize,
}

impl LatencyStats {
    /// Summarize raw durations.
    ///
    /// Selection follows the sorted sample directly: median is the element at
    /// `len / 2` and p99 the element at `floor(0.99 * len)`, neither
    /// interpolated. The p99 index is clamped to the last element.
    pub fn from_durations(label: &str, mut durations: Vec<f64>) -> Result<Self> {
        if durations.is_empty() {
            return Err(BenchError::EmptySample(label.to_string()));
        }

        durations.sort_by(f64::total_cmp);
        let len = durations.len();

        let min = durations[0];
        let max = durations[len - 1];
        let median = durations[len / 2];
        let p99 = durations[p99_index(len)];
        // summation error can push the mean a ulp past the extremes
        let avg = (durations.iter().sum::<f64>() / len as f64).clamp(min, max);

        Ok(Self {
            p99,
            max,
            min,
            median,
            avg,
            samples: len,
        })
    }
}

/// Index of the p99 sample in a sorted sequence of `len` elements
pub fn p99_index(len: usize) -> usize {
    let index = (len as f64 * 0.99) as usize;
    index.min(len.saturating_sub(1))
}

/// Run `op` `iterations` times, timing each call with a monotonic clock.
///
/// The first failing call aborts the segment; there are no partial samples.
pub fn measure<T, F>(label: &str, iterations: usize, mut op: F) -> Result<LatencyStats>
where
    F: FnMut() -> Result<T>,
{
    let mut durations = Vec::with_capacity(iterations);

    for _ in 0..iterations {
        let start = Instant::now();
        let out = op()?;
        let elapsed = start.elapsed();
        black_box(out);
        durations.push(elapsed.as_secs_f64() * 1000.0);
    }

    LatencyStats::from_durations(label, durations)
}
