use std::time::{Duration, Instant};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Run `f` and measure its wall-clock time
pub fn timed<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let out = f();
    (out, start.elapsed())
}

pub fn bytes_to_mb(bytes: usize) -> f64 {
    bytes as f64 / BYTES_PER_MB
}

/// MB/s for `bytes` processed in `seconds`. Zero elapsed time reports 0.
pub fn throughput_mb_s(bytes: usize, seconds: f64) -> f64 {
    if seconds > 0.0 {
        bytes_to_mb(bytes) / seconds
    } else {
        0.0
    }
}

/// `orig / comp`, 0 when nothing was produced
pub fn compression_ratio(orig_bytes: usize, comp_bytes: usize) -> f64 {
    if comp_bytes == 0 {
        0.0
    } else {
        orig_bytes as f64 / comp_bytes as f64
    }
}
