//! Progress logging utilities.

use log::info;

/// Logs how many input lines were read and the rate so far.
pub fn log_progress(start_time: std::time::Instant, lines_read: usize) {
    let elapsed_secs = start_time.elapsed().as_secs_f64();
    let rate = if elapsed_secs > 0.0 {
        lines_read as f64 / elapsed_secs
    } else {
        0.0
    };
    info!(
        "Read {} lines in {:.2} seconds (~{:.2} lines/sec)",
        lines_read, elapsed_secs, rate
    );
}
