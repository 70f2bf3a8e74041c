use std::collections::HashMap;
use std::time::Instant;

/// Observer for synchronization pipeline events.
///
/// Use cases report stage timings, counts and status messages through this
/// trait so the CLI, tests and any future front end can each present them
/// their own way.
pub trait PipelineLogger: Send {
    /// Report how many lyric lines have been processed so far.
    fn progress(&mut self, current: usize, total: usize);

    /// Record how long a named stage took (decode, transcribe, align, write).
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Record a counter such as matched or estimated lines.
    fn metric(&mut self, name: &str, value: f64);

    fn info(&mut self, message: &str);

    /// Emit an end-of-run report. Default: no-op.
    fn summary(&self) {}
}

/// Discards every event.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn progress(&mut self, _current: usize, _total: usize) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn metric(&mut self, _name: &str, _value: f64) {}
    fn info(&mut self, _message: &str) {}
}

/// Logger for terminal runs: forwards messages to `log` and keeps stage
/// timings for a closing report.
///
/// Line progress is only logged every `throttle_lines` lines and on the
/// last line.
pub struct StdoutPipelineLogger {
    throttle_lines: usize,
    timings: HashMap<String, Vec<f64>>,
    metrics: HashMap<String, Vec<f64>>,
    start_time: Instant,
    total_lines: usize,
    messages: Vec<String>,
}

impl StdoutPipelineLogger {
    pub fn new(throttle_lines: usize) -> Self {
        Self {
            throttle_lines: throttle_lines.max(1),
            timings: HashMap::new(),
            metrics: HashMap::new(),
            start_time: Instant::now(),
            total_lines: 0,
            messages: Vec::new(),
        }
    }

    /// Returns the formatted report, or `None` if nothing was recorded.
    pub fn summary_string(&self) -> Option<String> {
        if self.timings.is_empty() && self.metrics.is_empty() {
            return None;
        }

        let elapsed_s = self.start_time.elapsed().as_secs_f64();
        let mut out = vec![format!(
            "Run summary ({} lines, {elapsed_s:.1}s total):",
            self.total_lines
        )];

        let mut stages: Vec<_> = self.timings.iter().collect();
        stages.sort_by(|a, b| a.0.cmp(b.0));
        for (stage, durations) in stages {
            let total_ms: f64 = durations.iter().sum();
            out.push(format!("  {stage:12}: {total_ms:8.0}ms"));
        }

        let mut counters: Vec<_> = self.metrics.iter().collect();
        counters.sort_by(|a, b| a.0.cmp(b.0));
        for (name, values) in counters {
            if let Some(last) = values.last() {
                out.push(format!("  {name}: {last}"));
            }
        }

        let align_ms: f64 = self
            .timings
            .get("align")
            .map(|d| d.iter().sum())
            .unwrap_or(0.0);
        if self.total_lines > 0 && align_ms > 0.0 {
            let rate = self.total_lines as f64 / (align_ms / 1000.0);
            out.push(format!("  Alignment rate: {rate:.0} lines/s"));
        }

        Some(out.join("\n"))
    }

    pub fn timings_for(&self, stage: &str) -> Option<&[f64]> {
        self.timings.get(stage).map(Vec::as_slice)
    }

    pub fn metrics_for(&self, name: &str) -> Option<&[f64]> {
        self.metrics.get(name).map(Vec::as_slice)
    }
}

impl Default for StdoutPipelineLogger {
    fn default() -> Self {
        Self::new(25)
    }
}

impl PipelineLogger for StdoutPipelineLogger {
    fn progress(&mut self, current: usize, total: usize) {
        self.total_lines = total;
        if current % self.throttle_lines == 0 || current == total {
            log::info!("Aligned {current}/{total} lines");
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .push(duration_ms);
    }

    fn metric(&mut self, name: &str, value: f64) {
        self.metrics
            .entry(name.to_string())
            .or_default()
            .push(value);
    }

    fn info(&mut self, message: &str) {
        self.messages.push(message.to_string());
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_logger_accepts_everything() {
        let mut logger = NullPipelineLogger;
        logger.progress(1, 10);
        logger.timing("align", 5.0);
        logger.metric("matched_lines", 3.0);
        logger.info("hello");
        logger.summary();
    }

    #[test]
    fn test_timing_records_values() {
        let mut logger = StdoutPipelineLogger::new(10);
        logger.timing("transcribe", 2000.0);
        logger.timing("align", 4.0);
        logger.timing("align", 6.0);

        assert_eq!(logger.timings_for("align").unwrap(), &[4.0, 6.0]);
        assert_eq!(logger.timings_for("transcribe").unwrap().len(), 1);
        assert!(logger.timings_for("write").is_none());
    }

    #[test]
    fn test_summary_lists_stages_and_counters() {
        let mut logger = StdoutPipelineLogger::new(10);
        logger.progress(12, 12);
        logger.timing("transcribe", 1500.0);
        logger.timing("align", 3.0);
        logger.metric("estimated_lines", 2.0);

        let summary = logger.summary_string().unwrap();
        assert!(summary.contains("Run summary (12 lines"));
        assert!(summary.contains("transcribe"));
        assert!(summary.contains("estimated_lines: 2"));
        assert!(summary.contains("lines/s"));
    }

    #[test]
    fn test_summary_without_align_has_no_rate() {
        let mut logger = StdoutPipelineLogger::new(10);
        logger.progress(3, 3);
        logger.timing("transcribe", 10.0);

        assert!(!logger.summary_string().unwrap().contains("lines/s"));
    }

    #[test]
    fn test_empty_summary_returns_none() {
        assert!(StdoutPipelineLogger::new(10).summary_string().is_none());
    }

    #[test]
    fn test_progress_tracks_total() {
        let mut logger = StdoutPipelineLogger::new(10);
        for i in 1..=20 {
            logger.progress(i, 20);
        }
        assert_eq!(logger.total_lines, 20);
    }

    #[test]
    fn test_info_stores_messages() {
        let mut logger = StdoutPipelineLogger::new(10);
        logger.info("Reading lyrics");
        assert_eq!(logger.messages, vec!["Reading lyrics".to_string()]);
    }

    #[test]
    fn test_zero_throttle_is_clamped() {
        assert_eq!(StdoutPipelineLogger::new(0).throttle_lines, 1);
        assert_eq!(StdoutPipelineLogger::default().throttle_lines, 25);
    }
}
