use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::lyrics::domain::lyrics_reader::LyricsReader;
use crate::lyrics::domain::reference_line::ReferenceLine;
use crate::output::domain::lyrics_writer::LyricsWriter;
use crate::output::domain::output_format::OutputFormat;
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::shared::constants::SYNCED_SUFFIX;
use crate::sync::domain::alignment_summary::AlignmentSummary;
use crate::sync::domain::lyrics_aligner::LyricsAligner;
use crate::sync::domain::synced_segment::SyncedLyricSegment;
use crate::transcription::domain::transcript_provider::TranscriptProvider;

/// Everything one synchronization run produced.
#[derive(Debug)]
pub struct SyncOutcome {
    pub segments: Vec<SyncedLyricSegment>,
    pub summary: AlignmentSummary,
    pub written: Vec<PathBuf>,
}

/// Reads reference lyrics, obtains a transcription, aligns the two and
/// writes the result in every requested format.
pub struct SyncLyricsUseCase {
    lyrics_reader: Box<dyn LyricsReader>,
    transcripts: Box<dyn TranscriptProvider>,
    writers: Vec<Box<dyn LyricsWriter>>,
    logger: Box<dyn PipelineLogger>,
    threshold: f64,
}

impl SyncLyricsUseCase {
    pub fn new(
        lyrics_reader: Box<dyn LyricsReader>,
        transcripts: Box<dyn TranscriptProvider>,
        writers: Vec<Box<dyn LyricsWriter>>,
        logger: Box<dyn PipelineLogger>,
        threshold: f64,
    ) -> Self {
        Self {
            lyrics_reader,
            transcripts,
            writers,
            logger,
            threshold,
        }
    }

    pub fn run(
        &mut self,
        audio_path: &Path,
        lyrics_path: &Path,
        output_dir: &Path,
        language: Option<&str>,
    ) -> Result<SyncOutcome, Box<dyn std::error::Error>> {
        // Lyrics first so a bad lyrics file fails before the slow transcription.
        let t0 = Instant::now();
        let lines = self.lyrics_reader.read_lines(lyrics_path)?;
        let reference = ReferenceLine::from_lines(&lines);
        self.logger
            .timing("read_lyrics", t0.elapsed().as_secs_f64() * 1000.0);
        self.logger
            .info(&format!("Loaded {} lyric lines", reference.len()));

        let t0 = Instant::now();
        let segments = self.transcripts.transcribe(audio_path, language)?;
        self.logger
            .timing("transcribe", t0.elapsed().as_secs_f64() * 1000.0);
        self.logger
            .info(&format!("Transcription has {} segments", segments.len()));

        let t0 = Instant::now();
        let aligner = LyricsAligner::with_threshold(self.threshold);
        let logger = &mut self.logger;
        let synced = aligner.align_with_progress(&reference, &segments, &mut |current, total| {
            logger.progress(current, total)
        });
        self.logger
            .timing("align", t0.elapsed().as_secs_f64() * 1000.0);

        let summary = AlignmentSummary::from_segments(&synced);
        self.logger
            .metric("matched_lines", (summary.total - summary.estimated) as f64);
        self.logger
            .metric("estimated_lines", summary.estimated as f64);

        let t0 = Instant::now();
        let written = self.write_outputs(audio_path, output_dir, &synced)?;
        self.logger
            .timing("write", t0.elapsed().as_secs_f64() * 1000.0);

        self.logger.summary();

        Ok(SyncOutcome {
            segments: synced,
            summary,
            written,
        })
    }

    fn write_outputs(
        &mut self,
        audio_path: &Path,
        output_dir: &Path,
        synced: &[SyncedLyricSegment],
    ) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
        if self.writers.is_empty() {
            return Ok(Vec::new());
        }
        std::fs::create_dir_all(output_dir)?;

        let mut written = Vec::with_capacity(self.writers.len());
        for writer in &self.writers {
            let path = synced_output_path(output_dir, audio_path, writer.format());
            writer.write(&path, synced)?;
            self.logger.info(&format!(
                "Wrote {} lyrics to {}",
                writer.format(),
                path.display()
            ));
            written.push(path);
        }
        Ok(written)
    }
}

/// `<output_dir>/<audio stem>_synced.<ext>`
pub fn synced_output_path(output_dir: &Path, audio_path: &Path, format: OutputFormat) -> PathBuf {
    let stem = audio_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "lyrics".to_string());
    output_dir.join(format!("{stem}{SYNCED_SUFFIX}.{}", format.extension()))
}
