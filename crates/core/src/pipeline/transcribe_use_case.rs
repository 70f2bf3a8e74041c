use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::output::infrastructure::srt_writer::render_cues;
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::transcription::domain::transcribed_segment::TranscribedSegment;
use crate::transcription::domain::transcript_provider::TranscriptProvider;
use crate::transcription::infrastructure::transcript_file::{write_transcript, TranscriptDocument};

pub const TRANSCRIPT_JSON_SUFFIX: &str = ".transcript.json";

pub struct TranscribeOutcome {
    pub segments: Vec<TranscribedSegment>,
    pub written: Vec<PathBuf>,
}

/// Transcribes a song without reference lyrics.
///
/// Writes `<stem>.txt` (one segment per line), `<stem>.srt` and
/// `<stem>.transcript.json`; the JSON can be fed back to a later sync run.
pub struct TranscribeUseCase {
    transcripts: Box<dyn TranscriptProvider>,
    logger: Box<dyn PipelineLogger>,
}

impl TranscribeUseCase {
    pub fn new(transcripts: Box<dyn TranscriptProvider>, logger: Box<dyn PipelineLogger>) -> Self {
        Self {
            transcripts,
            logger,
        }
    }

    pub fn run(
        &mut self,
        audio_path: &Path,
        output_dir: &Path,
        language: Option<&str>,
    ) -> Result<TranscribeOutcome, Box<dyn std::error::Error>> {
        let t0 = Instant::now();
        let segments = self.transcripts.transcribe(audio_path, language)?;
        self.logger
            .timing("transcribe", t0.elapsed().as_secs_f64() * 1000.0);
        self.logger.metric("segments", segments.len() as f64);

        let t0 = Instant::now();
        std::fs::create_dir_all(output_dir)?;
        let stem = audio_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "transcript".to_string());

        let txt_path = output_dir.join(format!("{stem}.txt"));
        let text: String = segments
            .iter()
            .map(|s| s.text.trim())
            .filter(|t| !t.is_empty())
            .map(|t| format!("{t}\n"))
            .collect();
        std::fs::write(&txt_path, text)?;

        let srt_path = output_dir.join(format!("{stem}.srt"));
        let cues = render_cues(segments.iter().map(|s| (s.start, s.end, s.text.as_str())));
        std::fs::write(&srt_path, cues)?;

        let json_path = output_dir.join(format!("{stem}{TRANSCRIPT_JSON_SUFFIX}"));
        let document = TranscriptDocument {
            language: language.map(str::to_string),
            segments,
        };
        write_transcript(&json_path, &document)?;

        self.logger
            .timing("write", t0.elapsed().as_secs_f64() * 1000.0);
        let written = vec![txt_path, srt_path, json_path];
        for path in &written {
            self.logger.info(&format!("Wrote {}", path.display()));
        }
        self.logger.summary();

        Ok(TranscribeOutcome {
            segments: document.segments,
            written,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::pipeline_logger::NullPipelineLogger;
    use crate::transcription::infrastructure::transcript_file::read_transcript;

    struct StubTranscripts(Vec<TranscribedSegment>);

    impl TranscriptProvider for StubTranscripts {
        fn transcribe(
            &self,
            _: &Path,
            _: Option<&str>,
        ) -> Result<Vec<TranscribedSegment>, Box<dyn std::error::Error>> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_run_writes_text_srt_and_json() {
        let dir = tempfile::tempdir().unwrap();
        let mut use_case = TranscribeUseCase::new(
            Box::new(StubTranscripts(vec![
                TranscribedSegment::new(0.0, 1.5, " first line"),
                TranscribedSegment::new(1.5, 2.0, "  "),
                TranscribedSegment::new(2.0, 3.0, "second line"),
            ])),
            Box::new(NullPipelineLogger),
        );

        let outcome = use_case
            .run(Path::new("/audio/track.m4a"), dir.path(), Some("en"))
            .unwrap();

        assert_eq!(outcome.segments.len(), 3);
        assert_eq!(outcome.written.len(), 3);

        let txt = std::fs::read_to_string(dir.path().join("track.txt")).unwrap();
        assert_eq!(txt, "first line\nsecond line\n");

        let srt = std::fs::read_to_string(dir.path().join("track.srt")).unwrap();
        assert!(srt.starts_with("1\n00:00:00,000 --> 00:00:01,500\nfirst line\n"));

        let doc = read_transcript(&dir.path().join("track.transcript.json")).unwrap();
        assert_eq!(doc.language.as_deref(), Some("en"));
        assert_eq!(doc.segments, outcome.segments);
    }

    #[test]
    fn test_empty_transcription_still_writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut use_case = TranscribeUseCase::new(
            Box::new(StubTranscripts(vec![])),
            Box::new(NullPipelineLogger),
        );

        let outcome = use_case.run(Path::new("quiet.wav"), dir.path(), None).unwrap();
        assert!(outcome.segments.is_empty());
        for path in &outcome.written {
            assert!(path.exists());
        }
    }
}
