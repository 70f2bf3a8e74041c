use std::path::{Path, PathBuf};

use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::audio::domain::audio_segment::AudioSegment;
use crate::shared::constants::WHISPER_SAMPLE_RATE;
use crate::transcription::domain::speech_recognizer::SpeechRecognizer;
use crate::transcription::domain::transcribed_segment::{TranscribedSegment, WordTiming};

/// Speech recognizer using whisper.cpp via whisper-rs.
///
/// Produces segment-level text with word timings assembled from token
/// timestamps.
#[derive(Debug)]
pub struct WhisperRecognizer {
    model_path: PathBuf,
    beam_size: i32,
}

impl WhisperRecognizer {
    pub fn new(model_path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        if !model_path.exists() {
            return Err(format!("Whisper model not found at: {}", model_path.display()).into());
        }
        Ok(Self {
            model_path: model_path.to_path_buf(),
            beam_size: 5,
        })
    }

    pub fn with_beam_size(mut self, beam_size: i32) -> Self {
        self.beam_size = beam_size.max(1);
        self
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }
}

impl SpeechRecognizer for WhisperRecognizer {
    fn transcribe(
        &self,
        audio: &AudioSegment,
        language: Option<&str>,
    ) -> Result<Vec<TranscribedSegment>, Box<dyn std::error::Error>> {
        if audio.sample_rate() != WHISPER_SAMPLE_RATE || audio.channels() != 1 {
            return Err(format!(
                "Whisper expects {WHISPER_SAMPLE_RATE} Hz mono audio, got {} Hz with {} channels",
                audio.sample_rate(),
                audio.channels()
            )
            .into());
        }

        let ctx = WhisperContext::new_with_params(
            self.model_path.to_str().ok_or("Invalid model path")?,
            WhisperContextParameters::default(),
        )
        .map_err(|e| format!("Failed to load Whisper model: {e}"))?;

        let mut state = ctx
            .create_state()
            .map_err(|e| format!("Failed to create Whisper state: {e}"))?;

        let mut params = FullParams::new(SamplingStrategy::BeamSearch {
            beam_size: self.beam_size,
            patience: -1.0,
        });
        params.set_language(Some(language.unwrap_or("auto")));
        params.set_translate(false);
        params.set_token_timestamps(true);
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);
        params.set_n_threads(num_cpus().min(4) as i32);

        state
            .full(params, audio.samples())
            .map_err(|e| format!("Whisper inference failed: {e}"))?;

        let mut segments = Vec::new();
        for seg_idx in 0..state.full_n_segments() {
            let segment = match state.get_segment(seg_idx) {
                Some(s) => s,
                None => continue,
            };

            let text = match segment.to_str() {
                Ok(t) => t.trim().to_string(),
                Err(_) => continue,
            };
            if text.is_empty() {
                continue;
            }

            // Segment timestamps are in centiseconds (10ms units)
            let start = segment.start_timestamp() as f64 / 100.0;
            let end = (segment.end_timestamp() as f64 / 100.0).max(start);

            let mut tokens = Vec::new();
            for tok_idx in 0..segment.n_tokens() {
                let token = match segment.get_token(tok_idx) {
                    Some(t) => t,
                    None => continue,
                };
                let piece = match token.to_str() {
                    Ok(t) => t.to_string(),
                    Err(_) => continue,
                };
                let data = token.token_data();
                tokens.push(TokenPiece {
                    text: piece,
                    start: data.t0 as f64 / 100.0,
                    end: data.t1 as f64 / 100.0,
                    probability: token.token_probability(),
                });
            }

            let words = merge_tokens_into_words(&tokens);
            let mut transcribed = TranscribedSegment::new(start, end, text);
            if !words.is_empty() {
                transcribed = transcribed.with_words(words);
            }
            segments.push(transcribed);
        }

        log::debug!("Whisper produced {} segments", segments.len());
        Ok(segments)
    }
}

/// One decoded token with its timestamps in seconds.
#[derive(Debug, Clone)]
struct TokenPiece {
    text: String,
    start: f64,
    end: f64,
    probability: f32,
}

/// Joins subword tokens into words. A token beginning with whitespace starts
/// a new word; special tokens (`[_BEG_]`, `<|en|>`, ...) are dropped. Word
/// confidence is the mean token probability.
fn merge_tokens_into_words(tokens: &[TokenPiece]) -> Vec<WordTiming> {
    let mut words: Vec<WordTiming> = Vec::new();
    let mut probabilities: Vec<f32> = Vec::new();

    for token in tokens {
        let trimmed = token.text.trim();
        if trimmed.is_empty() || trimmed.starts_with('[') || trimmed.starts_with('<') {
            continue;
        }
        if token.end < token.start {
            continue;
        }

        let starts_word = words.is_empty() || token.text.starts_with(char::is_whitespace);
        if starts_word {
            finish_word(&mut words, &mut probabilities);
            words.push(WordTiming {
                word: trimmed.to_string(),
                start: token.start,
                end: token.end,
                confidence: token.probability,
            });
        } else if let Some(current) = words.last_mut() {
            current.word.push_str(trimmed);
            current.end = current.end.max(token.end);
        }
        probabilities.push(token.probability);
    }
    finish_word(&mut words, &mut probabilities);

    words
}

/// Sets the last word's confidence to the mean of its token probabilities.
fn finish_word(words: &mut [WordTiming], probabilities: &mut Vec<f32>) {
    if let Some(last) = words.last_mut() {
        if !probabilities.is_empty() {
            last.confidence = probabilities.iter().sum::<f32>() / probabilities.len() as f32;
        }
    }
    probabilities.clear();
}

fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn piece(text: &str, start: f64, end: f64, probability: f32) -> TokenPiece {
        TokenPiece {
            text: text.to_string(),
            start,
            end,
            probability,
        }
    }

    #[test]
    fn test_new_nonexistent_path_returns_error() {
        let result = WhisperRecognizer::new(Path::new("/nonexistent/model.bin"));
        assert!(result.is_err());
    }

    #[test]
    fn test_new_nonexistent_path_error_message() {
        let result = WhisperRecognizer::new(Path::new("/nonexistent/model.bin"));
        let err = result.unwrap_err().to_string();
        assert!(
            err.contains("not found"),
            "Expected 'not found' in error, got: {err}"
        );
    }

    #[test]
    fn test_merge_joins_subword_tokens() {
        let tokens = vec![
            piece(" Hel", 0.0, 0.2, 0.8),
            piece("lo", 0.2, 0.4, 0.6),
            piece(" world", 0.5, 0.9, 0.9),
        ];
        let words = merge_tokens_into_words(&tokens);
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].word, "Hello");
        assert_relative_eq!(words[0].start, 0.0);
        assert_relative_eq!(words[0].end, 0.4);
        assert_relative_eq!(words[0].confidence, 0.7, epsilon = 1e-6);
        assert_eq!(words[1].word, "world");
        assert_relative_eq!(words[1].confidence, 0.9, epsilon = 1e-6);
    }

    #[test]
    fn test_merge_skips_special_tokens() {
        let tokens = vec![
            piece("[_BEG_]", 0.0, 0.0, 1.0),
            piece("<|en|>", 0.0, 0.0, 1.0),
            piece(" la", 0.1, 0.3, 0.5),
        ];
        let words = merge_tokens_into_words(&tokens);
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].word, "la");
    }

    #[test]
    fn test_merge_first_token_without_space_starts_word() {
        let words = merge_tokens_into_words(&[piece("yeah", 1.0, 1.3, 0.4)]);
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].word, "yeah");
    }

    #[test]
    fn test_merge_empty() {
        assert!(merge_tokens_into_words(&[]).is_empty());
    }

    #[test]
    #[ignore] // Requires whisper model file
    fn test_transcribe_does_not_crash_on_sine_wave() {
        let model_path = crate::shared::model_resolver::resolve(
            crate::shared::constants::DEFAULT_WHISPER_MODEL,
            None,
            None,
        )
        .expect("Failed to resolve whisper model");

        let recognizer = WhisperRecognizer::new(&model_path).expect("Failed to create recognizer");

        let len = (3.0 * WHISPER_SAMPLE_RATE as f64) as usize;
        let samples: Vec<f32> = (0..len)
            .map(|i| {
                let t = i as f64 / WHISPER_SAMPLE_RATE as f64;
                (2.0 * std::f64::consts::PI * 440.0 * t).sin() as f32
            })
            .collect();
        let audio = AudioSegment::new(samples, WHISPER_SAMPLE_RATE, 1);

        let result = recognizer.transcribe(&audio, Some("en"));
        assert!(result.is_ok(), "Transcription should not error: {result:?}");
    }

    #[test]
    fn test_transcribe_rejects_wrong_sample_rate() {
        let dir = tempfile::tempdir().unwrap();
        let model = dir.path().join("fake.bin");
        std::fs::write(&model, b"not a model").unwrap();
        let recognizer = WhisperRecognizer::new(&model).unwrap();

        let audio = AudioSegment::new(vec![0.0; 44100], 44100, 1);
        let err = recognizer.transcribe(&audio, None).unwrap_err().to_string();
        assert!(err.contains("16000"), "got: {err}");
    }
}
