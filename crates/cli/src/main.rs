use std::path::{Path, PathBuf};
use std::process;

use clap::{Args, Parser, Subcommand};

use karaoke_sync_core::audio::infrastructure::ffmpeg_audio_reader::FfmpegAudioReader;
use karaoke_sync_core::lyrics::infrastructure::lyrics_file_reader::LyricsFileReader;
use karaoke_sync_core::output::domain::lyrics_writer::LyricsWriter;
use karaoke_sync_core::output::domain::output_format::OutputFormat;
use karaoke_sync_core::output::infrastructure::writer_factory::create_writer;
use karaoke_sync_core::pipeline::pipeline_logger::StdoutPipelineLogger;
use karaoke_sync_core::pipeline::sync_lyrics_use_case::SyncLyricsUseCase;
use karaoke_sync_core::pipeline::transcribe_use_case::TranscribeUseCase;
use karaoke_sync_core::shared::constants::{LYRICS_EXTENSIONS, WHISPER_MODELS};
use karaoke_sync_core::shared::model_resolver;
use karaoke_sync_core::shared::settings::Settings;
use karaoke_sync_core::transcription::domain::transcript_provider::TranscriptProvider;
use karaoke_sync_core::transcription::infrastructure::recognizer_transcript_provider::{
    FileTranscriptProvider, RecognizerTranscriptProvider,
};
use karaoke_sync_core::transcription::infrastructure::whisper_recognizer::WhisperRecognizer;

/// Synchronize song lyrics with audio for karaoke playback.
#[derive(Parser)]
#[command(name = "karaoke-sync", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Align a lyrics file to a song and write timed lyrics.
    Sync(SyncArgs),
    /// Transcribe a song without reference lyrics.
    Transcribe(TranscribeArgs),
}

#[derive(Args)]
struct SyncArgs {
    /// Song audio (any format ffmpeg can decode).
    audio: PathBuf,

    /// Reference lyrics (.txt, .lrc or .srt).
    lyrics: PathBuf,

    /// Output directory [default from settings: ./sync_output].
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Whisper model: tiny, base, small, medium, large-v3.
    #[arg(long)]
    model: Option<String>,

    /// Language hint for transcription (e.g. en, ko). Auto-detected if omitted.
    #[arg(long)]
    language: Option<String>,

    /// Minimum similarity for a line to match (0.0-1.0).
    #[arg(long)]
    similarity_threshold: Option<f64>,

    /// Output formats (comma-separated): lrc, srt, json.
    #[arg(long, value_delimiter = ',')]
    formats: Option<Vec<String>>,

    /// Use a saved transcription JSON instead of running the model.
    #[arg(long)]
    transcript: Option<PathBuf>,
}

#[derive(Args)]
struct TranscribeArgs {
    /// Song audio (any format ffmpeg can decode).
    audio: PathBuf,

    /// Output directory [default from settings: ./sync_output].
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Whisper model: tiny, base, small, medium, large-v3.
    #[arg(long)]
    model: Option<String>,

    /// Language hint for transcription. Auto-detected if omitted.
    #[arg(long)]
    language: Option<String>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let settings = Settings::load();

    match cli.command {
        Command::Sync(args) => run_sync(args, &settings),
        Command::Transcribe(args) => run_transcribe(args, &settings),
    }
}

fn run_sync(args: SyncArgs, settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    validate_sync(&args)?;

    let threshold = args
        .similarity_threshold
        .unwrap_or(settings.similarity_threshold);
    let formats = match &args.formats {
        Some(names) => parse_formats(names)?,
        None => settings.output_formats.clone(),
    };
    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| settings.output_dir.clone());
    let language = args.language.clone().or_else(|| settings.language.clone());

    let transcripts: Box<dyn TranscriptProvider> = match &args.transcript {
        Some(path) => {
            log::info!("Using saved transcription {}", path.display());
            Box::new(FileTranscriptProvider::new(path.clone()))
        }
        None => {
            let model = args.model.as_deref().unwrap_or(&settings.whisper_model);
            build_recognizer(model)?
        }
    };
    let writers: Vec<Box<dyn LyricsWriter>> = formats.into_iter().map(create_writer).collect();

    let mut use_case = SyncLyricsUseCase::new(
        Box::new(LyricsFileReader::new()),
        transcripts,
        writers,
        Box::new(StdoutPipelineLogger::default()),
        threshold,
    );
    let outcome = use_case.run(
        &args.audio,
        &args.lyrics,
        &output_dir,
        language.as_deref(),
    )?;

    println!("{}", outcome.summary);
    for path in &outcome.written {
        println!("Wrote {}", path.display());
    }
    Ok(())
}

fn run_transcribe(
    args: TranscribeArgs,
    settings: &Settings,
) -> Result<(), Box<dyn std::error::Error>> {
    validate_transcribe(&args)?;

    let model = args.model.as_deref().unwrap_or(&settings.whisper_model);
    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| settings.output_dir.clone());
    let language = args.language.clone().or_else(|| settings.language.clone());

    let mut use_case = TranscribeUseCase::new(
        build_recognizer(model)?,
        Box::new(StdoutPipelineLogger::default()),
    );
    let outcome = use_case.run(&args.audio, &output_dir, language.as_deref())?;

    println!("Transcribed {} segments", outcome.segments.len());
    for path in &outcome.written {
        println!("Wrote {}", path.display());
    }
    Ok(())
}

fn build_recognizer(model: &str) -> Result<Box<dyn TranscriptProvider>, Box<dyn std::error::Error>> {
    log::info!("Resolving whisper model: {model}");
    let model_path = model_resolver::resolve(model, None, Some(Box::new(download_progress)))?;
    eprintln!();

    let recognizer = WhisperRecognizer::new(&model_path)?;
    Ok(Box::new(RecognizerTranscriptProvider::new(
        Box::new(FfmpegAudioReader::new()),
        Box::new(recognizer),
    )))
}

fn validate_sync(args: &SyncArgs) -> Result<(), Box<dyn std::error::Error>> {
    // A saved transcription only needs the audio path for naming outputs.
    if args.transcript.is_none() && !args.audio.exists() {
        return Err(format!("Audio file not found: {}", args.audio.display()).into());
    }
    if !args.lyrics.exists() {
        return Err(format!("Lyrics file not found: {}", args.lyrics.display()).into());
    }
    if !has_lyrics_extension(&args.lyrics) {
        log::warn!(
            "Unrecognized lyrics extension for {}; reading as plain text",
            args.lyrics.display()
        );
    }
    if let Some(path) = &args.transcript {
        if !path.exists() {
            return Err(format!("Transcript file not found: {}", path.display()).into());
        }
    }
    if let Some(threshold) = args.similarity_threshold {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(format!(
                "Similarity threshold must be between 0.0 and 1.0, got {threshold}"
            )
            .into());
        }
    }
    if let Some(names) = &args.formats {
        parse_formats(names)?;
    }
    validate_model(args.model.as_deref())
}

fn validate_transcribe(args: &TranscribeArgs) -> Result<(), Box<dyn std::error::Error>> {
    if !args.audio.exists() {
        return Err(format!("Audio file not found: {}", args.audio.display()).into());
    }
    validate_model(args.model.as_deref())
}

fn validate_model(model: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    match model {
        Some(m) if !WHISPER_MODELS.contains(&m) => Err(format!(
            "Model must be one of: {}, got '{m}'",
            WHISPER_MODELS.join(", ")
        )
        .into()),
        _ => Ok(()),
    }
}

fn parse_formats(names: &[String]) -> Result<Vec<OutputFormat>, Box<dyn std::error::Error>> {
    let mut formats = Vec::new();
    for name in names {
        let format = OutputFormat::parse(name)
            .ok_or_else(|| format!("Format must be one of: lrc, srt, json, got '{name}'"))?;
        if !formats.contains(&format) {
            formats.push(format);
        }
    }
    if formats.is_empty() {
        return Err("At least one output format is required".into());
    }
    Ok(formats)
}

fn has_lyrics_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| LYRICS_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading whisper model... {pct}%");
    } else {
        eprint!("\rDownloading whisper model... {downloaded} bytes");
    }
}
