use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use medscribe::config::{self, ExtractionConfig, TranscriptionConfig};
use medscribe::pipeline::extraction::{clinical_categories, ProcessingOptions, TranscriptProcessor};
use medscribe::pipeline::transcription::{AudioTranscriber, TranscriptionOptions};

/// Extract structured clinical data from a consultation transcript.
///
/// Reads the transcript from stdin by default. With `--audio` the file
/// is transcribed first and the result fed through the same pipeline.
/// The outcome is printed as JSON; failures are part of the outcome,
/// not exit codes.
#[derive(Debug, Parser)]
#[command(name = "medscribe", version, about)]
struct Cli {
    /// Read the transcript from this file instead of stdin.
    #[arg(long, conflicts_with = "audio")]
    file: Option<PathBuf>,

    /// Transcribe this audio file first and extract from the result.
    #[arg(long)]
    audio: Option<PathBuf>,

    /// Use the canned extraction reply instead of a live provider.
    #[arg(long)]
    mock: bool,

    /// Use the canned transcript instead of uploading the audio file.
    #[arg(long)]
    mock_transcription: bool,

    /// Delete the audio file once the transcription attempt concludes.
    #[arg(long)]
    delete_audio: bool,

    /// Extraction method label recorded in the outcome metadata.
    #[arg(long)]
    method: Option<String>,

    /// Print the clinical category catalog and exit.
    #[arg(long)]
    categories: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    let cli = Cli::parse();

    if cli.categories {
        for (index, name) in clinical_categories().iter().enumerate() {
            println!("{:2}. {name}", index + 1);
        }
        return Ok(());
    }

    let transcript = match (&cli.audio, &cli.file) {
        (Some(audio_path), _) => {
            let transcriber = AudioTranscriber::new(&TranscriptionConfig::from_env());
            let options = TranscriptionOptions {
                delete_after_transcription: cli.delete_audio,
                mock_transcription: cli.mock_transcription,
            };
            let outcome = transcriber.transcribe(audio_path, &options).await;
            if !outcome.is_success() {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
                return Ok(());
            }
            outcome.transcript().unwrap_or_default().to_string()
        }
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("could not read transcript file {}", path.display()))?,
        (None, None) => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("could not read transcript from stdin")?;
            buffer
        }
    };

    let processor = TranscriptProcessor::new(&ExtractionConfig::from_env());
    let options = ProcessingOptions {
        mock_response: cli.mock,
        method: cli.method.clone(),
    };
    let outcome = processor.process_transcript(&transcript, &options).await;
    println!("{}", serde_json::to_string_pretty(&outcome)?);

    Ok(())
}
