use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use tracing::info;

use infinitalk::{
    GenerationRequest, HealthStatus, ImageFormat, Session, SessionConfig, SubmissionState, Voice,
};

/// Default output path for a generated video.
const DEFAULT_OUTPUT: &str = "infinite_talk_output.mp4";

/// Infinite Talk - generate lip-synced avatar video from a portrait and a script
#[derive(Parser, Debug)]
#[command(name = "infinitalk")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Backend base URL (overrides INFINITALK_BACKEND_URL)
    #[arg(short = 'u', long = "url", value_name = "URL", global = true)]
    url: Option<String>,

    /// Subcommand to run
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Probe the backend's health endpoint
    Health,

    /// List the supported voice identifiers
    Voices {
        /// Emit the catalog as JSON
        #[arg(long = "json")]
        json: bool,
    },

    /// Submit a generation request and save the resulting video
    Generate {
        /// Path to the portrait image (JPEG or PNG)
        #[arg(short = 'i', long = "image", value_name = "FILE")]
        image: PathBuf,

        /// Dialogue script, inline
        #[arg(short = 't', long = "text", value_name = "TEXT", conflicts_with = "text_file")]
        text: Option<String>,

        /// Dialogue script, read from a file
        #[arg(long = "text-file", value_name = "FILE")]
        text_file: Option<PathBuf>,

        /// Voice identifier (see `infinitalk voices`)
        #[arg(short = 'v', long = "voice", default_value = "en-US-ChristopherNeural")]
        voice: String,

        /// Where to write the generated MP4
        #[arg(short = 'o', long = "output", default_value = DEFAULT_OUTPUT)]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Load .env file if it exists (must be done before config loading)
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let mut config = SessionConfig::from_env();
    if let Some(ref url) = cli.url {
        config.set_base_url(url);
    }
    let session = Session::with_config(config).map_err(|e| anyhow!(e.to_string()))?;

    match cli.command {
        Commands::Health => run_health(&session).await,
        Commands::Voices { json } => {
            run_voices(json);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Generate {
            image,
            text,
            text_file,
            voice,
            output,
        } => run_generate(&session, &image, text, text_file.as_deref(), &voice, &output).await,
    }
}

async fn run_health(session: &Session) -> anyhow::Result<ExitCode> {
    let status = session.check_health().await.map_err(|e| anyhow!(e.to_string()))?;
    match status {
        HealthStatus::Online => {
            println!("Server online (GPU active)");
            Ok(ExitCode::SUCCESS)
        }
        HealthStatus::ServerError(code) => {
            println!("Server error ({code})");
            Ok(ExitCode::FAILURE)
        }
        HealthStatus::Unreachable(reason) => {
            println!("Connection failed: {reason}");
            println!("Is the backend running and the tunnel active?");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn run_voices(json: bool) {
    if json {
        println!("{}", Voice::catalog());
    } else {
        for voice in Voice::all() {
            println!("{voice}");
        }
    }
}

async fn run_generate(
    session: &Session,
    image_path: &Path,
    text: Option<String>,
    text_file: Option<&Path>,
    voice: &str,
    output: &Path,
) -> anyhow::Result<ExitCode> {
    let script_text = match (text, text_file) {
        (Some(inline), None) => inline,
        (None, Some(path)) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read script from {}", path.display()))?,
        (None, None) => anyhow::bail!("Provide the script with --text or --text-file"),
        (Some(_), Some(_)) => unreachable!("clap rejects --text with --text-file"),
    };

    let voice = Voice::parse(voice).map_err(|e| anyhow!(e.to_string()))?;

    let image_bytes = tokio::fs::read(image_path)
        .await
        .with_context(|| format!("Failed to read portrait from {}", image_path.display()))?;

    // Prefer the file extension; fall back to sniffing the magic numbers
    // so extension-less uploads still get the right content type.
    let image_format = image_path
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(ImageFormat::from_extension)
        .or_else(|| ImageFormat::sniff(&image_bytes))
        .ok_or_else(|| anyhow!("Unsupported portrait format; expected JPEG or PNG"))?;

    let request = GenerationRequest::new(image_bytes, image_format, script_text, voice)
        .map_err(|e| anyhow!(e.to_string()))?;

    info!(image = %image_path.display(), voice = %voice, "Uploading assets to backend");
    let report = session.submit(&request).await.map_err(|e| anyhow!(e.to_string()))?;

    match report.state {
        SubmissionState::Success => {
            let video = report
                .video
                .ok_or_else(|| anyhow!("Success report without video payload"))?;
            tokio::fs::write(output, &video)
                .await
                .with_context(|| format!("Failed to write video to {}", output.display()))?;
            println!(
                "Video generated successfully: {} ({} bytes)",
                output.display(),
                video.len()
            );
            Ok(ExitCode::SUCCESS)
        }
        SubmissionState::ServerErrorState => {
            println!(
                "Backend error: {}",
                report.message.unwrap_or_default()
            );
            Ok(ExitCode::FAILURE)
        }
        SubmissionState::ConnectionErrorState => {
            println!(
                "Could not connect to the backend: {}",
                report.message.unwrap_or_default()
            );
            println!("Is the backend running and the tunnel active?");
            Ok(ExitCode::FAILURE)
        }
        other => {
            println!(
                "Generation failed ({other}): {}",
                report.message.unwrap_or_default()
            );
            Ok(ExitCode::FAILURE)
        }
    }
}
