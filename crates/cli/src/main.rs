use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use pipeline::{
    DownloadClient, GenerationClient, JobStatus, ProgressSink, StudioConfig, UploadClient,
    UploadSource, WorkflowController,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "chroma-cli")]
#[command(about = "Headless client for the chroma effect-generation service")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON config file; service defaults are used when absent
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload an image and print its public URL
    Upload {
        /// Image file to upload
        file: PathBuf,
    },

    /// Run the full workflow: upload, generate, poll and save the result
    Generate {
        /// Image file to run the effect on
        file: PathBuf,

        /// Directory the result media is saved into
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Print the result URL without downloading the media
        #[arg(long)]
        no_download: bool,
    },

    /// Probe the status of a submitted job once
    Status {
        /// Job identifier returned by submission
        job_id: String,
    },

    /// Download result media (proxy first, direct fetch fallback)
    Download {
        /// Media URL to download
        url: String,

        /// Directory the media is saved into
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = match &cli.config {
        Some(path) => StudioConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => StudioConfig::default(),
    };

    match cli.command {
        Commands::Upload { file } => upload_command(config, file).await,
        Commands::Generate {
            file,
            output,
            no_download,
        } => generate_command(config, file, output, no_download).await,
        Commands::Status { job_id } => status_command(config, job_id).await,
        Commands::Download { url, output } => download_command(config, url, output).await,
    }
}

/// Poll progress rendered as a spinner.
struct SpinnerSink(ProgressBar);

impl SpinnerSink {
    fn new() -> Result<Self> {
        let bar = ProgressBar::new_spinner();
        bar.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
        bar.enable_steady_tick(Duration::from_millis(120));
        Ok(Self(bar))
    }
}

impl ProgressSink for SpinnerSink {
    fn polling(&self, attempt: u32, status: JobStatus) {
        self.0.set_message(format!("{}... ({})", status, attempt));
    }
}

async fn upload_command(config: StudioConfig, file: PathBuf) -> Result<()> {
    let source =
        UploadSource::from_path(&file).with_context(|| format!("reading {}", file.display()))?;

    info!("uploading {} ({})", source.file_name, source.content_type);
    let asset = UploadClient::new(config).upload(&source).await?;

    println!("{}", asset.url);
    Ok(())
}

async fn generate_command(
    config: StudioConfig,
    file: PathBuf,
    output: PathBuf,
    no_download: bool,
) -> Result<()> {
    let source =
        UploadSource::from_path(&file).with_context(|| format!("reading {}", file.display()))?;

    let spinner = SpinnerSink::new()?;
    let bar = spinner.0.clone();
    let mut controller = WorkflowController::new(config).with_progress(Arc::new(spinner));

    bar.set_message("UPLOADING...");
    controller.select_file(source).await?;
    if let Some(asset) = controller.asset() {
        info!("uploaded: {}", asset.url);
    }

    bar.set_message("SUBMITTING JOB...");
    controller.generate().await?;
    bar.finish_and_clear();

    let media = controller
        .result()
        .context("generation finished without result media")?;
    println!("result: {}", media.url);

    if !no_download {
        let path = controller.download(&output).await?;
        println!("saved: {}", path.display());
    }

    Ok(())
}

async fn status_command(config: StudioConfig, job_id: String) -> Result<()> {
    let response = GenerationClient::new(config).status(&job_id).await?;

    println!("status: {}", response.status);
    if let Some(error) = response.error {
        println!("error: {}", error);
    }
    if let Some(result) = response.result {
        println!("result: {}", serde_json::to_string_pretty(&result)?);
    }
    Ok(())
}

async fn download_command(config: StudioConfig, url: String, output: PathBuf) -> Result<()> {
    let media = DownloadClient::new(config).download(&url).await?;
    let path = media.save_to(&output)?;
    println!("saved: {}", path.display());
    Ok(())
}
