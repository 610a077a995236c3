//! kb-storage — transfer files to and from the course resources bucket.
//!
//! Set SUPABASE_URL and SUPABASE_ANON_KEY (optionally STORAGE_BUCKET), in the
//! environment or a .env file.

use anyhow::Context;
use clap::{Parser, Subcommand};
use kb_storage::{
    commands, init_logging, ClientFactory, ConfigProvider, DirectorySaver, DownloadHook,
    LogNotifier, TransferService, UploadHook,
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "kb-storage", about = "Course resource storage CLI")]
struct Cli {
    /// Directory downloads are saved into
    #[arg(long, global = true, default_value = ".")]
    output_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a course resource (PDF, MP4, ZIP, RAR or DOCX, up to 100 MB)
    Upload {
        /// Path to the file to upload
        file: PathBuf,
        /// Category id, first segment of the storage path
        #[arg(long)]
        category: String,
        /// Course id, second segment of the storage path
        #[arg(long)]
        course: String,
    },
    /// Download a file by URL
    Download {
        url: String,
        /// Name to save the file under (defaults to the URL's file name)
        #[arg(long)]
        filename: Option<String>,
    },
    /// Delete an object by storage path
    Delete { path: String },
    /// Show metadata for an object by storage path
    Stat { path: String },
    /// Print the public URL of a storage path
    PublicUrl { path: String },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_logging();

    let cli = Cli::parse();

    let factory = ClientFactory::new(ConfigProvider::from_env());
    let client = factory
        .get_client()
        .context("Failed to create storage client")?;
    let service = Arc::new(TransferService::new(
        client,
        Arc::new(DirectorySaver::new(&cli.output_dir)),
    ));
    let notifier = Arc::new(LogNotifier);

    match cli.command {
        Commands::Upload {
            file,
            category,
            course,
        } => {
            let hook = UploadHook::new(service.clone(), notifier);
            let outcome = commands::upload(&hook, &file, &category, &course).await?;
            print_json(&outcome)?;
        }
        Commands::Download { url, filename } => {
            let hook = DownloadHook::new(service.clone(), notifier);
            let saved = commands::download(&hook, &url, filename.as_deref()).await?;
            print_json(&serde_json::json!({
                "saved": cli.output_dir.join(saved).display().to_string()
            }))?;
        }
        Commands::Delete { path } => {
            commands::delete(&service, &path).await?;
            print_json(&serde_json::json!({ "deleted": path }))?;
        }
        Commands::Stat { path } => {
            let info = commands::stat(&service, &path).await?;
            print_json(&info)?;
        }
        Commands::PublicUrl { path } => {
            print_json(&serde_json::json!({ "url": commands::public_url(&service, &path) }))?;
        }
    }

    Ok(())
}
