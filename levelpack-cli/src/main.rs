//! levelpack command-line tool.
//!
//! Usage:
//!   levelpack sync --endpoint https://levels.example.com/
//!   levelpack pack ./forest forest.zip
//!   levelpack unpack forest.zip ./forest --sandboxed
//!   levelpack show ./forest
//!   levelpack sample --average 2.5 --distribution exponential --count 5

use std::io::Cursor;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use levelpack_archive::{pack, unpack_bytes, UnpackPolicy};
use levelpack_loader::{load_from_local, SilentSoundPlayerFactory};
use levelpack_storage::{ArchiveStorage, FsStorage, Storage};
use levelpack_sync::{FailurePolicy, HttpCatalogClient, OutcomeStatus, SyncConfig, SyncOrchestrator};
use levelpack_types::{Distribution, TimeFrame};
use tracing::info;
use tracing_subscriber::EnvFilter;

const APP_NAME: &str = "levelpack";

#[derive(Parser, Debug)]
#[command(name = "levelpack")]
#[command(about = "Level package sync and archiving")]
struct Args {
    /// TOML sync configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Install every catalog package missing from the local root
    Sync {
        /// Catalog base URL (overrides the config file)
        #[arg(short, long)]
        endpoint: Option<String>,

        /// Local package root (defaults to the user data directory)
        #[arg(short, long)]
        root: Option<PathBuf>,

        /// Keep going after a package fails
        #[arg(long)]
        best_effort: bool,

        /// Reject unsafe archive entries and cap decompressed size
        #[arg(long)]
        sandboxed: bool,
    },
    /// Pack a package folder into an archive
    Pack { folder: PathBuf, output: PathBuf },
    /// Unpack an archive into a package folder
    Unpack {
        archive: PathBuf,
        folder: PathBuf,

        #[arg(long)]
        sandboxed: bool,
    },
    /// Load a package folder or archive and print a summary
    Show { package: PathBuf },
    /// Draw dwell times from a time frame
    Sample {
        #[arg(short, long)]
        average: f64,

        #[arg(short, long, default_value = "constant")]
        distribution: Distribution,

        #[arg(short = 'n', long, default_value = "1")]
        count: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    let mut config = match &args.config {
        Some(path) => SyncConfig::load(path)?,
        None => SyncConfig::default(),
    };

    match args.command {
        Command::Sync {
            endpoint,
            root,
            best_effort,
            sandboxed,
        } => {
            if let Some(endpoint) = endpoint {
                config.endpoint = endpoint;
            }
            if best_effort {
                config.failure_policy = FailurePolicy::BestEffort;
            }
            if sandboxed {
                config.unpack_policy = sandbox(&config);
            }
            run_sync(config, root).await
        }
        Command::Pack { folder, output } => run_pack(&folder, &output).await,
        Command::Unpack {
            archive,
            folder,
            sandboxed,
        } => {
            let policy = if sandboxed {
                sandbox(&config)
            } else {
                config.unpack_policy
            };
            run_unpack(&archive, &folder, policy).await
        }
        Command::Show { package } => run_show(&package).await,
        Command::Sample {
            average,
            distribution,
            count,
        } => run_sample(average, distribution, count),
    }
}

fn sandbox(config: &SyncConfig) -> UnpackPolicy {
    UnpackPolicy::Sandboxed {
        max_total_bytes: config.max_archive_bytes,
    }
}

async fn run_sync(config: SyncConfig, root: Option<PathBuf>) -> Result<()> {
    if config.endpoint.trim().is_empty() {
        bail!("no catalog endpoint: pass --endpoint or set `endpoint` in the config file");
    }

    let root = match root {
        Some(path) => FsStorage::open(path).await?,
        None => FsStorage::app_root(APP_NAME).await?,
    };
    info!("Synchronizing {} with {}", root.location(), config.endpoint);

    let client = HttpCatalogClient::new(&config)?;
    let report = SyncOrchestrator::new(client, config)
        .synchronize(&root)
        .await
        .context("synchronization failed")?;

    for outcome in &report.outcomes {
        match &outcome.status {
            OutcomeStatus::AlreadyPresent => println!("  present    {}", outcome.name),
            OutcomeStatus::Installed { bytes, sha256 } => {
                println!("  installed  {} ({bytes} bytes, sha256 {sha256})", outcome.name)
            }
            OutcomeStatus::Failed { error } => println!("  failed     {} ({error})", outcome.name),
        }
    }
    println!("{} package(s) downloaded", report.downloads());
    Ok(())
}

async fn run_pack(folder: &Path, output: &Path) -> Result<()> {
    if !folder.is_dir() {
        bail!("{} is not a folder", folder.display());
    }
    let source = FsStorage::open(folder).await?;
    let mut buf = Cursor::new(Vec::new());
    let summary = pack(&source, &mut buf).await?;
    tokio::fs::write(output, buf.into_inner())
        .await
        .with_context(|| format!("failed to write {}", output.display()))?;
    println!(
        "Packed {} files into {}",
        summary.entries.len(),
        output.display()
    );
    Ok(())
}

async fn run_unpack(archive: &Path, folder: &Path, policy: UnpackPolicy) -> Result<()> {
    let bytes = tokio::fs::read(archive)
        .await
        .with_context(|| format!("failed to read {}", archive.display()))?;
    let target = FsStorage::open(folder).await?;
    let summary = unpack_bytes(&bytes, &target, policy).await?;
    println!(
        "Unpacked {} files into {}",
        summary.written.len(),
        folder.display()
    );
    Ok(())
}

async fn run_show(package: &Path) -> Result<()> {
    let storage: Box<dyn Storage> = if package.is_file() {
        let bytes = tokio::fs::read(package)
            .await
            .with_context(|| format!("failed to read {}", package.display()))?;
        let label = package
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "package".to_string());
        Box::new(ArchiveStorage::open(&label, bytes)?)
    } else {
        Box::new(FsStorage::open(package).await?)
    };

    let pkg = load_from_local(storage.as_ref(), &SilentSoundPlayerFactory).await?;
    let level = &pkg.level;
    println!("Package:       {}", pkg.location);
    println!("Time limit:    {}s", level.time_limit_seconds);
    println!("Initial state: {}", level.initial_state_id);
    println!("Start sound:   {}", level.start_sound_name.as_deref().unwrap_or("-"));
    println!("Finish sound:  {}", level.finish_sound_name.as_deref().unwrap_or("-"));
    println!("States:");
    for state in &level.states {
        match &state.time_frame {
            Some(tf) => println!(
                "  {:<16} {} avg {}s",
                state.id, tf.distribution, tf.average_seconds
            ),
            None => println!("  {}", state.id),
        }
    }
    println!("Images:");
    for image in &pkg.image_files {
        println!("  {}", image.file_name());
    }
    Ok(())
}

fn run_sample(average: f64, distribution: Distribution, count: usize) -> Result<()> {
    if !average.is_finite() || average < 0.0 {
        bail!("average must be a non-negative number of seconds");
    }
    let frame = TimeFrame {
        average_seconds: average,
        distribution,
    };
    let mut rng = rand::thread_rng();
    for _ in 0..count {
        println!("{:.3}", frame.sample(&mut rng).as_secs_f64());
    }
    Ok(())
}
