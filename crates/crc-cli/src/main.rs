//! CRC launcher CLI
//!
//! Lists and searches CRC profiles, launches CRC with a profile, and runs as
//! a stdio plugin handler for launchers that speak the JSON line protocol.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use crc_core::config::{Config, Directories};
use crc_core::handler::Handler;
use crc_core::plugin::{LocalHost, Plugin, PluginContext};
use crc_core::profile::FixedDir;
use crc_core::{CrcPlugin, ProfileStore};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// CRC profile launcher
#[derive(Parser)]
#[command(name = "crc-launcher")]
#[command(about = "Search CRC profiles and launch CRC with one of them")]
#[command(version)]
#[command(after_help = "\
Examples:
  crc-launcher list                 List every profile
  crc-launcher query jfk            Profiles whose name contains \"jfk\"
  crc-launcher launch 01HXYZ        Start CRC with profile 01HXYZ
  crc-launcher handler              Serve the stdio plugin protocol
  crc-launcher --profiles-dir ./Profiles list
")]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Read profiles from this directory instead of the configured source
    #[arg(long, global = true, value_name = "DIR")]
    profiles_dir: Option<PathBuf>,

    /// CRC executable to launch
    #[arg(long, global = true, value_name = "PATH")]
    executable: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List loaded profiles in load order
    List {
        /// Print profiles as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show profiles matching a search, sorted by name
    Query {
        /// Search text; empty lists everything
        #[arg(trailing_var_arg = true)]
        text: Vec<String>,
    },

    /// Launch CRC with a profile id
    Launch {
        /// Profile id
        id: String,
    },

    /// Run as a stdio plugin handler (requests on stdin, responses on stdout)
    Handler,

    /// Show the resolved config, profile and executable paths
    Paths,
}

/// Set up logging.
/// The handler owns stdout, so it logs to a daily file; everything else logs to stderr.
fn setup_logging(dirs: &Directories, to_file: bool) -> Option<WorkerGuard> {
    let default_level = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "crc_launcher={default_level},crc_core={default_level}"
        ))
    });

    if to_file && std::fs::create_dir_all(&dirs.logs).is_ok() {
        let file_appender = tracing_appender::rolling::daily(&dirs.logs, "crc-launcher.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(non_blocking)
                    .with_ansi(false)
                    .with_target(true),
            )
            .with(filter)
            .init();
        return Some(guard);
    }

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
    None
}

fn load_config(cli: &Cli, dirs: &Directories) -> Result<Config> {
    let path = cli.config.clone().unwrap_or_else(|| dirs.config_file.clone());
    if cli.config.is_some() && !path.exists() {
        bail!("Config file {} does not exist", path.display());
    }
    let mut config = Config::load(&path)
        .with_context(|| format!("Failed to load config from {}", path.display()))?;

    if let Some(executable) = &cli.executable {
        config.launcher.executable = Some(executable.clone());
    }
    Ok(config)
}

fn build_store(cli: &Cli, config: &Config) -> Result<Arc<ProfileStore>> {
    let store = match &cli.profiles_dir {
        Some(dir) => ProfileStore::new(FixedDir::new(dir.clone())),
        None => ProfileStore::with_boxed_resolver(
            config
                .profile_resolver()
                .context("Invalid profiles configuration")?,
        ),
    };
    Ok(Arc::new(store))
}

fn build_plugin(store: Arc<ProfileStore>, config: &Config) -> CrcPlugin {
    let mut plugin = CrcPlugin::new(store, config.launcher(), config.icons.clone());
    plugin.init(PluginContext::new(Arc::new(LocalHost::new(config.theme))));
    plugin
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let dirs = Directories::new().context("Failed to determine application directories")?;
    let _guard = setup_logging(&dirs, matches!(cli.command, Commands::Handler));

    let config = load_config(&cli, &dirs)?;
    let store = build_store(&cli, &config)?;

    match &cli.command {
        Commands::List { json } => {
            store.load();
            let profiles = store.get_matching(None);
            if *json {
                println!("{}", serde_json::to_string_pretty(&profiles)?);
            } else {
                for profile in &profiles {
                    println!(
                        "{}\t{}\t{}",
                        profile.display_name(),
                        profile.id,
                        profile.file_path.display()
                    );
                }
            }
        }

        Commands::Query { text } => {
            let plugin = build_plugin(store, &config);
            for result in plugin.query(&text.join(" ")) {
                println!("{}\t{}", result.title, result.launch_key);
            }
        }

        Commands::Launch { id } => {
            let launcher = config.launcher();
            store.load();
            if store.find_by_id(id).is_none() {
                warn!("No loaded profile has id {id}, launching anyway");
            }
            launcher
                .try_launch(id)
                .with_context(|| format!("Unable to launch CRC with profile {id}"))?;
            info!("Launched {} --profile={id}", launcher.executable().display());
        }

        Commands::Handler => {
            let handler = Handler::new(build_plugin(store, &config));
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            handler
                .run(stdin, tokio::io::stdout())
                .await
                .context("Plugin handler failed")?;
        }

        Commands::Paths => {
            let profiles = store
                .resolve_profile_directory()
                .map_or_else(|| "<not found>".to_string(), |p| p.display().to_string());
            println!("config:     {}", dirs.config_file.display());
            println!("logs:       {}", dirs.logs.display());
            println!("profiles:   {profiles}");
            println!("executable: {}", config.launcher().executable().display());
        }
    }

    Ok(())
}
