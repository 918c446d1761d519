use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{ArgAction, Args, Parser, Subcommand};
use colored::Colorize;

mod commands;
mod context;
mod logging;

use commands::search::SearchArgs;
use context::AppContext;

#[derive(Parser)]
#[command(name = "hps")]
#[command(about = "HPS - search, upload and download Helix presets", long_about = None)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Backend origin, overrides config and HPS_API_URL
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Where downloads are written, overrides config and HPS_DOWNLOAD_DIR
    #[arg(long, global = true, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Use this directory instead of the platform config directory
    #[arg(long, global = true, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// More logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with a Google ID token
    Login {
        /// The ID token; read from stdin when omitted
        token: Option<String>,
    },
    /// Create an account with a Google ID token
    Register {
        /// The ID token; read from stdin when omitted
        token: Option<String>,
    },
    /// Sign out
    Logout,
    /// Show the signed-in user
    Whoami,

    /// List models grouped by type
    Models {
        /// Only this type (e.g. amp, cab, reverb)
        #[arg(long = "type", value_name = "TYPE")]
        model_type: Option<String>,
        /// Ask the backend to filter instead of using the full catalog
        #[arg(long, requires = "model_type")]
        remote: bool,
    },
    /// List model types in display order
    Types {
        /// Print the backend's raw type list
        #[arg(long)]
        remote: bool,
    },
    /// Show one model
    Model {
        id: i64,
        /// Include its parameters
        #[arg(long)]
        parameters: bool,
        /// Include the devices it exists on
        #[arg(long)]
        devices: bool,
    },
    /// List model categories
    Categories,
    /// Catalog statistics
    Stats,
    /// Backend health check
    Health,

    /// Search presets
    Search(SearchArgs),
    /// Show the available search filters
    Filters,
    /// Show one preset with its signal chain
    Preset { id: i64 },

    /// Download one preset as .hlx
    Download { id: i64 },
    /// Download several presets as one zip
    DownloadBulk {
        #[arg(required = true, num_args = 1..)]
        ids: Vec<i64>,
    },
    /// Download every preset matching a search as one zip
    DownloadSearch(SearchArgs),
    /// Upload .hlx files
    Upload {
        #[arg(required = true, num_args = 1..)]
        files: Vec<PathBuf>,
    },

    /// Inspect or edit the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write a default config file if none exists
    Init,
    /// Set one value (api_base_url, download_dir, log_level)
    Set { key: String, value: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let ctx = match AppContext::bootstrap(&cli.global) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            return ExitCode::FAILURE;
        }
    };

    let mut session_events = ctx.session.subscribe();
    let result = run(cli.command, &ctx).await;

    // A 401 anywhere above signed us out
    if commands::session_was_invalidated(&mut session_events) {
        eprintln!("{}", "Session expired. Run `hps login` to sign in again.".yellow());
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!("[Cli] Command failed: {:?}", e);
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands, ctx: &AppContext) -> Result<()> {
    match command {
        Commands::Login { token } => commands::account::login(ctx, token).await,
        Commands::Register { token } => commands::account::register(ctx, token).await,
        Commands::Logout => commands::account::logout(ctx).await,
        Commands::Whoami => commands::account::whoami(ctx),

        Commands::Models { model_type, remote } => {
            commands::catalog::models(ctx, model_type.as_deref(), remote).await
        }
        Commands::Types { remote } => commands::catalog::types(ctx, remote).await,
        Commands::Model {
            id,
            parameters,
            devices,
        } => commands::catalog::model(ctx, id, parameters, devices).await,
        Commands::Categories => commands::catalog::categories(ctx).await,
        Commands::Stats => commands::catalog::stats(ctx).await,
        Commands::Health => commands::catalog::health(ctx).await,

        Commands::Search(args) => commands::search::search(ctx, &args).await,
        Commands::Filters => commands::search::filters(ctx).await,
        Commands::Preset { id } => commands::search::preset(ctx, id).await,

        Commands::Download { id } => commands::transfer::download(ctx, id).await,
        Commands::DownloadBulk { ids } => commands::transfer::download_bulk(ctx, &ids).await,
        Commands::DownloadSearch(args) => commands::transfer::download_search(ctx, &args).await,
        Commands::Upload { files } => commands::transfer::upload(ctx, &files).await,

        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show(ctx),
            ConfigAction::Init => commands::config::init(ctx),
            ConfigAction::Set { key, value } => commands::config::set(ctx, &key, &value),
        },
    }
}
