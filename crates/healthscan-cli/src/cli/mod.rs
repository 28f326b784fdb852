//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use healthscan_core::config;
use healthscan_core::interrupt;

mod commands;

#[derive(Parser)]
#[command(name = "healthscan")]
#[command(version)]
#[command(about = "HealthScan terminal shell")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Print the stack the shell would mount for a session state
    Route {
        /// Session is still resolving
        #[arg(long)]
        loading: bool,
        /// No onboarding has been completed yet
        #[arg(long)]
        first_launch: bool,
        /// A valid session exists
        #[arg(long)]
        authenticated: bool,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Manage the locally persisted session
    Session {
        #[command(subcommand)]
        command: SessionCommands,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum SessionCommands {
    /// Resolve the persisted session and print its state
    Show {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Persist a session
    Login {
        /// User to sign in as
        #[arg(long, default_value = "demo", env = "HEALTHSCAN_USER")]
        user: String,
    },
    /// Clear the persisted session
    Logout,
    /// Clear the session and the onboarding marker
    Reset,
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    interrupt::init()?;

    let Some(command) = cli.command else {
        let config = config::Config::load().context("load config")?;
        return commands::shell::run(&config);
    };

    match command {
        Commands::Route {
            loading,
            first_launch,
            authenticated,
            json,
        } => commands::route::run(
            healthscan_core::session::SessionState {
                resolving: loading,
                first_launch,
                authenticated,
            },
            json,
        ),

        Commands::Session { command } => {
            let config = config::Config::load().context("load config")?;
            match command {
                SessionCommands::Show { json } => commands::session::show(json),
                SessionCommands::Login { user } => commands::session::login(&user, &config),
                SessionCommands::Logout => commands::session::logout(),
                SessionCommands::Reset => commands::session::reset(),
            }
        }

        Commands::Config { command } => match command {
            ConfigCommands::Path => commands::config::path(),
            ConfigCommands::Init => commands::config::init(),
        },
    }
}
