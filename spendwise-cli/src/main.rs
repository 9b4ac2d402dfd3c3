use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};
use spendwise_core::{AppState, InsightService, ProfileUpdate};
use std::io;

mod auth;
mod config;
mod gemini;
mod input;
mod render;
mod shell;
mod state;

use auth::{prompt_line, resolve_api_key, UserStore};
use config::{load_config, Config};
use gemini::GeminiClient;
use shell::{Clock, Shell};

#[derive(Parser, Debug)]
#[command(
    name = "spendwise",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("SPENDWISE_BUILD_SHA"), ")"),
    about = "SpendWise personal finance tracker"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a local account and start an empty session
    Signup {
        #[arg(long)]
        email: String,

        /// Display name (default: User)
        #[arg(long, default_value = "")]
        name: String,
    },

    /// Log in and start a session with the sample ledger
    Login {
        #[arg(long)]
        email: String,
    },

    /// Request a password reset link
    ForgotPassword {
        #[arg(long)]
        email: String,
    },

    /// Start a session on sample data without an account
    Demo {
        #[arg(long, default_value = "Alex Johnson")]
        name: String,
    },

    /// Manage the insight service API key
    Auth {
        #[command(subcommand)]
        command: AuthCommand,
    },

    /// Manage ~/.spendwise/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum AuthCommand {
    /// Paste a Gemini API key into ~/.spendwise/auth.json
    PasteApiKey,

    /// Show where the API key comes from
    Status,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,

    /// Print the effective config
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Command::Signup { email, name } => {
            let password = prompt_line("Password")?;
            let mut store = UserStore::open_default()?;
            let name = store.signup(&name, &email, &password)?;
            let cfg = load_config()?;
            let mut state = AppState::new_user(name);
            state.update_profile(ProfileUpdate {
                currency: Some(cfg.session.default_currency),
                ..Default::default()
            })?;
            run_session(state, &cfg)?;
        }

        Command::Login { email } => {
            let password = prompt_line("Password")?;
            let store = UserStore::open_default()?;
            let name = store.login(&email, &password)?;
            let cfg = load_config()?;
            let state = if cfg.session.demo_data_on_login {
                AppState::demo(name)
            } else {
                AppState::new_user(name)
            };
            run_session(state, &cfg)?;
        }

        Command::ForgotPassword { email } => {
            let store = UserStore::open_default()?;
            println!("{}", store.forgot_password(&email)?);
        }

        Command::Demo { name } => {
            let cfg = load_config()?;
            run_session(AppState::demo(name), &cfg)?;
        }

        Command::Auth { command } => match command {
            AuthCommand::PasteApiKey => auth::paste_api_key()?,
            AuthCommand::Status => auth::auth_status()?,
        },

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => config::show_config()?,
        },
    }

    Ok(())
}

fn insight_client(cfg: &Config) -> Result<Option<GeminiClient>> {
    match resolve_api_key()? {
        Some(key) => Ok(Some(GeminiClient::new(&cfg.advisor, key)?)),
        None => {
            warn!("no API key configured; advice and avatars are disabled");
            Ok(None)
        }
    }
}

fn run_session(state: AppState, cfg: &Config) -> Result<()> {
    let client = insight_client(cfg)?;
    let service = client.as_ref().map(|c| c as &dyn InsightService);
    info!("session start for {}", state.profile().name);

    let stdin = io::stdin();
    let mut shell = Shell::new(
        state,
        service,
        stdin.lock(),
        io::stdout(),
        &cfg.session.timezone,
        Clock::System,
    )
    .context("start session")?;
    shell.run()?;
    info!("session end, {} transactions", shell.state().transactions().len());
    Ok(())
}
