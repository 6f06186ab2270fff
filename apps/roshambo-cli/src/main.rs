mod ui;

use std::{env, path::PathBuf};

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use roshambo_engine::RandomOpponent;
use roshambo_ops::{ensure_data_dir, init_tracing, LogTarget};
use roshambo_session::GameSession;
use roshambo_store::{open_record_store, RecordStore, UserStore};
use roshambo_types::{account::Registration, config::RoshamboConfig, moves::Move};
use tracing::info;

type CliSession = GameSession<Box<dyn RecordStore>, RandomOpponent>;

#[derive(Parser)]
#[command(name = "roshambo", about = "Rock-paper-scissors with persistent statistics")]
struct Cli {
    /// Path to a TOML config (defaults to $ROSHAMBO_CONFIG, then configs/dev.toml).
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct Identity {
    #[arg(long)]
    user: Option<String>,
    #[arg(long)]
    password: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Create a new account.
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm: String,
    },
    /// Check a username/password pair.
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Play a single round.
    Play {
        choice: String,
        #[command(flatten)]
        identity: Identity,
    },
    /// Print the score cards and move distribution.
    Stats {
        #[command(flatten)]
        identity: Identity,
    },
    /// Print recent rounds, newest first.
    History {
        #[command(flatten)]
        identity: Identity,
    },
    /// Interactive terminal dashboard.
    Dashboard {
        #[command(flatten)]
        identity: Identity,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config);
    let data_dir = ensure_data_dir(&config.store.data_dir)?;
    let target = match cli.command {
        Command::Dashboard { .. } => LogTarget::File,
        _ => LogTarget::Stderr,
    };
    init_tracing(&config.ops, &data_dir, target)?;

    let mut session = build_session(&config)?;

    match cli.command {
        Command::Register {
            username,
            email,
            password,
            confirm,
        } => {
            let form = Registration {
                username,
                password,
                confirm_password: confirm,
                email,
            };
            match session.register(&form)? {
                Ok(()) => println!("Registration successful"),
                Err(err) => bail!("{err}"),
            }
        }
        Command::Login { username, password } => match session.login(&username, &password)? {
            Ok(()) => println!("Login successful. {}", session.score_line()),
            Err(err) => bail!("{err}"),
        },
        Command::Play { choice, identity } => {
            activate(&mut session, &config, identity)?;
            let player: Move = choice.parse()?;
            let Some(report) = session.play(player)? else {
                bail!("no active user; pass --user");
            };
            println!(
                "You chose {}\nComputer chose {}\n{}",
                player.display_name(),
                report.computer.display_name(),
                report.outcome.headline()
            );
            println!("{}", session.score_line());
        }
        Command::Stats { identity } => {
            activate(&mut session, &config, identity)?;
            let stats = session.stats();
            println!("Total Games: {}", stats.total_games);
            println!("Wins:        {}", stats.wins);
            println!("Win Rate:    {}", stats.win_rate);
            for (name, count) in session.move_distribution() {
                println!("{name:<9} {count}");
            }
        }
        Command::History { identity } => {
            activate(&mut session, &config, identity)?;
            for record in session.recent_history() {
                println!("{}", record.describe());
            }
        }
        Command::Dashboard { identity } => {
            activate(&mut session, &config, identity)?;
            ui::run(&mut session)?;
        }
    }
    Ok(())
}

fn build_session(config: &RoshamboConfig) -> Result<CliSession> {
    let store = open_record_store(&config.store);
    let users = if store.requires_user() {
        Some(UserStore::open(config.store.users_path())?)
    } else {
        None
    };
    let mut session = GameSession::new(
        config.session.clone(),
        store,
        RandomOpponent::new(),
        users,
    );
    session.boot()?;
    Ok(session)
}

/// Selects the player whose record the command operates on.
fn activate(session: &mut CliSession, config: &RoshamboConfig, identity: Identity) -> Result<()> {
    if !session.store().requires_user() {
        return Ok(());
    }
    let Some(user) = identity.user else {
        bail!("this data layout is per-user; pass --user");
    };
    if config.session.require_login {
        let Some(password) = identity.password else {
            bail!("login required; pass --password");
        };
        if let Err(err) = session.login(&user, &password)? {
            bail!("{err}");
        }
    } else {
        session.set_active_user(&user)?;
    }
    info!("Active user: {}", user);
    Ok(())
}

fn load_config(from_args: Option<PathBuf>) -> RoshamboConfig {
    let from_env = env::var("ROSHAMBO_CONFIG").ok().map(PathBuf::from);
    let path = from_args
        .or(from_env)
        .unwrap_or_else(|| PathBuf::from("configs/dev.toml"));
    match RoshamboConfig::from_file(&path) {
        Ok(cfg) => {
            if let Err(err) = cfg.validate() {
                eprintln!(
                    "Invalid config in '{}': {err}. Falling back to internal defaults.",
                    path.display()
                );
                default_config()
            } else {
                cfg
            }
        }
        Err(err) => {
            eprintln!(
                "Failed to load config from '{}': {err}. Falling back to internal defaults.",
                path.display()
            );
            default_config()
        }
    }
}

fn default_config() -> RoshamboConfig {
    let config = RoshamboConfig::default();
    debug_assert!(config.validate().is_ok());
    config
}
