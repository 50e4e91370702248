pub mod commands;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use bakebot_core::config::{AppConfig, ConfigOverrides, LoadOptions, LogFormat};
use clap::{Parser, Subcommand};

use commands::{CommandResult, EXIT_CONFIG};

#[derive(Debug, Parser)]
#[command(
    name = "bakebot",
    about = "Bakery ordering assistant",
    long_about = "Chat with the bakery assistant, inspect its menu and configuration, and test order extraction.",
    after_help = "Examples:\n  bakebot chat\n  bakebot --menu demos/menu.json --intents demos/intents.json check\n  bakebot extract \"quero meia dúzia de bolo de cenoura\""
)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to a TOML config file")]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "Override catalog.menu_path")]
    menu: Option<PathBuf>,
    #[arg(long, global = true, help = "Override catalog.intents_path")]
    intents: Option<PathBuf>,
    #[arg(long, global = true, help = "Seed for reproducible response selection")]
    seed: Option<u64>,
    #[arg(long, global = true, help = "Override logging.level")]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Start an interactive conversation on stdin/stdout")]
    Chat,
    #[command(about = "Print the rendered menu block")]
    Menu,
    #[command(about = "Print the order draft extracted from a message as JSON")]
    Extract {
        #[arg(help = "Customer message to analyze")]
        text: String,
    },
    #[command(about = "Load config, catalog and intents and report readiness as JSON")]
    Check,
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::Menu => "menu",
            Self::Extract { .. } => "extract",
            Self::Check => "check",
            Self::Config => "config",
        }
    }
}

impl Cli {
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            config_path: self.config.clone(),
            require_file: self.config.is_some(),
            overrides: ConfigOverrides {
                menu_path: self.menu.clone(),
                intents_path: self.intents.clone(),
                log_level: self.log_level.clone(),
                seed: self.seed,
            },
        }
    }
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let result = execute(&cli);

    if !result.output.is_empty() {
        println!("{}", result.output);
    }
    ExitCode::from(result.exit_code)
}

fn execute(cli: &Cli) -> CommandResult {
    let options = cli.load_options();
    let config = match AppConfig::load(options.clone()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                cli.command.name(),
                "config_validation",
                error.to_string(),
                EXIT_CONFIG,
            )
        }
    };
    init_logging(&config);

    match &cli.command {
        Command::Chat => commands::chat::run(&config, io::stdin().lock(), io::stdout()),
        Command::Menu => commands::menu::run(&config),
        Command::Extract { text } => commands::extract::run(&config, text),
        Command::Check => commands::check::run(&config),
        Command::Config => CommandResult::plain(commands::config::run(
            &config,
            options.config_path.as_deref(),
            &options.overrides,
        )),
    }
}

/// Installs the global subscriber. Logs go to stderr so stdout carries only command output.
pub fn init_logging(config: &AppConfig) {
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level)
        .with_writer(io::stderr);

    let installed = match config.logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    if let Err(error) = installed {
        eprintln!("logging already initialized: {error}");
    }
}
