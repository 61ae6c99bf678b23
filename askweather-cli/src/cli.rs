use anyhow::Context;
use askweather_core::{Config, ToolOrchestrator};
use clap::{ArgAction, Parser, Subcommand};
use inquire::{Password, Text, required};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "askweather", version, about = "Ask a model about the weather in a city")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Prompt for a city and a question, then print the model's answer (default).
    Ask,

    /// Store API keys in the config file.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.unwrap_or(Command::Ask) {
            Command::Ask => ask().await,
            Command::Configure => configure(),
        }
    }
}

async fn ask() -> anyhow::Result<()> {
    let config = Config::load_with_env()?;
    let orchestrator = ToolOrchestrator::from_config(&config)?;

    let city = Text::new("Enter a city name:")
        .with_validator(required!("Please enter a city name."))
        .prompt()
        .context("Failed to read city name")?;

    let question = Text::new(&format!("Ask anything about {city}:"))
        .with_validator(required!("Please enter a question."))
        .prompt()
        .context("Failed to read question")?;

    let outcome = orchestrator.ask(&city, &question).await?;
    println!("{outcome}");

    Ok(())
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let chat_key = Password::new("Chat-completion API key (GITHUB_TOKEN):")
        .without_confirmation()
        .with_validator(required!("API key must not be empty."))
        .prompt()
        .context("Failed to read chat-completion API key")?;

    let weather_key = Password::new("OpenWeather API key (WEATHER_KEY):")
        .without_confirmation()
        .with_validator(required!("API key must not be empty."))
        .prompt()
        .context("Failed to read OpenWeather API key")?;

    config.chat.api_key = Some(chat_key);
    config.weather.api_key = Some(weather_key);

    let path = config.save()?;
    info!(path = %path.display(), "Saved configuration");
    println!("Saved configuration to {}", path.display());

    Ok(())
}

/// Logs go to stderr so stdout carries only the answer.
pub fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("askweather={level},askweather_core={level}"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
