use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use tracing_subscriber::EnvFilter;

use reka_research::commands::{self, events::EventsArgs, restaurants::RestaurantArgs};
use reka_research::providers::configs::{EnvConfig, ResearchProviderConfig, VisionProviderConfig};
use reka_research::providers::research::ResearchProvider;
use reka_research::providers::vision::VisionClient;
use reka_research::render::Theme;
use reka_research::videos::VideoCache;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Reka API key (can also be set via REKA_API_KEY environment variable)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Model to use (can also be set via REKA_MODEL environment variable)
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// Use a light syntax theme for markdown output
    #[arg(long, global = true)]
    light: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ask research questions and watch the reasoning stream in
    Chat,
    /// Search the web for events and list them as cards
    Events(EventsArgs),
    /// Get restaurant recommendations from TripAdvisor
    Restaurants(RestaurantArgs),
    /// Pick or upload a video and get it gently roasted
    Roast,
}

impl Cli {
    fn theme(&self) -> Theme {
        if self.light {
            Theme::Light
        } else {
            Theme::Dark
        }
    }

    fn research_provider(&self) -> Result<ResearchProvider> {
        let mut config = match &self.api_key {
            Some(api_key) => {
                let overrides = |key: &str| {
                    if key == "REKA_API_KEY" {
                        Ok(api_key.clone())
                    } else {
                        std::env::var(key)
                    }
                };
                ResearchProviderConfig::from_lookup(&overrides)
            }
            None => ResearchProviderConfig::from_env(),
        }
        .context("API key must be provided via --api-key or REKA_API_KEY environment variable")?;

        if let Some(model) = &self.model {
            config = config.with_model(model.clone());
        }
        Ok(ResearchProvider::new(config)?)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let theme = cli.theme();

    match &cli.command {
        Command::Chat => {
            let provider = cli.research_provider()?;
            commands::chat::run(&provider, theme).await
        }
        Command::Events(args) => {
            let provider = cli.research_provider()?;
            commands::events::run(&provider, args.clone(), theme).await
        }
        Command::Restaurants(args) => {
            let provider = cli.research_provider()?;
            commands::restaurants::run(&provider, args.clone(), theme).await
        }
        Command::Roast => {
            let config = VisionProviderConfig::from_env()?;
            let ttl = config.cache_ttl;
            let mut cache = VideoCache::new(VisionClient::new(config)?, ttl);
            commands::roast::run(&mut cache, theme).await
        }
    }
}
