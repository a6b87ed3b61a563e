use anyhow::{Context, Result};
use clap::Args;
use cliclack::spinner;

use crate::providers::base::Provider;
use crate::providers::types::request::ApproximateLocation;
use crate::render::{print_markdown, restaurants_markdown, Theme};
use crate::restaurants::{default_location, recommend};

#[derive(Args, Debug, Clone)]
pub struct RestaurantArgs {
    /// What kind of food or place to look for
    #[arg(short, long)]
    pub query: String,

    #[arg(long)]
    pub country: Option<String>,

    #[arg(long)]
    pub city: Option<String>,

    #[arg(long)]
    pub region: Option<String>,

    #[arg(long)]
    pub timezone: Option<String>,
}

impl RestaurantArgs {
    /// Flags override the New York City defaults field by field.
    pub fn location(&self) -> ApproximateLocation {
        let defaults = default_location();
        ApproximateLocation {
            country: self.country.clone().or(defaults.country),
            city: self.city.clone().or(defaults.city),
            region: self.region.clone().or(defaults.region),
            timezone: self.timezone.clone().or(defaults.timezone),
        }
    }
}

pub async fn run(provider: &dyn Provider, args: RestaurantArgs, theme: Theme) -> Result<()> {
    let spin = spinner();
    spin.start("Searching TripAdvisor");
    let outcome = recommend(provider, &args.query, args.location()).await;
    spin.stop("");
    let recommendation = outcome.context("Failed to get restaurant recommendations")?;

    if !recommendation.trace.is_empty() {
        print_markdown(&recommendation.trace.to_markdown(), theme)?;
    }
    print_markdown(&restaurants_markdown(&recommendation.restaurants), theme)
}
