//! Non-streaming restaurant recommender backed by a TripAdvisor-scoped web search.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::errors::{ClientError, ClientResult};
use crate::providers::base::Provider;
use crate::providers::types::message::Message;
use crate::providers::types::request::{
    ApproximateLocation, ChatRequest, DomainScope, ResponseFormat, WebSearchConfig,
};
use crate::stream::Trace;

pub const SEARCH_DOMAIN: &str = "tripadvisor.com";
pub const NO_RESULTS: &str = "No results returned. Try a broader query.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceLevel {
    #[serde(rename = "$")]
    Cheap,
    #[serde(rename = "$$")]
    Moderate,
    #[serde(rename = "$$$")]
    Expensive,
    #[serde(rename = "$$$$")]
    Luxury,
}

impl PriceLevel {
    pub fn symbol(&self) -> &'static str {
        match self {
            PriceLevel::Cheap => "$",
            PriceLevel::Moderate => "$$",
            PriceLevel::Expensive => "$$$",
            PriceLevel::Luxury => "$$$$",
        }
    }
}

impl fmt::Display for PriceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Restaurant {
    pub name: String,
    pub cuisine: String,
    pub address: String,
    #[serde(default)]
    pub neighborhood: Option<String>,
    #[serde(default)]
    pub approx_price: Option<PriceLevel>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub distance_km: Option<f64>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub why: Option<String>,
}

impl Restaurant {
    /// `cuisine · price · rating★ · distance km`, skipping absent parts.
    pub fn meta_line(&self) -> String {
        let mut parts = vec![self.cuisine.clone()];
        if let Some(price) = self.approx_price {
            parts.push(price.to_string());
        }
        if let Some(rating) = self.rating {
            parts.push(format!("{:.1}★", rating));
        }
        if let Some(distance) = self.distance_km {
            parts.push(format!("{:.1} km", distance));
        }
        parts.join(" · ")
    }

    /// Address, with the neighborhood appended when known.
    pub fn location_line(&self) -> String {
        match self.neighborhood.as_deref().filter(|n| !n.is_empty()) {
            Some(neighborhood) => format!("{} ({})", self.address, neighborhood),
            None => self.address.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RestaurantList {
    pub restaurants: Vec<Restaurant>,
}

impl RestaurantList {
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

pub fn restaurant_list_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "restaurants": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "name": {"type": "string"},
                        "cuisine": {"type": "string"},
                        "address": {"type": "string"},
                        "neighborhood": {"type": "string"},
                        "approx_price": {"type": "string", "enum": ["$", "$$", "$$$", "$$$$"]},
                        "rating": {"type": "number", "minimum": 0, "maximum": 5},
                        "distance_km": {"type": "number", "minimum": 0},
                        "url": {"type": "string"},
                        "why": {"type": "string"}
                    },
                    "required": ["name", "cuisine", "address"],
                    "additionalProperties": false
                }
            }
        },
        "required": ["restaurants"],
        "additionalProperties": false
    })
}

pub fn restaurant_list_format() -> ResponseFormat {
    ResponseFormat::json_schema("restaurant_list", restaurant_list_schema())
}

pub fn default_location() -> ApproximateLocation {
    ApproximateLocation {
        country: Some("US".to_string()),
        city: Some("New York City".to_string()),
        region: Some("New York".to_string()),
        timezone: Some("US/Eastern".to_string()),
    }
}

pub fn recommendation_prompt(query: &str) -> String {
    format!(
        "You are a restaurant recommender. User asked for {}. Respond with a short list of 3 restaurants that match the user's query. Always respond as JSON that matches the provided schema.",
        query
    )
}

pub fn recommendation_request(
    model: &str,
    query: &str,
    location: ApproximateLocation,
) -> ClientResult<ChatRequest> {
    let query = query.trim();
    if query.is_empty() {
        return Err(ClientError::InvalidInput(
            "Please enter what you are looking for.".to_string(),
        ));
    }

    let web_search = WebSearchConfig::enabled()
        .with_scope(DomainScope::allowed(vec![SEARCH_DOMAIN.to_string()]))
        .with_max_uses(1)
        .with_location(location);

    Ok(
        ChatRequest::new(model, vec![Message::user(&recommendation_prompt(query))?])
            .with_response_format(restaurant_list_format())
            .with_web_search(web_search),
    )
}

/// What the recommender found, along with the reasoning that led there.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub trace: Trace,
    pub restaurants: Vec<Restaurant>,
}

pub async fn recommend<P: Provider + ?Sized>(
    provider: &P,
    query: &str,
    location: ApproximateLocation,
) -> ClientResult<Recommendation> {
    let request = recommendation_request(provider.model(), query, location)?;
    info!(%query, "Requesting restaurant recommendations");

    let completion = provider.complete(request).await?;

    let mut trace = Trace::new();
    for step in &completion.reasoning_steps {
        trace.push_step(step);
    }

    let list = RestaurantList::parse(&completion.content)
        .map_err(|e| ClientError::Decode(format!("Invalid restaurant list: {}", e)))?;

    Ok(Recommendation {
        trace,
        restaurants: list.restaurants,
    })
}
