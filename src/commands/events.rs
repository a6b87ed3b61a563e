use anyhow::Result;
use clap::Args;
use cliclack::input;
use console::style;

use super::stream_answer;
use crate::providers::base::Provider;
use crate::providers::types::message::Message;
use crate::providers::types::request::{ChatRequest, DomainScope, WebSearchConfig};
use crate::render::Theme;
use crate::stream::events::event_list_format;
use crate::stream::{ParsePolicy, StreamReducer};

pub const EMPTY_PROMPT: &str = "Please enter a search query for events.";

#[derive(Args, Debug, Clone, Default)]
pub struct EventsArgs {
    /// What to look for; asked for interactively when omitted
    #[arg(short, long)]
    pub prompt: Option<String>,

    /// Only search these domains (repeatable)
    #[arg(long = "allow", value_name = "DOMAIN", conflicts_with = "block")]
    pub allow: Vec<String>,

    /// Never search these domains (repeatable)
    #[arg(long = "block", value_name = "DOMAIN")]
    pub block: Vec<String>,

    /// Parse the event list once the stream has closed instead of after every chunk
    #[arg(long)]
    pub parse_at_end: bool,
}

impl EventsArgs {
    pub fn scope(&self) -> Option<DomainScope> {
        if !self.allow.is_empty() {
            DomainScope::allowed(self.allow.clone())
        } else {
            DomainScope::blocked(self.block.clone())
        }
    }

    pub fn policy(&self) -> ParsePolicy {
        if self.parse_at_end {
            ParsePolicy::AtEnd
        } else {
            ParsePolicy::EveryFragment
        }
    }
}

pub fn events_request(model: &str, prompt: &str, scope: Option<DomainScope>) -> Result<ChatRequest> {
    Ok(ChatRequest::new(model, vec![Message::user(prompt)?])
        .with_response_format(event_list_format())
        .with_web_search(WebSearchConfig::enabled().with_scope(scope)))
}

pub async fn run(provider: &dyn Provider, args: EventsArgs, theme: Theme) -> Result<()> {
    let prompt = match &args.prompt {
        Some(prompt) => prompt.clone(),
        None => input("What events are you looking for?")
            .placeholder("Find tech conferences in San Francisco this month...")
            .required(false)
            .interact()?,
    };
    let prompt = prompt.trim();
    if prompt.is_empty() {
        println!("{}", style(EMPTY_PROMPT).yellow());
        return Ok(());
    }

    let request = events_request(provider.model(), prompt, args.scope())?;
    let mut reducer = StreamReducer::structured(args.policy());
    stream_answer(provider, request, &mut reducer, theme).await?;
    Ok(())
}
