use anyhow::Result;
use cliclack::input;
use console::style;

use super::stream_answer;
use crate::providers::base::Provider;
use crate::providers::types::message::Message;
use crate::providers::types::request::ChatRequest;
use crate::render::Theme;
use crate::stream::StreamReducer;

/// Each prompt is sent on its own; earlier turns are not replayed.
pub async fn run(provider: &dyn Provider, theme: Theme) -> Result<()> {
    println!(
        "Reka research chat ({}) {}",
        provider.model(),
        style("- type \"exit\" to end the session").dim()
    );
    println!();

    loop {
        let message_text: String = input("Message:").placeholder("").multiline().interact()?;
        let message_text = message_text.trim();

        if message_text.eq_ignore_ascii_case("exit") {
            break;
        }
        if message_text.is_empty() {
            continue;
        }

        let request = ChatRequest::new(provider.model(), vec![Message::user(message_text)?]);
        let mut reducer = StreamReducer::text();
        if let Err(e) = stream_answer(provider, request, &mut reducer, theme).await {
            println!("{} {:#}", style("Error:").red(), e);
        }
        println!();
    }
    Ok(())
}
