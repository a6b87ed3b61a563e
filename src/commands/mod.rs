use anyhow::{Context, Result};
use cliclack::spinner;
use console::style;

use crate::providers::base::Provider;
use crate::providers::types::request::ChatRequest;
use crate::render::{answer_markdown, notice_text, print_markdown, LiveLine, LiveView, Theme};
use crate::stream::{reduce_stream, Snapshot, StreamReducer};

pub mod chat;
pub mod events;
pub mod restaurants;
pub mod roast;

/// Stream one request, printing trace lines and event counts as they arrive
/// and the settled answer once the stream closes.
pub async fn stream_answer(
    provider: &dyn Provider,
    request: ChatRequest,
    reducer: &mut StreamReducer,
    theme: Theme,
) -> Result<Snapshot> {
    let spin = spinner();
    spin.start("awaiting reply");
    let events = provider.stream(request).await;
    spin.stop("");
    let events = events.context("Failed to start research request")?;

    let mut view = LiveView::new();
    let outcome = reduce_stream(events, reducer, |snapshot| {
        for line in view.update(snapshot) {
            match line {
                LiveLine::Trace(text) => println!("{}", style(text).dim()),
                LiveLine::Progress(text) => println!("{}", style(text).cyan()),
                LiveLine::Warning(text) => println!("{}", style(text).yellow()),
            }
        }
    })
    .await;

    let last = match outcome {
        Ok(last) => last,
        Err(e) => {
            if !reducer.content().is_empty() {
                print_markdown(reducer.content(), theme)?;
            }
            return Err(e).context("Research stream ended early");
        }
    };

    println!();
    print_markdown(&answer_markdown(&last.answer), theme)?;
    if let Some(notice) = &last.notice {
        println!("{}", style(notice_text(notice)).yellow());
    }
    Ok(last)
}
