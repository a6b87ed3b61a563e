use anyhow::{anyhow, Result};
use bat::WrappingMode;

use crate::restaurants::{Restaurant, NO_RESULTS};
use crate::stream::{AnswerView, Event, EventList, Notice, Snapshot};
use crate::videos::Roast;

pub const NO_CONTENT: &str = "(no content returned)";
pub const NO_EVENTS: &str = "No events found matching your criteria.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    fn bat_theme(&self) -> &'static str {
        match self {
            Theme::Light => "GitHub",
            Theme::Dark => "zenburn",
        }
    }
}

pub fn print_markdown(content: &str, theme: Theme) -> Result<()> {
    bat::PrettyPrinter::new()
        .input(bat::Input::from_bytes(content.as_bytes()))
        .theme(theme.bat_theme())
        .language("Markdown")
        .wrapping_mode(WrappingMode::Character)
        .print()
        .map_err(|e| anyhow!(e.to_string()))?;
    println!();
    Ok(())
}

/// One line of output produced while a stream is still in flight.
#[derive(Debug, Clone, PartialEq)]
pub enum LiveLine {
    Trace(String),
    Progress(String),
    Warning(String),
}

/// Reduces in-flight snapshots to what is new since the previous one: fresh
/// trace lines, a count whenever the parsed event list changes, and notices.
/// Malformed-output notices collapse into one until the next good parse.
#[derive(Debug, Default)]
pub struct LiveView {
    shown_trace: usize,
    shown_events: Option<EventList>,
    malformed_shown: bool,
}

impl LiveView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, snapshot: &Snapshot) -> Vec<LiveLine> {
        let start = self.shown_trace.min(snapshot.trace.len());
        let mut lines: Vec<LiveLine> = snapshot.trace[start..]
            .iter()
            .map(|line| LiveLine::Trace(trace_line(line)))
            .collect();
        self.shown_trace = snapshot.trace.len();

        // The settled answer is printed in full by the caller
        if snapshot.trace_complete {
            return lines;
        }

        if let AnswerView::Events(list) = &snapshot.answer {
            if self.shown_events.as_ref() != Some(list) {
                lines.push(LiveLine::Progress(found_events(list.events.len())));
                self.shown_events = Some(list.clone());
                self.malformed_shown = false;
            }
        }

        match &snapshot.notice {
            Some(notice @ Notice::MalformedOutput(_)) if !self.malformed_shown => {
                self.malformed_shown = true;
                lines.push(LiveLine::Warning(notice_text(notice)));
            }
            Some(notice @ Notice::MalformedFragment(_)) => {
                lines.push(LiveLine::Warning(notice_text(notice)));
            }
            _ => {}
        }
        lines
    }
}

fn found_events(count: usize) -> String {
    match count {
        1 => "Found 1 event so far".to_string(),
        n => format!("Found {} events so far", n),
    }
}

pub fn trace_line(line: &str) -> String {
    format!("- {}", line)
}

pub fn event_card(event: &Event) -> String {
    format!(
        "### {}\n\n**Date:** {}\n\n[{}]({})",
        event.display_title(),
        event.display_date(),
        event.display_url(),
        event.link_target()
    )
}

pub fn events_markdown(list: &EventList) -> String {
    if list.is_empty() {
        return NO_EVENTS.to_string();
    }
    list.events
        .iter()
        .map(event_card)
        .collect::<Vec<_>>()
        .join("\n\n---\n\n")
}

pub fn answer_markdown(answer: &AnswerView) -> String {
    match answer {
        AnswerView::Empty => NO_CONTENT.to_string(),
        AnswerView::Text(text) => text.clone(),
        AnswerView::Events(list) => events_markdown(list),
        AnswerView::Raw(text) => fenced(text.trim_end()),
    }
}

/// Wrap `text` in a code fence longer than any backtick run inside it.
fn fenced(text: &str) -> String {
    let longest = text
        .split(|c: char| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    let fence = "`".repeat(longest.max(2) + 1);
    format!("{fence}\n{text}\n{fence}")
}

pub fn notice_text(notice: &Notice) -> String {
    match notice {
        Notice::MalformedOutput(reason) => {
            format!("Received malformed JSON response ({})", reason)
        }
        Notice::MalformedFragment(reason) => format!("Skipped an unreadable chunk ({})", reason),
    }
}

pub fn restaurant_entry(index: usize, restaurant: &Restaurant) -> String {
    let mut entry = format!("{}. **{}**", index + 1, restaurant.name);
    if let Some(url) = restaurant.url.as_deref().filter(|u| !u.is_empty()) {
        entry.push_str(&format!(" ([link]({}))", url));
    }
    entry.push_str(&format!("\n   {}", restaurant.meta_line()));
    entry.push_str(&format!("\n   {}", restaurant.location_line()));
    if let Some(why) = restaurant.why.as_deref().filter(|w| !w.is_empty()) {
        entry.push_str(&format!("\n   _{}_", why));
    }
    entry
}

pub fn restaurants_markdown(restaurants: &[Restaurant]) -> String {
    if restaurants.is_empty() {
        return NO_RESULTS.to_string();
    }
    restaurants
        .iter()
        .enumerate()
        .map(|(i, r)| restaurant_entry(i, r))
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn roast_markdown(roast: &Roast) -> String {
    match roast {
        Roast::Markdown(text) => text.clone(),
        Roast::Failed(reason) => format!("**Roast unavailable:** {}", reason),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::restaurants::PriceLevel;

    fn snapshot(trace: &[&str], answer: AnswerView, notice: Option<Notice>) -> Snapshot {
        Snapshot {
            trace: trace.iter().map(|s| s.to_string()).collect(),
            trace_complete: false,
            answer,
            notice,
        }
    }

    fn malformed() -> Option<Notice> {
        Some(Notice::MalformedOutput("EOF while parsing".to_string()))
    }

    #[test]
    fn test_live_view_only_yields_new_trace_lines() {
        let mut view = LiveView::new();
        assert_eq!(
            view.update(&snapshot(&["a"], AnswerView::Empty, None)),
            vec![LiveLine::Trace("- a".to_string())]
        );
        assert!(view.update(&snapshot(&["a"], AnswerView::Empty, None)).is_empty());
        assert_eq!(
            view.update(&snapshot(&["a", "b", "c"], AnswerView::Empty, None)),
            vec![
                LiveLine::Trace("- b".to_string()),
                LiveLine::Trace("- c".to_string())
            ]
        );
    }

    #[test]
    fn test_live_view_reports_parsed_events_and_collapses_notices() {
        let mut view = LiveView::new();
        let one = EventList {
            events: vec![Event::new("A", "Mon", "http://a")],
        };
        let two = EventList {
            events: vec![
                Event::new("A", "Mon", "http://a"),
                Event::new("B", "Tue", "http://b"),
            ],
        };

        let first = view.update(&snapshot(&[], AnswerView::Empty, malformed()));
        assert_eq!(first.len(), 1);
        assert!(matches!(&first[0], LiveLine::Warning(w) if w.starts_with("Received malformed JSON response")));
        assert!(view.update(&snapshot(&[], AnswerView::Empty, malformed())).is_empty());

        assert_eq!(
            view.update(&snapshot(&[], AnswerView::Events(one.clone()), None)),
            vec![LiveLine::Progress("Found 1 event so far".to_string())]
        );
        // Same list again: nothing new to say
        assert!(view
            .update(&snapshot(&[], AnswerView::Events(one.clone()), None))
            .is_empty());
        // A failed parse after a good one keeps the list and warns once more
        assert_eq!(
            view.update(&snapshot(&[], AnswerView::Events(one), malformed())).len(),
            1
        );
        assert_eq!(
            view.update(&snapshot(&[], AnswerView::Events(two), None)),
            vec![LiveLine::Progress("Found 2 events so far".to_string())]
        );
    }

    #[test]
    fn test_live_view_always_reports_skipped_chunks_and_ignores_final() {
        let mut view = LiveView::new();
        let skipped = Some(Notice::MalformedFragment("bad chunk".to_string()));
        assert_eq!(view.update(&snapshot(&[], AnswerView::Empty, skipped.clone())).len(), 1);
        assert_eq!(view.update(&snapshot(&[], AnswerView::Empty, skipped)).len(), 1);

        let mut last = snapshot(&["done"], AnswerView::Empty, malformed());
        last.trace_complete = true;
        assert_eq!(view.update(&last), vec![LiveLine::Trace("- done".to_string())]);
    }

    #[test]
    fn test_event_card_fallbacks() {
        let event: Event = serde_json::from_str("{}").unwrap();
        assert_eq!(
            event_card(&event),
            "### Untitled\n\n**Date:** Date TBD\n\n[No url found](#)"
        );
    }

    #[test]
    fn test_empty_event_list() {
        let list = EventList { events: vec![] };
        assert_eq!(answer_markdown(&AnswerView::Events(list)), NO_EVENTS);
    }

    #[test]
    fn test_events_are_separated() {
        let list = EventList {
            events: vec![
                Event::new("A", "Mon", "http://a"),
                Event::new("B", "Tue", "http://b"),
            ],
        };
        let markdown = events_markdown(&list);
        assert!(markdown.starts_with("### A"));
        assert!(markdown.contains("\n\n---\n\n### B"));
    }

    #[test]
    fn test_empty_answer() {
        assert_eq!(answer_markdown(&AnswerView::Empty), NO_CONTENT);
        assert_eq!(
            answer_markdown(&AnswerView::Raw("{\"events\": [\n".to_string())),
            "```\n{\"events\": [\n```"
        );
    }

    #[test]
    fn test_raw_fence_outgrows_backticks_in_text() {
        let raw = "Here:\n```json\n{}\n```";
        assert_eq!(
            answer_markdown(&AnswerView::Raw(raw.to_string())),
            format!("````\n{}\n````", raw)
        );
    }

    #[test]
    fn test_restaurants() {
        assert_eq!(restaurants_markdown(&[]), NO_RESULTS);

        let restaurant = Restaurant {
            name: "Ippudo".to_string(),
            cuisine: "Ramen".to_string(),
            address: "65 4th Ave".to_string(),
            neighborhood: None,
            approx_price: Some(PriceLevel::Moderate),
            rating: None,
            distance_km: None,
            url: Some("https://tripadvisor.com/ippudo".to_string()),
            why: Some("Rich tonkotsu broth".to_string()),
        };
        assert_eq!(
            restaurants_markdown(&[restaurant]),
            "1. **Ippudo** ([link](https://tripadvisor.com/ippudo))\n   Ramen · $$\n   65 4th Ave\n   _Rich tonkotsu broth_"
        );
    }

    #[test]
    fn test_roast_failure() {
        assert_eq!(
            roast_markdown(&Roast::Failed("Video not found".to_string())),
            "**Roast unavailable:** Video not found"
        );
    }
}
