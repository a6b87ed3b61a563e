use futures::{Stream, StreamExt};
use tracing::{debug, warn};

use super::events::EventList;
use super::fragment::{Fragment, ReasoningDelta, StreamEvent};
use super::trace::Trace;
use crate::errors::ClientResult;

/// When to attempt parsing the accumulated structured answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParsePolicy {
    /// After every content-bearing fragment, so partial answers render early.
    #[default]
    EveryFragment,
    /// Only once the stream has closed.
    AtEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerMode {
    Text,
    Structured(ParsePolicy),
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnswerView {
    /// Nothing renderable yet, or the stream closed without content.
    Empty,
    Text(String),
    Events(EventList),
    /// Structured text that never parsed, shown as-is.
    Raw(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// The accumulated structured answer is not (yet) valid.
    MalformedOutput(String),
    /// A single fragment could not be decoded and was skipped.
    MalformedFragment(String),
}

/// Renderable state after one step of the reducer.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub trace: Vec<String>,
    pub trace_complete: bool,
    pub answer: AnswerView,
    pub notice: Option<Notice>,
}

/// Folds one response stream into a reasoning trace and a final answer.
///
/// State only moves forward: trace lines are appended, content is
/// concatenated, and nothing is applied after [`StreamReducer::finish`].
#[derive(Debug)]
pub struct StreamReducer {
    mode: AnswerMode,
    trace: Trace,
    content: String,
    parsed: Option<EventList>,
    final_answer: Option<(AnswerView, Option<Notice>)>,
}

impl StreamReducer {
    pub fn new(mode: AnswerMode) -> Self {
        Self {
            mode,
            trace: Trace::new(),
            content: String::new(),
            parsed: None,
            final_answer: None,
        }
    }

    pub fn text() -> Self {
        Self::new(AnswerMode::Text)
    }

    pub fn structured(policy: ParsePolicy) -> Self {
        Self::new(AnswerMode::Structured(policy))
    }

    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    /// Raw concatenation of every content delta so far.
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_complete(&self) -> bool {
        self.final_answer.is_some()
    }

    /// Apply one stream event and return the snapshots it produced, in order.
    pub fn apply(&mut self, event: StreamEvent) -> Vec<Snapshot> {
        if self.is_complete() {
            warn!("Ignoring stream event received after completion");
            return Vec::new();
        }

        match event {
            StreamEvent::Fragment(fragment) => self.apply_fragment(fragment),
            StreamEvent::Malformed { reason } => {
                warn!(%reason, "Skipping malformed fragment");
                vec![self.snapshot_with(Some(Notice::MalformedFragment(reason)))]
            }
        }
    }

    fn apply_fragment(&mut self, fragment: Fragment) -> Vec<Snapshot> {
        let mut snapshots = Vec::new();

        match fragment.reasoning {
            Some(ReasoningDelta::Steps(steps)) => {
                for step in &steps {
                    let added = self.trace.push_step(step);
                    debug!(added, total = self.trace.len(), "Applied reasoning step");
                    snapshots.push(self.snapshot_with(None));
                }
            }
            Some(ReasoningDelta::Text(text)) => {
                self.trace.push_text(&text);
                snapshots.push(self.snapshot_with(None));
            }
            None => {}
        }

        if let Some(delta) = fragment.content {
            self.content.push_str(&delta);
            let notice = match self.mode {
                AnswerMode::Structured(ParsePolicy::EveryFragment) => {
                    self.try_parse().err().map(Notice::MalformedOutput)
                }
                AnswerMode::Structured(ParsePolicy::AtEnd) | AnswerMode::Text => None,
            };
            snapshots.push(self.snapshot_with(notice));
        }

        snapshots
    }

    fn try_parse(&mut self) -> Result<(), String> {
        match EventList::parse(&self.content) {
            Ok(list) => {
                self.parsed = Some(list);
                Ok(())
            }
            Err(e) => Err(e.to_string()),
        }
    }

    /// Mark the trace complete and settle the final answer. Calling it again
    /// returns the same snapshot.
    pub fn finish(&mut self) -> Snapshot {
        if self.final_answer.is_none() {
            let settled = self.settle();
            self.final_answer = Some(settled);
        }
        self.snapshot()
    }

    fn settle(&mut self) -> (AnswerView, Option<Notice>) {
        if self.content.trim().is_empty() {
            return (AnswerView::Empty, None);
        }

        match self.mode {
            AnswerMode::Text => (AnswerView::Text(self.content.trim().to_string()), None),
            AnswerMode::Structured(_) => {
                let notice = self.try_parse().err().map(Notice::MalformedOutput);
                match &self.parsed {
                    Some(list) => (AnswerView::Events(list.clone()), notice),
                    None => (AnswerView::Raw(self.content.clone()), notice),
                }
            }
        }
    }

    /// Current renderable state, without a per-fragment notice.
    pub fn snapshot(&self) -> Snapshot {
        match &self.final_answer {
            Some((answer, notice)) => Snapshot {
                trace: self.trace.lines().to_vec(),
                trace_complete: true,
                answer: answer.clone(),
                notice: notice.clone(),
            },
            None => self.snapshot_with(None),
        }
    }

    fn snapshot_with(&self, notice: Option<Notice>) -> Snapshot {
        Snapshot {
            trace: self.trace.lines().to_vec(),
            trace_complete: false,
            answer: self.answer_so_far(),
            notice,
        }
    }

    fn answer_so_far(&self) -> AnswerView {
        match self.mode {
            AnswerMode::Text if self.content.is_empty() => AnswerView::Empty,
            AnswerMode::Text => AnswerView::Text(self.content.clone()),
            AnswerMode::Structured(_) => match &self.parsed {
                Some(list) => AnswerView::Events(list.clone()),
                None => AnswerView::Empty,
            },
        }
    }
}

/// Drive `events` to completion, handing every snapshot to `on_snapshot` in
/// emission order. A transport error ends the stream early and is returned;
/// the reducer keeps whatever it had accumulated.
pub async fn reduce_stream<S, F>(
    events: S,
    reducer: &mut StreamReducer,
    mut on_snapshot: F,
) -> ClientResult<Snapshot>
where
    S: Stream<Item = ClientResult<StreamEvent>>,
    F: FnMut(&Snapshot),
{
    futures::pin_mut!(events);
    while let Some(event) = events.next().await {
        for snapshot in reducer.apply(event?) {
            on_snapshot(&snapshot);
        }
    }

    let last = reducer.finish();
    on_snapshot(&last);
    Ok(last)
}
