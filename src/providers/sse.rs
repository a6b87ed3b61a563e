//! Server-Sent Events decoding for streamed chat completions.
//!
//! The completions endpoint answers with events of the form
//!
//! ```text
//! data: {"choices":[{"delta":{...}}]}
//!
//! data: [DONE]
//! ```
//!
//! Framing (partial chunks, multi-line `data:` fields, comments) is left to
//! `eventsource-stream`; this module only interprets the payloads.

use eventsource_stream::{EventStreamError, Eventsource};
use futures::stream::BoxStream;
use futures::{Stream, StreamExt};
use tracing::{debug, warn};

use super::types::chunk::ChatCompletionChunk;
use super::utils::upstream_error_message;
use crate::errors::{ClientError, ClientResult};
use crate::stream::{Fragment, StreamEvent};

const DONE: &str = "[DONE]";

/// Turn one `data:` payload into a stream event.
///
/// Undecodable JSON is reported as [`StreamEvent::Malformed`] so the stream
/// can continue. An `error` object from upstream ends the stream.
pub fn parse_data(data: &str) -> ClientResult<Option<StreamEvent>> {
    let chunk: ChatCompletionChunk = match serde_json::from_str(data) {
        Ok(chunk) => chunk,
        Err(e) => {
            warn!(error = %e, data = %data, "Failed to parse SSE chunk");
            return Ok(Some(StreamEvent::Malformed {
                reason: e.to_string(),
            }));
        }
    };

    if let Some(error) = &chunk.error {
        return Err(ClientError::Api {
            status: 200,
            message: upstream_error_message(error),
        });
    }

    let fragment = Fragment::from(chunk);
    if fragment.is_empty() {
        return Ok(None);
    }
    debug!(?fragment, "Received fragment");
    Ok(Some(StreamEvent::Fragment(fragment)))
}

fn framing_error<E: Into<ClientError>>(err: EventStreamError<E>) -> ClientError {
    match err {
        EventStreamError::Transport(e) => e.into(),
        EventStreamError::Utf8(e) => ClientError::Decode(e.to_string()),
        EventStreamError::Parser(e) => ClientError::Decode(e.to_string()),
    }
}

/// Decode a streamed response body into stream events. Ends at `[DONE]` or
/// when the body closes.
pub fn decode_events<S, B, E>(bytes: S) -> BoxStream<'static, ClientResult<StreamEvent>>
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Into<ClientError> + Send + 'static,
{
    Box::pin(async_stream::try_stream! {
        let mut events = Box::pin(bytes.eventsource());

        while let Some(event) = events.next().await {
            let event = event.map_err(framing_error)?;
            let data = event.data.trim();
            if data.is_empty() {
                continue;
            }
            if data == DONE {
                debug!("Received [DONE] signal, ending stream");
                break;
            }
            if let Some(event) = parse_data(data)? {
                yield event;
            }
        }
    })
}
