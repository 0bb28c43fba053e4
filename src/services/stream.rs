//! Turns an OpenAI-compatible streaming chat completion into text fragments.

use crate::{
    core::generator::FragmentStream,
    error::{PlannerError, Result},
};
use eventsource_stream::Eventsource;
use futures::{stream, Stream, StreamExt};
use serde_json::Value;

const DONE_MARKER: &str = "[DONE]";

/// Parse a `text/event-stream` response body into content fragments.
///
/// The stream ends cleanly only at the `[DONE]` marker. A body that closes
/// before it yields a final [`PlannerError::Stream`].
pub fn parse_chat_stream(response: reqwest::Response) -> FragmentStream {
    let frames = response.bytes_stream().eventsource().map(|event| {
        event
            .map(|event| event.data)
            .map_err(|err| format!("SSE stream error: {err}"))
    });

    fragments_until_done(frames)
}

/// Turn raw SSE `data` payloads into fragments, stopping at the first error.
pub(crate) fn fragments_until_done<S>(frames: S) -> FragmentStream
where
    S: Stream<Item = std::result::Result<String, String>> + Send + 'static,
{
    let fragments = stream::unfold(Some(Box::pin(frames)), |state| async move {
        let mut frames = state?;
        loop {
            match frames.next().await {
                None => {
                    let err = PlannerError::Stream(format!("stream ended before {DONE_MARKER}"));
                    return Some((Err(err), None));
                }
                Some(Ok(data)) if data.trim() == DONE_MARKER => return None,
                Some(Ok(data)) => match parse_chunk(&data) {
                    Ok(Some(text)) => return Some((Ok(text), Some(frames))),
                    Ok(None) => continue,
                    Err(err) => return Some((Err(err), None)),
                },
                Some(Err(message)) => return Some((Err(PlannerError::Stream(message)), None)),
            }
        }
    });

    Box::pin(fragments)
}

/// Wrap a non-streamed completion body as a single-fragment stream.
pub fn single_completion(body: &str) -> FragmentStream {
    let parsed = serde_json::from_str::<Value>(body)
        .map_err(|err| PlannerError::Stream(format!("Failed to parse JSON: {err}")))
        .and_then(|value| {
            check_error(&value)?;
            value
                .pointer("/choices/0/message/content")
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| PlannerError::Stream("completion has no message content".to_string()))
        });

    Box::pin(stream::iter(vec![parsed]))
}

/// Extract the delta text of one streamed chunk. Chunks without text yield `None`.
pub(crate) fn parse_chunk(data: &str) -> Result<Option<String>> {
    let data = data.trim();
    if data.is_empty() {
        return Ok(None);
    }

    let value: Value = serde_json::from_str(data)
        .map_err(|err| PlannerError::Stream(format!("malformed chunk `{data}`: {err}")))?;

    check_error(&value)?;

    let content = value
        .pointer("/choices/0/delta/content")
        .and_then(Value::as_str)
        .filter(|content| !content.is_empty())
        .map(str::to_string);

    Ok(content)
}

fn check_error(value: &Value) -> Result<()> {
    if let Some(error) = value.get("error").filter(|error| !error.is_null()) {
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string());
        return Err(PlannerError::Api(message));
    }
    Ok(())
}
