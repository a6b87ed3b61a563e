use reqwest::Response;
use serde_json::Value;

use crate::errors::ClientError;

/// Best human-readable text out of an upstream `error` value, which may be a
/// bare string or an object with a `message`.
pub fn upstream_error_message(error: &Value) -> String {
    match error {
        Value::String(message) => message.clone(),
        Value::Object(map) => map
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string()),
        other => other.to_string(),
    }
}

/// Pull an error message out of a JSON body: `error`, then `message`.
pub fn error_text_from_body(body: &Value) -> Option<String> {
    body.get("error")
        .filter(|e| !e.is_null())
        .map(upstream_error_message)
        .or_else(|| {
            body.get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .filter(|message| !message.trim().is_empty())
}

/// Convert a non-2xx response into [`ClientError::Api`], keeping as much of
/// the upstream error text as is available.
pub async fn api_error(response: Response) -> ClientError {
    let status = response.status().as_u16();
    let text = response.text().await.unwrap_or_default();
    ClientError::Api {
        status,
        message: error_message_for(status, &text),
    }
}

pub fn error_message_for(status: u16, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        if let Some(message) = error_text_from_body(&value) {
            return message;
        }
    }
    let body = body.trim();
    if body.is_empty() {
        format!("HTTP {}", status)
    } else {
        body.to_string()
    }
}
