use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::new_id;

use super::{GenerationError, GenerationRequest};

/// One generated track, whatever shape the service returned it in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedMusic {
    pub id: String,
    pub url: String,
    pub title: String,
    /// Seconds.
    pub duration: u32,
}

/// Turn an HTTP status and body into results or an error.
pub fn interpret_response(
    status: u16,
    body: &str,
    request: &GenerationRequest,
) -> Result<Vec<GeneratedMusic>, GenerationError> {
    if !(200..300).contains(&status) {
        return Err(GenerationError::Api {
            status,
            message: error_message(status, body),
        });
    }

    let value: Value = serde_json::from_str(body)?;
    let results = extract_results(&value, request);
    if !results.is_empty() {
        return Ok(results);
    }
    // Some services answer 200 with an error code in `base_resp`.
    match base_resp_error(&value) {
        Some(message) => Err(GenerationError::Api { status, message }),
        None => Err(GenerationError::NoMusicGenerated),
    }
}

/// Error text from a failed response body, or a generic message with the status.
pub fn error_message(status: u16, body: &str) -> String {
    let from_json = serde_json::from_str::<Value>(body).ok().and_then(|value| {
        str_at(&value, &["error"])
            .or_else(|| str_at(&value, &["error", "message"]))
            .or_else(|| str_at(&value, &["message"]))
            .or_else(|| str_at(&value, &["base_resp", "status_msg"]))
            .map(str::to_string)
    });
    match from_json {
        Some(message) => message,
        None => {
            let text = body.trim();
            let looks_structured = text.starts_with('{') || text.starts_with('[');
            if text.is_empty() || looks_structured {
                format!("request failed with status {status}")
            } else {
                text.to_string()
            }
        }
    }
}

/// Collect every usable result from the known response shapes.
///
/// * `data: [item, ...]`
/// * `data: item`
/// * `data: { audio: "<url>" }`
///
/// where an item carries its URL in `audio_file.url`, `audio_file` or `url`.
/// Items without a URL are skipped.
pub fn extract_results(value: &Value, request: &GenerationRequest) -> Vec<GeneratedMusic> {
    let items: Vec<&Value> = match value.get("data") {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(item @ Value::Object(_)) => vec![item],
        _ => Vec::new(),
    };

    items
        .into_iter()
        .filter_map(|item| {
            let url = item_url(item)?;
            let id = match item.get("id") {
                Some(Value::String(id)) if !id.is_empty() => id.clone(),
                Some(Value::Number(n)) => n.to_string(),
                _ => new_id(),
            };
            Some(GeneratedMusic {
                id,
                url: url.to_string(),
                title: request.title(),
                duration: request.duration_or_default(),
            })
        })
        .collect()
}

fn item_url(item: &Value) -> Option<&str> {
    let candidates = [
        str_at(item, &["audio_file", "url"]),
        str_at(item, &["audio_file"]),
        str_at(item, &["url"]),
        str_at(item, &["audio"]).filter(|a| a.starts_with("http")),
    ];
    candidates.into_iter().flatten().find(|url| !url.trim().is_empty())
}

fn base_resp_error(value: &Value) -> Option<String> {
    let code = value.get("base_resp")?.get("status_code")?.as_i64()?;
    if code == 0 {
        return None;
    }
    Some(
        str_at(value, &["base_resp", "status_msg"])
            .map(str::to_string)
            .unwrap_or_else(|| format!("service returned status code {code}")),
    )
}

fn str_at<'a>(value: &'a Value, path: &[&str]) -> Option<&'a str> {
    path.iter()
        .try_fold(value, |v, key| v.get(key))
        .and_then(Value::as_str)
}
