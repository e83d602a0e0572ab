use melascope_core::message::{ChatTurn, TurnRole};
use serde_json::json;

use crate::util::{api_request, exit_error, read_json_from_file};

pub async fn advisory(api_url: &str, label: &str, confidence: f64) -> i32 {
    let body = json!({ "label": label, "confidence": confidence });
    api_request(api_url, reqwest::Method::POST, "/api/advisory", Some(body), false).await
}

pub async fn chat(
    api_url: &str,
    label: &str,
    confidence: f64,
    history_file: Option<&str>,
    message: &str,
) -> i32 {
    let mut history = match history_file {
        Some(path) => match load_history(path) {
            Ok(turns) => turns,
            Err(e) => exit_error(
                &e,
                Some("History must be a JSON array of {\"role\": \"user\"|\"assistant\", \"content\": string}."),
            ),
        },
        None => Vec::new(),
    };
    history.push(ChatTurn {
        role: TurnRole::User,
        content: message.to_string(),
    });

    let body = json!({
        "label": label,
        "confidence": confidence,
        "history": history,
    });
    api_request(api_url, reqwest::Method::POST, "/api/advisory/chat", Some(body), false).await
}

fn load_history(path: &str) -> Result<Vec<ChatTurn>, String> {
    let value = read_json_from_file(path)?;
    parse_history(value).map_err(|e| format!("Invalid chat history in '{path}': {e}"))
}

fn parse_history(value: serde_json::Value) -> Result<Vec<ChatTurn>, serde_json::Error> {
    serde_json::from_value(value)
}
