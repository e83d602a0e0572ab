//! Shared fakes for unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::config::LlmSettings;
use crate::error::{AdvisoryError, AdvisoryResult};
use crate::gateway::ChatCompletion;
use crate::message::ChatMessage;

/// Gateway fake that replays scripted results and records every call.
#[derive(Default)]
pub struct ScriptedCompletion {
    replies: Mutex<VecDeque<AdvisoryResult<String>>>,
    calls: Mutex<Vec<(Vec<ChatMessage>, bool)>>,
}

impl ScriptedCompletion {
    pub fn replying(replies: impl IntoIterator<Item = AdvisoryResult<String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(Vec<ChatMessage>, bool)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatCompletion for ScriptedCompletion {
    async fn complete(&self, messages: &[ChatMessage], structured: bool) -> AdvisoryResult<String> {
        self.calls
            .lock()
            .unwrap()
            .push((messages.to_vec(), structured));
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AdvisoryError::Transport("no scripted reply".to_string())))
    }
}

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn serve(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("test server");
    });
    format!("http://{addr}")
}

pub fn live_settings(base_url: &str) -> LlmSettings {
    LlmSettings {
        api_key: Some("sk-test".to_string()),
        base_url: base_url.to_string(),
        ..LlmSettings::default()
    }
}
