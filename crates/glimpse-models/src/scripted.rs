use std::{collections::VecDeque, sync::Arc};

use async_trait::async_trait;
use glimpse_core::{ChatModel, ChatRequest, ChatResponse, GlimpseError};
use tokio::sync::Mutex;

/// Test model replaying a fixed sequence of responses.
#[derive(Clone)]
pub struct ScriptedChatModel {
    responses: Arc<Mutex<VecDeque<ChatResponse>>>,
}

impl ScriptedChatModel {
    pub fn new(responses: Vec<ChatResponse>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::from(responses))),
        }
    }
}

#[async_trait]
impl ChatModel for ScriptedChatModel {
    async fn chat(&self, _request: ChatRequest) -> Result<ChatResponse, GlimpseError> {
        let mut responses = self.responses.lock().await;
        responses
            .pop_front()
            .ok_or_else(|| GlimpseError::Model("scripted model exhausted responses".to_string()))
    }
}
