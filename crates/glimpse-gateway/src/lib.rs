mod solution;

pub use solution::{ParsedSolution, SolutionMode};

use std::sync::Arc;

use glimpse_core::{
    ChatModel, ChatRequest, ContentPart, GlimpseError, MemoryStore, Message, ResponseFormat,
};
use glimpse_imaging::compress_data_uri;

const MAX_COMPLETION_TOKENS: u32 = 1600;
const SOLUTION_TEMPERATURE: f64 = 0.3;

/// Single entry point to the hosted model: text extraction, solution
/// generation and debugging, plus a connectivity probe.
///
/// Conversation history is read before a call and written only after the
/// provider confirms success; a failed call leaves the session untouched.
pub struct Gateway {
    model: Arc<dyn ChatModel>,
    memory: Arc<dyn MemoryStore>,
}

impl Gateway {
    pub fn new(model: Arc<dyn ChatModel>, memory: Arc<dyn MemoryStore>) -> Self {
        Self { model, memory }
    }

    /// Extract problem text from one or more data-URI screenshots.
    ///
    /// Each image is compressed before transmission and carried in its own
    /// user message. Temperature 0 keeps the OCR-like output stable.
    pub async fn extract_text(
        &self,
        images: &[String],
        language: &str,
    ) -> Result<String, GlimpseError> {
        let mut messages = vec![Message::system(format!(
            "You are a precise OCR system. Extract all text from the images, \
             maintaining proper formatting. Language preference: {language}. \
             Return only the extracted text without any additional commentary."
        ))];

        for image in images {
            messages.push(Message::human_parts(vec![
                ContentPart::text("Extract text from this image:"),
                ContentPart::image(compress_data_uri(image)),
            ]));
        }

        tracing::debug!(images = images.len(), %language, "requesting text extraction");
        let response = self
            .model
            .chat(
                ChatRequest::new(messages)
                    .with_temperature(0.0)
                    .with_max_tokens(MAX_COMPLETION_TOKENS),
            )
            .await?;

        Ok(response.message.text())
    }

    /// Generate a solution for the extracted problem text.
    pub async fn generate_solution(
        &self,
        problem_text: &str,
        language: &str,
        session_id: Option<&str>,
    ) -> Result<ParsedSolution, GlimpseError> {
        self.solve(SolutionMode::Generate, problem_text, language, session_id)
            .await
    }

    /// Debug a previously generated solution.
    pub async fn debug_solution(
        &self,
        problem_text: &str,
        language: &str,
        session_id: Option<&str>,
    ) -> Result<ParsedSolution, GlimpseError> {
        self.solve(SolutionMode::Debug, problem_text, language, session_id)
            .await
    }

    async fn solve(
        &self,
        mode: SolutionMode,
        problem_text: &str,
        language: &str,
        session_id: Option<&str>,
    ) -> Result<ParsedSolution, GlimpseError> {
        let system = Message::system(mode.system_prompt());
        let user = Message::human(mode.user_prompt(problem_text, language));

        let mut messages = Vec::new();
        if let Some(id) = session_id {
            messages.extend(self.memory.load(id).await?);
        }
        messages.push(system.clone());
        messages.push(user.clone());

        tracing::debug!(?mode, %language, history = messages.len() - 2, "requesting solution");
        let response = self
            .model
            .chat(
                ChatRequest::new(messages)
                    .with_temperature(SOLUTION_TEMPERATURE)
                    .with_max_tokens(MAX_COMPLETION_TOKENS)
                    .with_response_format(ResponseFormat::JsonObject),
            )
            .await?;

        if let Some(id) = session_id {
            self.memory.append(id, system).await?;
            self.memory.append(id, user).await?;
            self.memory.append(id, response.message.clone()).await?;
        }

        Ok(solution::decode(&response.message.text(), mode))
    }

    /// Connectivity probe: a minimal completion that exercises auth and the
    /// round trip without meaningful token spend.
    pub async fn probe(&self) -> Result<String, GlimpseError> {
        let response = self
            .model
            .chat(
                ChatRequest::new(vec![Message::human("Say 'OpenAI GPT-4o API is working'")])
                    .with_temperature(0.0)
                    .with_max_tokens(10),
            )
            .await?;
        Ok(response.message.text())
    }
}
