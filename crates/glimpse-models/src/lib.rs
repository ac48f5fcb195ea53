mod backend;
mod openai;
mod scripted;

pub use backend::{FakeBackend, HttpBackend, ProviderBackend, ProviderRequest, ProviderResponse};
pub use openai::{OpenAiChatModel, OpenAiConfig};
pub use scripted::ScriptedChatModel;
