mod config;
mod http;

pub use config::{ServerConfig, DEFAULT_MODEL, DEFAULT_PORT};
pub use http::{respond, serve};
