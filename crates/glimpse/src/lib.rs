//! Glimpse — screenshot-to-solution desktop helper.
//!
//! This crate re-exports the Glimpse sub-crates for convenient single-import
//! usage.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use glimpse::core::{ChatModel, Message, Solution};
//! use glimpse::gateway::Gateway;
//! use glimpse::router::Router;
//! ```

/// Core types and trait seams: Message, ChatModel, Solution, GlimpseError.
pub use glimpse_core as core;

/// Response cache: InMemoryCache, fingerprint derivation.
#[cfg(feature = "cache")]
pub use glimpse_cache as cache;

/// Model gateway: extract, generate, debug, probe; solution decoding.
#[cfg(feature = "gateway")]
pub use glimpse_gateway as gateway;

/// Screenshot payload compression.
#[cfg(feature = "imaging")]
pub use glimpse_imaging as imaging;

/// Conversation store keyed by session id.
#[cfg(feature = "memory")]
pub use glimpse_memory as memory;

/// Provider adapters: OpenAI chat with vision input, plus test doubles.
#[cfg(feature = "models")]
pub use glimpse_models as models;

/// Request router: validation, cache wrap, error envelopes, dispatch.
#[cfg(feature = "router")]
pub use glimpse_router as router;

/// Desktop shell: bindings, view state, cancellation, event bus.
#[cfg(feature = "shell")]
pub use glimpse_shell as shell;
