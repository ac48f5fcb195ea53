mod in_memory;

pub use in_memory::InMemoryCache;

// Re-export the trait so callers need only this crate.
pub use glimpse_core::ResponseCache;

use serde_json::Value;

/// Derive the cache key for a request: the route concatenated with the
/// serialized canonical body. Two structurally identical requests to the
/// same route collide by construction.
pub fn fingerprint(route: &str, body: &Value) -> String {
    format!("{route}{body}")
}
