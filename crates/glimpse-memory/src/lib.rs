use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use glimpse_core::{GlimpseError, MemoryStore, Message};
use tokio::sync::RwLock;

/// Sessions idle for this long are dropped on the next access.
pub const SESSION_TTL: Duration = Duration::from_secs(60 * 60);

struct SessionEntry {
    messages: Vec<Message>,
    last_active: Instant,
}

/// In-memory conversation store keyed by session id.
///
/// Messages are kept in append order; no role alternation is enforced and
/// history length is uncapped. Expiry is lazy: there is no background sweep,
/// an idle session is discarded when it is next read or written.
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, SessionEntry>>,
    ttl: Duration,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::with_ttl(SESSION_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MemoryStore for InMemorySessionStore {
    async fn append(&self, session_id: &str, message: Message) -> Result<(), GlimpseError> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| SessionEntry {
                messages: Vec::new(),
                last_active: Instant::now(),
            });
        if entry.last_active.elapsed() >= self.ttl {
            entry.messages.clear();
        }
        entry.messages.push(message);
        entry.last_active = Instant::now();
        Ok(())
    }

    async fn load(&self, session_id: &str) -> Result<Vec<Message>, GlimpseError> {
        let mut sessions = self.sessions.write().await;
        match sessions.get(session_id) {
            Some(entry) if entry.last_active.elapsed() < self.ttl => {
                Ok(entry.messages.clone())
            }
            Some(_) => {
                sessions.remove(session_id);
                Ok(Vec::new())
            }
            None => Ok(Vec::new()),
        }
    }

    async fn clear(&self, session_id: &str) -> Result<(), GlimpseError> {
        let mut sessions = self.sessions.write().await;
        sessions.remove(session_id);
        Ok(())
    }
}
