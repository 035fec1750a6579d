//! Session persistence interface and implementations.
//!
//! The orchestrator loads once at session start and saves after each
//! committed turn. A load failure yields a fresh memory; it is never fatal.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use spotter_core::error::{Result, SpotterError};
use spotter_core::types::SessionId;

use crate::session::SessionMemory;

/// Keyed session load/save. Implementations must be safe under concurrent
/// access from different sessions.
pub trait SessionStore: Send + Sync {
    fn load(&self, id: &SessionId) -> Result<Option<SessionMemory>>;
    fn save(&self, id: &SessionId, memory: &SessionMemory) -> Result<()>;
    fn delete(&self, id: &SessionId) -> Result<()>;
}

// =============================================================================
// InMemorySessionStore
// =============================================================================

/// Process-local store, used in tests and as the default backend.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<SessionId, SessionMemory>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn load(&self, id: &SessionId) -> Result<Option<SessionMemory>> {
        let sessions = self
            .sessions
            .lock()
            .map_err(|e| SpotterError::Storage(format!("session lock poisoned: {}", e)))?;
        Ok(sessions.get(id).cloned())
    }

    fn save(&self, id: &SessionId, memory: &SessionMemory) -> Result<()> {
        let mut sessions = self
            .sessions
            .lock()
            .map_err(|e| SpotterError::Storage(format!("session lock poisoned: {}", e)))?;
        sessions.insert(id.clone(), memory.clone());
        Ok(())
    }

    fn delete(&self, id: &SessionId) -> Result<()> {
        let mut sessions = self
            .sessions
            .lock()
            .map_err(|e| SpotterError::Storage(format!("session lock poisoned: {}", e)))?;
        sessions.remove(id);
        Ok(())
    }
}

// =============================================================================
// JsonFileSessionStore
// =============================================================================

/// One JSON document per session under a root directory.
pub struct JsonFileSessionStore {
    root: PathBuf,
}

impl JsonFileSessionStore {
    /// Create the store, creating the root directory if needed.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn path_for(&self, id: &SessionId) -> PathBuf {
        // Session ids come from the caller; keep them inside the root.
        let safe: String = id
            .0
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.root.join(format!("{}.json", safe))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl SessionStore for JsonFileSessionStore {
    fn load(&self, id: &SessionId) -> Result<Option<SessionMemory>> {
        let path = self.path_for(id);
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)?;
        let memory: SessionMemory = serde_json::from_str(&content)
            .map_err(|e| SpotterError::Storage(format!("corrupt session {}: {}", id, e)))?;
        Ok(Some(memory))
    }

    fn save(&self, id: &SessionId, memory: &SessionMemory) -> Result<()> {
        let path = self.path_for(id);
        let content = serde_json::to_string_pretty(memory)?;
        std::fs::write(&path, content)?;
        tracing::debug!(session = %id, path = %path.display(), "Session saved");
        Ok(())
    }

    fn delete(&self, id: &SessionId) -> Result<()> {
        let path = self.path_for(id);
        if path.exists() {
            std::fs::remove_file(&path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_with_one_turn() -> SessionMemory {
        let mut mem = SessionMemory::new(10);
        mem.record_turn("hi", "hello!");
        mem
    }

    // ---- InMemorySessionStore ----

    #[test]
    fn test_in_memory_round_trip() {
        let store = InMemorySessionStore::new();
        let id = SessionId::from("s1");

        assert!(store.load(&id).unwrap().is_none());

        let mem = memory_with_one_turn();
        store.save(&id, &mem).unwrap();
        let loaded = store.load(&id).unwrap().unwrap();
        assert_eq!(loaded, mem);
    }

    #[test]
    fn test_in_memory_delete() {
        let store = InMemorySessionStore::new();
        let id = SessionId::from("s1");
        store.save(&id, &memory_with_one_turn()).unwrap();
        store.delete(&id).unwrap();
        assert!(store.load(&id).unwrap().is_none());
    }

    #[test]
    fn test_in_memory_sessions_are_independent() {
        let store = InMemorySessionStore::new();
        store.save(&SessionId::from("a"), &memory_with_one_turn()).unwrap();
        assert!(store.load(&SessionId::from("b")).unwrap().is_none());
    }

    // ---- JsonFileSessionStore ----

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileSessionStore::new(dir.path()).unwrap();
        let id = SessionId::from("s1");

        assert!(store.load(&id).unwrap().is_none());

        let mem = memory_with_one_turn();
        store.save(&id, &mem).unwrap();
        let loaded = store.load(&id).unwrap().unwrap();
        assert_eq!(loaded, mem);
    }

    #[test]
    fn test_file_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileSessionStore::new(dir.path()).unwrap();
        let id = SessionId::from("s1");
        store.save(&id, &memory_with_one_turn()).unwrap();
        store.delete(&id).unwrap();
        assert!(store.load(&id).unwrap().is_none());
        // Deleting again is a no-op.
        store.delete(&id).unwrap();
    }

    #[test]
    fn test_file_corrupt_session_errors() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileSessionStore::new(dir.path()).unwrap();
        let id = SessionId::from("s1");
        std::fs::write(dir.path().join("s1.json"), "not json").unwrap();
        assert!(store.load(&id).is_err());
    }

    #[test]
    fn test_file_ids_stay_inside_root() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileSessionStore::new(dir.path()).unwrap();
        let id = SessionId::from("../escape");
        store.save(&id, &memory_with_one_turn()).unwrap();
        assert!(store.load(&id).unwrap().is_some());
        // The written file lives under the root, not beside it.
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }
}
