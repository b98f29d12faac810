// Recruiting sessions: per-session state, the in-process session store,
// the service that drives the workflow, and its HTTP handlers.

pub mod handlers;
pub mod service;

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::artifacts::ArtifactStore;
use crate::workflow::{NodeId, RunOutcome, SessionState};

pub use service::RecruitingService;

/// Everything the workflow knows about one recruiter's conversation.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub id: Uuid,
    pub state: SessionState,
    pub artifacts: ArtifactStore,
    /// Where the workflow stopped: the node awaiting input, or finished.
    pub status: RunOutcome,
}

impl Session {
    pub fn new(id: Uuid, role_text: &str) -> Self {
        Self {
            id,
            state: SessionState::new(role_text),
            artifacts: ArtifactStore::new(),
            status: RunOutcome::Suspended(NodeId::Extract),
        }
    }

    /// Replaces state and artifacts with the result of a successful run.
    pub fn commit(&mut self, state: SessionState, artifacts: ArtifactStore, status: RunOutcome) {
        self.state = state;
        self.artifacts = artifacts;
        self.status = status;
    }
}

/// Session registry keyed by the collaborator-supplied id.
///
/// Each session sits behind its own mutex, so requests for one session run
/// one at a time while different sessions never wait on each other. The map
/// lock is only held for lookup and insert.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, Arc<Mutex<Session>>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a session, replacing any previous session with the same id.
    pub async fn insert(&self, session: Session) {
        let id = session.id;
        self.inner
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(session)));
    }

    pub async fn get(&self, id: Uuid) -> Option<Arc<Mutex<Session>>> {
        self.inner.read().await.get(&id).cloned()
    }
}
