//! Session registry
//!
//! One session is one client's exclusive ownership of one controller and
//! its tree. The registry is an explicit object owned by the hosting
//! service and passed where it is needed; there is no process-wide map.
//! Sessions have a bounded idle lifetime; expiry discards controller and
//! tree wholesale, which is always safe because materialization is an
//! idempotent read.

use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};

use tracing::{debug, instrument};
use uuid::Uuid;

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::domain::controller::Controller;
use crate::domain::tree::PageTree;

/// Opaque session handle, safe to round-trip through the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

pub struct Session<P> {
    id: SessionId,
    pub controller: Controller<P>,
    created_at: Instant,
    last_active: Instant,
}

impl<P> Session<P> {
    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }

    fn idle_since(&self) -> Instant {
        self.last_active
    }
}

/// Owns all live sessions of one hosting service.
pub struct SessionService<P> {
    sessions: HashMap<SessionId, Session<P>>,
    idle_timeout: Duration,
}

impl<P> SessionService<P> {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            sessions: HashMap::new(),
            idle_timeout,
        }
    }

    /// Wrap a freshly-built tree in a controller and register it. The
    /// controller applies the root's on-enter hook, so a single-result
    /// tree already sits on its detail screen when this returns.
    #[instrument(level = "debug", skip_all)]
    pub fn create(&mut self, tree: PageTree<P>) -> ApplicationResult<SessionId> {
        let controller = Controller::new(tree)?;
        let id = SessionId(Uuid::new_v4());
        let now = Instant::now();
        self.sessions.insert(
            id,
            Session {
                id,
                controller,
                created_at: now,
                last_active: now,
            },
        );
        debug!(%id, live = self.sessions.len(), "session created");
        Ok(id)
    }

    /// Look up a live session and mark it active.
    pub fn get(&mut self, id: SessionId) -> ApplicationResult<&mut Session<P>> {
        match self.sessions.get_mut(&id) {
            Some(session) => {
                session.last_active = Instant::now();
                Ok(session)
            }
            None => Err(ApplicationError::SessionNotFound { id: id.to_string() }),
        }
    }

    /// Tear down one session; controller and tree are dropped wholesale.
    pub fn destroy(&mut self, id: SessionId) -> bool {
        let removed = self.sessions.remove(&id).is_some();
        if removed {
            debug!(%id, live = self.sessions.len(), "session destroyed");
        }
        removed
    }

    /// Drop every session idle since before `now - idle_timeout`.
    /// Returns the number of sessions discarded.
    #[instrument(level = "debug", skip(self))]
    pub fn expire_idle(&mut self, now: Instant) -> usize {
        let timeout = self.idle_timeout;
        let before = self.sessions.len();
        self.sessions
            .retain(|_, session| now.duration_since(session.idle_since()) < timeout);
        let expired = before - self.sessions.len();
        if expired > 0 {
            debug!(expired, live = self.sessions.len(), "idle sessions reaped");
        }
        expired
    }

    /// Convenience wrapper over [`expire_idle`](Self::expire_idle) with
    /// the current time.
    pub fn reap_expired(&mut self) -> usize {
        self.expire_idle(Instant::now())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
