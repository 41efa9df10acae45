//! Group study session metadata and the transport seam.
//!
//! The core carries session identity and host/member role as advisory
//! metadata and mirrors its state through a [`GroupTransport`]; the network
//! layer behind that trait lives outside this crate. The core enforces no
//! conflict resolution between peers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SyncError;
use crate::task::TaskQueue;
use crate::timer::TimerSnapshot;

/// Advisory role within a group session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupRole {
    Host,
    Member,
}

/// An active group session, identified by an opaque id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupSession {
    pub id: String,
    pub role: GroupRole,
    pub joined_at: DateTime<Utc>,
}

/// The state mirrored to peers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncSnapshot {
    pub timer: TimerSnapshot,
    pub tasks: TaskQueue,
}

/// Network transport for group sessions. Implemented outside the core.
pub trait GroupTransport {
    /// Create a session, returning its opaque id.
    fn create(&mut self, snapshot: &SyncSnapshot) -> Result<String, SyncError>;
    /// Join an existing session, returning the host's current state.
    fn join(&mut self, session_id: &str) -> Result<SyncSnapshot, SyncError>;
    /// Publish local state to the session.
    fn publish(&mut self, session_id: &str, snapshot: &SyncSnapshot) -> Result<(), SyncError>;
    /// Leave the session.
    fn leave(&mut self, session_id: &str) -> Result<(), SyncError>;
}

/// Wires a transport to the session. Transport failures surface as
/// `peer_error` and never touch local timer/task state.
pub struct GroupLink<T: GroupTransport> {
    transport: T,
    session: Option<GroupSession>,
    peer_error: Option<String>,
}

impl<T: GroupTransport> GroupLink<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            session: None,
            peer_error: None,
        }
    }

    pub fn session(&self) -> Option<&GroupSession> {
        self.session.as_ref()
    }

    /// Last surfaced transport failure, if any.
    pub fn peer_error(&self) -> Option<&str> {
        self.peer_error.as_deref()
    }

    pub fn create_session(&mut self, snapshot: &SyncSnapshot, now: DateTime<Utc>) -> bool {
        match self.transport.create(snapshot) {
            Ok(id) => {
                self.session = Some(GroupSession {
                    id,
                    role: GroupRole::Host,
                    joined_at: now,
                });
                self.peer_error = None;
                true
            }
            Err(e) => {
                self.peer_error = Some(e.to_string());
                false
            }
        }
    }

    /// Join a session. Returns the host's state for the caller to display;
    /// the caller decides whether to adopt any of it.
    pub fn join_session(
        &mut self,
        session_id: &str,
        now: DateTime<Utc>,
    ) -> Option<SyncSnapshot> {
        match self.transport.join(session_id) {
            Ok(remote) => {
                self.session = Some(GroupSession {
                    id: session_id.to_string(),
                    role: GroupRole::Member,
                    joined_at: now,
                });
                self.peer_error = None;
                Some(remote)
            }
            Err(e) => {
                self.peer_error = Some(e.to_string());
                None
            }
        }
    }

    /// Mirror local state to the active session. No-op when not connected.
    pub fn mirror(&mut self, snapshot: &SyncSnapshot) {
        let Some(session) = &self.session else {
            return;
        };
        if let Err(e) = self.transport.publish(&session.id, snapshot) {
            self.peer_error = Some(e.to_string());
        }
    }

    pub fn leave_session(&mut self) {
        if let Some(session) = self.session.take() {
            if let Err(e) = self.transport.leave(&session.id) {
                self.peer_error = Some(e.to_string());
            }
        }
    }
}
