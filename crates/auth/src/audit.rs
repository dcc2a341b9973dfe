//! Operation audit sink.
//!
//! The core fires events into this sink and never waits on it; the sink's
//! destination (log stream, table, queue) is not the core's concern.

use lotdesk_core::UserId;

use crate::RoleKey;

/// Auditable authorization-core events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditEvent {
    LoginSucceeded {
        user_id: UserId,
        username: String,
        role: RoleKey,
        remember: bool,
    },
    LoginFailed {
        username: String,
    },
    LoggedOut {
        username: String,
    },
    AccessDenied {
        username: String,
        role: RoleKey,
        required: String,
    },
}

/// Fire-and-forget audit sink.
pub trait AuditSink: Send + Sync {
    fn record(&self, event: AuditEvent);
}

/// Default sink: structured tracing events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, event: AuditEvent) {
        match event {
            AuditEvent::LoginSucceeded {
                user_id,
                username,
                role,
                remember,
            } => {
                tracing::info!(%user_id, %username, %role, remember, "login succeeded");
            }
            AuditEvent::LoginFailed { username } => {
                tracing::warn!(%username, "login failed");
            }
            AuditEvent::LoggedOut { username } => {
                tracing::info!(%username, "logged out");
            }
            AuditEvent::AccessDenied {
                username,
                role,
                required,
            } => {
                tracing::warn!(%username, %role, %required, "access denied");
            }
        }
    }
}
