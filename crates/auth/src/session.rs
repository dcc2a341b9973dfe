//! Session lifecycle orchestration.
//!
//! Login verifies credentials and computes a signed token plus its intended
//! lifetime; delivering the token to the client (cookie attributes included)
//! is the transport layer's job. Logout is client-side discard only: the
//! server keeps no session table, so a logged-out token stays
//! cryptographically valid until its natural expiry.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use lotdesk_core::{AuthError, AuthResult};

use crate::audit::{AuditEvent, AuditSink};
use crate::claims::IdentityClaims;
use crate::password::PasswordVerifier;
use crate::store::CredentialStore;
use crate::token::{SignedToken, TokenCodec};

/// Result of a successful login: the token, the lifetime the transport
/// should mirror into the cookie, and the claims for the response body.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: SignedToken,
    pub ttl: Duration,
    pub claims: IdentityClaims,
}

/// Time-to-live for a plain session vs. a "remember me" session.
pub fn session_ttl(remember: bool) -> Duration {
    if remember {
        Duration::days(7)
    } else {
        Duration::days(1)
    }
}

pub struct SessionManager {
    credentials: Arc<dyn CredentialStore>,
    passwords: Arc<dyn PasswordVerifier>,
    codec: Arc<TokenCodec>,
    audit: Arc<dyn AuditSink>,
}

impl SessionManager {
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        passwords: Arc<dyn PasswordVerifier>,
        codec: Arc<TokenCodec>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            credentials,
            passwords,
            codec,
            audit,
        }
    }

    /// Verify credentials and issue a session token.
    ///
    /// Unknown login name and rejected password are indistinguishable to the
    /// caller: both are `InvalidCredentials`.
    pub fn login(
        &self,
        login_name: &str,
        plaintext: &str,
        remember: bool,
        now: DateTime<Utc>,
    ) -> AuthResult<IssuedSession> {
        let record = self
            .credentials
            .find_by_login(login_name)
            .map_err(|e| AuthError::repository_unavailable(e.to_string()))?;

        let Some(record) = record else {
            self.audit.record(AuditEvent::LoginFailed {
                username: login_name.to_string(),
            });
            return Err(AuthError::InvalidCredentials);
        };

        if !self.passwords.verify(plaintext, &record.password_hash) {
            self.audit.record(AuditEvent::LoginFailed {
                username: login_name.to_string(),
            });
            return Err(AuthError::InvalidCredentials);
        }

        let ttl = session_ttl(remember);
        let claims = IdentityClaims::new(
            record.user_id,
            record.username.clone(),
            record.role_key.clone(),
            now,
            ttl,
        );
        let token = self
            .codec
            .issue(&claims)
            .map_err(|e| AuthError::repository_unavailable(format!("token issue: {e}")))?;

        self.audit.record(AuditEvent::LoginSucceeded {
            user_id: record.user_id,
            username: record.username,
            role: record.role_key,
            remember,
        });

        Ok(IssuedSession { token, ttl, claims })
    }

    /// Record the logout; the transport clears the client-held token.
    pub fn logout(&self, claims: Option<&IdentityClaims>) {
        if let Some(claims) = claims {
            self.audit.record(AuditEvent::LoggedOut {
                username: claims.username.clone(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use lotdesk_core::{RoleId, UserId};

    use crate::RoleKey;
    use crate::password::hash_password;
    use crate::store::{CredentialRecord, StoreError};

    struct OneUserStore {
        record: CredentialRecord,
    }

    impl CredentialStore for OneUserStore {
        fn find_by_login(&self, login: &str) -> Result<Option<CredentialRecord>, StoreError> {
            Ok((login == self.record.username).then(|| self.record.clone()))
        }
    }

    struct DownStore;

    impl CredentialStore for DownStore {
        fn find_by_login(&self, _login: &str) -> Result<Option<CredentialRecord>, StoreError> {
            Err(StoreError::unavailable("connection refused"))
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        events: Mutex<Vec<AuditEvent>>,
    }

    impl AuditSink for RecordingSink {
        fn record(&self, event: AuditEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    fn manager_with(
        store: Arc<dyn CredentialStore>,
        audit: Arc<RecordingSink>,
    ) -> SessionManager {
        SessionManager::new(
            store,
            Arc::new(crate::password::Argon2Verifier),
            Arc::new(TokenCodec::new(b"session-test-secret-session-test")),
            audit,
        )
    }

    fn admin_record() -> CredentialRecord {
        CredentialRecord {
            user_id: UserId::new(),
            username: "admin".to_string(),
            password_hash: hash_password("123456").unwrap(),
            role_id: RoleId::new(1),
            role_key: RoleKey::SUPER_ADMIN,
        }
    }

    #[test]
    fn login_issues_one_day_session() {
        let record = admin_record();
        let sink = Arc::new(RecordingSink::default());
        let manager = manager_with(
            Arc::new(OneUserStore {
                record: record.clone(),
            }),
            sink.clone(),
        );

        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let session = manager.login("admin", "123456", false, now).unwrap();

        assert_eq!(session.ttl, Duration::days(1));
        assert_eq!(session.claims.sub, record.user_id);
        assert_eq!(session.claims.role, RoleKey::SUPER_ADMIN);
        assert_eq!(session.claims.exp, now.timestamp() + 86_400);

        let events = sink.events.lock().unwrap();
        assert!(matches!(
            events.as_slice(),
            [AuditEvent::LoginSucceeded { remember: false, .. }]
        ));
    }

    #[test]
    fn remember_me_extends_ttl_to_seven_days() {
        let manager = manager_with(
            Arc::new(OneUserStore {
                record: admin_record(),
            }),
            Arc::new(RecordingSink::default()),
        );

        let session = manager.login("admin", "123456", true, Utc::now()).unwrap();
        assert_eq!(session.ttl, Duration::days(7));
    }

    #[test]
    fn unknown_user_and_bad_password_are_indistinguishable() {
        let sink = Arc::new(RecordingSink::default());
        let manager = manager_with(
            Arc::new(OneUserStore {
                record: admin_record(),
            }),
            sink.clone(),
        );
        let now = Utc::now();

        let unknown = manager.login("nobody", "123456", false, now).unwrap_err();
        let wrong = manager.login("admin", "hunter2", false, now).unwrap_err();

        assert_eq!(unknown, AuthError::InvalidCredentials);
        assert_eq!(wrong, AuthError::InvalidCredentials);

        let events = sink.events.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert!(events
            .iter()
            .all(|e| matches!(e, AuditEvent::LoginFailed { .. })));
    }

    #[test]
    fn store_failure_is_a_denial_not_a_grant() {
        let manager = manager_with(Arc::new(DownStore), Arc::new(RecordingSink::default()));
        let err = manager.login("admin", "123456", false, Utc::now()).unwrap_err();
        assert!(matches!(err, AuthError::RepositoryUnavailable(_)));
    }

    #[test]
    fn issued_token_verifies_and_carries_role() {
        let manager = manager_with(
            Arc::new(OneUserStore {
                record: admin_record(),
            }),
            Arc::new(RecordingSink::default()),
        );

        let now = Utc::now();
        let session = manager.login("admin", "123456", false, now).unwrap();

        let codec = TokenCodec::new(b"session-test-secret-session-test");
        let claims = codec.verify(session.token.as_str(), now).unwrap();
        assert_eq!(claims.role, RoleKey::SUPER_ADMIN);

        // A subsequent coarse role check admits the session.
        let allowed = [RoleKey::ADMIN, RoleKey::SUPER_ADMIN].into_iter().collect();
        assert!(crate::guard::authorize_role(&claims, &allowed).is_ok());
    }

    #[test]
    fn logout_records_audit_event() {
        let sink = Arc::new(RecordingSink::default());
        let manager = manager_with(
            Arc::new(OneUserStore {
                record: admin_record(),
            }),
            sink.clone(),
        );

        let session = manager.login("admin", "123456", false, Utc::now()).unwrap();
        manager.logout(Some(&session.claims));

        let events = sink.events.lock().unwrap();
        assert!(matches!(
            events.last(),
            Some(AuditEvent::LoggedOut { username }) if username == "admin"
        ));
    }
}
