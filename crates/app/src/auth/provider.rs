//! Authentication provider.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::{
    auth::{
        AuthError, AuthUser, UserId,
        models::CredentialRecord,
        password::{MINIMUM_PASSWORD_CHARS, generate_salt, hash_password, verify_password},
    },
    documents::{CREDENTIALS, DocumentStore, DocumentStoreError, decode, encode},
};

/// Account sign-up, sign-in and the observable current session.
#[automock]
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Create an account and sign it in.
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, AuthError>;

    /// Sign in to an existing account.
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, AuthError>;

    /// End the current session, if any.
    async fn sign_out(&self);

    /// The signed-in user, if any.
    fn current_user(&self) -> Option<AuthUser>;

    /// Observe session changes. The receiver starts at the current session.
    fn subscribe(&self) -> watch::Receiver<Option<AuthUser>>;

    /// Resume a previously established session.
    fn restore(&self, user: AuthUser);
}

/// Validate and normalise an email/password pair.
fn validate_credentials(email: &str, password: &str) -> Result<String, AuthError> {
    let email = email.trim();

    if email.is_empty() || password.is_empty() {
        return Err(AuthError::MissingCredentials);
    }

    if !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
        return Err(AuthError::InvalidEmail);
    }

    if password.chars().count() < MINIMUM_PASSWORD_CHARS {
        return Err(AuthError::WeakPassword {
            minimum: MINIMUM_PASSWORD_CHARS,
        });
    }

    Ok(email.to_string())
}

/// Credentials kept in the `credentials` collection of a document store.
pub struct DocumentAuthProvider {
    documents: Arc<dyn DocumentStore>,
    session: watch::Sender<Option<AuthUser>>,
}

impl DocumentAuthProvider {
    #[must_use]
    pub fn new(documents: Arc<dyn DocumentStore>) -> Self {
        Self {
            documents,
            session: watch::Sender::new(None),
        }
    }

    async fn credentials(&self, key: &str) -> Result<Option<CredentialRecord>, AuthError> {
        let Some(snapshot) = self.documents.get(CREDENTIALS, key).await? else {
            return Ok(None);
        };

        Ok(Some(decode(&snapshot)?))
    }
}

#[async_trait]
impl AuthProvider for DocumentAuthProvider {
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        let email = validate_credentials(email, password)?;
        let key = email.to_lowercase();

        if self.credentials(&key).await?.is_some() {
            return Err(AuthError::EmailInUse);
        }

        let salt = generate_salt();
        let password_hash = hash_password(&salt, password).ok_or(AuthError::InvalidCredentials)?;

        let record = CredentialRecord {
            user_id: UserId::new(),
            email: email.clone(),
            salt,
            password_hash,
        };

        self.documents
            .set(CREDENTIALS, &key, encode(&record)?)
            .await?;

        let user = AuthUser {
            id: record.user_id,
            email,
        };

        info!(user = %user.id, "registered account");

        self.session.send_replace(Some(user.clone()));

        Ok(user)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        let email = email.trim();

        if email.is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let record = match self.credentials(&email.to_lowercase()).await {
            Ok(Some(record)) => record,
            Ok(None) => return Err(AuthError::InvalidCredentials),
            Err(AuthError::Store(DocumentStoreError::Malformed { id, .. })) => {
                warn!(%id, "ignoring malformed credentials");

                return Err(AuthError::InvalidCredentials);
            }
            Err(error) => return Err(error),
        };

        if !verify_password(&record.salt, password, &record.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        let user = AuthUser {
            id: record.user_id,
            email: record.email,
        };

        info!(user = %user.id, "signed in");

        self.session.send_replace(Some(user.clone()));

        Ok(user)
    }

    async fn sign_out(&self) {
        if let Some(user) = self.session.send_replace(None) {
            info!(user = %user.id, "signed out");
        }
    }

    fn current_user(&self) -> Option<AuthUser> {
        self.session.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Option<AuthUser>> {
        self.session.subscribe()
    }

    fn restore(&self, user: AuthUser) {
        self.session.send_replace(Some(user));
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::documents::MemoryDocumentStore;

    use super::*;

    fn provider() -> (Arc<MemoryDocumentStore>, DocumentAuthProvider) {
        let documents = Arc::new(MemoryDocumentStore::new());

        (documents.clone(), DocumentAuthProvider::new(documents))
    }

    #[tokio::test]
    async fn sign_up_signs_the_user_in() -> TestResult {
        let (_, auth) = provider();

        let user = auth.sign_up("asha@example.com", "secret1").await?;

        assert_eq!(auth.current_user(), Some(user));

        Ok(())
    }

    #[tokio::test]
    async fn sign_up_stores_a_salted_verifier_not_the_password() -> TestResult {
        let (documents, auth) = provider();

        auth.sign_up("Asha@Example.com", "secret1").await?;

        let stored = documents
            .get(CREDENTIALS, "asha@example.com")
            .await?
            .map(|snapshot| snapshot.data)
            .unwrap_or_default();

        assert!(stored.contains_key("salt"));
        assert!(stored.contains_key("passwordHash"));
        assert!(
            !stored.values().any(|value| value == "secret1"),
            "password must not be stored in plain text"
        );

        Ok(())
    }

    #[tokio::test]
    async fn sign_in_with_correct_password_succeeds() -> TestResult {
        let (_, auth) = provider();

        let registered = auth.sign_up("asha@example.com", "secret1").await?;

        auth.sign_out().await;

        let signed_in = auth.sign_in("ASHA@example.com ", "secret1").await?;

        assert_eq!(signed_in.id, registered.id);
        assert_eq!(auth.current_user(), Some(signed_in));

        Ok(())
    }

    #[tokio::test]
    async fn sign_in_with_wrong_password_fails() -> TestResult {
        let (_, auth) = provider();

        auth.sign_up("asha@example.com", "secret1").await?;
        auth.sign_out().await;

        let result = auth.sign_in("asha@example.com", "wrong-password").await;

        assert!(
            matches!(result, Err(AuthError::InvalidCredentials)),
            "expected InvalidCredentials, got {result:?}"
        );
        assert_eq!(auth.current_user(), None);

        Ok(())
    }

    #[tokio::test]
    async fn sign_in_unknown_email_fails() {
        let (_, auth) = provider();

        let result = auth.sign_in("nobody@example.com", "secret1").await;

        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() -> TestResult {
        let (_, auth) = provider();

        auth.sign_up("asha@example.com", "secret1").await?;

        let result = auth.sign_up("ASHA@example.com", "another1").await;

        assert!(
            matches!(result, Err(AuthError::EmailInUse)),
            "expected EmailInUse, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn short_passwords_are_rejected() {
        let (_, auth) = provider();

        let result = auth.sign_up("asha@example.com", "12345").await;

        assert!(matches!(result, Err(AuthError::WeakPassword { minimum: 6 })));
    }

    #[tokio::test]
    async fn missing_and_invalid_emails_are_rejected() {
        let (_, auth) = provider();

        assert!(matches!(
            auth.sign_up("  ", "secret1").await,
            Err(AuthError::MissingCredentials)
        ));
        assert!(matches!(
            auth.sign_up("asha.example.com", "secret1").await,
            Err(AuthError::InvalidEmail)
        ));
    }

    #[tokio::test]
    async fn subscribers_observe_sign_in_and_sign_out() -> TestResult {
        let (_, auth) = provider();

        let mut sessions = auth.subscribe();

        assert_eq!(*sessions.borrow_and_update(), None);

        let user = auth.sign_up("asha@example.com", "secret1").await?;

        sessions.changed().await?;
        assert_eq!(*sessions.borrow_and_update(), Some(user));

        auth.sign_out().await;

        sessions.changed().await?;
        assert_eq!(*sessions.borrow_and_update(), None);

        Ok(())
    }

    #[tokio::test]
    async fn restore_resumes_a_persisted_session() {
        let (_, auth) = provider();

        let user = AuthUser {
            id: UserId::new(),
            email: "asha@example.com".to_string(),
        };

        auth.restore(user.clone());

        assert_eq!(auth.current_user(), Some(user));
    }
}
